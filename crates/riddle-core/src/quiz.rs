//! Quiz progression state machine.
//!
//! Per question: `Unanswered → submit(match) → Correct → advance → next | Finished`
//! and `Unanswered → submit(miss) → Incorrect → retry → Unanswered`.
//! Every intent returns the post-intent snapshot, or an error that leaves the
//! state untouched.

use serde::{Deserialize, Serialize};

use crate::content::{ImageRef, QuizContent, QuizItem};
use crate::error::{QuizError, Result};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Feedback {
    #[default]
    None,
    Correct,
    Incorrect,
}

/// Whether a correct answer waits for `advance` or moves on immediately.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AdvanceMode {
    #[default]
    Manual,
    Auto,
}

/// What `retry` does with the hint revealed by the wrong answer.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RetryHintPolicy {
    #[default]
    Keep,
    Clear,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct QuizOptions {
    pub advance: AdvanceMode,
    pub retry_hint: RetryHintPolicy,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuizState {
    pub current_question_index: usize,
    pub user_answer_text: String,
    pub last_feedback: Feedback,
    pub hint_visible: bool,
    pub score: u32,
    pub is_finished: bool,
    pub bonus_unlocked: bool,
}

/// What the correct-answer screen shows.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Celebration {
    pub image: ImageRef,
    /// Invite the user to shake for the bonus that is still locked.
    pub shake_prompt: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct FinalScore {
    pub score: u32,
    pub total: usize,
}

#[derive(Debug)]
pub struct QuizController {
    content: QuizContent,
    options: QuizOptions,
    state: QuizState,
}

impl QuizController {
    pub fn new(content: QuizContent) -> Self {
        Self::with_options(content, QuizOptions::default())
    }

    pub fn with_options(content: QuizContent, options: QuizOptions) -> Self {
        Self {
            content,
            options,
            state: QuizState::default(),
        }
    }

    pub fn state(&self) -> &QuizState {
        &self.state
    }

    pub fn snapshot(&self) -> QuizState {
        self.state.clone()
    }

    pub fn content(&self) -> &QuizContent {
        &self.content
    }

    pub fn options(&self) -> QuizOptions {
        self.options
    }

    /// Number of questions.
    pub fn total(&self) -> usize {
        self.content.len()
    }

    /// Index into the content, clamped in release builds.
    fn index(&self) -> usize {
        let n = self.content.len();
        let i = self.state.current_question_index;
        debug_assert!(i < n, "question index {i} out of range for {n} questions");
        i.min(n.saturating_sub(1))
    }

    pub fn current_item(&self) -> &QuizItem {
        &self.content.items()[self.index()]
    }

    /// Fraction of questions already behind the user, in [0, 1).
    pub fn progress(&self) -> f32 {
        if self.state.is_finished {
            return 1.0;
        }
        self.state.current_question_index as f32 / self.content.len() as f32
    }

    pub fn submit_answer(&mut self, text: &str) -> Result<QuizState> {
        if self.state.is_finished {
            return Err(self.reject("submit_answer", QuizError::Finished));
        }
        if self.state.last_feedback != Feedback::None {
            return Err(self.reject("submit_answer", QuizError::NotAnswerable));
        }

        self.state.user_answer_text = text.to_string();
        if self.current_item().accepts(text) {
            self.state.last_feedback = Feedback::Correct;
            self.state.score += 1;
            self.state.hint_visible = false;
            tracing::debug!(
                index = self.state.current_question_index,
                score = self.state.score,
                "correct answer"
            );
            if self.options.advance == AdvanceMode::Auto {
                self.advance_unchecked();
            }
        } else {
            self.state.last_feedback = Feedback::Incorrect;
            self.state.hint_visible = true;
            tracing::debug!(index = self.state.current_question_index, "incorrect answer");
        }
        Ok(self.snapshot())
    }

    pub fn advance(&mut self) -> Result<QuizState> {
        if self.state.is_finished {
            return Err(self.reject("advance", QuizError::Finished));
        }
        if self.state.last_feedback != Feedback::Correct {
            return Err(self.reject("advance", QuizError::NotCorrect));
        }
        self.advance_unchecked();
        Ok(self.snapshot())
    }

    fn advance_unchecked(&mut self) {
        if self.state.current_question_index + 1 < self.content.len() {
            self.state.current_question_index += 1;
            self.state.user_answer_text.clear();
            self.state.last_feedback = Feedback::None;
            self.state.hint_visible = false;
        } else {
            self.state.is_finished = true;
            tracing::debug!(
                score = self.state.score,
                total = self.content.len(),
                "quiz finished"
            );
        }
    }

    pub fn retry(&mut self) -> Result<QuizState> {
        if self.state.is_finished {
            return Err(self.reject("retry", QuizError::Finished));
        }
        if self.state.last_feedback != Feedback::Incorrect {
            return Err(self.reject("retry", QuizError::NotIncorrect));
        }
        self.state.user_answer_text.clear();
        self.state.last_feedback = Feedback::None;
        if self.options.retry_hint == RetryHintPolicy::Clear {
            self.state.hint_visible = false;
        }
        Ok(self.snapshot())
    }

    /// Unlock the bonus. Idempotent and valid in every state.
    pub fn on_shake_signal(&mut self) -> QuizState {
        if !self.state.bonus_unlocked {
            tracing::debug!("bonus unlocked");
        }
        self.state.bonus_unlocked = true;
        self.snapshot()
    }

    /// Image selection for the correct-answer screen; `None` otherwise.
    pub fn celebration(&self) -> Option<Celebration> {
        if self.state.last_feedback != Feedback::Correct {
            return None;
        }
        self.celebration_for(self.index())
    }

    /// Image selection for the item at `index`, given the current bonus state.
    /// Lets a front end render the screen of an item auto-advance already left.
    pub fn celebration_for(&self, index: usize) -> Option<Celebration> {
        let item = self.content.get(index)?;
        Some(match (&item.bonus_image, self.state.bonus_unlocked) {
            (Some(bonus), true) => Celebration {
                image: bonus.clone(),
                shake_prompt: false,
            },
            (bonus, _) => Celebration {
                image: item.image.clone(),
                shake_prompt: bonus.is_some(),
            },
        })
    }

    pub fn final_score(&self) -> Option<FinalScore> {
        self.state.is_finished.then(|| FinalScore {
            score: self.state.score,
            total: self.content.len(),
        })
    }

    fn reject(&self, intent: &str, err: QuizError) -> QuizError {
        tracing::warn!(
            intent,
            index = self.state.current_question_index,
            feedback = ?self.state.last_feedback,
            "rejected intent: {err}"
        );
        err
    }
}
