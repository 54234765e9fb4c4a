use serde::{Deserialize, Serialize};

use crate::error::{QuizError, Result};

/// Opaque handle to an image asset. The presentation layer resolves it.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ImageRef(pub String);

impl ImageRef {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct QuizItem {
    pub question: String,
    pub answer: String,
    pub hint: String,
    pub image: ImageRef,
    /// Shown instead of `image` once the shake bonus is unlocked.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bonus_image: Option<ImageRef>,
}

impl QuizItem {
    pub fn new(question: &str, answer: &str, hint: &str, image: &str) -> Self {
        Self {
            question: question.to_string(),
            answer: answer.to_string(),
            hint: hint.to_string(),
            image: ImageRef::new(image),
            bonus_image: None,
        }
    }

    pub fn with_bonus_image(mut self, image: &str) -> Self {
        self.bonus_image = Some(ImageRef::new(image));
        self
    }

    pub fn accepts(&self, text: &str) -> bool {
        answers_match(text, &self.answer)
    }
}

/// Case-insensitive exact match, ignoring surrounding whitespace.
pub fn answers_match(given: &str, expected: &str) -> bool {
    given.trim().to_lowercase() == expected.trim().to_lowercase()
}

/// Ordered, non-empty, immutable question list.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct QuizContent {
    items: Vec<QuizItem>,
}

impl QuizContent {
    pub fn new(items: Vec<QuizItem>) -> Result<Self> {
        if items.is_empty() {
            return Err(QuizError::EmptyContent);
        }
        if let Some(index) = items.iter().position(|i| i.answer.trim().is_empty()) {
            return Err(QuizError::BlankAnswer { index });
        }
        Ok(Self { items })
    }

    /// Build from parallel lists, one entry per question index.
    pub fn from_parallel(
        questions: Vec<String>,
        answers: Vec<String>,
        hints: Vec<String>,
        images: Vec<ImageRef>,
    ) -> Result<Self> {
        let n = questions.len();
        if answers.len() != n || hints.len() != n || images.len() != n {
            return Err(QuizError::LengthMismatch {
                questions: n,
                answers: answers.len(),
                hints: hints.len(),
                images: images.len(),
            });
        }
        let items = questions
            .into_iter()
            .zip(answers)
            .zip(hints)
            .zip(images)
            .map(|(((question, answer), hint), image)| QuizItem {
                question,
                answer,
                hint,
                image,
                bonus_image: None,
            })
            .collect();
        Self::new(items)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Always false for constructed content; present for API symmetry.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&QuizItem> {
        self.items.get(index)
    }

    pub fn items(&self) -> &[QuizItem] {
        &self.items
    }
}
