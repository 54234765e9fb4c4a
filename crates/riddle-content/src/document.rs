//! TOML quiz documents.
//!
//! A document carries the question list plus optional `[shake]`, `[options]`
//! and `[messages]` tables; every table and key except the questions falls
//! back to a default.

use std::path::{Path, PathBuf};
use std::{env, fs};

use riddle_core::{QuizContent, QuizItem, QuizOptions, ShakeConfig};
use serde::Deserialize;

use crate::error::{ContentError, Result};

/// The quiz shipped with the binary.
pub const BUILTIN_QUIZ: &str = include_str!("default_quiz.toml");

/// Environment variable naming a quiz document to load.
pub const QUIZ_ENV: &str = "RIDDLE_QUIZ";

/// Presentation strings. Not consumed by the quiz engine itself.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Messages {
    pub correct: String,
    pub incorrect: String,
    pub shake_prompt: String,
    pub final_title: String,
    pub final_subtitle: String,
    pub final_image: Option<String>,
}

impl Default for Messages {
    fn default() -> Self {
        Self {
            correct: "Correct! On to the next one...".to_string(),
            incorrect: "Oops! Try again.".to_string(),
            shake_prompt: "Shake the phone for a surprise".to_string(),
            final_title: "Quiz complete!".to_string(),
            final_subtitle: String::new(),
            final_image: None,
        }
    }
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct RawDocument {
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    shake: ShakeConfig,
    #[serde(default)]
    options: QuizOptions,
    #[serde(default)]
    messages: Messages,
    #[serde(default, rename = "question")]
    questions: Vec<QuizItem>,
}

#[derive(Clone, Debug)]
pub struct QuizDocument {
    pub title: String,
    pub shake: ShakeConfig,
    pub options: QuizOptions,
    pub messages: Messages,
    pub content: QuizContent,
}

impl QuizDocument {
    pub fn from_toml_str(text: &str) -> Result<Self> {
        let raw: RawDocument = toml::from_str(text)?;
        validate_shake(&raw.shake)?;

        let questions: Vec<QuizItem> = raw
            .questions
            .into_iter()
            .map(|mut item| {
                item.answer = item.answer.trim().to_string();
                item
            })
            .collect();
        let content = QuizContent::new(questions)?;

        Ok(Self {
            title: raw.title.unwrap_or_else(|| "Riddle quiz".to_string()),
            shake: raw.shake,
            options: raw.options,
            messages: raw.messages,
            content,
        })
    }

    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path).map_err(|source| ContentError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let doc = Self::from_toml_str(&text)?;
        tracing::debug!(
            path = %path.display(),
            questions = doc.content.len(),
            "loaded quiz document"
        );
        Ok(doc)
    }

    pub fn builtin() -> Result<Self> {
        Self::from_toml_str(BUILTIN_QUIZ)
    }

    /// Pick the document to play.
    /// Priority: explicit path > `RIDDLE_QUIZ` env > built-in quiz.
    pub fn resolve(explicit: Option<&Path>) -> Result<Self> {
        if let Some(path) = explicit {
            return Self::load(path);
        }
        match env::var_os(QUIZ_ENV).filter(|v| !v.is_empty()) {
            Some(path) => Self::load(&PathBuf::from(path)),
            None => {
                tracing::debug!("using built-in quiz");
                Self::builtin()
            }
        }
    }
}

fn validate_shake(shake: &ShakeConfig) -> Result<()> {
    if !(shake.threshold_g.is_finite() && shake.threshold_g > 0.0) {
        return Err(ContentError::InvalidData(format!(
            "shake.threshold_g must be a positive number, got {}",
            shake.threshold_g
        )));
    }
    if !(shake.gravity.is_finite() && shake.gravity > 0.0) {
        return Err(ContentError::InvalidData(format!(
            "shake.gravity must be a positive number, got {}",
            shake.gravity
        )));
    }
    Ok(())
}
