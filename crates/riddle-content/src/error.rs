use std::fmt;
use std::path::PathBuf;

use riddle_core::QuizError;

#[derive(Debug)]
pub enum ContentError {
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    Toml(toml::de::Error),
    Trace {
        line: usize,
        source: serde_json::Error,
    },
    Quiz(QuizError),
    InvalidData(String),
}

impl fmt::Display for ContentError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ContentError::Io { path, source } => {
                write!(f, "failed to read {}: {source}", path.display())
            }
            ContentError::Toml(e) => write!(f, "invalid quiz document: {e}"),
            ContentError::Trace { line, source } => {
                write!(f, "invalid trace sample on line {line}: {source}")
            }
            ContentError::Quiz(e) => write!(f, "invalid quiz content: {e}"),
            ContentError::InvalidData(msg) => write!(f, "invalid data: {msg}"),
        }
    }
}

impl std::error::Error for ContentError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ContentError::Io { source, .. } => Some(source),
            ContentError::Toml(e) => Some(e),
            ContentError::Trace { source, .. } => Some(source),
            ContentError::Quiz(e) => Some(e),
            ContentError::InvalidData(_) => None,
        }
    }
}

impl From<toml::de::Error> for ContentError {
    fn from(e: toml::de::Error) -> Self {
        ContentError::Toml(e)
    }
}

impl From<QuizError> for ContentError {
    fn from(e: QuizError) -> Self {
        ContentError::Quiz(e)
    }
}

pub type Result<T> = std::result::Result<T, ContentError>;
