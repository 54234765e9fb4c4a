pub mod document;
pub mod error;
pub mod trace;

pub use document::{BUILTIN_QUIZ, Messages, QUIZ_ENV, QuizDocument};
pub use error::{ContentError, Result};
pub use trace::{load_trace, parse_trace};
