use std::fmt;

/// Rejected intents and invalid content. A rejected intent leaves the quiz
/// state exactly as it was.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QuizError {
    /// `submit_answer` while the current answer is already judged.
    NotAnswerable,
    /// `advance` without a correct answer on screen.
    NotCorrect,
    /// `retry` without an incorrect answer on screen.
    NotIncorrect,
    /// Any progression intent after the last question.
    Finished,
    EmptyContent,
    LengthMismatch {
        questions: usize,
        answers: usize,
        hints: usize,
        images: usize,
    },
    BlankAnswer {
        index: usize,
    },
}

impl fmt::Display for QuizError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QuizError::NotAnswerable => write!(f, "answer already submitted for this question"),
            QuizError::NotCorrect => write!(f, "cannot advance without a correct answer"),
            QuizError::NotIncorrect => write!(f, "cannot retry without an incorrect answer"),
            QuizError::Finished => write!(f, "quiz is finished"),
            QuizError::EmptyContent => write!(f, "quiz has no questions"),
            QuizError::LengthMismatch {
                questions,
                answers,
                hints,
                images,
            } => write!(
                f,
                "content lists differ in length: {questions} questions, {answers} answers, \
                 {hints} hints, {images} images"
            ),
            QuizError::BlankAnswer { index } => write!(f, "question {index} has a blank answer"),
        }
    }
}

impl std::error::Error for QuizError {}

pub type Result<T> = std::result::Result<T, QuizError>;
