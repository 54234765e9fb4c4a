//! Riddle quiz engine with a shake-gesture bonus.
//!
//! Two pieces, coupled only by a zero-argument callback: a `ShakeDetector`
//! that turns accelerometer samples into debounced shake events, and a
//! `QuizController` that owns question progression and the bonus flag.
//! `QuizSession` connects them across threads.
//!
//! Zero I/O: content arrives as values, samples arrive through `SampleSource`.

pub mod constants;
pub mod content;
pub mod error;
pub mod quiz;
pub mod sample;
pub mod sensor;
pub mod session;
pub mod shake;

pub use constants::{GRAVITY_EARTH, SHAKE_DEBOUNCE_MS, SHAKE_RESET_WINDOW_MS, SHAKE_THRESHOLD_G};
pub use content::{ImageRef, QuizContent, QuizItem, answers_match};
pub use error::{QuizError, Result};
pub use quiz::{
    AdvanceMode, Celebration, Feedback, FinalScore, QuizController, QuizOptions, QuizState,
    RetryHintPolicy,
};
pub use sample::AccelerationSample;
pub use sensor::{ManualFeed, SampleSink, SampleSource, Subscription};
pub use session::QuizSession;
pub use shake::{ShakeCallback, ShakeConfig, ShakeDetector, ShakeDetectorState};
