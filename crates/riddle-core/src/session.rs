//! Wires the shake detector to the quiz controller.
//!
//! Sensor samples may arrive on a different thread than user intents, so both
//! halves sit behind mutexes. Lock order is detector then controller; intents
//! only ever take the controller lock.

use std::sync::{Arc, Mutex};

use crate::error::Result;
use crate::quiz::{QuizController, QuizState};
use crate::sample::AccelerationSample;
use crate::sensor::{SampleSource, Subscription, lock};
use crate::shake::{ShakeConfig, ShakeDetector, ShakeDetectorState};

pub struct QuizSession {
    controller: Arc<Mutex<QuizController>>,
    detector: Arc<Mutex<ShakeDetector>>,
    subscription: Option<Subscription>,
}

impl QuizSession {
    pub fn new(controller: QuizController, shake: ShakeConfig) -> Self {
        let controller = Arc::new(Mutex::new(controller));
        let target = Arc::clone(&controller);
        let detector = ShakeDetector::new(shake, move || {
            lock(&target).on_shake_signal();
        });
        Self {
            controller,
            detector: Arc::new(Mutex::new(detector)),
            subscription: None,
        }
    }

    /// Start receiving samples from `source`, replacing any previous feed.
    /// Detector state carries over from earlier attachments.
    pub fn attach(&mut self, source: &dyn SampleSource) {
        self.detach();
        let detector = Arc::clone(&self.detector);
        let subscription = source.subscribe(Box::new(move |sample: &AccelerationSample| {
            lock(&detector).on_sample(sample);
        }));
        self.subscription = Some(subscription);
        tracing::debug!("attached to sensor feed");
    }

    pub fn detach(&mut self) {
        if let Some(subscription) = self.subscription.take() {
            subscription.unsubscribe();
            tracing::debug!("detached from sensor feed");
        }
    }

    pub fn is_attached(&self) -> bool {
        self.subscription.is_some()
    }

    /// Feed a sample directly, bypassing any attached source.
    pub fn on_sample(&self, sample: &AccelerationSample) -> bool {
        lock(&self.detector).on_sample(sample)
    }

    pub fn submit_answer(&self, text: &str) -> Result<QuizState> {
        lock(&self.controller).submit_answer(text)
    }

    pub fn advance(&self) -> Result<QuizState> {
        lock(&self.controller).advance()
    }

    pub fn retry(&self) -> Result<QuizState> {
        lock(&self.controller).retry()
    }

    pub fn on_shake_signal(&self) -> QuizState {
        lock(&self.controller).on_shake_signal()
    }

    pub fn snapshot(&self) -> QuizState {
        lock(&self.controller).snapshot()
    }

    /// Read-only access to the controller for derived views.
    pub fn with_controller<R>(&self, f: impl FnOnce(&QuizController) -> R) -> R {
        f(&lock(&self.controller))
    }

    pub fn shake_state(&self) -> ShakeDetectorState {
        lock(&self.detector).state()
    }
}

impl Drop for QuizSession {
    fn drop(&mut self) {
        self.detach();
    }
}
