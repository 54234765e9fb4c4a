//! Shake-gesture detection.
//!
//! Turns a stream of accelerometer samples into discrete shake events. Every
//! sample is judged on its own (no smoothing): a sample whose normalized
//! magnitude exceeds the threshold is a candidate, and a candidate is accepted
//! only if the previous accepted shake is at least `debounce_ms` old.
//! O(1) per sample, no allocation.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::constants::{GRAVITY_EARTH, SHAKE_DEBOUNCE_MS, SHAKE_RESET_WINDOW_MS, SHAKE_THRESHOLD_G};
use crate::sample::AccelerationSample;

/// Detector tuning. Every field falls back to its default when omitted from a
/// deserialized document.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShakeConfig {
    pub threshold_g: f64,
    pub debounce_ms: u64,
    pub reset_window_ms: u64,
    pub gravity: f64,
}

impl Default for ShakeConfig {
    fn default() -> Self {
        Self {
            threshold_g: SHAKE_THRESHOLD_G,
            debounce_ms: SHAKE_DEBOUNCE_MS,
            reset_window_ms: SHAKE_RESET_WINDOW_MS,
            gravity: GRAVITY_EARTH,
        }
    }
}

/// Mutable detector state. Survives detach/reattach of the sensor feed.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShakeDetectorState {
    pub last_shake_timestamp_ms: u64,
    /// Diagnostic only: shakes accepted since the last reset window elapsed.
    pub shake_count: u32,
}

pub type ShakeCallback = Box<dyn FnMut() + Send>;

pub struct ShakeDetector {
    config: ShakeConfig,
    state: ShakeDetectorState,
    on_shake: ShakeCallback,
}

impl ShakeDetector {
    pub fn new(config: ShakeConfig, on_shake: impl FnMut() + Send + 'static) -> Self {
        Self {
            config,
            state: ShakeDetectorState::default(),
            on_shake: Box::new(on_shake),
        }
    }

    /// Detector that only reports through the return value of `on_sample`.
    pub fn silent(config: ShakeConfig) -> Self {
        Self::new(config, || {})
    }

    pub fn config(&self) -> &ShakeConfig {
        &self.config
    }

    pub fn state(&self) -> ShakeDetectorState {
        self.state
    }

    /// Feed one sample, normalizing with the configured gravity.
    pub fn on_sample(&mut self, sample: &AccelerationSample) -> bool {
        self.on_sample_with_gravity(sample, self.config.gravity)
    }

    /// Feed one sample. Returns true (and invokes the callback once) when the
    /// sample is accepted as a shake.
    pub fn on_sample_with_gravity(&mut self, sample: &AccelerationSample, gravity: f64) -> bool {
        // A negative gravity would square away in the magnitude.
        if !(gravity.is_finite() && gravity > 0.0) {
            return false;
        }
        let g_force = sample.g_force(gravity);

        // NaN and infinities never trigger.
        if !(g_force.is_finite() && g_force > self.config.threshold_g) {
            return false;
        }

        let now = sample.timestamp_ms;
        let last = self.state.last_shake_timestamp_ms;

        if last.saturating_add(self.config.debounce_ms) > now {
            return false;
        }

        // Compared against the previous shake, before it is overwritten.
        if now.saturating_sub(last) >= self.config.reset_window_ms {
            self.state.shake_count = 0;
        }

        self.state.last_shake_timestamp_ms = now;
        self.state.shake_count = self.state.shake_count.saturating_add(1);
        tracing::debug!(
            timestamp_ms = now,
            count = self.state.shake_count,
            g_force,
            "shake detected"
        );

        (self.on_shake)();
        true
    }

    /// Feed a batch of samples, returning the timestamps of accepted shakes.
    pub fn on_samples<'a>(
        &mut self,
        samples: impl IntoIterator<Item = &'a AccelerationSample>,
    ) -> Vec<u64> {
        samples
            .into_iter()
            .filter(|s| self.on_sample(s))
            .map(|s| s.timestamp_ms)
            .collect()
    }
}

impl fmt::Debug for ShakeDetector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ShakeDetector")
            .field("config", &self.config)
            .field("state", &self.state)
            .finish_non_exhaustive()
    }
}
