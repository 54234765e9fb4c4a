/// Normalized magnitude a sample must exceed to count as a candidate shake.
pub const SHAKE_THRESHOLD_G: f64 = 2.7;

/// Minimum time between two accepted shakes (ms).
pub const SHAKE_DEBOUNCE_MS: u64 = 500;

/// Idle time after which the shake counter restarts on the next shake (ms).
pub const SHAKE_RESET_WINDOW_MS: u64 = 3000;

/// Standard gravity (m/s²), the platform `GRAVITY_EARTH` value.
pub const GRAVITY_EARTH: f64 = 9.806_65;
