use serde::{Deserialize, Serialize};

/// One accelerometer reading in m/s², stamped in milliseconds.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct AccelerationSample {
    pub x: f64,
    pub y: f64,
    pub z: f64,
    pub timestamp_ms: u64,
}

impl AccelerationSample {
    pub fn new(x: f64, y: f64, z: f64, timestamp_ms: u64) -> Self {
        Self {
            x,
            y,
            z,
            timestamp_ms,
        }
    }

    /// Device lying flat: gravity on the z axis only.
    pub fn at_rest(gravity: f64, timestamp_ms: u64) -> Self {
        Self::new(0.0, 0.0, gravity, timestamp_ms)
    }

    /// Euclidean norm of the gravity-normalized acceleration.
    /// Close to 1.0 when the device is not moving.
    pub fn g_force(&self, gravity: f64) -> f64 {
        let gx = self.x / gravity;
        let gy = self.y / gravity;
        let gz = self.z / gravity;
        (gx * gx + gy * gy + gz * gz).sqrt()
    }
}
