//! Recorded accelerometer traces.
//!
//! JSON Lines, one `{"x":..,"y":..,"z":..,"timestamp_ms":..}` object per line.
//! Blank lines and lines starting with `#` are skipped.

use std::fs;
use std::path::Path;

use riddle_core::AccelerationSample;

use crate::error::{ContentError, Result};

pub fn parse_trace(text: &str) -> Result<Vec<AccelerationSample>> {
    let mut samples: Vec<AccelerationSample> = Vec::new();
    for (idx, line) in text.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let sample: AccelerationSample = serde_json::from_str(line)
            .map_err(|source| ContentError::Trace {
                line: idx + 1,
                source,
            })?;
        if let Some(prev) = samples.last()
            && sample.timestamp_ms < prev.timestamp_ms
        {
            tracing::warn!(
                line = idx + 1,
                timestamp_ms = sample.timestamp_ms,
                previous_ms = prev.timestamp_ms,
                "trace timestamp goes backwards"
            );
        }
        samples.push(sample);
    }
    Ok(samples)
}

pub fn load_trace(path: &Path) -> Result<Vec<AccelerationSample>> {
    let text = fs::read_to_string(path).map_err(|source| ContentError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let samples = parse_trace(&text)?;
    tracing::debug!(path = %path.display(), samples = samples.len(), "loaded trace");
    Ok(samples)
}
