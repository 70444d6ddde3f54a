use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// ─── Telemetry ────────────────────────────────────────────────────

/// One radiosonde telemetry report as published by SondeHub.
///
/// Only the fields the tracker consumes are modeled; the live API
/// returns many more (frequency, type, uploader lists, ...) which
/// serde skips.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TelemetryFrame {
    pub serial: String,
    pub lat: f64,
    pub lon: f64,
    /// Altitude in meters, absent on some partial frames.
    #[serde(default)]
    pub alt: Option<f64>,
    /// Frame timestamp as reported by the sonde.
    #[serde(default, rename = "datetime")]
    pub frame_time: Option<DateTime<Utc>>,
}

impl TelemetryFrame {
    pub fn position(&self) -> (f64, f64) {
        (self.lat, self.lon)
    }
}
