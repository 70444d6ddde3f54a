//! Error types for the telemetry backend.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum TelemetryError {
    #[error("telemetry request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("malformed telemetry payload: {0}")]
    Payload(#[from] serde_json::Error),
}
