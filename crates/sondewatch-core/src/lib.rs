//! sondewatch-core: radiosonde tracking logic.
//! Telemetry frame type, great-circle distance, SondeHub map URL builder,
//! and the tracking state machine. Pure logic — no IO, no clocks.

pub mod geo;
pub mod tracker;
pub mod types;
pub mod url;

pub use geo::distance_miles;
pub use tracker::{Tracker, TrackerEvent, TrackerSettings, TrackingPhase};
pub use types::TelemetryFrame;
pub use url::MapUrl;
