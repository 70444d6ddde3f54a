//! sondewatch-telemetry: SondeHub live-data IO boundary.
//! Fetches latest telemetry frames from the SondeHub v2 REST API.
//! No tracking logic — pure IO boundary.

pub mod client;
pub mod error;

pub use client::{DEFAULT_API_BASE, SondeHubClient, TelemetryFetcher};
pub use error::TelemetryError;
