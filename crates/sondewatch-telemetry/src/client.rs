//! TelemetryFetcher trait and SondeHubClient (reqwest HTTP wrapper).
//! Trait seam enables mock injection for poll-loop testing.

use std::collections::HashMap;

use sondewatch_core::TelemetryFrame;

use crate::error::TelemetryError;

pub const DEFAULT_API_BASE: &str = "https://api.v2.sondehub.org";

/// Only consider frames reported within the last hour; anything older
/// is a landed or out-of-range sonde the tracker should not chase.
const FRAME_WINDOW_SECS: u64 = 3600;

const MILES_TO_METERS: f64 = 1609.344;

/// Trait for fetching latest radiosonde telemetry. Enables mock
/// injection for testing the poll loop without network access.
pub trait TelemetryFetcher: Send + Sync {
    /// Latest frame per sonde within `radius_miles` of a point.
    fn latest_near(
        &self,
        lat: f64,
        lon: f64,
        radius_miles: f64,
    ) -> impl Future<Output = Result<Vec<TelemetryFrame>, TelemetryError>> + Send;

    /// Latest frame for a single sonde, if it reported recently.
    fn latest_for(
        &self,
        serial: &str,
    ) -> impl Future<Output = Result<Option<TelemetryFrame>, TelemetryError>> + Send;
}

/// Real SondeHub client against the v2 REST API.
pub struct SondeHubClient {
    http: reqwest::Client,
    api_base: String,
}

impl SondeHubClient {
    pub fn new(api_base: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            api_base: api_base.into(),
        }
    }

    async fn fetch_sondes(&self, query: &[(&str, String)]) -> Result<Vec<TelemetryFrame>, TelemetryError> {
        let body = self
            .http
            .get(format!("{}/sondes", self.api_base))
            .query(query)
            .send()
            .await?
            .error_for_status()?
            .text()
            .await?;
        parse_sondes(&body)
    }
}

impl Default for SondeHubClient {
    fn default() -> Self {
        Self::new(DEFAULT_API_BASE)
    }
}

impl TelemetryFetcher for SondeHubClient {
    async fn latest_near(
        &self,
        lat: f64,
        lon: f64,
        radius_miles: f64,
    ) -> Result<Vec<TelemetryFrame>, TelemetryError> {
        let distance_m = (radius_miles * MILES_TO_METERS).round() as u64;
        self.fetch_sondes(&[
            ("lat", lat.to_string()),
            ("lon", lon.to_string()),
            ("distance", distance_m.to_string()),
            ("last", FRAME_WINDOW_SECS.to_string()),
        ])
        .await
    }

    async fn latest_for(&self, serial: &str) -> Result<Option<TelemetryFrame>, TelemetryError> {
        let frames = self
            .fetch_sondes(&[
                ("serial", serial.to_string()),
                ("last", FRAME_WINDOW_SECS.to_string()),
            ])
            .await?;
        Ok(frames.into_iter().find(|f| f.serial == serial))
    }
}

/// Parse a `/sondes` response: a JSON object keyed by serial. Entries
/// that fail to parse (partial frames without a position) are skipped
/// rather than failing the whole poll.
fn parse_sondes(body: &str) -> Result<Vec<TelemetryFrame>, TelemetryError> {
    let raw: HashMap<String, serde_json::Value> = serde_json::from_str(body)?;
    let mut frames = Vec::with_capacity(raw.len());
    for (serial, value) in raw {
        match serde_json::from_value::<TelemetryFrame>(value) {
            Ok(frame) => frames.push(frame),
            Err(e) => tracing::debug!("skipping unparseable frame for {serial}: {e}"),
        }
    }
    Ok(frames)
}
