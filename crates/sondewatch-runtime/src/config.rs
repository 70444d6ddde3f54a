//! TOML configuration for the tracker daemon.
//!
//! Every field has a default, so a partial (or absent) config file
//! only overrides what it names. Sections mirror the way operators
//! think about the setup: where the station is, how tracking behaves,
//! how the map is rendered, and where the outputs go.

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use sondewatch_core::tracker::TrackerSettings;
use sondewatch_core::url::{DEFAULT_BASE_URL, MapUrl};
use sondewatch_telemetry::DEFAULT_API_BASE;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse config file: {0}")]
    Parse(#[from] toml::de::Error),
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub location: LocationConfig,
    pub tracking: TrackingConfig,
    pub sondehub: SondehubConfig,
    pub application: ApplicationConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LocationConfig {
    pub station_lat: f64,
    pub station_lon: f64,
    pub sonde_max_miles: f64,
}

impl Default for LocationConfig {
    fn default() -> Self {
        let s = TrackerSettings::default();
        Self {
            station_lat: s.station_lat,
            station_lon: s.station_lon,
            sonde_max_miles: s.sonde_max_miles,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrackingConfig {
    pub sonde_timeout_secs: u64,
    pub sonde_dwell_secs: u64,
    pub follow: bool,
    pub follow_miles: f64,
}

impl Default for TrackingConfig {
    fn default() -> Self {
        let s = TrackerSettings::default();
        Self {
            sonde_timeout_secs: s.sonde_timeout_secs,
            sonde_dwell_secs: s.sonde_dwell_secs,
            follow: s.follow,
            follow_miles: s.follow_miles,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SondehubConfig {
    pub map_zoom: u8,
    pub history: String,
    pub base_url: String,
    pub api_base: String,
}

impl Default for SondehubConfig {
    fn default() -> Self {
        Self {
            map_zoom: 9,
            history: "3h".to_string(),
            base_url: DEFAULT_BASE_URL.to_string(),
            api_base: DEFAULT_API_BASE.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ApplicationConfig {
    /// Text file the current map URL is published to.
    pub url_file: String,
    /// Directory for daily-rolling log files. Logs go to stderr when unset.
    pub log_dir: Option<String>,
}

impl Default for ApplicationConfig {
    fn default() -> Self {
        Self {
            url_file: "sondehub_url.txt".to_string(),
            log_dir: None,
        }
    }
}

impl Config {
    /// Load from a TOML file. A missing file yields the defaults; a
    /// present-but-invalid file is an error.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        if !path.exists() {
            tracing::info!("config file {} not found, using defaults", path.display());
            return Ok(Self::default());
        }
        let text = std::fs::read_to_string(path)?;
        Ok(toml::from_str(&text)?)
    }

    pub fn tracker_settings(&self) -> TrackerSettings {
        TrackerSettings {
            station_lat: self.location.station_lat,
            station_lon: self.location.station_lon,
            sonde_max_miles: self.location.sonde_max_miles,
            sonde_timeout_secs: self.tracking.sonde_timeout_secs,
            sonde_dwell_secs: self.tracking.sonde_dwell_secs,
            follow: self.tracking.follow,
            follow_miles: self.tracking.follow_miles,
        }
    }

    /// Map URL prototype with base/zoom/history from config.
    pub fn map_url(&self) -> MapUrl {
        MapUrl::new(
            self.sondehub.base_url.clone(),
            self.sondehub.map_zoom,
            self.sondehub.history.clone(),
        )
    }
}
