//! Radiosonde tracking state machine.
//!
//! Pure and testable: no IO, no async, timestamps passed in by the
//! caller. The runtime poll loop feeds telemetry frames and periodic
//! ticks; emitted events tell it what to log and which map URL to
//! publish.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::geo::distance_miles;
use crate::types::TelemetryFrame;
use crate::url::MapUrl;

// ─── Settings ─────────────────────────────────────────────────────

/// Station location and tracking thresholds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrackerSettings {
    /// Latitude of the observer station in decimal degrees.
    pub station_lat: f64,
    /// Longitude of the observer station in decimal degrees.
    pub station_lon: f64,
    /// A sonde within this distance of the station is acquired (default 50.0).
    pub sonde_max_miles: f64,
    /// Telemetry silence before the tracked sonde is considered lost (default 180).
    pub sonde_timeout_secs: u64,
    /// How long to dwell on a lost sonde before searching again (default 1800).
    pub sonde_dwell_secs: u64,
    /// Re-center the map as the tracked sonde drifts (default true).
    pub follow: bool,
    /// Drift from the current map center that triggers a re-center (default 40.0).
    pub follow_miles: f64,
}

impl Default for TrackerSettings {
    fn default() -> Self {
        Self {
            station_lat: 39.421177,
            station_lon: -83.821146,
            sonde_max_miles: 50.0,
            sonde_timeout_secs: 180,
            sonde_dwell_secs: 1800,
            follow: true,
            follow_miles: 40.0,
        }
    }
}

// ─── Phase & Events ───────────────────────────────────────────────

/// Current phase of the tracker state machine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum TrackingPhase {
    /// No sonde in range; every nearby frame is an acquisition candidate.
    Searching,
    /// Locked onto one sonde; only frames with a matching serial count.
    Tracking {
        serial: String,
        /// When live telemetry was last seen, by our clock. Drives the
        /// timeout into Dwell.
        last_frame_at: DateTime<Utc>,
        /// Reported time of the newest frame seen. The REST API keeps
        /// serving a landed sonde's final frame, so a frame only counts
        /// as live if its reported time moves forward.
        last_frame_time: Option<DateTime<Utc>>,
    },
    /// Telemetry lost; keep the map on the last sonde for a while before
    /// falling back to the station view. New nearby sondes may still be
    /// acquired during dwell.
    Dwell { since: DateTime<Utc> },
}

/// State transition emitted by [`Tracker::on_frame`] / [`Tracker::on_tick`].
///
/// Variants carrying a `url` ask the caller to publish it.
#[derive(Debug, Clone, PartialEq)]
pub enum TrackerEvent {
    /// A sonde entered acquisition range.
    Acquired {
        serial: String,
        distance_miles: f64,
        url: String,
    },
    /// The tracked sonde drifted past the follow threshold; the map
    /// center moved to the midpoint between the old center and the sonde.
    Recentered {
        serial: String,
        distance_miles: f64,
        url: String,
    },
    /// Telemetry timeout while tracking. No URL: the map stays on the
    /// lost sonde through the dwell period.
    TelemetryLost { serial: String },
    /// Dwell period over; back to the station-centered search view.
    DwellExpired { url: String },
}

// ─── Tracker ──────────────────────────────────────────────────────

/// The tracking state machine. Owns the map center, which starts at the
/// station and follows the tracked sonde in follow mode.
#[derive(Debug, Clone)]
pub struct Tracker {
    settings: TrackerSettings,
    /// URL prototype carrying base/zoom/history; center and serial are
    /// filled in per event.
    url: MapUrl,
    center: (f64, f64),
    phase: TrackingPhase,
}

impl Tracker {
    pub fn new(settings: TrackerSettings, url: MapUrl) -> Self {
        let center = (settings.station_lat, settings.station_lon);
        Self {
            settings,
            url,
            center,
            phase: TrackingPhase::Searching,
        }
    }

    pub fn phase(&self) -> &TrackingPhase {
        &self.phase
    }

    pub fn settings(&self) -> &TrackerSettings {
        &self.settings
    }

    /// Serial of the sonde currently being tracked, if any.
    pub fn tracked_serial(&self) -> Option<&str> {
        match &self.phase {
            TrackingPhase::Tracking { serial, .. } => Some(serial),
            _ => None,
        }
    }

    /// Station-centered URL with no serial filter. Published on startup
    /// and when a dwell period expires.
    pub fn default_url(&self) -> String {
        self.url.clone().with_center(self.center.0, self.center.1).build()
    }

    fn home(&self) -> (f64, f64) {
        (self.settings.station_lat, self.settings.station_lon)
    }

    fn url_for(&self, serial: &str) -> String {
        self.url
            .clone()
            .with_center(self.center.0, self.center.1)
            .with_serial(serial)
            .build()
    }

    /// True if the frame's reported time is too old to count as live
    /// telemetry. Frames without a reported time are taken at face value.
    fn is_stale(&self, frame: &TelemetryFrame, now: DateTime<Utc>) -> bool {
        match frame.frame_time {
            Some(t) => (now - t).num_seconds() >= self.settings.sonde_timeout_secs as i64,
            None => false,
        }
    }

    /// Feed one telemetry frame into the state machine.
    pub fn on_frame(&mut self, frame: &TelemetryFrame, now: DateTime<Utc>) -> Option<TrackerEvent> {
        match self.phase.clone() {
            TrackingPhase::Tracking {
                serial,
                last_frame_time,
                ..
            } => {
                if frame.serial != serial {
                    // Stale backlog from the previous subscription; ignore.
                    return None;
                }
                // A replayed frame (reported time not moving forward) is
                // not live telemetry and must not hold off the timeout.
                if let (Some(seen), Some(t)) = (last_frame_time, frame.frame_time)
                    && t <= seen
                {
                    return None;
                }
                self.phase = TrackingPhase::Tracking {
                    serial: serial.clone(),
                    last_frame_at: now,
                    last_frame_time: frame.frame_time.or(last_frame_time),
                };
                if !self.settings.follow {
                    return None;
                }
                let drift = distance_miles(self.center, frame.position());
                if drift < self.settings.follow_miles {
                    return None;
                }
                self.center = (
                    (self.center.0 + frame.lat) / 2.0,
                    (self.center.1 + frame.lon) / 2.0,
                );
                Some(TrackerEvent::Recentered {
                    url: self.url_for(&serial),
                    serial,
                    distance_miles: drift,
                })
            }
            TrackingPhase::Searching | TrackingPhase::Dwell { .. } => {
                // Landed sondes linger in the API's frame window; only a
                // recently reported frame is an acquisition candidate.
                if self.is_stale(frame, now) {
                    return None;
                }
                let distance = distance_miles(self.home(), frame.position());
                if distance > self.settings.sonde_max_miles {
                    return None;
                }
                self.phase = TrackingPhase::Tracking {
                    serial: frame.serial.clone(),
                    last_frame_at: now,
                    last_frame_time: frame.frame_time,
                };
                Some(TrackerEvent::Acquired {
                    url: self.url_for(&frame.serial),
                    serial: frame.serial.clone(),
                    distance_miles: distance,
                })
            }
        }
    }

    /// Advance timeouts. Called once per poll tick.
    pub fn on_tick(&mut self, now: DateTime<Utc>) -> Option<TrackerEvent> {
        match self.phase.clone() {
            TrackingPhase::Tracking {
                serial,
                last_frame_at,
                ..
            } => {
                let silence = (now - last_frame_at).num_seconds();
                if silence < self.settings.sonde_timeout_secs as i64 {
                    return None;
                }
                self.phase = TrackingPhase::Dwell { since: now };
                self.center = self.home();
                Some(TrackerEvent::TelemetryLost { serial })
            }
            TrackingPhase::Dwell { since } => {
                let dwelled = (now - since).num_seconds();
                if dwelled < self.settings.sonde_dwell_secs as i64 {
                    return None;
                }
                self.phase = TrackingPhase::Searching;
                Some(TrackerEvent::DwellExpired {
                    url: self.default_url(),
                })
            }
            TrackingPhase::Searching => None,
        }
    }
}

// ─── Tests ────────────────────────────────────────────────────────
