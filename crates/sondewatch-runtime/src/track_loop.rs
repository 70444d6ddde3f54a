//! Tracker poll loop: wires telemetry → tracker → URL publisher.
//! Runs as a tokio task, polling SondeHub at configurable intervals.

use std::path::PathBuf;

use chrono::Utc;
use tokio::time::{Duration, interval};

use sondewatch_core::{Tracker, TrackerEvent};
use sondewatch_telemetry::TelemetryFetcher;

use crate::cli::TrackOpts;
use crate::config::Config;

// ─── Publisher ──────────────────────────────────────────────────────

/// Writes the current map URL to the published text file, value plus
/// trailing newline, rewriting the whole file each time.
pub struct UrlPublisher {
    path: PathBuf,
}

impl UrlPublisher {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn publish(&self, url: &str) -> std::io::Result<()> {
        std::fs::write(&self.path, format!("{url}\n"))
    }
}

// ─── Daemon ─────────────────────────────────────────────────────────

/// Run the tracker daemon: publishes the initial station URL, starts
/// the poll loop, waits for shutdown signal.
pub async fn run_daemon<F>(opts: TrackOpts, config: Config, fetcher: F) -> anyhow::Result<()>
where
    F: TelemetryFetcher + 'static,
{
    let tracker = Tracker::new(config.tracker_settings(), config.map_url());
    let publisher = UrlPublisher::new(&config.application.url_file);

    tracing::info!("searching for radiosonde");
    let url = tracker.default_url();
    tracing::info!("{url}");
    publisher.publish(&url)?;

    let poll_handle = tokio::spawn(run_poll_loop(
        fetcher,
        tracker,
        publisher,
        opts.poll_interval_secs,
    ));

    // Wait for shutdown signal (ctrl-c or SIGTERM)
    let shutdown = async {
        let ctrl_c = tokio::signal::ctrl_c();

        #[cfg(unix)]
        {
            let mut sigterm =
                tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
                    .expect("failed to register SIGTERM handler");
            tokio::select! {
                _ = ctrl_c => tracing::info!("received ctrl-c, shutting down"),
                _ = sigterm.recv() => tracing::info!("received SIGTERM, shutting down"),
            }
        }

        #[cfg(not(unix))]
        {
            ctrl_c.await.ok();
            tracing::info!("received ctrl-c, shutting down");
        }
    };

    tokio::select! {
        () = shutdown => {}
        _ = poll_handle => {
            tracing::warn!("poll loop exited unexpectedly");
        }
    }

    tracing::info!("tracker stopped");
    Ok(())
}

async fn run_poll_loop<F: TelemetryFetcher>(
    fetcher: F,
    mut tracker: Tracker,
    publisher: UrlPublisher,
    poll_secs: u64,
) {
    let mut ticker = interval(Duration::from_secs(poll_secs));

    loop {
        ticker.tick().await;

        if let Err(e) = poll_tick(&fetcher, &mut tracker, &publisher).await {
            tracing::warn!("poll tick failed: {e}");
        }
    }
}

/// One poll cycle: fetch telemetry for the current phase, feed every
/// frame and the tick into the tracker, act on emitted events.
async fn poll_tick<F: TelemetryFetcher>(
    fetcher: &F,
    tracker: &mut Tracker,
    publisher: &UrlPublisher,
) -> anyhow::Result<()> {
    let now = Utc::now();

    // While tracking, only the locked serial matters; otherwise scan
    // the acquisition radius around the station.
    let frames = match tracker.tracked_serial() {
        Some(serial) => fetcher.latest_for(serial).await?.into_iter().collect(),
        None => {
            let s = tracker.settings();
            fetcher
                .latest_near(s.station_lat, s.station_lon, s.sonde_max_miles)
                .await?
        }
    };

    for frame in &frames {
        if let Some(event) = tracker.on_frame(frame, now) {
            handle_event(event, publisher)?;
        }
    }

    if let Some(event) = tracker.on_tick(now) {
        handle_event(event, publisher)?;
    }

    Ok(())
}

fn handle_event(event: TrackerEvent, publisher: &UrlPublisher) -> std::io::Result<()> {
    match event {
        TrackerEvent::Acquired {
            serial,
            distance_miles,
            url,
        } => {
            tracing::info!("found radiosonde {serial} at {distance_miles:.1} miles");
            tracing::info!("{url}");
            publisher.publish(&url)?;
        }
        TrackerEvent::Recentered {
            distance_miles,
            url,
            ..
        } => {
            tracing::info!("radiosonde distance {distance_miles:.1} miles, re-centering map");
            tracing::info!("{url}");
            publisher.publish(&url)?;
        }
        TrackerEvent::TelemetryLost { serial } => {
            tracing::info!("telemetry timeout for {serial}, starting dwell");
        }
        TrackerEvent::DwellExpired { url } => {
            tracing::info!("dwell timeout, searching for radiosonde");
            tracing::info!("{url}");
            publisher.publish(&url)?;
        }
    }
    Ok(())
}

// ─── Tests ──────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    use sondewatch_core::{MapUrl, TelemetryFrame, TrackerSettings};
    use sondewatch_telemetry::TelemetryError;

    /// Fetcher serving fixed frames: `near` while searching, `tracked`
    /// while locked on. Records which serials were queried.
    struct FixedFetcher {
        near: Vec<TelemetryFrame>,
        tracked: Option<TelemetryFrame>,
        queried_serials: Mutex<Vec<String>>,
    }

    impl TelemetryFetcher for FixedFetcher {
        async fn latest_near(
            &self,
            _lat: f64,
            _lon: f64,
            _radius_miles: f64,
        ) -> Result<Vec<TelemetryFrame>, TelemetryError> {
            Ok(self.near.clone())
        }

        async fn latest_for(
            &self,
            serial: &str,
        ) -> Result<Option<TelemetryFrame>, TelemetryError> {
            self.queried_serials
                .lock()
                .expect("lock")
                .push(serial.to_string());
            Ok(self.tracked.clone().filter(|f| f.serial == serial))
        }
    }

    fn frame(serial: &str, lat: f64, lon: f64) -> TelemetryFrame {
        TelemetryFrame {
            serial: serial.to_string(),
            lat,
            lon,
            alt: None,
            frame_time: None,
        }
    }

    fn publisher_in_tempdir(dir: &tempfile::TempDir) -> UrlPublisher {
        UrlPublisher::new(dir.path().join("sondehub_url.txt"))
    }

    #[test]
    fn publisher_writes_value_plus_newline() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("sondehub_url.txt");
        let publisher = UrlPublisher::new(&path);

        publisher.publish("https://example.org/a").expect("publish");
        assert_eq!(
            std::fs::read_to_string(&path).expect("read"),
            "https://example.org/a\n"
        );

        // Full rewrite, not append.
        publisher.publish("https://example.org/b").expect("publish");
        assert_eq!(
            std::fs::read_to_string(&path).expect("read"),
            "https://example.org/b\n"
        );
    }

    #[tokio::test]
    async fn tick_acquires_nearby_sonde_and_publishes() {
        let dir = tempfile::tempdir().expect("tempdir");
        let publisher = publisher_in_tempdir(&dir);
        let fetcher = FixedFetcher {
            near: vec![frame("V1111111", 39.5, -83.8)],
            tracked: None,
            queried_serials: Mutex::new(Vec::new()),
        };
        let mut tracker = Tracker::new(TrackerSettings::default(), MapUrl::default());

        poll_tick(&fetcher, &mut tracker, &publisher).await.expect("tick");

        assert_eq!(tracker.tracked_serial(), Some("V1111111"));
        let published =
            std::fs::read_to_string(dir.path().join("sondehub_url.txt")).expect("read");
        assert!(published.contains("&f=V1111111&q=V1111111"));
        assert!(published.ends_with('\n'));
    }

    #[tokio::test]
    async fn tick_queries_by_serial_while_tracking() {
        let dir = tempfile::tempdir().expect("tempdir");
        let publisher = publisher_in_tempdir(&dir);
        let fetcher = FixedFetcher {
            near: vec![frame("V1111111", 39.5, -83.8)],
            tracked: Some(frame("V1111111", 39.51, -83.8)),
            queried_serials: Mutex::new(Vec::new()),
        };
        let mut tracker = Tracker::new(TrackerSettings::default(), MapUrl::default());

        // First tick acquires from the area scan, second polls the serial.
        poll_tick(&fetcher, &mut tracker, &publisher).await.expect("tick");
        poll_tick(&fetcher, &mut tracker, &publisher).await.expect("tick");

        assert_eq!(
            *fetcher.queried_serials.lock().expect("lock"),
            vec!["V1111111"]
        );
    }

    #[tokio::test]
    async fn tick_with_no_nearby_sondes_publishes_nothing() {
        let dir = tempfile::tempdir().expect("tempdir");
        let publisher = publisher_in_tempdir(&dir);
        let fetcher = FixedFetcher {
            near: Vec::new(),
            tracked: None,
            queried_serials: Mutex::new(Vec::new()),
        };
        let mut tracker = Tracker::new(TrackerSettings::default(), MapUrl::default());

        poll_tick(&fetcher, &mut tracker, &publisher).await.expect("tick");

        assert_eq!(tracker.tracked_serial(), None);
        assert!(!dir.path().join("sondehub_url.txt").exists());
    }
}
