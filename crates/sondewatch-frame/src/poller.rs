//! The frame poller: periodic fetch-and-update of the display source.
//!
//! Schedule mirrors the original page behavior: one fetch immediately,
//! a startup delay while the initially loaded map settles, then a
//! steady polling interval forever.

use std::time::Duration;

use crate::fetch::UrlFetcher;
use crate::target::DisplayTarget;

/// Initial source shown before the first successful differing fetch.
pub const DEFAULT_SOURCE: &str = "https://tracker.sondehub.org";

/// Delay between the startup fetch and the first periodic fetch.
pub const DEFAULT_STARTUP_DELAY: Duration = Duration::from_secs(30);

/// Steady-state polling interval.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(10);

/// Polls a `UrlFetcher` and redirects a `DisplayTarget` whenever the
/// fetched value is non-empty and differs from the current source.
pub struct FramePoller<F, T> {
    fetcher: F,
    target: T,
    current: String,
}

impl<F: UrlFetcher, T: DisplayTarget> FramePoller<F, T> {
    pub fn new(fetcher: F, target: T, initial: impl Into<String>) -> Self {
        Self {
            fetcher,
            target,
            current: initial.into(),
        }
    }

    /// The last-known source URL.
    pub fn current(&self) -> &str {
        &self.current
    }

    /// One poll cycle. Returns true if the target was redirected.
    ///
    /// Empty bodies and unchanged values are no-ops. Fetch failures are
    /// swallowed — the display keeps its current source and the next
    /// cycle tries again.
    pub async fn fetch_once(&mut self) -> bool {
        let body = match self.fetcher.fetch().await {
            Ok(body) => body,
            Err(e) => {
                tracing::debug!("frame fetch failed: {e}");
                return false;
            }
        };
        // The publisher writes the value with a trailing newline.
        let value = body.trim();
        if value.is_empty() || value == self.current {
            return false;
        }
        self.current = value.to_string();
        tracing::info!("frame source changed: {}", self.current);
        self.target.set_source(&self.current);
        true
    }

    /// Poll forever: immediate fetch, startup delay, then fixed-interval
    /// fetches. Returns only on process teardown.
    pub async fn run(mut self, startup_delay: Duration, poll_interval: Duration) {
        self.fetch_once().await;
        tokio::time::sleep(startup_delay).await;
        let start = tokio::time::Instant::now() + poll_interval;
        let mut ticker = tokio::time::interval_at(start, poll_interval);
        loop {
            ticker.tick().await;
            self.fetch_once().await;
        }
    }
}

// ─── Tests ────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fetch::FetchError;
    use std::collections::VecDeque;
    use std::sync::{Arc, Mutex};

    /// Fetcher that replays a scripted sequence of responses and records
    /// the instant of each call.
    struct ScriptedFetcher {
        responses: Mutex<VecDeque<Result<String, FetchError>>>,
        calls: Arc<Mutex<Vec<tokio::time::Instant>>>,
    }

    impl ScriptedFetcher {
        fn new(responses: Vec<Result<String, FetchError>>) -> Self {
            Self {
                responses: Mutex::new(responses.into()),
                calls: Arc::new(Mutex::new(Vec::new())),
            }
        }
    }

    impl UrlFetcher for ScriptedFetcher {
        async fn fetch(&self) -> Result<String, FetchError> {
            self.calls.lock().expect("lock").push(tokio::time::Instant::now());
            self.responses
                .lock()
                .expect("lock")
                .pop_front()
                .unwrap_or_else(|| Ok(String::new()))
        }
    }

    /// Target that records every redirect.
    struct RecordingTarget {
        sources: Arc<Mutex<Vec<String>>>,
    }

    impl DisplayTarget for RecordingTarget {
        fn set_source(&mut self, url: &str) {
            self.sources.lock().expect("lock").push(url.to_string());
        }
    }

    fn recording_target() -> (RecordingTarget, Arc<Mutex<Vec<String>>>) {
        let sources = Arc::new(Mutex::new(Vec::new()));
        (
            RecordingTarget {
                sources: Arc::clone(&sources),
            },
            sources,
        )
    }

    fn http_error() -> FetchError {
        // Force a reqwest error without network access: invalid URL.
        FetchError::Http(reqwest::Client::new().get("http://[").build().expect_err("invalid url"))
    }

    #[tokio::test]
    async fn differing_value_redirects_exactly_once() {
        let fetcher = ScriptedFetcher::new(vec![Ok("https://example.org/a\n".to_string())]);
        let (target, sources) = recording_target();
        let mut poller = FramePoller::new(fetcher, target, DEFAULT_SOURCE);

        assert!(poller.fetch_once().await);
        assert_eq!(poller.current(), "https://example.org/a");
        assert_eq!(*sources.lock().expect("lock"), vec!["https://example.org/a"]);
    }

    #[tokio::test]
    async fn empty_body_is_a_no_op() {
        let fetcher = ScriptedFetcher::new(vec![Ok("\n".to_string())]);
        let (target, sources) = recording_target();
        let mut poller = FramePoller::new(fetcher, target, DEFAULT_SOURCE);

        assert!(!poller.fetch_once().await);
        assert_eq!(poller.current(), DEFAULT_SOURCE);
        assert!(sources.lock().expect("lock").is_empty());
    }

    #[tokio::test]
    async fn unchanged_value_is_a_no_op() {
        let fetcher = ScriptedFetcher::new(vec![Ok(format!("{DEFAULT_SOURCE}\n"))]);
        let (target, sources) = recording_target();
        let mut poller = FramePoller::new(fetcher, target, DEFAULT_SOURCE);

        assert!(!poller.fetch_once().await);
        assert!(sources.lock().expect("lock").is_empty());
    }

    #[tokio::test]
    async fn fetch_error_is_swallowed() {
        let fetcher = ScriptedFetcher::new(vec![
            Err(http_error()),
            Ok("https://example.org/b\n".to_string()),
        ]);
        let (target, sources) = recording_target();
        let mut poller = FramePoller::new(fetcher, target, DEFAULT_SOURCE);

        assert!(!poller.fetch_once().await);
        assert_eq!(poller.current(), DEFAULT_SOURCE);

        // Next cycle recovers without any special handling.
        assert!(poller.fetch_once().await);
        assert_eq!(*sources.lock().expect("lock"), vec!["https://example.org/b"]);
    }

    #[tokio::test]
    async fn repeated_changes_redirect_in_order() {
        let fetcher = ScriptedFetcher::new(vec![
            Ok("https://example.org/a\n".to_string()),
            Ok("https://example.org/a\n".to_string()),
            Ok("https://example.org/b\n".to_string()),
        ]);
        let (target, sources) = recording_target();
        let mut poller = FramePoller::new(fetcher, target, DEFAULT_SOURCE);

        assert!(poller.fetch_once().await);
        assert!(!poller.fetch_once().await);
        assert!(poller.fetch_once().await);
        assert_eq!(
            *sources.lock().expect("lock"),
            vec!["https://example.org/a", "https://example.org/b"]
        );
    }

    #[tokio::test(start_paused = true)]
    async fn run_fetches_at_start_then_after_delay_then_on_interval() {
        let fetcher = ScriptedFetcher::new(Vec::new());
        let calls = Arc::clone(&fetcher.calls);
        let (target, _sources) = recording_target();
        let poller = FramePoller::new(fetcher, target, DEFAULT_SOURCE);

        let t0 = tokio::time::Instant::now();

        // run() never returns; cut it off after 65 virtual seconds.
        let _ = tokio::time::timeout(
            Duration::from_secs(65),
            poller.run(DEFAULT_STARTUP_DELAY, DEFAULT_POLL_INTERVAL),
        )
        .await;

        let offsets: Vec<u64> = calls
            .lock()
            .expect("lock")
            .iter()
            .map(|t| t.duration_since(t0).as_secs())
            .collect();
        // t=0 immediately, then 30s delay + 10s interval: 40, 50, 60.
        assert_eq!(offsets, vec![0, 40, 50, 60]);
    }
}
