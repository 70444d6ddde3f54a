//! sondewatch-frame: the viewer-side frame poller.
//! Periodically fetches the published map URL text and redirects a
//! display target when the value changes. Best-effort only — fetch
//! failures are swallowed and the next tick tries again.

pub mod fetch;
pub mod poller;
pub mod target;

pub use fetch::{FetchError, HttpUrlFetcher, UrlFetcher};
pub use poller::{DEFAULT_POLL_INTERVAL, DEFAULT_SOURCE, DEFAULT_STARTUP_DELAY, FramePoller};
pub use target::{BrowserTarget, DisplayTarget, StdoutTarget};
