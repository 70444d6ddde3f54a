//! UrlFetcher trait and HttpUrlFetcher (reqwest GET wrapper).
//! Trait seam enables mock injection for poller testing.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("url fetch failed: {0}")]
    Http(#[from] reqwest::Error),
}

/// Trait for fetching the published URL text.
pub trait UrlFetcher: Send + Sync {
    fn fetch(&self) -> impl Future<Output = Result<String, FetchError>> + Send;
}

/// Real fetcher: HTTP GET of a fixed URL with caching disabled, so a
/// proxy or browser cache between us and the publisher never pins a
/// stale value.
pub struct HttpUrlFetcher {
    http: reqwest::Client,
    url: String,
}

impl HttpUrlFetcher {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            url: url.into(),
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

impl UrlFetcher for HttpUrlFetcher {
    async fn fetch(&self) -> Result<String, FetchError> {
        let body = self
            .http
            .get(&self.url)
            .header(reqwest::header::CACHE_CONTROL, "no-cache")
            .header(reqwest::header::PRAGMA, "no-cache")
            .send()
            .await?
            .error_for_status()?
            .text()
            .await?;
        Ok(body)
    }
}
