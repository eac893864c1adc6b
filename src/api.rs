//! HTTP text fetching with exponential backoff retry logic.
//!
//! Feed hosts are flaky (rate limits, transient 5xx, slow TLS handshakes), so
//! the collector never talks to them directly. It goes through a
//! [`FetchText`] implementation wrapped in [`RetryFetch`].
//!
//! # Architecture
//!
//! - [`FetchText`]: Core trait defining an async "GET this URL as text"
//! - [`HttpFetcher`]: Implementation on top of a shared `reqwest::Client`
//! - [`RetryFetch`]: Decorator that adds retry logic to any `FetchText` implementation
//!
//! # Retry Strategy
//!
//! - Exponential backoff starting at `base_delay`
//! - Maximum delay capped at 30 seconds
//! - Random jitter (0-250ms) added to prevent thundering herd

use rand::{Rng, rng};
use std::error::Error;
use std::fmt;
use std::time::{Duration as StdDuration, Instant};
use tokio::time::sleep;
use tracing::{error, instrument, warn};

/// Trait for async text retrieval.
pub trait FetchText {
    /// Fetch `url` and return the response body, or an error for transport
    /// failures and non-success statuses.
    async fn fetch_text(&self, url: &str) -> Result<String, Box<dyn Error>>;
}

/// Error for a response that arrived but was not a success.
#[derive(Debug)]
pub struct HttpStatusError {
    pub status: u16,
    pub url: String,
}

impl fmt::Display for HttpStatusError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "HTTP status {} for {}", self.status, self.url)
    }
}

impl Error for HttpStatusError {}

/// Plain `GET` through a shared client.
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: reqwest::Client,
}

impl HttpFetcher {
    pub fn new(client: reqwest::Client) -> Self {
        Self { client }
    }
}

impl FetchText for HttpFetcher {
    #[instrument(level = "debug", skip(self))]
    async fn fetch_text(&self, url: &str) -> Result<String, Box<dyn Error>> {
        let response = self.client.get(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(Box::new(HttpStatusError {
                status: status.as_u16(),
                url: url.to_string(),
            }));
        }
        Ok(response.text().await?)
    }
}

/// Wrapper that adds exponential backoff retry logic to any [`FetchText`] implementation.
///
/// The delay between retries follows this formula:
/// ```text
/// delay = min(base_delay * 2^(attempt-1), max_delay) + random_jitter(0..250ms)
/// ```
pub struct RetryFetch<T> {
    /// The underlying fetcher to wrap.
    inner: T,
    /// Maximum number of retry attempts before giving up.
    max_retries: usize,
    /// Initial delay between retries (doubles with each attempt).
    base_delay: StdDuration,
    /// Maximum delay cap to prevent excessive waiting.
    max_delay: StdDuration,
}

impl<T> RetryFetch<T>
where
    T: FetchText,
{
    /// Create a new retry wrapper around an existing [`FetchText`] implementation.
    ///
    /// # Example
    ///
    /// ```ignore
    /// let fetcher = RetryFetch::new(HttpFetcher::new(client), 2, Duration::from_secs(1));
    /// ```
    pub fn new(inner: T, max_retries: usize, base_delay: StdDuration) -> Self {
        Self {
            inner,
            max_retries,
            base_delay,
            max_delay: StdDuration::from_secs(30),
        }
    }

    fn backoff(&self, attempt: usize) -> StdDuration {
        let shift = (attempt - 1).min(16) as u32;
        let delay = self.base_delay.saturating_mul(1 << shift).min(self.max_delay);
        let jitter_ms: u64 = rng().random_range(0..=250);
        delay + StdDuration::from_millis(jitter_ms)
    }
}

impl<T> fmt::Debug for RetryFetch<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RetryFetch")
            .field("max_retries", &self.max_retries)
            .field("base_delay", &self.base_delay)
            .field("max_delay", &self.max_delay)
            .finish()
    }
}

impl<T> FetchText for RetryFetch<T>
where
    T: FetchText,
{
    #[instrument(level = "info", skip(self))]
    async fn fetch_text(&self, url: &str) -> Result<String, Box<dyn Error>> {
        let total_t0 = Instant::now();
        let mut attempt = 0usize;

        loop {
            let attempt_t0 = Instant::now();
            match self.inner.fetch_text(url).await {
                Ok(body) => return Ok(body),
                Err(e) => {
                    attempt += 1;
                    let attempt_dt = attempt_t0.elapsed();
                    let total_dt = total_t0.elapsed();

                    if attempt > self.max_retries {
                        error!(
                            attempt,
                            max = self.max_retries,
                            elapsed_ms_attempt = attempt_dt.as_millis() as u64,
                            elapsed_ms_total = total_dt.as_millis() as u64,
                            error = %e,
                            "fetch exhausted retries"
                        );
                        return Err(e);
                    }

                    let delay = self.backoff(attempt);
                    warn!(
                        attempt,
                        max = self.max_retries,
                        elapsed_ms_attempt = attempt_dt.as_millis() as u64,
                        ?delay,
                        error = %e,
                        "fetch attempt failed; backing off"
                    );
                    sleep(delay).await;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    /// Fails a fixed number of times, then succeeds.
    struct Flaky {
        failures_left: Cell<usize>,
        calls: Cell<usize>,
    }

    impl Flaky {
        fn new(failures: usize) -> Self {
            Self {
                failures_left: Cell::new(failures),
                calls: Cell::new(0),
            }
        }
    }

    impl FetchText for Flaky {
        async fn fetch_text(&self, _url: &str) -> Result<String, Box<dyn Error>> {
            self.calls.set(self.calls.get() + 1);
            if self.failures_left.get() > 0 {
                self.failures_left.set(self.failures_left.get() - 1);
                return Err(Box::new(HttpStatusError {
                    status: 503,
                    url: "http://feed".to_string(),
                }));
            }
            Ok("<rss/>".to_string())
        }
    }

    #[tokio::test]
    async fn test_retry_recovers_after_failures() {
        let api = RetryFetch::new(Flaky::new(2), 3, StdDuration::from_millis(1));
        let body = api.fetch_text("http://feed").await.unwrap();
        assert_eq!(body, "<rss/>");
        assert_eq!(api.inner.calls.get(), 3);
    }

    #[tokio::test]
    async fn test_retry_gives_up() {
        let api = RetryFetch::new(Flaky::new(10), 2, StdDuration::from_millis(1));
        let err = api.fetch_text("http://feed").await.unwrap_err();
        assert!(err.to_string().contains("503"));
        assert_eq!(api.inner.calls.get(), 3);
    }

    #[test]
    fn test_backoff_is_capped() {
        let api = RetryFetch::new(Flaky::new(0), 5, StdDuration::from_secs(1));
        assert!(api.backoff(1) < StdDuration::from_millis(1_251));
        assert!(api.backoff(1) >= StdDuration::from_secs(1));
        assert!(api.backoff(12) <= StdDuration::from_millis(30_250));
    }
}
