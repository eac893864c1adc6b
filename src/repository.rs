//! Per-date news loading with a fallback to embedded sample data.
//!
//! A [`NewsSource`] knows how to fetch `{key}.json` from somewhere (an HTTP
//! base URL or a local directory). [`NewsRepository`] wraps a source and turns
//! every failure into the fallback bundle, so callers always get data back.
//!
//! # Failure taxonomy
//!
//! | [`LoadError`] | Cause |
//! |---|---|
//! | `NotFound` | no file for that day / HTTP 404 |
//! | `Status` | any other non-success HTTP status |
//! | `Transport` | connection, I/O or body read failure |
//! | `Malformed` | the body is not a valid news bundle |
//!
//! All four collapse into one recovery path: log, then use the fallback.

use crate::dates::format_key;
use crate::fallback::fallback_bundle;
use crate::models::{LoadedNews, NewsBundle, Origin};
use crate::utils::truncate_for_log;
use chrono::NaiveDate;
use reqwest::StatusCode;
use std::error::Error;
use std::fmt;
use std::io;
use std::path::PathBuf;
use std::time::Duration;
use tokio::fs;
use tracing::{debug, info, instrument, warn};
use url::Url;

/// Why a per-date resource could not be turned into a [`NewsBundle`].
#[derive(Debug)]
pub enum LoadError {
    NotFound,
    Status(u16),
    Transport(String),
    Malformed(serde_json::Error),
}

impl fmt::Display for LoadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LoadError::NotFound => write!(f, "news file not found"),
            LoadError::Status(code) => write!(f, "unexpected status {code}"),
            LoadError::Transport(msg) => write!(f, "transport error: {msg}"),
            LoadError::Malformed(e) => write!(f, "malformed news file: {e}"),
        }
    }
}

impl Error for LoadError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            LoadError::Malformed(e) => Some(e),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for LoadError {
    fn from(e: reqwest::Error) -> Self {
        LoadError::Transport(e.to_string())
    }
}

impl From<io::Error> for LoadError {
    fn from(e: io::Error) -> Self {
        if e.kind() == io::ErrorKind::NotFound {
            LoadError::NotFound
        } else {
            LoadError::Transport(e.to_string())
        }
    }
}

/// Something that can load the news file for a date key.
pub trait NewsSource {
    /// Load and parse the bundle stored under `key` (`YYYY-MM-DD`).
    async fn load(&self, key: &str) -> Result<NewsBundle, LoadError>;
}

fn parse_bundle(key: &str, body: &str) -> Result<NewsBundle, LoadError> {
    serde_json::from_str(body).map_err(|e| {
        debug!(%key, body_preview = %truncate_for_log(body, 200), "News body did not parse");
        LoadError::Malformed(e)
    })
}

/// Loads `{base}/{key}.json` over HTTP(S).
#[derive(Debug, Clone)]
pub struct HttpSource {
    client: reqwest::Client,
    base: Url,
}

impl HttpSource {
    /// `base` is treated as a directory: a trailing `/` is added if missing so
    /// that joining `2026-01-27.json` keeps the last path segment.
    pub fn new(client: reqwest::Client, mut base: Url) -> Self {
        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }
        Self { client, base }
    }

    pub fn url_for(&self, key: &str) -> Result<Url, LoadError> {
        self.base
            .join(&format!("{key}.json"))
            .map_err(|e| LoadError::Transport(e.to_string()))
    }
}

impl NewsSource for HttpSource {
    #[instrument(level = "debug", skip(self))]
    async fn load(&self, key: &str) -> Result<NewsBundle, LoadError> {
        let url = self.url_for(key)?;
        let response = self.client.get(url.clone()).send().await?;
        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Err(LoadError::NotFound);
        }
        if !status.is_success() {
            return Err(LoadError::Status(status.as_u16()));
        }
        let body = response.text().await?;
        debug!(%url, bytes = body.len(), "Fetched news file");
        parse_bundle(key, &body)
    }
}

/// Loads `{dir}/{key}.json` from the local filesystem.
#[derive(Debug, Clone)]
pub struct DirSource {
    dir: PathBuf,
}

impl DirSource {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }
}

impl NewsSource for DirSource {
    #[instrument(level = "debug", skip(self))]
    async fn load(&self, key: &str) -> Result<NewsBundle, LoadError> {
        let path = self.path_for(key);
        let body = fs::read_to_string(&path).await?;
        debug!(path = %path.display(), bytes = body.len(), "Read news file");
        parse_bundle(key, &body)
    }
}

const CONNECT_TIMEOUT: Duration = Duration::from_secs(5);

/// Either kind of source, picked from a user-supplied location string.
#[derive(Debug, Clone)]
pub enum Source {
    Http(HttpSource),
    Dir(DirSource),
}

impl Source {
    /// `http://` and `https://` locations are fetched over the network;
    /// anything else is a directory path.
    ///
    /// A request that has not completed within `timeout` fails, so a stalled
    /// server still ends in the fallback data.
    pub fn from_location(location: &str, timeout: Duration) -> Result<Self, Box<dyn Error>> {
        match Url::parse(location) {
            Ok(url) if matches!(url.scheme(), "http" | "https") => {
                let client = reqwest::Client::builder()
                    .user_agent(concat!("daily_news_desk/", env!("CARGO_PKG_VERSION")))
                    .connect_timeout(timeout.min(CONNECT_TIMEOUT))
                    .timeout(timeout)
                    .build()?;
                Ok(Source::Http(HttpSource::new(client, url)))
            }
            _ => Ok(Source::Dir(DirSource::new(location))),
        }
    }
}

impl NewsSource for Source {
    async fn load(&self, key: &str) -> Result<NewsBundle, LoadError> {
        match self {
            Source::Http(s) => s.load(key).await,
            Source::Dir(s) => s.load(key).await,
        }
    }
}

/// Fetch-with-fallback over any [`NewsSource`].
#[derive(Debug, Clone)]
pub struct NewsRepository<S> {
    source: S,
}

impl<S: NewsSource> NewsRepository<S> {
    pub fn new(source: S) -> Self {
        Self { source }
    }

    /// Load the news for `date`, substituting the sample data on any failure.
    ///
    /// Never fails; [`LoadedNews::origin`] tells the caller which path was
    /// taken.
    #[instrument(level = "info", skip(self), fields(key = tracing::field::Empty))]
    pub async fn fetch_news_for_date(&self, date: NaiveDate) -> LoadedNews {
        let key = format_key(date);
        tracing::Span::current().record("key", key.as_str());

        match self.source.load(&key).await {
            Ok(data) => {
                info!(items = data.total_items(), "Loaded news");
                LoadedNews {
                    data,
                    origin: Origin::Network,
                }
            }
            Err(e) => {
                warn!(error = %e, "News unavailable; using sample data");
                LoadedNews {
                    data: fallback_bundle(),
                    origin: Origin::Fallback,
                }
            }
        }
    }
}
