//! Runtime configuration.
//!
//! Defaults cover everything, so the YAML file is optional. Any key present in
//! the file overrides its default; command-line flags override both.
//!
//! ```yaml
//! source: https://news.example.com/data/
//! max_days_back: 7
//! feeds:
//!   ai:
//!     - name: GIGAZINE
//!       url: https://gigazine.net/news/rss_2.0/
//! ```

use crate::models::Category;
use crate::navigation::MAX_DAYS_BACK;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::error::Error;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tokio::fs;
use tracing::{info, instrument};

/// One RSS/Atom feed.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct FeedConfig {
    /// Publisher name stored as each item's `source`.
    pub name: String,
    pub url: String,
}

impl FeedConfig {
    fn new(name: &str, url: &str) -> Self {
        Self {
            name: name.to_string(),
            url: url.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct Config {
    /// Where per-date news files are read from: an http(s) base URL or a
    /// directory.
    pub source: String,
    /// Page written after every browser action.
    pub output: PathBuf,
    /// Lookback window of the date navigator, in days.
    pub max_days_back: i64,
    /// Directory the collector writes `YYYY-MM-DD.json` files to.
    pub data_dir: PathBuf,
    /// News files older than this many days are deleted by the collector.
    pub keep_days: i64,
    pub max_articles_per_category: usize,
    pub max_summary_chars: usize,
    /// Retries per feed after the first attempt.
    pub fetch_retries: usize,
    /// Whole-request limit for news files and feeds, in seconds.
    pub request_timeout_secs: u64,
    pub feeds: BTreeMap<Category, Vec<FeedConfig>>,
}

impl Default for Config {
    fn default() -> Self {
        let mut feeds = BTreeMap::new();
        feeds.insert(
            Category::Consulting,
            vec![
                FeedConfig::new("ITmedia ビジネス", "https://rss.itmedia.co.jp/rss/2.0/bizid.xml"),
                FeedConfig::new("東洋経済オンライン", "https://toyokeizai.net/list/feed/rss"),
            ],
        );
        feeds.insert(
            Category::Ai,
            vec![
                FeedConfig::new("ITmedia AI+", "https://rss.itmedia.co.jp/rss/2.0/aiplus.xml"),
                FeedConfig::new("GIGAZINE", "https://gigazine.net/news/rss_2.0/"),
            ],
        );

        Self {
            source: "data".to_string(),
            output: PathBuf::from("news.html"),
            max_days_back: MAX_DAYS_BACK,
            data_dir: PathBuf::from("data"),
            keep_days: 7,
            max_articles_per_category: 10,
            max_summary_chars: 150,
            fetch_retries: 2,
            request_timeout_secs: 15,
            feeds,
        }
    }
}

impl Config {
    pub fn from_yaml(text: &str) -> Result<Self, Box<dyn Error>> {
        let config: Config = serde_yaml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Load `path`, or the defaults when no path is given.
    #[instrument(level = "info")]
    pub async fn load(path: Option<&Path>) -> Result<Self, Box<dyn Error>> {
        let Some(path) = path else {
            return Ok(Self::default());
        };
        let text = fs::read_to_string(path).await?;
        let config = Self::from_yaml(&text)?;
        info!(path = %path.display(), "Loaded configuration");
        Ok(config)
    }

    fn validate(&self) -> Result<(), Box<dyn Error>> {
        if self.max_days_back < 1 {
            return Err(format!("max_days_back must be at least 1, got {}", self.max_days_back).into());
        }
        if self.keep_days < 0 {
            return Err(format!("keep_days must not be negative, got {}", self.keep_days).into());
        }
        if self.request_timeout_secs == 0 {
            return Err("request_timeout_secs must be at least 1".into());
        }
        if self.max_summary_chars < 4 {
            return Err("max_summary_chars must leave room for the ellipsis".into());
        }
        Ok(())
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn feeds_for(&self, category: Category) -> &[FeedConfig] {
        self.feeds.get(&category).map(Vec::as_slice).unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_config_default() {
        let config = Config::default();
        assert_eq!(config.max_days_back, 7);
        assert_eq!(config.keep_days, 7);
        assert_eq!(config.max_articles_per_category, 10);
        assert_eq!(config.max_summary_chars, 150);
        assert_eq!(config.request_timeout(), Duration::from_secs(15));
        assert_eq!(config.feeds_for(Category::Consulting).len(), 2);
        assert_eq!(config.feeds_for(Category::Ai).len(), 2);
    }

    #[test]
    fn test_partial_yaml_keeps_defaults() {
        let config = Config::from_yaml(
            "source: https://news.example.com/data/\nfeeds:\n  ai:\n    - name: Only\n      url: https://example.com/rss\n",
        )
        .unwrap();
        assert_eq!(config.source, "https://news.example.com/data/");
        assert_eq!(config.max_days_back, 7);
        assert_eq!(config.feeds_for(Category::Ai)[0].name, "Only");
        assert!(config.feeds_for(Category::Consulting).is_empty());
    }

    #[test]
    fn test_invalid_values_rejected() {
        assert!(Config::from_yaml("max_days_back: 0").is_err());
        assert!(Config::from_yaml("keep_days: -1").is_err());
        assert!(Config::from_yaml("request_timeout_secs: 0").is_err());
        assert!(Config::from_yaml("feeds:\n  poker: []\n").is_err());
    }

    #[tokio::test]
    async fn test_load_from_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.yaml");
        std::fs::write(&path, "max_days_back: 3\noutput: site/index.html\n").unwrap();

        let config = Config::load(Some(path.as_path())).await.unwrap();
        assert_eq!(config.max_days_back, 3);
        assert_eq!(config.request_timeout_secs, 15);
        assert_eq!(config.output, PathBuf::from("site/index.html"));

        assert_eq!(Config::load(None).await.unwrap(), Config::default());
        assert!(Config::load(Some(temp_dir.path().join("missing.yaml").as_path())).await.is_err());
    }
}
