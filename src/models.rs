//! Data models for news items and the per-date news files.
//!
//! - [`NewsItem`]: a single headline with its source and summary
//! - [`Category`]: the two fixed news groupings
//! - [`NewsBundle`]: one day's worth of items for both categories, which is
//!   also the on-disk shape of `YYYY-MM-DD.json`
//! - [`LoadedNews`]: a bundle tagged with where it came from

use serde::{Deserialize, Serialize};
use std::fmt;

/// A single news headline.
///
/// Title, source, date and summary come straight from third-party feeds and
/// are untrusted; they are escaped by the render layer before display.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct NewsItem {
    /// Headline text.
    pub title: String,
    /// Publisher name (e.g. "ITmedia AI+").
    pub source: String,
    /// Publication day in `YYYY-MM-DD` format.
    pub date: String,
    /// Short plain-text summary.
    pub summary: String,
    /// Link to the full article, when the feed provided one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

/// One of the two fixed news groupings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Consulting,
    Ai,
}

impl Category {
    pub const ALL: [Category; 2] = [Category::Consulting, Category::Ai];

    /// JSON key and tab pane id.
    pub fn key(self) -> &'static str {
        match self {
            Category::Consulting => "consulting",
            Category::Ai => "ai",
        }
    }

    /// Id of the element that holds this category's news cards.
    pub fn container_id(self) -> &'static str {
        match self {
            Category::Consulting => "consulting-news",
            Category::Ai => "ai-news",
        }
    }

    /// Id of the tab button that selects this category's pane.
    pub fn tab_button_id(self) -> &'static str {
        match self {
            Category::Consulting => "tab-consulting",
            Category::Ai => "tab-ai",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Category::Consulting => "コンサル業界",
            Category::Ai => "AI",
        }
    }

    /// Parse a pane key (`consulting` / `ai`), case-insensitively.
    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|c| c.key().eq_ignore_ascii_case(key.trim()))
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// The news for both categories on one day.
///
/// A missing category key stays `None` rather than being defaulted, so the
/// render layer can tell "absent" from "empty"; both render as the
/// no-news placeholder. Unknown keys in the file are ignored.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct NewsBundle {
    /// The day this bundle was collected for (`YYYY-MM-DD`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
    /// RFC 3339 timestamp of the collection run.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub consulting: Option<Vec<NewsItem>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ai: Option<Vec<NewsItem>>,
}

impl NewsBundle {
    /// Items for `category`, or `None` when the key was absent.
    pub fn category(&self, category: Category) -> Option<&[NewsItem]> {
        match category {
            Category::Consulting => self.consulting.as_deref(),
            Category::Ai => self.ai.as_deref(),
        }
    }

    pub fn total_items(&self) -> usize {
        Category::ALL
            .into_iter()
            .map(|c| self.category(c).map_or(0, <[NewsItem]>::len))
            .sum()
    }
}

/// Where a [`LoadedNews`] bundle came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Origin {
    /// The per-date resource was loaded and parsed.
    Network,
    /// The per-date resource failed; embedded sample data was substituted.
    Fallback,
}

impl fmt::Display for Origin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Origin::Network => f.write_str("network"),
            Origin::Fallback => f.write_str("fallback"),
        }
    }
}

/// Result of a date query: always carries data, plus its provenance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadedNews {
    pub data: NewsBundle,
    pub origin: Origin,
}
