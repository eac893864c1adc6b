//! RSS 2.0 and Atom feed reading.
//!
//! Each configured feed is fetched and turned into [`NewsItem`]s:
//!
//! 1. **Fetching**: `GET` the feed through a retrying [`FetchText`]
//! 2. **Parsing**: deserialize `<item>` (RSS) or `<entry>` (Atom) elements
//! 3. **Cleaning**: strip markup from summaries, collapse whitespace, truncate,
//!    and reduce timestamps to their UTC calendar day
//!
//! Entries without a link are dropped. Any failure for a feed (transport,
//! HTTP status, unparseable XML) yields an empty list for that feed and is
//! logged; one bad feed never stops the others.

use crate::api::FetchText;
use crate::config::FeedConfig;
use crate::dates::format_key;
use crate::models::NewsItem;
use crate::utils::{collapse_whitespace, strip_markup, truncate_chars};
use chrono::{DateTime, FixedOffset, NaiveDate, Utc};
use serde::Deserialize;
use std::error::Error;
use tracing::{debug, info, instrument, warn};

/// Title used when an entry has none.
pub const UNTITLED: &str = "タイトルなし";

/// Japan Standard Time; the collection day rolls over at JST midnight.
pub fn jst() -> FixedOffset {
    FixedOffset::east_opt(9 * 3600).unwrap()
}

#[derive(Debug, Deserialize)]
struct Rss {
    channel: RssChannel,
}

#[derive(Debug, Deserialize)]
struct RssChannel {
    #[serde(rename = "item", default)]
    items: Vec<RssItem>,
}

#[derive(Debug, Deserialize)]
struct RssItem {
    title: Option<String>,
    link: Option<String>,
    description: Option<String>,
    #[serde(rename = "pubDate")]
    pub_date: Option<String>,
    #[serde(rename = "date")]
    dc_date: Option<String>,
}

#[derive(Debug, Deserialize)]
struct AtomFeed {
    #[serde(rename = "entry", default)]
    entries: Vec<AtomEntry>,
}

#[derive(Debug, Deserialize)]
struct AtomEntry {
    title: Option<AtomText>,
    #[serde(rename = "link", default)]
    links: Vec<AtomLink>,
    summary: Option<AtomText>,
    content: Option<AtomText>,
    published: Option<String>,
    updated: Option<String>,
}

/// Text construct; may carry a `type` attribute we do not care about.
#[derive(Debug, Deserialize)]
struct AtomText {
    #[serde(rename = "$text", default)]
    value: String,
}

#[derive(Debug, Deserialize)]
struct AtomLink {
    #[serde(rename = "@href")]
    href: Option<String>,
    #[serde(rename = "@rel")]
    rel: Option<String>,
}

/// One entry before cleaning, independent of feed flavour.
#[derive(Debug, Default)]
struct RawEntry {
    title: Option<String>,
    link: Option<String>,
    summary: Option<String>,
    timestamp: Option<String>,
}

fn parse_raw_entries(xml: &str) -> Result<Vec<RawEntry>, Box<dyn Error>> {
    let rss_at = xml.find("<rss");
    let atom_at = xml.find("<feed");
    let looks_atom = match (rss_at, atom_at) {
        (None, None) => return Err("not an RSS or Atom document".into()),
        (Some(rss), Some(atom)) => atom < rss,
        (None, Some(_)) => true,
        (Some(_), None) => false,
    };

    if !looks_atom {
        let rss: Rss = quick_xml::de::from_str(xml)?;
        return Ok(rss
            .channel
            .items
            .into_iter()
            .map(|item| RawEntry {
                title: item.title,
                link: item.link,
                summary: item.description,
                timestamp: item.pub_date.or(item.dc_date),
            })
            .collect());
    }

    let atom: AtomFeed = quick_xml::de::from_str(xml)?;
    Ok(atom
        .entries
        .into_iter()
        .map(|entry| {
            let link = entry
                .links
                .iter()
                .find(|l| l.rel.as_deref().is_none_or(|rel| rel == "alternate"))
                .or_else(|| entry.links.first())
                .and_then(|l| l.href.clone());
            RawEntry {
                title: entry.title.map(|t| t.value),
                link,
                summary: entry.summary.or(entry.content).map(|t| t.value),
                timestamp: entry.published.or(entry.updated),
            }
        })
        .collect())
}

/// Reduce a feed timestamp (RFC 2822 or RFC 3339) to its UTC calendar day.
///
/// Only the collection day is JST; an entry published at 05:30 JST on the
/// 27th is dated the 26th.
pub fn entry_day(timestamp: &str) -> Option<NaiveDate> {
    let ts = timestamp.trim();
    DateTime::parse_from_rfc2822(ts)
        .or_else(|_| DateTime::parse_from_rfc3339(ts))
        .ok()
        .map(|dt| dt.with_timezone(&Utc).date_naive())
}

/// Plain-text summary: markup removed, whitespace collapsed, at most
/// `max_chars` characters.
pub fn clean_summary(raw: &str, max_chars: usize) -> String {
    truncate_chars(&collapse_whitespace(&strip_markup(raw)), max_chars)
}

/// Parse a feed document into news items attributed to `source_name`.
///
/// `today` stands in for entries without a usable timestamp.
pub fn parse_feed(
    xml: &str,
    source_name: &str,
    today: NaiveDate,
    max_summary_chars: usize,
) -> Result<Vec<NewsItem>, Box<dyn Error>> {
    let entries = parse_raw_entries(xml)?;
    let total = entries.len();

    let items: Vec<NewsItem> = entries
        .into_iter()
        .filter_map(|entry| {
            let url = entry.link.map(|l| l.trim().to_string()).filter(|l| !l.is_empty())?;
            let title = entry
                .title
                .map(|t| collapse_whitespace(&t))
                .filter(|t| !t.is_empty())
                .unwrap_or_else(|| UNTITLED.to_string());
            let day = entry
                .timestamp
                .as_deref()
                .and_then(entry_day)
                .unwrap_or(today);
            Some(NewsItem {
                title,
                source: source_name.to_string(),
                date: format_key(day),
                summary: clean_summary(entry.summary.as_deref().unwrap_or_default(), max_summary_chars),
                url: Some(url),
            })
        })
        .collect();

    debug!(total, kept = items.len(), "Parsed feed entries");
    Ok(items)
}

/// Fetch and parse one feed. Never fails; problems yield an empty list.
#[instrument(level = "info", skip(fetcher), fields(feed = %feed.name))]
pub async fn fetch_feed<F: FetchText>(
    fetcher: &F,
    feed: &FeedConfig,
    today: NaiveDate,
    max_summary_chars: usize,
) -> Vec<NewsItem> {
    let xml = match fetcher.fetch_text(&feed.url).await {
        Ok(xml) => xml,
        Err(e) => {
            warn!(url = %feed.url, error = %e, "Feed fetch failed; skipping");
            return Vec::new();
        }
    };

    match parse_feed(&xml, &feed.name, today, max_summary_chars) {
        Ok(items) => {
            info!(count = items.len(), "Fetched feed");
            items
        }
        Err(e) => {
            warn!(url = %feed.url, error = %e, "Feed did not parse; skipping");
            Vec::new()
        }
    }
}
