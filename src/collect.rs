//! Daily collection run: feeds in, one `YYYY-MM-DD.json` out.
//!
//! For each category every configured feed is fetched concurrently, the
//! results are merged in feed order, de-duplicated by link, sorted newest day
//! first and capped. The bundle is written to the data directory and files
//! that fell out of the retention window are removed.

use crate::api::FetchText;
use crate::config::{Config, FeedConfig};
use crate::dates::format_key;
use crate::feeds::{fetch_feed, jst};
use crate::models::{Category, NewsBundle, NewsItem};
use crate::outputs::json::{cleanup_old_files, write_news_file};
use crate::utils::ensure_writable_dir;
use chrono::{NaiveDate, SecondsFormat, Utc};
use futures::stream::{self, StreamExt};
use itertools::Itertools;
use std::error::Error;
use std::path::PathBuf;
use tracing::{error, info, instrument, warn};

/// Feeds fetched at the same time.
const PARALLEL_FEEDS: usize = 4;

/// What one collection run produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CollectReport {
    pub path: PathBuf,
    pub consulting: usize,
    pub ai: usize,
    pub deleted: usize,
}

/// Gather the news for one category.
///
/// The first occurrence of a link wins; ties on date keep feed order.
#[instrument(level = "info", skip(fetcher, feeds), fields(category = %category, feeds = feeds.len()))]
pub async fn collect_category<F: FetchText>(
    fetcher: &F,
    category: Category,
    feeds: &[FeedConfig],
    today: NaiveDate,
    max_articles: usize,
    max_summary_chars: usize,
) -> Vec<NewsItem> {
    let mut per_feed: Vec<(usize, Vec<NewsItem>)> = stream::iter(feeds.iter().enumerate())
        .map(|(i, feed)| async move { (i, fetch_feed(fetcher, feed, today, max_summary_chars).await) })
        .buffer_unordered(PARALLEL_FEEDS)
        .collect()
        .await;
    per_feed.sort_by_key(|(i, _)| *i);

    let fetched: usize = per_feed.iter().map(|(_, items)| items.len()).sum();
    let mut items: Vec<NewsItem> = per_feed
        .into_iter()
        .flat_map(|(_, items)| items)
        .unique_by(|item| item.url.clone())
        .collect();
    items.sort_by(|a, b| b.date.cmp(&a.date));
    items.truncate(max_articles);

    if items.is_empty() {
        warn!("No articles collected");
    } else {
        info!(fetched, kept = items.len(), "Collected category");
    }
    items
}

/// Build the bundle for `today` from every configured feed.
pub async fn collect_bundle<F: FetchText>(fetcher: &F, config: &Config, today: NaiveDate) -> NewsBundle {
    let mut bundle = NewsBundle {
        date: Some(format_key(today)),
        updated_at: Some(Utc::now().with_timezone(&jst()).to_rfc3339_opts(SecondsFormat::Secs, false)),
        ..NewsBundle::default()
    };

    for category in Category::ALL {
        let items = collect_category(
            fetcher,
            category,
            config.feeds_for(category),
            today,
            config.max_articles_per_category,
            config.max_summary_chars,
        )
        .await;
        match category {
            Category::Consulting => bundle.consulting = Some(items),
            Category::Ai => bundle.ai = Some(items),
        }
    }
    bundle
}

/// Collect, write `{data_dir}/{today}.json`, then prune old files.
///
/// A failed prune is logged; the written file still counts as success.
#[instrument(level = "info", skip(fetcher, config), fields(data_dir = %config.data_dir.display()))]
pub async fn run<F: FetchText>(
    fetcher: &F,
    config: &Config,
    today: NaiveDate,
) -> Result<CollectReport, Box<dyn Error>> {
    if let Err(e) = ensure_writable_dir(&config.data_dir).await {
        error!(error = %e, "Data directory is not writable (fix perms or choose a different path)");
        return Err(e);
    }

    let bundle = collect_bundle(fetcher, config, today).await;
    let key = format_key(today);
    let path = write_news_file(&bundle, &config.data_dir, &key).await?;

    let deleted = match cleanup_old_files(&config.data_dir, today, config.keep_days).await {
        Ok(n) => n,
        Err(e) => {
            warn!(error = %e, "Cleanup of old news files failed");
            0
        }
    };

    let report = CollectReport {
        path,
        consulting: bundle.category(Category::Consulting).map_or(0, <[NewsItem]>::len),
        ai: bundle.category(Category::Ai).map_or(0, <[NewsItem]>::len),
        deleted,
    };
    info!(
        consulting = report.consulting,
        ai = report.ai,
        deleted = report.deleted,
        "Collection complete"
    );
    Ok(report)
}
