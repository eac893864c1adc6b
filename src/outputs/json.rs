//! Per-date JSON news files.
//!
//! The collector writes one file per day and prunes old ones:
//! ```text
//! data_dir/
//! ├── 2026-01-21.json
//! ├── ...
//! └── 2026-01-27.json
//! ```
//!
//! Files are pretty-printed UTF-8 with non-ASCII text kept as is.

use crate::dates::{days_between, parse_key};
use crate::models::NewsBundle;
use chrono::NaiveDate;
use std::error::Error;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{error, info, instrument, warn};

/// Write `bundle` to `{data_dir}/{key}.json`, creating the directory if needed.
#[instrument(level = "info", skip(bundle), fields(data_dir = %data_dir.display()))]
pub async fn write_news_file(
    bundle: &NewsBundle,
    data_dir: &Path,
    key: &str,
) -> Result<PathBuf, Box<dyn Error>> {
    let json = serde_json::to_string_pretty(bundle)?;

    if let Err(e) = fs::create_dir_all(data_dir).await {
        error!(error = %e, "Failed to create data dir");
        return Err(e.into());
    }

    let path = data_dir.join(format!("{key}.json"));
    fs::write(&path, json).await?;
    info!(path = %path.display(), "Wrote news file");
    Ok(path)
}

/// Delete `*.json` files named for a day more than `keep_days` before `today`.
///
/// Files whose stem is not a `YYYY-MM-DD` date are left alone. Returns the
/// number of files removed.
#[instrument(level = "info", fields(data_dir = %data_dir.display()))]
pub async fn cleanup_old_files(
    data_dir: &Path,
    today: NaiveDate,
    keep_days: i64,
) -> Result<usize, Box<dyn Error>> {
    if !fs::try_exists(data_dir).await? {
        return Ok(0);
    }

    let mut deleted = 0usize;
    let mut entries = fs::read_dir(data_dir).await?;
    while let Some(entry) = entries.next_entry().await? {
        let path = entry.path();
        if path.extension().and_then(|e| e.to_str()) != Some("json") {
            continue;
        }
        let Some(day) = path.file_stem().and_then(|s| s.to_str()).and_then(parse_key) else {
            warn!(path = %path.display(), "Skipping file without a date name");
            continue;
        };
        if days_between(day, today) <= keep_days {
            continue;
        }
        match fs::remove_file(&path).await {
            Ok(()) => {
                info!(path = %path.display(), "Deleted old news file");
                deleted += 1;
            }
            Err(e) => warn!(path = %path.display(), error = %e, "Could not delete old news file"),
        }
    }

    if deleted > 0 {
        info!(deleted, "Pruned old news files");
    }
    Ok(deleted)
}
