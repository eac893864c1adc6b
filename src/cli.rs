//! Command-line interface definitions for the news desk.
//!
//! This module defines the CLI arguments and options using the `clap` crate.
//! Flags override values from the YAML config file; a few can also come from
//! environment variables.

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// Command-line arguments for the news desk.
///
/// # Examples
///
/// ```sh
/// # Browse interactively, reading from a local data directory
/// daily_news_desk browse --source ./data --out news.html
///
/// # Write the page for three days ago with the AI tab shown
/// daily_news_desk render --back 3 --tab ai
///
/// # Build today's JSON file from the configured feeds
/// daily_news_desk --config desk.yaml collect --data-dir ./data
/// ```
#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Cli {
    /// Optional path to a config.yaml file
    #[arg(short, long, global = true, env = "NEWS_DESK_CONFIG")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Browse day by day; reads commands from stdin and rewrites the page after each
    Browse(ViewArgs),

    /// Write the page once and exit
    Render {
        #[command(flatten)]
        view: ViewArgs,

        /// Days to step back from today (clamped to the lookback window)
        #[arg(short, long, default_value_t = 0)]
        back: u32,

        /// Tab to show: consulting or ai
        #[arg(short, long)]
        tab: Option<String>,
    },

    /// Fetch the configured feeds and write today's news file
    Collect {
        /// Directory for the per-date JSON files
        #[arg(short, long)]
        data_dir: Option<PathBuf>,

        /// Collect for this day (YYYY-MM-DD) instead of today in JST
        #[arg(long)]
        today: Option<String>,
    },
}

/// Options shared by the page-producing commands.
#[derive(Args, Debug, Clone, Default)]
pub struct ViewArgs {
    /// Base URL or directory holding the YYYY-MM-DD.json files
    #[arg(short, long, env = "NEWS_SOURCE")]
    pub source: Option<String>,

    /// Path of the HTML page to write
    #[arg(short, long)]
    pub out: Option<PathBuf>,

    /// Treat this day (YYYY-MM-DD) as today
    #[arg(long)]
    pub today: Option<String>,
}
