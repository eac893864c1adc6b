//! # Daily News Desk
//!
//! Day-by-day reader for consulting-industry and AI news, plus the collector
//! that produces its data.
//!
//! ## Features
//!
//! - Navigates per-date `YYYY-MM-DD.json` news files, up to a week back
//! - Falls back to built-in sample news when a day cannot be loaded
//! - Two category tabs (コンサル業界 / AI), rendered to a standalone HTML page
//! - Collects the daily files from RSS/Atom feeds, keeping a rolling window
//!
//! ## Usage
//!
//! ```sh
//! daily_news_desk browse --source https://news.example.com/data/
//! daily_news_desk render --back 1 --tab ai --out yesterday.html
//! daily_news_desk collect --data-dir ./data
//! ```
//!
//! ## Architecture
//!
//! Browsing is a fetch-render cycle driven by one command at a time:
//! 1. **Navigate**: move the current day within the lookback window
//! 2. **Load**: fetch the day's file, or use the fallback bundle
//! 3. **Render**: fill each category container with escaped news cards
//! 4. **Output**: rewrite the HTML page
//!
//! Collecting fetches every feed concurrently, merges per category and
//! writes one file per day.

use chrono::{Local, NaiveDate, Utc};
use clap::Parser;
use std::error::Error;
use std::path::PathBuf;
use std::time::Duration;
use tracing::{debug, info, instrument};
use tracing_subscriber::{EnvFilter, fmt as tfmt};

mod api;
mod app;
mod cli;
mod collect;
mod config;
mod dates;
mod dom;
mod fallback;
mod feeds;
mod models;
mod navigation;
mod outputs;
mod render;
mod repository;
mod tabs;
mod utils;

use api::{HttpFetcher, RetryFetch};
use app::App;
use cli::{Cli, Command, ViewArgs};
use config::Config;
use dom::SystemOpener;
use models::Category;
use repository::{NewsRepository, Source};

const USER_AGENT: &str = concat!("daily_news_desk/", env!("CARGO_PKG_VERSION"));

#[tokio::main]
#[instrument]
async fn main() -> Result<(), Box<dyn Error>> {
    // --- Tracing init ---
    // stdout belongs to the browser's status lines.
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tfmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_file(false)
        .with_line_number(false)
        .with_timer(tracing_subscriber::fmt::time::UtcTime::rfc_3339())
        .with_writer(std::io::stderr)
        .init();

    let start_time = std::time::Instant::now();
    info!("daily_news_desk starting up");

    let args = Cli::parse();
    debug!(?args, "Parsed CLI arguments");

    let config = Config::load(args.config.as_deref()).await?;

    match args.command {
        Command::Browse(view) => browse(&config, view).await?,
        Command::Render { view, back, tab } => render(&config, view, back, tab.as_deref()).await?,
        Command::Collect { data_dir, today } => collect(config, data_dir, today.as_deref()).await?,
    }

    let elapsed = start_time.elapsed();
    info!(?elapsed, "Execution complete");
    Ok(())
}

/// `--today` if given, otherwise `default`.
fn resolve_today(flag: Option<&str>, default: NaiveDate) -> Result<NaiveDate, Box<dyn Error>> {
    match flag {
        Some(text) => dates::parse_key(text)
            .ok_or_else(|| format!("--today must be YYYY-MM-DD, got {text:?}").into()),
        None => Ok(default),
    }
}

fn build_app(config: &Config, view: ViewArgs) -> Result<App<Source, SystemOpener>, Box<dyn Error>> {
    let today = resolve_today(view.today.as_deref(), Local::now().date_naive())?;
    let location = view.source.unwrap_or_else(|| config.source.clone());
    let output = view.out.unwrap_or_else(|| config.output.clone());
    info!(%location, output = %output.display(), %today, "Opening news source");

    let source = Source::from_location(&location, config.request_timeout())?;
    Ok(App::new(
        NewsRepository::new(source),
        SystemOpener,
        today,
        config.max_days_back,
        output,
    ))
}

async fn browse(config: &Config, view: ViewArgs) -> Result<(), Box<dyn Error>> {
    let mut app = build_app(config, view)?;
    let stdin = tokio::io::BufReader::new(tokio::io::stdin());
    app.run(stdin, tokio::io::stdout()).await
}

async fn render(config: &Config, view: ViewArgs, back: u32, tab: Option<&str>) -> Result<(), Box<dyn Error>> {
    let tab = match tab {
        Some(key) => Some(Category::from_key(key).ok_or_else(|| format!("unknown tab {key:?}; use consulting or ai"))?),
        None => None,
    };
    let mut app = build_app(config, view)?;
    let origin = app.snapshot(back, tab).await;
    info!(%origin, date = %app.navigation().current_date(), "Rendered page");
    println!("{}", app.status());
    Ok(())
}

async fn collect(mut config: Config, data_dir: Option<PathBuf>, today: Option<&str>) -> Result<(), Box<dyn Error>> {
    if let Some(dir) = data_dir {
        config.data_dir = dir;
    }
    let today = resolve_today(today, Utc::now().with_timezone(&feeds::jst()).date_naive())?;

    let client = reqwest::Client::builder()
        .user_agent(USER_AGENT)
        .timeout(config.request_timeout())
        .build()?;
    let fetcher = RetryFetch::new(HttpFetcher::new(client), config.fetch_retries, Duration::from_secs(1));

    let report = collect::run(&fetcher, &config, today).await?;
    println!(
        "{}: コンサル {} 件, AI {} 件 (removed {} old files)",
        report.path.display(),
        report.consulting,
        report.ai,
        report.deleted
    );
    Ok(())
}
