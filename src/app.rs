//! The interactive browser: one document, one navigator, one command at a time.
//!
//! Commands are read as text lines:
//!
//! | Input | Action |
//! |---|---|
//! | `p` | previous day |
//! | `n` | next day |
//! | `t <consulting\|ai>` | switch tab |
//! | `o <N>` | open the N-th card (1-based) of the shown tab |
//! | `s` | reload the current day |
//! | `q` | quit |
//!
//! Each command runs to completion before the next line is read, and the page
//! file is rewritten afterwards.

use crate::dom::{ClickOutcome, Document, UrlOpener};
use crate::models::{Category, Origin};
use crate::navigation::NavigationController;
use crate::outputs::html::{status_line, write_page};
use crate::repository::{NewsRepository, NewsSource};
use crate::tabs::activate_category;
use chrono::NaiveDate;
use std::error::Error;
use std::path::PathBuf;
use std::str::FromStr;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};
use tracing::{debug, error, info, instrument, warn};

pub const HELP: &str = "commands: p (前の日) | n (次の日) | t consulting|ai | o N (open card) | s (reload) | q (quit)";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Prev,
    Next,
    Tab(Category),
    /// Zero-based card index in the shown tab.
    Open(usize),
    Show,
    Quit,
}

impl FromStr for Command {
    type Err = String;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let mut words = line.split_whitespace();
        let Some(head) = words.next() else {
            return Err("empty command".to_string());
        };
        let arg = words.next();
        if words.next().is_some() {
            return Err(format!("too many arguments: {line}"));
        }

        match (head, arg) {
            ("p" | "prev", None) => Ok(Command::Prev),
            ("n" | "next", None) => Ok(Command::Next),
            ("s" | "show", None) => Ok(Command::Show),
            ("q" | "quit", None) => Ok(Command::Quit),
            ("t" | "tab", Some(key)) => Category::from_key(key)
                .map(Command::Tab)
                .ok_or_else(|| format!("unknown tab: {key}")),
            ("o" | "open", Some(n)) => match n.parse::<usize>() {
                Ok(n) if n > 0 => Ok(Command::Open(n - 1)),
                _ => Err(format!("card numbers start at 1, got {n}")),
            },
            _ => Err(format!("unknown command: {line}")),
        }
    }
}

impl Command {
    pub fn parse(line: &str) -> Result<Self, String> {
        line.parse()
    }
}

/// Whether the input loop should keep going.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

pub struct App<S, O> {
    doc: Document,
    nav: NavigationController,
    repo: NewsRepository<S>,
    opener: O,
    output: PathBuf,
}

impl<S: NewsSource, O: UrlOpener> App<S, O> {
    pub fn new(
        repo: NewsRepository<S>,
        opener: O,
        today: NaiveDate,
        max_days_back: i64,
        output: PathBuf,
    ) -> Self {
        Self {
            doc: Document::standard(),
            nav: NavigationController::new(today, max_days_back),
            repo,
            opener,
            output,
        }
    }

    pub fn navigation(&self) -> &NavigationController {
        &self.nav
    }

    pub fn status(&self) -> String {
        status_line(&self.doc, &self.nav)
    }

    /// Initial cycle: show today and write the page.
    pub async fn start(&mut self) -> Origin {
        let origin = self.nav.show_current(&self.repo, &mut self.doc).await;
        self.publish().await;
        origin
    }

    /// Step back `back` days (stopping at the window edge), pick `tab`, then
    /// load, render and write the page once.
    pub async fn snapshot(&mut self, back: u32, tab: Option<Category>) -> Origin {
        for _ in 0..back {
            if !self.nav.prev() {
                break;
            }
        }
        if let Some(category) = tab {
            activate_category(&mut self.doc, category);
        }
        let origin = self.nav.show_current(&self.repo, &mut self.doc).await;
        self.publish().await;
        origin
    }

    /// Apply `command` without writing the page.
    #[instrument(level = "info", skip(self))]
    pub async fn apply(&mut self, command: Command) -> Flow {
        match command {
            Command::Prev => {
                if self.nav.prev() {
                    self.nav.show_current(&self.repo, &mut self.doc).await;
                }
            }
            Command::Next => {
                if self.nav.next() {
                    self.nav.show_current(&self.repo, &mut self.doc).await;
                }
            }
            Command::Show => {
                self.nav.show_current(&self.repo, &mut self.doc).await;
            }
            Command::Tab(category) => {
                activate_category(&mut self.doc, category);
            }
            Command::Open(index) => {
                self.open_card(index);
            }
            Command::Quit => return Flow::Quit,
        }
        Flow::Continue
    }

    /// Apply `command`, then rewrite the page unless quitting.
    pub async fn handle(&mut self, command: Command) -> Flow {
        let flow = self.apply(command).await;
        if flow == Flow::Continue {
            self.publish().await;
        }
        flow
    }

    fn open_card(&self, index: usize) -> ClickOutcome {
        let Some(category) = self.doc.active_category() else {
            warn!("No active tab");
            return ClickOutcome::Missing;
        };
        let outcome = self.doc.click_card(category.container_id(), index, &self.opener);
        debug!(?outcome, "Card click");
        outcome
    }

    /// Write the page; failures are logged and the session continues.
    pub async fn publish(&self) {
        if let Err(e) = write_page(&self.doc, &self.output).await {
            error!(path = %self.output.display(), error = %e, "Failed to write page");
        }
    }

    /// Read commands from `input` until `q` or end of input, printing the
    /// status line to `out` after each one.
    pub async fn run<R, W>(&mut self, input: R, mut out: W) -> Result<(), Box<dyn Error>>
    where
        R: AsyncBufRead + Unpin,
        W: AsyncWrite + Unpin,
    {
        self.start().await;
        out.write_all(format!("{}\n{HELP}\n", self.status()).as_bytes()).await?;
        out.flush().await?;

        let mut lines = input.lines();
        while let Some(line) = lines.next_line().await? {
            if line.trim().is_empty() {
                continue;
            }
            let command = match Command::parse(&line) {
                Ok(command) => command,
                Err(msg) => {
                    out.write_all(format!("{msg}\n{HELP}\n").as_bytes()).await?;
                    out.flush().await?;
                    continue;
                }
            };
            if self.handle(command).await == Flow::Quit {
                break;
            }
            out.write_all(format!("{}\n", self.status()).as_bytes()).await?;
            out.flush().await?;
        }

        info!(date = %self.nav.current_date(), "Browser session ended");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::tests::RecordingOpener;
    use crate::dom::{NEXT_BUTTON, PREV_BUTTON};
    use crate::models::{NewsBundle, NewsItem};
    use crate::repository::LoadError;
    use tempfile::TempDir;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 1, 27).unwrap()
    }

    fn item(title: &str, url: Option<&str>) -> NewsItem {
        NewsItem {
            title: title.to_string(),
            source: "Src".to_string(),
            date: "2026-01-27".to_string(),
            summary: String::new(),
            url: url.map(str::to_string),
        }
    }

    /// Two consulting cards titled after the key; AI always empty.
    struct Stub;

    impl NewsSource for Stub {
        async fn load(&self, key: &str) -> Result<NewsBundle, LoadError> {
            Ok(NewsBundle {
                consulting: Some(vec![
                    item(&format!("first {key}"), Some("https://example.com/first")),
                    item(&format!("second {key}"), None),
                ]),
                ai: Some(vec![]),
                ..NewsBundle::default()
            })
        }
    }

    fn app(dir: &TempDir) -> App<Stub, RecordingOpener> {
        App::new(
            NewsRepository::new(Stub),
            RecordingOpener::default(),
            today(),
            7,
            dir.path().join("out").join("news.html"),
        )
    }

    #[test]
    fn test_command_parse() {
        assert_eq!(Command::parse("p"), Ok(Command::Prev));
        assert_eq!(Command::parse(" next "), Ok(Command::Next));
        assert_eq!(Command::parse("t ai"), Ok(Command::Tab(Category::Ai)));
        assert_eq!(Command::parse("o 2"), Ok(Command::Open(1)));
        assert_eq!(Command::parse("s"), Ok(Command::Show));
        assert_eq!(Command::parse("q"), Ok(Command::Quit));

        assert!(Command::parse("").is_err());
        assert!(Command::parse("o 0").is_err());
        assert!(Command::parse("o x").is_err());
        assert!(Command::parse("t poker").is_err());
        assert!(Command::parse("p 3").is_err());
        assert!(Command::parse("zoom").is_err());
    }

    #[tokio::test]
    async fn test_start_renders_today_and_writes_page() {
        let dir = TempDir::new().unwrap();
        let mut app = app(&dir);
        assert_eq!(app.start().await, Origin::Network);

        let html = std::fs::read_to_string(dir.path().join("out").join("news.html")).unwrap();
        assert!(html.contains("first 2026-01-27"));
        assert!(html.contains("今日"));
        assert!(app.doc.get(NEXT_BUTTON).unwrap().is_disabled());
        assert!(!app.doc.get(PREV_BUTTON).unwrap().is_disabled());
    }

    #[tokio::test]
    async fn test_prev_and_next_reload() {
        let dir = TempDir::new().unwrap();
        let mut app = app(&dir);
        app.start().await;

        app.handle(Command::Next).await;
        assert_eq!(app.navigation().current_date(), today());

        app.handle(Command::Prev).await;
        let container = app.doc.get("consulting-news").unwrap();
        assert!(container.inner_html.contains("first 2026-01-26"));
        assert!(app.status().contains("昨日"));

        for _ in 0..10 {
            app.handle(Command::Prev).await;
        }
        assert_eq!(
            app.navigation().current_date(),
            NaiveDate::from_ymd_opt(2026, 1, 20).unwrap()
        );
        assert!(app.doc.get(PREV_BUTTON).unwrap().is_disabled());
    }

    #[tokio::test]
    async fn test_open_uses_active_tab() {
        let dir = TempDir::new().unwrap();
        let mut app = app(&dir);
        app.start().await;

        app.handle(Command::Open(0)).await;
        app.handle(Command::Open(1)).await;
        app.handle(Command::Open(5)).await;
        assert_eq!(app.opener.opened.borrow().len(), 1);
        assert_eq!(app.opener.opened.borrow()[0].as_str(), "https://example.com/first");

        app.handle(Command::Tab(Category::Ai)).await;
        assert_eq!(app.doc.active_category(), Some(Category::Ai));
        app.handle(Command::Open(0)).await;
        assert_eq!(app.opener.opened.borrow().len(), 1);
    }

    #[tokio::test]
    async fn test_snapshot_clamps_to_window() {
        let dir = TempDir::new().unwrap();
        let mut app = app(&dir);
        app.snapshot(30, Some(Category::Ai)).await;

        assert_eq!(
            app.navigation().current_date(),
            NaiveDate::from_ymd_opt(2026, 1, 20).unwrap()
        );
        assert_eq!(app.doc.active_category(), Some(Category::Ai));
        let html = std::fs::read_to_string(dir.path().join("out").join("news.html")).unwrap();
        assert!(html.contains("1月20日"));
        assert!(html.contains("first 2026-01-20"));
    }

    #[tokio::test]
    async fn test_run_reads_commands_until_quit() {
        let dir = TempDir::new().unwrap();
        let mut app = app(&dir);
        let input = tokio::io::BufReader::new(&b"p\nbogus\n\nt ai\nq\np\n"[..]);
        let mut out = Vec::new();

        app.run(input, &mut out).await.unwrap();

        let printed = String::from_utf8(out).unwrap();
        assert!(printed.contains("unknown command: bogus"));
        assert!(printed.contains("| AI |"));
        // The `p` after `q` is never read.
        assert_eq!(
            app.navigation().current_date(),
            NaiveDate::from_ymd_opt(2026, 1, 26).unwrap()
        );
    }
}
