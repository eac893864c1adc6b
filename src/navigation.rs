//! Day-by-day date navigation.
//!
//! [`NavigationController`] owns the only mutable navigation state: the day
//! being shown. It is created once per session and handed to whoever
//! processes user input, so there is exactly one writer.
//!
//! # Bounds
//!
//! ```text
//! today - max_days_back  ...  today - 1   today
//!   ^ prev disabled                         ^ next disabled
//! ```
//!
//! `prev` is allowed while the current day is within the lookback window
//! ([`is_within_range`]); the step that leaves the window lands on
//! `today - max_days_back`, where the previous control becomes disabled.
//! `next` is allowed only while the current day is before today.
//!
//! # Stale loads
//!
//! Every load is started with [`NavigationController::begin_load`], which
//! stamps it with a generation number. A result whose generation is no longer
//! current is dropped in [`NavigationController::finish_load`], so a slow
//! response for a day the user has already left never overwrites fresher
//! content.

use crate::dates::{format_label, is_same_day, is_within_range};
use crate::dom::{Document, CURRENT_DATE, NEXT_BUTTON, PREV_BUTTON};
use crate::models::{LoadedNews, Origin};
use crate::render::render_bundle;
use crate::repository::{NewsRepository, NewsSource};
use chrono::{Duration, NaiveDate};
use tracing::{debug, info, instrument, warn};

/// Default lookback window in days.
pub const MAX_DAYS_BACK: i64 = 7;

/// A pending news load for one day.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadTicket {
    pub date: NaiveDate,
    pub generation: u64,
}

/// The day being shown, bounded to `today - max_days_back ..= today`, plus
/// the bookkeeping that keeps stale loads off the page.
#[derive(Debug, Clone)]
pub struct NavigationController {
    today: NaiveDate,
    current: NaiveDate,
    max_days_back: i64,
    generation: u64,
    last_origin: Option<Origin>,
}

impl NavigationController {
    /// Start on `today`, which stays fixed for the controller's lifetime.
    pub fn new(today: NaiveDate, max_days_back: i64) -> Self {
        Self {
            today,
            current: today,
            max_days_back,
            generation: 0,
            last_origin: None,
        }
    }

    pub fn today(&self) -> NaiveDate {
        self.today
    }

    pub fn current_date(&self) -> NaiveDate {
        self.current
    }

    /// Origin of the most recently rendered bundle.
    pub fn last_origin(&self) -> Option<Origin> {
        self.last_origin
    }

    pub fn can_go_prev(&self) -> bool {
        is_within_range(self.current, self.today, self.max_days_back)
    }

    pub fn can_go_next(&self) -> bool {
        self.current < self.today
    }

    /// Step one day back. Returns `false` (state unchanged) at the lower bound.
    pub fn prev(&mut self) -> bool {
        if !self.can_go_prev() {
            debug!(current = %self.current, "Already at the oldest day");
            return false;
        }
        self.current = self.current - Duration::days(1);
        true
    }

    /// Step one day forward. Returns `false` (state unchanged) on today.
    pub fn next(&mut self) -> bool {
        if !self.can_go_next() {
            debug!(current = %self.current, "Already on today");
            return false;
        }
        self.current = self.current + Duration::days(1);
        true
    }

    /// Update the date label and the enabled state of both controls.
    pub fn refresh_controls(&self, doc: &mut Document) {
        doc.set_text(CURRENT_DATE, &format_label(self.current, self.today));

        match doc.get_mut(PREV_BUTTON) {
            Some(el) => el.set_disabled(!self.can_go_prev()),
            None => warn!(id = PREV_BUTTON, "Control not found"),
        }
        match doc.get_mut(NEXT_BUTTON) {
            Some(el) => el.set_disabled(is_same_day(self.current, self.today)),
            None => warn!(id = NEXT_BUTTON, "Control not found"),
        }
    }

    /// Start a load for the current day; supersedes any load still pending.
    pub fn begin_load(&mut self) -> LoadTicket {
        self.generation += 1;
        LoadTicket {
            date: self.current,
            generation: self.generation,
        }
    }

    /// Render `loaded` if `ticket` is still the latest load.
    ///
    /// Returns `false` and leaves the document untouched for stale tickets.
    #[instrument(level = "debug", skip(self, loaded, doc), fields(date = %ticket.date))]
    pub fn finish_load(&mut self, ticket: LoadTicket, loaded: LoadedNews, doc: &mut Document) -> bool {
        if ticket.generation != self.generation || ticket.date != self.current {
            info!(
                generation = ticket.generation,
                latest = self.generation,
                "Discarding stale news result"
            );
            return false;
        }
        render_bundle(doc, &loaded.data);
        self.last_origin = Some(loaded.origin);
        true
    }

    /// Refresh the controls, then load and render the current day's news.
    #[instrument(level = "info", skip_all, fields(date = %self.current))]
    pub async fn show_current<S: NewsSource>(
        &mut self,
        repo: &NewsRepository<S>,
        doc: &mut Document,
    ) -> Origin {
        self.refresh_controls(doc);
        let ticket = self.begin_load();
        let loaded = repo.fetch_news_for_date(ticket.date).await;
        let origin = loaded.origin;
        self.finish_load(ticket, loaded, doc);
        origin
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fallback::fallback_bundle;
    use crate::models::{Category, NewsBundle, NewsItem};
    use crate::render::EMPTY_MESSAGE;
    use crate::repository::LoadError;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn today() -> NaiveDate {
        ymd(2026, 1, 27)
    }

    fn is_disabled(doc: &Document, id: &str) -> bool {
        doc.get(id).unwrap().is_disabled()
    }

    /// Serves a one-item bundle whose title is the requested key.
    struct KeyEcho;

    impl NewsSource for KeyEcho {
        async fn load(&self, key: &str) -> Result<NewsBundle, LoadError> {
            Ok(NewsBundle {
                ai: Some(vec![NewsItem {
                    title: format!("news for {key}"),
                    source: "echo".to_string(),
                    date: key.to_string(),
                    summary: String::new(),
                    url: None,
                }]),
                ..Default::default()
            })
        }
    }

    struct Failing;

    impl NewsSource for Failing {
        async fn load(&self, _key: &str) -> Result<NewsBundle, LoadError> {
            Err(LoadError::Transport("offline".to_string()))
        }
    }

    #[test]
    fn test_next_on_today_is_noop() {
        let mut nav = NavigationController::new(today(), MAX_DAYS_BACK);
        assert!(!nav.next());
        assert_eq!(nav.current_date(), today());
    }

    #[test]
    fn test_prev_walks_to_lower_bound() {
        let mut nav = NavigationController::new(today(), MAX_DAYS_BACK);
        let mut doc = Document::standard();

        for step in 1..=MAX_DAYS_BACK {
            assert!(!is_disabled_after_refresh(&nav, &mut doc, PREV_BUTTON));
            assert!(nav.prev(), "step {step} should move");
        }
        assert_eq!(nav.current_date(), ymd(2026, 1, 20));

        nav.refresh_controls(&mut doc);
        assert!(is_disabled(&doc, PREV_BUTTON));
        assert_eq!(
            is_disabled(&doc, PREV_BUTTON),
            !is_within_range(nav.current_date(), today(), MAX_DAYS_BACK)
        );

        assert!(!nav.prev());
        assert_eq!(nav.current_date(), ymd(2026, 1, 20));
    }

    fn is_disabled_after_refresh(nav: &NavigationController, doc: &mut Document, id: &str) -> bool {
        nav.refresh_controls(doc);
        is_disabled(doc, id)
    }

    #[test]
    fn test_next_never_passes_today() {
        let mut nav = NavigationController::new(today(), MAX_DAYS_BACK);
        nav.prev();
        nav.prev();
        assert!(nav.next());
        assert!(nav.next());
        assert!(!nav.next());
        assert_eq!(nav.current_date(), today());
    }

    #[test]
    fn test_controls_and_label() {
        let mut nav = NavigationController::new(today(), MAX_DAYS_BACK);
        let mut doc = Document::standard();

        nav.refresh_controls(&mut doc);
        assert_eq!(doc.get(CURRENT_DATE).unwrap().inner_html, "今日");
        assert!(is_disabled(&doc, NEXT_BUTTON));
        assert!(!is_disabled(&doc, PREV_BUTTON));

        nav.prev();
        nav.refresh_controls(&mut doc);
        assert_eq!(doc.get(CURRENT_DATE).unwrap().inner_html, "昨日");
        assert!(!is_disabled(&doc, NEXT_BUTTON));

        nav.prev();
        nav.refresh_controls(&mut doc);
        assert_eq!(doc.get(CURRENT_DATE).unwrap().inner_html, "1月25日");
    }

    #[test]
    fn test_refresh_tolerates_missing_controls() {
        let nav = NavigationController::new(today(), MAX_DAYS_BACK);
        let mut doc = Document::standard();
        doc.remove(PREV_BUTTON);
        doc.remove(NEXT_BUTTON);
        nav.refresh_controls(&mut doc);
        assert_eq!(doc.get(CURRENT_DATE).unwrap().inner_html, "今日");
    }

    #[test]
    fn test_stale_result_is_discarded() {
        let mut nav = NavigationController::new(today(), MAX_DAYS_BACK);
        let mut doc = Document::standard();

        let stale = nav.begin_load();
        nav.prev();
        let fresh = nav.begin_load();

        let fresh_bundle = NewsBundle {
            ai: Some(vec![]),
            consulting: Some(vec![]),
            ..Default::default()
        };
        assert!(nav.finish_load(
            fresh,
            LoadedNews {
                data: fresh_bundle,
                origin: Origin::Network
            },
            &mut doc
        ));
        let after_fresh = doc.clone();

        // The older request resolves last and must not overwrite.
        assert!(!nav.finish_load(
            stale,
            LoadedNews {
                data: fallback_bundle(),
                origin: Origin::Fallback
            },
            &mut doc
        ));
        assert_eq!(doc, after_fresh);
        assert!(doc.get("ai-news").unwrap().inner_html.contains(EMPTY_MESSAGE));
        assert_eq!(nav.last_origin(), Some(Origin::Network));
    }

    #[tokio::test]
    async fn test_show_current_renders_requested_day() {
        let mut nav = NavigationController::new(today(), MAX_DAYS_BACK);
        let mut doc = Document::standard();
        let repo = NewsRepository::new(KeyEcho);

        assert_eq!(nav.show_current(&repo, &mut doc).await, Origin::Network);
        assert!(doc.get("ai-news").unwrap().inner_html.contains("news for 2026-01-27"));
        assert!(doc
            .get(Category::Consulting.container_id())
            .unwrap()
            .inner_html
            .contains(EMPTY_MESSAGE));

        nav.prev();
        nav.show_current(&repo, &mut doc).await;
        assert!(doc.get("ai-news").unwrap().inner_html.contains("news for 2026-01-26"));
    }

    #[tokio::test]
    async fn test_show_current_uses_fallback_when_offline() {
        let mut nav = NavigationController::new(today(), MAX_DAYS_BACK);
        let mut doc = Document::standard();
        let repo = NewsRepository::new(Failing);

        assert_eq!(nav.show_current(&repo, &mut doc).await, Origin::Fallback);
        assert_eq!(nav.last_origin(), Some(Origin::Fallback));
        let cards = &doc.get("consulting-news").unwrap().click_targets;
        assert_eq!(cards.len(), 5);
    }
}
