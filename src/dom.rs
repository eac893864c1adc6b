//! In-memory document: the UI boundary the controllers and render layer write to.
//!
//! Elements are addressed by id, carry a class set, attributes, inner HTML and,
//! for news containers, the click targets of the cards they hold. The page
//! writer in [`crate::outputs::html`] serializes a [`Document`] to a full
//! HTML page.

use crate::models::Category;
use std::collections::{BTreeMap, BTreeSet};
use std::error::Error;
use tracing::{debug, info, instrument, warn};
use url::Url;

pub const CURRENT_DATE: &str = "current-date";
pub const PREV_BUTTON: &str = "prev-date";
pub const NEXT_BUTTON: &str = "next-date";

pub const TAB_BUTTON_CLASS: &str = "tabs__button";
pub const TAB_PANE_CLASS: &str = "tab-pane";
pub const ACTIVE_CLASS: &str = "active";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Element {
    pub tag: &'static str,
    pub classes: BTreeSet<String>,
    pub attributes: BTreeMap<String, String>,
    /// Markup inside the element. Already escaped by whoever set it.
    pub inner_html: String,
    /// One entry per rendered card, in display order; `None` for cards that
    /// have nothing to open.
    pub click_targets: Vec<Option<Url>>,
}

impl Element {
    pub fn new(tag: &'static str) -> Self {
        Self {
            tag,
            ..Default::default()
        }
    }

    pub fn with_class(mut self, class: &str) -> Self {
        self.classes.insert(class.to_string());
        self
    }

    pub fn with_attr(mut self, name: &str, value: &str) -> Self {
        self.set_attr(name, value);
        self
    }

    pub fn has_class(&self, class: &str) -> bool {
        self.classes.contains(class)
    }

    pub fn add_class(&mut self, class: &str) {
        self.classes.insert(class.to_string());
    }

    pub fn remove_class(&mut self, class: &str) {
        self.classes.remove(class);
    }

    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attributes.get(name).map(String::as_str)
    }

    pub fn set_attr(&mut self, name: &str, value: &str) {
        self.attributes.insert(name.to_string(), value.to_string());
    }

    pub fn remove_attr(&mut self, name: &str) {
        self.attributes.remove(name);
    }

    /// Toggle the boolean `disabled` attribute.
    pub fn set_disabled(&mut self, disabled: bool) {
        if disabled {
            self.set_attr("disabled", "");
        } else {
            self.remove_attr("disabled");
        }
    }

    pub fn is_disabled(&self) -> bool {
        self.attributes.contains_key("disabled")
    }
}

/// Opens a card's link in a new top-level browsing context.
pub trait UrlOpener {
    fn open(&self, url: &Url) -> Result<(), Box<dyn Error>>;
}

/// Hands the URL to the desktop's default browser as a separate process, so
/// nothing about this page (referrer, opener handle) travels with it.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemOpener;

impl UrlOpener for SystemOpener {
    fn open(&self, url: &Url) -> Result<(), Box<dyn Error>> {
        open::that_detached(url.as_str())?;
        Ok(())
    }
}

/// What happened when a card was clicked.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClickOutcome {
    Opened(Url),
    /// The card exists but carries no link.
    NoLink,
    /// No such container or no card at that index.
    Missing,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Document {
    elements: BTreeMap<String, Element>,
}

impl Document {
    pub fn new() -> Self {
        Self::default()
    }

    /// The page skeleton: date navigator, one tab button and one pane per
    /// category, and a news container inside each pane. The first category's
    /// tab starts active.
    pub fn standard() -> Self {
        let mut doc = Self::new();
        doc.insert(CURRENT_DATE, Element::new("span").with_class("date-nav__label"));
        let mut prev = Element::new("button")
            .with_class("date-nav__button")
            .with_attr("aria-label", "前の日");
        prev.inner_html = "&lsaquo;".to_string();
        doc.insert(PREV_BUTTON, prev);
        let mut next = Element::new("button")
            .with_class("date-nav__button")
            .with_attr("aria-label", "次の日");
        next.inner_html = "&rsaquo;".to_string();
        doc.insert(NEXT_BUTTON, next);

        for (i, category) in Category::ALL.into_iter().enumerate() {
            let selected = i == 0;
            let mut button = Element::new("button")
                .with_class(TAB_BUTTON_CLASS)
                .with_attr("role", "tab")
                .with_attr("data-tab", category.key())
                .with_attr("aria-selected", if selected { "true" } else { "false" });
            let mut pane = Element::new("section")
                .with_class(TAB_PANE_CLASS)
                .with_attr("role", "tabpanel");
            if selected {
                button.add_class(ACTIVE_CLASS);
                pane.add_class(ACTIVE_CLASS);
            }
            button.inner_html = category.label().to_string();
            doc.insert(category.tab_button_id(), button);
            doc.insert(category.key(), pane);
            doc.insert(
                category.container_id(),
                Element::new("div").with_class("news-list"),
            );
        }
        doc
    }

    pub fn insert(&mut self, id: &str, element: Element) {
        self.elements.insert(id.to_string(), element);
    }

    pub fn remove(&mut self, id: &str) -> Option<Element> {
        self.elements.remove(id)
    }

    pub fn get(&self, id: &str) -> Option<&Element> {
        self.elements.get(id)
    }

    pub fn get_mut(&mut self, id: &str) -> Option<&mut Element> {
        self.elements.get_mut(id)
    }

    /// Ids of every element carrying `class`, in id order.
    pub fn ids_with_class(&self, class: &str) -> Vec<String> {
        self.elements
            .iter()
            .filter(|(_, el)| el.has_class(class))
            .map(|(id, _)| id.clone())
            .collect()
    }

    /// Set the text content of an element; the text is escaped on the way in.
    pub fn set_text(&mut self, id: &str, text: &str) -> bool {
        match self.elements.get_mut(id) {
            Some(el) => {
                el.inner_html = crate::render::escape_html(text);
                true
            }
            None => {
                warn!(%id, "Element not found; text not set");
                false
            }
        }
    }

    /// Ids of panes currently shown.
    pub fn active_panes(&self) -> Vec<String> {
        self.ids_with_class(TAB_PANE_CLASS)
            .into_iter()
            .filter(|id| self.get(id).is_some_and(|el| el.has_class(ACTIVE_CLASS)))
            .collect()
    }

    /// The category whose pane is shown, if exactly one known pane is active.
    pub fn active_category(&self) -> Option<Category> {
        match self.active_panes().as_slice() {
            [only] => Category::from_key(only),
            _ => None,
        }
    }

    /// Follow the click handler of card `index` in `container_id`.
    #[instrument(level = "info", skip(self, opener))]
    pub fn click_card(
        &self,
        container_id: &str,
        index: usize,
        opener: &impl UrlOpener,
    ) -> ClickOutcome {
        let Some(target) = self
            .get(container_id)
            .and_then(|el| el.click_targets.get(index))
        else {
            debug!("No card at that position");
            return ClickOutcome::Missing;
        };
        match target {
            Some(url) => {
                if let Err(e) = opener.open(url) {
                    warn!(%url, error = %e, "Failed to open link");
                } else {
                    info!(%url, "Opened link");
                }
                ClickOutcome::Opened(url.clone())
            }
            None => ClickOutcome::NoLink,
        }
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use std::cell::RefCell;

    /// Records every URL it is asked to open.
    #[derive(Debug, Default)]
    pub(crate) struct RecordingOpener {
        pub opened: RefCell<Vec<Url>>,
    }

    impl UrlOpener for RecordingOpener {
        fn open(&self, url: &Url) -> Result<(), Box<dyn Error>> {
            self.opened.borrow_mut().push(url.clone());
            Ok(())
        }
    }

    #[test]
    fn test_standard_document_has_contract_ids() {
        let doc = Document::standard();
        for id in [
            "consulting-news",
            "ai-news",
            CURRENT_DATE,
            PREV_BUTTON,
            NEXT_BUTTON,
            "tab-consulting",
            "tab-ai",
            "consulting",
            "ai",
        ] {
            assert!(doc.get(id).is_some(), "missing {id}");
        }
        assert_eq!(doc.get("tab-ai").unwrap().attr("data-tab"), Some("ai"));
    }

    #[test]
    fn test_standard_document_starts_on_first_tab() {
        let doc = Document::standard();
        assert_eq!(doc.active_panes(), vec!["consulting".to_string()]);
        assert_eq!(doc.active_category(), Some(Category::Consulting));
        assert_eq!(
            doc.get("tab-consulting").unwrap().attr("aria-selected"),
            Some("true")
        );
    }

    #[test]
    fn test_set_text_escapes() {
        let mut doc = Document::standard();
        assert!(doc.set_text(CURRENT_DATE, "<b>"));
        assert_eq!(doc.get(CURRENT_DATE).unwrap().inner_html, "&lt;b&gt;");
        assert!(!doc.set_text("nope", "x"));
    }

    #[test]
    fn test_disabled_toggle() {
        let mut el = Element::new("button");
        el.set_disabled(true);
        assert!(el.is_disabled());
        el.set_disabled(false);
        assert!(!el.is_disabled());
    }

    #[test]
    fn test_click_card_outcomes() {
        let mut doc = Document::standard();
        let url = Url::parse("https://example.com/a").unwrap();
        doc.get_mut("ai-news").unwrap().click_targets = vec![Some(url.clone()), None];
        let opener = RecordingOpener::default();

        assert_eq!(
            doc.click_card("ai-news", 0, &opener),
            ClickOutcome::Opened(url.clone())
        );
        assert_eq!(doc.click_card("ai-news", 1, &opener), ClickOutcome::NoLink);
        assert_eq!(doc.click_card("ai-news", 2, &opener), ClickOutcome::Missing);
        assert_eq!(doc.click_card("gone", 0, &opener), ClickOutcome::Missing);
        assert_eq!(opener.opened.borrow().as_slice(), &[url]);
    }
}
