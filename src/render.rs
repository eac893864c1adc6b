//! News card rendering.
//!
//! Turns [`NewsItem`]s into card markup inside a [`Document`] container. All
//! feed-supplied text is escaped before it becomes markup, and a card only
//! gets a click target when its URL is an absolute `http`/`https` link.

use crate::dom::Document;
use crate::models::{Category, NewsBundle, NewsItem};
use std::fmt::Write;
use tracing::{debug, error};
use url::Url;

/// Placeholder shown when a category has nothing for the selected day.
pub const EMPTY_MESSAGE: &str = "この日のニュースはありません";

/// Escape the five HTML special characters.
///
/// Safe for both text content and double- or single-quoted attribute values.
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// The item's link, if it is one we are willing to open.
///
/// Relative links and other schemes (`javascript:`, `data:` ...) count as no
/// link at all.
pub fn safe_link(item: &NewsItem) -> Option<Url> {
    let raw = item.url.as_deref()?.trim();
    if raw.is_empty() {
        return None;
    }
    match Url::parse(raw) {
        Ok(url) if matches!(url.scheme(), "http" | "https") => Some(url),
        Ok(url) => {
            debug!(scheme = url.scheme(), "Ignoring non-web link");
            None
        }
        Err(e) => {
            debug!(error = %e, "Ignoring unparseable link");
            None
        }
    }
}

/// Markup for a single card.
pub fn news_card_html(item: &NewsItem) -> String {
    let link = safe_link(item);
    let mut html = String::new();

    match &link {
        Some(url) => {
            let href = escape_html(url.as_str());
            let _ = writeln!(html, r#"<article class="news-card" data-url="{href}">"#);
            let _ = writeln!(
                html,
                r#"  <h3 class="news-card__title"><a class="news-card__link" href="{href}" target="_blank" rel="noopener noreferrer">{}</a></h3>"#,
                escape_html(&item.title)
            );
        }
        None => {
            html.push_str("<article class=\"news-card\">\n");
            let _ = writeln!(
                html,
                r#"  <h3 class="news-card__title">{}</h3>"#,
                escape_html(&item.title)
            );
        }
    }
    let _ = writeln!(
        html,
        r#"  <div class="news-card__meta"><span class="news-card__source">{}</span><span class="news-card__date">{}</span></div>"#,
        escape_html(&item.source),
        escape_html(&item.date)
    );
    let _ = writeln!(
        html,
        r#"  <p class="news-card__summary">{}</p>"#,
        escape_html(&item.summary)
    );
    html.push_str("</article>\n");
    html
}

/// Replace the content of `container_id` with cards for `items`.
///
/// An empty or absent list renders the [`EMPTY_MESSAGE`] placeholder. A
/// missing container is logged and skipped; returns whether anything was
/// rendered.
pub fn render_category(doc: &mut Document, container_id: &str, items: Option<&[NewsItem]>) -> bool {
    let Some(container) = doc.get_mut(container_id) else {
        error!(%container_id, "Container not found; skipping render");
        return false;
    };

    match items {
        Some(items) if !items.is_empty() => {
            container.inner_html = items.iter().map(news_card_html).collect();
            container.click_targets = items.iter().map(safe_link).collect();
        }
        _ => {
            container.inner_html = format!("<p class=\"news-empty\">{EMPTY_MESSAGE}</p>\n");
            container.click_targets.clear();
        }
    }
    true
}

/// Render both categories of `bundle` into their containers.
pub fn render_bundle(doc: &mut Document, bundle: &NewsBundle) {
    for category in Category::ALL {
        render_category(doc, category.container_id(), bundle.category(category));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use scraper::{Html, Selector};

    fn item(title: &str, url: Option<&str>) -> NewsItem {
        NewsItem {
            title: title.to_string(),
            source: "Source & Co".to_string(),
            date: "2026-01-27".to_string(),
            summary: "Summary".to_string(),
            url: url.map(str::to_string),
        }
    }

    #[test]
    fn test_escape_html() {
        assert_eq!(
            escape_html(r#"<a href="x">Tom & 'Jerry'</a>"#),
            "&lt;a href=&quot;x&quot;&gt;Tom &amp; &#39;Jerry&#39;&lt;/a&gt;"
        );
        assert_eq!(escape_html("日本語"), "日本語");
    }

    #[test]
    fn test_script_title_is_inert() {
        let mut doc = Document::standard();
        let items = vec![item("<script>alert(1)</script>", None)];
        render_category(&mut doc, "ai-news", Some(items.as_slice()));

        let html = &doc.get("ai-news").unwrap().inner_html;
        assert!(!html.contains("<script>"));
        assert!(html.contains("&lt;script&gt;alert(1)&lt;/script&gt;"));

        let parsed = Html::parse_fragment(html);
        let scripts = Selector::parse("script").unwrap();
        assert_eq!(parsed.select(&scripts).count(), 0);
    }

    #[test]
    fn test_cards_keep_order_and_links() {
        let mut doc = Document::standard();
        let items = vec![
            item("first", Some("https://example.com/1")),
            item("second", None),
            item("third", Some("javascript:alert(1)")),
        ];
        assert!(render_category(&mut doc, "consulting-news", Some(items.as_slice())));

        let container = doc.get("consulting-news").unwrap();
        let parsed = Html::parse_fragment(&container.inner_html);
        let titles = Selector::parse(".news-card__title").unwrap();
        let got: Vec<String> = parsed
            .select(&titles)
            .map(|el| el.text().collect::<String>())
            .collect();
        assert_eq!(got, vec!["first", "second", "third"]);

        let linked = Selector::parse(".news-card[data-url]").unwrap();
        assert_eq!(parsed.select(&linked).count(), 1);
        let anchor = Selector::parse("a.news-card__link").unwrap();
        let a = parsed.select(&anchor).next().unwrap();
        assert_eq!(a.value().attr("target"), Some("_blank"));
        assert_eq!(a.value().attr("rel"), Some("noopener noreferrer"));

        assert_eq!(container.click_targets.len(), 3);
        assert!(container.click_targets[0].is_some());
        assert!(container.click_targets[1].is_none());
        assert!(container.click_targets[2].is_none());
    }

    #[test]
    fn test_url_is_escaped_in_attributes() {
        let card = news_card_html(&item("t", Some("https://example.com/?q=\"><script>")));
        assert!(!card.contains("<script>"));
        let parsed = Html::parse_fragment(&card);
        let scripts = Selector::parse("script").unwrap();
        assert_eq!(parsed.select(&scripts).count(), 0);
    }

    #[test]
    fn test_render_is_idempotent() {
        let mut once = Document::standard();
        let items = vec![item("a", Some("https://example.com/a")), item("b", None)];
        render_category(&mut once, "ai-news", Some(items.as_slice()));

        let mut twice = Document::standard();
        render_category(&mut twice, "ai-news", Some(items.as_slice()));
        render_category(&mut twice, "ai-news", Some(items.as_slice()));

        assert_eq!(once, twice);
    }

    #[test]
    fn test_empty_and_absent_render_placeholder() {
        let mut doc = Document::standard();
        render_category(&mut doc, "ai-news", Some(&[item("old", Some("https://e.com/"))][..]));

        render_category(&mut doc, "ai-news", Some(&[][..]));
        let empty = doc.get("ai-news").unwrap().clone();
        assert!(empty.inner_html.contains(EMPTY_MESSAGE));
        assert!(empty.click_targets.is_empty());

        render_category(&mut doc, "ai-news", None);
        assert_eq!(doc.get("ai-news").unwrap(), &empty);
    }

    #[test]
    fn test_missing_container_is_skipped() {
        let mut doc = Document::standard();
        doc.remove("ai-news");
        let before = doc.clone();
        assert!(!render_category(&mut doc, "ai-news", Some(&[item("x", None)][..])));
        assert_eq!(doc, before);
    }

    #[test]
    fn test_render_bundle_fills_both_containers() {
        let mut doc = Document::standard();
        let bundle = NewsBundle {
            consulting: Some(vec![item("c", None)]),
            ..Default::default()
        };
        render_bundle(&mut doc, &bundle);
        assert!(doc.get("consulting-news").unwrap().inner_html.contains("news-card"));
        assert!(doc.get("ai-news").unwrap().inner_html.contains(EMPTY_MESSAGE));
    }
}
