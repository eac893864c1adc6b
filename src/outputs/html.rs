//! HTML page output.
//!
//! Serializes a [`Document`] into a standalone page: header with the date
//! navigator, the tab bar, and one pane per category holding its news list.
//! The page carries no script; card links open through plain anchors with
//! `target="_blank" rel="noopener noreferrer"`.

use crate::dom::{Document, Element, ACTIVE_CLASS, CURRENT_DATE, NEXT_BUTTON, PREV_BUTTON};
use crate::models::Category;
use crate::navigation::NavigationController;
use crate::render::escape_html;
use itertools::Itertools;
use std::error::Error;
use std::fmt::Write;
use std::path::Path;
use tokio::fs;
use tracing::{info, instrument};

const PAGE_TITLE: &str = "コンサル業界・AI最新ニュース";

/// Opening tag with id, classes and attributes, all escaped.
fn open_tag(id: &str, el: &Element) -> String {
    let mut tag = format!("<{} id=\"{}\"", el.tag, escape_html(id));
    if !el.classes.is_empty() {
        let _ = write!(tag, " class=\"{}\"", escape_html(&el.classes.iter().join(" ")));
    }
    for (name, value) in &el.attributes {
        if value.is_empty() {
            let _ = write!(tag, " {}", escape_html(name));
        } else {
            let _ = write!(tag, " {}=\"{}\"", escape_html(name), escape_html(value));
        }
    }
    tag.push('>');
    tag
}

/// `<tag ...>inner</tag>`, or nothing when the element is absent.
fn element_html(doc: &Document, id: &str) -> String {
    match doc.get(id) {
        Some(el) => format!("{}{}</{}>", open_tag(id, el), el.inner_html, el.tag),
        None => String::new(),
    }
}

/// The full page for the current state of `doc`.
pub fn render_page(doc: &Document) -> String {
    let mut page = String::new();
    page.push_str("<!DOCTYPE html>\n<html lang=\"ja\">\n<head>\n");
    page.push_str("<meta charset=\"utf-8\">\n");
    page.push_str("<meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">\n");
    page.push_str("<meta name=\"referrer\" content=\"no-referrer\">\n");
    let _ = writeln!(page, "<title>{PAGE_TITLE}</title>");
    page.push_str("</head>\n<body>\n<header class=\"header\">\n");
    let _ = writeln!(page, "<h1 class=\"header__title\">{PAGE_TITLE}</h1>");

    let _ = writeln!(
        page,
        "<nav class=\"date-nav\">{}{}{}</nav>",
        element_html(doc, PREV_BUTTON),
        element_html(doc, CURRENT_DATE),
        element_html(doc, NEXT_BUTTON),
    );
    page.push_str("</header>\n");

    page.push_str("<div class=\"tabs\" role=\"tablist\">\n");
    for category in Category::ALL {
        let _ = writeln!(page, "{}", element_html(doc, category.tab_button_id()));
    }
    page.push_str("</div>\n<main>\n");

    for category in Category::ALL {
        let pane_id = category.key();
        let list = element_html(doc, category.container_id());
        match doc.get(pane_id) {
            Some(pane) => {
                let mut pane = pane.clone();
                if !pane.has_class(ACTIVE_CLASS) {
                    pane.set_attr("hidden", "");
                }
                let _ = writeln!(page, "{}\n{list}\n</{}>", open_tag(pane_id, &pane), pane.tag);
            }
            None => {
                let _ = writeln!(page, "{list}");
            }
        }
    }
    page.push_str("</main>\n</body>\n</html>\n");
    page
}

/// Write the page for `doc` to `path`.
#[instrument(level = "debug", skip(doc), fields(path = %path.display()))]
pub async fn write_page(doc: &Document, path: &Path) -> Result<(), Box<dyn Error>> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).await?;
    }
    let html = render_page(doc);
    fs::write(path, &html).await?;
    info!(bytes = html.len(), "Wrote page");
    Ok(())
}

/// One-line terminal summary: navigator state, active tab and its card count.
pub fn status_line(doc: &Document, nav: &NavigationController) -> String {
    let arrow = |id: &str, symbol: &str| match doc.get(id) {
        Some(el) if !el.is_disabled() => format!("[{symbol}]"),
        _ => " - ".to_string(),
    };
    let tab = doc.active_category();
    let cards = tab
        .and_then(|c| doc.get(c.container_id()))
        .map_or(0, |el| el.click_targets.len());
    let origin = nav
        .last_origin()
        .map(|o| format!(" ({o})"))
        .unwrap_or_default();
    format!(
        "{} {} {} {} | {} | {} 件{}",
        arrow(PREV_BUTTON, "<"),
        crate::dates::format_label(nav.current_date(), nav.today()),
        crate::dates::format_key(nav.current_date()),
        arrow(NEXT_BUTTON, ">"),
        tab.map_or("-", |c| c.label()),
        cards,
        origin
    )
}
