//! Tab switching between the category panes.
//!
//! Stateless: everything it needs is on the document. Each tab button names
//! its pane in `data-tab`; activating a button clears `active` from every
//! button and pane, then marks the chosen pair.

use crate::dom::{Document, ACTIVE_CLASS, TAB_BUTTON_CLASS, TAB_PANE_CLASS};
use crate::models::Category;
use tracing::{debug, warn};

/// Activate the tab button `button_id` and the pane it targets.
///
/// Returns `false` without touching the document when the button does not
/// exist or has no `data-tab`. A missing pane still switches the buttons.
pub fn activate_tab(doc: &mut Document, button_id: &str) -> bool {
    let Some(target) = doc
        .get(button_id)
        .filter(|el| el.has_class(TAB_BUTTON_CLASS))
        .and_then(|el| el.attr("data-tab"))
        .map(str::to_string)
    else {
        warn!(%button_id, "Not a tab button");
        return false;
    };

    for id in doc.ids_with_class(TAB_BUTTON_CLASS) {
        if let Some(button) = doc.get_mut(&id) {
            if button.attr("data-tab").is_none() {
                continue;
            }
            button.remove_class(ACTIVE_CLASS);
            button.set_attr("aria-selected", "false");
        }
    }
    for id in doc.ids_with_class(TAB_PANE_CLASS) {
        if let Some(pane) = doc.get_mut(&id) {
            pane.remove_class(ACTIVE_CLASS);
        }
    }

    if let Some(button) = doc.get_mut(button_id) {
        button.add_class(ACTIVE_CLASS);
        button.set_attr("aria-selected", "true");
    }
    match doc.get_mut(&target) {
        Some(pane) => pane.add_class(ACTIVE_CLASS),
        None => warn!(%target, "Tab pane not found"),
    }
    debug!(%button_id, %target, "Switched tab");
    true
}

pub fn activate_category(doc: &mut Document, category: Category) -> bool {
    activate_tab(doc, category.tab_button_id())
}
