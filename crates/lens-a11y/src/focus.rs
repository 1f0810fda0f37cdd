//! Keyboard focus

use serde::Serialize;

use crate::inspect::ElementSnapshot;

/// Tags that take keyboard focus without a tabindex
const FOCUSABLE_TAGS: &[&str] = &["a", "button", "input", "select", "textarea", "details", "summary"];

/// Reachable by keyboard: focusable tag, `tabindex >= 0`, or contenteditable
pub fn is_keyboard_accessible(snapshot: &ElementSnapshot) -> bool {
    FOCUSABLE_TAGS.contains(&snapshot.tag_name.as_str())
        || snapshot.tab_index.is_some_and(|t| t >= 0)
        || snapshot.content_editable
}

/// Focus-management summary
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct FocusSummary {
    pub focusable: bool,
    pub tab_index: Option<i32>,
    /// Focusable and not pulled out of the tab sequence by a negative tabindex
    pub focus_visible: bool,
}

impl FocusSummary {
    pub fn from_snapshot(snapshot: &ElementSnapshot) -> Self {
        let focusable = is_keyboard_accessible(snapshot);
        Self {
            focusable,
            tab_index: snapshot.tab_index,
            focus_visible: focusable && snapshot.tab_index.is_none_or(|t| t >= 0),
        }
    }

    /// Positive tabindex jumps ahead of document order
    pub fn overrides_order(&self) -> bool {
        self.tab_index.is_some_and(|t| t > 0)
    }
}
