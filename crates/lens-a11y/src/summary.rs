//! Element summary for external reviewers
//!
//! The structural description a host may forward to a remote reviewer
//! alongside (never instead of) the local analysis.

use serde::Serialize;

use crate::inspect::{ElementSnapshot, ElementSource};

/// Longest outer HTML kept in a summary, in chars
const MAX_HTML_CHARS: usize = 500;

/// Host-facing description of one element
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ElementSummary {
    pub html: String,
    pub text: String,
    pub tag_name: String,
    pub id: Option<String>,
    pub class_name: Option<String>,
    pub role: Option<String>,
    pub aria_label: Option<String>,
    pub aria_describedby: Option<String>,
    pub tab_index: Option<i32>,
    pub interactive: bool,
    pub has_click_handler: bool,
    pub color: Option<String>,
    pub background_color: Option<String>,
}

impl ElementSummary {
    pub fn build(source: &impl ElementSource, snapshot: &ElementSnapshot) -> Self {
        let html = source.outer_html();
        let html = match html.char_indices().nth(MAX_HTML_CHARS) {
            Some((cut, _)) => format!("{}...", &html[..cut]),
            None => html,
        };

        Self {
            html,
            text: snapshot.text_content.clone(),
            tag_name: snapshot.tag_name.clone(),
            id: snapshot.id.clone(),
            class_name: snapshot.class_name.clone(),
            role: snapshot.explicit_role.clone(),
            aria_label: snapshot.aria_attributes.get("aria-label").cloned(),
            aria_describedby: snapshot.aria_attributes.get("aria-describedby").cloned(),
            tab_index: snapshot.tab_index,
            // Anything a user might click or tab to
            interactive: snapshot.interactive || snapshot.tab_index.is_some() || snapshot.has_click_handler,
            has_click_handler: snapshot.has_click_handler,
            color: snapshot.computed_color.clone(),
            background_color: snapshot.computed_background_color.clone(),
        }
    }
}
