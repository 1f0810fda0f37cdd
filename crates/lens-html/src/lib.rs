//! wcag-lens HTML Parser
//!
//! HTML5 parsing built on html5ever. Produces `lens_dom::Document`s.

mod parser;

pub use lens_dom::Document;
pub use parser::HtmlParser;

use std::path::Path;

/// Parse an HTML string into a Document
pub fn parse(html: &str) -> Result<Document, HtmlError> {
    HtmlParser::new().parse(html)
}

/// Read and parse an HTML file; the document URL is the file path
pub fn parse_file(path: &Path) -> Result<Document, HtmlError> {
    let html = std::fs::read_to_string(path).map_err(|source| HtmlError::Read {
        path: path.display().to_string(),
        source,
    })?;
    HtmlParser::new().parse_with_url(&html, &format!("file://{}", path.display()))
}

/// HTML parse error
#[derive(Debug, thiserror::Error)]
pub enum HtmlError {
    #[error("Failed to read {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("HTML tokenizer failed: {0}")]
    Tokenizer(#[from] std::io::Error),
}
