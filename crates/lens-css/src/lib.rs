//! wcag-lens CSS
//!
//! Stylesheet parsing (lightningcss) and a small cascade that computes the
//! properties accessibility checks read: text color, background color,
//! font size and font weight.

mod color;
mod parser;
mod computed;
mod cascade;

pub use color::Color;
pub use parser::CssParser;
pub use computed::{ComputedStyle, parse_font_size, parse_font_weight};
pub use cascade::StyleResolver;

use lens_dom::SelectorList;

/// Parse a CSS stylesheet
pub fn parse_stylesheet(css: &str) -> Result<Stylesheet, CssError> {
    CssParser::new().parse(css)
}

/// Parsed stylesheet
#[derive(Debug, Default)]
pub struct Stylesheet {
    pub rules: Vec<Rule>,
}

impl Stylesheet {
    pub fn new() -> Self {
        Self::default()
    }
}

/// CSS style rule
#[derive(Debug)]
pub struct Rule {
    pub selectors: SelectorList,
    pub declarations: Vec<Declaration>,
}

/// CSS declaration (property: value)
#[derive(Debug, Clone, PartialEq)]
pub struct Declaration {
    /// Lowercase property name
    pub property: String,
    pub value: String,
    pub important: bool,
}

impl Declaration {
    pub fn new(property: &str, value: &str) -> Self {
        Self {
            property: property.to_ascii_lowercase(),
            value: value.trim().to_string(),
            important: false,
        }
    }
}

/// CSS parsing error
#[derive(Debug, thiserror::Error)]
pub enum CssError {
    #[error("Parse error at line {line}: {message}")]
    ParseError { line: u32, message: String },
}
