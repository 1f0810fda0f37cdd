//! CSS Parser using lightningcss
//!
//! Parses stylesheets and `style` attributes into our internal representation.
//! Values are kept as lightningcss serializes them; `computed` interprets them.

use lens_dom::SelectorList;
use lightningcss::declaration::DeclarationBlock;
use lightningcss::printer::PrinterOptions;
use lightningcss::properties::Property;
use lightningcss::rules::CssRule;
use lightningcss::stylesheet::{ParserOptions, StyleAttribute, StyleSheet};
use lightningcss::traits::ToCss;

use crate::{CssError, Declaration, Rule, Stylesheet};

/// CSS Parser
#[derive(Debug, Clone, Copy, Default)]
pub struct CssParser;

impl CssParser {
    pub fn new() -> Self {
        Self
    }

    fn options<'i>() -> ParserOptions<'i> {
        ParserOptions {
            error_recovery: true,
            ..ParserOptions::default()
        }
    }

    /// Parse a CSS stylesheet
    pub fn parse(&self, css: &str) -> Result<Stylesheet, CssError> {
        let stylesheet = StyleSheet::parse(css, Self::options()).map_err(|e| CssError::ParseError {
            line: e.loc.as_ref().map(|l| l.line + 1).unwrap_or(0),
            message: e.kind.to_string(),
        })?;

        let mut result = Stylesheet::new();
        for rule in stylesheet.rules.0.iter() {
            if let Some(converted) = self.convert_rule(rule) {
                result.rules.push(converted);
            }
        }

        tracing::debug!("Parsed stylesheet with {} style rules", result.rules.len());
        Ok(result)
    }

    /// Parse the contents of a `style` attribute
    pub fn parse_inline(&self, style: &str) -> Result<Vec<Declaration>, CssError> {
        let attr = StyleAttribute::parse(style, Self::options()).map_err(|e| CssError::ParseError {
            line: 0,
            message: e.kind.to_string(),
        })?;
        Ok(self.convert_declarations(&attr.declarations))
    }

    fn convert_rule(&self, rule: &CssRule) -> Option<Rule> {
        match rule {
            CssRule::Style(style_rule) => {
                let text = match style_rule.selectors.to_css_string(PrinterOptions::default()) {
                    Ok(text) => text,
                    Err(e) => {
                        tracing::warn!("Could not serialize selector: {}", e);
                        return None;
                    }
                };
                let selectors = match SelectorList::parse(&text) {
                    Ok(selectors) => selectors,
                    Err(e) => {
                        tracing::debug!("Skipping rule: {}", e);
                        return None;
                    }
                };
                let declarations = self.convert_declarations(&style_rule.declarations);
                Some(Rule { selectors, declarations })
            }
            // Media queries, keyframes, etc. are not evaluated
            _ => None,
        }
    }

    fn convert_declarations(&self, block: &DeclarationBlock) -> Vec<Declaration> {
        let normal = block.declarations.iter().map(|p| (p, false));
        let important = block.important_declarations.iter().map(|p| (p, true));
        normal
            .chain(important)
            .filter_map(|(prop, important)| self.convert_declaration(prop, important))
            .collect()
    }

    fn convert_declaration(&self, prop: &Property, important: bool) -> Option<Declaration> {
        let property = prop.property_id().name().to_ascii_lowercase();
        let value = prop.value_to_css_string(PrinterOptions::default()).ok()?;
        Some(Declaration { property, value, important })
    }
}
