//! Style Cascade & Resolver
//!
//! Computes the final styles for DOM elements by:
//! 1. Matching selectors against elements
//! 2. Sorting by importance, origin, specificity and source order
//! 3. Inheriting from the parent element's computed style

use lens_dom::{Document, DomTree, NodeId, SelectorList, Specificity};

use crate::computed::ComputedStyle;
use crate::{Color, CssParser, Declaration, Rule, Stylesheet};

/// Cascade origin, lowest precedence first
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
enum Origin {
    UserAgent,
    Author,
    Inline,
}

/// Sort key for one matched declaration
type CascadeKey = (bool, Origin, Specificity, usize);

/// Style resolver - computes styles for DOM elements
pub struct StyleResolver {
    /// User agent stylesheet (browser defaults)
    ua_styles: Stylesheet,
    /// Author stylesheets (page CSS)
    author_styles: Vec<Stylesheet>,
}

impl Default for StyleResolver {
    fn default() -> Self {
        Self::new()
    }
}

impl StyleResolver {
    pub fn new() -> Self {
        Self {
            ua_styles: Self::default_ua_styles(),
            author_styles: Vec::new(),
        }
    }

    /// Resolver loaded with every `<style>` element of `doc`.
    /// Stylesheets that fail to parse are logged and skipped.
    pub fn for_document(doc: &Document) -> Self {
        let mut resolver = Self::new();
        let parser = CssParser::new();
        for (index, css) in doc.style_sources().iter().enumerate() {
            match parser.parse(css) {
                Ok(sheet) => resolver.add_stylesheet(sheet),
                Err(e) => tracing::warn!("Ignoring <style> #{}: {}", index, e),
            }
        }
        resolver
    }

    /// Add an author stylesheet
    pub fn add_stylesheet(&mut self, stylesheet: Stylesheet) {
        self.author_styles.push(stylesheet);
    }

    /// Compute styles for an element
    pub fn compute_style(&self, tree: &DomTree, node_id: NodeId) -> ComputedStyle {
        self.compute_chain(tree, node_id)
            .last()
            .map(|(_, style)| *style)
            .unwrap_or_default()
    }

    /// First non-transparent background on `node_id` or its ancestors.
    /// Falls back to transparent when nothing in the chain paints one.
    pub fn effective_background(&self, tree: &DomTree, node_id: NodeId) -> Color {
        self.compute_chain(tree, node_id)
            .iter()
            .rev()
            .map(|(_, style)| style.background_color)
            .find(|c| !c.is_transparent())
            .unwrap_or(Color::TRANSPARENT)
    }

    /// Computed styles from the outermost element ancestor down to `node_id`
    fn compute_chain(&self, tree: &DomTree, node_id: NodeId) -> Vec<(NodeId, ComputedStyle)> {
        let mut lineage: Vec<NodeId> = tree
            .ancestors(node_id)
            .filter(|id| tree.element(*id).is_some())
            .collect();
        lineage.reverse();
        if tree.element(node_id).is_some() {
            lineage.push(node_id);
        }

        let mut chain: Vec<(NodeId, ComputedStyle)> = Vec::with_capacity(lineage.len());
        let mut parent = ComputedStyle::default();
        for id in lineage {
            let style = self.cascade(tree, id, &parent);
            chain.push((id, style));
            parent = style;
        }
        chain
    }

    fn cascade(&self, tree: &DomTree, node_id: NodeId, parent: &ComputedStyle) -> ComputedStyle {
        let mut matches: Vec<(CascadeKey, &Declaration)> = Vec::new();
        let mut order = 0usize;

        self.collect_matches(tree, node_id, &self.ua_styles, Origin::UserAgent, &mut order, &mut matches);
        for stylesheet in &self.author_styles {
            self.collect_matches(tree, node_id, stylesheet, Origin::Author, &mut order, &mut matches);
        }

        let inline = tree
            .element(node_id)
            .and_then(|e| e.get_attr("style"))
            .map(|style| match CssParser::new().parse_inline(style) {
                Ok(decls) => decls,
                Err(e) => {
                    tracing::debug!("Ignoring style attribute on {:?}: {}", node_id, e);
                    Vec::new()
                }
            })
            .unwrap_or_default();
        for decl in &inline {
            order += 1;
            matches.push(((decl.important, Origin::Inline, Specificity::default(), order), decl));
        }

        matches.sort_by(|a, b| a.0.cmp(&b.0));

        let mut style = ComputedStyle::inherit_from(parent);
        for (_, decl) in matches {
            style.apply_declaration(decl, parent);
        }
        style
    }

    fn collect_matches<'a>(
        &self,
        tree: &DomTree,
        node_id: NodeId,
        stylesheet: &'a Stylesheet,
        origin: Origin,
        order: &mut usize,
        matches: &mut Vec<(CascadeKey, &'a Declaration)>,
    ) {
        for rule in &stylesheet.rules {
            // Highest specificity among the selectors that match
            let specificity = rule
                .selectors
                .0
                .iter()
                .filter(|s| s.matches(tree, node_id))
                .map(|s| s.specificity())
                .max();
            let Some(specificity) = specificity else {
                continue;
            };
            for decl in &rule.declarations {
                *order += 1;
                matches.push(((decl.important, origin, specificity, *order), decl));
            }
        }
    }

    /// Default user-agent styles for the properties we compute
    fn default_ua_styles() -> Stylesheet {
        const UA_RULES: &[(&str, &[(&str, &str)])] = &[
            ("h1", &[("font-size", "2em"), ("font-weight", "bold")]),
            ("h2", &[("font-size", "1.5em"), ("font-weight", "bold")]),
            ("h3", &[("font-size", "1.17em"), ("font-weight", "bold")]),
            ("h4", &[("font-size", "1em"), ("font-weight", "bold")]),
            ("h5", &[("font-size", "0.83em"), ("font-weight", "bold")]),
            ("h6", &[("font-size", "0.67em"), ("font-weight", "bold")]),
            ("b, strong, th", &[("font-weight", "bolder")]),
            ("small", &[("font-size", "smaller")]),
            ("a:link, a[href]", &[("color", "#0000ee")]),
            ("mark", &[("color", "black"), ("background-color", "yellow")]),
        ];

        let rules = UA_RULES
            .iter()
            .filter_map(|(selector, decls)| {
                let selectors = SelectorList::parse(selector).ok()?;
                let declarations = decls.iter().map(|(p, v)| Declaration::new(p, v)).collect();
                Some(Rule { selectors, declarations })
            })
            .collect();
        Stylesheet { rules }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tree_with_paragraph() -> (DomTree, NodeId, NodeId) {
        let mut tree = DomTree::new();
        let root = tree.root();
        let div = tree.create_element("div");
        let p = tree.create_element("p");
        tree.append_child(root, div);
        tree.append_child(div, p);
        (tree, div, p)
    }

    #[test]
    fn test_defaults() {
        let (tree, _, p) = tree_with_paragraph();
        let style = StyleResolver::new().compute_style(&tree, p);
        assert_eq!(style, ComputedStyle::default());
    }

    #[test]
    fn test_specificity_and_order() {
        let (mut tree, _, p) = tree_with_paragraph();
        tree.set_attribute(p, "class", "note");

        let mut resolver = StyleResolver::new();
        resolver.add_stylesheet(crate::parse_stylesheet(".note { color: red } p { color: blue } p { color: green }").unwrap());
        assert_eq!(resolver.compute_style(&tree, p).color, Color::rgb(255, 0, 0));
    }

    #[test]
    fn test_important_beats_inline() {
        let (mut tree, _, p) = tree_with_paragraph();
        tree.set_attribute(p, "style", "color: blue; background-color: white");

        let mut resolver = StyleResolver::new();
        resolver.add_stylesheet(crate::parse_stylesheet("p { color: red !important; background-color: black }").unwrap());
        let style = resolver.compute_style(&tree, p);
        assert_eq!(style.color, Color::rgb(255, 0, 0));
        assert_eq!(style.background_color, Color::WHITE);
    }

    #[test]
    fn test_inheritance() {
        let (tree, _, p) = tree_with_paragraph();
        let mut resolver = StyleResolver::new();
        resolver.add_stylesheet(crate::parse_stylesheet("div { color: #333; background-color: #eee; font-size: 20px }").unwrap());

        let style = resolver.compute_style(&tree, p);
        assert_eq!(style.color, Color::rgb(0x33, 0x33, 0x33));
        assert_eq!(style.font_size, 20.0);
        assert!(style.background_color.is_transparent());
        assert_eq!(resolver.effective_background(&tree, p), Color::rgb(0xee, 0xee, 0xee));
    }

    #[test]
    fn test_heading_ua_defaults() {
        let mut tree = DomTree::new();
        let root = tree.root();
        let h1 = tree.create_element("h1");
        tree.append_child(root, h1);

        let style = StyleResolver::new().compute_style(&tree, h1);
        assert_eq!(style.font_size, 32.0);
        assert_eq!(style.font_weight, 700);
    }
}
