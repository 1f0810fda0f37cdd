//! Selector parsing and matching
//!
//! Supports the subset of CSS selectors needed to pick elements and to match
//! stylesheet rules: type, class, id, universal, attribute selectors, a few
//! structural pseudo-classes, and the four combinators.

use crate::{DomError, DomTree, ElementData, NodeId};

/// Part of a compound selector
#[derive(Debug, Clone, PartialEq)]
pub enum SelectorPart {
    /// Type selector (div, span, etc)
    Type(String),
    /// Class selector (.class)
    Class(String),
    /// ID selector (#id)
    Id(String),
    /// Universal selector (*)
    Universal,
    /// Attribute selector ([attr=value])
    Attribute { name: String, op: AttrOp, value: String },
    /// Pseudo-class (:first-child)
    PseudoClass(String),
    /// Pseudo-element (::before) - never matches an element
    PseudoElement(String),
}

/// Attribute selector operators
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttrOp {
    Exists,     // [attr]
    Equals,     // [attr=value]
    Contains,   // [attr*=value]
    StartsWith, // [attr^=value]
    EndsWith,   // [attr$=value]
    Includes,   // [attr~=value]
    DashMatch,  // [attr|=value]
}

/// Selector combinators
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Combinator {
    /// Descendant (space)
    Descendant,
    /// Direct child (>)
    Child,
    /// Adjacent sibling (+)
    NextSibling,
    /// General sibling (~)
    SubsequentSibling,
}

/// Selector specificity (ids, classes, types)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Specificity(pub u32, pub u32, pub u32);

impl Specificity {
    pub fn new(ids: u32, classes: u32, types: u32) -> Self {
        Self(ids, classes, types)
    }
}

/// One complex selector: compounds joined by combinators
#[derive(Debug, Clone, PartialEq)]
pub struct Selector {
    /// Original selector text
    pub text: String,
    /// Compound selectors, left to right
    compounds: Vec<Vec<SelectorPart>>,
    /// `combinators[i]` joins `compounds[i]` and `compounds[i + 1]`
    combinators: Vec<Combinator>,
}

/// Comma-separated selector list
#[derive(Debug, Clone, PartialEq)]
pub struct SelectorList(pub Vec<Selector>);

impl SelectorList {
    /// Parse `a, b > c` style lists
    pub fn parse(text: &str) -> Result<Self, DomError> {
        let selectors = split_top_level(text)
            .into_iter()
            .map(Selector::parse)
            .collect::<Result<Vec<_>, _>>()?;
        if selectors.is_empty() {
            return Err(invalid(text, "empty selector list"));
        }
        Ok(Self(selectors))
    }

    /// True if any selector in the list matches
    pub fn matches(&self, tree: &DomTree, node: NodeId) -> bool {
        self.0.iter().any(|s| s.matches(tree, node))
    }
}

impl Selector {
    /// Parse one complex selector
    pub fn parse(text: &str) -> Result<Self, DomError> {
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return Err(invalid(text, "empty selector"));
        }

        let mut parser = Parser { src: trimmed, chars: trimmed.char_indices().peekable() };
        let mut compounds = vec![parser.compound()?];
        let mut combinators = Vec::new();

        loop {
            let had_space = parser.skip_whitespace();
            let combinator = match parser.peek() {
                None => break,
                Some('>') => Combinator::Child,
                Some('+') => Combinator::NextSibling,
                Some('~') => Combinator::SubsequentSibling,
                Some(_) if had_space => Combinator::Descendant,
                Some(c) => return Err(invalid(trimmed, &format!("unexpected `{c}`"))),
            };
            if combinator != Combinator::Descendant {
                parser.bump();
                parser.skip_whitespace();
            }
            combinators.push(combinator);
            compounds.push(parser.compound()?);
        }

        Ok(Self { text: trimmed.to_string(), compounds, combinators })
    }

    /// Specificity per selectors level 3
    pub fn specificity(&self) -> Specificity {
        let mut spec = Specificity::default();
        for part in self.compounds.iter().flatten() {
            match part {
                SelectorPart::Id(_) => spec.0 += 1,
                SelectorPart::Class(_) | SelectorPart::Attribute { .. } | SelectorPart::PseudoClass(_) => {
                    spec.1 += 1
                }
                SelectorPart::Type(_) | SelectorPart::PseudoElement(_) => spec.2 += 1,
                SelectorPart::Universal => {}
            }
        }
        spec
    }

    /// Check if this selector matches `node`
    pub fn matches(&self, tree: &DomTree, node: NodeId) -> bool {
        match self.compounds.len() {
            0 => false,
            n => self.matches_from(tree, node, n - 1),
        }
    }

    /// Right-to-left matching with backtracking over descendant/sibling hops
    fn matches_from(&self, tree: &DomTree, node: NodeId, index: usize) -> bool {
        if !matches_compound(tree, node, &self.compounds[index]) {
            return false;
        }
        if index == 0 {
            return true;
        }

        match self.combinators[index - 1] {
            Combinator::Child => tree
                .parent_element(node)
                .is_some_and(|p| self.matches_from(tree, p, index - 1)),
            Combinator::Descendant => tree
                .ancestors(node)
                .filter(|&a| tree.element(a).is_some())
                .any(|a| self.matches_from(tree, a, index - 1)),
            Combinator::NextSibling => tree
                .previous_element_sibling(node)
                .is_some_and(|s| self.matches_from(tree, s, index - 1)),
            Combinator::SubsequentSibling => {
                let mut current = tree.previous_element_sibling(node);
                while let Some(sibling) = current {
                    if self.matches_from(tree, sibling, index - 1) {
                        return true;
                    }
                    current = tree.previous_element_sibling(sibling);
                }
                false
            }
        }
    }
}

fn matches_compound(tree: &DomTree, node: NodeId, parts: &[SelectorPart]) -> bool {
    let Some(elem) = tree.element(node) else {
        return false;
    };
    parts.iter().all(|part| match part {
        SelectorPart::Type(tag) => elem.tag().eq_ignore_ascii_case(tag),
        SelectorPart::Class(class) => elem.has_class(class),
        SelectorPart::Id(id) => elem.id.as_deref() == Some(id.as_str()),
        SelectorPart::Universal => true,
        SelectorPart::Attribute { name, op, value } => matches_attribute(elem, name, *op, value),
        SelectorPart::PseudoClass(pseudo) => matches_pseudo_class(tree, node, pseudo),
        SelectorPart::PseudoElement(_) => false,
    })
}

fn matches_attribute(elem: &ElementData, name: &str, op: AttrOp, expected: &str) -> bool {
    let Some(actual) = elem.get_attr(name) else {
        return false;
    };

    match op {
        AttrOp::Exists => true,
        AttrOp::Equals => actual == expected,
        AttrOp::Contains => !expected.is_empty() && actual.contains(expected),
        AttrOp::StartsWith => !expected.is_empty() && actual.starts_with(expected),
        AttrOp::EndsWith => !expected.is_empty() && actual.ends_with(expected),
        AttrOp::Includes => actual.split_whitespace().any(|w| w == expected),
        AttrOp::DashMatch => actual == expected || actual.starts_with(&format!("{expected}-")),
    }
}

fn matches_pseudo_class(tree: &DomTree, node: NodeId, pseudo: &str) -> bool {
    match pseudo {
        "first-child" => tree.previous_element_sibling(node).is_none(),
        "last-child" => tree.next_element_sibling(node).is_none(),
        "only-child" => {
            tree.previous_element_sibling(node).is_none() && tree.next_element_sibling(node).is_none()
        }
        "empty" => tree.children(node).next().is_none(),
        "root" => tree.parent(node) == Some(tree.root()),
        // Dynamic states (hover, focus, ...) never hold for a static document
        _ => false,
    }
}

fn invalid(selector: &str, message: &str) -> DomError {
    DomError::InvalidSelector { selector: selector.to_string(), message: message.to_string() }
}

/// Split on commas that are not inside brackets, parentheses or quotes
fn split_top_level(text: &str) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut depth = 0usize;
    let mut quote: Option<char> = None;
    let mut start = 0;

    for (i, c) in text.char_indices() {
        match (quote, c) {
            (Some(q), _) if c == q => quote = None,
            (Some(_), _) => {}
            (None, '"' | '\'') => quote = Some(c),
            (None, '[' | '(') => depth += 1,
            (None, ']' | ')') => depth = depth.saturating_sub(1),
            (None, ',') if depth == 0 => {
                parts.push(&text[start..i]);
                start = i + 1;
            }
            _ => {}
        }
    }
    parts.push(&text[start..]);
    parts
}

struct Parser<'a> {
    src: &'a str,
    chars: std::iter::Peekable<std::str::CharIndices<'a>>,
}

impl Parser<'_> {
    fn peek(&mut self) -> Option<char> {
        self.chars.peek().map(|&(_, c)| c)
    }

    fn bump(&mut self) -> Option<char> {
        self.chars.next().map(|(_, c)| c)
    }

    fn skip_whitespace(&mut self) -> bool {
        let mut skipped = false;
        while self.peek().is_some_and(char::is_whitespace) {
            self.bump();
            skipped = true;
        }
        skipped
    }

    fn error(&self, message: &str) -> DomError {
        invalid(self.src, message)
    }

    fn ident(&mut self) -> Result<String, DomError> {
        let mut out = String::new();
        while let Some(c) = self.peek() {
            if c.is_alphanumeric() || c == '-' || c == '_' || !c.is_ascii() {
                out.push(c);
                self.bump();
            } else if c == '\\' {
                self.bump();
                if let Some(escaped) = self.bump() {
                    out.push(escaped);
                }
            } else {
                break;
            }
        }
        if out.is_empty() {
            return Err(self.error("expected identifier"));
        }
        Ok(out)
    }

    fn compound(&mut self) -> Result<Vec<SelectorPart>, DomError> {
        let mut parts = Vec::new();
        loop {
            match self.peek() {
                Some('*') => {
                    self.bump();
                    parts.push(SelectorPart::Universal);
                }
                Some('#') => {
                    self.bump();
                    parts.push(SelectorPart::Id(self.ident()?));
                }
                Some('.') => {
                    self.bump();
                    parts.push(SelectorPart::Class(self.ident()?));
                }
                Some('[') => {
                    self.bump();
                    parts.push(self.attribute()?);
                }
                Some(':') => {
                    self.bump();
                    if self.peek() == Some(':') {
                        self.bump();
                        parts.push(SelectorPart::PseudoElement(self.ident()?.to_ascii_lowercase()));
                    } else {
                        let name = self.ident()?.to_ascii_lowercase();
                        if self.peek() == Some('(') {
                            self.skip_parenthesized();
                        }
                        parts.push(SelectorPart::PseudoClass(name));
                    }
                }
                Some(c) if c.is_alphabetic() || c == '_' || c == '-' => {
                    parts.push(SelectorPart::Type(self.ident()?.to_ascii_lowercase()));
                }
                _ => break,
            }
        }
        if parts.is_empty() {
            return Err(self.error("expected a simple selector"));
        }
        Ok(parts)
    }

    fn skip_parenthesized(&mut self) {
        let mut depth = 0usize;
        while let Some(c) = self.bump() {
            match c {
                '(' => depth += 1,
                ')' => {
                    depth = depth.saturating_sub(1);
                    if depth == 0 {
                        return;
                    }
                }
                _ => {}
            }
        }
    }

    fn attribute(&mut self) -> Result<SelectorPart, DomError> {
        self.skip_whitespace();
        let name = self.ident()?.to_ascii_lowercase();
        self.skip_whitespace();

        let op = match self.peek() {
            Some(']') => {
                self.bump();
                return Ok(SelectorPart::Attribute { name, op: AttrOp::Exists, value: String::new() });
            }
            Some('=') => AttrOp::Equals,
            Some('*') => AttrOp::Contains,
            Some('^') => AttrOp::StartsWith,
            Some('$') => AttrOp::EndsWith,
            Some('~') => AttrOp::Includes,
            Some('|') => AttrOp::DashMatch,
            _ => return Err(self.error("malformed attribute selector")),
        };
        self.bump();
        if op != AttrOp::Equals && self.bump() != Some('=') {
            return Err(self.error("malformed attribute operator"));
        }
        self.skip_whitespace();

        let value = match self.peek() {
            Some(q @ ('"' | '\'')) => {
                self.bump();
                let mut value = String::new();
                loop {
                    match self.bump() {
                        Some(c) if c == q => break,
                        Some(c) => value.push(c),
                        None => return Err(self.error("unterminated string")),
                    }
                }
                value
            }
            _ => self.ident()?,
        };

        self.skip_whitespace();
        // Case-sensitivity flags ([attr=value i]) are accepted and ignored
        if self.peek().is_some_and(|c| c == 'i' || c == 's') {
            self.bump();
            self.skip_whitespace();
        }
        if self.bump() != Some(']') {
            return Err(self.error("expected `]`"));
        }
        Ok(SelectorPart::Attribute { name, op, value })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tree() -> (DomTree, NodeId, NodeId, NodeId) {
        let mut tree = DomTree::new();
        let nav = tree.create_element("nav");
        tree.set_attribute(nav, "id", "main");
        let ul = tree.create_element("ul");
        let li = tree.create_element("li");
        tree.set_attribute(li, "class", "item active");
        tree.set_attribute(li, "data-kind", "primary-link");
        tree.append_child(tree.root(), nav);
        tree.append_child(nav, ul);
        tree.append_child(ul, li);
        (tree, nav, ul, li)
    }

    #[test]
    fn test_simple_selectors() {
        let (tree, nav, _, li) = tree();
        assert!(Selector::parse("nav").unwrap().matches(&tree, nav));
        assert!(Selector::parse("#main").unwrap().matches(&tree, nav));
        assert!(Selector::parse(".item").unwrap().matches(&tree, li));
        assert!(Selector::parse("li.item.active").unwrap().matches(&tree, li));
        assert!(Selector::parse("*").unwrap().matches(&tree, li));
        assert!(!Selector::parse(".missing").unwrap().matches(&tree, li));
    }

    #[test]
    fn test_combinators() {
        let (tree, _, _, li) = tree();
        assert!(Selector::parse("nav li").unwrap().matches(&tree, li));
        assert!(Selector::parse("ul > li").unwrap().matches(&tree, li));
        assert!(!Selector::parse("nav > li").unwrap().matches(&tree, li));
        assert!(Selector::parse("#main>ul>li").unwrap().matches(&tree, li));
    }

    #[test]
    fn test_attribute_selectors() {
        let (tree, _, _, li) = tree();
        assert!(Selector::parse("[data-kind]").unwrap().matches(&tree, li));
        assert!(Selector::parse("[data-kind=\"primary-link\"]").unwrap().matches(&tree, li));
        assert!(Selector::parse("[data-kind|=primary]").unwrap().matches(&tree, li));
        assert!(Selector::parse("[class~=active]").unwrap().matches(&tree, li));
        assert!(!Selector::parse("[data-kind^=secondary]").unwrap().matches(&tree, li));
    }

    #[test]
    fn test_pseudo() {
        let (tree, _, _, li) = tree();
        assert!(Selector::parse("li:first-child").unwrap().matches(&tree, li));
        assert!(!Selector::parse("li:hover").unwrap().matches(&tree, li));
        assert!(!Selector::parse("li::before").unwrap().matches(&tree, li));
    }

    #[test]
    fn test_specificity() {
        assert_eq!(Selector::parse("#a .b c").unwrap().specificity(), Specificity(1, 1, 1));
        assert_eq!(Selector::parse("*").unwrap().specificity(), Specificity(0, 0, 0));
        assert_eq!(Selector::parse("a[href]:first-child").unwrap().specificity(), Specificity(0, 2, 1));
    }

    #[test]
    fn test_list_and_errors() {
        let list = SelectorList::parse("h1, h2 , [title=\"a,b\"]").unwrap();
        assert_eq!(list.0.len(), 3);
        assert!(SelectorList::parse("").is_err());
        assert!(Selector::parse("div >").is_err());
        assert!(Selector::parse("[foo").is_err());
    }
}
