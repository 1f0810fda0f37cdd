//! Rule framework
//!
//! WCAG success criteria, verdicts, the `Rule` trait and the rule set
//! that runs them.

use std::fmt;

use lens_dom::{Document, HeadingEntry, NodeId};
use serde::{Serialize, Serializer};

use crate::contrast::ContrastResult;
use crate::criteria::{ContrastMinimum, FocusOrder, InfoAndRelationships, Keyboard, NameRoleValue, NonTextContent};
use crate::inspect::ElementSnapshot;

/// Conformance level
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum Level {
    A,
    AA,
    AAA,
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::A => "A",
            Self::AA => "AA",
            Self::AAA => "AAA",
        })
    }
}

/// WCAG principle (top-level grouping)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Principle {
    Perceivable,
    Operable,
    Understandable,
    Robust,
}

impl Principle {
    pub const ALL: [Principle; 4] = [Self::Perceivable, Self::Operable, Self::Understandable, Self::Robust];

    pub fn title(&self) -> &'static str {
        match self {
            Self::Perceivable => "Perceivable",
            Self::Operable => "Operable",
            Self::Understandable => "Understandable",
            Self::Robust => "Robust",
        }
    }
}

/// Success criteria checked by the standard rule set
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Criterion {
    NonTextContent,
    InfoAndRelationships,
    ContrastMinimum,
    Keyboard,
    FocusOrder,
    NameRoleValue,
}

impl Criterion {
    pub const ALL: [Criterion; 6] = [
        Self::NonTextContent,
        Self::InfoAndRelationships,
        Self::ContrastMinimum,
        Self::Keyboard,
        Self::FocusOrder,
        Self::NameRoleValue,
    ];

    /// Success criterion number, e.g. "1.4.3"
    pub fn id(&self) -> &'static str {
        match self {
            Self::NonTextContent => "1.1.1",
            Self::InfoAndRelationships => "1.3.1",
            Self::ContrastMinimum => "1.4.3",
            Self::Keyboard => "2.1.1",
            Self::FocusOrder => "2.4.3",
            Self::NameRoleValue => "4.1.2",
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            Self::NonTextContent => "Non-text Content",
            Self::InfoAndRelationships => "Info and Relationships",
            Self::ContrastMinimum => "Contrast (Minimum)",
            Self::Keyboard => "Keyboard",
            Self::FocusOrder => "Focus Order",
            Self::NameRoleValue => "Name, Role, Value",
        }
    }

    pub fn level(&self) -> Level {
        match self {
            Self::ContrastMinimum => Level::AA,
            _ => Level::A,
        }
    }

    pub fn principle(&self) -> Principle {
        match self.id().as_bytes().first() {
            Some(b'1') => Principle::Perceivable,
            Some(b'2') => Principle::Operable,
            Some(b'3') => Principle::Understandable,
            _ => Principle::Robust,
        }
    }

    /// Look up by number ("2.4.3")
    pub fn from_id(id: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.id() == id.trim())
    }
}

impl fmt::Display for Criterion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.id(), self.title())
    }
}

impl Serialize for Criterion {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.id())
    }
}

/// Verdict status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    Pass,
    Fail,
    Warning,
}

impl Status {
    /// Report marker
    pub fn icon(&self) -> &'static str {
        match self {
            Self::Pass => "✅",
            Self::Fail => "❌",
            Self::Warning => "⚠️",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Pass => "Pass",
            Self::Fail => "Fail",
            Self::Warning => "Warning",
        }
    }
}

/// Outcome of one check against one criterion
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RuleVerdict {
    pub criterion: Criterion,
    pub title: &'static str,
    pub level: Level,
    pub status: Status,
    pub description: String,
    pub suggestion: String,
}

impl RuleVerdict {
    pub fn new(criterion: Criterion, status: Status, description: impl Into<String>, suggestion: impl Into<String>) -> Self {
        Self {
            criterion,
            title: criterion.title(),
            level: criterion.level(),
            status,
            description: description.into(),
            suggestion: suggestion.into(),
        }
    }

    /// Pass when `ok`, otherwise `otherwise`
    pub fn check(
        criterion: Criterion,
        ok: bool,
        otherwise: Status,
        description: &str,
        pass_suggestion: impl Into<String>,
        fail_suggestion: impl Into<String>,
    ) -> Self {
        if ok {
            Self::new(criterion, Status::Pass, description, pass_suggestion)
        } else {
            Self::new(criterion, otherwise, description, fail_suggestion)
        }
    }
}

/// Headings of a document in document order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HeadingOutline {
    entries: Vec<HeadingEntry>,
}

impl HeadingOutline {
    pub fn new(entries: Vec<HeadingEntry>) -> Self {
        Self { entries }
    }

    /// Outline of every `h1`..`h6` in `doc`
    pub fn from_document(doc: &Document) -> Self {
        Self::new(doc.headings())
    }

    /// Outline from bare levels; node ids are the positions
    pub fn from_levels(levels: &[u8]) -> Self {
        Self::new(
            levels
                .iter()
                .enumerate()
                .map(|(i, &level)| HeadingEntry { node: NodeId(i as u32), level })
                .collect(),
        )
    }

    /// Level of the heading just before `node`, if `node` is in the outline
    /// and is not the first heading
    pub fn previous_level(&self, node: NodeId) -> Option<u8> {
        let index = self.entries.iter().position(|e| e.node == node)?;
        index.checked_sub(1).map(|i| self.entries[i].level)
    }
}

/// Everything a rule may read
#[derive(Debug, Clone, Copy)]
pub struct RuleContext<'a> {
    pub snapshot: &'a ElementSnapshot,
    pub contrast: Option<&'a ContrastResult>,
    pub outline: &'a HeadingOutline,
}

/// One independent check
pub trait Rule: fmt::Debug + Send + Sync {
    fn criterion(&self) -> Criterion;
    /// Zero or more verdicts; never panics
    fn evaluate(&self, context: &RuleContext<'_>) -> Vec<RuleVerdict>;
}

/// Ordered collection of rules
#[derive(Debug, Default)]
pub struct RuleSet {
    rules: Vec<Box<dyn Rule>>,
}

impl RuleSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// The six WCAG 2.2 checks, in criterion order
    pub fn standard() -> Self {
        let mut set = Self::new();
        set.add(NonTextContent);
        set.add(InfoAndRelationships);
        set.add(ContrastMinimum);
        set.add(Keyboard);
        set.add(FocusOrder);
        set.add(NameRoleValue);
        set
    }

    pub fn add(&mut self, rule: impl Rule + 'static) {
        self.rules.push(Box::new(rule));
    }

    /// Drop every rule for the given criterion ids
    pub fn without(mut self, criterion_ids: &[String]) -> Self {
        self.rules.retain(|r| !criterion_ids.iter().any(|id| id.trim() == r.criterion().id()));
        self
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    pub fn criteria(&self) -> impl Iterator<Item = Criterion> + '_ {
        self.rules.iter().map(|r| r.criterion())
    }

    /// Run every rule; verdicts keep rule order
    pub fn evaluate(&self, context: &RuleContext<'_>) -> Vec<RuleVerdict> {
        self.rules.iter().flat_map(|r| r.evaluate(context)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_criterion_metadata() {
        assert_eq!(Criterion::ContrastMinimum.level(), Level::AA);
        assert_eq!(Criterion::NameRoleValue.principle(), Principle::Robust);
        assert_eq!(Criterion::FocusOrder.principle(), Principle::Operable);
        assert_eq!(Criterion::from_id("1.3.1"), Some(Criterion::InfoAndRelationships));
        assert_eq!(Criterion::from_id("9.9.9"), None);
        assert_eq!(Criterion::Keyboard.to_string(), "2.1.1 Keyboard");
    }

    #[test]
    fn test_outline_previous() {
        let outline = HeadingOutline::from_levels(&[1, 3, 2]);
        assert_eq!(outline.previous_level(NodeId(0)), None);
        assert_eq!(outline.previous_level(NodeId(1)), Some(1));
        assert_eq!(outline.previous_level(NodeId(2)), Some(3));
        assert_eq!(outline.previous_level(NodeId(7)), None);
    }

    #[test]
    fn test_rule_set() {
        let set = RuleSet::standard();
        assert_eq!(set.len(), 6);
        assert_eq!(set.criteria().collect::<Vec<_>>(), Criterion::ALL);

        let trimmed = RuleSet::standard().without(&["1.4.3".to_string(), "2.4.3".to_string()]);
        assert_eq!(trimmed.len(), 4);
        assert!(!trimmed.criteria().any(|c| c == Criterion::ContrastMinimum));
    }
}
