//! wcag-lens Accessibility
//!
//! Local, deterministic WCAG 2.2 AA analysis of a single element.
//!
//! Features:
//! - Structural/semantic inspection into an immutable `ElementSnapshot`
//! - WCAG contrast ratio with large-text thresholds
//! - Independent rule evaluators (1.1.1, 1.3.1, 1.4.3, 2.1.1, 2.4.3, 4.1.2)
//! - ARIA role and attribute validation
//! - Aggregated `AccessibilityAnalysis` with a Markdown rendering
//! - Element summaries for external reviewers

pub mod aria;
pub mod contrast;
pub mod inspect;
pub mod focus;
pub mod rules;
pub mod criteria;
pub mod analysis;
pub mod report;
pub mod summary;
pub mod config;

pub use aria::{AriaRole, RoleCategory, AriaFinding, AriaStatus, validate_aria};
pub use contrast::{ContrastChecker, ContrastResult, contrast, classify, is_large_text};
pub use inspect::{ElementSource, DomElement, ElementSnapshot, AriaReference, inspect, implicit_role};
pub use focus::{FocusSummary, is_keyboard_accessible};
pub use rules::{Criterion, Level, Principle, Status, RuleVerdict, Rule, RuleContext, RuleSet, HeadingOutline};
pub use analysis::{AccessibilityAnalysis, SemanticSummary, Analyzer, aggregate};
pub use report::render;
pub use summary::ElementSummary;
pub use config::AnalyzerConfig;

use lens_dom::{DomError, NodeId};

/// Accessibility error
#[derive(Debug, thiserror::Error)]
pub enum A11yError {
    #[error("Node {0:?} is not an element")]
    NotAnElement(NodeId),

    #[error("No element matches `{0}`")]
    NoMatch(String),

    #[error(transparent)]
    Dom(#[from] DomError),
}
