//! Report Aggregator
//!
//! Runs the inspector, the contrast calculator, the rule set and the ARIA
//! validator for one element and collects the results.

use lens_css::StyleResolver;
use lens_dom::{Document, NodeId};
use serde::Serialize;

use crate::A11yError;
use crate::aria::{AriaFinding, validate_aria};
use crate::config::AnalyzerConfig;
use crate::contrast::{ContrastResult, classify, contrast, is_large_text};
use crate::criteria::{has_accessible_name, has_description, resolved_role};
use crate::focus::{FocusSummary, is_keyboard_accessible};
use crate::inspect::{DomElement, ElementSnapshot, ElementSource, inspect};
use crate::rules::{HeadingOutline, RuleContext, RuleSet, RuleVerdict, Status};

/// Semantic-structure summary
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SemanticSummary {
    pub has_valid_role: bool,
    pub has_accessible_name: bool,
    pub has_description: bool,
}

impl SemanticSummary {
    pub fn from_snapshot(snapshot: &ElementSnapshot) -> Self {
        Self {
            has_valid_role: resolved_role(snapshot).is_some(),
            has_accessible_name: has_accessible_name(snapshot),
            has_description: has_description(snapshot),
        }
    }
}

/// Full analysis of one element
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AccessibilityAnalysis {
    /// Element label such as `img#logo`
    pub element: String,
    pub verdicts: Vec<RuleVerdict>,
    pub aria: Vec<AriaFinding>,
    pub contrast: Option<ContrastResult>,
    pub keyboard_accessible: bool,
    pub focus: FocusSummary,
    pub semantic: SemanticSummary,
}

impl AccessibilityAnalysis {
    pub fn failures(&self) -> impl Iterator<Item = &RuleVerdict> {
        self.verdicts.iter().filter(|v| v.status == Status::Fail)
    }

    pub fn has_failures(&self) -> bool {
        self.failures().next().is_some()
    }
}

/// Contrast of the snapshot's text against its background, if both are known
fn contrast_of(snapshot: &ElementSnapshot) -> Option<ContrastResult> {
    let fg = snapshot.computed_color.as_deref()?;
    let bg = snapshot.computed_background_color.as_deref()?;
    let ratio = contrast(fg, bg)?;
    let large = is_large_text(
        snapshot.font_size.unwrap_or(16.0),
        snapshot.font_weight.as_deref().unwrap_or("400"),
    );
    Some(classify(ratio, large))
}

/// Analyze a snapshot with the standard rules and default configuration
pub fn aggregate(snapshot: &ElementSnapshot, outline: &HeadingOutline) -> AccessibilityAnalysis {
    Analyzer::default().aggregate(snapshot, outline)
}

/// Configured analysis entry point
#[derive(Debug)]
pub struct Analyzer {
    rules: RuleSet,
    config: AnalyzerConfig,
}

impl Default for Analyzer {
    fn default() -> Self {
        Self::new(AnalyzerConfig::default())
    }
}

impl Analyzer {
    /// Standard rule set minus `config.disabled_rules`
    pub fn new(config: AnalyzerConfig) -> Self {
        let rules = RuleSet::standard().without(&config.disabled_rules);
        Self::with_rules(rules, config)
    }

    pub fn with_rules(rules: RuleSet, config: AnalyzerConfig) -> Self {
        Self { rules, config }
    }

    /// Assemble the analysis of an already captured snapshot
    pub fn aggregate(&self, snapshot: &ElementSnapshot, outline: &HeadingOutline) -> AccessibilityAnalysis {
        let contrast = contrast_of(snapshot);
        let context = RuleContext {
            snapshot,
            contrast: contrast.as_ref(),
            outline,
        };
        let verdicts = self.rules.evaluate(&context);
        let aria = if self.config.include_aria { validate_aria(snapshot) } else { Vec::new() };

        tracing::debug!(
            "Analyzed {}: {} verdicts ({} failing), {} ARIA findings",
            snapshot.label(),
            verdicts.len(),
            verdicts.iter().filter(|v| v.status == Status::Fail).count(),
            aria.len()
        );

        AccessibilityAnalysis {
            element: snapshot.label(),
            verdicts,
            aria,
            contrast,
            keyboard_accessible: is_keyboard_accessible(snapshot),
            focus: FocusSummary::from_snapshot(snapshot),
            semantic: SemanticSummary::from_snapshot(snapshot),
        }
    }

    /// Inspect `source` and analyze it
    pub fn analyze(&self, source: &impl ElementSource, outline: &HeadingOutline) -> AccessibilityAnalysis {
        self.aggregate(&inspect(source), outline)
    }

    /// Analyze one node of a parsed document
    pub fn analyze_node(
        &self,
        doc: &Document,
        resolver: &StyleResolver,
        node: NodeId,
    ) -> Result<AccessibilityAnalysis, A11yError> {
        let element = DomElement::resolve(doc, node, resolver, self.config.walk_ancestor_background)?;
        Ok(self.analyze(&element, &HeadingOutline::from_document(doc)))
    }

    /// Analyze every element matching `selector`, in document order
    pub fn analyze_selector(
        &self,
        doc: &Document,
        resolver: &StyleResolver,
        selector: &str,
    ) -> Result<Vec<AccessibilityAnalysis>, A11yError> {
        let nodes = doc.query_selector_all(selector)?;
        if nodes.is_empty() {
            return Err(A11yError::NoMatch(selector.to_string()));
        }
        let outline = HeadingOutline::from_document(doc);
        nodes
            .into_iter()
            .map(|node| -> Result<AccessibilityAnalysis, A11yError> {
                let element = DomElement::resolve(doc, node, resolver, self.config.walk_ancestor_background)?;
                Ok(self.analyze(&element, &outline))
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::inspect::tests::FakeElement;
    use crate::rules::Criterion;

    #[test]
    fn test_aggregate_image() {
        let snap = inspect(&FakeElement::new("img").attr("alt", "Logo"));
        let analysis = aggregate(&snap, &HeadingOutline::default());

        let ids: Vec<&str> = analysis.verdicts.iter().map(|v| v.criterion.id()).collect();
        assert_eq!(ids, ["1.1.1", "2.1.1", "2.4.3", "4.1.2"]);
        assert!(analysis.contrast.is_none());
        assert_eq!(analysis.aria[0].attribute, "aria-label");
        assert!(analysis.semantic.has_valid_role);
        assert!(analysis.semantic.has_accessible_name);
    }

    #[test]
    fn test_contrast_included() {
        let el = FakeElement {
            text: "Hello",
            color: Some("rgb(0, 0, 0)"),
            background: Some("rgb(255, 255, 255)"),
            font_size: Some(16.0),
            font_weight: Some("400"),
            ..FakeElement::new("p")
        };
        let analysis = aggregate(&inspect(&el), &HeadingOutline::default());
        let contrast = analysis.contrast.unwrap();
        assert!((contrast.ratio - 21.0).abs() < 1e-9);
        assert_eq!(contrast.requirement, 4.5);
        assert!(analysis.verdicts.iter().any(|v| v.criterion == Criterion::ContrastMinimum && v.status == Status::Pass));
    }

    #[test]
    fn test_config_disables() {
        let config = AnalyzerConfig {
            include_aria: false,
            disabled_rules: vec!["2.1.1".into(), "2.4.3".into()],
            ..AnalyzerConfig::default()
        };
        let analysis = Analyzer::new(config).analyze(&FakeElement::new("div"), &HeadingOutline::default());
        assert!(analysis.aria.is_empty());
        assert_eq!(analysis.verdicts.len(), 1);
        assert_eq!(analysis.verdicts[0].criterion, Criterion::NameRoleValue);
        assert!(analysis.has_failures());
    }
}
