//! Rule evaluators for the standard WCAG 2.2 checks

use crate::focus::{FocusSummary, is_keyboard_accessible};
use crate::inspect::ElementSnapshot;
use crate::rules::{Criterion, Rule, RuleContext, RuleVerdict, Status};

/// Parents under which an `li` is well-formed
const LIST_PARENTS: &[&str] = &["ul", "ol", "menu"];

/// 1.1.1: images carry an `alt` attribute
#[derive(Debug, Clone, Copy, Default)]
pub struct NonTextContent;

impl Rule for NonTextContent {
    fn criterion(&self) -> Criterion {
        Criterion::NonTextContent
    }

    fn evaluate(&self, ctx: &RuleContext<'_>) -> Vec<RuleVerdict> {
        let snap = ctx.snapshot;
        if snap.tag_name != "img" {
            return Vec::new();
        }
        let pass_suggestion = match snap.alt.as_deref() {
            Some(alt) if alt.trim().is_empty() => "Empty alt marks the image as decorative; describe it if it carries meaning",
            _ => "Alt text is present",
        };
        vec![RuleVerdict::check(
            self.criterion(),
            snap.alt.is_some(),
            Status::Fail,
            "Images must have alternative text",
            pass_suggestion,
            "Add an alt attribute describing the image, or alt=\"\" if it is decorative",
        )]
    }
}

/// 1.3.1: heading levels do not skip, list items sit in lists.
///
/// A skipped heading level is a warning; an `li` outside `ul`, `ol` or
/// `menu` is a failure.
#[derive(Debug, Clone, Copy, Default)]
pub struct InfoAndRelationships;

impl InfoAndRelationships {
    fn heading(&self, ctx: &RuleContext<'_>, level: u8) -> RuleVerdict {
        let previous = ctx.snapshot.node.and_then(|n| ctx.outline.previous_level(n));
        let description = "Heading levels convey the document outline";
        match previous {
            Some(prev) if level > prev + 1 => RuleVerdict::new(
                self.criterion(),
                Status::Warning,
                description,
                format!("h{} follows h{}; use h{} or restructure the outline", level, prev, prev + 1),
            ),
            Some(prev) => RuleVerdict::new(
                self.criterion(),
                Status::Pass,
                description,
                format!("h{} follows h{} without skipping a level", level, prev),
            ),
            None => RuleVerdict::new(self.criterion(), Status::Pass, description, "No earlier heading to compare against"),
        }
    }

    fn list_item(&self, snap: &ElementSnapshot) -> RuleVerdict {
        let parent = snap.parent_tag.as_deref();
        let ok = parent.is_some_and(|p| LIST_PARENTS.contains(&p));
        RuleVerdict::check(
            self.criterion(),
            ok,
            Status::Fail,
            "List items must be contained in a list",
            "List item is inside a list",
            format!(
                "Move this <li> into a <ul> or <ol> (parent is {})",
                parent.map(|p| format!("<{}>", p)).unwrap_or_else(|| "missing".into())
            ),
        )
    }
}

impl Rule for InfoAndRelationships {
    fn criterion(&self) -> Criterion {
        Criterion::InfoAndRelationships
    }

    fn evaluate(&self, ctx: &RuleContext<'_>) -> Vec<RuleVerdict> {
        if let Some(level) = ctx.snapshot.heading_level() {
            return vec![self.heading(ctx, level)];
        }
        if ctx.snapshot.tag_name == "li" {
            return vec![self.list_item(ctx.snapshot)];
        }
        Vec::new()
    }
}

/// 1.4.3: text contrast meets the AA minimum
#[derive(Debug, Clone, Copy, Default)]
pub struct ContrastMinimum;

impl Rule for ContrastMinimum {
    fn criterion(&self) -> Criterion {
        Criterion::ContrastMinimum
    }

    fn evaluate(&self, ctx: &RuleContext<'_>) -> Vec<RuleVerdict> {
        let Some(result) = ctx.contrast else {
            return Vec::new();
        };
        vec![RuleVerdict::check(
            self.criterion(),
            result.status == Status::Pass,
            Status::Fail,
            "Text and background colors must have sufficient contrast",
            format!("Contrast ratio {:.2}:1 meets the {}:1 minimum", result.ratio, result.requirement),
            format!("Contrast ratio {:.2}:1 is insufficient. Minimum required: {}:1", result.ratio, result.requirement),
        )]
    }
}

/// 2.1.1: the element can be reached from the keyboard
#[derive(Debug, Clone, Copy, Default)]
pub struct Keyboard;

impl Rule for Keyboard {
    fn criterion(&self) -> Criterion {
        Criterion::Keyboard
    }

    fn evaluate(&self, ctx: &RuleContext<'_>) -> Vec<RuleVerdict> {
        vec![RuleVerdict::check(
            self.criterion(),
            is_keyboard_accessible(ctx.snapshot),
            Status::Fail,
            "All functionality available from keyboard",
            "Element is keyboard accessible",
            "Add tabindex=\"0\" or use a natively focusable element for keyboard access",
        )]
    }
}

/// 2.4.3: no positive tabindex
#[derive(Debug, Clone, Copy, Default)]
pub struct FocusOrder;

impl Rule for FocusOrder {
    fn criterion(&self) -> Criterion {
        Criterion::FocusOrder
    }

    fn evaluate(&self, ctx: &RuleContext<'_>) -> Vec<RuleVerdict> {
        let focus = FocusSummary::from_snapshot(ctx.snapshot);
        vec![RuleVerdict::check(
            self.criterion(),
            !focus.overrides_order(),
            Status::Warning,
            "Focusable components receive focus in order that preserves meaning",
            "Element follows the natural focus order",
            format!(
                "tabindex=\"{}\" moves this element ahead of document order; use 0 and reorder the DOM instead",
                focus.tab_index.unwrap_or_default()
            ),
        )]
    }
}

/// 4.1.2: accessible name and resolvable role
#[derive(Debug, Clone, Copy, Default)]
pub struct NameRoleValue;

impl Rule for NameRoleValue {
    fn criterion(&self) -> Criterion {
        Criterion::NameRoleValue
    }

    fn evaluate(&self, ctx: &RuleContext<'_>) -> Vec<RuleVerdict> {
        let snap = ctx.snapshot;
        let name = has_accessible_name(snap);
        let role = resolved_role(snap);
        let fail_suggestion = match (name, role) {
            (false, None) => "Add an accessible name (aria-label or text) and a semantic role",
            (false, Some(_)) => "Add aria-label, aria-labelledby or visible text as the accessible name",
            _ => "Use a semantic element or add a role attribute",
        };
        vec![RuleVerdict::check(
            self.criterion(),
            name && role.is_some(),
            Status::Fail,
            "Elements have accessible names and roles",
            format!("Element has an accessible name and role ({})", role.unwrap_or_default()),
            fail_suggestion,
        )]
    }
}

fn non_empty(value: Option<&String>) -> bool {
    value.is_some_and(|v| !v.trim().is_empty())
}

/// Name from aria-label, aria-labelledby, text, alt or title
pub fn has_accessible_name(snap: &ElementSnapshot) -> bool {
    non_empty(snap.aria_attributes.get("aria-label"))
        || non_empty(snap.aria_attributes.get("aria-labelledby"))
        || !snap.text_content.is_empty()
        || non_empty(snap.alt.as_ref())
        || non_empty(snap.title.as_ref())
}

/// Description from aria-describedby or title
pub fn has_description(snap: &ElementSnapshot) -> bool {
    non_empty(snap.aria_attributes.get("aria-describedby")) || non_empty(snap.title.as_ref())
}

/// Role an assistive technology would see.
///
/// Explicit role (first concrete token), else the implicit role, else
/// `generic` for containers opted into the accessibility tree by a
/// non-negative tabindex or `aria-*` attributes.
pub fn resolved_role(snap: &ElementSnapshot) -> Option<&str> {
    let explicit = snap
        .explicit_role
        .as_deref()
        .into_iter()
        .flat_map(str::split_whitespace)
        .find(|t| crate::aria::AriaRole::parse(t).is_some_and(|r| r.is_concrete()));
    if explicit.is_some() {
        return explicit;
    }
    if snap.implicit_role.is_some() {
        return snap.implicit_role;
    }
    let opted_in = snap.tab_index.is_some_and(|t| t >= 0) || !snap.aria_attributes.is_empty();
    opted_in.then_some("generic")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::contrast::classify;
    use crate::inspect::inspect;
    use crate::inspect::tests::FakeElement;
    use crate::rules::HeadingOutline;
    use lens_dom::NodeId;

    fn run(rule: &dyn Rule, snap: &ElementSnapshot) -> Vec<RuleVerdict> {
        let outline = HeadingOutline::default();
        rule.evaluate(&RuleContext { snapshot: snap, contrast: None, outline: &outline })
    }

    fn status(rule: &dyn Rule, el: FakeElement) -> Option<Status> {
        run(rule, &inspect(&el)).first().map(|v| v.status)
    }

    #[test]
    fn test_non_text_content() {
        assert_eq!(status(&NonTextContent, FakeElement::new("img").attr("alt", "")), Some(Status::Pass));
        assert_eq!(status(&NonTextContent, FakeElement::new("img")), Some(Status::Fail));
        assert_eq!(status(&NonTextContent, FakeElement::new("div")), None);
    }

    #[test]
    fn test_list_items() {
        let ok = FakeElement { parent: Some("ul"), ..FakeElement::new("li") };
        let bad = FakeElement { parent: Some("div"), ..FakeElement::new("li") };
        let orphan = FakeElement::new("li");
        assert_eq!(status(&InfoAndRelationships, ok), Some(Status::Pass));
        assert_eq!(status(&InfoAndRelationships, bad), Some(Status::Fail));
        assert_eq!(status(&InfoAndRelationships, orphan), Some(Status::Fail));
        assert_eq!(status(&InfoAndRelationships, FakeElement::new("p")), None);
    }

    #[test]
    fn test_heading_skip() {
        let outline = HeadingOutline::from_levels(&[1, 3]);
        let mut h1 = inspect(&FakeElement::new("h1"));
        h1.node = Some(NodeId(0));
        let mut h3 = inspect(&FakeElement::new("h3"));
        h3.node = Some(NodeId(1));

        let eval = |snap: &ElementSnapshot| {
            InfoAndRelationships.evaluate(&RuleContext { snapshot: snap, contrast: None, outline: &outline })[0].status
        };
        assert_eq!(eval(&h1), Status::Pass);
        assert_eq!(eval(&h3), Status::Warning);
    }

    #[test]
    fn test_contrast_rule() {
        let snap = inspect(&FakeElement::new("p"));
        let outline = HeadingOutline::default();
        let low = classify(2.5, false);
        let verdicts = ContrastMinimum.evaluate(&RuleContext { snapshot: &snap, contrast: Some(&low), outline: &outline });
        assert_eq!(verdicts[0].status, Status::Fail);
        assert!(verdicts[0].suggestion.contains("2.50:1"));
        assert!(run(&ContrastMinimum, &snap).is_empty());
    }

    #[test]
    fn test_keyboard_and_focus_order() {
        assert_eq!(status(&Keyboard, FakeElement::new("div").attr("onclick", "x()")), Some(Status::Fail));
        assert_eq!(status(&Keyboard, FakeElement::new("div").attr("tabindex", "0")), Some(Status::Pass));
        assert_eq!(status(&FocusOrder, FakeElement::new("div").attr("tabindex", "5")), Some(Status::Warning));
        assert_eq!(status(&FocusOrder, FakeElement::new("a").attr("tabindex", "0")), Some(Status::Pass));
        assert_eq!(status(&FocusOrder, FakeElement::new("span")), Some(Status::Pass));
    }

    #[test]
    fn test_name_role_value() {
        let menu = FakeElement::new("div").attr("tabindex", "0").attr("aria-label", "Menu");
        assert_eq!(status(&NameRoleValue, menu), Some(Status::Pass));

        let bare = FakeElement::new("div").attr("onclick", "open()");
        assert_eq!(status(&NameRoleValue, bare), Some(Status::Fail));

        let button = FakeElement { text: "Save", ..FakeElement::new("button") };
        assert_eq!(status(&NameRoleValue, button), Some(Status::Pass));

        let unnamed = FakeElement::new("button");
        assert_eq!(status(&NameRoleValue, unnamed), Some(Status::Fail));
    }

    #[test]
    fn test_resolved_role() {
        let snap = inspect(&FakeElement::new("span").attr("role", "bogus switch"));
        assert_eq!(resolved_role(&snap), Some("switch"));
        let snap = inspect(&FakeElement::new("span").attr("role", "bogus"));
        assert_eq!(resolved_role(&snap), None);
        let snap = inspect(&FakeElement::new("span").attr("aria-hidden", "true"));
        assert_eq!(resolved_role(&snap), Some("generic"));
    }
}
