//! Markdown rendering of an `AccessibilityAnalysis`

use std::fmt::{self, Display, Formatter};

use crate::analysis::AccessibilityAnalysis;
use crate::aria::AriaStatus;
use crate::rules::{Principle, Status};

/// Render the analysis as a sectioned Markdown report.
///
/// Pure: the same analysis always renders to the same text.
pub fn render(analysis: &AccessibilityAnalysis) -> String {
    Report(analysis).to_string()
}

struct Report<'a>(&'a AccessibilityAnalysis);

fn aria_icon(status: AriaStatus) -> &'static str {
    match status {
        AriaStatus::Pass => "✅",
        AriaStatus::Fail => "❌",
        AriaStatus::Warning => "⚠️",
        AriaStatus::Missing => "➖",
    }
}

fn yes_no(flag: bool) -> &'static str {
    if flag { "Yes" } else { "No" }
}

impl Display for Report<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let a = self.0;
        writeln!(f, "# Accessibility report: `{}`", a.element)?;
        writeln!(f)?;

        for principle in Principle::ALL {
            writeln!(f, "## {}", principle.title())?;
            writeln!(f)?;
            let mut any = false;
            for v in a.verdicts.iter().filter(|v| v.criterion.principle() == principle) {
                any = true;
                writeln!(f, "### {} {} (Level {})", v.status.icon(), v.criterion, v.level)?;
                writeln!(f, "**Status:** {}  ", v.status.label())?;
                writeln!(f, "**Description:** {}  ", v.description)?;
                writeln!(f, "**Suggestion:** {}", v.suggestion)?;
                writeln!(f)?;
            }
            if !any {
                writeln!(f, "_No criteria evaluated for this element._")?;
                writeln!(f)?;
            }
        }

        if !a.aria.is_empty() {
            writeln!(f, "## ARIA")?;
            writeln!(f)?;
            for finding in &a.aria {
                writeln!(f, "### {} {}", aria_icon(finding.status), finding.attribute)?;
                writeln!(f, "**Current:** {}  ", finding.current)?;
                writeln!(f, "**Expected:** {}  ", finding.expected)?;
                writeln!(f, "**Suggestion:** {}", finding.suggestion)?;
                writeln!(f)?;
            }
        }

        writeln!(f, "## Color contrast")?;
        writeln!(f)?;
        match &a.contrast {
            Some(c) => {
                writeln!(f, "{} **Contrast ratio:** {:.2}:1  ", c.status.icon(), c.ratio)?;
                writeln!(f, "**Required minimum:** {}:1  ", c.requirement)?;
                let verdict = if c.status == Status::Pass { "Sufficient" } else { "Insufficient" };
                writeln!(f, "**Status:** {}", verdict)?;
            }
            None => writeln!(f, "➖ Not applicable (text or background color unavailable or transparent)")?,
        }
        writeln!(f)?;

        writeln!(f, "## Keyboard & focus")?;
        writeln!(f)?;
        let keyboard = if a.keyboard_accessible { Status::Pass } else { Status::Fail };
        writeln!(
            f,
            "{} **Keyboard access:** {}  ",
            keyboard.icon(),
            if a.keyboard_accessible { "Available" } else { "Not available" }
        )?;
        writeln!(f, "**Focusable:** {}  ", yes_no(a.focus.focusable))?;
        match a.focus.tab_index {
            Some(t) => writeln!(f, "**Tab index:** {}  ", t)?,
            None => writeln!(f, "**Tab index:** Not set  ")?,
        }
        writeln!(f, "**Focus visible:** {}", yes_no(a.focus.focus_visible))?;
        writeln!(f)?;

        let s = &a.semantic;
        let icon = |ok: bool| if ok { Status::Pass.icon() } else { Status::Fail.icon() };
        writeln!(f, "## Semantic structure")?;
        writeln!(f)?;
        writeln!(f, "{} **Valid role:** {}  ", icon(s.has_valid_role), yes_no(s.has_valid_role))?;
        writeln!(f, "{} **Accessible name:** {}  ", icon(s.has_accessible_name), yes_no(s.has_accessible_name))?;
        let desc_icon = if s.has_description { "✅" } else { "➖" };
        writeln!(f, "{} **Description:** {}", desc_icon, yes_no(s.has_description))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::aggregate;
    use crate::inspect::inspect;
    use crate::inspect::tests::FakeElement;
    use crate::rules::HeadingOutline;

    #[test]
    fn test_render_sections() {
        let snap = inspect(&FakeElement::new("img"));
        let text = render(&aggregate(&snap, &HeadingOutline::default()));

        assert!(text.starts_with("# Accessibility report: `img`"));
        let order = ["## Perceivable", "## Operable", "## Understandable", "## Robust", "## ARIA", "## Color contrast", "## Keyboard & focus", "## Semantic structure"];
        let positions: Vec<usize> = order.iter().map(|h| text.find(h).unwrap()).collect();
        assert!(positions.windows(2).all(|w| w[0] < w[1]));

        assert!(text.contains("### ❌ 1.1.1 Non-text Content (Level A)"));
        assert!(text.contains("_No criteria evaluated for this element._"));
        assert!(text.contains("➖ Not applicable"));
    }

    #[test]
    fn test_render_idempotent() {
        let snap = inspect(&FakeElement::new("div").attr("tabindex", "2").attr("aria-expanded", "maybe"));
        let analysis = aggregate(&snap, &HeadingOutline::default());
        assert_eq!(render(&analysis), render(&analysis));
        assert!(render(&analysis).contains("### ⚠️ 2.4.3 Focus Order (Level A)"));
    }
}
