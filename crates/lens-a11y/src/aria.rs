//! ARIA Support
//!
//! WAI-ARIA 1.2 roles and attribute value checking.

use serde::Serialize;

use crate::inspect::ElementSnapshot;

/// Role taxonomy category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RoleCategory {
    Landmark,
    Widget,
    DocumentStructure,
    LiveRegion,
    Window,
    /// For inheritance only, never valid in markup
    Abstract,
}

/// ARIA role
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct AriaRole {
    name: &'static str,
    category: RoleCategory,
}

/// Every WAI-ARIA 1.2 role, sorted by name
const ROLES: &[(&str, RoleCategory)] = {
    use RoleCategory::*;
    &[
        ("alert", LiveRegion), ("alertdialog", Window), ("application", DocumentStructure),
        ("article", DocumentStructure), ("banner", Landmark), ("blockquote", DocumentStructure),
        ("button", Widget), ("caption", DocumentStructure), ("cell", DocumentStructure),
        ("checkbox", Widget), ("code", DocumentStructure), ("columnheader", DocumentStructure),
        ("combobox", Widget), ("command", Abstract), ("comment", DocumentStructure),
        ("complementary", Landmark), ("composite", Abstract), ("contentinfo", Landmark),
        ("definition", DocumentStructure), ("deletion", DocumentStructure), ("dialog", Window),
        ("directory", DocumentStructure), ("document", DocumentStructure), ("emphasis", DocumentStructure),
        ("feed", DocumentStructure), ("figure", DocumentStructure), ("form", Landmark),
        ("generic", DocumentStructure), ("grid", Widget), ("gridcell", Widget),
        ("group", DocumentStructure), ("heading", DocumentStructure), ("img", DocumentStructure),
        ("input", Abstract), ("insertion", DocumentStructure), ("landmark", Abstract),
        ("link", Widget), ("list", DocumentStructure), ("listbox", Widget),
        ("listitem", DocumentStructure), ("log", LiveRegion), ("main", Landmark),
        ("mark", DocumentStructure), ("marquee", LiveRegion), ("math", DocumentStructure),
        ("menu", Widget), ("menubar", Widget), ("menuitem", Widget),
        ("menuitemcheckbox", Widget), ("menuitemradio", Widget), ("meter", Widget),
        ("navigation", Landmark), ("none", DocumentStructure), ("note", DocumentStructure),
        ("option", Widget), ("paragraph", DocumentStructure), ("presentation", DocumentStructure),
        ("progressbar", Widget), ("radio", Widget), ("radiogroup", Widget),
        ("range", Abstract), ("region", Landmark), ("roletype", Abstract),
        ("row", DocumentStructure), ("rowgroup", DocumentStructure), ("rowheader", DocumentStructure),
        ("scrollbar", Widget), ("search", Landmark), ("searchbox", Widget),
        ("section", Abstract), ("sectionhead", Abstract), ("select", Abstract),
        ("separator", DocumentStructure), ("slider", Widget), ("spinbutton", Widget),
        ("status", LiveRegion), ("strong", DocumentStructure), ("structure", Abstract),
        ("subscript", DocumentStructure), ("superscript", DocumentStructure), ("switch", Widget),
        ("tab", Widget), ("table", DocumentStructure), ("tablist", Widget),
        ("tabpanel", Widget), ("term", DocumentStructure), ("textbox", Widget),
        ("time", DocumentStructure), ("timer", LiveRegion), ("toolbar", DocumentStructure),
        ("tooltip", Window), ("tree", Widget), ("treegrid", Widget),
        ("treeitem", Widget), ("widget", Abstract), ("window", Abstract),
    ]
};

impl AriaRole {
    /// Parse a single role token, case-insensitively
    pub fn parse(s: &str) -> Option<Self> {
        let s = s.trim().to_ascii_lowercase();
        ROLES
            .binary_search_by(|(name, _)| (*name).cmp(s.as_str()))
            .ok()
            .map(|i| Self { name: ROLES[i].0, category: ROLES[i].1 })
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn category(&self) -> RoleCategory {
        self.category
    }

    /// Check if role is widget (interactive)
    pub fn is_widget(&self) -> bool {
        self.category == RoleCategory::Widget
    }

    /// Check if role is landmark
    pub fn is_landmark(&self) -> bool {
        self.category == RoleCategory::Landmark
    }

    /// Check if role is abstract (not for direct use)
    pub fn is_abstract(&self) -> bool {
        self.category == RoleCategory::Abstract
    }

    /// Concrete role usable in a `role` attribute
    pub fn is_concrete(&self) -> bool {
        !self.is_abstract()
    }
}

/// Status of one ARIA finding
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AriaStatus {
    Pass,
    Fail,
    Warning,
    Missing,
}

/// Result of checking one ARIA attribute (or the role)
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AriaFinding {
    pub attribute: String,
    pub status: AriaStatus,
    pub current: String,
    pub expected: String,
    pub suggestion: String,
}

impl AriaFinding {
    fn new(attribute: &str, status: AriaStatus, current: &str, expected: &str, suggestion: impl Into<String>) -> Self {
        Self {
            attribute: attribute.to_string(),
            status,
            current: current.to_string(),
            expected: expected.to_string(),
            suggestion: suggestion.into(),
        }
    }
}

/// Allowed value shape of an ARIA attribute
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ValueType {
    IdRef,
    IdRefList,
    /// true | false
    Boolean,
    /// true | false | undefined
    OptionalBoolean,
    /// true | false | mixed | undefined
    Tristate,
    Integer,
    Number,
    Token(&'static [&'static str]),
    TokenList(&'static [&'static str]),
    Text,
}

impl ValueType {
    fn expected(&self) -> String {
        match self {
            Self::IdRef => "ID of an element in the document".into(),
            Self::IdRefList => "Space-separated IDs of elements in the document".into(),
            Self::Boolean => "true or false".into(),
            Self::OptionalBoolean => "true, false or undefined".into(),
            Self::Tristate => "true, false, mixed or undefined".into(),
            Self::Integer => "Integer".into(),
            Self::Number => "Number".into(),
            Self::Token(tokens) => format!("One of: {}", tokens.join(", ")),
            Self::TokenList(tokens) => format!("Space-separated list of: {}", tokens.join(", ")),
            Self::Text => "Non-empty text".into(),
        }
    }

    fn accepts(&self, value: &str) -> bool {
        let value = value.trim().to_ascii_lowercase();
        let one_of = |allowed: &[&str]| allowed.contains(&value.as_str());
        match self {
            Self::Boolean => one_of(&["true", "false"]),
            Self::OptionalBoolean => one_of(&["true", "false", "undefined"]),
            Self::Tristate => one_of(&["true", "false", "mixed", "undefined"]),
            Self::Integer => value.parse::<i64>().is_ok(),
            Self::Number => value.parse::<f64>().is_ok_and(f64::is_finite),
            Self::Token(tokens) => tokens.contains(&value.as_str()),
            Self::TokenList(tokens) => {
                !value.is_empty() && value.split_whitespace().all(|t| tokens.contains(&t))
            }
            Self::IdRef | Self::IdRefList | Self::Text => !value.is_empty(),
        }
    }
}

/// WAI-ARIA 1.2 states and properties, sorted by name
const ARIA_ATTRIBUTES: &[(&str, ValueType)] = {
    use ValueType::*;
    &[
        ("aria-activedescendant", IdRef),
        ("aria-atomic", Boolean),
        ("aria-autocomplete", Token(&["inline", "list", "both", "none"])),
        ("aria-braillelabel", Text),
        ("aria-brailleroledescription", Text),
        ("aria-busy", Boolean),
        ("aria-checked", Tristate),
        ("aria-colcount", Integer),
        ("aria-colindex", Integer),
        ("aria-colindextext", Text),
        ("aria-colspan", Integer),
        ("aria-controls", IdRefList),
        ("aria-current", Token(&["page", "step", "location", "date", "time", "true", "false"])),
        ("aria-describedby", IdRefList),
        ("aria-description", Text),
        ("aria-details", IdRefList),
        ("aria-disabled", Boolean),
        ("aria-dropeffect", TokenList(&["copy", "execute", "link", "move", "none", "popup"])),
        ("aria-errormessage", IdRefList),
        ("aria-expanded", OptionalBoolean),
        ("aria-flowto", IdRefList),
        ("aria-grabbed", OptionalBoolean),
        ("aria-haspopup", Token(&["false", "true", "menu", "listbox", "tree", "grid", "dialog"])),
        ("aria-hidden", OptionalBoolean),
        ("aria-invalid", Token(&["grammar", "false", "spelling", "true"])),
        ("aria-keyshortcuts", Text),
        ("aria-label", Text),
        ("aria-labelledby", IdRefList),
        ("aria-level", Integer),
        ("aria-live", Token(&["assertive", "off", "polite"])),
        ("aria-modal", Boolean),
        ("aria-multiline", Boolean),
        ("aria-multiselectable", Boolean),
        ("aria-orientation", Token(&["horizontal", "vertical", "undefined"])),
        ("aria-owns", IdRefList),
        ("aria-placeholder", Text),
        ("aria-posinset", Integer),
        ("aria-pressed", Tristate),
        ("aria-readonly", Boolean),
        ("aria-relevant", TokenList(&["additions", "all", "removals", "text"])),
        ("aria-required", Boolean),
        ("aria-roledescription", Text),
        ("aria-rowcount", Integer),
        ("aria-rowindex", Integer),
        ("aria-rowindextext", Text),
        ("aria-rowspan", Integer),
        ("aria-selected", OptionalBoolean),
        ("aria-setsize", Integer),
        ("aria-sort", Token(&["ascending", "descending", "none", "other"])),
        ("aria-valuemax", Number),
        ("aria-valuemin", Number),
        ("aria-valuenow", Number),
        ("aria-valuetext", Text),
    ]
};

fn value_type(attribute: &str) -> Option<ValueType> {
    ARIA_ATTRIBUTES
        .binary_search_by(|(name, _)| (*name).cmp(attribute))
        .ok()
        .map(|i| ARIA_ATTRIBUTES[i].1)
}

/// Names of every ID-reference attribute
pub fn is_id_reference(attribute: &str) -> bool {
    matches!(value_type(attribute), Some(ValueType::IdRef | ValueType::IdRefList))
}

/// Validate the ARIA attributes and role of an element.
///
/// Findings come out as `aria-label` first, then the other `aria-*`
/// attributes by name, then `role` when present.
pub fn validate_aria(snapshot: &ElementSnapshot) -> Vec<AriaFinding> {
    let mut findings = vec![check_label(snapshot.aria_attributes.get("aria-label").map(String::as_str))];

    for (name, value) in &snapshot.aria_attributes {
        if name == "aria-label" {
            continue;
        }
        findings.push(match value_type(name) {
            Some(ValueType::IdRef | ValueType::IdRefList) => check_references(snapshot, name, value),
            Some(ty) => check_value(name, value, ty),
            None => AriaFinding::new(
                name,
                AriaStatus::Warning,
                value,
                "A WAI-ARIA 1.2 attribute",
                format!("`{}` is not a known ARIA attribute; check the spelling", name),
            ),
        });
    }

    if let Some(role) = &snapshot.explicit_role {
        findings.push(check_role(role));
    }
    findings
}

fn check_label(value: Option<&str>) -> AriaFinding {
    match value.map(str::trim).filter(|v| !v.is_empty()) {
        Some(label) => AriaFinding::new("aria-label", AriaStatus::Pass, label, "Descriptive label", "aria-label is present"),
        None => AriaFinding::new(
            "aria-label",
            AriaStatus::Missing,
            value.unwrap_or("Not present"),
            "Descriptive label",
            "Consider adding aria-label when the element has no visible text",
        ),
    }
}

fn check_references(snapshot: &ElementSnapshot, name: &str, value: &str) -> AriaFinding {
    let expected = value_type(name).map(|t| t.expected()).unwrap_or_default();
    let refs: Vec<_> = snapshot.aria_references.iter().filter(|r| r.attribute == name).collect();
    if refs.is_empty() {
        return AriaFinding::new(name, AriaStatus::Fail, value, &expected, "Reference is empty; point it at an element ID");
    }

    let missing: Vec<&str> = refs.iter().filter(|r| !r.resolves).map(|r| r.id.as_str()).collect();
    if missing.is_empty() {
        AriaFinding::new(name, AriaStatus::Pass, value, &expected, "References valid element")
    } else {
        AriaFinding::new(
            name,
            AriaStatus::Fail,
            value,
            &expected,
            format!("Referenced element does not exist: {}", missing.join(", ")),
        )
    }
}

fn check_value(name: &str, value: &str, ty: ValueType) -> AriaFinding {
    let expected = ty.expected();
    if ty.accepts(value) {
        return AriaFinding::new(name, AriaStatus::Pass, value, &expected, "Valid value");
    }
    // Empty free text is odd but harmless
    let status = if ty == ValueType::Text { AriaStatus::Warning } else { AriaStatus::Fail };
    AriaFinding::new(name, status, value, &expected, format!("Must be {}", expected.to_lowercase()))
}

fn check_role(role: &str) -> AriaFinding {
    let tokens: Vec<&str> = role.split_whitespace().collect();
    let invalid: Vec<&str> = tokens
        .iter()
        .copied()
        .filter(|t| !AriaRole::parse(t).is_some_and(|r| r.is_concrete()))
        .collect();

    if !tokens.is_empty() && invalid.is_empty() {
        AriaFinding::new("role", AriaStatus::Pass, role, "Valid ARIA role", "Valid ARIA role")
    } else if tokens.is_empty() {
        AriaFinding::new("role", AriaStatus::Warning, role, "Valid ARIA role", "Empty role; remove it or name a role")
    } else {
        AriaFinding::new(
            "role",
            AriaStatus::Warning,
            role,
            "Valid ARIA role",
            format!("Not a concrete ARIA role: {}", invalid.join(", ")),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tables_sorted() {
        assert!(ROLES.windows(2).all(|w| w[0].0 < w[1].0));
        assert!(ARIA_ATTRIBUTES.windows(2).all(|w| w[0].0 < w[1].0));
    }

    #[test]
    fn test_role_parse() {
        assert_eq!(AriaRole::parse("Button").map(|r| r.name()), Some("button"));
        assert!(AriaRole::parse("navigation").unwrap().is_landmark());
        assert!(AriaRole::parse("slider").unwrap().is_widget());
        assert!(AriaRole::parse("widget").unwrap().is_abstract());
        assert!(AriaRole::parse("buton").is_none());
    }

    #[test]
    fn test_value_types() {
        assert!(ValueType::Boolean.accepts("TRUE"));
        assert!(!ValueType::OptionalBoolean.accepts("maybe"));
        assert!(ValueType::Tristate.accepts("mixed"));
        assert!(ValueType::Integer.accepts("3"));
        assert!(!ValueType::Integer.accepts("3.5"));
        assert!(ValueType::Number.accepts("3.5"));
        assert!(!ValueType::Number.accepts("NaN"));
        assert!(ValueType::TokenList(&["additions", "text"]).accepts("additions text"));
        assert!(!ValueType::TokenList(&["additions", "text"]).accepts(""));
    }

    #[test]
    fn test_roles() {
        assert_eq!(check_role("button").status, AriaStatus::Pass);
        assert_eq!(check_role("switch button").status, AriaStatus::Pass);
        assert_eq!(check_role("buton").status, AriaStatus::Warning);
        assert_eq!(check_role("landmark").status, AriaStatus::Warning);
        assert_eq!(check_role("  ").status, AriaStatus::Warning);
    }

    #[test]
    fn test_label() {
        assert_eq!(check_label(Some("Close")).status, AriaStatus::Pass);
        assert_eq!(check_label(Some("  ")).status, AriaStatus::Missing);
        assert_eq!(check_label(None).current, "Not present");
    }

    #[test]
    fn test_id_reference_names() {
        assert!(is_id_reference("aria-labelledby"));
        assert!(is_id_reference("aria-activedescendant"));
        assert!(!is_id_reference("aria-label"));
        assert!(!is_id_reference("aria-bogus"));
    }
}
