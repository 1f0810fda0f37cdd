//! Structural/Semantic Inspector
//!
//! Reduces one element to an immutable `ElementSnapshot`.

use std::collections::BTreeMap;

use lens_css::{ComputedStyle, StyleResolver};
use lens_dom::{Document, ElementData, NodeId, outer_html};
use serde::Serialize;

use crate::A11yError;
use crate::aria::is_id_reference;

/// Tags that are interactive on their own
const INTERACTIVE_TAGS: &[&str] = &["a", "button", "input", "select", "textarea"];
/// Explicit roles that make any element interactive
const INTERACTIVE_ROLES: &[&str] = &["button", "link", "menuitem", "tab", "checkbox", "radio"];

/// Read access to one element and its computed style.
///
/// Tag and attribute names are lowercase.
pub trait ElementSource {
    fn tag_name(&self) -> &str;
    fn attribute(&self, name: &str) -> Option<&str>;
    /// All attributes in source order
    fn attributes(&self) -> Vec<(&str, &str)>;
    fn text_content(&self) -> String;
    fn parent_tag(&self) -> Option<&str>;
    /// Whether some element in the same document has this id
    fn resolves_id(&self, id: &str) -> bool;
    fn outer_html(&self) -> String;
    /// Node identity for heading-outline lookups
    fn node(&self) -> Option<NodeId> {
        None
    }

    /// Resolved text color, `None` when unknown or fully transparent
    fn computed_color(&self) -> Option<String>;
    /// Resolved background color, `None` when unknown or fully transparent
    fn computed_background_color(&self) -> Option<String>;
    /// Font size in px
    fn font_size(&self) -> Option<f32>;
    /// Font weight as computed ("400", "700", "bold", ...)
    fn font_weight(&self) -> Option<String>;
}

/// A `lens-dom` element plus its computed style
#[derive(Debug, Clone)]
pub struct DomElement<'a> {
    doc: &'a Document,
    node: NodeId,
    element: &'a ElementData,
    style: ComputedStyle,
}

impl<'a> DomElement<'a> {
    /// Wrap an element with an already computed style
    pub fn new(doc: &'a Document, node: NodeId, style: ComputedStyle) -> Result<Self, A11yError> {
        let element = doc.tree().element(node).ok_or(A11yError::NotAnElement(node))?;
        Ok(Self { doc, node, element, style })
    }

    /// Wrap an element, computing its style with `resolver`.
    ///
    /// With `walk_background`, a transparent background is replaced by the
    /// nearest ancestor's non-transparent one.
    pub fn resolve(
        doc: &'a Document,
        node: NodeId,
        resolver: &StyleResolver,
        walk_background: bool,
    ) -> Result<Self, A11yError> {
        let mut style = resolver.compute_style(doc.tree(), node);
        if walk_background && style.background_color.is_transparent() {
            style.background_color = resolver.effective_background(doc.tree(), node);
        }
        Self::new(doc, node, style)
    }

    pub fn style(&self) -> &ComputedStyle {
        &self.style
    }
}

impl ElementSource for DomElement<'_> {
    fn tag_name(&self) -> &str {
        self.element.tag()
    }

    fn attribute(&self, name: &str) -> Option<&str> {
        self.element.get_attr(name)
    }

    fn attributes(&self) -> Vec<(&str, &str)> {
        self.element
            .attributes()
            .map(|a| (a.name.as_str(), a.value.as_str()))
            .collect()
    }

    fn text_content(&self) -> String {
        self.doc.tree().text_content(self.node)
    }

    fn parent_tag(&self) -> Option<&str> {
        let tree = self.doc.tree();
        tree.parent_element(self.node)
            .and_then(|p| tree.element(p))
            .map(|e| e.tag())
    }

    fn resolves_id(&self, id: &str) -> bool {
        self.doc.get_element_by_id(id).is_some()
    }

    fn outer_html(&self) -> String {
        outer_html(self.doc.tree(), self.node)
    }

    fn node(&self) -> Option<NodeId> {
        Some(self.node)
    }

    fn computed_color(&self) -> Option<String> {
        Some(self.style.color)
            .filter(|c| !c.is_transparent())
            .map(|c| c.to_css_string())
    }

    fn computed_background_color(&self) -> Option<String> {
        Some(self.style.background_color)
            .filter(|c| !c.is_transparent())
            .map(|c| c.to_css_string())
    }

    fn font_size(&self) -> Option<f32> {
        Some(self.style.font_size)
    }

    fn font_weight(&self) -> Option<String> {
        Some(self.style.font_weight.to_string())
    }
}

/// One id named by an ID-reference ARIA attribute
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AriaReference {
    pub attribute: String,
    pub id: String,
    pub resolves: bool,
}

/// Normalized description of one element, captured once per analysis
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ElementSnapshot {
    pub tag_name: String,
    pub id: Option<String>,
    pub class_name: Option<String>,
    pub explicit_role: Option<String>,
    pub implicit_role: Option<&'static str>,
    pub aria_attributes: BTreeMap<String, String>,
    pub aria_references: Vec<AriaReference>,
    pub text_content: String,
    pub tab_index: Option<i32>,
    pub alt: Option<String>,
    pub title: Option<String>,
    pub content_editable: bool,
    pub has_click_handler: bool,
    pub parent_tag: Option<String>,
    pub input_type: Option<String>,
    pub interactive: bool,
    pub computed_color: Option<String>,
    pub computed_background_color: Option<String>,
    pub font_size: Option<f32>,
    pub font_weight: Option<String>,
    #[serde(skip)]
    pub node: Option<NodeId>,
}

impl ElementSnapshot {
    /// First token of the `role` attribute
    pub fn primary_role(&self) -> Option<&str> {
        self.explicit_role.as_deref().and_then(|r| r.split_whitespace().next())
    }

    /// Heading level for `h1`..`h6`
    pub fn heading_level(&self) -> Option<u8> {
        match self.tag_name.as_str() {
            "h1" => Some(1),
            "h2" => Some(2),
            "h3" => Some(3),
            "h4" => Some(4),
            "h5" => Some(5),
            "h6" => Some(6),
            _ => None,
        }
    }

    /// Short label such as `button#save.primary`
    pub fn label(&self) -> String {
        let mut label = self.tag_name.clone();
        if let Some(id) = self.id.as_deref().filter(|s| !s.is_empty()) {
            label.push('#');
            label.push_str(id);
        }
        for class in self.class_name.iter().flat_map(|c| c.split_whitespace()) {
            label.push('.');
            label.push_str(class);
        }
        label
    }
}

/// Implicit ARIA role of a tag (`input` needs its `type`)
pub fn implicit_role(tag: &str, input_type: Option<&str>) -> Option<&'static str> {
    Some(match tag {
        "a" => "link",
        "article" => "article",
        "aside" => "complementary",
        "button" => "button",
        "footer" => "contentinfo",
        "form" => "form",
        "h1" | "h2" | "h3" | "h4" | "h5" | "h6" => "heading",
        "header" => "banner",
        "img" => "img",
        "input" => match input_type.unwrap_or("text") {
            "checkbox" => "checkbox",
            "radio" => "radio",
            "button" | "submit" | "reset" | "image" => "button",
            "range" => "slider",
            "number" => "spinbutton",
            "search" => "searchbox",
            _ => "textbox",
        },
        "li" => "listitem",
        "main" => "main",
        "nav" => "navigation",
        "ol" | "ul" => "list",
        "section" => "region",
        "select" => "combobox",
        "table" => "table",
        "textarea" => "textbox",
        _ => return None,
    })
}

/// HTML "rules for parsing integers": optional sign and leading digits,
/// anything after them ignored (`"2.5"` is 2, `"3px"` is 3)
fn parse_html_integer(value: &str) -> Option<i32> {
    let value = value.trim_start_matches(|c: char| c.is_ascii_whitespace());
    let (negative, rest) = match value.as_bytes().first() {
        Some(b'-') => (true, &value[1..]),
        Some(b'+') => (false, &value[1..]),
        _ => (false, value),
    };
    let digits = rest.bytes().take_while(u8::is_ascii_digit).count();
    if digits == 0 {
        return None;
    }
    let magnitude: i64 = rest[..digits].parse().ok()?;
    let signed = if negative { -magnitude } else { magnitude };
    i32::try_from(signed).ok()
}

fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Capture an `ElementSnapshot`. Never fails: absent data maps to `None`,
/// `false` or empty.
pub fn inspect(source: &impl ElementSource) -> ElementSnapshot {
    let tag_name = source.tag_name().to_ascii_lowercase();
    let owned = |name: &str| source.attribute(name).map(str::to_string);

    let input_type = (tag_name == "input").then(|| {
        source
            .attribute("type")
            .map(|t| t.trim().to_ascii_lowercase())
            .unwrap_or_else(|| "text".to_string())
    });
    let explicit_role = owned("role");
    let implicit = implicit_role(&tag_name, input_type.as_deref());

    let mut aria_attributes = BTreeMap::new();
    for (name, value) in source.attributes() {
        let name = name.to_ascii_lowercase();
        if name.starts_with("aria-") {
            aria_attributes.insert(name, value.to_string());
        }
    }

    let aria_references = aria_attributes
        .iter()
        .filter(|(name, _)| is_id_reference(name))
        .flat_map(|(name, value)| {
            value.split_whitespace().map(move |id| AriaReference {
                attribute: name.clone(),
                id: id.to_string(),
                resolves: source.resolves_id(id),
            })
        })
        .collect();

    let interactive = INTERACTIVE_TAGS.contains(&tag_name.as_str())
        || explicit_role
            .as_deref()
            .and_then(|r| r.split_whitespace().next())
            .is_some_and(|r| INTERACTIVE_ROLES.contains(&r.to_ascii_lowercase().as_str()));

    let snapshot = ElementSnapshot {
        id: owned("id"),
        class_name: owned("class"),
        implicit_role: implicit,
        aria_attributes,
        aria_references,
        text_content: collapse_whitespace(&source.text_content()),
        tab_index: source.attribute("tabindex").and_then(parse_html_integer),
        alt: owned("alt"),
        title: owned("title"),
        content_editable: source.attribute("contenteditable").is_some(),
        has_click_handler: source.attribute("onclick").is_some(),
        parent_tag: source.parent_tag().map(|t| t.to_ascii_lowercase()),
        input_type,
        interactive,
        computed_color: source.computed_color(),
        computed_background_color: source.computed_background_color(),
        font_size: source.font_size(),
        font_weight: source.font_weight(),
        node: source.node(),
        explicit_role,
        tag_name,
    };

    tracing::debug!(
        "Inspected <{}>: role={:?} implicit={:?} aria={}",
        snapshot.tag_name,
        snapshot.explicit_role,
        snapshot.implicit_role,
        snapshot.aria_attributes.len()
    );
    snapshot
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    /// Attribute-only element for unit tests
    #[derive(Debug, Default)]
    pub(crate) struct FakeElement {
        pub tag: &'static str,
        pub attrs: Vec<(&'static str, &'static str)>,
        pub text: &'static str,
        pub parent: Option<&'static str>,
        pub ids: Vec<&'static str>,
        pub color: Option<&'static str>,
        pub background: Option<&'static str>,
        pub font_size: Option<f32>,
        pub font_weight: Option<&'static str>,
    }

    impl FakeElement {
        pub fn new(tag: &'static str) -> Self {
            Self { tag, ..Self::default() }
        }

        pub fn attr(mut self, name: &'static str, value: &'static str) -> Self {
            self.attrs.push((name, value));
            self
        }
    }

    impl ElementSource for FakeElement {
        fn tag_name(&self) -> &str {
            self.tag
        }
        fn attribute(&self, name: &str) -> Option<&str> {
            self.attrs.iter().find(|(n, _)| *n == name).map(|(_, v)| *v)
        }
        fn attributes(&self) -> Vec<(&str, &str)> {
            self.attrs.clone()
        }
        fn text_content(&self) -> String {
            self.text.to_string()
        }
        fn parent_tag(&self) -> Option<&str> {
            self.parent
        }
        fn resolves_id(&self, id: &str) -> bool {
            self.ids.contains(&id)
        }
        fn outer_html(&self) -> String {
            format!("<{0}>{1}</{0}>", self.tag, self.text)
        }
        fn computed_color(&self) -> Option<String> {
            self.color.map(str::to_string)
        }
        fn computed_background_color(&self) -> Option<String> {
            self.background.map(str::to_string)
        }
        fn font_size(&self) -> Option<f32> {
            self.font_size
        }
        fn font_weight(&self) -> Option<String> {
            self.font_weight.map(str::to_string)
        }
    }

    #[test]
    fn test_html_integer() {
        assert_eq!(parse_html_integer("2.5"), Some(2));
        assert_eq!(parse_html_integer("3px"), Some(3));
        assert_eq!(parse_html_integer(" -1 "), Some(-1));
        assert_eq!(parse_html_integer("+0.0"), Some(0));
        assert_eq!(parse_html_integer("abc"), None);
        assert_eq!(parse_html_integer("-"), None);
        assert_eq!(parse_html_integer("99999999999"), None);

        let snap = inspect(&FakeElement::new("div").attr("tabindex", "2.5"));
        assert_eq!(snap.tab_index, Some(2));
    }

    #[test]
    fn test_implicit_roles() {
        assert_eq!(implicit_role("nav", None), Some("navigation"));
        assert_eq!(implicit_role("input", Some("checkbox")), Some("checkbox"));
        assert_eq!(implicit_role("input", None), Some("textbox"));
        assert_eq!(implicit_role("input", Some("submit")), Some("button"));
        assert_eq!(implicit_role("div", None), None);
        assert_eq!(implicit_role("custom-element", None), None);
    }

    #[test]
    fn test_inspect_attributes() {
        let el = FakeElement {
            text: "  Open \n  menu ",
            parent: Some("nav"),
            ids: vec!["help"],
            ..FakeElement::new("button")
        }
        .attr("aria-expanded", "false")
        .attr("aria-describedby", "help missing")
        .attr("tabindex", " 2 ")
        .attr("onclick", "go()");

        let snap = inspect(&el);
        assert_eq!(snap.tag_name, "button");
        assert_eq!(snap.implicit_role, Some("button"));
        assert_eq!(snap.text_content, "Open menu");
        assert_eq!(snap.tab_index, Some(2));
        assert!(snap.has_click_handler);
        assert!(snap.interactive);
        assert_eq!(snap.parent_tag.as_deref(), Some("nav"));
        assert_eq!(snap.aria_attributes.keys().collect::<Vec<_>>(), ["aria-describedby", "aria-expanded"]);
        assert_eq!(snap.aria_references.len(), 2);
        assert!(snap.aria_references[0].resolves);
        assert!(!snap.aria_references[1].resolves);
    }

    #[test]
    fn test_inspect_degrades() {
        let snap = inspect(&FakeElement::new("div").attr("tabindex", "soon"));
        assert_eq!(snap.tab_index, None);
        assert_eq!(snap.implicit_role, None);
        assert!(!snap.interactive);
        assert!(snap.alt.is_none());
        assert!(snap.computed_color.is_none());
    }

    #[test]
    fn test_interactive_by_role() {
        let snap = inspect(&FakeElement::new("span").attr("role", "Tab"));
        assert!(snap.interactive);
        assert_eq!(snap.primary_role(), Some("Tab"));
    }

    #[test]
    fn test_label() {
        let snap = inspect(&FakeElement::new("button").attr("id", "save").attr("class", "btn primary"));
        assert_eq!(snap.label(), "button#save.btn.primary");
    }
}
