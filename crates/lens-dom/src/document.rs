//! Document - High-level document API

use crate::{DomError, DomTree, NodeId, SelectorList};

/// A heading element and its level, as listed in document order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HeadingEntry {
    pub node: NodeId,
    pub level: u8,
}

/// HTML Document
#[derive(Debug, Clone)]
pub struct Document {
    /// The DOM tree
    pub tree: DomTree,
    /// Document URL
    url: String,
    /// Cached reference to <html> element
    html_element: NodeId,
    /// Cached reference to <head> element
    head_element: NodeId,
    /// Cached reference to <body> element
    body_element: NodeId,
}

impl Document {
    /// Create a new document with html/head/body
    pub fn new(url: &str) -> Self {
        let mut tree = DomTree::new();

        let html = tree.create_element("html");
        let head = tree.create_element("head");
        let body = tree.create_element("body");

        tree.append_child(tree.root(), html);
        tree.append_child(html, head);
        tree.append_child(html, body);

        Self {
            tree,
            url: url.to_string(),
            html_element: html,
            head_element: head,
            body_element: body,
        }
    }

    /// Create an empty document (no structure)
    pub fn empty(url: &str) -> Self {
        Self {
            tree: DomTree::new(),
            url: url.to_string(),
            html_element: NodeId::NONE,
            head_element: NodeId::NONE,
            body_element: NodeId::NONE,
        }
    }

    /// Locate html/head/body after the tree was built externally
    pub fn finalize(&mut self) {
        let root = self.tree.root();
        self.html_element = self
            .tree
            .element_children(root)
            .find(|(_, e)| e.tag() == "html")
            .map(|(id, _)| id)
            .unwrap_or(NodeId::NONE);

        self.head_element = NodeId::NONE;
        self.body_element = NodeId::NONE;
        if self.html_element.is_valid() {
            for (id, elem) in self.tree.element_children(self.html_element) {
                match elem.tag() {
                    "head" => self.head_element = id,
                    "body" => self.body_element = id,
                    _ => {}
                }
            }
        }
        tracing::trace!(nodes = self.tree.len(), "document finalized");
    }

    /// Get document URL
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Get document title
    pub fn title(&self) -> String {
        if !self.head_element.is_valid() {
            return String::new();
        }
        self.tree
            .element_children(self.head_element)
            .find(|(_, e)| e.tag() == "title")
            .map(|(id, _)| self.tree.text_content(id).trim().to_string())
            .unwrap_or_default()
    }

    /// Get <html> element
    pub fn document_element(&self) -> NodeId {
        self.html_element
    }

    /// Get <head> element
    pub fn head(&self) -> NodeId {
        self.head_element
    }

    /// Get <body> element
    pub fn body(&self) -> NodeId {
        self.body_element
    }

    /// Get element by ID (first match in document order)
    pub fn get_element_by_id(&self, id: &str) -> Option<NodeId> {
        if id.is_empty() {
            return None;
        }
        self.elements()
            .find(|&node| self.tree.element(node).and_then(|e| e.id.as_deref()) == Some(id))
    }

    /// All elements in document order
    pub fn elements(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.tree
            .descendants(self.tree.root())
            .into_iter()
            .filter(|&id| self.tree.element(id).is_some())
    }

    /// Elements with the given tag, in document order
    pub fn elements_by_tag_name(&self, tag: &str) -> Vec<NodeId> {
        self.elements()
            .filter(|&id| {
                self.tree
                    .element(id)
                    .is_some_and(|e| e.tag().eq_ignore_ascii_case(tag))
            })
            .collect()
    }

    /// Every h1-h6 element in document order
    pub fn headings(&self) -> Vec<HeadingEntry> {
        self.elements()
            .filter_map(|node| {
                let elem = self.tree.element(node)?;
                heading_level(elem.tag()).map(|level| HeadingEntry { node, level })
            })
            .collect()
    }

    /// Contents of every <style> element, in document order
    pub fn style_sources(&self) -> Vec<String> {
        self.elements_by_tag_name("style")
            .into_iter()
            .map(|id| self.tree.text_content(id))
            .collect()
    }

    /// First element matching `selector`
    pub fn query_selector(&self, selector: &str) -> Result<Option<NodeId>, DomError> {
        let list = SelectorList::parse(selector)?;
        Ok(self.elements().find(|&id| list.matches(&self.tree, id)))
    }

    /// All elements matching `selector`, in document order
    pub fn query_selector_all(&self, selector: &str) -> Result<Vec<NodeId>, DomError> {
        let list = SelectorList::parse(selector)?;
        Ok(self.elements().filter(|&id| list.matches(&self.tree, id)).collect())
    }

    /// Access the DOM tree
    pub fn tree(&self) -> &DomTree {
        &self.tree
    }

    /// Access the DOM tree mutably
    pub fn tree_mut(&mut self) -> &mut DomTree {
        &mut self.tree
    }
}

impl Default for Document {
    fn default() -> Self {
        Self::new("about:blank")
    }
}

/// Level of an `h1`..`h6` tag
pub(crate) fn heading_level(tag: &str) -> Option<u8> {
    match tag.as_bytes() {
        [b'h' | b'H', d @ b'1'..=b'6'] => Some(d - b'0'),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn with_headings(tags: &[&str]) -> Document {
        let mut doc = Document::new("test://headings");
        let body = doc.body();
        for tag in tags {
            let h = doc.tree.create_element(tag);
            doc.tree.append_child(body, h);
        }
        doc
    }

    #[test]
    fn test_heading_level() {
        assert_eq!(heading_level("h1"), Some(1));
        assert_eq!(heading_level("h6"), Some(6));
        assert_eq!(heading_level("h7"), None);
        assert_eq!(heading_level("header"), None);
    }

    #[test]
    fn test_headings_in_document_order() {
        let doc = with_headings(&["h1", "p", "h3", "h2"]);
        let levels: Vec<u8> = doc.headings().iter().map(|h| h.level).collect();
        assert_eq!(levels, vec![1, 3, 2]);
    }

    #[test]
    fn test_get_element_by_id() {
        let mut doc = Document::new("test://ids");
        let body = doc.body();
        let p = doc.tree.create_element("p");
        doc.tree.set_attribute(p, "id", "help");
        doc.tree.append_child(body, p);

        assert_eq!(doc.get_element_by_id("help"), Some(p));
        assert_eq!(doc.get_element_by_id("missing"), None);
        assert_eq!(doc.get_element_by_id(""), None);
    }

    #[test]
    fn test_finalize_locates_structure() {
        let source = Document::new("test://final");
        let mut doc = Document::empty("test://final");
        doc.tree = source.tree.clone();
        doc.finalize();
        assert_eq!(doc.body(), source.body());
        assert_eq!(doc.head(), source.head());
    }
}
