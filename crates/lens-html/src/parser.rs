//! HTML5 Parser implementation
//!
//! Uses html5ever's RcDom and converts it to our arena DOM.

use html5ever::parse_document;
use html5ever::tendril::TendrilSink;
use lens_dom::{Document, DomTree, NodeId};
use markup5ever_rcdom::{Handle, NodeData as RcNodeData, RcDom};

use crate::HtmlError;

/// HTML5 parser
#[derive(Debug, Clone, Copy, Default)]
pub struct HtmlParser;

impl HtmlParser {
    /// Create a new HTML parser
    pub fn new() -> Self {
        Self
    }

    /// Parse HTML string into a Document
    pub fn parse(&self, html: &str) -> Result<Document, HtmlError> {
        self.parse_with_url(html, "about:blank")
    }

    /// Parse HTML with a base URL
    pub fn parse_with_url(&self, html: &str, url: &str) -> Result<Document, HtmlError> {
        tracing::debug!("Parsing HTML document: {}", url);

        let dom = parse_document(RcDom::default(), Default::default())
            .from_utf8()
            .read_from(&mut html.as_bytes())?;

        let mut document = Document::empty(url);
        let root = document.tree().root();
        convert_node(&dom.document, document.tree_mut(), root);
        document.finalize();

        tracing::debug!("Parsed {} nodes", document.tree().len());
        Ok(document)
    }
}

/// Convert an RcDom node (and its subtree) under `parent`
fn convert_node(handle: &Handle, tree: &mut DomTree, parent: NodeId) {
    match &handle.data {
        RcNodeData::Document => {
            for child in handle.children.borrow().iter() {
                convert_node(child, tree, parent);
            }
        }
        RcNodeData::Doctype { name, .. } => {
            let id = tree.create_doctype(name);
            tree.append_child(parent, id);
        }
        RcNodeData::Text { contents } => {
            let id = tree.create_text(&contents.borrow());
            tree.append_child(parent, id);
        }
        RcNodeData::Comment { contents } => {
            let id = tree.create_comment(contents);
            tree.append_child(parent, id);
        }
        RcNodeData::Element { name, attrs, .. } => {
            let id = tree.create_element(&name.local);
            for attr in attrs.borrow().iter() {
                tree.set_attribute(id, &attr.name.local, &attr.value);
            }
            tree.append_child(parent, id);

            for child in handle.children.borrow().iter() {
                convert_node(child, tree, id);
            }
        }
        RcNodeData::ProcessingInstruction { .. } => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_simple() {
        let html = "<html><head><title>Test</title></head><body><p>Hello</p></body></html>";
        let doc = HtmlParser::new().parse(html).unwrap();

        assert!(doc.tree().len() > 1, "Expected more than 1 node, got {}", doc.tree().len());
        assert_eq!(doc.title(), "Test");
        assert!(doc.body().is_valid());
    }

    #[test]
    fn test_parse_fragment() {
        let html = "<div><span>Text</span></div>";
        let doc = HtmlParser::new().parse(html).unwrap();

        // Fragments get wrapped in html/head/body by html5ever
        assert!(doc.body().is_valid());
        assert_eq!(doc.elements_by_tag_name("span").len(), 1);
    }
}
