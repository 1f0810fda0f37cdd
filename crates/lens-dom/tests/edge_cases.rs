//! Edge case tests for lens-dom
//!
//! Boundary conditions around queries and document structure.

use lens_dom::{Document, DomError, NodeId};

fn list_document() -> (Document, NodeId, NodeId) {
    let mut doc = Document::new("test://list");
    let body = doc.body();
    let ul = doc.tree.create_element("ul");
    let div = doc.tree.create_element("div");
    let good = doc.tree.create_element("li");
    let stray = doc.tree.create_element("li");
    doc.tree.set_attribute(stray, "class", "stray");
    doc.tree.append_child(body, ul);
    doc.tree.append_child(ul, good);
    doc.tree.append_child(body, div);
    doc.tree.append_child(div, stray);
    (doc, good, stray)
}

#[test]
fn test_query_selector_all_document_order() {
    let (doc, good, stray) = list_document();
    assert_eq!(doc.query_selector_all("li").unwrap(), vec![good, stray]);
    assert_eq!(doc.query_selector("div > li").unwrap(), Some(stray));
    assert_eq!(doc.query_selector("ul li.stray").unwrap(), None);
}

#[test]
fn test_query_selector_invalid() {
    let (doc, _, _) = list_document();
    let err = doc.query_selector("li >").unwrap_err();
    assert!(matches!(err, DomError::InvalidSelector { .. }));
}

#[test]
fn test_empty_document_queries() {
    let doc = Document::empty("test://empty");
    assert!(doc.headings().is_empty());
    assert_eq!(doc.title(), "");
    assert_eq!(doc.query_selector("*").unwrap(), None);
    assert!(!doc.body().is_valid());
}

#[test]
fn test_deep_nesting_text() {
    let mut doc = Document::new("test://deep");
    let mut parent = doc.body();
    for _ in 0..500 {
        let span = doc.tree.create_element("span");
        doc.tree.append_child(parent, span);
        parent = span;
    }
    let text = doc.tree.create_text("deep");
    doc.tree.append_child(parent, text);
    assert_eq!(doc.tree.text_content(doc.body()), "deep");
}
