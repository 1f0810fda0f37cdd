//! HTML Serialization (outerHTML)

use crate::{DomTree, NodeData, NodeId};

/// Void elements (self-closing, no end tag)
const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input",
    "link", "meta", "param", "source", "track", "wbr",
];

/// Raw text elements (no escaping for content)
const RAW_TEXT_ELEMENTS: &[&str] = &["script", "style"];

/// Serialize a node and its descendants
pub fn outer_html(tree: &DomTree, node: NodeId) -> String {
    let mut output = String::new();
    serialize_node(tree, node, false, &mut output);
    output
}

fn serialize_node(tree: &DomTree, node_id: NodeId, raw: bool, output: &mut String) {
    let Some(node) = tree.get(node_id) else {
        return;
    };

    match &node.data {
        NodeData::Document => {
            for (child, _) in tree.children(node_id) {
                serialize_node(tree, child, false, output);
            }
        }
        NodeData::Doctype { name } => {
            output.push_str("<!DOCTYPE ");
            output.push_str(name);
            output.push('>');
        }
        NodeData::Element(elem) => {
            let tag = elem.tag();
            output.push('<');
            output.push_str(tag);
            for attr in elem.attributes() {
                output.push(' ');
                output.push_str(&attr.name);
                output.push_str("=\"");
                escape_into(&attr.value, true, output);
                output.push('"');
            }
            output.push('>');

            if VOID_ELEMENTS.contains(&tag) {
                return;
            }
            let is_raw = RAW_TEXT_ELEMENTS.contains(&tag);
            for (child, _) in tree.children(node_id) {
                serialize_node(tree, child, is_raw, output);
            }
            output.push_str("</");
            output.push_str(tag);
            output.push('>');
        }
        NodeData::Text(text) => {
            if raw {
                output.push_str(text);
            } else {
                escape_into(text, false, output);
            }
        }
        NodeData::Comment(text) => {
            output.push_str("<!--");
            output.push_str(text);
            output.push_str("-->");
        }
    }
}

fn escape_into(text: &str, attribute: bool, output: &mut String) {
    for c in text.chars() {
        match c {
            '&' => output.push_str("&amp;"),
            '\u{a0}' => output.push_str("&nbsp;"),
            '"' if attribute => output.push_str("&quot;"),
            '<' if !attribute => output.push_str("&lt;"),
            '>' if !attribute => output.push_str("&gt;"),
            _ => output.push(c),
        }
    }
}
