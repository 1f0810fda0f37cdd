//! wcag-lens DOM
//!
//! Arena-allocated document tree. Elements handed to the accessibility
//! analyzer live here, together with everything the analyzer needs to read
//! around them: parent, descendant text, id lookups and the heading outline.

mod node;
mod tree;
mod document;
mod query;
mod serialize;

pub use node::{Node, NodeData, ElementData, Attribute};
pub use tree::DomTree;
pub use document::{Document, HeadingEntry};
pub use query::{Selector, SelectorList, SelectorPart, Combinator, AttrOp, Specificity};
pub use serialize::outer_html;

/// Node identifier (index into arena)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub u32);

impl NodeId {
    /// Root node ID
    pub const ROOT: NodeId = NodeId(0);
    /// Sentinel for "no node"
    pub const NONE: NodeId = NodeId(u32::MAX);

    /// Check that this id refers to a node slot
    #[inline]
    pub fn is_valid(self) -> bool {
        self != Self::NONE
    }
}

/// DOM error
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DomError {
    #[error("Invalid selector `{selector}`: {message}")]
    InvalidSelector { selector: String, message: String },
}
