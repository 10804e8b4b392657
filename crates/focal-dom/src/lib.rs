//! focal DOM - Document Object Model
//!
//! Arena-backed DOM tree with the document state the accessibility layer
//! observes: the active element, rendered visibility, scroll requests,
//! text selection, and mutation records.

mod attributes;
mod document;
mod dom_events;
mod keyboard;
mod node;
mod selector;
mod tree;

pub use attributes::{Attr, NamedNodeMap};
pub use document::{Document, FocusOptions, TextSelection};
pub use dom_events::{DomEvent, DomEventType};
pub use keyboard::{Key, KeyboardEvent, Modifiers, NamedKey};
pub use node::{ElementData, Node, NodeData};
pub use selector::{CompoundSelector, Selector, SimpleSelector};
pub use tree::{Descendants, DomTree};

/// Node identifier (index into arena)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub(crate) u32);

impl NodeId {
    /// Root (document) node ID
    pub const ROOT: NodeId = NodeId(0);

    /// Sentinel for "no node"
    pub const NONE: NodeId = NodeId(u32::MAX);

    #[inline]
    pub fn is_valid(self) -> bool {
        self != Self::NONE
    }

    #[inline]
    pub(crate) fn index(self) -> usize {
        self.0 as usize
    }

    /// Raw arena index, stable for the lifetime of the tree
    pub fn raw(self) -> u32 {
        self.0
    }
}

impl std::fmt::Display for NodeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.is_valid() {
            write!(f, "#{}", self.0)
        } else {
            f.write_str("#none")
        }
    }
}

/// Result type for DOM operations
pub type DomResult<T> = Result<T, DomError>;

/// DOM operation errors
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DomError {
    #[error("Node not found: {0}")]
    NodeNotFound(NodeId),

    #[error("Node {0} is not an element")]
    NotAnElement(NodeId),

    #[error("Node {0} is not a child of {1}")]
    NotAChild(NodeId, NodeId),

    #[error("Hierarchy request error: cannot insert {child} into {parent}")]
    HierarchyRequest { parent: NodeId, child: NodeId },

    #[error("Invalid selector: {0}")]
    InvalidSelector(String),
}
