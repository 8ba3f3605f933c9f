//! fOS DOM - Document Object Model
//!
//! Arena-backed DOM tree with the per-node primitives the query layer
//! drives: attributes, class lists, dataset keys, inline styles, selector
//! matching and native event dispatch.

mod attributes;
mod classlist;
mod dataset;
mod document;
mod element;
mod events;
mod node;
mod operations;
mod selector;
mod style;
mod tree;

use std::fmt;

pub use attributes::{Attr, NamedNodeMap};
pub use classlist::TokenList;
pub use dataset::{attribute_name_for_key, key_for_attribute_name};
pub use document::Document;
pub use events::{Event, EventListenerRegistry, EventPhase, Listener, ListenerId};
pub use node::{ElementData, Node, NodeData};
pub use operations::{DomError, DomResult};
pub use selector::{AttributeMatcher, AttributeSelector, Combinator, Component, CompoundSelector, Nth, PseudoClass, SelectorList};
pub use style::StyleDeclaration;
pub use tree::{Ancestors, Children, DomTree};

/// Node identifier (index into arena)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub(crate) u32);

impl NodeId {
    /// Root node ID
    pub const ROOT: NodeId = NodeId(0);

    /// Null reference. Never resolves to a node.
    pub const NONE: NodeId = NodeId(u32::MAX);

    /// Build an id from a raw arena index. The id is not checked against
    /// any tree, so it may be stale.
    pub const fn from_raw(raw: u32) -> Self {
        Self(raw)
    }

    /// Raw arena index
    pub const fn raw(self) -> u32 {
        self.0
    }

    #[inline]
    pub fn is_valid(self) -> bool {
        self != Self::NONE
    }

    #[inline]
    pub(crate) fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_valid() {
            write!(f, "#{}", self.0)
        } else {
            f.write_str("#none")
        }
    }
}
