//! Selection locators

use std::fmt;

use fos_dom::NodeId;

/// What a wrapper selects: a selector string or one node.
///
/// Equality is exact. `".a"` and `" .a"` are different locators even though
/// they select the same nodes.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Locator {
    Query(String),
    Node(NodeId),
}

impl From<&str> for Locator {
    fn from(selector: &str) -> Self {
        Self::Query(selector.to_string())
    }
}

impl From<String> for Locator {
    fn from(selector: String) -> Self {
        Self::Query(selector)
    }
}

impl From<&String> for Locator {
    fn from(selector: &String) -> Self {
        Self::Query(selector.clone())
    }
}

impl From<NodeId> for Locator {
    fn from(node: NodeId) -> Self {
        Self::Node(node)
    }
}

impl fmt::Display for Locator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Query(selector) => write!(f, "'{selector}'"),
            Self::Node(node) => write!(f, "node {node}"),
        }
    }
}
