//! Selection resolution

use fos_dom::NodeId;

use crate::{Host, HostError, Locator};

/// Fixed, ordered snapshot of the nodes a wrapper operates on.
///
/// Resolved once; later document changes never add, drop or reorder
/// members, even when a member is removed from the document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selection {
    nodes: Box<[NodeId]>,
}

impl Selection {
    /// Resolve `locator` against `host`.
    ///
    /// A query yields every matching element in document order; zero
    /// matches is an empty selection, not an error. A node locator is
    /// stored as-is without an existence check.
    pub fn resolve<H: Host>(host: &H, locator: &Locator) -> Result<Self, HostError> {
        let nodes: Box<[NodeId]> = match locator {
            Locator::Query(selector) => host.query_selector_all(selector)?.into_boxed_slice(),
            Locator::Node(node) => Box::new([*node]),
        };
        tracing::debug!(%locator, nodes = nodes.len(), "resolved selection");
        Ok(Self { nodes })
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn first(&self) -> Option<NodeId> {
        self.nodes.first().copied()
    }

    pub fn get(&self, index: usize) -> Option<NodeId> {
        self.nodes.get(index).copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.nodes.iter().copied()
    }

    pub fn as_slice(&self) -> &[NodeId] {
        &self.nodes
    }
}

impl<'a> IntoIterator for &'a Selection {
    type Item = NodeId;
    type IntoIter = std::iter::Copied<std::slice::Iter<'a, NodeId>>;

    fn into_iter(self) -> Self::IntoIter {
        self.nodes.iter().copied()
    }
}
