//! Query errors

use fos_dom::NodeId;

use crate::HostError;

/// A per-node rejection during a pass over a selection
#[derive(Debug, thiserror::Error)]
#[error("node {node} (index {index}): {error}")]
pub struct NodeFailure {
    /// Position in the selection
    pub index: usize,
    pub node: NodeId,
    #[source]
    pub error: HostError,
}

/// Wrapper operation errors
#[derive(Debug, thiserror::Error)]
pub enum QueryError {
    /// Rejected by the host outside any per-node pass, e.g. a malformed
    /// locator or delegation selector
    #[error(transparent)]
    Host(#[from] HostError),

    /// Accessor called on a wrapper that selected nothing
    #[error("{operation}: selection is empty")]
    EmptySelection { operation: &'static str },

    /// The pass completed but some nodes rejected the operation
    #[error("{operation}: {} of the selected nodes failed", .failures.len())]
    Partial {
        operation: &'static str,
        failures: Vec<NodeFailure>,
    },

    /// The pass stopped at the first rejection
    #[error("{operation} aborted at {failure}")]
    Aborted {
        operation: &'static str,
        failure: NodeFailure,
    },
}

impl QueryError {
    /// Per-node failures carried by this error
    pub fn failures(&self) -> &[NodeFailure] {
        match self {
            Self::Partial { failures, .. } => failures,
            Self::Aborted { failure, .. } => std::slice::from_ref(failure),
            Self::Host(_) | Self::EmptySelection { .. } => &[],
        }
    }
}
