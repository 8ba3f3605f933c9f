//! DOM Operation Errors
//!
//! Rejections raised by the native per-node primitives.

use crate::NodeId;

/// Result type for DOM operations
pub type DomResult<T> = Result<T, DomError>;

/// DOM operation errors
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DomError {
    /// Stale or null node reference
    #[error("node {0} not found")]
    NotFound(NodeId),

    /// Hierarchy error (e.g., inserting an ancestor into its descendant)
    #[error("hierarchy request error")]
    HierarchyRequest,

    /// Element-only operation applied to another node kind
    #[error("node {0} is not an element")]
    InvalidNodeType(NodeId),

    /// Reference node is not a child of the given parent
    #[error("node is not a child")]
    NotAChild,

    /// Selector could not be parsed
    #[error("invalid selector '{selector}': {reason}")]
    InvalidSelector { selector: String, reason: String },

    /// Dataset key that has no attribute form
    #[error("invalid dataset key '{0}'")]
    InvalidDataKey(String),

    /// Empty or whitespace-carrying class token, or a malformed attribute name
    #[error("invalid token '{0}'")]
    InvalidToken(String),

    /// Inline style value that would not read back as one declaration
    #[error("invalid value '{value}' for style property '{property}'")]
    InvalidStyleValue { property: String, value: String },
}

impl DomError {
    pub(crate) fn invalid_selector(selector: &str, reason: impl Into<String>) -> Self {
        Self::InvalidSelector {
            selector: selector.to_string(),
            reason: reason.into(),
        }
    }
}
