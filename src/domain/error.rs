//! Domain-level errors (no external dependencies)

use thiserror::Error;

use crate::domain::ids::NodeId;

/// Domain errors represent violations of the tree's structural contract.
/// They signal caller/view desynchronization or invalid payload edits.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("node #{node} is not a child of group #{parent}")]
    NodeNotFound { node: NodeId, parent: NodeId },

    #[error("group not found: #{0}")]
    GroupNotFound(NodeId),

    #[error("row not found: #{0}")]
    RowNotFound(NodeId),

    #[error("duplicate node id: #{0}")]
    DuplicateId(NodeId),

    #[error("tree contains no rows")]
    NoRows,

    #[error("no node ids left to allocate")]
    IdSpaceExhausted,

    #[error("unknown row field: {field}")]
    UnknownField { field: String },

    #[error("invalid value for {field}: {value}")]
    InvalidValue { field: String, value: String },

    #[error("unknown attribute: {0}")]
    UnknownAttribute(String),
}

/// Result type for domain operations.
pub type DomainResult<T> = Result<T, DomainError>;
