//! Application-level errors (wraps domain errors)

use thiserror::Error;

use crate::domain::{DomainError, NodeId};

/// Application errors wrap domain errors and add session-level context.
#[derive(Error, Debug)]
pub enum ApplicationError {
    #[error("{0}")]
    Domain(#[from] DomainError),

    #[error("no node with id #{0}")]
    UnknownNode(NodeId),

    #[error("cannot parse '{line}': {reason}")]
    Parse { line: String, reason: String },

    #[error("config error: {message}")]
    Config { message: String },

    #[error("operation failed: {context}")]
    OperationFailed {
        context: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
}

/// Result type for application layer operations.
pub type ApplicationResult<T> = Result<T, ApplicationError>;
