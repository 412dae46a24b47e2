//! CLI-level errors (wraps application errors)

use thiserror::Error;

use crate::application::ApplicationError;
use crate::domain::DomainError;

/// CLI errors are the top-level error type.
/// These are what get displayed to the user.
#[derive(Error, Debug)]
pub enum CliError {
    #[error("{0}")]
    Application(#[from] ApplicationError),

    #[error("I/O error: {context}")]
    Io {
        context: String,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid arguments: {0}")]
    InvalidArgs(String),

    #[error("{0}")]
    Usage(String),
}

/// Result type for CLI operations.
pub type CliResult<T> = Result<T, CliError>;

impl CliError {
    /// Create an I/O error with context.
    pub fn io(context: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            context: context.into(),
            source,
        }
    }

    /// Get the appropriate exit code for this error.
    pub fn exit_code(&self) -> i32 {
        match self {
            CliError::InvalidArgs(_) | CliError::Usage(_) => crate::exitcode::USAGE,
            CliError::Io { .. } => crate::exitcode::IOERR,
            CliError::Application(e) => match e {
                ApplicationError::Config { .. } => crate::exitcode::CONFIG,
                ApplicationError::Parse { .. } => crate::exitcode::DATAERR,
                ApplicationError::OperationFailed { .. } => crate::exitcode::NOINPUT,
                ApplicationError::UnknownNode(_) => crate::exitcode::DATAERR,
                ApplicationError::Domain(DomainError::NodeNotFound { .. })
                | ApplicationError::Domain(DomainError::GroupNotFound(_)) => {
                    crate::exitcode::SOFTWARE
                }
                ApplicationError::Domain(_) => crate::exitcode::DATAERR,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn given_errors_when_mapping_exit_codes_then_follow_sysexits() {
        assert_eq!(CliError::Usage("x".into()).exit_code(), crate::exitcode::USAGE);
        let config = CliError::from(ApplicationError::Config {
            message: "bad".into(),
        });
        assert_eq!(config.exit_code(), crate::exitcode::CONFIG);
        let desync = CliError::from(ApplicationError::from(DomainError::NodeNotFound {
            node: 3,
            parent: 0,
        }));
        assert_eq!(desync.exit_code(), crate::exitcode::SOFTWARE);
        assert_eq!(desync.to_string(), "node #3 is not a child of group #0");
    }
}
