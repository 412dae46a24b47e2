//! Application layer: interactive sessions
//!
//! This layer drives the domain builder from text commands.

pub mod error;
pub mod error_ext;
pub mod session;

pub use error::{ApplicationError, ApplicationResult};
pub use error_ext::IoResultExt;
pub use session::{Outcome, Session, SessionCommand, HELP};
