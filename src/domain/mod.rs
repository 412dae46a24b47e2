//! Domain layer: the expression tree and its mutations
//!
//! This layer is independent of external concerns (no I/O, no CLI, no config loading).

pub mod attribute;
pub mod builder;
pub mod error;
pub mod filter;
pub mod ids;
pub mod node;
pub mod presenter;
pub mod renormalize;

pub use attribute::AttributeRow;
pub use builder::{AttributeBuilder, ExpressionBuilder, FilterBuilder, RemoveOutcome};
pub use error::{DomainError, DomainResult};
pub use filter::{FilterRow, Predicate, SearchType};
pub use ids::{IdAllocator, NodeId};
pub use node::{Group, Node, Operator, Row, RowData};
pub use presenter::{
    actions_for, present, Action, ActionOutcome, GroupControls, Presenter, RowControls,
};
pub use renormalize::renormalize;
