//! Interactive builder for nested AND/OR filter expressions.
//!
//! The [`domain`] layer holds the tree and its mutations: inserting a row next to a node
//! (splitting into a subgroup when the connective differs), removing a node, and
//! renormalizing so no group outlives its second child. [`application`] drives a builder
//! from text commands and [`cli`] hosts it in the terminal.
//!
//! ```
//! use filtree::domain::{FilterBuilder, Operator};
//!
//! let mut builder = FilterBuilder::new(vec!["name".into()]);
//! let second = builder.insert_adjacent(1, 0, Operator::And)?;
//! builder.insert_adjacent(second, 0, Operator::Or)?;
//! assert_eq!(builder.row_count(), 3);
//! # Ok::<(), filtree::domain::DomainError>(())
//! ```

pub mod application;
pub mod cli;
pub mod config;
pub mod domain;
pub mod exitcode;
pub mod util;
