//! Identifier allocation for tree nodes.

use crate::domain::error::{DomainError, DomainResult};

/// Identifier of a row or group, unique within one builder.
pub type NodeId = u64;

/// Hands out strictly increasing node ids.
///
/// Owned by a single builder; two builders in one process count independently.
#[derive(Debug, Clone, Default)]
pub struct IdAllocator {
    next: NodeId,
}

impl IdAllocator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Allocator that resumes at `first`, used when seeding from an existing tree.
    pub fn starting_at(first: NodeId) -> Self {
        Self { next: first }
    }

    /// Allocator that resumes after `last`; fails when `last` is the final id.
    pub fn after(last: NodeId) -> DomainResult<Self> {
        last.checked_add(1)
            .map(Self::starting_at)
            .ok_or(DomainError::IdSpaceExhausted)
    }

    /// Returns a fresh id and advances the counter.
    ///
    /// The counter never wraps: once it cannot advance, every call fails and no id is
    /// handed out twice.
    #[allow(clippy::should_implement_trait)]
    pub fn next(&mut self) -> DomainResult<NodeId> {
        let id = self.next;
        self.next = id.checked_add(1).ok_or(DomainError::IdSpaceExhausted)?;
        Ok(id)
    }

    /// The id the next call to [`IdAllocator::next`] will return.
    pub fn peek(&self) -> NodeId {
        self.next
    }
}
