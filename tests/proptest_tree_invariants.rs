//! Property-based tests for the structural invariants of the expression tree.
//!
//! Random sequences of AND/OR insertions and removals, each aimed at a node picked from
//! the current tree, must always leave a tree where:
//!
//! 1. **Rows exist**: at least one row, and the row count moves by exactly one per
//!    successful operation.
//! 2. **No redundant groups**: every non-root group has at least two children, and a
//!    root with a single child holds a row.
//! 3. **Unique ids**: no id occurs twice, and new ids are never reused.
//! 4. **Stable normal form**: renormalizing the result again changes nothing.

use std::collections::HashSet;

use filtree::domain::{
    renormalize, FilterBuilder, FilterRow, Group, Node, NodeId, Operator, RemoveOutcome,
};
use proptest::prelude::*;

// ── Operations ──────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy)]
enum Op {
    Insert { pick: usize, operator: Operator },
    Remove { pick: usize },
}

fn op_strategy() -> impl Strategy<Value = Op> {
    let operator = prop_oneof![Just(Operator::And), Just(Operator::Or)];
    prop_oneof![
        3 => (any::<usize>(), operator).prop_map(|(pick, operator)| Op::Insert { pick, operator }),
        2 => any::<usize>().prop_map(|pick| Op::Remove { pick }),
    ]
}

/// Every addressable node with its parent, the root paired with itself.
fn targets(builder: &FilterBuilder) -> Vec<(NodeId, NodeId)> {
    let root = builder.root();
    std::iter::once((root.id, root.id))
        .chain(root.descendants().filter_map(|node| {
            builder
                .parent_of(node.id())
                .map(|parent| (node.id(), parent.id))
        }))
        .collect()
}

// ── Invariant checks ────────────────────────────────────────────────────

fn assert_no_redundant_groups(
    group: &Group<FilterRow>,
    is_root: bool,
) -> Result<(), TestCaseError> {
    if is_root {
        prop_assert!(!group.children.is_empty(), "root must not be empty");
        if group.children.len() == 1 {
            prop_assert!(
                group.children[0].is_row(),
                "single child of root #{} must be a row",
                group.id
            );
        }
    } else {
        prop_assert!(
            group.children.len() >= 2,
            "group #{} has {} children",
            group.id,
            group.children.len()
        );
    }
    for child in &group.children {
        if let Node::Group(inner) = child {
            assert_no_redundant_groups(inner, false)?;
        }
    }
    Ok(())
}

fn assert_unique_ids(group: &Group<FilterRow>) -> Result<(), TestCaseError> {
    let ids = group.ids();
    let unique: HashSet<_> = ids.iter().copied().collect();
    prop_assert_eq!(unique.len(), ids.len(), "duplicate ids in {:?}", ids);
    Ok(())
}

fn apply(builder: &mut FilterBuilder, op: Op) -> Result<(), TestCaseError> {
    let targets = targets(builder);
    let before = builder.row_count();

    match op {
        Op::Insert { pick, operator } => {
            let (node, parent) = targets[pick % targets.len()];
            let next = builder.next_id();
            let id = builder
                .insert_adjacent(node, parent, operator)
                .map_err(|e| TestCaseError::fail(e.to_string()))?;
            prop_assert!(id >= next, "id {} reused, next was {}", id, next);
            prop_assert_eq!(builder.row_count(), before + 1);
            prop_assert!(builder.find(id).is_some_and(Node::is_row));
        }
        Op::Remove { pick } => {
            let (node, parent) = targets[pick % targets.len()];
            let outcome = builder
                .remove(node, parent)
                .map_err(|e| TestCaseError::fail(e.to_string()))?;
            match outcome {
                RemoveOutcome::Removed => {
                    prop_assert!(builder.row_count() < before);
                    prop_assert!(builder.find(node).is_none());
                }
                RemoveOutcome::Refused => prop_assert_eq!(builder.row_count(), before),
            }
        }
    }
    Ok(())
}

// ── Properties ──────────────────────────────────────────────────────────

proptest! {
    #[test]
    fn tree_stays_normalized_after_any_edit_sequence(
        ops in prop::collection::vec(op_strategy(), 0..200),
    ) {
        let mut builder = FilterBuilder::new(vec!["name".into()]);
        for op in ops {
            apply(&mut builder, op)?;
            prop_assert!(builder.row_count() >= 1, "tree lost its last row");
            assert_no_redundant_groups(builder.root(), true)?;
            assert_unique_ids(builder.root())?;
        }
    }

    #[test]
    fn renormalize_is_idempotent(
        ops in prop::collection::vec(op_strategy(), 0..100),
    ) {
        let mut builder = FilterBuilder::new(vec!["name".into()]);
        for op in ops {
            apply(&mut builder, op)?;
        }
        let mut again = builder.root().clone();
        renormalize(&mut again);
        prop_assert_eq!(&again, builder.root());
    }

    #[test]
    fn removing_any_node_but_the_root_keeps_at_least_one_row(
        ops in prop::collection::vec(op_strategy(), 1..100),
        pick in any::<usize>(),
    ) {
        let mut builder = FilterBuilder::new(vec!["name".into()]);
        for op in ops {
            apply(&mut builder, op)?;
        }
        let targets = targets(&builder);
        let (node, parent) = targets[pick % targets.len()];
        let covers_all = builder
            .find(node)
            .map_or(true, |n| n.row_count() == builder.row_count());

        let outcome = builder.remove(node, parent);

        if covers_all {
            prop_assert_eq!(outcome, Ok(RemoveOutcome::Refused));
        } else {
            prop_assert_eq!(outcome, Ok(RemoveOutcome::Removed));
        }
        prop_assert!(builder.row_count() >= 1);
    }
}
