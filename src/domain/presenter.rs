//! Presenter contract: the boundary between the tree and whatever renders it.
//!
//! A view walks the tree through [`present`], receiving each node together with the id of
//! its parent group and the controls it should offer. Clicks come back as [`Action`]s and
//! are applied with [`ExpressionBuilder::dispatch`].

use crate::domain::builder::ExpressionBuilder;
use crate::domain::ids::NodeId;
use crate::domain::node::{Group, Node, Row, RowData};

/// A click on one of a node's controls.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    And { node: NodeId, parent: NodeId },
    Or { node: NodeId, parent: NodeId },
    Remove { node: NodeId, parent: NodeId },
}

/// What a dispatched action did to the tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionOutcome {
    /// A row was added; carries its id.
    Inserted(NodeId),
    Removed,
    Refused,
}

/// Controls shown next to a row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RowControls {
    pub show_and_or: bool,
    /// False while this is the only row in the tree.
    pub show_remove: bool,
}

/// Controls shown on a group.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GroupControls {
    pub is_root: bool,
    /// Hidden on a root that only holds a single row.
    pub show_and_or: bool,
    /// The root group can never be removed.
    pub show_remove: bool,
}

/// Receives the tree in depth-first document order.
pub trait Presenter<R> {
    fn enter_group(&mut self, group: &Group<R>, parent: NodeId, controls: GroupControls);

    fn row(&mut self, row: &Row<R>, parent: NodeId, controls: RowControls);

    fn exit_group(&mut self, _group: &Group<R>) {}
}

/// Walks the builder's tree, deriving every control flag from the tree alone.
pub fn present<R: RowData>(builder: &ExpressionBuilder<R>, presenter: &mut impl Presenter<R>) {
    let root = builder.root();
    let row_controls = RowControls {
        show_and_or: true,
        show_remove: builder.has_removable_rows(),
    };
    walk(root, root.id, root.id, row_controls, presenter);
}

fn walk<R>(
    group: &Group<R>,
    parent: NodeId,
    root: NodeId,
    row_controls: RowControls,
    presenter: &mut impl Presenter<R>,
) {
    let is_root = group.id == root;
    presenter.enter_group(
        group,
        parent,
        GroupControls {
            is_root,
            show_and_or: !(is_root && group.children.len() == 1),
            show_remove: !is_root,
        },
    );
    for child in &group.children {
        match child {
            Node::Row(row) => presenter.row(row, group.id, row_controls),
            Node::Group(inner) => walk(inner, group.id, root, row_controls, presenter),
        }
    }
    presenter.exit_group(group);
}

/// Actions available on a node, given the controls shown for it.
pub fn actions_for(
    node: NodeId,
    parent: NodeId,
    show_and_or: bool,
    show_remove: bool,
) -> Vec<Action> {
    let mut actions = Vec::new();
    if show_and_or {
        actions.push(Action::And { node, parent });
        actions.push(Action::Or { node, parent });
    }
    if show_remove {
        actions.push(Action::Remove { node, parent });
    }
    actions
}
