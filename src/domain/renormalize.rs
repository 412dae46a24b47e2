//! Post-mutation cleanup that removes redundant single-child groups.

use tracing::{instrument, trace};

use crate::domain::node::{Group, Node};

/// Collapses every group left with fewer than two children.
///
/// Nested groups with a single child are replaced in place by that child: a row is
/// promoted into the grandparent, a group is hoisted and keeps its own id. Empty groups
/// are dropped. The root keeps its id; while its only child is a group it adopts that
/// group's operator and children. A root holding a single row is the minimal valid tree
/// and stays as it is.
#[instrument(level = "trace", skip(root), fields(root = root.id))]
pub fn renormalize<R>(root: &mut Group<R>) {
    collapse_children(root);

    while let [Node::Group(_)] = root.children.as_slice() {
        if let Some(Node::Group(inner)) = root.children.pop() {
            trace!(root = root.id, inner = inner.id, "root adopts inner group");
            root.operator = inner.operator;
            root.children = inner.children;
        }
    }
}

/// Bottom-up sweep: children are normalized before their parent inspects them, so a
/// single pass reaches the fixpoint below the root.
fn collapse_children<R>(group: &mut Group<R>) {
    let children = std::mem::take(&mut group.children);
    group.children = children
        .into_iter()
        .filter_map(|child| match child {
            Node::Row(_) => Some(child),
            Node::Group(mut inner) => {
                collapse_children(&mut inner);
                match inner.children.len() {
                    0 => {
                        trace!(group = inner.id, "dropping empty group");
                        None
                    }
                    1 => {
                        let sole = inner.children.pop();
                        trace!(group = inner.id, into = group.id, "collapsing single-child group");
                        sole
                    }
                    _ => Some(Node::Group(inner)),
                }
            }
        })
        .collect();
}
