//! Expression builder: owns the tree and applies the interactive mutations.
//!
//! Every mutation runs to completion, renormalizes the whole tree and then notifies the
//! change listeners. Nodes are addressed by id and the containing group is always passed
//! explicitly, mirroring how a view hands back the node it rendered together with its
//! parent.

use std::collections::HashSet;
use std::fmt;

use tracing::{debug, instrument};

use crate::domain::attribute::AttributeRow;
use crate::domain::error::{DomainError, DomainResult};
use crate::domain::filter::FilterRow;
use crate::domain::ids::{IdAllocator, NodeId};
use crate::domain::node::{Group, Node, Operator, Row, RowData};
use crate::domain::presenter::{Action, ActionOutcome};
use crate::domain::renormalize::renormalize;

/// Builder for filter expressions.
pub type FilterBuilder = ExpressionBuilder<FilterRow>;

/// Builder for managed attribute selections.
pub type AttributeBuilder = ExpressionBuilder<AttributeRow>;

/// Callback fired with the current tree after every completed mutation.
pub type ChangeListener<R> = Box<dyn FnMut(&Group<R>)>;

/// Result of a removal request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RemoveOutcome {
    Removed,
    /// The removal would have left the tree without a row; nothing changed.
    Refused,
}

/// Interactive builder of a nested AND/OR tree of rows.
pub struct ExpressionBuilder<R: RowData> {
    root: Group<R>,
    ids: IdAllocator,
    attributes: Vec<String>,
    listeners: Vec<ChangeListener<R>>,
}

impl<R: RowData> fmt::Debug for ExpressionBuilder<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ExpressionBuilder")
            .field("root", &self.root)
            .field("next_id", &self.ids.peek())
            .field("attributes", &self.attributes)
            .field("listeners", &self.listeners.len())
            .finish()
    }
}

impl<R: RowData> ExpressionBuilder<R> {
    /// Builder in its initial state: an AND root holding one blank row.
    ///
    /// The root takes id 0 and the row id 1.
    pub fn new(attributes: Vec<String>) -> Self {
        let row = Row {
            id: 1,
            data: R::blank(default_attribute(&attributes)),
        };
        Self {
            root: Group::new(0, Operator::And, vec![Node::Row(row)]),
            ids: IdAllocator::starting_at(2),
            attributes,
            listeners: Vec::new(),
        }
    }

    /// Builder seeded with an existing tree.
    ///
    /// Ids must be unique and the tree must hold at least one row. The seeded tree is
    /// renormalized and new ids continue after the highest existing one, which therefore
    /// must not be the last representable id.
    pub fn with_root(attributes: Vec<String>, mut root: Group<R>) -> DomainResult<Self> {
        let mut seen = HashSet::new();
        for id in root.ids() {
            if !seen.insert(id) {
                return Err(DomainError::DuplicateId(id));
            }
        }
        if root.row_count() == 0 {
            return Err(DomainError::NoRows);
        }
        let ids = match seen.into_iter().max() {
            Some(max) => IdAllocator::after(max)?,
            None => IdAllocator::new(),
        };
        renormalize(&mut root);

        Ok(Self {
            root,
            ids,
            attributes,
            listeners: Vec::new(),
        })
    }

    fn initial_root(&mut self) -> DomainResult<Group<R>> {
        let id = self.ids.next()?;
        let row = self.blank_row()?;
        Ok(Group::new(id, Operator::And, vec![Node::Row(row)]))
    }

    fn blank_row(&mut self) -> DomainResult<Row<R>> {
        Ok(Row {
            id: self.ids.next()?,
            data: R::blank(default_attribute(&self.attributes)),
        })
    }

    pub fn root(&self) -> &Group<R> {
        &self.root
    }

    pub fn attributes(&self) -> &[String] {
        &self.attributes
    }

    /// Attribute preset on new rows: the first configured one, or blank.
    pub fn default_attribute(&self) -> &str {
        default_attribute(&self.attributes)
    }

    pub fn find(&self, id: NodeId) -> Option<&Node<R>> {
        self.root.find(id)
    }

    /// The group containing `id`. The root is reported as its own parent, matching how
    /// the root group's controls are wired.
    pub fn parent_of(&self, id: NodeId) -> Option<&Group<R>> {
        if id == self.root.id {
            return Some(&self.root);
        }
        self.root.parent_of(id)
    }

    pub fn row_count(&self) -> usize {
        self.root.row_count()
    }

    /// Whether any row may be removed, i.e. more than one row exists.
    pub fn has_removable_rows(&self) -> bool {
        self.row_count() > 1
    }

    /// The id the next allocated node will receive.
    pub fn next_id(&self) -> NodeId {
        self.ids.peek()
    }

    /// Registers a listener notified after every completed mutation.
    pub fn subscribe(&mut self, listener: impl FnMut(&Group<R>) + 'static) {
        self.listeners.push(Box::new(listener));
    }

    fn notify(&mut self) {
        debug!(tree = %self.root.outline(), "mutation complete");
        let root = &self.root;
        for listener in self.listeners.iter_mut() {
            listener(root);
        }
    }

    /// Adds a blank row next to `after`, which must be a direct child of `parent`.
    ///
    /// With the parent's own operator the row is inserted right after `after`. With the
    /// other operator `after` is replaced by a new group `{operator, [after, row]}`.
    /// When `after` is the root, the row is appended to the root or the whole tree is
    /// wrapped in a new root group. Returns the new row's id.
    #[instrument(level = "debug", skip(self))]
    pub fn insert_adjacent(
        &mut self,
        after: NodeId,
        parent: NodeId,
        operator: Operator,
    ) -> DomainResult<NodeId> {
        let row_id = if after == self.root.id {
            if parent != self.root.id {
                return Err(DomainError::NodeNotFound {
                    node: after,
                    parent,
                });
            }
            self.insert_at_root(operator)?
        } else {
            self.insert_in_group(after, parent, operator)?
        };

        renormalize(&mut self.root);
        self.notify();
        Ok(row_id)
    }

    fn insert_at_root(&mut self, operator: Operator) -> DomainResult<NodeId> {
        let row = self.blank_row()?;
        let row_id = row.id;
        if operator == self.root.operator {
            self.root.children.push(Node::Row(row));
        } else {
            let wrapper = Group::new(self.ids.next()?, operator, Vec::new());
            let old_root = std::mem::replace(&mut self.root, wrapper);
            debug!(old_root = old_root.id, new_root = self.root.id, "wrapping root");
            self.root.children = vec![Node::Group(old_root), Node::Row(row)];
        }
        Ok(row_id)
    }

    fn insert_in_group(
        &mut self,
        after: NodeId,
        parent: NodeId,
        operator: Operator,
    ) -> DomainResult<NodeId> {
        let default_attribute = default_attribute(&self.attributes);
        let ids = &mut self.ids;
        let group = self
            .root
            .find_group_mut(parent)
            .ok_or(DomainError::GroupNotFound(parent))?;
        let index = group
            .position_of(after)
            .ok_or(DomainError::NodeNotFound {
                node: after,
                parent,
            })?;

        let row = Row {
            id: ids.next()?,
            data: R::blank(default_attribute),
        };
        let row_id = row.id;

        if operator == group.operator {
            group.children.insert(index + 1, Node::Row(row));
        } else {
            let split = ids.next()?;
            debug!(node = after, group = split, %operator, "splitting into subgroup");
            let demoted = group.children.remove(index);
            group.children.insert(
                index,
                Node::Group(Group::new(split, operator, vec![demoted, Node::Row(row)])),
            );
        }
        Ok(row_id)
    }

    /// Deletes `node` from `parent` and renormalizes the tree.
    ///
    /// Refused when the tree would be left without a row: `node` is the last row or
    /// contains every row, as the root does. The root's only valid parent is itself.
    #[instrument(level = "debug", skip(self))]
    pub fn remove(&mut self, node: NodeId, parent: NodeId) -> DomainResult<RemoveOutcome> {
        if node == self.root.id {
            if parent != self.root.id {
                return Err(match self.root.find_group(parent) {
                    Some(_) => DomainError::NodeNotFound { node, parent },
                    None => DomainError::GroupNotFound(parent),
                });
            }
            debug!(node = node, "refusing to remove the root group");
            return Ok(RemoveOutcome::Refused);
        }

        let total = self.root.row_count();
        let group = self
            .root
            .find_group_mut(parent)
            .ok_or(DomainError::GroupNotFound(parent))?;
        let index = group
            .position_of(node)
            .ok_or(DomainError::NodeNotFound { node, parent })?;

        if group.children[index].row_count() >= total {
            debug!(node = node, "refusing to remove the last row");
            return Ok(RemoveOutcome::Refused);
        }
        group.children.remove(index);

        renormalize(&mut self.root);
        self.notify();
        Ok(RemoveOutcome::Removed)
    }

    /// Edits one field of a row's payload.
    ///
    /// When attributes are configured, the row's attribute must stay one of them.
    #[instrument(level = "debug", skip(self))]
    pub fn update_row(&mut self, id: NodeId, field: &str, value: &str) -> DomainResult<()> {
        let attributes = &self.attributes;
        let row = self
            .root
            .find_row_mut(id)
            .ok_or(DomainError::RowNotFound(id))?;

        let mut data = row.data.clone();
        data.set_field(field, value)?;
        if !attributes.is_empty() && !attributes.iter().any(|a| a == data.attribute()) {
            return Err(DomainError::UnknownAttribute(data.attribute().to_string()));
        }
        row.data = data;

        self.notify();
        Ok(())
    }

    /// Restores the initial state. Ids keep counting from where they were.
    #[instrument(level = "debug", skip(self))]
    pub fn reset(&mut self) -> DomainResult<()> {
        self.root = self.initial_root()?;
        self.notify();
        Ok(())
    }

    /// Routes a view action to the matching mutation.
    pub fn dispatch(&mut self, action: Action) -> DomainResult<ActionOutcome> {
        match action {
            Action::And { node, parent } => self
                .insert_adjacent(node, parent, Operator::And)
                .map(ActionOutcome::Inserted),
            Action::Or { node, parent } => self
                .insert_adjacent(node, parent, Operator::Or)
                .map(ActionOutcome::Inserted),
            Action::Remove { node, parent } => {
                self.remove(node, parent).map(|outcome| match outcome {
                    RemoveOutcome::Removed => ActionOutcome::Removed,
                    RemoveOutcome::Refused => ActionOutcome::Refused,
                })
            }
        }
    }
}

fn default_attribute(attributes: &[String]) -> &str {
    attributes.first().map(String::as_str).unwrap_or("")
}
