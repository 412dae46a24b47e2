//! Node model: rows (leaf predicates) and groups (AND/OR combinations).
//!
//! The tree is a pure ownership hierarchy. A group owns its children exclusively and
//! nodes carry no parent reference; callers thread the parent id explicitly.

use std::fmt;

use crate::domain::error::DomainResult;
use crate::domain::ids::NodeId;

/// Boolean connective combining all direct children of a group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operator {
    And,
    Or,
}

impl Operator {
    /// The other connective.
    pub fn toggled(self) -> Self {
        match self {
            Operator::And => Operator::Or,
            Operator::Or => Operator::And,
        }
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Operator::And => write!(f, "AND"),
            Operator::Or => write!(f, "OR"),
        }
    }
}

/// Payload carried by a row.
///
/// Implemented by [`FilterRow`](crate::domain::FilterRow) for the filter builder and by
/// [`AttributeRow`](crate::domain::AttributeRow) for managed attribute selection.
pub trait RowData: Clone + fmt::Debug + fmt::Display + PartialEq {
    /// A blank row preset to `default_attribute`.
    fn blank(default_attribute: &str) -> Self;

    /// Name of the selected attribute.
    fn attribute(&self) -> &str;

    /// Edit one field by name, e.g. `value` or `predicate`.
    fn set_field(&mut self, field: &str, value: &str) -> DomainResult<()>;
}

/// Leaf node: one concrete predicate.
#[derive(Debug, Clone, PartialEq)]
pub struct Row<R> {
    pub id: NodeId,
    pub data: R,
}

/// Internal node: children combined with a single operator.
#[derive(Debug, Clone, PartialEq)]
pub struct Group<R> {
    pub id: NodeId,
    pub operator: Operator,
    pub children: Vec<Node<R>>,
}

/// A node of the expression tree.
#[derive(Debug, Clone, PartialEq)]
pub enum Node<R> {
    Row(Row<R>),
    Group(Group<R>),
}

impl<R> Node<R> {
    pub fn id(&self) -> NodeId {
        match self {
            Node::Row(row) => row.id,
            Node::Group(group) => group.id,
        }
    }

    pub fn as_row(&self) -> Option<&Row<R>> {
        match self {
            Node::Row(row) => Some(row),
            Node::Group(_) => None,
        }
    }

    pub fn as_group(&self) -> Option<&Group<R>> {
        match self {
            Node::Row(_) => None,
            Node::Group(group) => Some(group),
        }
    }

    pub fn is_row(&self) -> bool {
        matches!(self, Node::Row(_))
    }

    /// Number of rows in this subtree.
    pub fn row_count(&self) -> usize {
        match self {
            Node::Row(_) => 1,
            Node::Group(group) => group.row_count(),
        }
    }
}

impl<R> Group<R> {
    pub fn new(id: NodeId, operator: Operator, children: Vec<Node<R>>) -> Self {
        Self {
            id,
            operator,
            children,
        }
    }

    /// Number of rows anywhere below this group.
    pub fn row_count(&self) -> usize {
        self.children.iter().map(Node::row_count).sum()
    }

    /// Number of nodes in this subtree, the group itself included.
    pub fn node_count(&self) -> usize {
        1 + self
            .children
            .iter()
            .map(|child| match child {
                Node::Row(_) => 1,
                Node::Group(group) => group.node_count(),
            })
            .sum::<usize>()
    }

    /// Levels of nesting, counting this group as 1 and rows as one more level.
    pub fn depth(&self) -> usize {
        1 + self
            .children
            .iter()
            .map(|child| match child {
                Node::Row(_) => 1,
                Node::Group(group) => group.depth(),
            })
            .max()
            .unwrap_or(0)
    }

    /// Index of a direct child.
    pub fn position_of(&self, child: NodeId) -> Option<usize> {
        self.children.iter().position(|c| c.id() == child)
    }

    /// Pre-order iterator over all nodes below this group, in document order.
    pub fn descendants(&self) -> Descendants<'_, R> {
        Descendants::new(self)
    }

    /// All rows below this group in document order.
    pub fn rows(&self) -> impl Iterator<Item = &Row<R>> {
        self.descendants().filter_map(Node::as_row)
    }

    /// Ids of this group and every node below it.
    pub fn ids(&self) -> Vec<NodeId> {
        std::iter::once(self.id)
            .chain(self.descendants().map(Node::id))
            .collect()
    }

    /// Finds a node strictly below this group.
    pub fn find(&self, id: NodeId) -> Option<&Node<R>> {
        self.descendants().find(|node| node.id() == id)
    }

    /// Finds a group by id, this group included.
    pub fn find_group(&self, id: NodeId) -> Option<&Group<R>> {
        if self.id == id {
            return Some(self);
        }
        self.descendants()
            .filter_map(Node::as_group)
            .find(|group| group.id == id)
    }

    pub fn find_group_mut(&mut self, id: NodeId) -> Option<&mut Group<R>> {
        if self.id == id {
            return Some(self);
        }
        self.children.iter_mut().find_map(|child| match child {
            Node::Group(group) => group.find_group_mut(id),
            Node::Row(_) => None,
        })
    }

    pub fn find_row_mut(&mut self, id: NodeId) -> Option<&mut Row<R>> {
        self.children.iter_mut().find_map(|child| match child {
            Node::Row(row) if row.id == id => Some(row),
            Node::Row(_) => None,
            Node::Group(group) => group.find_row_mut(id),
        })
    }

    /// Compact structure of the subtree, e.g. `AND#0[#1, OR#4[#2, #3]]`.
    pub fn outline(&self) -> String {
        let children: Vec<String> = self
            .children
            .iter()
            .map(|child| match child {
                Node::Row(row) => format!("#{}", row.id),
                Node::Group(group) => group.outline(),
            })
            .collect();
        format!("{}#{}[{}]", self.operator, self.id, children.join(", "))
    }

    /// The group directly containing `id`, if `id` lies below this group.
    pub fn parent_of(&self, id: NodeId) -> Option<&Group<R>> {
        if self.position_of(id).is_some() {
            return Some(self);
        }
        self.children
            .iter()
            .filter_map(Node::as_group)
            .find_map(|group| group.parent_of(id))
    }
}

/// Depth-first, left-to-right traversal over the nodes below a group.
pub struct Descendants<'a, R> {
    stack: Vec<&'a Node<R>>,
}

impl<'a, R> Descendants<'a, R> {
    fn new(group: &'a Group<R>) -> Self {
        Self {
            stack: group.children.iter().rev().collect(),
        }
    }
}

impl<'a, R> Iterator for Descendants<'a, R> {
    type Item = &'a Node<R>;

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.stack.pop()?;
        if let Node::Group(group) = current {
            // Push children in reverse order for left-to-right traversal
            self.stack.extend(group.children.iter().rev());
        }
        Some(current)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(id: NodeId) -> Node<&'static str> {
        Node::Row(Row { id, data: "x" })
    }

    // AND#0 [ row1, OR#4 [ row2, row3 ] ]
    fn sample() -> Group<&'static str> {
        Group::new(
            0,
            Operator::And,
            vec![
                row(1),
                Node::Group(Group::new(4, Operator::Or, vec![row(2), row(3)])),
            ],
        )
    }

    #[test]
    fn given_nested_group_when_counting_then_counts_rows_and_nodes() {
        let tree = sample();
        assert_eq!(tree.row_count(), 3);
        assert_eq!(tree.node_count(), 5);
        assert_eq!(tree.depth(), 3);
    }

    #[test]
    fn given_nested_group_when_iterating_then_yields_document_order() {
        let tree = sample();
        let ids: Vec<_> = tree.descendants().map(Node::id).collect();
        assert_eq!(ids, vec![1, 4, 2, 3]);
        let rows: Vec<_> = tree.rows().map(|r| r.id).collect();
        assert_eq!(rows, vec![1, 2, 3]);
        assert_eq!(tree.ids(), vec![0, 1, 4, 2, 3]);
        assert_eq!(tree.outline(), "AND#0[#1, OR#4[#2, #3]]");
    }

    #[test]
    fn given_nested_group_when_looking_up_parent_then_returns_direct_container() {
        let tree = sample();
        assert_eq!(tree.parent_of(1).map(|g| g.id), Some(0));
        assert_eq!(tree.parent_of(3).map(|g| g.id), Some(4));
        assert_eq!(tree.parent_of(4).map(|g| g.id), Some(0));
        assert!(tree.parent_of(0).is_none());
        assert!(tree.parent_of(99).is_none());
    }

    #[test]
    fn given_nested_group_when_finding_then_resolves_groups_and_rows() {
        let mut tree = sample();
        assert!(tree.find(3).is_some_and(Node::is_row));
        assert_eq!(tree.find_group(4).map(|g| g.operator), Some(Operator::Or));
        assert_eq!(tree.find_group(0).map(|g| g.id), Some(0));
        assert!(tree.find_group(3).is_none());
        assert!(tree.find_row_mut(2).is_some());
        assert!(tree.find_row_mut(4).is_none());
        assert_eq!(tree.position_of(4), Some(1));
    }

    #[test]
    fn given_operator_when_toggled_then_flips() {
        assert_eq!(Operator::And.toggled(), Operator::Or);
        assert_eq!(Operator::Or.toggled(), Operator::And);
        assert_eq!(Operator::Or.to_string(), "OR");
    }
}
