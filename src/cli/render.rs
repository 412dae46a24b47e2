//! Terminal rendering of the expression tree via termtree.

use itertools::Itertools;
use termtree::Tree;

use crate::domain::presenter::actions_for;
use crate::domain::{
    present, Action, ExpressionBuilder, Group, GroupControls, NodeId, Presenter, Row,
    RowControls, RowData,
};

/// Presenter assembling a `termtree::Tree` with one line per node.
///
/// Groups read `AND #4 [and|or|-]`, rows `#2 name IS PARTIAL_MATCH "" [and|or|-]`,
/// where the bracket lists the controls the node offers.
#[derive(Debug, Default)]
pub struct TreeRenderer {
    stack: Vec<Tree<String>>,
    done: Option<Tree<String>>,
}

impl TreeRenderer {
    /// Renders the builder's current tree.
    pub fn render<R: RowData>(builder: &ExpressionBuilder<R>) -> Tree<String> {
        let mut renderer = Self::default();
        present(builder, &mut renderer);
        renderer
            .done
            .unwrap_or_else(|| Tree::new("<empty>".to_string()))
    }
}

fn controls_label(actions: &[Action]) -> String {
    if actions.is_empty() {
        return String::new();
    }
    let labels = actions.iter().map(|action| match action {
        Action::And { .. } => "and",
        Action::Or { .. } => "or",
        Action::Remove { .. } => "-",
    });
    format!(" [{}]", labels.format("|"))
}

impl<R: RowData> Presenter<R> for TreeRenderer {
    fn enter_group(&mut self, group: &Group<R>, parent: NodeId, controls: GroupControls) {
        let actions = actions_for(group.id, parent, controls.show_and_or, controls.show_remove);
        self.stack.push(Tree::new(format!(
            "{} #{}{}",
            group.operator,
            group.id,
            controls_label(&actions)
        )));
    }

    fn row(&mut self, row: &Row<R>, parent: NodeId, controls: RowControls) {
        let actions = actions_for(row.id, parent, controls.show_and_or, controls.show_remove);
        let leaf = Tree::new(format!("#{} {}{}", row.id, row.data, controls_label(&actions)));
        if let Some(top) = self.stack.last_mut() {
            top.push(leaf);
        }
    }

    fn exit_group(&mut self, _group: &Group<R>) {
        if let Some(finished) = self.stack.pop() {
            match self.stack.last_mut() {
                Some(parent) => {
                    parent.push(finished);
                }
                None => self.done = Some(finished),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{FilterBuilder, Operator};

    #[test]
    fn given_initial_builder_when_rendered_then_single_row_without_remove() {
        let builder = FilterBuilder::new(vec!["name".into()]);
        let text = TreeRenderer::render(&builder).to_string();
        let lines: Vec<_> = text.lines().collect();
        assert_eq!(lines[0], "AND #0");
        assert!(lines[1].ends_with(r#"#1 name IS PARTIAL_MATCH "" [and|or]"#));
    }

    #[test]
    fn given_split_tree_when_rendered_then_nests_subgroup() {
        let mut builder = FilterBuilder::new(vec!["name".into()]);
        builder.insert_adjacent(1, 0, Operator::And).unwrap();
        builder.insert_adjacent(2, 0, Operator::Or).unwrap();

        let text = TreeRenderer::render(&builder).to_string();
        let lines: Vec<_> = text.lines().collect();
        assert_eq!(lines.len(), 5);
        assert_eq!(lines[0], "AND #0 [and|or]");
        assert!(lines[1].ends_with("#1 name IS PARTIAL_MATCH \"\" [and|or|-]"));
        assert!(lines[2].ends_with("OR #4 [and|or|-]"));
        assert!(lines[3].contains("#2 name"));
        assert!(lines[4].contains("#3 name"));
    }

    #[test]
    fn given_group_inside_subgroup_when_rendered_then_closes_each_level_into_its_parent() {
        let mut builder = FilterBuilder::new(vec!["name".into()]);
        builder.insert_adjacent(1, 0, Operator::And).unwrap();
        builder.insert_adjacent(2, 0, Operator::Or).unwrap();
        builder.insert_adjacent(3, 4, Operator::And).unwrap();
        builder.insert_adjacent(1, 0, Operator::And).unwrap();

        let tree = TreeRenderer::render(&builder);
        let text = tree.to_string();
        let lines: Vec<_> = text.lines().collect();

        assert_eq!(lines.len(), 8);
        assert_eq!(lines[0], "AND #0 [and|or]");
        assert!(lines[3].ends_with("OR #4 [and|or|-]"));
        assert!(lines[5].ends_with("AND #6 [and|or|-]"));
        assert!(lines[6].contains("#3 name"));
        assert!(lines[7].contains("#5 name"));
        // AND on #1 lands right after it, ahead of the OR subgroup
        assert!(lines[2].contains("#7 name"));
        assert_eq!(tree.leaves.len(), 3);
    }
}
