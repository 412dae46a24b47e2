//! Interactive session: line commands driving a builder
//!
//! The session plays the host application's part. It resolves the parent of the node a
//! command names (as a rendered view would) and dispatches the matching action.

use std::sync::LazyLock;

use regex::Regex;
use tracing::{debug, instrument};

use crate::application::{ApplicationError, ApplicationResult};
use crate::domain::{Action, ActionOutcome, ExpressionBuilder, NodeId, Operator, RowData};

static COMMAND: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(concat!(
        r"(?i)^\s*(?P<verb>and|or|rm|remove|set|reset|show|rows|help|quit|exit)\b",
        r"\s*(?P<rest>.*?)\s*$",
    ))
    .expect("command pattern")
});

static SET_ARGS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?P<id>\d+)\s+(?P<field>[\w-]+)\s*(?P<value>.*)$").expect("set pattern")
});

pub const HELP: &str = "\
and <id>                  add a row after <id>, combined with AND
or <id>                   add a row after <id>, combined with OR
rm <id>                   remove row or group <id>
set <id> <field> <value>  edit a row (attribute, predicate, search, value)
reset                     start over with a single blank row
show                      print the tree
rows                      list rows in document order
help                      this text
quit                      leave";

/// One parsed input line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionCommand {
    Insert { node: NodeId, operator: Operator },
    Remove { node: NodeId },
    Set { node: NodeId, field: String, value: String },
    Reset,
    Show,
    Rows,
    Help,
    Quit,
}

impl SessionCommand {
    /// Parses a line; blank lines and `#` comments yield `None`.
    pub fn parse(line: &str) -> ApplicationResult<Option<Self>> {
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            return Ok(None);
        }

        let caps = COMMAND
            .captures(trimmed)
            .ok_or_else(|| parse_error(line, "unknown command, try 'help'"))?;
        let verb = caps["verb"].to_ascii_lowercase();
        let rest = &caps["rest"];

        let command = match verb.as_str() {
            "and" => SessionCommand::Insert {
                node: parse_id(line, rest)?,
                operator: Operator::And,
            },
            "or" => SessionCommand::Insert {
                node: parse_id(line, rest)?,
                operator: Operator::Or,
            },
            "rm" | "remove" => SessionCommand::Remove {
                node: parse_id(line, rest)?,
            },
            "set" => {
                let args = SET_ARGS
                    .captures(rest)
                    .ok_or_else(|| parse_error(line, "expected: set <id> <field> <value>"))?;
                SessionCommand::Set {
                    node: parse_id(line, &args["id"])?,
                    field: args["field"].to_string(),
                    value: unquote(&args["value"]).to_string(),
                }
            }
            "reset" => SessionCommand::Reset,
            "show" => SessionCommand::Show,
            "rows" => SessionCommand::Rows,
            "help" => SessionCommand::Help,
            _ => SessionCommand::Quit,
        };
        Ok(Some(command))
    }
}

/// What executing a command did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// The tree changed; carries the new row's id for inserts.
    Changed(Option<NodeId>),
    Refused,
    Show,
    Rows,
    Help,
    Quit,
    Nothing,
}

/// A builder driven by text commands.
#[derive(Debug)]
pub struct Session<R: RowData> {
    builder: ExpressionBuilder<R>,
}

impl<R: RowData> Session<R> {
    pub fn new(builder: ExpressionBuilder<R>) -> Self {
        Self { builder }
    }

    pub fn builder(&self) -> &ExpressionBuilder<R> {
        &self.builder
    }

    pub fn builder_mut(&mut self) -> &mut ExpressionBuilder<R> {
        &mut self.builder
    }

    pub fn into_builder(self) -> ExpressionBuilder<R> {
        self.builder
    }

    /// Parses and executes one input line.
    pub fn execute_line(&mut self, line: &str) -> ApplicationResult<Outcome> {
        match SessionCommand::parse(line)? {
            Some(command) => self.execute(command),
            None => Ok(Outcome::Nothing),
        }
    }

    #[instrument(level = "debug", skip(self))]
    pub fn execute(&mut self, command: SessionCommand) -> ApplicationResult<Outcome> {
        let outcome = match command {
            SessionCommand::Insert { node, operator } => {
                let parent = self.parent_of(node)?;
                let action = match operator {
                    Operator::And => Action::And { node, parent },
                    Operator::Or => Action::Or { node, parent },
                };
                self.dispatch(action)?
            }
            SessionCommand::Remove { node } => {
                let parent = self.parent_of(node)?;
                self.dispatch(Action::Remove { node, parent })?
            }
            SessionCommand::Set { node, field, value } => {
                self.builder.update_row(node, &field, &value)?;
                Outcome::Changed(None)
            }
            SessionCommand::Reset => {
                self.builder.reset()?;
                Outcome::Changed(None)
            }
            SessionCommand::Show => Outcome::Show,
            SessionCommand::Rows => Outcome::Rows,
            SessionCommand::Help => Outcome::Help,
            SessionCommand::Quit => Outcome::Quit,
        };
        debug!(?outcome, "command executed");
        Ok(outcome)
    }

    fn parent_of(&self, node: NodeId) -> ApplicationResult<NodeId> {
        self.builder
            .parent_of(node)
            .map(|group| group.id)
            .ok_or(ApplicationError::UnknownNode(node))
    }

    fn dispatch(&mut self, action: Action) -> ApplicationResult<Outcome> {
        Ok(match self.builder.dispatch(action)? {
            ActionOutcome::Inserted(id) => Outcome::Changed(Some(id)),
            ActionOutcome::Removed => Outcome::Changed(None),
            ActionOutcome::Refused => Outcome::Refused,
        })
    }
}

fn parse_id(line: &str, text: &str) -> ApplicationResult<NodeId> {
    let text = text.trim().trim_start_matches('#');
    text.parse()
        .map_err(|_| parse_error(line, &format!("expected a node id, got '{}'", text)))
}

fn parse_error(line: &str, reason: &str) -> ApplicationError {
    ApplicationError::Parse {
        line: line.trim().to_string(),
        reason: reason.to_string(),
    }
}

fn unquote(value: &str) -> &str {
    let value = value.trim();
    if value.len() >= 2
        && ((value.starts_with('"') && value.ends_with('"'))
            || (value.starts_with('\'') && value.ends_with('\'')))
    {
        &value[1..value.len() - 1]
    } else {
        value
    }
}
