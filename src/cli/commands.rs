//! Command dispatch and the interactive read-eval loop.

use std::fs;
use std::io::{self, BufRead, IsTerminal};
use std::path::Path;

use clap::CommandFactory;
use clap_complete::generate;
use tracing::{debug, instrument};

use crate::application::{IoResultExt, Outcome, Session, HELP};
use crate::cli::args::{BuilderArgs, Cli, Commands, ConfigCommands};
use crate::cli::error::{CliError, CliResult};
use crate::cli::output;
use crate::cli::render::TreeRenderer;
use crate::config::{global_config_path, Settings};
use crate::domain::{AttributeBuilder, ExpressionBuilder, FilterBuilder, RowData};

pub fn execute_command(cli: &Cli) -> CliResult<()> {
    match &cli.command {
        Some(Commands::Filter(args)) => {
            let settings = Settings::load(cli.config.as_deref())?;
            let attributes = select_attributes(args, settings.attributes)?;
            run_builder(FilterBuilder::new(attributes), args, &settings.prompt)
        }
        Some(Commands::Attributes(args)) => {
            let settings = Settings::load(cli.config.as_deref())?;
            let attributes = select_attributes(args, settings.managed_attributes)?;
            run_builder(AttributeBuilder::new(attributes), args, &settings.prompt)
        }
        Some(Commands::Config { command }) => execute_config(command, cli.config.as_deref()),
        Some(Commands::Completion { shell }) => {
            let mut cmd = Cli::command();
            let name = cmd.get_name().to_string();
            generate(*shell, &mut cmd, name, &mut io::stdout());
            Ok(())
        }
        None => Err(CliError::Usage(
            "no command given, try 'filtree --help'".to_string(),
        )),
    }
}

/// Attributes from the command line win over the configured ones.
fn select_attributes(args: &BuilderArgs, configured: Vec<String>) -> CliResult<Vec<String>> {
    match &args.attributes {
        Some(given) if given.iter().any(|a| a.trim().is_empty()) => Err(CliError::InvalidArgs(
            "attribute names must not be empty".to_string(),
        )),
        Some(given) => Ok(given.clone()),
        None => Ok(configured),
    }
}

fn execute_config(command: &ConfigCommands, explicit: Option<&Path>) -> CliResult<()> {
    match command {
        ConfigCommands::Show => {
            let settings = Settings::load(explicit)?;
            output::info(&settings.to_toml()?);
        }
        ConfigCommands::Template => output::info(&Settings::template()),
        ConfigCommands::Path => match global_config_path() {
            Some(path) => output::info(&path.display()),
            None => output::warning("no home directory, global config unavailable"),
        },
    }
    Ok(())
}

#[instrument(level = "debug", skip(builder))]
fn run_builder<R: RowData>(
    mut builder: ExpressionBuilder<R>,
    args: &BuilderArgs,
    prompt: &str,
) -> CliResult<()> {
    builder.subscribe(|root| {
        debug!(root = root.id, rows = root.row_count(), "tree changed");
    });
    let mut session = Session::new(builder);

    match &args.script {
        Some(path) => {
            let script = fs::read_to_string(path).with_path_context("read script", path)?;
            run_script(&mut session, &script)?;
            print_tree(&session);
            Ok(())
        }
        None => run_interactive(&mut session, prompt),
    }
}

/// Executes every line of a script; the first error aborts.
pub fn run_script<R: RowData>(session: &mut Session<R>, script: &str) -> CliResult<()> {
    for (number, line) in script.lines().enumerate() {
        debug!(line = number + 1, "script: {}", line);
        match session.execute_line(line)? {
            Outcome::Quit => break,
            outcome => report(session, outcome, false),
        }
    }
    Ok(())
}

fn run_interactive<R: RowData>(session: &mut Session<R>, prompt: &str) -> CliResult<()> {
    let stdin = io::stdin();
    let interactive = stdin.is_terminal();
    if interactive {
        output::header("filtree: type 'help' for commands");
        print_tree(session);
    }

    let mut lines = stdin.lock().lines();
    loop {
        if interactive {
            output::prompt(prompt);
        }
        let Some(line) = lines.next() else {
            break;
        };
        let line = line.map_err(|e| CliError::io("read stdin", e))?;

        match session.execute_line(&line) {
            Ok(Outcome::Quit) => break,
            Ok(outcome) => report(session, outcome, true),
            Err(e) => output::error(&e),
        }
    }

    if !interactive {
        print_tree(session);
    }
    Ok(())
}

fn report<R: RowData>(session: &Session<R>, outcome: Outcome, show_changes: bool) {
    match outcome {
        Outcome::Changed(inserted) => {
            if let Some(id) = inserted {
                debug!(row = id, "row added");
            }
            if show_changes {
                print_tree(session);
            }
        }
        Outcome::Refused => output::warning("refused: the last row cannot be removed"),
        Outcome::Show => print_tree(session),
        Outcome::Rows => {
            for row in session.builder().root().rows() {
                output::detail(&format!("#{} {}", row.id, row.data));
            }
        }
        Outcome::Help => output::info(HELP),
        Outcome::Quit | Outcome::Nothing => {}
    }
}

fn print_tree<R: RowData>(session: &Session<R>) {
    output::info(&TreeRenderer::render(session.builder()));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::ApplicationError;
    use crate::domain::{DomainError, Node};

    fn session() -> Session<crate::domain::FilterRow> {
        Session::new(FilterBuilder::new(vec!["name".into(), "description".into()]))
    }

    #[test]
    fn given_script_when_run_then_applies_every_line() {
        let mut s = session();
        run_script(&mut s, "and 1\n# comment\nor 2\nset 3 value abc\nrm 1\n").unwrap();

        let root = s.builder().root();
        assert_eq!(root.id, 0);
        assert_eq!(root.operator, crate::domain::Operator::Or);
        let ids: Vec<_> = root.children.iter().map(Node::id).collect();
        assert_eq!(ids, vec![2, 3]);
    }

    #[test]
    fn given_script_with_quit_when_run_then_stops_early() {
        let mut s = session();
        run_script(&mut s, "and 1\nquit\nand 1\n").unwrap();
        assert_eq!(s.builder().row_count(), 2);
    }

    #[test]
    fn given_script_with_bad_line_when_run_then_aborts_with_error() {
        let mut s = session();
        let err = run_script(&mut s, "and 1\nrm 99\nand 1\n").unwrap_err();
        assert!(matches!(
            err,
            CliError::Application(ApplicationError::UnknownNode(99))
        ));
        assert_eq!(s.builder().row_count(), 2);
    }

    #[test]
    fn given_blank_attribute_argument_when_selecting_then_invalid_args() {
        let args = BuilderArgs {
            attributes: Some(vec!["name".into(), " ".into()]),
            script: None,
        };
        let err = select_attributes(&args, Vec::new()).unwrap_err();
        assert_eq!(err.exit_code(), crate::exitcode::USAGE);

        let none = BuilderArgs {
            attributes: None,
            script: None,
        };
        assert_eq!(
            select_attributes(&none, vec!["title".into()]).unwrap(),
            vec!["title".to_string()]
        );
    }

    #[test]
    fn given_script_with_unknown_attribute_when_run_then_domain_error() {
        let mut s = session();
        let err = run_script(&mut s, "set 1 attribute colour\n").unwrap_err();
        assert!(matches!(
            err,
            CliError::Application(ApplicationError::Domain(DomainError::UnknownAttribute(_)))
        ));
    }
}
