//! CLI argument definitions using clap

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueHint};

/// Interactive boolean filter tree builder: nested AND/OR predicate groups
#[derive(Parser, Debug)]
#[command(name = "filtree")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Debug output, repeat for more (-d info, -dd debug, -ddd trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub debug: u8,

    /// Config file layered over the global config
    #[arg(short, long, global = true, value_hint = ValueHint::FilePath)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Build a filter expression interactively
    Filter(BuilderArgs),

    /// Build a managed attribute selection interactively
    Attributes(BuilderArgs),

    /// Manage settings
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },

    /// Generate shell completions
    Completion {
        /// Shell type
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

/// Options shared by the builder sessions.
#[derive(clap::Args, Debug)]
pub struct BuilderArgs {
    /// Attributes to offer (comma separated), overrides config
    #[arg(short, long, value_delimiter = ',')]
    pub attributes: Option<Vec<String>>,

    /// Read commands from a file instead of stdin
    #[arg(short, long, value_hint = ValueHint::FilePath)]
    pub script: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Show effective configuration
    Show,
    /// Print a template config file
    Template,
    /// Show the global config file path
    Path,
}
