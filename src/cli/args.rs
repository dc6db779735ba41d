//! Command-line argument definitions

use clap::{ArgAction, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use crate::cli::commands::completions::CompletionsArgs;
use crate::cli::commands::init::InitArgs;
use crate::cli::commands::options::OptionsArgs;
use crate::cli::commands::replay::ReplayArgs;

#[derive(Parser, Debug)]
#[command(name = "uniform-request")]
#[command(version, about = "Collect uniform-order requests from cascading master-data dropdowns")]
#[command(
    long_about = "Collect uniform-order requests: pick applicant, facility, pattern, uniform \
                  and size from CSV master data, add several line items, then submit them as \
                  a CSV export and a plain-text summary."
)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalOpts,

    /// Command to run (defaults to the interactive form)
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Options shared by every command
#[derive(clap::Args, Debug, Clone, Default)]
pub struct GlobalOpts {
    /// Directory containing the master CSV files
    #[arg(long, global = true, value_name = "DIR")]
    pub master_dir: Option<PathBuf>,

    /// Directory receiving exported CSV files
    #[arg(long, global = true, value_name = "DIR")]
    pub export_dir: Option<PathBuf>,

    /// Output format
    #[arg(long, short = 'f', global = true, default_value = "auto")]
    pub format: OutputFormat,

    /// Increase log verbosity (-v info, -vv debug)
    #[arg(long, short = 'v', global = true, action = ArgAction::Count)]
    pub verbose: u8,

    /// Only log errors
    #[arg(long, short = 'q', global = true, conflicts_with = "verbose")]
    pub quiet: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Fill in the request form interactively (default)
    Form,

    /// Write sample master files to the master directory
    Init(InitArgs),

    /// List the options a dropdown offers
    Options(OptionsArgs),

    /// Run a scripted form session from a YAML file
    Replay(ReplayArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

/// Output format for rendered results
#[derive(Debug, Clone, Copy, ValueEnum, Default, PartialEq, Eq)]
pub enum OutputFormat {
    /// Table on a terminal, text otherwise
    #[default]
    Auto,
    /// Boxed table
    Table,
    /// Plain text lines
    Text,
    /// Comma-separated values
    Csv,
    /// JSON
    Json,
}
