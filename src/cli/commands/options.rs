//! `uniform-request options` command - show a dropdown's option list

use miette::{IntoDiagnostic, Result};

use crate::cli::helpers::{load_config, load_master};
use crate::cli::output::stdout_format;
use crate::cli::{GlobalOpts, OutputFormat};
use crate::core::{options_for, resolve, TableKind};

#[derive(clap::Args, Debug)]
pub struct OptionsArgs {
    /// Master table to list
    #[arg(value_enum)]
    pub table: TableKind,

    /// Parent display name (pattern for uniforms, uniform for sizes)
    #[arg(long, short = 'p')]
    pub parent: Option<String>,
}

pub fn run(args: OptionsArgs, global: &GlobalOpts) -> Result<()> {
    let config = load_config(global)?;
    let master = load_master(&config)?;

    let parent_id = match (args.table.parent(), args.parent.as_deref()) {
        (_, None) => None,
        (None, Some(_)) => {
            return Err(miette::miette!(
                "The {} table has no parent; drop --parent",
                args.table
            ))
        }
        (Some(parent), Some(name)) => Some(
            resolve(master.table(parent), Some(name))
                .ok_or_else(|| miette::miette!("No {} named '{}'", parent, name))?,
        ),
    };

    let options = options_for(master.table(args.table), parent_id);

    match stdout_format(global.format) {
        OutputFormat::Json => {
            let json = serde_json::to_string_pretty(&options).into_diagnostic()?;
            println!("{}", json);
        }
        _ => {
            for option in &options {
                println!("{}", option);
            }
        }
    }

    Ok(())
}
