//! `uniform-request init` command - write sample master files

use console::style;
use miette::{IntoDiagnostic, Result};
use rust_embed::Embed;
use std::fs;
use std::path::PathBuf;

use crate::cli::helpers::load_config;
use crate::cli::GlobalOpts;
use crate::core::{MasterData, TableKind};

#[derive(Embed)]
#[folder = "templates/master/"]
struct SampleMaster;

#[derive(clap::Args, Debug)]
pub struct InitArgs {
    /// Target directory (defaults to the configured master directory)
    #[arg(value_name = "DIR")]
    pub dir: Option<PathBuf>,

    /// Overwrite existing master files
    #[arg(long)]
    pub force: bool,
}

pub fn run(args: InitArgs, global: &GlobalOpts) -> Result<()> {
    let config = load_config(global)?;
    let dir = args.dir.unwrap_or(config.master_dir);

    fs::create_dir_all(&dir).into_diagnostic()?;

    let mut written = 0;
    for kind in TableKind::all() {
        let path = dir.join(kind.file_name());
        if path.exists() && !args.force {
            println!(
                "{} {} already exists (use --force to overwrite)",
                style("!").yellow(),
                style(path.display()).dim()
            );
            continue;
        }

        let file = SampleMaster::get(kind.file_name())
            .ok_or_else(|| miette::miette!("Missing embedded sample for {}", kind))?;
        fs::write(&path, file.data.as_ref()).into_diagnostic()?;
        println!("{} Created {}", style("✓").green(), style(path.display()).cyan());
        written += 1;
    }

    // the directory must load cleanly whether or not files were skipped
    MasterData::load(&dir)?;

    println!();
    println!(
        "Initialized master data in {} ({} file(s) written)",
        style(dir.display()).cyan(),
        written
    );
    Ok(())
}
