//! `uniform-request replay` command - run a scripted form session
//!
//! A script is a list of steps. Each step may pick dropdown values, type a
//! quantity and user name, then press one of the form's buttons:
//!
//! ```yaml
//! steps:
//!   - select: { applicant: Tanaka, location: HQ, pattern: Summer, uniform: Shirt-M, size: M }
//!     quantity: "２"
//!     user_name: Suzuki
//!     action: add
//!   - select: { uniform: Polo, size: L }
//!     quantity: 1
//!     user_name: Ito
//!     action: finalize
//! ```
//!
//! Dropdowns are set in form order, so a step may pick a pattern and one of
//! its uniforms together.

use console::style;
use miette::{IntoDiagnostic, Result};
use serde::Deserialize;
use std::fs;
use std::path::PathBuf;

use crate::cli::helpers::{load_config, load_master, print_success, print_warning, save_export};
use crate::cli::output::stdout_format;
use crate::cli::{GlobalOpts, OutputFormat};
use crate::core::export::summary_table;
use crate::core::{Action, Export, Field, Form, Outcome, PendingSelection, Session};

#[derive(clap::Args, Debug)]
pub struct ReplayArgs {
    /// YAML script of form steps
    #[arg(value_name = "SCRIPT")]
    pub script: PathBuf,

    /// Render the export without writing the CSV file
    #[arg(long)]
    pub no_write: bool,

    /// Fail if any action is ignored
    #[arg(long)]
    pub strict: bool,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct Script {
    steps: Vec<Step>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct Step {
    #[serde(default)]
    select: StepSelection,
    quantity: Option<Scalar>,
    user_name: Option<String>,
    action: Option<Button>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct StepSelection {
    applicant: Option<String>,
    location: Option<String>,
    pattern: Option<String>,
    uniform: Option<String>,
    size: Option<String>,
}

/// Quantities may be written as YAML numbers or strings
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum Scalar {
    Int(i64),
    Text(String),
}

#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(rename_all = "lowercase")]
enum Button {
    #[serde(alias = "append")]
    Add,
    Finalize,
    Reset,
}

impl Step {
    fn into_actions(self) -> Vec<Action> {
        let StepSelection {
            applicant,
            location,
            pattern,
            uniform,
            size,
        } = self.select;

        let mut actions: Vec<Action> = [
            (Field::Applicant, applicant),
            (Field::Location, location),
            (Field::Pattern, pattern),
            (Field::Uniform, uniform),
            (Field::Size, size),
        ]
        .into_iter()
        .filter_map(|(field, value)| value.map(|v| Action::Select { field, value: Some(v) }))
        .collect();

        if let Some(quantity) = self.quantity {
            let raw = match quantity {
                Scalar::Int(n) => n.to_string(),
                Scalar::Text(s) => s,
            };
            actions.push(Action::SetQuantity(raw));
        }
        if let Some(user_name) = self.user_name {
            actions.push(Action::SetUserName(user_name));
        }
        match self.action {
            Some(Button::Add) => actions.push(Action::Append),
            Some(Button::Finalize) => actions.push(Action::Finalize),
            Some(Button::Reset) => actions.push(Action::Reset),
            None => {}
        }
        actions
    }
}

pub fn run(args: ReplayArgs, global: &GlobalOpts) -> Result<()> {
    let config = load_config(global)?;
    let master = load_master(&config)?;
    let form = Form::new(&master, config.quantity);

    let content = fs::read_to_string(&args.script)
        .map_err(|e| miette::miette!("Cannot read script {}: {}", args.script.display(), e))?;
    let script: Script = serde_yml::from_str(&content)
        .map_err(|e| miette::miette!("Invalid script {}: {}", args.script.display(), e))?;

    let format = stdout_format(global.format);
    let mut session = Session::new();
    let mut pending = PendingSelection::new();
    let mut ignored = 0usize;

    for (index, step) in script.steps.into_iter().enumerate() {
        let step_no = index + 1;
        for action in step.into_actions() {
            match session.apply(&mut pending, action, &form) {
                Outcome::Updated { cleared } => {
                    for field in cleared {
                        tracing::debug!(step = step_no, field = %field, "Selection cleared");
                    }
                }
                Outcome::Appended { count } => {
                    print_success(&format!("追加しました（現在 {} 件）", count));
                }
                Outcome::Finalized { count } => {
                    print_success(&format!("送信完了（{} 件）", count));
                    emit_export(&session, format, &config.export_dir, args.no_write)?;
                }
                Outcome::Reset => {
                    print_success("新しい申請を開始します");
                }
                Outcome::Ignored(reason) => {
                    ignored += 1;
                    print_warning(&format!("step {}: {}", step_no, reason));
                }
            }
        }

        if let Some(warning) = form.check(&pending).warning {
            tracing::debug!(step = step_no, "Form warning: {}", warning);
        }
    }

    if !session.is_submitted() && !session.entries().is_empty() {
        print_warning(&format!(
            "{} 件が未送信のままです",
            session.entries().len()
        ));
        eprintln!("{}", summary_table(session.entries()));
    }

    if args.strict && ignored > 0 {
        return Err(miette::miette!("{} action(s) were ignored", ignored));
    }

    Ok(())
}

/// Print the chosen view of the submitted request, then write the CSV
///
/// A failed write is reported and the script carries on.
fn emit_export(
    session: &Session,
    format: OutputFormat,
    export_dir: &std::path::Path,
    no_write: bool,
) -> Result<()> {
    let at = session.finalized_at().unwrap_or_else(chrono::Local::now);
    let export = Export::render(session.entries(), at)?;

    match format {
        OutputFormat::Csv => print!("{}", export.csv),
        OutputFormat::Json => println!("{}", export.to_json().into_diagnostic()?),
        OutputFormat::Text => println!("{}", export.text),
        OutputFormat::Table | OutputFormat::Auto => println!("{}", export.table),
    }

    if !no_write {
        if let Some(path) = save_export(&export, export_dir) {
            eprintln!("{} {}", style("保存しました:").dim(), style(path.display()).cyan());
        }
    }

    Ok(())
}
