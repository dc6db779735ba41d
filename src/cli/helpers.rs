//! Shared helper functions for CLI commands
//!
//! This module contains utility functions that are used across multiple
//! command modules to avoid code duplication.

use console::style;
use miette::{IntoDiagnostic, Result};
use std::io::{self, IsTerminal};
use std::path::{Path, PathBuf};

use crate::cli::GlobalOpts;
use crate::core::{Config, Export, ExportError, MasterData};

/// Resolve configuration for the current directory plus CLI overrides
pub fn load_config(global: &GlobalOpts) -> Result<Config> {
    let cwd = std::env::current_dir().into_diagnostic()?;
    let config = Config::load(&cwd)?;
    Ok(config.with_overrides(global.master_dir.clone(), global.export_dir.clone()))
}

/// Load the master data snapshot named by the configuration
///
/// Any failure here is fatal for the session.
pub fn load_master(config: &Config) -> Result<MasterData> {
    Ok(MasterData::load(&config.master_dir)?)
}

/// Truncate a string to max_len characters, adding "..." if truncated
///
/// Counts characters rather than bytes so Japanese names are never split
/// inside a code point.
pub fn truncate_str(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}

/// Fail unless stdin and stdout are both attached to a terminal
pub fn require_terminal(command: &str) -> Result<()> {
    if io::stdin().is_terminal() && io::stdout().is_terminal() {
        Ok(())
    } else {
        Err(miette::miette!(
            help = "Use 'uniform-request replay <script.yaml>' for non-interactive input",
            "'{}' needs an interactive terminal",
            command
        ))
    }
}

/// Write the export CSV into `dir`, warning instead of failing
///
/// The request is already submitted at this point, so a failed write must
/// not end the session.
pub fn save_export(export: &Export, dir: &Path) -> Option<PathBuf> {
    match export.write_csv(dir) {
        Ok(path) => Some(path),
        Err(err) => {
            tracing::warn!(error = %err, "CSV export failed");
            print_warning(&export_failure_message(&err));
            None
        }
    }
}

fn export_failure_message(err: &ExportError) -> String {
    match err {
        ExportError::Write { path, source } => {
            format!("CSV を保存できませんでした: {} ({})", path.display(), source)
        }
        other => format!("CSV を保存できませんでした: {}", other),
    }
}

/// Print a success line to stderr
pub fn print_success(message: &str) {
    eprintln!("{} {}", style("✓").green(), message);
}

/// Print an inline warning to stderr
pub fn print_warning(message: &str) {
    eprintln!("{} {}", style("⚠").yellow(), style(message).yellow());
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_str() {
        assert_eq!(truncate_str("hello", 10), "hello");
        assert_eq!(truncate_str("hello world", 8), "hello...");
        assert_eq!(truncate_str("hi", 2), "hi");
        assert_eq!(truncate_str("制服パターン名称", 6), "制服パ...");
    }

    #[test]
    fn test_export_failure_message_names_path() {
        let err = ExportError::Write {
            path: PathBuf::from("blocker/uniform_request_20250101-000000.csv"),
            source: io::Error::new(io::ErrorKind::Other, "not a directory"),
        };
        let message = export_failure_message(&err);
        assert!(message.starts_with("CSV を保存できませんでした"));
        assert!(message.contains("blocker/uniform_request_20250101-000000.csv"));
        assert!(message.contains("not a directory"));
    }

    #[test]
    fn test_save_export_survives_unwritable_dir() {
        use crate::core::Entry;
        use chrono::{Local, TimeZone};

        let entry = Entry {
            applicant_id: 1,
            applicant_name: "Tanaka".into(),
            location_id: 10,
            location_name: "HQ".into(),
            pattern_id: 1,
            pattern_name: "Summer".into(),
            uniform_id: 100,
            uniform_name: "Shirt-M".into(),
            size_id: 1000,
            size_name: "M".into(),
            quantity: 1,
            user_name: "Suzuki".into(),
        };
        let tmp = tempfile::tempdir().unwrap();
        let blocker = tmp.path().join("blocker");
        std::fs::write(&blocker, "").unwrap();

        let at = Local.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap();
        let export = Export::render(&[entry], at).unwrap();
        assert_eq!(save_export(&export, &blocker), None);
        assert!(save_export(&export, &tmp.path().join("out")).is_some());
    }
}
