//! Output formatting utilities

use std::io::IsTerminal;

use crate::cli::OutputFormat;

/// Determine the effective output format based on context
pub fn effective_format(format: OutputFormat, is_terminal: bool) -> OutputFormat {
    match format {
        OutputFormat::Auto => {
            if is_terminal {
                OutputFormat::Table
            } else {
                OutputFormat::Text
            }
        }
        other => other,
    }
}

/// Effective format for whatever stdout currently is
pub fn stdout_format(format: OutputFormat) -> OutputFormat {
    effective_format(format, std::io::stdout().is_terminal())
}
