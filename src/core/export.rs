//! Rendering a submitted request
//!
//! A submitted request is shown three ways, all in entry order with 1-based
//! numbering: a table, a CSV file for download and a plain-text block for
//! pasting into mail. Column labels are the fixed Japanese headers the
//! receiving office expects.

use chrono::{DateTime, Local};
use miette::Diagnostic;
use serde::Serialize;
use std::path::{Path, PathBuf};
use tabled::settings::Style;
use tabled::{Table, Tabled};
use thiserror::Error;
use tracing::info;

use crate::core::entry::Entry;

/// Label of the quantity column
pub const QUANTITY_LABEL: &str = "個数";
/// Label of the wearer name column
pub const USER_NAME_LABEL: &str = "使用者名";

/// CSV header: seven display columns followed by the five identifiers
pub const CSV_HEADERS: [&str; 12] = [
    "起票",
    "施設",
    "制服パターン",
    "制服名",
    "サイズ",
    QUANTITY_LABEL,
    USER_NAME_LABEL,
    "applicant_id",
    "location_id",
    "pattern_id",
    "uniform_id",
    "size_id",
];

const FILE_PREFIX: &str = "uniform_request_";
const TIMESTAMP_FORMAT: &str = "%Y%m%d-%H%M%S";

/// Errors raised while rendering or writing an export
#[derive(Debug, Error, Diagnostic)]
pub enum ExportError {
    #[error("Nothing to export: no entries have been collected")]
    #[diagnostic(code(uniform_request::export::empty))]
    Empty,

    #[error("Failed to encode CSV: {0}")]
    #[diagnostic(code(uniform_request::export::csv))]
    Csv(#[from] csv::Error),

    #[error("Failed to write {}: {source}", path.display())]
    #[diagnostic(code(uniform_request::export::write))]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Full row of the review table
#[derive(Debug, Tabled)]
struct ReviewRow<'a> {
    #[tabled(rename = "No")]
    number: usize,
    #[tabled(rename = "起票")]
    applicant: &'a str,
    #[tabled(rename = "施設")]
    location: &'a str,
    #[tabled(rename = "制服パターン")]
    pattern: &'a str,
    #[tabled(rename = "制服名")]
    uniform: &'a str,
    #[tabled(rename = "サイズ")]
    size: &'a str,
    #[tabled(rename = "個数")]
    quantity: u32,
    #[tabled(rename = "使用者名")]
    user_name: &'a str,
    applicant_id: i64,
    location_id: i64,
    pattern_id: i64,
    uniform_id: i64,
    size_id: i64,
}

/// Display-only row shown while still collecting
#[derive(Debug, Tabled)]
struct SummaryRow<'a> {
    #[tabled(rename = "No")]
    number: usize,
    #[tabled(rename = "起票")]
    applicant: &'a str,
    #[tabled(rename = "施設")]
    location: &'a str,
    #[tabled(rename = "制服パターン")]
    pattern: &'a str,
    #[tabled(rename = "制服名")]
    uniform: &'a str,
    #[tabled(rename = "サイズ")]
    size: &'a str,
    #[tabled(rename = "個数")]
    quantity: u32,
    #[tabled(rename = "使用者名")]
    user_name: &'a str,
}

/// Review table with display columns and identifiers
pub fn review_table(entries: &[Entry]) -> String {
    let rows = entries.iter().enumerate().map(|(i, e)| ReviewRow {
        number: i + 1,
        applicant: &e.applicant_name,
        location: &e.location_name,
        pattern: &e.pattern_name,
        uniform: &e.uniform_name,
        size: &e.size_name,
        quantity: e.quantity,
        user_name: &e.user_name,
        applicant_id: e.applicant_id,
        location_id: e.location_id,
        pattern_id: e.pattern_id,
        uniform_id: e.uniform_id,
        size_id: e.size_id,
    });
    Table::new(rows).with(Style::rounded()).to_string()
}

/// Compact table of the entries collected so far
pub fn summary_table(entries: &[Entry]) -> String {
    let rows = entries.iter().enumerate().map(|(i, e)| SummaryRow {
        number: i + 1,
        applicant: &e.applicant_name,
        location: &e.location_name,
        pattern: &e.pattern_name,
        uniform: &e.uniform_name,
        size: &e.size_name,
        quantity: e.quantity,
        user_name: &e.user_name,
    });
    Table::new(rows).with(Style::sharp()).to_string()
}

/// CSV document with a header row and one row per entry
///
/// Rows end in a bare `\n`.
pub fn csv_document(entries: &[Entry]) -> Result<String, ExportError> {
    let mut writer = csv::WriterBuilder::new()
        .terminator(csv::Terminator::Any(b'\n'))
        .from_writer(Vec::new());
    writer.write_record(CSV_HEADERS)?;

    for e in entries {
        writer.write_record([
            e.applicant_name.clone(),
            e.location_name.clone(),
            e.pattern_name.clone(),
            e.uniform_name.clone(),
            e.size_name.clone(),
            e.quantity.to_string(),
            e.user_name.clone(),
            e.applicant_id.to_string(),
            e.location_id.to_string(),
            e.pattern_id.to_string(),
            e.uniform_id.to_string(),
            e.size_id.to_string(),
        ])?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|e| ExportError::Csv(e.into_error().into()))?;
    // every field came from a &str, so the output is valid UTF-8
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

/// Plain-text block, one `[n] label:value / ...` line per entry
pub fn text_block(entries: &[Entry]) -> String {
    entries
        .iter()
        .enumerate()
        .map(|(i, e)| {
            format!(
                "[{}] 起票:{} / 施設:{} / 制服パターン:{} / 制服名:{} / サイズ:{} / {}:{} / {}:{}",
                i + 1,
                e.applicant_name,
                e.location_name,
                e.pattern_name,
                e.uniform_name,
                e.size_name,
                QUANTITY_LABEL,
                e.quantity,
                USER_NAME_LABEL,
                e.user_name
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Download file name for an export made at `at`
pub fn export_filename(at: DateTime<Local>) -> String {
    format!("{}{}.csv", FILE_PREFIX, at.format(TIMESTAMP_FORMAT))
}

/// All renderings of one submitted request
#[derive(Debug, Clone, Serialize)]
pub struct Export {
    pub filename: String,
    pub csv: String,
    pub table: String,
    pub text: String,
    pub entries: Vec<Entry>,
}

impl Export {
    /// Render every view of `entries`; an empty request is an error
    pub fn render(entries: &[Entry], at: DateTime<Local>) -> Result<Self, ExportError> {
        if entries.is_empty() {
            return Err(ExportError::Empty);
        }

        Ok(Self {
            filename: export_filename(at),
            csv: csv_document(entries)?,
            table: review_table(entries),
            text: text_block(entries),
            entries: entries.to_vec(),
        })
    }

    /// Write the CSV into `dir`, creating it if needed
    pub fn write_csv(&self, dir: &Path) -> Result<PathBuf, ExportError> {
        let path = dir.join(&self.filename);
        let io_err = |source| ExportError::Write {
            path: path.clone(),
            source,
        };

        std::fs::create_dir_all(dir).map_err(io_err)?;
        std::fs::write(&path, self.csv.as_bytes()).map_err(io_err)?;

        info!(rows = self.entries.len(), "Exported request to {}", path.display());
        Ok(path)
    }

    /// JSON rendering of the entries
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(&self.entries)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use tempfile::tempdir;

    fn entry(n: u32, user: &str) -> Entry {
        Entry {
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
            quantity: n,
            user_name: user.into(),
        }
    }

    fn at() -> DateTime<Local> {
        Local.with_ymd_and_hms(2024, 4, 1, 9, 5, 7).unwrap()
    }

    #[test]
    fn test_export_filename() {
        assert_eq!(export_filename(at()), "uniform_request_20240401-090507.csv");
    }

    #[test]
    fn test_csv_document_header_and_rows() {
        let csv = csv_document(&[entry(2, "Suzuki"), entry(1, "Ito, Jr.")]).unwrap();
        let lines: Vec<&str> = csv.lines().collect();

        assert_eq!(lines.len(), 3);
        assert_eq!(
            lines[0],
            "起票,施設,制服パターン,制服名,サイズ,個数,使用者名,applicant_id,location_id,pattern_id,uniform_id,size_id"
        );
        assert_eq!(lines[1], "Tanaka,HQ,Summer,Shirt-M,M,2,Suzuki,1,10,1,100,1000");
        assert_eq!(lines[2], "Tanaka,HQ,Summer,Shirt-M,M,1,\"Ito, Jr.\",1,10,1,100,1000");
    }

    #[test]
    fn test_csv_rows_end_in_line_feed() {
        let csv = csv_document(&[entry(2, "Suzuki")]).unwrap();
        assert!(!csv.contains('\r'));
        assert!(csv.ends_with("1000\n"));
        assert_eq!(csv.matches('\n').count(), 2);
    }

    #[test]
    fn test_text_block_numbering() {
        let text = text_block(&[entry(2, "Suzuki"), entry(5, "Ito")]);
        insta::assert_snapshot!(text, @r"
        [1] 起票:Tanaka / 施設:HQ / 制服パターン:Summer / 制服名:Shirt-M / サイズ:M / 個数:2 / 使用者名:Suzuki
        [2] 起票:Tanaka / 施設:HQ / 制服パターン:Summer / 制服名:Shirt-M / サイズ:M / 個数:5 / 使用者名:Ito
        ");
    }

    #[test]
    fn test_tables_contain_every_entry() {
        let entries = [entry(2, "Suzuki"), entry(5, "Ito")];

        let review = review_table(&entries);
        assert!(review.contains("applicant_id"));
        assert!(review.contains("Suzuki"));
        assert!(review.contains("Ito"));

        let summary = summary_table(&entries);
        assert!(summary.contains("使用者名"));
        assert!(!summary.contains("size_id"));
    }

    #[test]
    fn test_render_rejects_empty() {
        assert!(matches!(Export::render(&[], at()), Err(ExportError::Empty)));
    }

    #[test]
    fn test_write_csv_creates_directory() {
        let tmp = tempdir().unwrap();
        let export = Export::render(&[entry(1, "Suzuki")], at()).unwrap();

        let path = export.write_csv(&tmp.path().join("out")).unwrap();
        assert!(path.ends_with("uniform_request_20240401-090507.csv"));
        assert_eq!(std::fs::read_to_string(path).unwrap(), export.csv);
    }

    #[test]
    fn test_render_does_not_drop_entries() {
        let entries = vec![entry(1, "A"), entry(2, "B"), entry(3, "C")];
        let export = Export::render(&entries, at()).unwrap();
        assert_eq!(export.entries, entries);
        assert_eq!(export.text.lines().count(), 3);
        assert_eq!(export.csv.lines().count(), 4);
    }
}
