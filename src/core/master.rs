//! Master data - the five read-only reference tables
//!
//! Master tables are plain CSV files with a header row. They are loaded once
//! per session into an immutable [`MasterData`] snapshot; any missing file,
//! missing column or malformed identifier aborts the load.

use miette::Diagnostic;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info};

/// Identifier of a row within one master table
pub type RowId = i64;

/// The five master tables
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum TableKind {
    Applicants,
    Locations,
    Patterns,
    Uniforms,
    Sizes,
}

impl TableKind {
    /// All tables in load order
    pub fn all() -> &'static [TableKind] {
        &[
            TableKind::Applicants,
            TableKind::Locations,
            TableKind::Patterns,
            TableKind::Uniforms,
            TableKind::Sizes,
        ]
    }

    /// File name inside the master directory
    pub fn file_name(&self) -> &'static str {
        match self {
            TableKind::Applicants => "applicant_name.csv",
            TableKind::Locations => "locations.csv",
            TableKind::Patterns => "pattern.csv",
            TableKind::Uniforms => "uniforms.csv",
            TableKind::Sizes => "size.csv",
        }
    }

    /// Identifier column name
    pub fn id_column(&self) -> &'static str {
        match self {
            TableKind::Applicants => "ap_id",
            TableKind::Locations => "location_id",
            TableKind::Patterns => "pattern_id",
            TableKind::Uniforms => "uniform_id",
            TableKind::Sizes => "size_id",
        }
    }

    /// Display name column name
    pub fn name_column(&self) -> &'static str {
        match self {
            TableKind::Applicants => "ap_name",
            TableKind::Locations => "location_name",
            TableKind::Patterns => "pattern_name",
            TableKind::Uniforms => "uniform_name",
            TableKind::Sizes => "size_name",
        }
    }

    /// Foreign key column linking to the parent table, if any
    pub fn parent_column(&self) -> Option<&'static str> {
        self.parent().map(|p| p.id_column())
    }

    /// Parent table for dependent tables
    pub fn parent(&self) -> Option<TableKind> {
        match self {
            TableKind::Uniforms => Some(TableKind::Patterns),
            TableKind::Sizes => Some(TableKind::Uniforms),
            _ => None,
        }
    }
}

impl std::fmt::Display for TableKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TableKind::Applicants => write!(f, "applicants"),
            TableKind::Locations => write!(f, "locations"),
            TableKind::Patterns => write!(f, "patterns"),
            TableKind::Uniforms => write!(f, "uniforms"),
            TableKind::Sizes => write!(f, "sizes"),
        }
    }
}

/// One row of a master table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReferenceRow {
    pub id: RowId,
    pub name: String,
    /// Foreign key into the parent table (uniforms and sizes only)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<RowId>,
}

impl ReferenceRow {
    pub fn new(id: RowId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            parent_id: None,
        }
    }

    pub fn with_parent(mut self, parent_id: RowId) -> Self {
        self.parent_id = Some(parent_id);
        self
    }
}

/// An ordered, immutable master table
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReferenceTable {
    kind: TableKind,
    rows: Vec<ReferenceRow>,
}

impl ReferenceTable {
    pub fn new(kind: TableKind, rows: Vec<ReferenceRow>) -> Self {
        Self { kind, rows }
    }

    pub fn kind(&self) -> TableKind {
        self.kind
    }

    pub fn rows(&self) -> &[ReferenceRow] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Row with the given identifier
    pub fn get(&self, id: RowId) -> Option<&ReferenceRow> {
        self.rows.iter().find(|r| r.id == id)
    }

    /// Rows whose foreign key equals `parent_id`, or every row when `None`
    pub fn rows_for(&self, parent_id: Option<RowId>) -> impl Iterator<Item = &ReferenceRow> {
        self.rows
            .iter()
            .filter(move |r| parent_id.is_none() || r.parent_id == parent_id)
    }

    /// A copy of this table restricted to the children of `parent_id`
    pub fn scoped(&self, parent_id: RowId) -> ReferenceTable {
        ReferenceTable {
            kind: self.kind,
            rows: self.rows_for(Some(parent_id)).cloned().collect(),
        }
    }

    /// Load a table from a CSV file
    pub fn load(kind: TableKind, path: &Path) -> Result<Self, MasterError> {
        if !path.is_file() {
            return Err(MasterError::NotFound {
                table: kind,
                path: path.to_path_buf(),
            });
        }

        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .from_path(path)
            .map_err(|e| MasterError::Unreadable {
                path: path.to_path_buf(),
                message: e.to_string(),
            })?;

        let headers = reader
            .headers()
            .map_err(|e| MasterError::Unreadable {
                path: path.to_path_buf(),
                message: e.to_string(),
            })?
            .clone();

        let column = |name: &'static str| -> Result<usize, MasterError> {
            headers
                .iter()
                .position(|h| h.trim_start_matches('\u{feff}').trim() == name)
                .ok_or_else(|| MasterError::MissingColumn {
                    path: path.to_path_buf(),
                    column: name,
                })
        };

        let id_idx = column(kind.id_column())?;
        let name_idx = column(kind.name_column())?;
        let parent_idx = kind.parent_column().map(column).transpose()?;

        let mut rows = Vec::new();
        for (index, record) in reader.records().enumerate() {
            // header is line 1
            let line = index + 2;
            let record = record.map_err(|e| MasterError::Unreadable {
                path: path.to_path_buf(),
                message: e.to_string(),
            })?;

            let cell = |idx: usize| record.get(idx).unwrap_or("");
            let parse_id = |idx: usize, column: &'static str| -> Result<RowId, MasterError> {
                let raw = cell(idx).trim();
                raw.parse::<RowId>().map_err(|_| MasterError::InvalidId {
                    path: path.to_path_buf(),
                    line,
                    column,
                    value: raw.to_string(),
                })
            };

            let mut row = ReferenceRow::new(parse_id(id_idx, kind.id_column())?, cell(name_idx));
            if let (Some(idx), Some(column)) = (parent_idx, kind.parent_column()) {
                row = row.with_parent(parse_id(idx, column)?);
            }
            rows.push(row);
        }

        debug!("Loaded {} rows from {}", rows.len(), path.display());
        Ok(Self { kind, rows })
    }
}

/// Snapshot of all five master tables for one session
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MasterData {
    pub applicants: ReferenceTable,
    pub locations: ReferenceTable,
    pub patterns: ReferenceTable,
    pub uniforms: ReferenceTable,
    pub sizes: ReferenceTable,
}

impl MasterData {
    /// Load every master table from `dir`, failing on the first problem
    pub fn load(dir: &Path) -> Result<Self, MasterError> {
        if !dir.is_dir() {
            return Err(MasterError::DirectoryNotFound {
                path: dir.to_path_buf(),
            });
        }

        let load = |kind: TableKind| ReferenceTable::load(kind, &dir.join(kind.file_name()));

        let data = Self {
            applicants: load(TableKind::Applicants)?,
            locations: load(TableKind::Locations)?,
            patterns: load(TableKind::Patterns)?,
            uniforms: load(TableKind::Uniforms)?,
            sizes: load(TableKind::Sizes)?,
        };

        info!(
            applicants = data.applicants.len(),
            locations = data.locations.len(),
            patterns = data.patterns.len(),
            uniforms = data.uniforms.len(),
            sizes = data.sizes.len(),
            "Master data loaded from {}",
            dir.display()
        );

        Ok(data)
    }

    pub fn table(&self, kind: TableKind) -> &ReferenceTable {
        match kind {
            TableKind::Applicants => &self.applicants,
            TableKind::Locations => &self.locations,
            TableKind::Patterns => &self.patterns,
            TableKind::Uniforms => &self.uniforms,
            TableKind::Sizes => &self.sizes,
        }
    }
}

/// Fatal errors raised while loading master data
#[derive(Debug, Error, Diagnostic)]
pub enum MasterError {
    #[error("Master data directory not found: {}", path.display())]
    #[diagnostic(
        code(uniform_request::master::no_directory),
        help("Run 'uniform-request init' to create sample master files, or pass --master-dir")
    )]
    DirectoryNotFound { path: PathBuf },

    #[error("Master file for {table} not found: {}", path.display())]
    #[diagnostic(code(uniform_request::master::not_found))]
    NotFound { table: TableKind, path: PathBuf },

    #[error("Cannot read master file {}: {message}", path.display())]
    #[diagnostic(code(uniform_request::master::unreadable))]
    Unreadable { path: PathBuf, message: String },

    #[error("Master file {} is missing required column '{column}'", path.display())]
    #[diagnostic(code(uniform_request::master::missing_column))]
    MissingColumn { path: PathBuf, column: &'static str },

    #[error("Invalid {column} '{value}' in {} at line {line}", path.display())]
    #[diagnostic(
        code(uniform_request::master::invalid_id),
        help("Identifiers must be integers")
    )]
    InvalidId {
        path: PathBuf,
        line: usize,
        column: &'static str,
        value: String,
    },
}
