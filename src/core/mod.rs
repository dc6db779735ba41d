//! Core module - master data, form logic and the request session

pub mod config;
pub mod digits;
pub mod entry;
pub mod export;
pub mod form;
pub mod master;
pub mod selection;
pub mod selector;
pub mod session;
pub mod validate;

pub use config::{Config, ConfigError};
pub use digits::normalize_digits;
pub use entry::{Entry, EntryError};
pub use export::{Export, ExportError};
pub use form::Form;
pub use master::{MasterData, MasterError, ReferenceRow, ReferenceTable, RowId, TableKind};
pub use selection::{Field, PendingSelection};
pub use selector::{options_for, resolve, Selector, PLACEHOLDER};
pub use session::{transition, Action, Outcome, Phase, Session, SessionError};
pub use validate::{FormCheck, FormWarning, QuantityCheck, QuantityPolicy};
