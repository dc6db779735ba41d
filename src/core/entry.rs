//! Confirmed line items

use miette::Diagnostic;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::core::master::RowId;
use crate::core::selection::{Field, PendingSelection};
use crate::core::selector::Selector;
use crate::core::validate::{QuantityCheck, QuantityPolicy};

/// One finalized line item of a uniform request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entry {
    pub applicant_id: RowId,
    pub applicant_name: String,
    pub location_id: RowId,
    pub location_name: String,
    pub pattern_id: RowId,
    pub pattern_name: String,
    pub uniform_id: RowId,
    pub uniform_name: String,
    pub size_id: RowId,
    pub size_name: String,
    pub quantity: u32,
    pub user_name: String,
}

/// Why a pending selection could not become an [`Entry`]
#[derive(Debug, Clone, PartialEq, Eq, Error, Diagnostic)]
pub enum EntryError {
    #[error("{}が選択されていません", .0.label())]
    #[diagnostic(code(uniform_request::entry::unselected))]
    Unselected(Field),

    #[error("{}「{name}」は選択肢にありません", .field.label())]
    #[diagnostic(code(uniform_request::entry::unresolved))]
    Unresolved { field: Field, name: String },

    #[error("個数「{0}」は使用できません")]
    #[diagnostic(code(uniform_request::entry::quantity))]
    InvalidQuantity(String),

    #[error("使用者名を入力してください")]
    #[diagnostic(code(uniform_request::entry::user_name))]
    EmptyUserName,
}

impl Entry {
    /// Build an entry, resolving every selection within its current scope
    pub fn from_pending(
        pending: &PendingSelection,
        selector: &Selector<'_>,
        policy: QuantityPolicy,
    ) -> Result<Self, EntryError> {
        let pick = |field: Field| -> Result<(RowId, String), EntryError> {
            let name = pending.get(field).ok_or(EntryError::Unselected(field))?;
            let id = selector
                .resolve(field, pending)
                .ok_or_else(|| EntryError::Unresolved {
                    field,
                    name: name.to_string(),
                })?;
            Ok((id, name.to_string()))
        };

        let (applicant_id, applicant_name) = pick(Field::Applicant)?;
        let (location_id, location_name) = pick(Field::Location)?;
        let (pattern_id, pattern_name) = pick(Field::Pattern)?;
        let (uniform_id, uniform_name) = pick(Field::Uniform)?;
        let (size_id, size_name) = pick(Field::Size)?;

        let quantity = QuantityCheck::of(&pending.quantity_raw, policy)
            .value()
            .ok_or_else(|| EntryError::InvalidQuantity(pending.quantity_raw.clone()))?;

        let user_name = pending.user_name_raw.trim();
        if user_name.is_empty() {
            return Err(EntryError::EmptyUserName);
        }

        Ok(Self {
            applicant_id,
            applicant_name,
            location_id,
            location_name,
            pattern_id,
            pattern_name,
            uniform_id,
            uniform_name,
            size_id,
            size_name,
            quantity,
            user_name: user_name.to_string(),
        })
    }
}
