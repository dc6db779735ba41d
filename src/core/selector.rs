//! Cascading dropdown options
//!
//! Each dropdown offers the placeholder followed by the names of its master
//! rows. Uniforms are scoped to the selected pattern and sizes to the selected
//! uniform; without a resolved parent a dependent dropdown offers only the
//! placeholder.

use tracing::debug;

use crate::core::master::{MasterData, ReferenceTable, RowId};
use crate::core::selection::{Field, PendingSelection};

/// The "unselected" option shown first in every dropdown
pub const PLACEHOLDER: &str = "--- 選択 ---";

/// Display names for a dropdown, placeholder first
///
/// When `parent_id` is given only rows linked to that parent are listed.
pub fn options_for(table: &ReferenceTable, parent_id: Option<RowId>) -> Vec<String> {
    std::iter::once(PLACEHOLDER.to_string())
        .chain(table.rows_for(parent_id).map(|r| r.name.clone()))
        .collect()
}

/// Identifier of the first row named `display_name`
///
/// The placeholder, no selection and an unknown name all resolve to `None`.
pub fn resolve(table: &ReferenceTable, display_name: Option<&str>) -> Option<RowId> {
    let name = display_name.filter(|n| *n != PLACEHOLDER)?;
    table.rows().iter().find(|r| r.name == name).map(|r| r.id)
}

/// Resolves form fields against one master data snapshot
#[derive(Debug, Clone, Copy)]
pub struct Selector<'a> {
    master: &'a MasterData,
}

impl<'a> Selector<'a> {
    pub fn new(master: &'a MasterData) -> Self {
        Self { master }
    }

    /// The rows a field may currently choose from
    ///
    /// Returns `None` for a dependent field whose parent is unresolved.
    pub fn scope(&self, field: Field, pending: &PendingSelection) -> Option<ReferenceTable> {
        let table = self.master.table(field.table());
        match field.parent() {
            None => Some(table.clone()),
            Some(parent) => {
                let parent_id = self.resolve(parent, pending)?;
                Some(table.scoped(parent_id))
            }
        }
    }

    /// Dropdown options for a field given the current selections
    pub fn options(&self, field: Field, pending: &PendingSelection) -> Vec<String> {
        match field.parent() {
            None => options_for(self.master.table(field.table()), None),
            Some(parent) => match self.resolve(parent, pending) {
                Some(parent_id) => options_for(self.master.table(field.table()), Some(parent_id)),
                None => vec![PLACEHOLDER.to_string()],
            },
        }
    }

    /// Identifier of a field's current selection within its scope
    pub fn resolve(&self, field: Field, pending: &PendingSelection) -> Option<RowId> {
        let name = pending.get(field)?;
        let scope = self.scope(field, pending)?;
        resolve(&scope, Some(name))
    }

    /// Drop selections that are no longer offered by their dropdown
    ///
    /// Parents are visited before children so a dropped pattern also
    /// drops its uniform and size. Returns the fields that were cleared.
    pub fn reconcile(&self, pending: &mut PendingSelection) -> Vec<Field> {
        let mut cleared = Vec::new();
        for field in Field::all() {
            if pending.get(*field).is_some() && self.resolve(*field, pending).is_none() {
                debug!(field = %field, "Dropping selection missing from current options");
                pending.unset(*field);
                cleared.push(*field);
            }
        }
        cleared
    }
}
