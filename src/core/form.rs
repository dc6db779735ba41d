//! Form context - master data plus the validation policy in force

use crate::core::entry::{Entry, EntryError};
use crate::core::master::MasterData;
use crate::core::selection::{Field, PendingSelection};
use crate::core::selector::Selector;
use crate::core::validate::{self, FormCheck, QuantityPolicy};

/// Everything a session needs to evaluate a pending selection
#[derive(Debug, Clone, Copy)]
pub struct Form<'a> {
    selector: Selector<'a>,
    policy: QuantityPolicy,
}

impl<'a> Form<'a> {
    pub fn new(master: &'a MasterData, policy: QuantityPolicy) -> Self {
        Self {
            selector: Selector::new(master),
            policy,
        }
    }

    /// Dropdown options for a field
    pub fn options(&self, field: Field, pending: &PendingSelection) -> Vec<String> {
        self.selector.options(field, pending)
    }

    /// Validate the pending selection
    pub fn check(&self, pending: &PendingSelection) -> FormCheck {
        validate::check(pending, self.policy)
    }

    /// Clear selections that dropped out of their option sets
    pub fn reconcile(&self, pending: &mut PendingSelection) -> Vec<Field> {
        self.selector.reconcile(pending)
    }

    /// Build an entry from a complete pending selection
    pub fn build_entry(&self, pending: &PendingSelection) -> Result<Entry, EntryError> {
        Entry::from_pending(pending, &self.selector, self.policy)
    }
}
