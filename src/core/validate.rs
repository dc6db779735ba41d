//! Form validation
//!
//! Pure checks over a [`PendingSelection`]: whether the quantity is a
//! number, whether every field is filled, and which inline warning (if any)
//! the form should show.

use serde::{Deserialize, Serialize};

use crate::core::digits::normalize_digits;
use crate::core::selection::{Field, PendingSelection};

/// Rules applied to the quantity field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct QuantityPolicy {
    /// Accept "0" as a quantity
    pub allow_zero: bool,
}

impl Default for QuantityPolicy {
    fn default() -> Self {
        Self { allow_zero: true }
    }
}

/// Result of checking the quantity field
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuantityCheck {
    /// Nothing entered
    Empty,
    /// Entered but not an acceptable number
    Invalid,
    /// All digits, but more than a quantity can hold
    TooLarge,
    /// Normalized digits parsed to this value
    Valid(u32),
}

impl QuantityCheck {
    /// Check a raw quantity after full-width digit normalization
    pub fn of(raw: &str, policy: QuantityPolicy) -> Self {
        if raw.is_empty() {
            return QuantityCheck::Empty;
        }

        let normalized = normalize_digits(raw);
        if normalized.is_empty() || !normalized.bytes().all(|b| b.is_ascii_digit()) {
            return QuantityCheck::Invalid;
        }

        match normalized.parse::<u32>() {
            Ok(0) if !policy.allow_zero => QuantityCheck::Invalid,
            Ok(value) => QuantityCheck::Valid(value),
            Err(_) => QuantityCheck::TooLarge,
        }
    }

    pub fn is_valid(&self) -> bool {
        matches!(self, QuantityCheck::Valid(_))
    }

    pub fn value(&self) -> Option<u32> {
        match self {
            QuantityCheck::Valid(v) => Some(*v),
            _ => None,
        }
    }
}

/// Inline warning shown under the form
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormWarning {
    /// A quantity was entered but is not numeric
    QuantityFormat,
    /// A numeric quantity exceeds `u32::MAX`
    QuantityTooLarge,
    /// Some fields are filled but not all
    Incomplete,
}

impl std::fmt::Display for FormWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FormWarning::QuantityFormat => write!(f, "数量には数字を入力してください"),
            FormWarning::QuantityTooLarge => write!(f, "数量が大きすぎます"),
            FormWarning::Incomplete => write!(f, "全項目を入力してください"),
        }
    }
}

/// Full validation result for one evaluation of the form
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormCheck {
    pub quantity: QuantityCheck,
    pub all_fields_filled: bool,
    pub warning: Option<FormWarning>,
}

/// Validate the pending form
pub fn check(pending: &PendingSelection, policy: QuantityPolicy) -> FormCheck {
    let quantity = QuantityCheck::of(&pending.quantity_raw, policy);

    let all_fields_filled = Field::all().iter().all(|f| pending.get(*f).is_some())
        && quantity.is_valid()
        && !pending.user_name_raw.trim().is_empty();

    let warning = if quantity == QuantityCheck::Invalid {
        Some(FormWarning::QuantityFormat)
    } else if quantity == QuantityCheck::TooLarge {
        Some(FormWarning::QuantityTooLarge)
    } else if !all_fields_filled && pending.is_touched() {
        Some(FormWarning::Incomplete)
    } else {
        None
    };

    FormCheck {
        quantity,
        all_fields_filled,
        warning,
    }
}
