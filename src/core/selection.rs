//! In-progress form state
//!
//! [`PendingSelection`] holds what the user has picked so far. Selecting a
//! new parent value clears the dependent fields below it, so a stale uniform
//! or size never survives a pattern change.

use serde::{Deserialize, Serialize};

use crate::core::master::TableKind;
use crate::core::selector::PLACEHOLDER;

/// The five dropdown fields of the form
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Field {
    Applicant,
    Location,
    Pattern,
    Uniform,
    Size,
}

impl Field {
    /// All fields in form order (parents before children)
    pub fn all() -> &'static [Field] {
        &[
            Field::Applicant,
            Field::Location,
            Field::Pattern,
            Field::Uniform,
            Field::Size,
        ]
    }

    /// Master table backing this field
    pub fn table(&self) -> TableKind {
        match self {
            Field::Applicant => TableKind::Applicants,
            Field::Location => TableKind::Locations,
            Field::Pattern => TableKind::Patterns,
            Field::Uniform => TableKind::Uniforms,
            Field::Size => TableKind::Sizes,
        }
    }

    /// Field whose value scopes this field's options
    pub fn parent(&self) -> Option<Field> {
        match self {
            Field::Uniform => Some(Field::Pattern),
            Field::Size => Some(Field::Uniform),
            _ => None,
        }
    }

    /// Fields whose option sets depend on this one, nearest first
    pub fn dependents(&self) -> &'static [Field] {
        match self {
            Field::Pattern => &[Field::Uniform, Field::Size],
            Field::Uniform => &[Field::Size],
            _ => &[],
        }
    }

    /// Form label, also used as the export column header
    pub fn label(&self) -> &'static str {
        match self {
            Field::Applicant => "起票",
            Field::Location => "施設",
            Field::Pattern => "制服パターン",
            Field::Uniform => "制服名",
            Field::Size => "サイズ",
        }
    }
}

impl std::fmt::Display for Field {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Field::Applicant => write!(f, "applicant"),
            Field::Location => write!(f, "location"),
            Field::Pattern => write!(f, "pattern"),
            Field::Uniform => write!(f, "uniform"),
            Field::Size => write!(f, "size"),
        }
    }
}

/// The form as currently filled in
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PendingSelection {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub applicant: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pattern: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uniform: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<String>,
    #[serde(default)]
    pub quantity_raw: String,
    #[serde(default)]
    pub user_name_raw: String,
}

impl PendingSelection {
    pub fn new() -> Self {
        Self::default()
    }

    /// An empty form with the applicant pre-filled
    pub fn prefilled(applicant: Option<String>) -> Self {
        Self {
            applicant,
            ..Self::default()
        }
    }

    /// Current value of a dropdown field
    pub fn get(&self, field: Field) -> Option<&str> {
        self.slot(field).as_deref()
    }

    fn slot(&self, field: Field) -> &Option<String> {
        match field {
            Field::Applicant => &self.applicant,
            Field::Location => &self.location,
            Field::Pattern => &self.pattern,
            Field::Uniform => &self.uniform,
            Field::Size => &self.size,
        }
    }

    fn slot_mut(&mut self, field: Field) -> &mut Option<String> {
        match field {
            Field::Applicant => &mut self.applicant,
            Field::Location => &mut self.location,
            Field::Pattern => &mut self.pattern,
            Field::Uniform => &mut self.uniform,
            Field::Size => &mut self.size,
        }
    }

    /// Select a value for a field, clearing its dependents if it changed
    ///
    /// `None` and the placeholder both mean "unselected". Returns `true`
    /// when the stored value changed.
    pub fn select(&mut self, field: Field, value: Option<String>) -> bool {
        let value = value.filter(|v| v != PLACEHOLDER);
        if *self.slot(field) == value {
            return false;
        }

        *self.slot_mut(field) = value;
        for dependent in field.dependents() {
            *self.slot_mut(*dependent) = None;
        }
        true
    }

    /// Drop a field's value without touching its dependents
    pub(crate) fn unset(&mut self, field: Field) {
        *self.slot_mut(field) = None;
    }

    pub fn set_quantity(&mut self, raw: impl Into<String>) {
        self.quantity_raw = raw.into();
    }

    pub fn set_user_name(&mut self, raw: impl Into<String>) {
        self.user_name_raw = raw.into();
    }

    /// Reset every field to empty
    pub fn clear(&mut self) {
        *self = Self::default();
    }

    /// Whether any dropdown or text field has a value
    pub fn is_touched(&self) -> bool {
        Field::all().iter().any(|f| self.get(*f).is_some())
            || !self.quantity_raw.is_empty()
            || !self.user_name_raw.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn full() -> PendingSelection {
        PendingSelection {
            applicant: Some("Tanaka".into()),
            location: Some("HQ".into()),
            pattern: Some("Summer".into()),
            uniform: Some("Shirt-M".into()),
            size: Some("M".into()),
            quantity_raw: "2".into(),
            user_name_raw: "Suzuki".into(),
        }
    }

    #[test]
    fn test_pattern_change_resets_uniform_and_size() {
        let mut pending = full();
        assert!(pending.select(Field::Pattern, Some("Winter".into())));
        assert_eq!(pending.get(Field::Pattern), Some("Winter"));
        assert_eq!(pending.get(Field::Uniform), None);
        assert_eq!(pending.get(Field::Size), None);
        assert_eq!(pending.get(Field::Location), Some("HQ"));
    }

    #[test]
    fn test_uniform_change_resets_size_only() {
        let mut pending = full();
        pending.select(Field::Uniform, Some("Polo".into()));
        assert_eq!(pending.get(Field::Pattern), Some("Summer"));
        assert_eq!(pending.get(Field::Size), None);
    }

    #[test]
    fn test_reselecting_same_value_keeps_children() {
        let mut pending = full();
        assert!(!pending.select(Field::Pattern, Some("Summer".into())));
        assert_eq!(pending.get(Field::Uniform), Some("Shirt-M"));
        assert_eq!(pending.get(Field::Size), Some("M"));
    }

    #[test]
    fn test_placeholder_means_unselected() {
        let mut pending = full();
        pending.select(Field::Pattern, Some(PLACEHOLDER.to_string()));
        assert_eq!(pending.get(Field::Pattern), None);
        assert_eq!(pending.get(Field::Uniform), None);
    }

    #[test]
    fn test_leaf_change_touches_nothing_else() {
        let mut pending = full();
        pending.select(Field::Applicant, Some("Sato".into()));
        assert_eq!(pending.get(Field::Size), Some("M"));
        assert_eq!(pending.quantity_raw, "2");
    }

    #[test]
    fn test_clear_and_prefill() {
        let mut pending = full();
        pending.clear();
        assert_eq!(pending, PendingSelection::default());
        assert!(!pending.is_touched());

        let prefilled = PendingSelection::prefilled(Some("Tanaka".into()));
        assert_eq!(prefilled.get(Field::Applicant), Some("Tanaka"));
        assert!(prefilled.is_touched());
    }

    #[test]
    fn test_field_order_and_labels() {
        assert_eq!(Field::all().len(), 5);
        assert_eq!(Field::Size.parent(), Some(Field::Uniform));
        assert_eq!(Field::Uniform.table(), TableKind::Uniforms);
        assert_eq!(Field::Applicant.label(), "起票");
    }
}
