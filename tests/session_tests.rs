//! End-to-end tests of the request session against master files on disk

mod common;

use chrono::{Local, TimeZone};
use common::write_master_files;
use tempfile::TempDir;
use uniform_request::core::{
    normalize_digits, Action, Export, Field, Form, MasterData, Outcome, PendingSelection, Phase,
    QuantityPolicy, Session, SessionError, PLACEHOLDER,
};

fn load_master() -> (TempDir, MasterData) {
    let tmp = TempDir::new().unwrap();
    write_master_files(tmp.path());
    let master = MasterData::load(tmp.path()).unwrap();
    (tmp, master)
}

fn select(field: Field, value: &str) -> Action {
    Action::Select {
        field,
        value: Some(value.to_string()),
    }
}

/// Fill in a complete line item through user actions
fn fill(
    session: &mut Session,
    pending: &mut PendingSelection,
    form: &Form<'_>,
    values: [&str; 7],
) {
    let [applicant, location, pattern, uniform, size, quantity, user] = values;
    for action in [
        select(Field::Applicant, applicant),
        select(Field::Location, location),
        select(Field::Pattern, pattern),
        select(Field::Uniform, uniform),
        select(Field::Size, size),
        Action::SetQuantity(quantity.to_string()),
        Action::SetUserName(user.to_string()),
    ] {
        let outcome = session.apply(pending, action, form);
        assert!(matches!(outcome, Outcome::Updated { .. }), "{outcome:?}");
    }
}

#[test]
fn test_append_scenario_prefills_applicant() {
    let (_tmp, master) = load_master();
    let form = Form::new(&master, QuantityPolicy::default());
    let mut session = Session::new();
    let mut pending = PendingSelection::new();

    fill(
        &mut session,
        &mut pending,
        &form,
        ["Tanaka", "HQ", "Summer", "Shirt-M", "M", "２", "Suzuki"],
    );
    assert!(form.check(&pending).all_fields_filled);

    let outcome = session.apply(&mut pending, Action::Append, &form);
    assert_eq!(outcome, Outcome::Appended { count: 1 });
    assert_eq!(session.phase(), Phase::Collecting);

    let entry = &session.entries()[0];
    assert_eq!(entry.applicant_name, "Tanaka");
    assert_eq!(entry.quantity, 2);
    assert_eq!(entry.user_name, "Suzuki");
    assert_eq!((entry.uniform_id, entry.size_id), (100, 1000));

    assert_eq!(pending.get(Field::Applicant), Some("Tanaka"));
    for field in [Field::Location, Field::Pattern, Field::Uniform, Field::Size] {
        assert_eq!(pending.get(field), None);
    }
    assert!(pending.quantity_raw.is_empty());
    assert!(pending.user_name_raw.is_empty());
}

#[test]
fn test_two_appends_then_finalize_exports_three_rows() {
    let (_tmp, master) = load_master();
    let form = Form::new(&master, QuantityPolicy::default());
    let mut session = Session::new();
    let mut pending = PendingSelection::new();

    fill(&mut session, &mut pending, &form, ["Tanaka", "HQ", "Summer", "Shirt-M", "M", "1", "A"]);
    session.apply(&mut pending, Action::Append, &form);
    fill(&mut session, &mut pending, &form, ["Tanaka", "Osaka", "Summer", "Polo", "M", "2", "B"]);
    session.apply(&mut pending, Action::Append, &form);
    fill(&mut session, &mut pending, &form, ["Sato", "HQ", "Winter", "Jacket", "L", "3", "C"]);

    let outcome = session.apply(&mut pending, Action::Finalize, &form);
    assert_eq!(outcome, Outcome::Finalized { count: 3 });
    assert_eq!(session.phase(), Phase::Reviewing);
    assert_eq!(session.last_applicant(), None);
    assert_eq!(pending, PendingSelection::default());

    let at = Local.with_ymd_and_hms(2025, 1, 2, 3, 4, 5).unwrap();
    let export = Export::render(session.entries(), at).unwrap();
    assert_eq!(export.filename, "uniform_request_20250102-030405.csv");
    assert_eq!(export.csv.lines().count(), 4);

    let lines: Vec<&str> = export.text.lines().collect();
    assert_eq!(lines.len(), 3);
    assert!(lines[0].starts_with("[1] 起票:Tanaka"));
    assert!(lines[1].starts_with("[2] 起票:Tanaka / 施設:Osaka"));
    assert!(lines[2].starts_with("[3] 起票:Sato"));
}

#[test]
fn test_pattern_change_resets_dependents_in_next_evaluation() {
    let (_tmp, master) = load_master();
    let form = Form::new(&master, QuantityPolicy::default());
    let mut session = Session::new();
    let mut pending = PendingSelection::new();

    fill(&mut session, &mut pending, &form, ["Tanaka", "HQ", "Summer", "Polo", "M", "1", "A"]);
    session.apply(&mut pending, select(Field::Pattern, "Winter"), &form);

    assert_eq!(pending.get(Field::Uniform), None);
    assert_eq!(pending.get(Field::Size), None);
    assert_eq!(form.options(Field::Uniform, &pending), vec![PLACEHOLDER, "Jacket"]);
    assert_eq!(form.options(Field::Size, &pending), vec![PLACEHOLDER]);
    assert!(!form.check(&pending).all_fields_filled);
}

#[test]
fn test_gated_actions_are_noops() {
    let (_tmp, master) = load_master();
    let form = Form::new(&master, QuantityPolicy::default());
    let mut session = Session::new();
    let mut pending = PendingSelection::new();

    fill(&mut session, &mut pending, &form, ["Tanaka", "HQ", "Summer", "Polo", "M", "ab12", "A"]);
    let before = pending.clone();

    for action in [Action::Append, Action::Finalize] {
        let outcome = session.apply(&mut pending, action, &form);
        assert_eq!(outcome, Outcome::Ignored(SessionError::Incomplete));
    }
    assert!(session.entries().is_empty());
    assert_eq!(session.phase(), Phase::Collecting);
    assert_eq!(pending, before);
}

#[test]
fn test_reset_from_reviewing_empties_session() {
    let (_tmp, master) = load_master();
    let form = Form::new(&master, QuantityPolicy::default());
    let mut session = Session::new();
    let mut pending = PendingSelection::new();

    fill(&mut session, &mut pending, &form, ["Sato", "HQ", "Winter", "Jacket", "L", "1", "A"]);
    session.apply(&mut pending, Action::Finalize, &form);

    assert_eq!(session.apply(&mut pending, Action::Reset, &form), Outcome::Reset);
    assert!(session.entries().is_empty());
    assert_eq!(session.phase(), Phase::Collecting);
    assert_eq!(session.last_applicant(), None);
}

#[test]
fn test_fullwidth_digits_normalize_digit_for_digit() {
    let fullwidth: String = ('\u{FF10}'..='\u{FF19}').collect();
    let normalized = normalize_digits(&fullwidth);
    assert_eq!(normalized, "0123456789");
    assert_eq!(normalized.chars().count(), fullwidth.chars().count());
}

#[test]
fn test_every_entry_respects_master_links() {
    let (_tmp, master) = load_master();
    let form = Form::new(&master, QuantityPolicy::default());
    let mut session = Session::new();
    let mut pending = PendingSelection::new();

    fill(&mut session, &mut pending, &form, ["Tanaka", "HQ", "Summer", "Polo", "M", "1", "A"]);
    session.apply(&mut pending, Action::Append, &form);
    fill(&mut session, &mut pending, &form, ["Sato", "Osaka", "Winter", "Jacket", "L", "1", "B"]);
    session.apply(&mut pending, Action::Append, &form);

    for entry in session.entries() {
        let uniform = master.uniforms.get(entry.uniform_id).unwrap();
        assert_eq!(uniform.parent_id, Some(entry.pattern_id));
        let size = master.sizes.get(entry.size_id).unwrap();
        assert_eq!(size.parent_id, Some(entry.uniform_id));
    }
}
