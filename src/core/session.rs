//! Request session state machine
//!
//! A session collects entries one at a time (`Collecting`), then moves to a
//! read-only `Reviewing` phase once the last entry is submitted. Only an
//! explicit reset returns it to `Collecting`.
//!
//! ```text
//!   Collecting --append--> Collecting
//!   Collecting --finalize--> Reviewing
//!   Reviewing --reset--> Collecting
//! ```
//!
//! Every user action is an [`Action`]; a rejected action leaves both the
//! session and the pending selection untouched.

use chrono::{DateTime, Local};
use miette::Diagnostic;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info};

use crate::core::entry::{Entry, EntryError};
use crate::core::form::Form;
use crate::core::selection::{Field, PendingSelection};

/// Session phase
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
    #[default]
    Collecting,
    Reviewing,
}

impl Phase {
    /// Message shown when an action is not available in this phase
    pub fn blocked_message(&self) -> &'static str {
        match self {
            Phase::Collecting => "まだ送信されていません",
            Phase::Reviewing => "送信済みです。新しい申請を開始してください",
        }
    }
}

impl std::fmt::Display for Phase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Phase::Collecting => write!(f, "collecting"),
            Phase::Reviewing => write!(f, "reviewing"),
        }
    }
}

/// A single user interaction
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Action {
    /// Choose a dropdown value (`None` = back to the placeholder)
    Select { field: Field, value: Option<String> },
    SetQuantity(String),
    SetUserName(String),
    /// Add the pending entry and keep collecting
    Append,
    /// Add the pending entry and submit the request
    Finalize,
    /// Discard a submitted request and start over
    Reset,
}

impl Action {
    pub fn name(&self) -> &'static str {
        match self {
            Action::Select { .. } => "select",
            Action::SetQuantity(_) => "set_quantity",
            Action::SetUserName(_) => "set_user_name",
            Action::Append => "append",
            Action::Finalize => "finalize",
            Action::Reset => "reset",
        }
    }
}

/// Why an action was ignored
#[derive(Debug, Clone, PartialEq, Eq, Error, Diagnostic)]
pub enum SessionError {
    #[error("{}", .phase.blocked_message())]
    #[diagnostic(code(uniform_request::session::wrong_phase))]
    WrongPhase { action: &'static str, phase: Phase },

    #[error("全項目を入力してください")]
    #[diagnostic(
        code(uniform_request::session::incomplete),
        help("Fill in every field with a numeric quantity before adding")
    )]
    Incomplete,

    #[error(transparent)]
    #[diagnostic(transparent)]
    Entry(#[from] EntryError),
}

/// Result of applying an [`Action`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// The pending selection changed
    Updated { cleared: Vec<Field> },
    /// An entry was added; `count` entries are now collected
    Appended { count: usize },
    /// The last entry was added and the request submitted
    Finalized { count: usize },
    /// The session was emptied and is collecting again
    Reset,
    /// Nothing changed
    Ignored(SessionError),
}

/// In-memory state of one request session
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Session {
    entries: Vec<Entry>,
    last_applicant: Option<String>,
    phase: Phase,
    finalized_at: Option<DateTime<Local>>,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn entries(&self) -> &[Entry] {
        &self.entries
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn is_submitted(&self) -> bool {
        self.phase == Phase::Reviewing
    }

    /// Applicant pre-filled into the next pending entry
    pub fn last_applicant(&self) -> Option<&str> {
        self.last_applicant.as_deref()
    }

    /// When the request was submitted
    pub fn finalized_at(&self) -> Option<DateTime<Local>> {
        self.finalized_at
    }

    fn require(&self, phase: Phase, action: &'static str) -> Result<(), SessionError> {
        if self.phase == phase {
            Ok(())
        } else {
            Err(SessionError::WrongPhase {
                action,
                phase: self.phase,
            })
        }
    }

    /// Validate and build the pending entry without mutating anything
    fn prepare(
        &self,
        pending: &PendingSelection,
        form: &Form<'_>,
        action: &'static str,
    ) -> Result<Entry, SessionError> {
        self.require(Phase::Collecting, action)?;
        if !form.check(pending).all_fields_filled {
            return Err(SessionError::Incomplete);
        }
        Ok(form.build_entry(pending)?)
    }

    /// Add the pending entry and keep collecting
    ///
    /// The pending selection is cleared except for the applicant, which is
    /// carried over for the next line item. Returns the new entry count.
    pub fn append(
        &mut self,
        pending: &mut PendingSelection,
        form: &Form<'_>,
    ) -> Result<usize, SessionError> {
        let entry = self.prepare(pending, form, "append")?;
        let applicant = entry.applicant_name.clone();

        self.entries.push(entry);
        *pending = PendingSelection::prefilled(Some(applicant.clone()));
        self.last_applicant = Some(applicant);

        debug!(count = self.entries.len(), "Entry appended");
        Ok(self.entries.len())
    }

    /// Add the pending entry and submit, stamping the current local time
    pub fn finalize(
        &mut self,
        pending: &mut PendingSelection,
        form: &Form<'_>,
    ) -> Result<usize, SessionError> {
        self.finalize_at(pending, form, Local::now())
    }

    /// Add the pending entry and submit with an explicit timestamp
    pub fn finalize_at(
        &mut self,
        pending: &mut PendingSelection,
        form: &Form<'_>,
        at: DateTime<Local>,
    ) -> Result<usize, SessionError> {
        let entry = self.prepare(pending, form, "finalize")?;

        self.entries.push(entry);
        self.phase = Phase::Reviewing;
        self.last_applicant = None;
        self.finalized_at = Some(at);
        pending.clear();

        info!(count = self.entries.len(), "Request submitted");
        Ok(self.entries.len())
    }

    /// Discard a submitted request
    pub fn reset(&mut self, pending: &mut PendingSelection) -> Result<(), SessionError> {
        self.require(Phase::Reviewing, "reset")?;

        self.entries.clear();
        self.last_applicant = None;
        self.finalized_at = None;
        self.phase = Phase::Collecting;
        pending.clear();

        debug!("Session reset");
        Ok(())
    }

    /// Apply one user action
    pub fn apply(
        &mut self,
        pending: &mut PendingSelection,
        action: Action,
        form: &Form<'_>,
    ) -> Outcome {
        let name = action.name();
        let result = match action {
            Action::Select { field, value } => self.require(Phase::Collecting, name).map(|_| {
                pending.select(field, value);
                Outcome::Updated {
                    cleared: form.reconcile(pending),
                }
            }),
            Action::SetQuantity(raw) => self.require(Phase::Collecting, name).map(|_| {
                pending.set_quantity(raw);
                Outcome::Updated { cleared: vec![] }
            }),
            Action::SetUserName(raw) => self.require(Phase::Collecting, name).map(|_| {
                pending.set_user_name(raw);
                Outcome::Updated { cleared: vec![] }
            }),
            Action::Append => self
                .append(pending, form)
                .map(|count| Outcome::Appended { count }),
            Action::Finalize => self
                .finalize(pending, form)
                .map(|count| Outcome::Finalized { count }),
            Action::Reset => self.reset(pending).map(|_| Outcome::Reset),
        };

        result.unwrap_or_else(|err| {
            debug!(action = name, reason = %err, "Action ignored");
            Outcome::Ignored(err)
        })
    }
}

/// Pure transition: consume a session and pending selection, return the next ones
pub fn transition(
    mut session: Session,
    mut pending: PendingSelection,
    action: Action,
    form: &Form<'_>,
) -> (Session, PendingSelection, Outcome) {
    let outcome = session.apply(&mut pending, action, form);
    (session, pending, outcome)
}
