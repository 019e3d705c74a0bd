//! Teacher scheduling preferences.
//!
//! An avoid preference excludes one slot for one teacher in one term. It
//! is a hard constraint: no placement may ever put that teacher in that
//! slot. After a run, preferences are stamped `Applied`.

use serde::{Deserialize, Serialize};

/// A teacher's request not to teach in a slot during a term.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AvoidPreference {
    /// Unique preference identifier.
    pub id: String,
    /// Teacher making the request.
    pub teacher_id: String,
    /// Term the request applies to.
    pub term_id: String,
    /// Slot to keep free.
    pub slot_id: String,
    /// Lifecycle status.
    pub status: PreferenceStatus,
    /// Free-text justification.
    pub reason: Option<String>,
}

/// Preference lifecycle status.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PreferenceStatus {
    /// Submitted, not yet reviewed.
    #[default]
    Pending,
    /// Reviewed and accepted.
    Approved,
    /// Consumed by a scheduling run.
    Applied,
}

impl AvoidPreference {
    /// Creates a pending avoid preference.
    pub fn new(
        id: impl Into<String>,
        teacher_id: impl Into<String>,
        term_id: impl Into<String>,
        slot_id: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            teacher_id: teacher_id.into(),
            term_id: term_id.into(),
            slot_id: slot_id.into(),
            status: PreferenceStatus::Pending,
            reason: None,
        }
    }

    /// Sets the status.
    pub fn with_status(mut self, status: PreferenceStatus) -> Self {
        self.status = status;
        self
    }

    /// Sets the reason.
    pub fn with_reason(mut self, reason: impl Into<String>) -> Self {
        self.reason = Some(reason.into());
        self
    }

    /// Whether this preference excludes `slot_id` for `teacher_id` in `term_id`.
    pub fn excludes(&self, teacher_id: &str, term_id: &str, slot_id: &str) -> bool {
        self.teacher_id == teacher_id && self.term_id == term_id && self.slot_id == slot_id
    }
}
