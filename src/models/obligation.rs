//! Teaching obligation model.
//!
//! An obligation is the unit of work to be scheduled: one course, taught
//! by one teacher to one cohort, during one term. It is created by
//! external collaborators (bulk import, manual entry) and is read-only
//! to the engine.

use serde::{Deserialize, Serialize};

/// A teaching obligation.
///
/// The number of weekly occurrences it needs is a property of its course
/// (`Course::total_occurrences`), not of the obligation itself.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TeachingObligation {
    /// Unique obligation identifier.
    pub id: String,
    /// Cohort attending.
    pub cohort_id: String,
    /// Course taught.
    pub course_id: String,
    /// Teacher in charge.
    pub teacher_id: String,
    /// Term the obligation belongs to.
    pub term_id: String,
    /// Mandatory course (placed ahead of electives).
    pub is_core: bool,
    /// Expected number of attendees (minimum room capacity).
    pub expected_attendees: u32,
}

impl TeachingObligation {
    /// Creates a new obligation.
    pub fn new(
        id: impl Into<String>,
        cohort_id: impl Into<String>,
        course_id: impl Into<String>,
        teacher_id: impl Into<String>,
        term_id: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            cohort_id: cohort_id.into(),
            course_id: course_id.into(),
            teacher_id: teacher_id.into(),
            term_id: term_id.into(),
            is_core: false,
            expected_attendees: 0,
        }
    }

    /// Marks the obligation as core.
    pub fn core(mut self) -> Self {
        self.is_core = true;
        self
    }

    /// Sets the expected attendee count.
    pub fn with_attendees(mut self, attendees: u32) -> Self {
        self.expected_attendees = attendees;
        self
    }
}
