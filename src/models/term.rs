//! Academic term model.
//!
//! A term spans a closed date range `[start_date, end_date]`. Its length in
//! weeks is derived from the range and bounds every replication pass.
//!
//! # Week Model
//! Weeks are numbered from 1. A partial trailing week counts as a full
//! week: `total_weeks = ceil((end - start + 1 day) / 7 days)`.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// An academic term (semester).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Term {
    /// Unique term identifier.
    pub id: String,
    /// Human-readable name.
    pub name: String,
    /// First day of the term (inclusive).
    pub start_date: NaiveDate,
    /// Last day of the term (inclusive).
    pub end_date: NaiveDate,
}

impl Term {
    /// Creates a new term.
    pub fn new(id: impl Into<String>, start_date: NaiveDate, end_date: NaiveDate) -> Self {
        Self {
            id: id.into(),
            name: String::new(),
            start_date,
            end_date,
        }
    }

    /// Sets the term name.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Number of calendar days covered, inclusive of both ends.
    ///
    /// Returns 0 when the end date precedes the start date.
    pub fn total_days(&self) -> u32 {
        let days = (self.end_date - self.start_date).num_days() + 1;
        u32::try_from(days).unwrap_or(0)
    }

    /// Number of teaching weeks (0 for an inverted date range).
    pub fn total_weeks(&self) -> u32 {
        self.total_days().div_ceil(7)
    }

    /// Whether `week` (1-based) falls inside this term.
    #[inline]
    pub fn contains_week(&self, week: u32) -> bool {
        week >= 1 && week <= self.total_weeks()
    }

    /// Display label: the name, or the id when unnamed.
    pub fn label(&self) -> &str {
        if self.name.is_empty() {
            &self.id
        } else {
            &self.name
        }
    }
}
