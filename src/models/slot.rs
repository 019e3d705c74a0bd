//! Weekly time slots.
//!
//! The slot grid is fixed for the whole institution and identical every
//! week. Canonical order is `(weekday, period)`.

use std::cmp::Ordering;
use std::fmt;

use chrono::NaiveTime;
use serde::{Deserialize, Serialize};

/// Day of the week, Monday first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Weekday {
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
    Saturday,
    Sunday,
}

impl Weekday {
    /// All weekdays in canonical order.
    pub const ALL: [Weekday; 7] = [
        Weekday::Monday,
        Weekday::Tuesday,
        Weekday::Wednesday,
        Weekday::Thursday,
        Weekday::Friday,
        Weekday::Saturday,
        Weekday::Sunday,
    ];

    /// Three-letter abbreviation.
    pub fn short_name(self) -> &'static str {
        match self {
            Self::Monday => "Mon",
            Self::Tuesday => "Tue",
            Self::Wednesday => "Wed",
            Self::Thursday => "Thu",
            Self::Friday => "Fri",
            Self::Saturday => "Sat",
            Self::Sunday => "Sun",
        }
    }
}

impl fmt::Display for Weekday {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.short_name())
    }
}

/// A recurring weekly time position.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Slot {
    /// Unique slot identifier.
    pub id: String,
    /// Day of the week.
    pub weekday: Weekday,
    /// Period index within the day (1-based).
    pub period: u32,
    /// Start time of day.
    pub start_time: Option<NaiveTime>,
    /// End time of day.
    pub end_time: Option<NaiveTime>,
}

impl Slot {
    /// Creates a new slot.
    pub fn new(id: impl Into<String>, weekday: Weekday, period: u32) -> Self {
        Self {
            id: id.into(),
            weekday,
            period,
            start_time: None,
            end_time: None,
        }
    }

    /// Sets the start and end time of day.
    pub fn with_times(mut self, start: NaiveTime, end: NaiveTime) -> Self {
        self.start_time = Some(start);
        self.end_time = Some(end);
        self
    }

    /// Canonical ordering key.
    #[inline]
    pub fn order_key(&self) -> (Weekday, u32) {
        (self.weekday, self.period)
    }

    /// Compares two slots in canonical order, falling back to id.
    pub fn canonical_cmp(&self, other: &Self) -> Ordering {
        self.order_key()
            .cmp(&other.order_key())
            .then_with(|| self.id.cmp(&other.id))
    }

    /// Label such as `Mon-2`.
    pub fn label(&self) -> String {
        format!("{}-{}", self.weekday, self.period)
    }
}
