//! Resource models.
//!
//! Resources are the entities that can be double-booked: teachers, rooms
//! and cohorts. Each of them may hold at most one placement per
//! (week, slot).
//!
//! # Reference
//! Schaerf (1999), "A Survey of Automated Timetabling", Sec. 2

use serde::{Deserialize, Serialize};

use super::CourseCategory;

/// A physical room.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Room {
    /// Unique room identifier.
    pub id: String,
    /// Human-readable name (e.g., "Science-101").
    pub name: String,
    /// Number of seats.
    pub capacity: u32,
    /// What kind of teaching the room is equipped for.
    pub category: RoomCategory,
}

/// Room classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RoomCategory {
    /// Ordinary classroom or lecture hall.
    LectureSuited,
    /// Laboratory.
    LabSuited,
}

/// A teacher.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Teacher {
    /// Unique teacher identifier.
    pub id: String,
    /// Display name.
    pub name: String,
}

/// A cohort (the students of one major).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cohort {
    /// Unique cohort identifier.
    pub id: String,
    /// Display name. Cohorts are processed in ascending name order.
    pub name: String,
}

impl Room {
    /// Creates a new room.
    pub fn new(id: impl Into<String>, capacity: u32, category: RoomCategory) -> Self {
        Self {
            id: id.into(),
            name: String::new(),
            capacity,
            category,
        }
    }

    /// Creates a lecture-suited room.
    pub fn lecture(id: impl Into<String>, capacity: u32) -> Self {
        Self::new(id, capacity, RoomCategory::LectureSuited)
    }

    /// Creates a lab-suited room.
    pub fn lab(id: impl Into<String>, capacity: u32) -> Self {
        Self::new(id, capacity, RoomCategory::LabSuited)
    }

    /// Sets the room name.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Whether the room seats at least `attendees`.
    #[inline]
    pub fn fits(&self, attendees: u32) -> bool {
        self.capacity >= attendees
    }

    /// Whether the room is the preferred kind for a course category.
    #[inline]
    pub fn suits(&self, category: CourseCategory) -> bool {
        self.category == category.preferred_room()
    }
}

impl Teacher {
    /// Creates a new teacher.
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
        }
    }
}

impl Cohort {
    /// Creates a new cohort.
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
        }
    }
}
