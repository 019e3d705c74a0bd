//! Course model.

use serde::{Deserialize, Serialize};

use super::RoomCategory;

/// A course in the catalogue.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Course {
    /// Unique course identifier.
    pub id: String,
    /// Human-readable name.
    pub name: String,
    /// Weekly meetings required over the whole term.
    pub total_occurrences: u32,
    /// Course classification (drives room preference).
    pub category: CourseCategory,
}

/// Course classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CourseCategory {
    /// Theory course, taught in a classroom.
    Lecture,
    /// Practical course, taught in a laboratory.
    Lab,
}

impl CourseCategory {
    /// The room category this kind of course prefers.
    pub fn preferred_room(self) -> RoomCategory {
        match self {
            Self::Lecture => RoomCategory::LectureSuited,
            Self::Lab => RoomCategory::LabSuited,
        }
    }
}

impl Course {
    /// Creates a new course.
    pub fn new(id: impl Into<String>, total_occurrences: u32, category: CourseCategory) -> Self {
        Self {
            id: id.into(),
            name: String::new(),
            total_occurrences,
            category,
        }
    }

    /// Creates a lecture course.
    pub fn lecture(id: impl Into<String>, total_occurrences: u32) -> Self {
        Self::new(id, total_occurrences, CourseCategory::Lecture)
    }

    /// Creates a lab course.
    pub fn lab(id: impl Into<String>, total_occurrences: u32) -> Self {
        Self::new(id, total_occurrences, CourseCategory::Lab)
    }

    /// Sets the course name.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }
}
