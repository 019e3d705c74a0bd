//! Timetable (solution) model.
//!
//! A timetable is the ordered list of placements produced by a run,
//! together with the conflicts recorded while producing it. Conflicts are
//! diagnostics, not errors: the run continues past every one of them.
//!
//! # Reference
//! Schaerf (1999), "A Survey of Automated Timetabling", Sec. 3

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

use super::{Slot, Weekday};

/// A complete timetable for one term.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Timetable {
    /// Placements in generation order.
    pub placements: Vec<Placement>,
    /// Conflicts recorded during generation.
    pub conflicts: Vec<Conflict>,
}

/// One meeting of an obligation: a room and slot in a given week.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Placement {
    /// Storage id, assigned on persistence.
    pub id: Option<u64>,
    /// Term.
    pub term_id: String,
    /// Cohort attending (denormalized for query convenience).
    pub cohort_id: String,
    /// Course taught.
    pub course_id: String,
    /// Teacher in charge.
    pub teacher_id: String,
    /// Room used.
    pub room_id: String,
    /// Weekly slot.
    pub slot_id: String,
    /// Week number (1-based).
    pub week: u32,
    /// Source obligation.
    pub obligation_id: String,
}

/// A recorded placement failure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Conflict {
    /// Cohort being scheduled.
    pub cohort_id: String,
    /// Week of the attempt.
    pub week: u32,
    /// Slot of the attempt.
    pub slot_id: String,
    /// Weekday of the slot.
    pub weekday: Weekday,
    /// Period of the slot.
    pub period: u32,
    /// Obligation that could not be placed.
    pub obligation_id: String,
    /// What went wrong.
    pub kind: ConflictKind,
    /// Human-readable description.
    pub message: String,
}

/// Classification of placement failures.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ConflictKind {
    /// The teacher asked to avoid this slot.
    TeacherPreference,
    /// The teacher already teaches in this week/slot.
    TeacherBusy,
    /// The room is already occupied in this week/slot.
    RoomBusy,
    /// The cohort already attends something in this week/slot.
    CohortBusy,
    /// No free room seats the expected attendees.
    NoRoom {
        /// Seats needed.
        required_capacity: u32,
    },
    /// A template entry could not be repeated in a later week.
    ReplicationConflict {
        teacher_busy: bool,
        room_busy: bool,
        cohort_busy: bool,
    },
}

impl fmt::Display for ConflictKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TeacherPreference => f.write_str("teacher preference (avoid)"),
            Self::TeacherBusy => f.write_str("teacher already booked"),
            Self::RoomBusy => f.write_str("room already booked"),
            Self::CohortBusy => f.write_str("cohort already booked"),
            Self::NoRoom { required_capacity } => {
                write!(f, "no free room with capacity {required_capacity}")
            }
            Self::ReplicationConflict {
                teacher_busy,
                room_busy,
                cohort_busy,
            } => {
                let mut taken = Vec::new();
                if *teacher_busy {
                    taken.push("teacher");
                }
                if *room_busy {
                    taken.push("room");
                }
                if *cohort_busy {
                    taken.push("cohort");
                }
                write!(f, "template replication conflict: {} taken", taken.join(", "))
            }
        }
    }
}

impl Placement {
    /// Creates an unsaved placement.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        term_id: impl Into<String>,
        cohort_id: impl Into<String>,
        course_id: impl Into<String>,
        teacher_id: impl Into<String>,
        room_id: impl Into<String>,
        slot_id: impl Into<String>,
        week: u32,
        obligation_id: impl Into<String>,
    ) -> Self {
        Self {
            id: None,
            term_id: term_id.into(),
            cohort_id: cohort_id.into(),
            course_id: course_id.into(),
            teacher_id: teacher_id.into(),
            room_id: room_id.into(),
            slot_id: slot_id.into(),
            week,
            obligation_id: obligation_id.into(),
        }
    }

    /// Sets the storage id.
    pub fn with_id(mut self, id: u64) -> Self {
        self.id = Some(id);
        self
    }
}

impl Conflict {
    /// Creates a conflict for an attempt at `slot` in `week`.
    pub fn new(
        cohort_id: impl Into<String>,
        week: u32,
        slot: &Slot,
        obligation_id: impl Into<String>,
        kind: ConflictKind,
    ) -> Self {
        let message = format!("W{week} {}: {kind}", slot.label());
        Self {
            cohort_id: cohort_id.into(),
            week,
            slot_id: slot.id.clone(),
            weekday: slot.weekday,
            period: slot.period,
            obligation_id: obligation_id.into(),
            kind,
            message,
        }
    }

    /// Whether this conflict was raised while replicating a template.
    pub fn is_replication(&self) -> bool {
        matches!(self.kind, ConflictKind::ReplicationConflict { .. })
    }
}

impl Timetable {
    /// Creates an empty timetable.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a placement.
    pub fn add_placement(&mut self, placement: Placement) {
        self.placements.push(placement);
    }

    /// Adds a conflict.
    pub fn add_conflict(&mut self, conflict: Conflict) {
        self.conflicts.push(conflict);
    }

    /// Appends another timetable (placements and conflicts, in order).
    pub fn extend(&mut self, other: Timetable) {
        self.placements.extend(other.placements);
        self.conflicts.extend(other.conflicts);
    }

    /// Whether no conflict was recorded.
    pub fn is_clean(&self) -> bool {
        self.conflicts.is_empty()
    }

    /// Number of placements.
    pub fn placement_count(&self) -> usize {
        self.placements.len()
    }

    /// Latest week holding a placement (0 if empty).
    pub fn last_week(&self) -> u32 {
        self.placements.iter().map(|p| p.week).max().unwrap_or(0)
    }

    /// All placements of an obligation.
    pub fn placements_for_obligation(&self, obligation_id: &str) -> Vec<&Placement> {
        self.placements
            .iter()
            .filter(|p| p.obligation_id == obligation_id)
            .collect()
    }

    /// All placements of a cohort.
    pub fn placements_for_cohort(&self, cohort_id: &str) -> Vec<&Placement> {
        self.placements
            .iter()
            .filter(|p| p.cohort_id == cohort_id)
            .collect()
    }

    /// All placements of a teacher.
    pub fn placements_for_teacher(&self, teacher_id: &str) -> Vec<&Placement> {
        self.placements
            .iter()
            .filter(|p| p.teacher_id == teacher_id)
            .collect()
    }

    /// All placements in a room.
    pub fn placements_for_room(&self, room_id: &str) -> Vec<&Placement> {
        self.placements
            .iter()
            .filter(|p| p.room_id == room_id)
            .collect()
    }

    /// All placements in a week.
    pub fn placements_in_week(&self, week: u32) -> Vec<&Placement> {
        self.placements.iter().filter(|p| p.week == week).collect()
    }

    /// All conflicts recorded for an obligation.
    pub fn conflicts_for_obligation(&self, obligation_id: &str) -> Vec<&Conflict> {
        self.conflicts
            .iter()
            .filter(|c| c.obligation_id == obligation_id)
            .collect()
    }

    /// Placement count per obligation.
    pub fn occurrences_by_obligation(&self) -> HashMap<String, u32> {
        let mut counts: HashMap<String, u32> = HashMap::new();
        for p in &self.placements {
            *counts.entry(p.obligation_id.clone()).or_insert(0) += 1;
        }
        counts
    }
}
