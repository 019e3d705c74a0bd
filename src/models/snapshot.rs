//! Reference data snapshot.
//!
//! A snapshot is the read-only input of a run: every term, cohort,
//! teacher, room, course, slot, obligation and avoid preference, keyed by
//! id. It is supplied by an external loader and never mutated by the
//! engine.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};

use super::{
    AvoidPreference, Cohort, Course, Room, Slot, Teacher, TeachingObligation, Term,
};

/// Keyed collections of all reference data.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Snapshot {
    pub terms: BTreeMap<String, Term>,
    pub cohorts: BTreeMap<String, Cohort>,
    pub teachers: BTreeMap<String, Teacher>,
    pub rooms: BTreeMap<String, Room>,
    pub courses: BTreeMap<String, Course>,
    pub slots: BTreeMap<String, Slot>,
    pub obligations: BTreeMap<String, TeachingObligation>,
    pub preferences: BTreeMap<String, AvoidPreference>,
}

impl Snapshot {
    /// Creates an empty snapshot.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a term.
    pub fn with_term(mut self, term: Term) -> Self {
        self.terms.insert(term.id.clone(), term);
        self
    }

    /// Adds a cohort.
    pub fn with_cohort(mut self, cohort: Cohort) -> Self {
        self.cohorts.insert(cohort.id.clone(), cohort);
        self
    }

    /// Adds a teacher.
    pub fn with_teacher(mut self, teacher: Teacher) -> Self {
        self.teachers.insert(teacher.id.clone(), teacher);
        self
    }

    /// Adds a room.
    pub fn with_room(mut self, room: Room) -> Self {
        self.rooms.insert(room.id.clone(), room);
        self
    }

    /// Adds a course.
    pub fn with_course(mut self, course: Course) -> Self {
        self.courses.insert(course.id.clone(), course);
        self
    }

    /// Adds a slot.
    pub fn with_slot(mut self, slot: Slot) -> Self {
        self.slots.insert(slot.id.clone(), slot);
        self
    }

    /// Adds a teaching obligation.
    pub fn with_obligation(mut self, obligation: TeachingObligation) -> Self {
        self.obligations.insert(obligation.id.clone(), obligation);
        self
    }

    /// Adds an avoid preference.
    pub fn with_preference(mut self, preference: AvoidPreference) -> Self {
        self.preferences.insert(preference.id.clone(), preference);
        self
    }

    /// Looks up a term.
    pub fn term(&self, id: &str) -> Option<&Term> {
        self.terms.get(id)
    }

    /// Looks up a cohort.
    pub fn cohort(&self, id: &str) -> Option<&Cohort> {
        self.cohorts.get(id)
    }

    /// Looks up a teacher.
    pub fn teacher(&self, id: &str) -> Option<&Teacher> {
        self.teachers.get(id)
    }

    /// Looks up a room.
    pub fn room(&self, id: &str) -> Option<&Room> {
        self.rooms.get(id)
    }

    /// Looks up a course.
    pub fn course(&self, id: &str) -> Option<&Course> {
        self.courses.get(id)
    }

    /// Looks up a slot.
    pub fn slot(&self, id: &str) -> Option<&Slot> {
        self.slots.get(id)
    }

    /// Weekly occurrences an obligation requires (0 if its course is unknown).
    pub fn required_occurrences(&self, obligation: &TeachingObligation) -> u32 {
        self.course(&obligation.course_id)
            .map(|c| c.total_occurrences)
            .unwrap_or(0)
    }

    /// Slots in canonical `(weekday, period)` order.
    pub fn canonical_slots(&self) -> Vec<&Slot> {
        let mut slots: Vec<&Slot> = self.slots.values().collect();
        slots.sort_by(|a, b| a.canonical_cmp(b));
        slots
    }

    /// Obligations belonging to a term, in id order.
    pub fn obligations_for_term(&self, term_id: &str) -> Vec<&TeachingObligation> {
        self.obligations
            .values()
            .filter(|o| o.term_id == term_id)
            .collect()
    }

    /// Cohort display name, or a placeholder naming the id.
    pub fn cohort_name(&self, id: &str) -> String {
        self.cohort(id)
            .map(|c| c.name.clone())
            .unwrap_or_else(|| format!("unknown cohort {id}"))
    }

    /// Teacher display name, or `?`.
    pub fn teacher_name(&self, id: &str) -> String {
        self.teacher(id)
            .map(|t| t.name.clone())
            .unwrap_or_else(|| "?".to_string())
    }

    /// Course display name, or `?`.
    pub fn course_name(&self, id: &str) -> String {
        self.course(id)
            .map(|c| c.name.clone())
            .unwrap_or_else(|| "?".to_string())
    }

    /// Avoid index for one term: `(teacher_id, slot_id)` pairs.
    pub fn avoid_index(&self, term_id: &str) -> AvoidIndex {
        let pairs = self
            .preferences
            .values()
            .filter(|p| p.term_id == term_id)
            .map(|p| (p.teacher_id.clone(), p.slot_id.clone()))
            .collect();
        AvoidIndex { pairs }
    }

    /// Whether `teacher_id` asked to avoid `slot_id` in `term_id`.
    pub fn is_avoided(&self, teacher_id: &str, term_id: &str, slot_id: &str) -> bool {
        self.preferences
            .values()
            .any(|p| p.excludes(teacher_id, term_id, slot_id))
    }
}

/// Fast `(teacher, slot)` lookup of avoid preferences for a single term.
#[derive(Debug, Clone, Default)]
pub struct AvoidIndex {
    pairs: HashSet<(String, String)>,
}

impl AvoidIndex {
    /// Whether the teacher avoids the slot.
    pub fn contains(&self, teacher_id: &str, slot_id: &str) -> bool {
        self.pairs
            .contains(&(teacher_id.to_string(), slot_id.to_string()))
    }

    /// Number of avoided pairs.
    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    /// Whether no pair is avoided.
    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }
}
