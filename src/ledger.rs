//! Resource ledger.
//!
//! Records which (teacher, week, slot), (room, week, slot) and
//! (cohort, week, slot) triples are committed. Bookings are only ever
//! added: there is no undo, and a discarded run simply drops its ledger.
//!
//! One ledger is shared by every cohort of a run, so a booking made for
//! an earlier cohort is visible to all later ones.

use std::collections::HashSet;

use crate::models::Placement;

/// The three kinds of resources tracked by the ledger.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResourceKind {
    Teacher,
    Room,
    Cohort,
}

type Booking = (String, u32, String);

/// Occupancy of teachers, rooms and cohorts per (week, slot).
#[derive(Debug, Clone, Default)]
pub struct ResourceLedger {
    teachers: HashSet<Booking>,
    rooms: HashSet<Booking>,
    cohorts: HashSet<Booking>,
}

impl ResourceLedger {
    /// Creates an empty ledger.
    pub fn new() -> Self {
        Self::default()
    }

    fn set(&self, kind: ResourceKind) -> &HashSet<Booking> {
        match kind {
            ResourceKind::Teacher => &self.teachers,
            ResourceKind::Room => &self.rooms,
            ResourceKind::Cohort => &self.cohorts,
        }
    }

    fn set_mut(&mut self, kind: ResourceKind) -> &mut HashSet<Booking> {
        match kind {
            ResourceKind::Teacher => &mut self.teachers,
            ResourceKind::Room => &mut self.rooms,
            ResourceKind::Cohort => &mut self.cohorts,
        }
    }

    /// Whether `id` of `kind` is free at (week, slot).
    pub fn is_free(&self, kind: ResourceKind, id: &str, week: u32, slot_id: &str) -> bool {
        !self
            .set(kind)
            .contains(&(id.to_string(), week, slot_id.to_string()))
    }

    /// Books `id` of `kind` at (week, slot).
    ///
    /// Returns `false` if the triple was already booked.
    pub fn book(&mut self, kind: ResourceKind, id: &str, week: u32, slot_id: &str) -> bool {
        self.set_mut(kind)
            .insert((id.to_string(), week, slot_id.to_string()))
    }

    /// Books the teacher, room and cohort of a placement.
    pub fn book_placement(&mut self, placement: &Placement) {
        let (week, slot) = (placement.week, placement.slot_id.as_str());
        self.book(ResourceKind::Teacher, &placement.teacher_id, week, slot);
        self.book(ResourceKind::Room, &placement.room_id, week, slot);
        self.book(ResourceKind::Cohort, &placement.cohort_id, week, slot);
    }

    /// Rooms occupied at (week, slot).
    pub fn busy_rooms(&self, week: u32, slot_id: &str) -> HashSet<&str> {
        self.rooms
            .iter()
            .filter(|(_, w, s)| *w == week && s == slot_id)
            .map(|(id, _, _)| id.as_str())
            .collect()
    }

    /// Number of bookings of one kind.
    pub fn count(&self, kind: ResourceKind) -> usize {
        self.set(kind).len()
    }

    /// Total number of bookings across all kinds.
    pub fn len(&self) -> usize {
        self.teachers.len() + self.rooms.len() + self.cohorts.len()
    }

    /// Whether nothing is booked.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
