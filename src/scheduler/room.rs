//! Room matching.
//!
//! # Algorithm
//!
//! 1. Drop rooms the ledger lists as busy at (week, slot).
//! 2. Drop rooms seating fewer than the required attendees.
//! 3. Split the rest into rooms suited to the course category and others.
//! 4. Choose uniformly at random among suited rooms, else among others.
//!
//! The choice is random: identical input may yield different (equally
//! valid) rooms unless the RNG is seeded.

use rand::Rng;
use rand::prelude::IndexedRandom;

use crate::ledger::ResourceLedger;
use crate::models::{CourseCategory, Room, Snapshot};

/// Selects a free, large-enough room, preferring the right category.
#[derive(Debug, Clone)]
pub struct RoomMatcher<'a> {
    rooms: Vec<&'a Room>,
}

impl<'a> RoomMatcher<'a> {
    /// Creates a matcher over every room of a snapshot.
    pub fn new(snapshot: &'a Snapshot) -> Self {
        Self {
            rooms: snapshot.rooms.values().collect(),
        }
    }

    /// Creates a matcher over an explicit room list.
    pub fn from_rooms(rooms: Vec<&'a Room>) -> Self {
        Self { rooms }
    }

    /// Finds a room, or `None` if no free room seats `required_capacity`.
    pub fn find<R: Rng>(
        &self,
        ledger: &ResourceLedger,
        week: u32,
        slot_id: &str,
        required_capacity: u32,
        category: CourseCategory,
        rng: &mut R,
    ) -> Option<&'a Room> {
        let busy = ledger.busy_rooms(week, slot_id);
        let (suited, other): (Vec<&'a Room>, Vec<&'a Room>) = self
            .rooms
            .iter()
            .copied()
            .filter(|r| !busy.contains(r.id.as_str()))
            .filter(|r| r.fits(required_capacity))
            .partition(|r| r.suits(category));

        if !suited.is_empty() {
            return suited.choose(rng).copied();
        }
        other.choose(rng).copied()
    }

    /// Number of rooms considered.
    pub fn room_count(&self) -> usize {
        self.rooms.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ledger::ResourceKind;
    use rand::SeedableRng;
    use rand::rngs::SmallRng;

    fn rooms() -> Vec<Room> {
        vec![
            Room::lecture("H1", 100),
            Room::lecture("H2", 40),
            Room::lab("L1", 30),
            Room::lab("L2", 60),
        ]
    }

    #[test]
    fn test_prefers_category() {
        let all = rooms();
        let matcher = RoomMatcher::from_rooms(all.iter().collect());
        let ledger = ResourceLedger::new();

        for seed in 0..30 {
            let mut rng = SmallRng::seed_from_u64(seed);
            let r = matcher
                .find(&ledger, 1, "s1", 20, CourseCategory::Lab, &mut rng)
                .unwrap();
            assert!(r.id == "L1" || r.id == "L2", "got {}", r.id);
        }
    }

    #[test]
    fn test_capacity_filter() {
        let all = rooms();
        let matcher = RoomMatcher::from_rooms(all.iter().collect());
        let ledger = ResourceLedger::new();

        for seed in 0..30 {
            let mut rng = SmallRng::seed_from_u64(seed);
            let r = matcher
                .find(&ledger, 1, "s1", 50, CourseCategory::Lecture, &mut rng)
                .unwrap();
            assert_eq!(r.id, "H1");
        }
    }

    #[test]
    fn test_falls_back_to_other_category() {
        let all = rooms();
        let matcher = RoomMatcher::from_rooms(all.iter().collect());
        let ledger = ResourceLedger::new();
        let mut rng = SmallRng::seed_from_u64(3);

        // Only lecture halls seat 90
        let r = matcher
            .find(&ledger, 1, "s1", 90, CourseCategory::Lab, &mut rng)
            .unwrap();
        assert_eq!(r.id, "H1");
    }

    #[test]
    fn test_skips_booked_rooms() {
        let all = rooms();
        let matcher = RoomMatcher::from_rooms(all.iter().collect());
        let mut ledger = ResourceLedger::new();
        ledger.book(ResourceKind::Room, "L1", 1, "s1");
        ledger.book(ResourceKind::Room, "L2", 1, "s1");
        let mut rng = SmallRng::seed_from_u64(0);

        // Labs taken in week 1 → a hall is used instead
        let r = matcher
            .find(&ledger, 1, "s1", 10, CourseCategory::Lab, &mut rng)
            .unwrap();
        assert!(r.id.starts_with('H'));

        // Week 2 is unaffected
        let r = matcher
            .find(&ledger, 2, "s1", 10, CourseCategory::Lab, &mut rng)
            .unwrap();
        assert!(r.id.starts_with('L'));
    }

    #[test]
    fn test_busy_elsewhere_does_not_block() {
        let all = rooms();
        let matcher = RoomMatcher::from_rooms(all.iter().collect());
        let mut ledger = ResourceLedger::new();
        // H1 is taken in another slot and another week only
        ledger.book(ResourceKind::Room, "H1", 1, "s2");
        ledger.book(ResourceKind::Room, "H1", 2, "s1");
        // A teacher with a room's id does not make the room busy
        ledger.book(ResourceKind::Teacher, "H1", 1, "s1");

        for seed in 0..10 {
            let mut rng = SmallRng::seed_from_u64(seed);
            let r = matcher
                .find(&ledger, 1, "s1", 90, CourseCategory::Lecture, &mut rng)
                .unwrap();
            assert_eq!(r.id, "H1");
        }

        ledger.book(ResourceKind::Room, "H1", 1, "s1");
        let mut rng = SmallRng::seed_from_u64(0);
        assert!(matcher
            .find(&ledger, 1, "s1", 90, CourseCategory::Lecture, &mut rng)
            .is_none());
    }

    #[test]
    fn test_none_when_nothing_fits() {
        let all = rooms();
        let matcher = RoomMatcher::from_rooms(all.iter().collect());
        let ledger = ResourceLedger::new();
        let mut rng = SmallRng::seed_from_u64(0);
        assert!(matcher
            .find(&ledger, 1, "s1", 500, CourseCategory::Lecture, &mut rng)
            .is_none());
    }

    #[test]
    fn test_from_snapshot() {
        let snapshot = Snapshot::new().with_room(Room::lecture("H1", 10));
        assert_eq!(RoomMatcher::new(&snapshot).room_count(), 1);
    }
}
