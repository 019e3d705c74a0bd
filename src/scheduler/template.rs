//! Week-1 template construction.
//!
//! Fills the first week of a cohort, slot by slot in canonical order, and
//! freezes every successful `(slot → obligation, room)` pair as the
//! cohort's weekly template.
//!
//! # Candidate Selection
//!
//! For each slot:
//! 1. The **seed mapping** pairs prioritized obligations with the seed
//!    slots (periods `1..=seed_periods` of each day) one to one, in order
//!    (first fit, no wraparound). The seeded obligation is used if it is
//!    still open.
//! 2. Otherwise the first open obligation of the shuffled **fallback pool**
//!    whose teacher does not avoid the slot is taken out of the pool.
//!
//! An obligation is attempted at most once. A failed attempt forfeits it
//! for the whole term; it is never offered again in this pass.
//!
//! # Constraint Check
//!
//! Room matching comes first, then, in order: teacher avoid preference,
//! teacher free, room free, cohort free. The first violation is recorded
//! as a [`Conflict`].

use rand::Rng;
use rand::seq::SliceRandom;
use std::collections::HashMap;
use tracing::debug;

use super::progress::ProgressBook;
use super::room::RoomMatcher;
use crate::ledger::{ResourceKind, ResourceLedger};
use crate::models::{
    AvoidIndex, Conflict, ConflictKind, Placement, Slot, Snapshot, TeachingObligation, Timetable,
    Weekday,
};

/// Week number the template is built in.
pub const TEMPLATE_WEEK: u32 = 1;

/// Periods per day covered by the seed mapping.
pub const DEFAULT_SEED_PERIODS: u32 = 4;

/// One frozen weekly meeting.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemplateEntry {
    pub slot_id: String,
    pub weekday: Weekday,
    pub period: u32,
    pub obligation_id: String,
    pub course_id: String,
    pub teacher_id: String,
    pub room_id: String,
}

impl TemplateEntry {
    /// The slot this entry recurs in.
    pub fn slot(&self) -> Slot {
        Slot::new(&self.slot_id, self.weekday, self.period)
    }
}

/// The weekly template of one cohort, in canonical slot order.
#[derive(Debug, Clone, Default)]
pub struct WeeklyTemplate {
    /// Cohort the template belongs to.
    pub cohort_id: String,
    /// Frozen entries.
    pub entries: Vec<TemplateEntry>,
}

impl WeeklyTemplate {
    /// Creates an empty template.
    pub fn new(cohort_id: impl Into<String>) -> Self {
        Self {
            cohort_id: cohort_id.into(),
            entries: Vec::new(),
        }
    }

    /// Entry frozen at a slot.
    pub fn entry_at(&self, slot_id: &str) -> Option<&TemplateEntry> {
        self.entries.iter().find(|e| e.slot_id == slot_id)
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether nothing was frozen.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Pairs prioritized obligations with canonical slots one to one.
///
/// Obligations that are not open (e.g. zero required occurrences) are
/// skipped. Surplus obligations or surplus slots stay unpaired.
pub fn seed_mapping<'a>(
    prioritized: &[&'a TeachingObligation],
    slots: &[&Slot],
    book: &ProgressBook,
) -> HashMap<String, &'a TeachingObligation> {
    prioritized
        .iter()
        .copied()
        .filter(|o| book.is_open(&o.id))
        .zip(slots)
        .map(|(o, slot)| (slot.id.clone(), o))
        .collect()
}

/// Checks a week-1 attempt against preferences and the ledger.
pub fn check_template_slot(
    avoid: &AvoidIndex,
    ledger: &ResourceLedger,
    obligation: &TeachingObligation,
    room_id: &str,
    slot_id: &str,
) -> Result<(), ConflictKind> {
    if avoid.contains(&obligation.teacher_id, slot_id) {
        return Err(ConflictKind::TeacherPreference);
    }
    if !ledger.is_free(ResourceKind::Teacher, &obligation.teacher_id, TEMPLATE_WEEK, slot_id) {
        return Err(ConflictKind::TeacherBusy);
    }
    if !ledger.is_free(ResourceKind::Room, room_id, TEMPLATE_WEEK, slot_id) {
        return Err(ConflictKind::RoomBusy);
    }
    if !ledger.is_free(ResourceKind::Cohort, &obligation.cohort_id, TEMPLATE_WEEK, slot_id) {
        return Err(ConflictKind::CohortBusy);
    }
    Ok(())
}

/// Builds week-1 templates for the cohorts of one term.
#[derive(Debug, Clone)]
pub struct TemplateBuilder<'a> {
    snapshot: &'a Snapshot,
    term_id: &'a str,
    slots: Vec<&'a Slot>,
    seed_periods: u32,
    avoid: AvoidIndex,
    rooms: RoomMatcher<'a>,
}

impl<'a> TemplateBuilder<'a> {
    /// Creates a builder over a snapshot for one term.
    pub fn new(snapshot: &'a Snapshot, term_id: &'a str) -> Self {
        Self {
            snapshot,
            term_id,
            slots: snapshot.canonical_slots(),
            seed_periods: DEFAULT_SEED_PERIODS,
            avoid: snapshot.avoid_index(term_id),
            rooms: RoomMatcher::new(snapshot),
        }
    }

    /// Sets how many periods per day take part in the seed mapping.
    pub fn with_seed_periods(mut self, seed_periods: u32) -> Self {
        self.seed_periods = seed_periods;
        self
    }

    /// Slots in the order they are filled.
    pub fn slots(&self) -> &[&'a Slot] {
        &self.slots
    }

    /// Fills week 1 for one cohort.
    ///
    /// Placements and conflicts go to `timetable`, bookings to `ledger`,
    /// and state changes to `book`. Returns the frozen template.
    pub fn build<R: Rng>(
        &self,
        cohort_id: &str,
        prioritized: &[&'a TeachingObligation],
        book: &mut ProgressBook,
        ledger: &mut ResourceLedger,
        timetable: &mut Timetable,
        rng: &mut R,
    ) -> WeeklyTemplate {
        let seed_slots: Vec<&Slot> = self
            .slots
            .iter()
            .copied()
            .filter(|s| s.period <= self.seed_periods)
            .collect();
        let seeds = seed_mapping(prioritized, &seed_slots, book);

        let mut pool: Vec<&TeachingObligation> = prioritized
            .iter()
            .copied()
            .filter(|o| book.is_open(&o.id))
            .collect();
        pool.shuffle(rng);

        let mut template = WeeklyTemplate::new(cohort_id);

        for &slot in &self.slots {
            let seeded = seeds
                .get(&slot.id)
                .copied()
                .filter(|o| book.is_open(&o.id));

            let candidate = match seeded {
                Some(o) => o,
                None => {
                    let eligible = pool.iter().position(|o| {
                        book.is_open(&o.id) && !self.avoid.contains(&o.teacher_id, &slot.id)
                    });
                    match eligible {
                        Some(i) => pool.remove(i),
                        None => continue,
                    }
                }
            };

            match self.attempt(candidate, slot, ledger, rng) {
                Ok(placement) => {
                    debug!(
                        cohort = cohort_id,
                        obligation = %candidate.id,
                        slot = %slot.label(),
                        room = %placement.room_id,
                        "anchored weekly slot"
                    );
                    ledger.book_placement(&placement);
                    if let Some(progress) = book.get_mut(&candidate.id) {
                        progress.anchor(&slot.id, &placement.room_id);
                    }
                    template.entries.push(TemplateEntry {
                        slot_id: slot.id.clone(),
                        weekday: slot.weekday,
                        period: slot.period,
                        obligation_id: candidate.id.clone(),
                        course_id: candidate.course_id.clone(),
                        teacher_id: candidate.teacher_id.clone(),
                        room_id: placement.room_id.clone(),
                    });
                    timetable.add_placement(placement);
                }
                Err(kind) => {
                    let conflict = Conflict::new(cohort_id, TEMPLATE_WEEK, slot, &candidate.id, kind);
                    debug!(
                        cohort = cohort_id,
                        obligation = %candidate.id,
                        "{}",
                        conflict.message
                    );
                    if let Some(progress) = book.get_mut(&candidate.id) {
                        progress.forfeit();
                    }
                    timetable.add_conflict(conflict);
                }
            }
        }

        template
    }

    fn attempt<R: Rng>(
        &self,
        obligation: &TeachingObligation,
        slot: &Slot,
        ledger: &ResourceLedger,
        rng: &mut R,
    ) -> Result<Placement, ConflictKind> {
        let category = self
            .snapshot
            .course(&obligation.course_id)
            .map(|c| c.category)
            .unwrap_or(crate::models::CourseCategory::Lecture);

        let room = self
            .rooms
            .find(
                ledger,
                TEMPLATE_WEEK,
                &slot.id,
                obligation.expected_attendees,
                category,
                rng,
            )
            .ok_or(ConflictKind::NoRoom {
                required_capacity: obligation.expected_attendees,
            })?;

        check_template_slot(&self.avoid, ledger, obligation, &room.id, &slot.id)?;

        Ok(Placement::new(
            self.term_id,
            &obligation.cohort_id,
            &obligation.course_id,
            &obligation.teacher_id,
            &room.id,
            &slot.id,
            TEMPLATE_WEEK,
            &obligation.id,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{AvoidPreference, Weekday};
    use crate::scheduler::fixtures::{base, hall, monday_slots, with_lecture, TERM};
    use crate::scheduler::progress::ObligationState;
    use rand::SeedableRng;
    use rand::rngs::SmallRng;

    fn book_for(snapshot: &Snapshot) -> ProgressBook {
        let mut book = ProgressBook::new();
        for o in snapshot.obligations.values() {
            book.track(&o.id, snapshot.required_occurrences(o));
        }
        book
    }

    fn obligations<'s>(snapshot: &'s Snapshot, ids: &[&str]) -> Vec<&'s TeachingObligation> {
        ids.iter().map(|id| &snapshot.obligations[*id]).collect()
    }

    #[test]
    fn test_seed_mapping_first_fit() {
        let s = base(4, monday_slots(2));
        let s = with_lecture(s, "O1", "CS", "T1", 2, 10);
        let s = with_lecture(s, "O2", "CS", "T1", 0, 10);
        let s = with_lecture(s, "O3", "CS", "T1", 2, 10);
        let s = with_lecture(s, "O4", "CS", "T1", 2, 10);
        let book = book_for(&s);
        let slots = s.canonical_slots();

        let seeds = seed_mapping(&obligations(&s, &["O1", "O2", "O3", "O4"]), &slots, &book);
        // O2 owes nothing and is skipped; O4 finds no slot left
        assert_eq!(seeds.len(), 2);
        assert_eq!(seeds["mon1"].id, "O1");
        assert_eq!(seeds["mon2"].id, "O3");
    }

    #[test]
    fn test_build_places_and_freezes() {
        let s = base(4, monday_slots(2)).with_room(hall("R1", 50));
        let s = with_lecture(s, "O1", "CS", "T1", 3, 30);
        let builder = TemplateBuilder::new(&s, TERM);
        let mut book = book_for(&s);
        let mut ledger = ResourceLedger::new();
        let mut timetable = Timetable::new();
        let mut rng = SmallRng::seed_from_u64(1);

        let template = builder.build(
            "CS",
            &obligations(&s, &["O1"]),
            &mut book,
            &mut ledger,
            &mut timetable,
            &mut rng,
        );

        assert_eq!(template.len(), 1);
        let entry = template.entry_at("mon1").unwrap();
        assert_eq!(entry.obligation_id, "O1");
        assert_eq!(entry.room_id, "R1");
        assert_eq!(timetable.placement_count(), 1);
        assert_eq!(timetable.placements[0].week, TEMPLATE_WEEK);
        assert_eq!(book.remaining("O1"), 2);
        assert!(!ledger.is_free(ResourceKind::Teacher, "T1", 1, "mon1"));
        // Anchored obligations are not attempted again at mon2
        assert!(template.entry_at("mon2").is_none());
    }

    #[test]
    fn test_failed_attempt_is_forfeited() {
        // The only room is too small
        let s = base(4, monday_slots(3)).with_room(hall("R1", 10));
        let s = with_lecture(s, "O1", "CS", "T1", 3, 30);
        let builder = TemplateBuilder::new(&s, TERM);
        let mut book = book_for(&s);
        let mut ledger = ResourceLedger::new();
        let mut timetable = Timetable::new();
        let mut rng = SmallRng::seed_from_u64(1);

        let template = builder.build(
            "CS",
            &obligations(&s, &["O1"]),
            &mut book,
            &mut ledger,
            &mut timetable,
            &mut rng,
        );

        assert!(template.is_empty());
        assert_eq!(timetable.conflicts.len(), 1);
        assert_eq!(
            timetable.conflicts[0].kind,
            ConflictKind::NoRoom {
                required_capacity: 30
            }
        );
        assert_eq!(book.get("O1").unwrap().state, ObligationState::Forfeited);
        assert!(ledger.is_empty());
    }

    #[test]
    fn test_seeded_candidate_hits_avoid_preference() {
        let s = base(4, monday_slots(1))
            .with_room(hall("R1", 50))
            .with_preference(AvoidPreference::new("P1", "T1", TERM, "mon1"));
        let s = with_lecture(s, "O1", "CS", "T1", 2, 10);
        let builder = TemplateBuilder::new(&s, TERM);
        let mut book = book_for(&s);
        let mut ledger = ResourceLedger::new();
        let mut timetable = Timetable::new();
        let mut rng = SmallRng::seed_from_u64(5);

        builder.build(
            "CS",
            &obligations(&s, &["O1"]),
            &mut book,
            &mut ledger,
            &mut timetable,
            &mut rng,
        );

        assert_eq!(timetable.placement_count(), 0);
        assert_eq!(timetable.conflicts[0].kind, ConflictKind::TeacherPreference);
    }

    #[test]
    fn test_seeded_obligation_rejected_by_preference_is_forfeited() {
        let s = base(4, monday_slots(3))
            .with_room(hall("R1", 50))
            .with_teacher(crate::models::Teacher::new("T2", "Grace"))
            .with_preference(AvoidPreference::new("P1", "T2", TERM, "mon2"));
        let s = with_lecture(s, "O1", "CS", "T1", 2, 10);
        let s = with_lecture(s, "O2", "CS", "T2", 2, 10);
        let builder = TemplateBuilder::new(&s, TERM);
        let mut book = book_for(&s);
        let mut ledger = ResourceLedger::new();
        let mut timetable = Timetable::new();
        let mut rng = SmallRng::seed_from_u64(9);

        let prioritized = obligations(&s, &["O1", "O2"]);
        let template = builder.build(
            "CS",
            &prioritized,
            &mut book,
            &mut ledger,
            &mut timetable,
            &mut rng,
        );

        // O2 is seeded at mon2, tried there once and never again at mon3
        assert_eq!(template.entry_at("mon1").unwrap().obligation_id, "O1");
        assert!(template.entry_at("mon2").is_none());
        assert!(template.entry_at("mon3").is_none());
        assert_eq!(timetable.conflicts.len(), 1);
        assert_eq!(timetable.conflicts[0].kind, ConflictKind::TeacherPreference);
        assert_eq!(book.get("O2").unwrap().state, ObligationState::Forfeited);
    }

    #[test]
    fn test_pool_skips_avoiding_teacher() {
        // No seed slots: every candidate comes from the pool
        let s = base(4, monday_slots(2))
            .with_room(hall("R1", 50))
            .with_teacher(crate::models::Teacher::new("T2", "Grace"))
            .with_preference(AvoidPreference::new("P1", "T2", TERM, "mon1"));
        let s = with_lecture(s, "O1", "CS", "T1", 2, 10);
        let s = with_lecture(s, "O2", "CS", "T2", 2, 10);
        let builder = TemplateBuilder::new(&s, TERM).with_seed_periods(0);

        for seed in 0..10 {
            let mut book = book_for(&s);
            let mut ledger = ResourceLedger::new();
            let mut timetable = Timetable::new();
            let mut rng = SmallRng::seed_from_u64(seed);

            let template = builder.build(
                "CS",
                &obligations(&s, &["O1", "O2"]),
                &mut book,
                &mut ledger,
                &mut timetable,
                &mut rng,
            );

            assert_eq!(template.entry_at("mon1").unwrap().obligation_id, "O1");
            assert_eq!(template.entry_at("mon2").unwrap().obligation_id, "O2");
            assert!(timetable.is_clean());
        }
    }

    #[test]
    fn test_pool_failure_is_not_retried() {
        // Every slot draws from the pool and the only room is too small
        let s = base(4, monday_slots(3)).with_room(hall("R1", 5));
        let s = with_lecture(s, "O1", "CS", "T1", 3, 10);
        let builder = TemplateBuilder::new(&s, TERM).with_seed_periods(0);

        for seed in 0..20 {
            let mut book = book_for(&s);
            let mut ledger = ResourceLedger::new();
            let mut timetable = Timetable::new();
            let mut rng = SmallRng::seed_from_u64(seed);

            let template = builder.build(
                "CS",
                &obligations(&s, &["O1"]),
                &mut book,
                &mut ledger,
                &mut timetable,
                &mut rng,
            );

            assert!(template.is_empty());
            assert_eq!(timetable.placement_count(), 0);
            assert_eq!(timetable.conflicts.len(), 1);
            assert_eq!(timetable.conflicts[0].slot_id, "mon1");
            assert_eq!(
                timetable.conflicts[0].kind,
                ConflictKind::NoRoom {
                    required_capacity: 10
                }
            );
            assert_eq!(book.get("O1").unwrap().state, ObligationState::Forfeited);
        }
    }

    #[test]
    fn test_pool_fills_slots_beyond_seed_periods() {
        let s = base(4, monday_slots(3)).with_room(hall("R1", 50));
        let s = with_lecture(s, "O1", "CS", "T1", 2, 10);
        let s = with_lecture(s, "O2", "CS", "T1", 2, 10);
        let s = with_lecture(s, "O3", "CS", "T1", 2, 10);
        let builder = TemplateBuilder::new(&s, TERM).with_seed_periods(1);
        let mut book = book_for(&s);
        let mut ledger = ResourceLedger::new();
        let mut timetable = Timetable::new();
        let mut rng = SmallRng::seed_from_u64(2);

        let template = builder.build(
            "CS",
            &obligations(&s, &["O3", "O1", "O2"]),
            &mut book,
            &mut ledger,
            &mut timetable,
            &mut rng,
        );

        assert_eq!(template.len(), 3);
        assert_eq!(template.entry_at("mon1").unwrap().obligation_id, "O3");
        let mut pooled = vec![
            template.entry_at("mon2").unwrap().obligation_id.as_str(),
            template.entry_at("mon3").unwrap().obligation_id.as_str(),
        ];
        pooled.sort();
        assert_eq!(pooled, vec!["O1", "O2"]);
    }

    #[test]
    fn test_check_order() {
        let avoid = Snapshot::new()
            .with_preference(AvoidPreference::new("P1", "T1", TERM, "s1"))
            .avoid_index(TERM);
        let mut ledger = ResourceLedger::new();
        ledger.book(ResourceKind::Teacher, "T1", 1, "s1");
        ledger.book(ResourceKind::Room, "R1", 1, "s2");
        ledger.book(ResourceKind::Cohort, "CS", 1, "s3");
        let o = TeachingObligation::new("O1", "CS", "C1", "T1", TERM);

        // Preference wins over teacher busy
        assert_eq!(
            check_template_slot(&avoid, &ledger, &o, "R1", "s1"),
            Err(ConflictKind::TeacherPreference)
        );
        let none = AvoidIndex::default();
        assert_eq!(
            check_template_slot(&none, &ledger, &o, "R1", "s1"),
            Err(ConflictKind::TeacherBusy)
        );
        assert_eq!(
            check_template_slot(&none, &ledger, &o, "R1", "s2"),
            Err(ConflictKind::RoomBusy)
        );
        assert_eq!(
            check_template_slot(&none, &ledger, &o, "R1", "s3"),
            Err(ConflictKind::CohortBusy)
        );
        assert_eq!(check_template_slot(&none, &ledger, &o, "R1", "s4"), Ok(()));
    }

    #[test]
    fn test_slots_in_canonical_order() {
        let s = base(
            1,
            vec![
                Slot::new("tue1", Weekday::Tuesday, 1),
                Slot::new("mon2", Weekday::Monday, 2),
                Slot::new("mon1", Weekday::Monday, 1),
            ],
        );
        let builder = TemplateBuilder::new(&s, TERM);
        let ids: Vec<&str> = builder.slots().iter().map(|s| s.id.as_str()).collect();
        assert_eq!(ids, vec!["mon1", "mon2", "tue1"]);
    }
}
