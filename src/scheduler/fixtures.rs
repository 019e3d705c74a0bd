//! Shared snapshot builders for scheduler tests.

use chrono::NaiveDate;

use crate::models::{
    Cohort, Course, Room, Slot, Snapshot, Teacher, TeachingObligation, Term, Weekday,
};

pub(crate) const TERM: &str = "F25";

pub(crate) fn date(m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, m, d).unwrap()
}

/// A term of `weeks` full weeks starting 2025-09-01.
pub(crate) fn term(weeks: u32) -> Term {
    let start = date(9, 1);
    let end = start + chrono::Days::new(u64::from(weeks) * 7 - 1);
    Term::new(TERM, start, end).with_name("Fall 2025")
}

/// Monday slots `mon1..=monN`.
pub(crate) fn monday_slots(n: u32) -> Vec<Slot> {
    (1..=n)
        .map(|p| Slot::new(format!("mon{p}"), Weekday::Monday, p))
        .collect()
}

/// Snapshot with a term, the given slots, one teacher `T1` and cohort `CS`.
pub(crate) fn base(weeks: u32, slots: Vec<Slot>) -> Snapshot {
    let mut s = Snapshot::new()
        .with_term(term(weeks))
        .with_teacher(Teacher::new("T1", "Ada"))
        .with_cohort(Cohort::new("CS", "Computer Science"));
    for slot in slots {
        s = s.with_slot(slot);
    }
    s
}

/// Adds a lecture course and its obligation for cohort `cohort`.
pub(crate) fn with_lecture(
    snapshot: Snapshot,
    obligation_id: &str,
    cohort: &str,
    teacher: &str,
    occurrences: u32,
    attendees: u32,
) -> Snapshot {
    let course_id = format!("C-{obligation_id}");
    let course =
        Course::lecture(&course_id, occurrences).with_name(format!("Course {obligation_id}"));
    snapshot
        .with_course(course)
        .with_obligation(
            TeachingObligation::new(obligation_id, cohort, course_id, teacher, TERM)
                .with_attendees(attendees),
        )
}

pub(crate) fn hall(id: &str, capacity: u32) -> Room {
    Room::lecture(id, capacity)
}
