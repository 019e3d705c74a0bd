//! Week replication.
//!
//! Repeats a cohort's weekly template for weeks `2..=total_weeks`. Every
//! entry is re-checked against the ledger for the exact week, since
//! cohorts scheduled earlier may already hold the teacher or room there.
//! A clash loses that week's occurrence; it is not moved or deferred.
//! Replication stops for an obligation once its remaining count is zero,
//! and for the whole template once no entry owes anything.

use tracing::debug;

use super::progress::ProgressBook;
use super::template::{TemplateEntry, WeeklyTemplate, TEMPLATE_WEEK};
use crate::ledger::{ResourceKind, ResourceLedger};
use crate::models::{Conflict, ConflictKind, Placement, Timetable};

/// Replicates weekly templates across the rest of a term.
#[derive(Debug, Clone)]
pub struct WeekReplicator<'a> {
    term_id: &'a str,
    total_weeks: u32,
}

impl<'a> WeekReplicator<'a> {
    /// Creates a replicator for a term of `total_weeks` weeks.
    pub fn new(term_id: &'a str, total_weeks: u32) -> Self {
        Self {
            term_id,
            total_weeks,
        }
    }

    /// Replicates `template` into weeks after the template week.
    pub fn replicate(
        &self,
        template: &WeeklyTemplate,
        book: &mut ProgressBook,
        ledger: &mut ResourceLedger,
        timetable: &mut Timetable,
    ) {
        for week in (TEMPLATE_WEEK + 1)..=self.total_weeks {
            if !template
                .entries
                .iter()
                .any(|e| book.is_owing(&e.obligation_id))
            {
                debug!(cohort = %template.cohort_id, week, "template exhausted");
                break;
            }

            for entry in &template.entries {
                if !book.is_owing(&entry.obligation_id) {
                    continue;
                }

                if let Some(kind) = replication_clash(ledger, template, entry, week) {
                    let conflict = Conflict::new(
                        &template.cohort_id,
                        week,
                        &entry.slot(),
                        &entry.obligation_id,
                        kind,
                    );
                    debug!(
                        cohort = %template.cohort_id,
                        obligation = %entry.obligation_id,
                        "{}",
                        conflict.message
                    );
                    timetable.add_conflict(conflict);
                    continue;
                }

                let placement = Placement::new(
                    self.term_id,
                    &template.cohort_id,
                    &entry.course_id,
                    &entry.teacher_id,
                    &entry.room_id,
                    &entry.slot_id,
                    week,
                    &entry.obligation_id,
                );
                ledger.book_placement(&placement);
                if let Some(progress) = book.get_mut(&entry.obligation_id) {
                    progress.record_occurrence();
                }
                timetable.add_placement(placement);
            }
        }
    }
}

fn replication_clash(
    ledger: &ResourceLedger,
    template: &WeeklyTemplate,
    entry: &TemplateEntry,
    week: u32,
) -> Option<ConflictKind> {
    let slot = entry.slot_id.as_str();
    let teacher_busy = !ledger.is_free(ResourceKind::Teacher, &entry.teacher_id, week, slot);
    let room_busy = !ledger.is_free(ResourceKind::Room, &entry.room_id, week, slot);
    let cohort_busy = !ledger.is_free(ResourceKind::Cohort, &template.cohort_id, week, slot);

    if teacher_busy || room_busy || cohort_busy {
        Some(ConflictKind::ReplicationConflict {
            teacher_busy,
            room_busy,
            cohort_busy,
        })
    } else {
        None
    }
}
