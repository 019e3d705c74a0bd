//! Greedy timetable construction and KPI evaluation.
//!
//! # Algorithm
//!
//! Each cohort is scheduled in two passes against a ledger shared by the
//! whole run:
//!
//! 1. **Template** (`TemplateBuilder`): week 1 is filled slot by slot.
//!    Every obligation gets at most one attempt; success anchors it to a
//!    recurring (slot, room) pair.
//! 2. **Replication** (`WeekReplicator`): the anchored pairs are repeated
//!    in weeks `2..=total_weeks` while occurrences remain, each week
//!    re-checked against the ledger.
//!
//! `CohortOrchestrator` runs both passes cohort by cohort in name order;
//! `RunCoordinator` adds loading, validation, persistence and the run
//! summary. The approach is fast and predictable but not optimal: a
//! failed week-1 attempt is never retried and contested resources go to
//! whichever cohort comes first.
//!
//! # KPI
//!
//! `TimetableKpi` reports fulfillment, conflicts and per-room and
//! per-teacher load.
//!
//! # References
//!
//! - Schaerf (1999), "A Survey of Automated Timetabling"
//! - Burke & Petrovic (2002), "Recent research directions in automated timetabling"

mod cohort;
mod kpi;
mod progress;
mod replicate;
mod room;
mod run;
mod template;

#[cfg(test)]
mod fixtures;

pub use cohort::{CohortOrchestrator, CohortOutcome, UncompletedObligation};
pub use kpi::TimetableKpi;
pub use progress::{ObligationOutcome, ObligationProgress, ObligationState, ProgressBook};
pub use replicate::WeekReplicator;
pub use room::RoomMatcher;
pub use run::{RunCoordinator, RunReport, RunStatus, RunSummary};
pub use template::{
    check_template_slot, seed_mapping, TemplateBuilder, TemplateEntry, WeeklyTemplate,
    DEFAULT_SEED_PERIODS, TEMPLATE_WEEK,
};
