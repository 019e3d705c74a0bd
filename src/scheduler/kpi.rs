//! Timetable quality metrics (KPIs).
//!
//! Computes fulfillment and usage indicators from a generated timetable
//! and the snapshot it was generated from.
//!
//! # Metrics
//!
//! | Metric | Definition |
//! |--------|-----------|
//! | Required occurrences | Sum of required occurrences over the term's obligations |
//! | Placed occurrences | Placements in the timetable |
//! | Fulfillment rate | placed / required (1.0 when nothing is required) |
//! | Uncompleted | Obligations with fewer placements than required |
//! | Replication conflicts | Conflicts raised after week 1 |
//! | Per-room / per-teacher load | Placement counts by room and by teacher |
//!
//! # Reference
//! Burke & Petrovic (2002), "Recent research directions in automated
//! timetabling", Sec. 2: evaluation of university timetables

use serde::Serialize;
use std::collections::HashMap;

use crate::models::{Snapshot, Timetable};

/// Timetable performance indicators.
#[derive(Debug, Clone, Serialize)]
pub struct TimetableKpi {
    /// Number of placements.
    pub placements: usize,
    /// Number of recorded conflicts.
    pub conflicts: usize,
    /// Conflicts raised while replicating templates.
    pub replication_conflicts: usize,
    /// Obligations with occurrences still owed.
    pub uncompleted: usize,
    /// Occurrences required across the term.
    pub required_occurrences: u64,
    /// Occurrences placed, capped per obligation at its requirement.
    pub placed_occurrences: u64,
    /// placed / required (0.0..1.0).
    pub fulfillment_rate: f64,
    /// Placements per room.
    pub placements_by_room: HashMap<String, usize>,
    /// Placements per teacher.
    pub placements_by_teacher: HashMap<String, usize>,
}

impl TimetableKpi {
    /// Computes KPIs for `timetable` against the obligations of `term_id`.
    pub fn calculate(timetable: &Timetable, snapshot: &Snapshot, term_id: &str) -> Self {
        let counts = timetable.occurrences_by_obligation();

        let mut required_total: u64 = 0;
        let mut placed_total: u64 = 0;
        let mut uncompleted = 0;

        for obligation in snapshot.obligations_for_term(term_id) {
            let required = snapshot.required_occurrences(obligation);
            let placed = counts.get(&obligation.id).copied().unwrap_or(0);

            required_total += u64::from(required);
            placed_total += u64::from(placed.min(required));
            if placed < required {
                uncompleted += 1;
            }
        }

        let fulfillment_rate = if required_total == 0 {
            1.0
        } else {
            placed_total as f64 / required_total as f64
        };

        let mut placements_by_room: HashMap<String, usize> = HashMap::new();
        let mut placements_by_teacher: HashMap<String, usize> = HashMap::new();
        for p in &timetable.placements {
            *placements_by_room.entry(p.room_id.clone()).or_insert(0) += 1;
            *placements_by_teacher.entry(p.teacher_id.clone()).or_insert(0) += 1;
        }

        Self {
            placements: timetable.placement_count(),
            conflicts: timetable.conflicts.len(),
            replication_conflicts: timetable.conflicts.iter().filter(|c| c.is_replication()).count(),
            uncompleted,
            required_occurrences: required_total,
            placed_occurrences: placed_total,
            fulfillment_rate,
            placements_by_room,
            placements_by_teacher,
        }
    }

    /// Whether every required occurrence was placed.
    pub fn is_complete(&self) -> bool {
        self.uncompleted == 0
    }

    /// Whether the timetable meets the given quality thresholds.
    pub fn meets_thresholds(&self, min_fulfillment: f64, max_conflicts: usize) -> bool {
        self.fulfillment_rate >= min_fulfillment && self.conflicts <= max_conflicts
    }
}
