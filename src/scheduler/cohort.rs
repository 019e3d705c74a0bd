//! Cohort orchestration.
//!
//! Schedules the cohorts of a term one after another against a single
//! shared [`ResourceLedger`]. Cohorts are taken in ascending display-name
//! order (ties by id), so an earlier cohort keeps any teacher, room or
//! slot it claims over every later one.
//!
//! Per cohort: prioritize obligations, build the week-1 template,
//! replicate it, then report what is still owed.

use rand::Rng;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::{info, warn};

use super::progress::{ObligationOutcome, ProgressBook};
use super::replicate::WeekReplicator;
use super::template::{TemplateBuilder, WeeklyTemplate};
use crate::dispatching::{PriorityContext, RuleEngine};
use crate::ledger::ResourceLedger;
use crate::models::{Snapshot, TeachingObligation, Term, Timetable};

/// An obligation left with occurrences owed after its cohort pass.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UncompletedObligation {
    pub obligation_id: String,
    pub cohort_id: String,
    pub course_name: String,
    pub teacher_name: String,
    /// Occurrences the course requires.
    pub required: u32,
    /// Occurrences not placed.
    pub remaining: u32,
}

/// Result of scheduling one cohort.
#[derive(Debug, Clone)]
pub struct CohortOutcome {
    pub cohort_id: String,
    pub cohort_name: String,
    /// Placements and conflicts of this cohort, week 1 first.
    pub timetable: Timetable,
    /// The frozen weekly template.
    pub template: WeeklyTemplate,
    /// Final outcome per obligation id.
    pub outcomes: BTreeMap<String, ObligationOutcome>,
    /// Obligations still owing occurrences, in id order.
    pub uncompleted: Vec<UncompletedObligation>,
}

impl CohortOutcome {
    /// One-line summary of the cohort pass.
    pub fn detail(&self) -> String {
        let mut line = format!(
            "cohort '{}' ({}): {} placements, {} conflicts recorded.",
            self.cohort_name,
            self.cohort_id,
            self.timetable.placement_count(),
            self.timetable.conflicts.len()
        );
        if !self.uncompleted.is_empty() {
            line.push_str(&format!(
                " {} uncompleted obligations.",
                self.uncompleted.len()
            ));
        }
        line
    }
}

/// Runs the per-cohort pipeline for every cohort of a term.
#[derive(Debug, Clone)]
pub struct CohortOrchestrator<'a> {
    snapshot: &'a Snapshot,
    term: &'a Term,
    engine: RuleEngine,
    builder: TemplateBuilder<'a>,
    replicator: WeekReplicator<'a>,
}

impl<'a> CohortOrchestrator<'a> {
    /// Creates an orchestrator for one term.
    pub fn new(snapshot: &'a Snapshot, term: &'a Term, engine: RuleEngine) -> Self {
        Self {
            snapshot,
            term,
            engine,
            builder: TemplateBuilder::new(snapshot, &term.id),
            replicator: WeekReplicator::new(&term.id, term.total_weeks()),
        }
    }

    /// Sets how many periods per day take part in the seed mapping.
    pub fn with_seed_periods(mut self, seed_periods: u32) -> Self {
        self.builder = self.builder.with_seed_periods(seed_periods);
        self
    }

    /// Cohorts with obligations in the term, in processing order.
    pub fn cohort_order(&self) -> Vec<&'a str> {
        let mut ids: Vec<&'a str> = self
            .snapshot
            .obligations_for_term(&self.term.id)
            .into_iter()
            .map(|o| o.cohort_id.as_str())
            .collect();
        ids.sort_unstable();
        ids.dedup();

        let mut keyed: Vec<(String, &'a str)> = ids
            .into_iter()
            .map(|id| (self.snapshot.cohort_name(id), id))
            .collect();
        keyed.sort();
        keyed.into_iter().map(|(_, id)| id).collect()
    }

    /// Schedules every cohort in [`cohort_order`](Self::cohort_order).
    pub fn schedule_all<R: Rng>(
        &self,
        ledger: &mut ResourceLedger,
        rng: &mut R,
    ) -> Vec<CohortOutcome> {
        self.cohort_order()
            .into_iter()
            .map(|id| self.schedule_cohort(id, ledger, rng))
            .collect()
    }

    /// Schedules one cohort against the shared ledger.
    pub fn schedule_cohort<R: Rng>(
        &self,
        cohort_id: &str,
        ledger: &mut ResourceLedger,
        rng: &mut R,
    ) -> CohortOutcome {
        let cohort_name = self.snapshot.cohort_name(cohort_id);
        let obligations: Vec<&'a TeachingObligation> = self
            .snapshot
            .obligations_for_term(&self.term.id)
            .into_iter()
            .filter(|o| o.cohort_id == cohort_id)
            .collect();

        info!(
            cohort = cohort_id,
            name = %cohort_name,
            obligations = obligations.len(),
            "scheduling cohort"
        );

        let mut book = ProgressBook::new();
        let mut context = PriorityContext::new();
        for o in &obligations {
            let required = self.snapshot.required_occurrences(o);
            book.track(&o.id, required);
            context = context.with_remaining(&o.id, required);
        }

        let prioritized = self.engine.prioritize(&obligations, &context, rng);

        let mut timetable = Timetable::new();
        let template = self.builder.build(
            cohort_id,
            &prioritized,
            &mut book,
            ledger,
            &mut timetable,
            rng,
        );
        self.replicator
            .replicate(&template, &mut book, ledger, &mut timetable);

        let mut outcomes = BTreeMap::new();
        let mut uncompleted = Vec::new();
        for o in &obligations {
            let Some(progress) = book.get(&o.id) else {
                continue;
            };
            outcomes.insert(o.id.clone(), progress.outcome());
            if progress.is_owing() {
                let course_name = self.snapshot.course_name(&o.course_id);
                warn!(
                    cohort = cohort_id,
                    obligation = %o.id,
                    course = %course_name,
                    remaining = progress.remaining,
                    "obligation left with occurrences unplaced"
                );
                uncompleted.push(UncompletedObligation {
                    obligation_id: o.id.clone(),
                    cohort_id: cohort_id.to_string(),
                    course_name,
                    teacher_name: self.snapshot.teacher_name(&o.teacher_id),
                    required: progress.required,
                    remaining: progress.remaining,
                });
            }
        }

        info!(
            cohort = cohort_id,
            placements = timetable.placement_count(),
            conflicts = timetable.conflicts.len(),
            uncompleted = uncompleted.len(),
            "cohort scheduled"
        );

        CohortOutcome {
            cohort_id: cohort_id.to_string(),
            cohort_name,
            timetable,
            template,
            outcomes,
            uncompleted,
        }
    }
}
