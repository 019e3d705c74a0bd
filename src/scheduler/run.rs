//! Run coordination.
//!
//! One run schedules one term end to end:
//!
//! 1. Load the snapshot and validate it for the term. Any problem aborts
//!    the run before storage is touched.
//! 2. Collect the cohorts with obligations in the term. None → done,
//!    nothing cleared.
//! 3. Schedule every cohort against a fresh shared ledger.
//! 4. Replace the term's stored placements with the new set in one
//!    [`PlacementStore::replace_term`] call.
//! 5. Summarize.
//!
//! [`RunCoordinator::run`] additionally stamps avoid preferences as
//! applied after every run, successful or not, and folds errors into the
//! returned [`RunSummary`].

use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::{info, warn};

use super::cohort::{CohortOrchestrator, UncompletedObligation};
use super::kpi::TimetableKpi;
use crate::config::SchedulerConfig;
use crate::error::RunError;
use crate::ledger::ResourceLedger;
use crate::models::{Term, Timetable};
use crate::store::{PlacementStore, SnapshotSource};
use crate::validation::{validate_snapshot, ValidationError, ValidationErrorKind};

/// Final status of a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RunStatus {
    /// Placements were generated and stored.
    Success,
    /// The term has no teaching obligations; storage untouched.
    SuccessNoTasks,
    /// The input is unusable for the term.
    Failure,
    /// Loading or persistence failed.
    Error,
}

impl RunStatus {
    /// Wire name of the status.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Success => "success",
            Self::SuccessNoTasks => "success_no_tasks",
            Self::Failure => "failure",
            Self::Error => "error",
        }
    }

    /// Whether the run completed without error.
    pub fn is_success(self) -> bool {
        matches!(self, Self::Success | Self::SuccessNoTasks)
    }
}

impl fmt::Display for RunStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Summary returned to the caller of a run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunSummary {
    pub status: RunStatus,
    pub message: String,
    pub processed_cohorts: usize,
    pub total_placements: usize,
    pub total_conflicts: usize,
    pub total_uncompleted: usize,
    /// Stored placements removed for the term.
    pub deleted_count: usize,
    /// Placements written for the term.
    pub inserted_count: usize,
    /// Preferences stamped `applied` after the run.
    pub preferences_applied: usize,
    /// One line per cohort.
    pub details: Vec<String>,
}

impl RunSummary {
    fn empty(status: RunStatus, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
            processed_cohorts: 0,
            total_placements: 0,
            total_conflicts: 0,
            total_uncompleted: 0,
            deleted_count: 0,
            inserted_count: 0,
            preferences_applied: 0,
            details: Vec::new(),
        }
    }

    /// Summary of an aborted run.
    pub fn from_error(error: &RunError) -> Self {
        let status = match error {
            RunError::Validation(_) => RunStatus::Failure,
            RunError::Load(_) | RunError::Persistence(_) => RunStatus::Error,
        };
        Self::empty(status, error.to_string())
    }
}

/// Everything a run produced: the summary plus the generated timetable,
/// for reporting.
#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    pub summary: RunSummary,
    /// All placements and conflicts, cohort by cohort.
    pub timetable: Timetable,
    pub uncompleted: Vec<UncompletedObligation>,
    pub kpi: TimetableKpi,
}

/// Drives complete scheduling runs.
#[derive(Debug, Clone, Default)]
pub struct RunCoordinator {
    config: SchedulerConfig,
}

impl RunCoordinator {
    /// Creates a coordinator.
    pub fn new(config: SchedulerConfig) -> Self {
        Self { config }
    }

    /// The active configuration.
    pub fn config(&self) -> &SchedulerConfig {
        &self.config
    }

    /// Runs the term and stamps preferences, always returning a summary.
    pub fn run<S, P>(&self, source: &S, store: &mut P, term_id: &str) -> RunSummary
    where
        S: SnapshotSource + ?Sized,
        P: PlacementStore + ?Sized,
    {
        self.run_detailed(source, store, term_id).0
    }

    /// Like [`run`](Self::run), also returning the report of a completed run.
    pub fn run_detailed<S, P>(
        &self,
        source: &S,
        store: &mut P,
        term_id: &str,
    ) -> (RunSummary, Option<RunReport>)
    where
        S: SnapshotSource + ?Sized,
        P: PlacementStore + ?Sized,
    {
        let result = self.execute(source, store, term_id);

        let applied = match store.mark_preferences_applied(self.config.preference_scope, term_id) {
            Ok(n) => n,
            Err(e) => {
                warn!(term = term_id, error = %e, "failed to mark preferences applied");
                0
            }
        };

        match result {
            Ok(mut report) => {
                report.summary.preferences_applied = applied;
                (report.summary.clone(), Some(report))
            }
            Err(e) => {
                warn!(term = term_id, error = %e, "timetable run aborted");
                let mut summary = RunSummary::from_error(&e);
                summary.preferences_applied = applied;
                (summary, None)
            }
        }
    }

    /// Runs the term without touching preference statuses.
    ///
    /// # Errors
    /// - [`RunError::Load`] if the snapshot cannot be loaded
    /// - [`RunError::Validation`] if the snapshot is unusable for the term
    /// - [`RunError::Persistence`] if the placements cannot be stored
    ///
    /// Storage is untouched on load and validation errors.
    pub fn execute<S, P>(
        &self,
        source: &S,
        store: &mut P,
        term_id: &str,
    ) -> Result<RunReport, RunError>
    where
        S: SnapshotSource + ?Sized,
        P: PlacementStore + ?Sized,
    {
        info!(term = term_id, "starting timetable run");

        let snapshot = source.load().map_err(RunError::Load)?;
        validate_snapshot(&snapshot, term_id).map_err(RunError::Validation)?;
        let term = snapshot.term(term_id).ok_or_else(|| {
            RunError::Validation(vec![ValidationError::new(
                ValidationErrorKind::UnknownTerm,
                format!("Term '{term_id}' not found"),
            )])
        })?;

        let orchestrator = CohortOrchestrator::new(&snapshot, term, self.config.rule_engine())
            .with_seed_periods(self.config.seed_periods);

        if orchestrator.cohort_order().is_empty() {
            info!(term = term_id, "no teaching obligations in term");
            let summary = RunSummary::empty(
                RunStatus::SuccessNoTasks,
                format!("no teaching obligations for term '{}'.", term.label()),
            );
            return Ok(RunReport {
                summary,
                timetable: Timetable::new(),
                uncompleted: Vec::new(),
                kpi: TimetableKpi::calculate(&Timetable::new(), &snapshot, term_id),
            });
        }

        let mut rng = self.config.make_rng();
        let mut ledger = ResourceLedger::new();
        let outcomes = orchestrator.schedule_all(&mut ledger, &mut rng);

        let mut timetable = Timetable::new();
        let mut uncompleted = Vec::new();
        let mut details = Vec::with_capacity(outcomes.len());
        for outcome in outcomes.iter() {
            details.push(outcome.detail());
        }
        let processed_cohorts = outcomes.len();
        for outcome in outcomes {
            timetable.extend(outcome.timetable);
            uncompleted.extend(outcome.uncompleted);
        }

        let (deleted_count, inserted_count) = store
            .replace_term(term_id, &timetable.placements)
            .map_err(RunError::Persistence)?;

        let kpi = TimetableKpi::calculate(&timetable, &snapshot, term_id);
        let summary = RunSummary {
            status: RunStatus::Success,
            message: success_message(term, timetable.conflicts.len()),
            processed_cohorts,
            total_placements: timetable.placement_count(),
            total_conflicts: timetable.conflicts.len(),
            total_uncompleted: uncompleted.len(),
            deleted_count,
            inserted_count,
            preferences_applied: 0,
            details,
        };

        info!(
            term = term_id,
            cohorts = summary.processed_cohorts,
            placements = summary.total_placements,
            conflicts = summary.total_conflicts,
            uncompleted = summary.total_uncompleted,
            fulfillment = kpi.fulfillment_rate,
            "timetable run finished"
        );

        Ok(RunReport {
            summary,
            timetable,
            uncompleted,
            kpi,
        })
    }
}

fn success_message(term: &Term, conflicts: usize) -> String {
    let mut message = format!(
        "timetable for term '{}' generated by weekly template replication.",
        term.label()
    );
    if conflicts > 0 {
        message.push_str(&format!(" {conflicts} conflicts recorded."));
    }
    message
}
