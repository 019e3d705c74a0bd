//! Built-in obligation rules.
//!
//! All rules return lower scores for obligations that should be placed
//! first.

use super::{ObligationRule, PriorityContext, RuleScore};
use crate::models::TeachingObligation;

/// Core obligations before electives.
#[derive(Debug, Clone, Copy)]
pub struct CoreFirst;

impl ObligationRule for CoreFirst {
    fn name(&self) -> &'static str {
        "CORE"
    }

    fn evaluate(&self, obligation: &TeachingObligation, _context: &PriorityContext) -> RuleScore {
        if obligation.is_core {
            0.0
        } else {
            1.0
        }
    }

    fn description(&self) -> &'static str {
        "Core obligations first"
    }
}

/// Most remaining occurrences first.
///
/// Heavier obligations claim the scarce early template slots.
#[derive(Debug, Clone, Copy)]
pub struct MostRemaining;

impl ObligationRule for MostRemaining {
    fn name(&self) -> &'static str {
        "MREM"
    }

    fn evaluate(&self, obligation: &TeachingObligation, context: &PriorityContext) -> RuleScore {
        -f64::from(context.remaining_for(&obligation.id))
    }

    fn description(&self) -> &'static str {
        "Most Remaining Occurrences"
    }
}

/// Fewest remaining occurrences first.
#[derive(Debug, Clone, Copy)]
pub struct FewestRemaining;

impl ObligationRule for FewestRemaining {
    fn name(&self) -> &'static str {
        "FREM"
    }

    fn evaluate(&self, obligation: &TeachingObligation, context: &PriorityContext) -> RuleScore {
        f64::from(context.remaining_for(&obligation.id))
    }

    fn description(&self) -> &'static str {
        "Fewest Remaining Occurrences"
    }
}

/// Largest expected attendance first.
#[derive(Debug, Clone, Copy)]
pub struct LargestCohort;

impl ObligationRule for LargestCohort {
    fn name(&self) -> &'static str {
        "LCOH"
    }

    fn evaluate(&self, obligation: &TeachingObligation, _context: &PriorityContext) -> RuleScore {
        -f64::from(obligation.expected_attendees)
    }

    fn description(&self) -> &'static str {
        "Largest Expected Attendance"
    }
}
