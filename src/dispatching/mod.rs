//! Obligation prioritization.
//!
//! Orders pending teaching obligations before a cohort's template pass.
//! Rules are composed by a [`RuleEngine`]; obligations still tied after
//! every rule are separated by a [`TieBreaker`], randomly by default.
//!
//! # Usage
//!
//! ```
//! use rand::SeedableRng;
//! use rand::rngs::SmallRng;
//! use u_timetable::dispatching::{PriorityContext, RuleEngine};
//! use u_timetable::models::TeachingObligation;
//!
//! let a = TeachingObligation::new("A", "CS", "C1", "T1", "F25").core();
//! let b = TeachingObligation::new("B", "CS", "C2", "T2", "F25");
//! let ctx = PriorityContext::new()
//!     .with_remaining("A", 4)
//!     .with_remaining("B", 16);
//!
//! let engine = RuleEngine::standard();
//! let mut rng = SmallRng::seed_from_u64(7);
//! let order = engine.sort_indices(&[&a, &b], &ctx, &mut rng);
//! assert_eq!(order, vec![0, 1]); // core before elective
//! ```
//!
//! # References
//!
//! - Haupt (1989), "A Survey of Priority Rule-Based Scheduling"
//! - Burke & Petrovic (2002), "Recent research directions in automated timetabling"

mod context;
mod engine;
pub mod rules;

pub use context::PriorityContext;
pub use engine::{RuleEngine, TieBreaker};

use crate::models::TeachingObligation;
use std::fmt::Debug;

/// Score returned by a rule.
///
/// Lower scores = higher priority (placed first).
pub type RuleScore = f64;

/// A rule that scores an obligation's placement priority.
///
/// # Score Convention
/// **Lower score = higher priority.**
pub trait ObligationRule: Send + Sync + Debug {
    /// Rule name (e.g., "CORE").
    fn name(&self) -> &'static str;

    /// Scores an obligation. Lower = placed earlier.
    fn evaluate(&self, obligation: &TeachingObligation, context: &PriorityContext) -> RuleScore;

    /// Rule description.
    fn description(&self) -> &'static str {
        self.name()
    }
}
