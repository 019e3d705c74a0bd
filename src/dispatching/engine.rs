//! Rule engine for obligation prioritization.
//!
//! Applies rules in sequence: the next rule is consulted only when the
//! previous ones tie. Obligations tied on every rule are ordered by the
//! final tie-breaker.
//!
//! # Reference
//! Haupt (1989), "A Survey of Priority Rule-Based Scheduling"

use std::cmp::Ordering;
use std::sync::Arc;

use rand::Rng;
use serde::{Deserialize, Serialize};

use super::rules::{CoreFirst, MostRemaining};
use super::{ObligationRule, PriorityContext};
use crate::models::TeachingObligation;

/// How ties are broken after all rules are exhausted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TieBreaker {
    /// One random key per obligation per run. Order among equals is not
    /// stable across runs unless the RNG is seeded.
    #[default]
    Random,
    /// Deterministic by obligation id (lexicographic).
    ById,
}

/// A composable rule engine for obligation ordering.
///
/// # Example
/// ```
/// use u_timetable::dispatching::{RuleEngine, TieBreaker};
/// use u_timetable::dispatching::rules;
///
/// let engine = RuleEngine::new()
///     .with_rule(rules::CoreFirst)
///     .with_rule(rules::LargestCohort)
///     .with_tie_breaker(TieBreaker::ById);
/// assert_eq!(engine.rule_names(), vec!["CORE", "LCOH"]);
/// ```
#[derive(Clone)]
pub struct RuleEngine {
    rules: Vec<Arc<dyn ObligationRule>>,
    tie_breaker: TieBreaker,
    epsilon: f64,
}

impl RuleEngine {
    /// Creates an empty rule engine.
    pub fn new() -> Self {
        Self {
            rules: Vec::new(),
            tie_breaker: TieBreaker::Random,
            epsilon: 1e-9,
        }
    }

    /// The standard ordering: core first, then most remaining occurrences,
    /// then random.
    pub fn standard() -> Self {
        Self::new().with_rule(CoreFirst).with_rule(MostRemaining)
    }

    /// Appends a rule.
    pub fn with_rule<R: ObligationRule + 'static>(mut self, rule: R) -> Self {
        self.rules.push(Arc::new(rule));
        self
    }

    /// Sets the final tie-breaking strategy.
    pub fn with_tie_breaker(mut self, tie_breaker: TieBreaker) -> Self {
        self.tie_breaker = tie_breaker;
        self
    }

    /// Names of the configured rules, in evaluation order.
    pub fn rule_names(&self) -> Vec<&'static str> {
        self.rules.iter().map(|r| r.name()).collect()
    }

    /// Sorts obligations by priority (highest first).
    ///
    /// Returns indices into `obligations`.
    pub fn sort_indices<R: Rng>(
        &self,
        obligations: &[&TeachingObligation],
        context: &PriorityContext,
        rng: &mut R,
    ) -> Vec<usize> {
        if obligations.is_empty() {
            return Vec::new();
        }

        let tie_keys: Vec<f64> = match self.tie_breaker {
            TieBreaker::Random => obligations.iter().map(|_| rng.random::<f64>()).collect(),
            TieBreaker::ById => Vec::new(),
        };

        let mut indices: Vec<usize> = (0..obligations.len()).collect();
        indices.sort_by(|&a, &b| {
            self.compare_rules(obligations[a], obligations[b], context)
                .then_with(|| match self.tie_breaker {
                    TieBreaker::Random => tie_keys[a]
                        .partial_cmp(&tie_keys[b])
                        .unwrap_or(Ordering::Equal),
                    TieBreaker::ById => obligations[a].id.cmp(&obligations[b].id),
                })
        });
        indices
    }

    /// Returns the obligations in priority order.
    pub fn prioritize<'a, R: Rng>(
        &self,
        obligations: &[&'a TeachingObligation],
        context: &PriorityContext,
        rng: &mut R,
    ) -> Vec<&'a TeachingObligation> {
        self.sort_indices(obligations, context, rng)
            .into_iter()
            .map(|i| obligations[i])
            .collect()
    }

    fn compare_rules(
        &self,
        a: &TeachingObligation,
        b: &TeachingObligation,
        context: &PriorityContext,
    ) -> Ordering {
        for rule in &self.rules {
            let score_a = rule.evaluate(a, context);
            let score_b = rule.evaluate(b, context);

            if (score_a - score_b).abs() > self.epsilon {
                return score_a.partial_cmp(&score_b).unwrap_or(Ordering::Equal);
            }
        }
        Ordering::Equal
    }
}

impl Default for RuleEngine {
    fn default() -> Self {
        Self::standard()
    }
}

impl std::fmt::Debug for RuleEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RuleEngine")
            .field("rules", &self.rule_names())
            .field("tie_breaker", &self.tie_breaker)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dispatching::rules;
    use rand::SeedableRng;
    use rand::rngs::SmallRng;

    fn make(id: &str, core: bool) -> TeachingObligation {
        let o = TeachingObligation::new(id, "CS", "C1", "T1", "F25");
        if core {
            o.core()
        } else {
            o
        }
    }

    fn ids(order: &[&TeachingObligation]) -> Vec<String> {
        order.iter().map(|o| o.id.clone()).collect()
    }

    #[test]
    fn test_core_beats_remaining() {
        let elective = make("E", false);
        let core = make("C", true);
        let ctx = PriorityContext::new()
            .with_remaining("E", 30)
            .with_remaining("C", 1);
        let mut rng = SmallRng::seed_from_u64(1);

        let order = RuleEngine::standard().prioritize(&[&elective, &core], &ctx, &mut rng);
        assert_eq!(ids(&order), vec!["C", "E"]);
    }

    #[test]
    fn test_remaining_descending_within_core_class() {
        let a = make("A", true);
        let b = make("B", true);
        let c = make("C", true);
        let ctx = PriorityContext::new()
            .with_remaining("A", 2)
            .with_remaining("B", 16)
            .with_remaining("C", 8);
        let mut rng = SmallRng::seed_from_u64(1);

        let order = RuleEngine::standard().prioritize(&[&a, &b, &c], &ctx, &mut rng);
        assert_eq!(ids(&order), vec!["B", "C", "A"]);
    }

    #[test]
    fn test_by_id_tie_breaker() {
        let b = make("B", false);
        let a = make("A", false);
        let ctx = PriorityContext::new();
        let mut rng = SmallRng::seed_from_u64(1);

        let engine = RuleEngine::standard().with_tie_breaker(TieBreaker::ById);
        let order = engine.prioritize(&[&b, &a], &ctx, &mut rng);
        assert_eq!(ids(&order), vec!["A", "B"]);
    }

    #[test]
    fn test_random_tie_breaker_is_seed_reproducible() {
        let all: Vec<TeachingObligation> = (0..12).map(|i| make(&format!("O{i}"), false)).collect();
        let refs: Vec<&TeachingObligation> = all.iter().collect();
        let ctx = PriorityContext::new();
        let engine = RuleEngine::standard();

        let first = engine.sort_indices(&refs, &ctx, &mut SmallRng::seed_from_u64(42));
        let second = engine.sort_indices(&refs, &ctx, &mut SmallRng::seed_from_u64(42));
        assert_eq!(first, second);

        let mut sorted = first.clone();
        sorted.sort_unstable();
        assert_eq!(sorted, (0..12).collect::<Vec<_>>());
    }

    #[test]
    fn test_random_never_overrides_rules() {
        let core = make("Z", true);
        let elective = make("A", false);
        let ctx = PriorityContext::new();
        let engine = RuleEngine::standard();

        for seed in 0..20 {
            let mut rng = SmallRng::seed_from_u64(seed);
            let order = engine.prioritize(&[&elective, &core], &ctx, &mut rng);
            assert_eq!(order[0].id, "Z");
        }
    }

    #[test]
    fn test_custom_rule_chain() {
        let engine = RuleEngine::new()
            .with_rule(rules::FewestRemaining)
            .with_tie_breaker(TieBreaker::ById);
        let a = make("A", false);
        let b = make("B", false);
        let ctx = PriorityContext::new()
            .with_remaining("A", 10)
            .with_remaining("B", 3);
        let mut rng = SmallRng::seed_from_u64(0);

        let order = engine.prioritize(&[&a, &b], &ctx, &mut rng);
        assert_eq!(ids(&order), vec!["B", "A"]);
    }

    #[test]
    fn test_empty() {
        let ctx = PriorityContext::new();
        let mut rng = SmallRng::seed_from_u64(0);
        assert!(RuleEngine::standard().sort_indices(&[], &ctx, &mut rng).is_empty());
    }

    #[test]
    fn test_debug_lists_rules() {
        let dbg = format!("{:?}", RuleEngine::standard());
        assert!(dbg.contains("CORE"));
        assert!(dbg.contains("MREM"));
    }
}
