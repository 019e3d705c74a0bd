//! Scheduler configuration.

use rand::SeedableRng;
use rand::rngs::SmallRng;
use serde::{Deserialize, Serialize};

use crate::dispatching::{RuleEngine, TieBreaker};
use crate::error::ConfigError;
use crate::scheduler::DEFAULT_SEED_PERIODS;

/// Run configuration.
///
/// Loaded from JSON at runtime; every field has a default.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SchedulerConfig {
    /// Fixed RNG seed. With a seed, identical input yields identical
    /// output; without one the RNG is seeded from the OS.
    pub seed: Option<u64>,

    /// Which preferences are stamped `applied` after a run.
    pub preference_scope: PreferenceScope,

    /// Final tie-breaker of the obligation prioritizer.
    pub tie_breaker: TieBreaker,

    /// Periods per day that take part in the week-1 seed mapping. Later
    /// periods are filled from the fallback pool only.
    pub seed_periods: u32,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            seed: None,
            preference_scope: PreferenceScope::default(),
            tie_breaker: TieBreaker::default(),
            seed_periods: DEFAULT_SEED_PERIODS,
        }
    }
}

/// Scope of the post-run preference status update.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PreferenceScope {
    /// Only preferences of the scheduled term.
    #[default]
    Term,
    /// Every preference in the system, regardless of term.
    All,
}

impl SchedulerConfig {
    /// Parses a JSON configuration document.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Sets the RNG seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Sets the preference update scope.
    pub fn with_preference_scope(mut self, scope: PreferenceScope) -> Self {
        self.preference_scope = scope;
        self
    }

    /// Sets the prioritizer tie-breaker.
    pub fn with_tie_breaker(mut self, tie_breaker: TieBreaker) -> Self {
        self.tie_breaker = tie_breaker;
        self
    }

    /// Sets the number of seeded periods per day.
    pub fn with_seed_periods(mut self, seed_periods: u32) -> Self {
        self.seed_periods = seed_periods;
        self
    }

    /// Builds the RNG for one run.
    pub fn make_rng(&self) -> SmallRng {
        match self.seed {
            Some(seed) => SmallRng::seed_from_u64(seed),
            None => SmallRng::from_os_rng(),
        }
    }

    /// Builds the obligation prioritizer.
    pub fn rule_engine(&self) -> RuleEngine {
        RuleEngine::standard().with_tie_breaker(self.tie_breaker)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::Rng;

    #[test]
    fn test_defaults() {
        let c = SchedulerConfig::default();
        assert_eq!(c.seed, None);
        assert_eq!(c.preference_scope, PreferenceScope::Term);
        assert_eq!(c.tie_breaker, TieBreaker::Random);
        assert_eq!(c.seed_periods, 4);
    }

    #[test]
    fn test_from_json_partial() {
        let c = SchedulerConfig::from_json(r#"{"seed": 42, "preference_scope": "all"}"#).unwrap();
        assert_eq!(c.seed, Some(42));
        assert_eq!(c.preference_scope, PreferenceScope::All);
        assert_eq!(c.tie_breaker, TieBreaker::Random);
        assert_eq!(c.seed_periods, 4);

        let c = SchedulerConfig::from_json(r#"{"seed_periods": 6}"#).unwrap();
        assert_eq!(c.seed_periods, 6);
    }

    #[test]
    fn test_from_json_empty_object() {
        let c = SchedulerConfig::from_json("{}").unwrap();
        assert_eq!(c, SchedulerConfig::default());
    }

    #[test]
    fn test_from_json_rejects_bad_value() {
        let err = SchedulerConfig::from_json(r#"{"tie_breaker": "coin_flip"}"#).unwrap_err();
        assert!(err.to_string().starts_with("invalid config"));
    }

    #[test]
    fn test_seeded_rng_is_reproducible() {
        let c = SchedulerConfig::default().with_seed(9);
        let a: u64 = c.make_rng().random();
        let b: u64 = c.make_rng().random();
        assert_eq!(a, b);
    }

    #[test]
    fn test_rule_engine_uses_tie_breaker() {
        let c = SchedulerConfig::default().with_tie_breaker(TieBreaker::ById);
        let dbg = format!("{:?}", c.rule_engine());
        assert!(dbg.contains("ById"));
    }
}
