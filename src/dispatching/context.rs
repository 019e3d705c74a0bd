//! Prioritization context.

use std::collections::HashMap;

/// State passed to obligation rules.
#[derive(Debug, Clone, Default)]
pub struct PriorityContext {
    /// Remaining required occurrences per obligation id.
    pub remaining: HashMap<String, u32>,
}

impl PriorityContext {
    /// Creates an empty context.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the remaining occurrences of an obligation.
    pub fn with_remaining(mut self, obligation_id: impl Into<String>, remaining: u32) -> Self {
        self.remaining.insert(obligation_id.into(), remaining);
        self
    }

    /// Remaining occurrences of an obligation (0 if unknown).
    pub fn remaining_for(&self, obligation_id: &str) -> u32 {
        self.remaining.get(obligation_id).copied().unwrap_or(0)
    }
}
