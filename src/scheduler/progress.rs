//! Per-obligation progress through a run.
//!
//! Every obligation moves through a small state machine:
//!
//! ```text
//! Pending ──anchor──▶ Anchored { slot, room } ──record_occurrence──▶ …
//!    │
//!    └──forfeit──▶ Forfeited
//! ```
//!
//! An obligation leaves `Pending` on its first (and only) week-1
//! attempt. `Forfeited` obligations get no placement for the whole term.
//! The final [`ObligationOutcome`] is derived from the state and the
//! remaining counter.

use serde::Serialize;
use std::collections::HashMap;

/// Placement state of an obligation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ObligationState {
    /// Not yet attempted.
    Pending,
    /// Holds a recurring weekly slot and room.
    Anchored { slot_id: String, room_id: String },
    /// Failed its week-1 attempt.
    Forfeited,
}

/// Final result for one obligation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ObligationOutcome {
    /// Every required occurrence placed.
    Fulfilled,
    /// Anchored, but some occurrences were lost or did not fit the term.
    PartiallyFulfilled { placed: u32, remaining: u32 },
    /// Never placed.
    Unplaced { remaining: u32 },
}

/// Progress of one obligation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObligationProgress {
    /// Obligation id.
    pub obligation_id: String,
    /// Occurrences required by the course.
    pub required: u32,
    /// Occurrences still owed.
    pub remaining: u32,
    /// Current state.
    pub state: ObligationState,
}

impl ObligationProgress {
    /// Starts tracking an obligation.
    pub fn new(obligation_id: impl Into<String>, required: u32) -> Self {
        Self {
            obligation_id: obligation_id.into(),
            required,
            remaining: required,
            state: ObligationState::Pending,
        }
    }

    /// Whether the obligation may still be attempted: pending and owing.
    #[inline]
    pub fn is_open(&self) -> bool {
        self.state == ObligationState::Pending && self.remaining > 0
    }

    /// Whether the obligation still owes occurrences.
    #[inline]
    pub fn is_owing(&self) -> bool {
        self.remaining > 0
    }

    /// Anchors the obligation at its week-1 placement and counts it.
    ///
    /// Returns `false` (and changes nothing) unless the obligation is open.
    pub fn anchor(&mut self, slot_id: impl Into<String>, room_id: impl Into<String>) -> bool {
        if !self.is_open() {
            return false;
        }
        self.state = ObligationState::Anchored {
            slot_id: slot_id.into(),
            room_id: room_id.into(),
        };
        self.remaining -= 1;
        true
    }

    /// Marks a failed week-1 attempt.
    ///
    /// Returns `false` (and changes nothing) unless the obligation is pending.
    pub fn forfeit(&mut self) -> bool {
        if self.state != ObligationState::Pending {
            return false;
        }
        self.state = ObligationState::Forfeited;
        true
    }

    /// Counts a replicated occurrence.
    ///
    /// Returns `false` (and changes nothing) unless the obligation is
    /// anchored and still owing.
    pub fn record_occurrence(&mut self) -> bool {
        if !matches!(self.state, ObligationState::Anchored { .. }) || self.remaining == 0 {
            return false;
        }
        self.remaining -= 1;
        true
    }

    /// Occurrences placed so far.
    #[inline]
    pub fn placed(&self) -> u32 {
        self.required - self.remaining
    }

    /// Final outcome given the current state.
    pub fn outcome(&self) -> ObligationOutcome {
        if self.remaining == 0 {
            return ObligationOutcome::Fulfilled;
        }
        match self.state {
            ObligationState::Anchored { .. } => ObligationOutcome::PartiallyFulfilled {
                placed: self.placed(),
                remaining: self.remaining,
            },
            ObligationState::Pending | ObligationState::Forfeited => ObligationOutcome::Unplaced {
                remaining: self.remaining,
            },
        }
    }
}

/// Progress of every obligation in one cohort pass.
#[derive(Debug, Clone, Default)]
pub struct ProgressBook {
    entries: HashMap<String, ObligationProgress>,
}

impl ProgressBook {
    /// Creates an empty book.
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts tracking an obligation.
    pub fn track(&mut self, obligation_id: impl Into<String>, required: u32) {
        let id = obligation_id.into();
        self.entries
            .insert(id.clone(), ObligationProgress::new(id, required));
    }

    /// Progress of an obligation.
    pub fn get(&self, obligation_id: &str) -> Option<&ObligationProgress> {
        self.entries.get(obligation_id)
    }

    /// Mutable progress of an obligation.
    pub fn get_mut(&mut self, obligation_id: &str) -> Option<&mut ObligationProgress> {
        self.entries.get_mut(obligation_id)
    }

    /// Whether an obligation may still be attempted.
    pub fn is_open(&self, obligation_id: &str) -> bool {
        self.get(obligation_id).is_some_and(ObligationProgress::is_open)
    }

    /// Whether an obligation still owes occurrences.
    pub fn is_owing(&self, obligation_id: &str) -> bool {
        self.get(obligation_id)
            .is_some_and(ObligationProgress::is_owing)
    }

    /// Remaining occurrences of an obligation (0 if untracked).
    pub fn remaining(&self, obligation_id: &str) -> u32 {
        self.get(obligation_id).map(|p| p.remaining).unwrap_or(0)
    }

    /// Iterates over all tracked obligations.
    pub fn iter(&self) -> impl Iterator<Item = &ObligationProgress> {
        self.entries.values()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_anchor_then_replicate_to_fulfilled() {
        let mut p = ObligationProgress::new("O1", 3);
        assert!(p.is_open());

        assert!(p.anchor("s1", "R1"));
        assert!(!p.is_open());
        assert_eq!(p.remaining, 2);

        assert!(p.record_occurrence());
        assert!(p.record_occurrence());
        assert!(!p.record_occurrence());
        assert_eq!(p.outcome(), ObligationOutcome::Fulfilled);
        assert_eq!(p.placed(), 3);
    }

    #[test]
    fn test_partial_fulfillment() {
        let mut p = ObligationProgress::new("O1", 5);
        p.anchor("s1", "R1");
        p.record_occurrence();
        assert_eq!(
            p.outcome(),
            ObligationOutcome::PartiallyFulfilled {
                placed: 2,
                remaining: 3
            }
        );
    }

    #[test]
    fn test_forfeit_is_terminal() {
        let mut p = ObligationProgress::new("O1", 4);
        assert!(p.forfeit());
        assert!(!p.is_open());
        assert!(!p.anchor("s1", "R1"));
        assert!(!p.record_occurrence());
        assert!(!p.forfeit());
        assert_eq!(p.outcome(), ObligationOutcome::Unplaced { remaining: 4 });
    }

    #[test]
    fn test_anchor_only_once() {
        let mut p = ObligationProgress::new("O1", 4);
        assert!(p.anchor("s1", "R1"));
        assert!(!p.anchor("s2", "R2"));
        assert!(!p.forfeit());
        assert_eq!(
            p.state,
            ObligationState::Anchored {
                slot_id: "s1".into(),
                room_id: "R1".into()
            }
        );
    }

    #[test]
    fn test_zero_required_is_never_open() {
        let p = ObligationProgress::new("O1", 0);
        assert!(!p.is_open());
        assert_eq!(p.outcome(), ObligationOutcome::Fulfilled);
    }

    #[test]
    fn test_pending_outcome_is_unplaced() {
        let p = ObligationProgress::new("O1", 2);
        assert_eq!(p.outcome(), ObligationOutcome::Unplaced { remaining: 2 });
    }

    #[test]
    fn test_book() {
        let mut book = ProgressBook::new();
        book.track("O1", 2);
        book.track("O2", 0);

        assert!(book.is_open("O1"));
        assert!(!book.is_open("O2"));
        assert!(!book.is_open("O9"));
        assert_eq!(book.remaining("O1"), 2);
        assert_eq!(book.remaining("O9"), 0);

        if let Some(p) = book.get_mut("O1") {
            p.forfeit();
        }
        assert!(!book.is_open("O1"));
        assert!(book.is_owing("O1"));
        assert_eq!(book.iter().count(), 2);
    }
}
