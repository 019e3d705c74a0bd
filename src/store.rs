//! Data collaborator seams.
//!
//! - [`SnapshotSource`]: loads the reference snapshot before a run
//! - [`PlacementStore`]: persists placements and preference statuses
//!
//! The engine never talks to a database directly. The in-memory
//! implementations here serve development and testing.

use std::collections::BTreeMap;

use crate::config::PreferenceScope;
use crate::error::StoreError;
use crate::models::{Placement, PreferenceStatus, Snapshot};

/// Supplies the reference snapshot for a run.
pub trait SnapshotSource {
    /// Loads every reference collection.
    fn load(&self) -> Result<Snapshot, StoreError>;
}

/// Placement persistence.
pub trait PlacementStore {
    /// Deletes every stored placement of a term. Returns the number deleted.
    fn clear(&mut self, term_id: &str) -> Result<usize, StoreError>;

    /// Inserts placements in one batch. Returns the number inserted.
    fn bulk_insert(&mut self, placements: &[Placement]) -> Result<usize, StoreError>;

    /// Replaces a term's placements. Returns `(deleted, inserted)`.
    ///
    /// The default clears then inserts; transactional stores should
    /// override this to commit both in one transaction.
    fn replace_term(
        &mut self,
        term_id: &str,
        placements: &[Placement],
    ) -> Result<(usize, usize), StoreError> {
        let deleted = self.clear(term_id)?;
        let inserted = self.bulk_insert(placements)?;
        Ok((deleted, inserted))
    }

    /// Stamps preferences as applied. Returns the number updated.
    fn mark_preferences_applied(
        &mut self,
        scope: PreferenceScope,
        term_id: &str,
    ) -> Result<usize, StoreError>;
}

/// Snapshot source over a fixed, already-built snapshot.
#[derive(Debug, Clone, Default)]
pub struct StaticSnapshotSource {
    snapshot: Snapshot,
}

impl StaticSnapshotSource {
    /// Wraps a snapshot.
    pub fn new(snapshot: Snapshot) -> Self {
        Self { snapshot }
    }

    /// Parses a snapshot from JSON.
    pub fn from_json(json: &str) -> Result<Self, StoreError> {
        let snapshot =
            serde_json::from_str(json).map_err(|e| StoreError::Serialization(e.to_string()))?;
        Ok(Self::new(snapshot))
    }
}

impl SnapshotSource for StaticSnapshotSource {
    fn load(&self) -> Result<Snapshot, StoreError> {
        Ok(self.snapshot.clone())
    }
}

/// In-memory placement store.
///
/// Assigns sequential ids on insert and keeps its own copy of preference
/// statuses, keyed by preference id with the owning term.
#[derive(Debug, Clone)]
pub struct InMemoryPlacementStore {
    placements: Vec<Placement>,
    next_id: u64,
    preferences: BTreeMap<String, (String, PreferenceStatus)>,
}

impl InMemoryPlacementStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self {
            placements: Vec::new(),
            next_id: 1,
            preferences: BTreeMap::new(),
        }
    }

    /// Seeds the store with the preferences of a snapshot.
    pub fn with_preferences_from(mut self, snapshot: &Snapshot) -> Self {
        for p in snapshot.preferences.values() {
            self.preferences
                .insert(p.id.clone(), (p.term_id.clone(), p.status));
        }
        self
    }

    /// Stored placements of a term.
    pub fn placements_for_term(&self, term_id: &str) -> Vec<&Placement> {
        self.placements
            .iter()
            .filter(|p| p.term_id == term_id)
            .collect()
    }

    /// Number of stored placements across all terms.
    pub fn len(&self) -> usize {
        self.placements.len()
    }

    /// Whether nothing is stored.
    pub fn is_empty(&self) -> bool {
        self.placements.is_empty()
    }

    /// Current status of a preference.
    pub fn preference_status(&self, preference_id: &str) -> Option<PreferenceStatus> {
        self.preferences.get(preference_id).map(|(_, s)| *s)
    }
}

impl Default for InMemoryPlacementStore {
    fn default() -> Self {
        Self::new()
    }
}

impl PlacementStore for InMemoryPlacementStore {
    fn clear(&mut self, term_id: &str) -> Result<usize, StoreError> {
        let before = self.placements.len();
        self.placements.retain(|p| p.term_id != term_id);
        Ok(before - self.placements.len())
    }

    fn bulk_insert(&mut self, placements: &[Placement]) -> Result<usize, StoreError> {
        for p in placements {
            let stored = p.clone().with_id(self.next_id);
            self.next_id += 1;
            self.placements.push(stored);
        }
        Ok(placements.len())
    }

    fn mark_preferences_applied(
        &mut self,
        scope: PreferenceScope,
        term_id: &str,
    ) -> Result<usize, StoreError> {
        let mut updated = 0;
        for (term, status) in self.preferences.values_mut() {
            if scope == PreferenceScope::All || term.as_str() == term_id {
                *status = PreferenceStatus::Applied;
                updated += 1;
            }
        }
        Ok(updated)
    }
}
