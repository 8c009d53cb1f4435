//! Multi-well handle registry
//!
//! Concurrent map from well id to the live [`WellHandle`] for that well.
//! Producers on different tasks share one registry; the per-well actor
//! behind each handle is what serializes their writes.

use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use tracing::info;

use super::{spawn, WellHandle};
use crate::types::WellPlan;

/// Registry of live well actors, keyed by well id.
#[derive(Default)]
pub struct WellRegistry {
    wells: DashMap<String, WellHandle>,
}

impl WellRegistry {
    pub fn new() -> Self {
        Self {
            wells: DashMap::new(),
        }
    }

    /// Fetch the handle for a well, spawning its actor on first open.
    ///
    /// The plan only seeds a newly spawned actor; an already-open well
    /// keeps its current plan (swap it through the handle's `set_plan`).
    pub fn open(&self, well_id: &str, plan: WellPlan) -> WellHandle {
        match self.wells.entry(well_id.to_string()) {
            Entry::Occupied(entry) => entry.get().clone(),
            Entry::Vacant(entry) => {
                info!(well_id, "spawning well actor");
                entry.insert(spawn(well_id, plan)).value().clone()
            }
        }
    }

    pub fn get(&self, well_id: &str) -> Option<WellHandle> {
        self.wells.get(well_id).map(|entry| entry.value().clone())
    }

    /// Drop a well from the registry.
    ///
    /// The returned handle (and any clones still held elsewhere) keeps the
    /// actor alive; once the last clone drops, the command channel closes
    /// and the actor stops.
    pub fn remove(&self, well_id: &str) -> Option<WellHandle> {
        let removed = self.wells.remove(well_id).map(|(_, handle)| handle);
        if removed.is_some() {
            info!(well_id, "well removed from registry");
        }
        removed
    }

    pub fn well_ids(&self) -> Vec<String> {
        self.wells.iter().map(|entry| entry.key().clone()).collect()
    }

    pub fn len(&self) -> usize {
        self.wells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.wells.is_empty()
    }
}
