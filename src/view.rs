//! Read surface over the reconciled catalog and unlock overlay.
//!
//! A presentation layer consumes this; the engine itself never reads it.

use std::collections::BTreeSet;

use rand::seq::SliceRandom;

use crate::models::Skin;

/// Reconciled catalog paired with the account's unlocked overlay.
pub struct WardrobeView {
    skins: Vec<Skin>,
    unlocked: BTreeSet<u64>,
}

impl WardrobeView {
    pub fn new(skins: Vec<Skin>, unlocked: BTreeSet<u64>) -> Self {
        Self { skins, unlocked }
    }

    pub fn skins(&self) -> &[Skin] {
        &self.skins
    }

    pub fn is_unlocked(&self, id: u64) -> bool {
        self.unlocked.contains(&id)
    }

    /// Unlocked ids that actually exist in the catalog.
    pub fn unlocked_count(&self) -> usize {
        self.skins
            .iter()
            .filter(|s| self.unlocked.contains(&s.id))
            .count()
    }

    /// Pick a uniformly random still-locked skin that is complete enough to
    /// display. `None` when everything displayable is already unlocked.
    pub fn random_locked(&self) -> Option<&Skin> {
        let locked: Vec<&Skin> = self
            .skins
            .iter()
            .filter(|s| !self.unlocked.contains(&s.id) && s.is_displayable())
            .collect();
        locked.choose(&mut rand::thread_rng()).copied()
    }
}
