//! Durable local skin cache.
//!
//! This module provides the `SkinStore`, a keyed collection of validated
//! skin records persisted as a single JSON file in the cache directory.
//! The store only grows across successful runs; an explicit `clear` is the
//! only removal path and the sync engine never invokes it.

pub mod store;

pub use store::{SkinStore, StoreError};
