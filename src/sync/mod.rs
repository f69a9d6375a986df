//! Catalog reconciliation.
//!
//! This module provides the `SyncEngine`, which brings the local skin store
//! to parity with the remote catalog: set-difference against the remote id
//! list, strictly sequential batched fetches of the missing records,
//! write-through to the store, and progress events over an mpsc channel.
//! A single failed batch is contained and naturally retried on the next run.

pub mod engine;

pub use engine::{
    BatchError, BatchFailure, SyncEngine, SyncError, SyncProgress, SyncReport, DEFAULT_BATCH_SIZE,
};
