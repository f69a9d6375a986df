//! Account unlock overlay.
//!
//! This module provides:
//! - `OverlaySnapshot`: the persisted set of unlocked skin ids, stamped with
//!   the credential fingerprint that produced it
//! - `OverlayFetcher`: refreshes the overlay from the entitlements endpoint,
//!   classifying credential failure apart from transient failure
//!
//! The overlay is only ever replaced wholesale on a successful refresh; any
//! failure leaves the existing snapshot untouched.

pub mod fetcher;
pub mod snapshot;

pub use fetcher::{OverlayFetcher, OverlayError};
pub use snapshot::OverlaySnapshot;
