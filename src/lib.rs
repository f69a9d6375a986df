//! skincache - local cache and sync engine for the Guild Wars 2 skin catalog.
//!
//! The catalog (tens of thousands of records, mostly static) is mirrored
//! into a durable local store and topped up on each run by fetching only the
//! ids the remote has that the store does not, in fixed-size sequential
//! batches that tolerate individual failures. A small per-account overlay of
//! unlocked ids is refreshed separately with strict credential-vs-transient
//! error classification, so a flaky network can never wipe out good cached
//! unlock data.
//!
//! Typical use:
//!
//! ```no_run
//! use skincache::api::CatalogClient;
//! use skincache::cache::SkinStore;
//! use skincache::sync::SyncEngine;
//!
//! # async fn run() -> anyhow::Result<()> {
//! let client = CatalogClient::new("en")?;
//! let mut store = SkinStore::open(std::path::Path::new("./cache"))?;
//! let report = SyncEngine::new(client).run(&mut store, None).await?;
//! println!("{} skins cached", report.skins.len());
//! # Ok(())
//! # }
//! ```

pub mod api;
pub mod auth;
pub mod cache;
pub mod config;
pub mod models;
pub mod overlay;
pub mod sync;
pub mod view;

pub use api::{ApiError, CatalogClient, SkinApi};
pub use cache::{SkinStore, StoreError};
pub use config::Config;
pub use models::{RawSkin, Skin, SkinDetails};
pub use overlay::{OverlayError, OverlayFetcher, OverlaySnapshot};
pub use sync::{SyncEngine, SyncError, SyncProgress, SyncReport};
pub use view::WardrobeView;
