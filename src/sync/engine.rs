//! The reconciliation algorithm.
//!
//! One run: read the store snapshot, fetch the remote id list, compute the
//! missing set, then fetch it in fixed-size batches in remote-list order.
//! Each successful batch is validated and written through to the store
//! before the next batch starts; each failed batch is recorded and skipped,
//! its ids left for the next run to pick up again.

use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use crate::api::{ApiError, SkinApi};
use crate::cache::{SkinStore, StoreError};
use crate::models::{RawSkin, Skin};

/// Ids fetched per batch-details call.
/// The remote handles ~200 ids per request but the comma-joined id list also
/// has to fit in a URL; 150 keeps requests safely sized while keeping the
/// call count low.
pub const DEFAULT_BATCH_SIZE: usize = 150;

/// Progress phase reported while batches are being fetched
const PHASE_DOWNLOADING: &str = "downloading skin details";

/// Transient progress of one sync run. `current` counts ids requested so
/// far, not records kept, so the numbers stay monotonic even when malformed
/// records are filtered out.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncProgress {
    pub current: usize,
    pub total: usize,
    pub phase: &'static str,
}

/// Fatal failure of the initial phase of a run. Batch-level failures are
/// contained in the report instead.
#[derive(Debug, thiserror::Error)]
pub enum SyncError {
    #[error("Failed to fetch the remote skin list: {0}")]
    Init(#[from] ApiError),
}

/// Why a single batch contributed nothing to the run.
#[derive(Debug, thiserror::Error)]
pub enum BatchError {
    #[error("Batch fetch failed: {0}")]
    Fetch(#[from] ApiError),

    #[error("Batch cache write failed: {0}")]
    Store(#[from] StoreError),
}

/// A batch that failed during a run. Its ids are absent from the store and
/// will be recomputed as missing next time.
#[derive(Debug)]
pub struct BatchFailure {
    pub ids: Vec<u64>,
    pub error: BatchError,
}

/// Outcome of one completed run.
#[derive(Debug, Default)]
pub struct SyncReport {
    /// Reconciled view: the snapshot at the start of the run plus every
    /// validated newly-fetched record.
    pub skins: Vec<Skin>,
    /// Number of newly cached records.
    pub fetched: usize,
    /// Batches that contributed nothing this run.
    pub failed_batches: Vec<BatchFailure>,
}

/// Drives one reconciliation run at a time over a remote API. The caller is
/// responsible for not pointing two engines at the same store concurrently.
pub struct SyncEngine<A> {
    api: A,
    batch_size: usize,
}

impl<A: SkinApi> SyncEngine<A> {
    pub fn new(api: A) -> Self {
        Self {
            api,
            batch_size: DEFAULT_BATCH_SIZE,
        }
    }

    pub fn with_batch_size(mut self, batch_size: usize) -> Self {
        self.batch_size = batch_size.max(1);
        self
    }

    /// Bring `store` to parity with the remote catalog. Progress events are
    /// sent over `progress` if given; the sender is dropped when the run
    /// completes. Only the remote-list phase can fail the whole run.
    pub async fn run(
        &self,
        store: &mut SkinStore,
        progress: Option<mpsc::Sender<SyncProgress>>,
    ) -> Result<SyncReport, SyncError> {
        let snapshot = store.get_all();
        let cached = store.ids();

        let remote = self.api.list_skin_ids().await?;

        // Remote-list order, so batching is deterministic across runs
        let missing: Vec<u64> = remote
            .into_iter()
            .filter(|id| !cached.contains(id))
            .collect();

        if missing.is_empty() {
            debug!(cached = cached.len(), "Cache already at parity with remote");
            return Ok(SyncReport {
                skins: snapshot,
                fetched: 0,
                failed_batches: Vec::new(),
            });
        }

        let total = missing.len();
        info!(missing = total, cached = cached.len(), "Starting catalog sync");

        let mut current = 0usize;
        Self::report(&progress, SyncProgress {
            current,
            total,
            phase: PHASE_DOWNLOADING,
        })
        .await;

        let mut new_skins: Vec<Skin> = Vec::new();
        let mut failed_batches: Vec<BatchFailure> = Vec::new();

        for batch in missing.chunks(self.batch_size) {
            match self.fetch_batch(batch, store).await {
                Ok(valid) => {
                    new_skins.extend(valid);
                    current += batch.len();
                    Self::report(&progress, SyncProgress {
                        current,
                        total,
                        phase: PHASE_DOWNLOADING,
                    })
                    .await;
                }
                Err(error) => {
                    // Contained: the rest of the catalog still syncs and
                    // these ids come back as missing on the next run
                    warn!(batch_len = batch.len(), %error, "Batch failed, continuing");
                    failed_batches.push(BatchFailure {
                        ids: batch.to_vec(),
                        error,
                    });
                }
            }
        }

        info!(
            fetched = new_skins.len(),
            failed_batches = failed_batches.len(),
            "Catalog sync finished"
        );

        let fetched = new_skins.len();
        let mut skins = snapshot;
        skins.extend(new_skins);

        Ok(SyncReport {
            skins,
            fetched,
            failed_batches,
        })
    }

    /// Fetch one batch, drop records without a usable name, and write the
    /// valid subset through to the store.
    async fn fetch_batch(
        &self,
        ids: &[u64],
        store: &mut SkinStore,
    ) -> Result<Vec<Skin>, BatchError> {
        let raw = self.api.fetch_skin_details(ids).await?;
        let returned = raw.len();

        let valid: Vec<Skin> = raw.into_iter().filter_map(RawSkin::validate).collect();
        if valid.len() < returned {
            debug!(
                dropped = returned - valid.len(),
                "Dropped malformed records from batch"
            );
        }

        store.put_bulk(&valid)?;
        Ok(valid)
    }

    async fn report(progress: &Option<mpsc::Sender<SyncProgress>>, event: SyncProgress) {
        if let Some(tx) = progress {
            if tx.send(event).await.is_err() {
                debug!("Progress receiver dropped");
            }
        }
    }
}
