//! Entitlement refresh with strict failure classification.
//!
//! A refresh either replaces the persisted snapshot atomically with the new
//! unlock set, or fails leaving it completely unchanged. The two failure
//! classes matter to callers: `Auth` means the key itself is bad, `Network`
//! means the key is presumed fine and the existing data is merely stale.

use std::path::PathBuf;

use thiserror::Error;
use tracing::{info, warn};

use crate::api::SkinApi;
use crate::auth::fingerprint;

use super::OverlaySnapshot;

#[derive(Error, Debug)]
pub enum OverlayError {
    /// The remote rejected the credential, or it was empty to begin with.
    /// The cached overlay is left unchanged.
    #[error("Invalid API key or missing permissions")]
    Auth,

    /// Any other failure: unreachable, timeout, malformed response, or a
    /// failure persisting the new snapshot. The cached overlay is left
    /// unchanged and should be treated as possibly stale.
    #[error("Could not sync latest account unlocks, showing cached data: {0}")]
    Network(anyhow::Error),
}

/// Fetches the account's unlocked-id overlay and persists it as a snapshot
/// in the cache directory.
pub struct OverlayFetcher<A> {
    api: A,
    cache_dir: PathBuf,
}

impl<A: SkinApi> OverlayFetcher<A> {
    pub fn new(api: A, cache_dir: PathBuf) -> Self {
        Self { api, cache_dir }
    }

    /// The last persisted snapshot, if any. Read once at startup; refresh
    /// failures never touch it.
    pub fn load_persisted(&self) -> Option<OverlaySnapshot> {
        match OverlaySnapshot::load(&self.cache_dir) {
            Ok(snapshot) => snapshot,
            Err(e) => {
                warn!(error = %e, "Failed to load persisted unlock snapshot");
                None
            }
        }
    }

    /// Fetch the current unlock set for `api_key`. On success the persisted
    /// snapshot is replaced wholesale and returned; on any failure the prior
    /// snapshot stays exactly as it was.
    pub async fn refresh(&self, api_key: &str) -> Result<OverlaySnapshot, OverlayError> {
        let key = api_key.trim();
        if key.is_empty() {
            return Err(OverlayError::Auth);
        }

        let ids = match self.api.fetch_account_unlocks(key).await {
            Ok(ids) => ids,
            Err(e) if e.is_auth() => {
                warn!(error = %e, "API key rejected by the entitlements endpoint");
                return Err(OverlayError::Auth);
            }
            Err(e) => return Err(OverlayError::Network(e.into())),
        };

        let snapshot = OverlaySnapshot::new(ids.into_iter().collect(), fingerprint(key));
        snapshot
            .save(&self.cache_dir)
            .map_err(OverlayError::Network)?;

        info!(unlocked = snapshot.unlocked.len(), "Account unlocks refreshed");
        Ok(snapshot)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use async_trait::async_trait;
    use tempfile::TempDir;

    use crate::api::ApiError;
    use crate::models::RawSkin;

    use super::*;

    /// Entitlements endpoint fake: one scripted response, counts calls.
    struct FakeUnlocks {
        response: Result<Vec<u64>, fn() -> ApiError>,
        calls: AtomicUsize,
    }

    impl FakeUnlocks {
        fn ok(ids: Vec<u64>) -> Self {
            Self {
                response: Ok(ids),
                calls: AtomicUsize::new(0),
            }
        }

        fn err(make: fn() -> ApiError) -> Self {
            Self {
                response: Err(make),
                calls: AtomicUsize::new(0),
            }
        }
    }

    #[async_trait]
    impl SkinApi for FakeUnlocks {
        async fn list_skin_ids(&self) -> Result<Vec<u64>, ApiError> {
            unimplemented!("not used by the overlay fetcher")
        }

        async fn fetch_skin_details(&self, _ids: &[u64]) -> Result<Vec<RawSkin>, ApiError> {
            unimplemented!("not used by the overlay fetcher")
        }

        async fn fetch_account_unlocks(&self, _api_key: &str) -> Result<Vec<u64>, ApiError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            match &self.response {
                Ok(ids) => Ok(ids.clone()),
                Err(make) => Err(make()),
            }
        }
    }

    fn seed_snapshot(dir: &TempDir, ids: &[u64]) {
        OverlaySnapshot::new(ids.iter().copied().collect(), "SEED".to_string())
            .save(dir.path())
            .unwrap();
    }

    fn persisted_ids(dir: &TempDir) -> BTreeSet<u64> {
        OverlaySnapshot::load(dir.path())
            .unwrap()
            .expect("snapshot should exist")
            .unlocked
    }

    #[tokio::test]
    async fn test_success_replaces_overlay_wholesale() {
        let dir = TempDir::new().unwrap();
        seed_snapshot(&dir, &[5, 9, 12]);

        let fetcher = OverlayFetcher::new(FakeUnlocks::ok(vec![5, 9]), dir.path().to_path_buf());
        let snapshot = fetcher.refresh("valid-key").await.unwrap();

        assert_eq!(snapshot.unlocked, [5, 9].into_iter().collect());
        assert_eq!(persisted_ids(&dir), [5, 9].into_iter().collect());
    }

    #[tokio::test]
    async fn test_auth_failure_preserves_overlay() {
        let dir = TempDir::new().unwrap();
        seed_snapshot(&dir, &[5, 9, 12]);

        let fetcher = OverlayFetcher::new(
            FakeUnlocks::err(|| ApiError::Unauthorized),
            dir.path().to_path_buf(),
        );
        let err = fetcher.refresh("bad-key").await.unwrap_err();

        assert!(matches!(err, OverlayError::Auth));
        assert_eq!(persisted_ids(&dir), [5, 9, 12].into_iter().collect());
    }

    #[tokio::test]
    async fn test_forbidden_classifies_as_auth() {
        let dir = TempDir::new().unwrap();
        let fetcher = OverlayFetcher::new(
            FakeUnlocks::err(|| ApiError::AccessDenied("missing unlocks scope".to_string())),
            dir.path().to_path_buf(),
        );
        assert!(matches!(
            fetcher.refresh("key-without-scope").await,
            Err(OverlayError::Auth)
        ));
    }

    #[tokio::test]
    async fn test_transient_failure_preserves_overlay() {
        let dir = TempDir::new().unwrap();
        seed_snapshot(&dir, &[5, 9, 12]);

        let fetcher = OverlayFetcher::new(
            FakeUnlocks::err(|| ApiError::ServerError("502".to_string())),
            dir.path().to_path_buf(),
        );
        let err = fetcher.refresh("valid-key").await.unwrap_err();

        assert!(matches!(err, OverlayError::Network(_)));
        assert_eq!(persisted_ids(&dir), [5, 9, 12].into_iter().collect());
    }

    #[tokio::test]
    async fn test_persist_failure_classifies_as_network_and_preserves_overlay() {
        let dir = TempDir::new().unwrap();
        seed_snapshot(&dir, &[5, 9, 12]);

        // A directory squatting on the temp-file path makes the snapshot
        // write fail after a successful fetch
        std::fs::create_dir(dir.path().join("unlocks.json.tmp")).unwrap();

        let fetcher = OverlayFetcher::new(FakeUnlocks::ok(vec![1, 2]), dir.path().to_path_buf());
        let err = fetcher.refresh("valid-key").await.unwrap_err();

        assert!(matches!(err, OverlayError::Network(_)));
        assert_eq!(persisted_ids(&dir), [5, 9, 12].into_iter().collect());
    }

    #[tokio::test]
    async fn test_empty_key_fails_before_any_call() {
        let dir = TempDir::new().unwrap();
        seed_snapshot(&dir, &[5, 9, 12]);

        let api = FakeUnlocks::ok(vec![1, 2]);
        let fetcher = OverlayFetcher::new(api, dir.path().to_path_buf());

        assert!(matches!(fetcher.refresh("   ").await, Err(OverlayError::Auth)));
        assert_eq!(fetcher.api.calls.load(Ordering::SeqCst), 0);
        assert_eq!(persisted_ids(&dir), [5, 9, 12].into_iter().collect());
    }

    #[tokio::test]
    async fn test_refresh_with_no_prior_snapshot() {
        let dir = TempDir::new().unwrap();
        let fetcher = OverlayFetcher::new(FakeUnlocks::ok(vec![7]), dir.path().to_path_buf());

        assert!(fetcher.load_persisted().is_none());
        let snapshot = fetcher.refresh("valid-key").await.unwrap();
        assert_eq!(snapshot.unlocked, [7].into_iter().collect());
        assert_eq!(fetcher.load_persisted().unwrap().unlocked, snapshot.unlocked);
    }
}
