//! Durable id -> Skin store with all-or-nothing bulk writes.
//!
//! The whole collection lives in one JSON file. `put_bulk` serializes the
//! updated collection to a temporary file and renames it over the old one,
//! so a batch either becomes durably visible in its entirety or not at all;
//! a failed write never leaves partial state on disk or in memory.

use std::collections::{BTreeMap, BTreeSet};
use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::debug;

use crate::models::Skin;

/// Store file name inside the cache directory
const STORE_FILE: &str = "skins.json";

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Failed to read skin cache: {0}")]
    Read(#[source] std::io::Error),

    #[error("Skin cache file is corrupt: {0}")]
    Corrupt(#[from] serde_json::Error),

    #[error("Failed to write skin cache: {0}")]
    Write(#[source] std::io::Error),
}

/// Durable mapping of skin id to record, append-only under normal operation.
pub struct SkinStore {
    path: PathBuf,
    skins: BTreeMap<u64, Skin>,
}

impl SkinStore {
    /// Open the store backed by `skins.json` under `cache_dir`. The file is
    /// created lazily on the first write; a missing file is an empty store.
    pub fn open(cache_dir: &Path) -> Result<Self, StoreError> {
        fs::create_dir_all(cache_dir).map_err(StoreError::Read)?;
        let path = cache_dir.join(STORE_FILE);

        let skins = if path.exists() {
            let contents = fs::read_to_string(&path).map_err(StoreError::Read)?;
            let list: Vec<Skin> = serde_json::from_str(&contents)?;
            list.into_iter().map(|s| (s.id, s)).collect()
        } else {
            BTreeMap::new()
        };

        debug!(count = skins.len(), path = %path.display(), "Skin store opened");
        Ok(Self { path, skins })
    }

    /// All cached records, in id order.
    pub fn get_all(&self) -> Vec<Skin> {
        self.skins.values().cloned().collect()
    }

    /// The set of cached ids, used to compute the missing set.
    pub fn ids(&self) -> BTreeSet<u64> {
        self.skins.keys().copied().collect()
    }

    pub fn len(&self) -> usize {
        self.skins.len()
    }

    pub fn is_empty(&self) -> bool {
        self.skins.is_empty()
    }

    /// Idempotent bulk upsert keyed by id. Either every item in the call
    /// becomes durably visible to subsequent reads or none does; on error
    /// callers must not assume partial success.
    pub fn put_bulk(&mut self, items: &[Skin]) -> Result<(), StoreError> {
        if items.is_empty() {
            return Ok(());
        }

        let mut updated = self.skins.clone();
        for skin in items {
            updated.insert(skin.id, skin.clone());
        }

        Self::persist(&self.path, &updated)?;
        self.skins = updated;
        Ok(())
    }

    /// Remove every cached record. The only removal path; never invoked by
    /// the sync engine.
    pub fn clear(&mut self) -> Result<(), StoreError> {
        if self.path.exists() {
            fs::remove_file(&self.path).map_err(StoreError::Write)?;
        }
        self.skins.clear();
        Ok(())
    }

    fn persist(path: &Path, skins: &BTreeMap<u64, Skin>) -> Result<(), StoreError> {
        let list: Vec<&Skin> = skins.values().collect();
        let contents = serde_json::to_string(&list)?;

        // Write-to-temp then rename keeps the previous state intact if the
        // write fails partway
        let tmp = path.with_extension("json.tmp");
        fs::write(&tmp, contents).map_err(StoreError::Write)?;
        fs::rename(&tmp, path).map_err(StoreError::Write)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::RawSkin;
    use tempfile::TempDir;

    fn skin(id: u64, name: &str) -> Skin {
        RawSkin {
            id,
            name: Some(name.to_string()),
            kind: Some("Weapon".to_string()),
            rarity: Some("Fine".to_string()),
            ..RawSkin::default()
        }
        .validate()
        .unwrap()
    }

    #[test]
    fn test_open_missing_file_is_empty() {
        let dir = TempDir::new().unwrap();
        let store = SkinStore::open(dir.path()).unwrap();
        assert!(store.is_empty());
        assert!(store.ids().is_empty());
    }

    #[test]
    fn test_put_bulk_and_get_all() {
        let dir = TempDir::new().unwrap();
        let mut store = SkinStore::open(dir.path()).unwrap();

        store.put_bulk(&[skin(2, "b"), skin(1, "a")]).unwrap();
        let all = store.get_all();
        assert_eq!(all.len(), 2);
        // Id order
        assert_eq!(all[0].id, 1);
        assert_eq!(all[1].id, 2);
        assert_eq!(store.ids().into_iter().collect::<Vec<_>>(), vec![1, 2]);
    }

    #[test]
    fn test_put_bulk_is_idempotent_upsert() {
        let dir = TempDir::new().unwrap();
        let mut store = SkinStore::open(dir.path()).unwrap();

        store.put_bulk(&[skin(1, "old")]).unwrap();
        store.put_bulk(&[skin(1, "new"), skin(1, "new")]).unwrap();
        let all = store.get_all();
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].name, "new");
    }

    #[test]
    fn test_durability_across_reopen() {
        let dir = TempDir::new().unwrap();
        {
            let mut store = SkinStore::open(dir.path()).unwrap();
            store.put_bulk(&[skin(5, "five"), skin(9, "nine")]).unwrap();
        }
        let store = SkinStore::open(dir.path()).unwrap();
        assert_eq!(store.len(), 2);
        assert_eq!(store.get_all()[0].name, "five");
    }

    #[test]
    fn test_store_only_grows_across_writes() {
        let dir = TempDir::new().unwrap();
        let mut store = SkinStore::open(dir.path()).unwrap();

        store.put_bulk(&[skin(1, "a")]).unwrap();
        store.put_bulk(&[skin(2, "b")]).unwrap();
        store.put_bulk(&[]).unwrap();
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn test_clear_removes_everything() {
        let dir = TempDir::new().unwrap();
        let mut store = SkinStore::open(dir.path()).unwrap();
        store.put_bulk(&[skin(1, "a")]).unwrap();

        store.clear().unwrap();
        assert!(store.is_empty());

        let reopened = SkinStore::open(dir.path()).unwrap();
        assert!(reopened.is_empty());
    }

    #[test]
    fn test_corrupt_file_is_an_error_not_data_loss() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join(STORE_FILE), "not json").unwrap();
        assert!(matches!(
            SkinStore::open(dir.path()),
            Err(StoreError::Corrupt(_))
        ));
    }
}
