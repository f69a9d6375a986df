use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Snapshot file name in the cache directory
const SNAPSHOT_FILE: &str = "unlocks.json";

/// Persisted set of unlocked skin ids, together with a fingerprint of the
/// API key that produced it and the time it was fetched. Survives across
/// sessions and is overwritten wholesale on each successful refresh.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OverlaySnapshot {
    pub unlocked: BTreeSet<u64>,
    pub key_fingerprint: String,
    pub fetched_at: DateTime<Utc>,
}

impl OverlaySnapshot {
    pub fn new(unlocked: BTreeSet<u64>, key_fingerprint: String) -> Self {
        Self {
            unlocked,
            key_fingerprint,
            fetched_at: Utc::now(),
        }
    }

    /// Load the persisted snapshot, if one exists. Read once at startup.
    pub fn load(cache_dir: &Path) -> Result<Option<Self>> {
        let path = Self::snapshot_path(cache_dir);
        if !path.exists() {
            return Ok(None);
        }
        let contents =
            fs::read_to_string(&path).context("Failed to read unlock snapshot file")?;
        let snapshot: Self =
            serde_json::from_str(&contents).context("Failed to parse unlock snapshot file")?;
        Ok(Some(snapshot))
    }

    /// Persist atomically, replacing any prior snapshot wholesale.
    pub fn save(&self, cache_dir: &Path) -> Result<()> {
        fs::create_dir_all(cache_dir)?;
        let path = Self::snapshot_path(cache_dir);
        let contents = serde_json::to_string_pretty(self)?;

        let tmp = path.with_extension("json.tmp");
        fs::write(&tmp, contents).context("Failed to write unlock snapshot file")?;
        fs::rename(&tmp, &path).context("Failed to replace unlock snapshot file")?;
        Ok(())
    }

    /// Remove the persisted snapshot.
    pub fn clear(cache_dir: &Path) -> Result<()> {
        let path = Self::snapshot_path(cache_dir);
        if path.exists() {
            fs::remove_file(path).context("Failed to remove unlock snapshot file")?;
        }
        Ok(())
    }

    fn snapshot_path(cache_dir: &Path) -> PathBuf {
        cache_dir.join(SNAPSHOT_FILE)
    }
}
