//! Resumable progress snapshots.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use resi_model::ImportRunStats;
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::io::{read_json, remove_if_exists, write_json_atomic};

/// State after the last completed batch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgressSnapshot {
    /// Zero-based index of the last batch whose records were all classified.
    pub last_batch: usize,
    pub stats: ImportRunStats,
    pub timestamp: DateTime<Utc>,
}

impl ProgressSnapshot {
    pub fn new(last_batch: usize, stats: ImportRunStats) -> Self {
        Self {
            last_batch,
            stats,
            timestamp: Utc::now(),
        }
    }

    /// Batch a resumed run starts from.
    pub fn next_batch(&self) -> usize {
        self.last_batch + 1
    }
}

/// Reads and writes the snapshot file.
#[derive(Debug, Clone)]
pub struct ProgressStore {
    path: PathBuf,
}

impl ProgressStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Snapshot left by an earlier run, if any.
    pub fn load(&self) -> Result<Option<ProgressSnapshot>> {
        let snapshot: Option<ProgressSnapshot> = read_json(&self.path)?;
        if let Some(snapshot) = &snapshot {
            tracing::info!(
                path = %self.path.display(),
                last_batch = snapshot.last_batch,
                success = snapshot.stats.success,
                failed = snapshot.stats.failed,
                "found progress snapshot"
            );
        }
        Ok(snapshot)
    }

    pub fn save(&self, snapshot: &ProgressSnapshot) -> Result<()> {
        write_json_atomic(&self.path, snapshot)?;
        tracing::debug!(path = %self.path.display(), last_batch = snapshot.last_batch, "saved progress");
        Ok(())
    }

    /// Remove the snapshot after a completed run.
    pub fn clear(&self) -> Result<()> {
        if remove_if_exists(&self.path)? {
            tracing::debug!(path = %self.path.display(), "removed progress snapshot");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn save_load_and_clear() {
        let dir = tempdir().unwrap();
        let store = ProgressStore::new(dir.path().join("logs").join("import-progress.json"));
        assert!(store.load().unwrap().is_none());

        let mut stats = ImportRunStats::new(250);
        stats.record_success(100);
        store.save(&ProgressSnapshot::new(0, stats)).unwrap();

        let loaded = store.load().unwrap().unwrap();
        assert_eq!(loaded.last_batch, 0);
        assert_eq!(loaded.next_batch(), 1);
        assert_eq!(loaded.stats.success, 100);
        assert!(!store.path().with_extension("json.tmp").exists());

        store.clear().unwrap();
        assert!(!store.path().exists());
        store.clear().unwrap();
    }

    #[test]
    fn snapshot_uses_camel_case_keys() {
        let snapshot = ProgressSnapshot::new(2, ImportRunStats::new(10));
        let json = serde_json::to_value(&snapshot).unwrap();
        assert_eq!(json["lastBatch"], 2);
        assert_eq!(json["stats"]["total"], 10);
        assert!(json["timestamp"].is_string());
    }

    #[test]
    fn corrupt_snapshot_is_an_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("import-progress.json");
        std::fs::write(&path, "{not json").unwrap();
        assert!(ProgressStore::new(path).load().is_err());
    }
}
