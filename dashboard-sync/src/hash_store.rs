//! Hash store: SHA-256-based idempotency tracking for materialized files.
//!
//! Persists a `HashStoreFile` JSON document at
//! `<home>/.dashboard/hashes/<environment>.json`.
//! Writes use the same atomic `.tmp` + rename pattern as the environment store.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{io_err, SyncError};

/// In-memory hash store: maps output path strings to their last written
/// SHA-256 hex digest.
pub type HashStore = HashMap<String, String>;

/// On-disk hash store payload.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct HashStoreFile {
    /// Time of the last non-dry-run sync; `None` before the first one.
    #[serde(default)]
    pub synced_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub files: HashStore,
}

/// `<home>/.dashboard/hashes/<environment>.json`
pub fn store_path_at(home: &Path, environment: &str) -> PathBuf {
    home.join(".dashboard")
        .join("hashes")
        .join(format!("{environment}.json"))
}

/// Load the hash store for `environment`.
///
/// Returns an empty store if the file does not yet exist.
pub fn load_at(home: &Path, environment: &str) -> Result<HashStoreFile, SyncError> {
    let path = store_path_at(home, environment);
    if !path.exists() {
        return Ok(HashStoreFile::default());
    }
    let contents = std::fs::read_to_string(&path).map_err(|e| io_err(&path, e))?;
    Ok(serde_json::from_str(&contents)?)
}

/// Save the hash store for `environment` atomically.
///
/// Writes to `<path>.tmp` then renames to `<path>`.
pub fn save_at(home: &Path, environment: &str, store: &HashStoreFile) -> Result<(), SyncError> {
    let path = store_path_at(home, environment);
    let Some(dir) = path.parent() else {
        return Err(io_err(
            path,
            std::io::Error::other("invalid hash store path"),
        ));
    };

    std::fs::create_dir_all(dir).map_err(|e| io_err(dir, e))?;

    let json = serde_json::to_string_pretty(store)?;
    let tmp = path.with_extension("json.tmp");
    std::fs::write(&tmp, &json).map_err(|e| io_err(&tmp, e))?;
    std::fs::rename(&tmp, &path).map_err(|e| io_err(&path, e))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn empty_store_when_file_missing() {
        let tmp = TempDir::new().unwrap();
        let store = load_at(tmp.path(), "nonexistent").unwrap();
        assert!(store.files.is_empty());
        assert!(store.synced_at.is_none());
    }

    #[test]
    fn roundtrip_save_load() {
        let tmp = TempDir::new().unwrap();
        let mut files = HashMap::new();
        files.insert("/srv/dash/build/pipeline.yaml".to_string(), "deadbeef".to_string());
        let store = HashStoreFile {
            synced_at: Some(Utc::now()),
            files,
        };

        save_at(tmp.path(), "zero-etl", &store).unwrap();
        let loaded = load_at(tmp.path(), "zero-etl").unwrap();
        assert_eq!(loaded, store);
    }

    #[test]
    fn tmp_file_cleaned_up_after_save() {
        let tmp = TempDir::new().unwrap();
        save_at(tmp.path(), "clean_test", &HashStoreFile::default()).unwrap();
        let tmp_path = store_path_at(tmp.path(), "clean_test").with_extension("json.tmp");
        assert!(
            !tmp_path.exists(),
            "tmp file should be removed after atomic rename"
        );
    }

    #[test]
    fn corrupt_store_is_json_error() {
        let tmp = TempDir::new().unwrap();
        let path = store_path_at(tmp.path(), "broken");
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(&path, "{not json").unwrap();
        assert!(matches!(load_at(tmp.path(), "broken"), Err(SyncError::Json(_))));
    }
}
