//! Atomic writer and sync orchestration.
//!
//! ## `atomic_write` protocol
//!
//! 1. Render content (already done by caller).
//! 2. SHA-256 hash the rendered content.
//! 3. Hash the LF-normalized content already on disk.
//! 4. Skip if the two digests match (the store entry is refreshed).
//! 5. Write to `<path>.dashboard.tmp`.
//! 6. Rename to final path (atomic on POSIX).
//! 7. Update hash store entry + save store.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use chrono::Utc;
use sha2::{Digest, Sha256};

use dashboard_core::{environment, types::EnvironmentName};

use crate::error::{io_err, SyncError};
use crate::hash_store;
use crate::outputs::render_outputs;

// ---------------------------------------------------------------------------
// Write result
// ---------------------------------------------------------------------------

/// Outcome of an individual file write.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WriteResult {
    /// File was written (content changed or did not previously exist).
    Written { path: PathBuf },
    /// File was skipped: rendered content matches the stored hash.
    Unchanged { path: PathBuf },
    /// `--dry-run` mode: the file *would* have been written.
    WouldWrite { path: PathBuf },
}

// ---------------------------------------------------------------------------
// atomic_write
// ---------------------------------------------------------------------------

/// Atomically write a single rendered file and update the in-memory hash store.
///
/// The caller is responsible for saving the store after all files of an
/// environment are processed.
pub(crate) fn atomic_write(
    path: &Path,
    content: &str,
    hash_store: &mut hash_store::HashStore,
    dry_run: bool,
) -> Result<WriteResult, SyncError> {
    let tmp = PathBuf::from(format!("{}.dashboard.tmp", path.display()));
    atomic_write_with_tmp(path, content, hash_store, dry_run, &tmp)
}

fn atomic_write_with_tmp(
    path: &Path,
    content: &str,
    hash_store: &mut hash_store::HashStore,
    dry_run: bool,
    tmp: &Path,
) -> Result<WriteResult, SyncError> {
    // Normalise line endings to LF before hashing and writing.
    let normalized = content.replace("\r\n", "\n");
    let content = normalized.as_str();

    let digest = sha256_hex(content);

    let key = path.to_string_lossy().to_string();
    if existing_digest(path)?.as_deref() == Some(digest.as_str()) {
        tracing::debug!("unchanged: {}", path.display());
        if !dry_run {
            hash_store.insert(key, digest);
        }
        return Ok(WriteResult::Unchanged {
            path: path.to_path_buf(),
        });
    }

    if dry_run {
        tracing::info!("[dry-run] would write: {}", path.display());
        return Ok(WriteResult::WouldWrite {
            path: path.to_path_buf(),
        });
    }

    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(|e| io_err(parent, e))?;
    }
    if let Some(tmp_parent) = tmp.parent() {
        std::fs::create_dir_all(tmp_parent).map_err(|e| io_err(tmp_parent, e))?;
    }
    std::fs::write(tmp, content).map_err(|e| io_err(tmp, e))?;

    if let Err(e) = std::fs::rename(tmp, path) {
        let _ = std::fs::remove_file(tmp);
        return Err(io_err(path, e));
    }

    hash_store.insert(key, digest);

    tracing::info!("wrote: {}", path.display());
    Ok(WriteResult::Written {
        path: path.to_path_buf(),
    })
}

fn sha256_hex(content: &str) -> String {
    let mut h = Sha256::new();
    h.update(content.as_bytes());
    hex::encode(h.finalize())
}

/// Digest of the LF-normalized content currently at `path`.
///
/// `None` when the file is missing or not UTF-8 text.
fn existing_digest(path: &Path) -> Result<Option<String>, SyncError> {
    match std::fs::read_to_string(path) {
        Ok(existing) => Ok(Some(sha256_hex(&existing.replace("\r\n", "\n")))),
        Err(e) if matches!(e.kind(), ErrorKind::NotFound | ErrorKind::InvalidData) => Ok(None),
        Err(e) => Err(io_err(path, e)),
    }
}

// ---------------------------------------------------------------------------
// sync_environment
// ---------------------------------------------------------------------------

/// Outcome of syncing a single environment.
#[derive(Debug)]
pub struct SyncEnvironmentResult {
    pub environment: String,
    pub writes: Vec<WriteResult>,
}

/// Render and write every output of the named environment.
///
/// Nothing is written when rendering fails. Returns a summary of what was
/// written / unchanged.
pub fn sync_environment(
    name: &str,
    home: &Path,
    dry_run: bool,
) -> Result<SyncEnvironmentResult, SyncError> {
    let sync_started_at = Utc::now();
    let name_key = EnvironmentName::from(name);
    environment::validate_name(&name_key)?;
    let env = environment::load_at(home, &name_key)?;

    let outputs = render_outputs(&env)?;
    let mut store = hash_store::load_at(home, name)?;
    let mut writes = Vec::with_capacity(outputs.len());
    for (path, content) in outputs {
        writes.push(atomic_write(&path, &content, &mut store.files, dry_run)?);
    }

    // Save the updated hash store (skip in dry-run: no filesystem changes).
    if !dry_run {
        store.synced_at = Some(sync_started_at);
        hash_store::save_at(home, name, &store)?;
    }

    Ok(SyncEnvironmentResult {
        environment: name.to_string(),
        writes,
    })
}

// ---------------------------------------------------------------------------
// sync_all
// ---------------------------------------------------------------------------

/// Sync all registered environments, stopping at the first failure.
pub fn sync_all(home: &Path, dry_run: bool) -> Result<Vec<SyncEnvironmentResult>, SyncError> {
    let all = environment::list_at(home)?;
    let mut results = Vec::with_capacity(all.len());
    for env in all {
        results.push(sync_environment(&env.name.0, home, dry_run)?);
    }
    Ok(results)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use dashboard_core::EnvironmentError;
    use std::collections::HashMap;
    use std::fs;
    use std::thread::sleep;
    use std::time::Duration;
    use tempfile::TempDir;

    fn write_content(path: &Path, content: &str) -> WriteResult {
        let mut store = HashMap::new();
        atomic_write(path, content, &mut store, false).unwrap()
    }

    /// Register `zero-etl` rooted at `root` with a small template.
    fn init_environment(home: &Path, root: &Path) {
        let mut env = environment::init_at(EnvironmentName::from("zero-etl"), root, "us-west-2", home)
            .expect("init");
        env.resources.bucket_name = "backup".to_string();
        env.resources.dynamodb_table_arn = "arn:aws:dynamodb:us-west-2:1:table/t".to_string();
        env.resources.sts_role_arn = "arn:aws:iam::1:role/ingest".to_string();
        env.resources.opensearch_domain = "search-demo.es.amazonaws.com".to_string();
        environment::save_at(home, &env).expect("save");
        fs::write(
            &env.template,
            "bucket: BUCKET_NAME\nregion: REGION_NAME\nhost: OpenSearch_DOMAIN\n",
        )
        .expect("template");
    }

    #[test]
    fn first_write_returns_written() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("pipeline.yaml");
        let result = write_content(&path, "hello");
        assert!(matches!(result, WriteResult::Written { .. }));
        assert!(path.exists());
    }

    #[test]
    fn second_write_same_content_returns_unchanged() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("file.yaml");
        let mut store = HashMap::new();
        atomic_write(&path, "same content", &mut store, false).unwrap();
        let result = atomic_write(&path, "same content", &mut store, false).unwrap();
        assert!(matches!(result, WriteResult::Unchanged { .. }));
    }

    #[test]
    fn deleted_file_is_rewritten_even_if_hash_matches() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("file.yaml");
        let mut store = HashMap::new();
        atomic_write(&path, "content", &mut store, false).unwrap();
        fs::remove_file(&path).unwrap();
        let result = atomic_write(&path, "content", &mut store, false).unwrap();
        assert!(matches!(result, WriteResult::Written { .. }));
        assert!(path.exists());
    }

    #[test]
    fn changed_content_returns_written() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("file.yaml");
        let mut store = HashMap::new();
        atomic_write(&path, "v1", &mut store, false).unwrap();
        let result = atomic_write(&path, "v2", &mut store, false).unwrap();
        assert!(matches!(result, WriteResult::Written { .. }));
    }

    #[test]
    fn dry_run_does_not_write_file() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("nope.yaml");
        let mut store = HashMap::new();
        let result = atomic_write(&path, "content", &mut store, true).unwrap();
        assert!(matches!(result, WriteResult::WouldWrite { .. }));
        assert!(!path.exists(), "dry-run must not create files");
        assert!(store.is_empty(), "dry-run must not record hashes");
    }

    #[test]
    fn tmp_file_removed_after_write() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("clean.yaml");
        write_content(&path, "data");
        let tmp_path = PathBuf::from(format!("{}.dashboard.tmp", path.display()));
        assert!(!tmp_path.exists(), ".dashboard.tmp must be cleaned up");
    }

    #[test]
    fn creates_parent_directories() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("build").join("nested").join("pipeline.yaml");
        write_content(&path, "content");
        assert!(path.exists());
    }

    #[test]
    fn crlf_and_lf_content_share_the_same_hash() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("normalize.yaml");
        let mut store = HashMap::new();

        let first = atomic_write(&path, "line1\r\nline2\r\n", &mut store, false).unwrap();
        assert!(matches!(first, WriteResult::Written { .. }));

        let second = atomic_write(&path, "line1\nline2\n", &mut store, false).unwrap();
        assert!(matches!(second, WriteResult::Unchanged { .. }));

        let disk = fs::read_to_string(&path).unwrap();
        assert_eq!(disk, "line1\nline2\n");
    }

    #[test]
    fn sync_writes_rendered_outputs() {
        let home = TempDir::new().unwrap();
        let root = TempDir::new().unwrap();
        init_environment(home.path(), root.path());

        let result = sync_environment("zero-etl", home.path(), false).expect("sync");
        assert_eq!(result.writes.len(), 2);
        assert!(result
            .writes
            .iter()
            .all(|w| matches!(w, WriteResult::Written { .. })));

        let body = fs::read_to_string(root.path().join("build/pipeline.yaml")).unwrap();
        assert_eq!(
            body,
            "bucket: backup\nregion: us-west-2\nhost: search-demo.es.amazonaws.com\n"
        );
        assert!(root.path().join("build/create-pipeline.json").exists());
    }

    #[test]
    fn hash_noop_preserves_mtime_and_hash() {
        let home = TempDir::new().unwrap();
        let root = TempDir::new().unwrap();
        init_environment(home.path(), root.path());

        sync_environment("zero-etl", home.path(), false).expect("first sync");

        let target = root.path().join("build/pipeline.yaml");
        let mtime_1 = fs::metadata(&target).unwrap().modified().unwrap();
        let key = target.to_string_lossy().to_string();
        let hash_1 = hash_store::load_at(home.path(), "zero-etl").unwrap().files[&key].clone();

        sleep(Duration::from_millis(1100));
        let second = sync_environment("zero-etl", home.path(), false).expect("second sync");
        assert!(second
            .writes
            .iter()
            .all(|w| matches!(w, WriteResult::Unchanged { .. })));

        let mtime_2 = fs::metadata(&target).unwrap().modified().unwrap();
        let hash_2 = hash_store::load_at(home.path(), "zero-etl").unwrap().files[&key].clone();
        assert_eq!(mtime_2, mtime_1, "mtime changed; file was rewritten");
        assert_eq!(hash_2, hash_1, "hash entry changed on no-op");
    }

    #[test]
    fn dry_run_sync_leaves_store_and_outputs_untouched() {
        let home = TempDir::new().unwrap();
        let root = TempDir::new().unwrap();
        init_environment(home.path(), root.path());

        let result = sync_environment("zero-etl", home.path(), true).expect("dry-run");
        assert!(result
            .writes
            .iter()
            .all(|w| matches!(w, WriteResult::WouldWrite { .. })));
        assert!(!root.path().join("build").exists());
        assert!(!hash_store::store_path_at(home.path(), "zero-etl").exists());
    }

    #[test]
    fn missing_template_writes_nothing() {
        let home = TempDir::new().unwrap();
        let root = TempDir::new().unwrap();
        init_environment(home.path(), root.path());
        fs::remove_file(root.path().join("template.txt")).unwrap();

        let err = sync_environment("zero-etl", home.path(), false).unwrap_err();
        assert!(matches!(err, SyncError::Render(_)), "got: {err}");
        assert!(!root.path().join("build").exists());
    }

    #[test]
    fn hand_edited_output_is_restored() {
        let home = TempDir::new().unwrap();
        let root = TempDir::new().unwrap();
        init_environment(home.path(), root.path());
        sync_environment("zero-etl", home.path(), false).expect("first sync");

        let target = root.path().join("build/pipeline.yaml");
        let rendered = fs::read_to_string(&target).unwrap();
        fs::write(&target, "hand edited\n").unwrap();

        let second = sync_environment("zero-etl", home.path(), false).expect("second sync");
        assert_eq!(
            second.writes,
            vec![
                WriteResult::Written { path: target.clone() },
                WriteResult::Unchanged {
                    path: root.path().join("build/create-pipeline.json")
                },
            ]
        );
        assert_eq!(fs::read_to_string(&target).unwrap(), rendered);
        let diff = crate::diff_environment("zero-etl", home.path()).expect("diff");
        assert!(diff.diffs.is_empty(), "diff after sync: {:?}", diff.diffs);
    }

    #[test]
    fn matching_file_without_store_entry_is_unchanged() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("pipeline.yaml");
        fs::write(&path, "same\r\n").unwrap();
        let mut store = HashMap::new();
        let result = atomic_write(&path, "same\n", &mut store, false).unwrap();
        assert!(matches!(result, WriteResult::Unchanged { .. }));
        assert_eq!(store.len(), 1, "store entry recorded for the existing file");
    }

    #[test]
    fn traversal_name_is_rejected_before_any_write() {
        let home = TempDir::new().unwrap();
        let root = TempDir::new().unwrap();
        init_environment(home.path(), root.path());

        let err = sync_environment("../environments/zero-etl", home.path(), false).unwrap_err();
        assert!(
            matches!(err, SyncError::Environment(EnvironmentError::InvalidName(_))),
            "got: {err}"
        );
        assert!(!root.path().join("build").exists());
        assert!(!home.path().join(".dashboard/environments/zero-etl.json").exists());
    }

    #[test]
    fn unknown_environment_is_environment_error() {
        let home = TempDir::new().unwrap();
        let err = sync_environment("nope", home.path(), false).unwrap_err();
        assert!(matches!(err, SyncError::Environment(_)), "got: {err}");
    }

    #[test]
    #[cfg(unix)]
    fn rename_failure_leaves_original_and_cleans_tmp() {
        use std::os::unix::fs::PermissionsExt;

        let root = TempDir::new().unwrap();
        let readonly_dir = root.path().join("readonly");
        fs::create_dir_all(&readonly_dir).unwrap();

        let path = readonly_dir.join("pipeline.yaml");
        fs::write(&path, "original").unwrap();

        let mut perms = fs::metadata(&readonly_dir).unwrap().permissions();
        perms.set_mode(0o555);
        fs::set_permissions(&readonly_dir, perms).unwrap();

        let tmp_dir = TempDir::new().unwrap();
        let tmp_path = tmp_dir.path().join("pipeline.yaml.dashboard.tmp");

        let mut store = HashMap::new();
        let result = atomic_write_with_tmp(&path, "new content", &mut store, false, &tmp_path);

        // Root bypasses directory permissions; only check the failure path when it happened.
        if result.is_err() {
            let current = fs::read_to_string(&path).unwrap();
            assert_eq!(current, "original", "original file should be intact");
            assert!(!tmp_path.exists(), ".dashboard.tmp should be cleaned up");
        }

        let mut perms = fs::metadata(&readonly_dir).unwrap().permissions();
        perms.set_mode(0o755);
        fs::set_permissions(&readonly_dir, perms).unwrap();
    }
}
