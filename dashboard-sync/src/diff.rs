//! Dry-run unified diff support for `dashboard diff`.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use similar::TextDiff;

use dashboard_core::{environment, types::EnvironmentName};

use crate::{error::io_err, outputs::render_outputs, SyncError};

/// A single rendered file diff.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileDiff {
    pub path: PathBuf,
    pub unified_diff: String,
}

/// Diff result for an environment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiffEnvironmentResult {
    pub environment: String,
    pub diffs: Vec<FileDiff>,
}

/// Render what `sync` would generate and compare it to current on-disk content.
///
/// No files are written.
pub fn diff_environment(name: &str, home: &Path) -> Result<DiffEnvironmentResult, SyncError> {
    let name_key = EnvironmentName::from(name);
    environment::validate_name(&name_key)?;
    let env = environment::load_at(home, &name_key)?;

    let mut diffs = Vec::new();
    for (path, rendered) in render_outputs(&env)? {
        let rendered = normalize_line_endings(&rendered);
        let existing = read_existing_or_empty(&path)?;
        if existing == rendered {
            continue;
        }

        let relative = path.strip_prefix(&env.output_dir).unwrap_or(path.as_path());
        let old_header = format!("a/{}", relative.display());
        let new_header = format!("b/{}", relative.display());
        let unified = TextDiff::from_lines(&existing, &rendered)
            .unified_diff()
            .header(&old_header, &new_header)
            .context_radius(3)
            .to_string();

        diffs.push(FileDiff {
            path,
            unified_diff: unified,
        });
    }

    Ok(DiffEnvironmentResult {
        environment: name.to_string(),
        diffs,
    })
}

fn read_existing_or_empty(path: &Path) -> Result<String, SyncError> {
    match std::fs::read_to_string(path) {
        Ok(content) => Ok(normalize_line_endings(&content)),
        Err(err) if err.kind() == ErrorKind::NotFound => Ok(String::new()),
        Err(err) => Err(io_err(path, err)),
    }
}

fn normalize_line_endings(content: &str) -> String {
    content.replace("\r\n", "\n")
}

#[cfg(test)]
mod tests {
    use std::fs;

    use tempfile::TempDir;

    use crate::sync_environment;

    use super::*;

    fn init_environment(home: &Path, root: &Path) {
        let env = environment::init_at(EnvironmentName::from("zero-etl"), root, "us-west-2", home)
            .expect("init");
        fs::write(&env.template, "region: REGION_NAME\n").expect("template");
    }

    #[test]
    fn everything_differs_before_first_sync() {
        let home = TempDir::new().expect("home");
        let root = TempDir::new().expect("root");
        init_environment(home.path(), root.path());

        let diff = diff_environment("zero-etl", home.path()).expect("diff");
        assert_eq!(diff.diffs.len(), 2);
        assert!(!root.path().join("build").exists(), "diff must not write");
    }

    #[test]
    fn no_diffs_after_clean_sync() {
        let home = TempDir::new().expect("home");
        let root = TempDir::new().expect("root");
        init_environment(home.path(), root.path());
        sync_environment("zero-etl", home.path(), false).expect("sync");

        let diff = diff_environment("zero-etl", home.path()).expect("diff");
        assert!(diff.diffs.is_empty(), "synced environment should have no diff");
    }

    #[test]
    fn traversal_name_is_invalid() {
        let home = TempDir::new().expect("home");
        let err = diff_environment("../hashes/x", home.path()).unwrap_err();
        assert!(
            matches!(
                err,
                SyncError::Environment(dashboard_core::EnvironmentError::InvalidName(_))
            ),
            "got: {err}"
        );
    }

    #[test]
    fn template_edit_produces_unified_diff() {
        let home = TempDir::new().expect("home");
        let root = TempDir::new().expect("root");
        init_environment(home.path(), root.path());
        sync_environment("zero-etl", home.path(), false).expect("sync");

        fs::write(root.path().join("template.txt"), "region: REGION_NAME\nunits: 2\n")
            .expect("edit template");

        let diff = diff_environment("zero-etl", home.path()).expect("diff");
        let body_diff = diff
            .diffs
            .iter()
            .find(|d| d.path.ends_with("pipeline.yaml"))
            .expect("pipeline.yaml diff");
        assert!(body_diff.unified_diff.contains("--- a/pipeline.yaml"));
        assert!(body_diff.unified_diff.contains("+++ b/pipeline.yaml"));
        assert!(body_diff.unified_diff.contains("+units: 2"));
    }
}
