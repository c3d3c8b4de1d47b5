//! Shared sync entrypoint used by the CLI.

use std::path::Path;

use crate::{sync_all, sync_environment, SyncEnvironmentResult, SyncError};

/// Scope for a sync run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyncScope {
    /// Sync every registered environment.
    All,
    /// Sync a single named environment.
    Environment(String),
}

/// Run the sync for a scope.
pub fn run(
    home: &Path,
    scope: SyncScope,
    dry_run: bool,
) -> Result<Vec<SyncEnvironmentResult>, SyncError> {
    match scope {
        SyncScope::All => sync_all(home, dry_run),
        SyncScope::Environment(name) => Ok(vec![sync_environment(&name, home, dry_run)?]),
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use dashboard_core::{environment, types::EnvironmentName};
    use tempfile::TempDir;

    use super::*;

    #[test]
    fn run_all_without_environments_returns_empty_vec() {
        let home = TempDir::new().expect("home");
        let result = run(home.path(), SyncScope::All, true).expect("run");
        assert!(result.is_empty());
    }

    #[test]
    fn run_all_covers_every_environment() {
        let home = TempDir::new().expect("home");
        for name in ["prod", "staging"] {
            let root = home.path().join(name);
            fs::create_dir_all(&root).expect("mkdir");
            let env = environment::init_at(EnvironmentName::from(name), &root, "us-west-2", home.path())
                .expect("init");
            fs::write(&env.template, "REGION_NAME").expect("template");
        }

        let result = run(home.path(), SyncScope::All, true).expect("run");
        let names: Vec<_> = result.iter().map(|r| r.environment.as_str()).collect();
        assert_eq!(names, vec!["prod", "staging"]);
    }

    #[test]
    fn run_single_environment_returns_single_result() {
        let home = TempDir::new().expect("home");
        let root = TempDir::new().expect("root");
        let env = environment::init_at(EnvironmentName::from("zero-etl"), root.path(), "us-west-2", home.path())
            .expect("init");
        fs::write(&env.template, "REGION_NAME").expect("template");

        let result = run(
            home.path(),
            SyncScope::Environment("zero-etl".to_string()),
            true,
        )
        .expect("run");
        assert_eq!(result.len(), 1);
        assert_eq!(result[0].environment, "zero-etl");
    }
}
