//! Per-environment YAML store.
//!
//! # Storage layout
//!
//! ```text
//! ~/.dashboard/
//!   environments/           (mode 0700)
//!     <name>.yaml           (one file per environment, mode 0600)
//! ```
//!
//! # API pattern
//!
//! Every function has two forms:
//! - `fn_at(home: &Path, …)`: explicit home; used in tests with `TempDir`
//! - `fn(…)`: derives home from `dirs::home_dir()`, delegates to `_at`

use std::path::{Path, PathBuf};

use chrono::Utc;

use crate::error::EnvironmentError;
use crate::types::{Environment, EnvironmentName, PipelineSettings, PoolNames, ReplacementMap, Resources};

/// File name of the pipeline template scaffolded next to an environment root.
pub const TEMPLATE_FILE: &str = "template.txt";

/// Directory (relative to the environment root) receiving materialized outputs.
pub const OUTPUT_DIR: &str = "build";

// ---------------------------------------------------------------------------
// 1. Path helpers
// ---------------------------------------------------------------------------

/// `<home>/.dashboard/environments/`
pub fn environments_dir_at(home: &Path) -> PathBuf {
    home.join(".dashboard").join("environments")
}

/// `<home>/.dashboard/environments/<name>.yaml`: pure, no I/O.
pub fn environment_path_at(home: &Path, name: &EnvironmentName) -> PathBuf {
    environments_dir_at(home).join(format!("{}.yaml", name.0))
}

/// Reject names that would escape the environments directory.
pub fn validate_name(name: &EnvironmentName) -> Result<(), EnvironmentError> {
    let valid = !name.0.is_empty()
        && name
            .0
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
    if valid {
        Ok(())
    } else {
        Err(EnvironmentError::InvalidName(name.0.clone()))
    }
}

// ---------------------------------------------------------------------------
// 2. Load
// ---------------------------------------------------------------------------

/// Load a single environment from `<home>/.dashboard/environments/<name>.yaml`.
///
/// Returns `EnvironmentError::InvalidName` for names that are not plain file
/// stems, `EnvironmentError::EnvironmentNotFound` if absent, and
/// `EnvironmentError::Parse` (with path + line context) if malformed YAML.
pub fn load_at(home: &Path, name: &EnvironmentName) -> Result<Environment, EnvironmentError> {
    validate_name(name)?;
    let path = environment_path_at(home, name);
    if !path.exists() {
        return Err(EnvironmentError::EnvironmentNotFound { path });
    }
    let contents = std::fs::read_to_string(&path)?;
    serde_yaml::from_str(&contents).map_err(|e| EnvironmentError::Parse { path, source: e })
}

/// `load_at` convenience wrapper.
pub fn load(name: &EnvironmentName) -> Result<Environment, EnvironmentError> {
    load_at(&home()?, name)
}

/// Every registered environment, sorted by file name.
pub fn list_at(home: &Path) -> Result<Vec<Environment>, EnvironmentError> {
    let dir = environments_dir_at(home);
    if !dir.exists() {
        return Ok(vec![]);
    }

    let mut entries: Vec<_> = std::fs::read_dir(&dir)?
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().map(|t| t.is_file()).unwrap_or(false))
        .collect();
    entries.sort_by_key(|e| e.file_name());

    let mut result = Vec::new();
    for entry in entries {
        let path = entry.path();
        if path.extension().and_then(|s| s.to_str()) != Some("yaml") {
            continue;
        }
        let contents = std::fs::read_to_string(&path)?;
        let env: Environment = serde_yaml::from_str(&contents)
            .map_err(|e| EnvironmentError::Parse { path: path.clone(), source: e })?;
        result.push(env);
    }
    Ok(result)
}

/// `list_at` convenience wrapper.
pub fn list() -> Result<Vec<Environment>, EnvironmentError> {
    list_at(&home()?)
}

// ---------------------------------------------------------------------------
// 3. Save (atomic)
// ---------------------------------------------------------------------------

/// Atomically save an environment to `<home>/.dashboard/environments/<name>.yaml`.
///
/// Write flow: serialize → `.yaml.tmp` sibling → `chmod 0600` → `rename`.
pub fn save_at(home: &Path, env: &Environment) -> Result<(), EnvironmentError> {
    validate_name(&env.name)?;
    let dir = environments_dir_at(home);
    if !dir.exists() {
        std::fs::create_dir_all(&dir)?;
        set_dir_permissions(&dir)?;
    }
    let path = environment_path_at(home, &env.name);
    let tmp_path = path.with_file_name(format!("{}.yaml.tmp", env.name.0));

    let yaml = serde_yaml::to_string(env)?;
    std::fs::write(&tmp_path, yaml)?;
    set_file_permissions(&tmp_path)?;
    std::fs::rename(&tmp_path, &path)?;
    Ok(())
}

/// `save_at` convenience wrapper.
pub fn save(env: &Environment) -> Result<(), EnvironmentError> {
    save_at(&home()?, env)
}

// ---------------------------------------------------------------------------
// 4. Init
// ---------------------------------------------------------------------------

/// Register environment `name` rooted at `root`.
///
/// The template is expected at `<root>/template.txt` and outputs go to
/// `<root>/build/`. Idempotent: if the environment already exists it is loaded
/// and returned unchanged.
pub fn init_at(
    name: EnvironmentName,
    root: &Path,
    region: &str,
    home: &Path,
) -> Result<Environment, EnvironmentError> {
    validate_name(&name)?;

    let path = environment_path_at(home, &name);
    if path.exists() {
        return load_at(home, &name);
    }

    let now = Utc::now();
    let env = Environment {
        name,
        region: region.to_string(),
        template: root.join(TEMPLATE_FILE),
        output_dir: root.join(OUTPUT_DIR),
        resources: Resources::default(),
        pools: PoolNames::default(),
        pipeline: PipelineSettings::default(),
        tokens: ReplacementMap::new(),
        created_at: now,
        updated_at: now,
    };

    save_at(home, &env)?;
    Ok(env)
}

/// `init_at` convenience wrapper.
pub fn init(name: EnvironmentName, root: &Path, region: &str) -> Result<Environment, EnvironmentError> {
    init_at(name, root, region, &home()?)
}

// ---------------------------------------------------------------------------
// Private helpers
// ---------------------------------------------------------------------------

fn home() -> Result<PathBuf, EnvironmentError> {
    dirs::home_dir().ok_or(EnvironmentError::HomeNotFound)
}

#[cfg(unix)]
fn set_dir_permissions(path: &Path) -> Result<(), EnvironmentError> {
    use std::os::unix::fs::PermissionsExt;
    std::fs::set_permissions(path, std::fs::Permissions::from_mode(0o700))?;
    Ok(())
}
#[cfg(not(unix))]
fn set_dir_permissions(_path: &Path) -> Result<(), EnvironmentError> {
    Ok(())
}

#[cfg(unix)]
fn set_file_permissions(path: &Path) -> Result<(), EnvironmentError> {
    use std::os::unix::fs::PermissionsExt;
    std::fs::set_permissions(path, std::fs::Permissions::from_mode(0o600))?;
    Ok(())
}
#[cfg(not(unix))]
fn set_file_permissions(_path: &Path) -> Result<(), EnvironmentError> {
    Ok(())
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------
