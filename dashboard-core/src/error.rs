//! Error types for dashboard-core.

use std::path::PathBuf;

use thiserror::Error;

/// All errors that can arise from environment store operations.
#[derive(Debug, Error)]
pub enum EnvironmentError {
    /// Underlying I/O failure (permission denied, disk full, etc.).
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// YAML serialization error (write/save path).
    #[error("YAML serialization error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// YAML parse error on load: includes file path and line context from serde_yaml.
    #[error("failed to parse environment at {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    /// `dirs::home_dir()` returned `None`: cannot locate `~/.dashboard/`.
    #[error("cannot determine home directory; set $HOME or equivalent")]
    HomeNotFound,

    /// The environment YAML file did not exist at the expected path.
    #[error("environment not found at {path}")]
    EnvironmentNotFound { path: PathBuf },

    /// The environment name cannot be used as a file name.
    #[error("invalid environment name '{0}': use letters, digits, '-' or '_'")]
    InvalidName(String),
}
