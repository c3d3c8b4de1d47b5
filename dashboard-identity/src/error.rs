//! Error types for dashboard-identity.

use std::path::PathBuf;

use thiserror::Error;

/// Failures while querying a pool directory.
#[derive(Debug, Error)]
pub enum LookupError {
    /// The directory command could not be started.
    #[error("failed to run `{program}`: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    /// The directory command ran but exited unsuccessfully.
    #[error("`{program}` exited with {status}: {stderr}")]
    CommandFailed {
        program: String,
        status: std::process::ExitStatus,
        stderr: String,
    },

    /// A listing file could not be read.
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The listing was not the expected JSON document.
    #[error("malformed pool listing: {0}")]
    Json(#[from] serde_json::Error),

    /// Any other directory-specific failure.
    #[error("directory error: {0}")]
    Directory(String),
}

pub(crate) fn io_err(path: impl Into<PathBuf>, source: std::io::Error) -> LookupError {
    LookupError::Io {
        path: path.into(),
        source,
    }
}
