//! Error types for dashboard-sync.

use std::path::PathBuf;

use thiserror::Error;

use dashboard_core::error::EnvironmentError;
use dashboard_renderer::RenderError;

/// All errors that can arise from sync operations.
#[derive(Debug, Error)]
pub enum SyncError {
    /// The pipeline template could not be rendered.
    #[error("render error: {0}")]
    Render(#[from] RenderError),

    /// An error from the environment store.
    #[error("environment error: {0}")]
    Environment(#[from] EnvironmentError),

    /// An I/O error, with annotated path for context.
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// JSON serialization/deserialization error (hash store, request payload).
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Convenience constructor for [`SyncError::Io`].
pub(crate) fn io_err(path: impl Into<PathBuf>, source: std::io::Error) -> SyncError {
    SyncError::Io {
        path: path.into(),
        source,
    }
}
