//! Error types for dashboard-renderer.

use std::path::PathBuf;

use thiserror::Error;

/// Failures of a single render call. Neither kind is retried.
#[derive(Debug, Error)]
pub enum RenderError {
    /// The template location does not resolve to existing content.
    #[error("template not found at {path}")]
    NotFound { path: PathBuf },

    /// The template exists but could not be read.
    #[error("failed to read template at {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl RenderError {
    /// Classify an I/O failure on `path` into one of the two render kinds.
    pub(crate) fn from_io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        let path = path.into();
        match source.kind() {
            std::io::ErrorKind::NotFound => RenderError::NotFound { path },
            _ => RenderError::Read { path, source },
        }
    }
}
