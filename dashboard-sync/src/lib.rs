//! # dashboard-sync
//!
//! Hash-gated atomic materialization of an environment's rendered outputs.
//!
//! Call [`sync_environment`] to render and write the pipeline configuration
//! and create-pipeline request of one registered environment, or [`sync_all`]
//! to process every registered environment.

pub mod diff;
pub mod error;
pub mod hash_store;
pub mod outputs;
pub mod pipeline;
pub mod writer;

pub use diff::{diff_environment, DiffEnvironmentResult, FileDiff};
pub use error::SyncError;
pub use outputs::{render_configuration, render_outputs, CreatePipelineRequest, OutputKind};
pub use writer::{sync_all, sync_environment, SyncEnvironmentResult, WriteResult};
