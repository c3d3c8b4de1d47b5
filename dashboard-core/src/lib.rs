//! Dashboard core library: domain types, environment persistence, errors.
//!
//! - [`types`]: newtypes, the ordered [`ReplacementMap`], and [`Environment`]
//! - [`error`]: [`EnvironmentError`]
//! - [`environment`]: load / save / list / init

pub mod environment;
pub mod error;
pub mod types;

pub use error::EnvironmentError;
pub use types::{
    Environment, EnvironmentName, PipelineSettings, PoolId, PoolName, PoolNames, ReplacementMap,
    Resources,
};
