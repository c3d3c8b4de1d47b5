//! # dashboard-identity
//!
//! Resolves existing user and identity pools by name against a pool
//! directory: the `aws` CLI, saved JSON listings, or an in-memory set.

pub mod aws_cli;
pub mod directory;
pub mod error;
pub mod lookup;

pub use aws_cli::AwsCliDirectory;
pub use directory::{JsonListingDirectory, PoolDirectory, PoolRecord, StaticDirectory};
pub use error::LookupError;
pub use lookup::{find_existing_pools, lookup_pools, ExistingPools, MAX_RESULTS};
