//! Resolve existing pools by exact name.

use dashboard_core::types::{PoolId, PoolName};

use crate::directory::{PoolDirectory, PoolRecord};
use crate::error::LookupError;

/// Size of the single page requested from the directory.
pub const MAX_RESULTS: u32 = 60;

/// Identifiers of the pools found by a lookup; `None` means no exact match.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExistingPools {
    pub user_pool_id: Option<PoolId>,
    pub identity_pool_id: Option<PoolId>,
}

fn first_match(records: &[PoolRecord], name: &PoolName) -> Option<PoolId> {
    records
        .iter()
        .find(|record| record.name == *name)
        .map(|record| record.id.clone())
}

/// Look up both pools, propagating directory failures.
///
/// Both listings are fetched before matching; the first record whose name
/// equals the requested name wins.
pub fn lookup_pools<D: PoolDirectory + ?Sized>(
    directory: &D,
    user_pool_name: &PoolName,
    identity_pool_name: &PoolName,
) -> Result<ExistingPools, LookupError> {
    let user_pools = directory.list_user_pools(MAX_RESULTS)?;
    let identity_pools = directory.list_identity_pools(MAX_RESULTS)?;

    let found = ExistingPools {
        user_pool_id: first_match(&user_pools, user_pool_name),
        identity_pool_id: first_match(&identity_pools, identity_pool_name),
    };
    tracing::debug!(
        user_pool = %user_pool_name,
        identity_pool = %identity_pool_name,
        user_pool_found = found.user_pool_id.is_some(),
        identity_pool_found = found.identity_pool_id.is_some(),
        "pool lookup finished"
    );
    Ok(found)
}

/// Look up both pools, reporting any directory failure as absence of both.
///
/// Callers cannot tell "not found" from "lookup failed"; the failure is only
/// logged. Use [`lookup_pools`] when the difference matters.
pub fn find_existing_pools<D: PoolDirectory + ?Sized>(
    directory: &D,
    user_pool_name: &PoolName,
    identity_pool_name: &PoolName,
) -> ExistingPools {
    match lookup_pools(directory, user_pool_name, identity_pool_name) {
        Ok(found) => found,
        Err(err) => {
            tracing::warn!(error = %err, "error getting existing pools");
            ExistingPools::default()
        }
    }
}
