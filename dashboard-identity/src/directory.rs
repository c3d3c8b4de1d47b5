//! Pool directories: where pool records come from.
//!
//! A [`PoolDirectory`] answers two first-page queries: the user (principal)
//! pools and the identity (federation) pools of an account. Listing documents
//! use the JSON shape of `aws cognito-idp list-user-pools` and
//! `aws cognito-identity list-identity-pools`.

use std::path::{Path, PathBuf};

use serde::Deserialize;

use dashboard_core::types::{PoolId, PoolName};

use crate::error::{io_err, LookupError};

/// A named directory record and its opaque identifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PoolRecord {
    pub id: PoolId,
    pub name: PoolName,
}

impl PoolRecord {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        PoolRecord {
            id: PoolId(id.into()),
            name: PoolName(name.into()),
        }
    }
}

/// Source of pool records. Implementations return at most `max_results`
/// records and never paginate.
pub trait PoolDirectory {
    fn list_user_pools(&self, max_results: u32) -> Result<Vec<PoolRecord>, LookupError>;

    fn list_identity_pools(&self, max_results: u32) -> Result<Vec<PoolRecord>, LookupError>;
}

// ---------------------------------------------------------------------------
// Listing documents
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct UserPoolListing {
    #[serde(default)]
    user_pools: Vec<UserPoolEntry>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct UserPoolEntry {
    id: String,
    name: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct IdentityPoolListing {
    #[serde(default)]
    identity_pools: Vec<IdentityPoolEntry>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct IdentityPoolEntry {
    identity_pool_id: String,
    identity_pool_name: String,
}

/// Parse a `list-user-pools` JSON document.
pub fn parse_user_pools(json: &[u8]) -> Result<Vec<PoolRecord>, LookupError> {
    let listing: UserPoolListing = serde_json::from_slice(json)?;
    Ok(listing
        .user_pools
        .into_iter()
        .map(|p| PoolRecord::new(p.id, p.name))
        .collect())
}

/// Parse a `list-identity-pools` JSON document.
pub fn parse_identity_pools(json: &[u8]) -> Result<Vec<PoolRecord>, LookupError> {
    let listing: IdentityPoolListing = serde_json::from_slice(json)?;
    Ok(listing
        .identity_pools
        .into_iter()
        .map(|p| PoolRecord::new(p.identity_pool_id, p.identity_pool_name))
        .collect())
}

fn first_page(mut records: Vec<PoolRecord>, max_results: u32) -> Vec<PoolRecord> {
    records.truncate(max_results as usize);
    records
}

// ---------------------------------------------------------------------------
// StaticDirectory
// ---------------------------------------------------------------------------

/// In-memory directory.
#[derive(Debug, Clone, Default)]
pub struct StaticDirectory {
    pub user_pools: Vec<PoolRecord>,
    pub identity_pools: Vec<PoolRecord>,
}

impl StaticDirectory {
    pub fn new(user_pools: Vec<PoolRecord>, identity_pools: Vec<PoolRecord>) -> Self {
        StaticDirectory {
            user_pools,
            identity_pools,
        }
    }
}

impl PoolDirectory for StaticDirectory {
    fn list_user_pools(&self, max_results: u32) -> Result<Vec<PoolRecord>, LookupError> {
        Ok(first_page(self.user_pools.clone(), max_results))
    }

    fn list_identity_pools(&self, max_results: u32) -> Result<Vec<PoolRecord>, LookupError> {
        Ok(first_page(self.identity_pools.clone(), max_results))
    }
}

// ---------------------------------------------------------------------------
// JsonListingDirectory
// ---------------------------------------------------------------------------

/// Directory backed by two saved listing documents on disk.
#[derive(Debug, Clone)]
pub struct JsonListingDirectory {
    pub user_pools: PathBuf,
    pub identity_pools: PathBuf,
}

impl JsonListingDirectory {
    pub fn new(user_pools: impl Into<PathBuf>, identity_pools: impl Into<PathBuf>) -> Self {
        JsonListingDirectory {
            user_pools: user_pools.into(),
            identity_pools: identity_pools.into(),
        }
    }
}

fn read_listing(path: &Path) -> Result<Vec<u8>, LookupError> {
    std::fs::read(path).map_err(|e| io_err(path, e))
}

impl PoolDirectory for JsonListingDirectory {
    fn list_user_pools(&self, max_results: u32) -> Result<Vec<PoolRecord>, LookupError> {
        let records = parse_user_pools(&read_listing(&self.user_pools)?)?;
        Ok(first_page(records, max_results))
    }

    fn list_identity_pools(&self, max_results: u32) -> Result<Vec<PoolRecord>, LookupError> {
        let records = parse_identity_pools(&read_listing(&self.identity_pools)?)?;
        Ok(first_page(records, max_results))
    }
}
