//! Domain types for dashboard environments.
//!
//! All path fields use `PathBuf`; never `&str` or `String` for filesystem paths.
//! All types are serializable/deserializable via serde + serde_yaml.

use std::fmt;
use std::path::PathBuf;

use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Newtypes
// ---------------------------------------------------------------------------

/// A strongly-typed name for a registered environment.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EnvironmentName(pub String);

impl fmt::Display for EnvironmentName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl From<String> for EnvironmentName {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for EnvironmentName {
    fn from(s: &str) -> Self {
        Self(s.to_owned())
    }
}

/// Human-readable name of a directory pool (user pool or identity pool).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PoolName(pub String);

impl fmt::Display for PoolName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl From<String> for PoolName {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for PoolName {
    fn from(s: &str) -> Self {
        Self(s.to_owned())
    }
}

/// Opaque identifier the directory assigns to a pool.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PoolId(pub String);

impl fmt::Display for PoolId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl From<String> for PoolId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for PoolId {
    fn from(s: &str) -> Self {
        Self(s.to_owned())
    }
}

// ---------------------------------------------------------------------------
// Replacement mapping
// ---------------------------------------------------------------------------

/// Ordered token → value pairs applied by the template renderer.
///
/// Replacements run in insertion order against the same evolving text, so the
/// order matters whenever tokens overlap. Keys are unique: inserting a key that
/// already exists overwrites its value and keeps its original position.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ReplacementMap(IndexMap<String, String>);

impl ReplacementMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or overwrite `token`. Returns the previous value, if any.
    pub fn insert(&mut self, token: impl Into<String>, value: impl Into<String>) -> Option<String> {
        self.0.insert(token.into(), value.into())
    }

    pub fn get(&self, token: &str) -> Option<&str> {
        self.0.get(token).map(String::as_str)
    }

    pub fn contains(&self, token: &str) -> bool {
        self.0.contains_key(token)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Pairs in application order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Tokens in application order.
    pub fn tokens(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for ReplacementMap {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut map = ReplacementMap::new();
        map.extend(iter);
        map
    }
}

impl<K: Into<String>, V: Into<String>> Extend<(K, V)> for ReplacementMap {
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        for (k, v) in iter {
            self.insert(k, v);
        }
    }
}

// ---------------------------------------------------------------------------
// Environment
// ---------------------------------------------------------------------------

pub const DEFAULT_USER_POOL: &str = "CognitoUserPool";
pub const DEFAULT_IDENTITY_POOL: &str = "CognitoIdentityPool";
pub const DEFAULT_PIPELINE_NAME: &str = "opensearch-dynamodb-etl";
pub const DEFAULT_LOG_GROUP: &str =
    "/aws/vendedlogs/OpenSearchIntegrationZeroETL/opensearch-dynamodb-ingestion-pipeline";

/// Runtime values of the provisioned resources the pipeline connects.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct Resources {
    #[serde(default)]
    pub bucket_name: String,
    #[serde(default)]
    pub dynamodb_table_arn: String,
    #[serde(default)]
    pub sts_role_arn: String,
    /// Endpoint of the search domain, without scheme.
    #[serde(default)]
    pub opensearch_domain: String,
}

/// Names of the identity pools fronting the dashboards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PoolNames {
    #[serde(default = "default_user_pool")]
    pub user_pool: PoolName,
    #[serde(default = "default_identity_pool")]
    pub identity_pool: PoolName,
}

impl Default for PoolNames {
    fn default() -> Self {
        Self {
            user_pool: default_user_pool(),
            identity_pool: default_identity_pool(),
        }
    }
}

/// Ingestion pipeline settings that accompany the rendered configuration body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PipelineSettings {
    #[serde(default = "default_pipeline_name")]
    pub name: String,
    #[serde(default = "default_units")]
    pub min_units: u32,
    #[serde(default = "default_units")]
    pub max_units: u32,
    #[serde(default = "default_log_group")]
    pub log_group: String,
    #[serde(default = "default_tags")]
    pub tags: IndexMap<String, String>,
}

impl Default for PipelineSettings {
    fn default() -> Self {
        Self {
            name: default_pipeline_name(),
            min_units: default_units(),
            max_units: default_units(),
            log_group: default_log_group(),
            tags: default_tags(),
        }
    }
}

/// One dashboard deployment, persisted as YAML.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Environment {
    pub name: EnvironmentName,
    pub region: String,
    /// Pipeline configuration template read at render time.
    pub template: PathBuf,
    /// Directory receiving the materialized outputs.
    pub output_dir: PathBuf,
    #[serde(default)]
    pub resources: Resources,
    #[serde(default)]
    pub pools: PoolNames,
    #[serde(default)]
    pub pipeline: PipelineSettings,
    /// Extra tokens applied after the standard pipeline tokens.
    #[serde(default, skip_serializing_if = "ReplacementMap::is_empty")]
    pub tokens: ReplacementMap,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

fn default_user_pool() -> PoolName {
    PoolName::from(DEFAULT_USER_POOL)
}

fn default_identity_pool() -> PoolName {
    PoolName::from(DEFAULT_IDENTITY_POOL)
}

fn default_pipeline_name() -> String {
    DEFAULT_PIPELINE_NAME.to_string()
}

fn default_units() -> u32 {
    1
}

fn default_log_group() -> String {
    DEFAULT_LOG_GROUP.to_string()
}

fn default_tags() -> IndexMap<String, String> {
    IndexMap::from([
        ("Name".to_string(), "OpenSearchIngestionZeroETLPipeline".to_string()),
        (
            "Description".to_string(),
            "OpenSearch Ingestion Zero ETL Pipeline".to_string(),
        ),
    ])
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
