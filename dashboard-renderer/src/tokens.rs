//! Standard pipeline tokens: the replacement mapping built from an [`Environment`].

use dashboard_core::types::{Environment, ReplacementMap};

pub const OPENSEARCH_DOMAIN: &str = "OpenSearch_DOMAIN";
pub const DYNAMODB_TABLE_ARN: &str = "DYNAMODB_TABLE_ARN";
pub const STS_ROLE_ARN: &str = "STS_ROLE_ARN";
pub const BUCKET_NAME: &str = "BUCKET_NAME";
pub const REGION_NAME: &str = "REGION_NAME";

/// Resolved runtime values for the placeholders of a pipeline template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PipelineTokens {
    pub opensearch_domain: String,
    pub dynamodb_table_arn: String,
    pub sts_role_arn: String,
    pub bucket_name: String,
    pub region: String,
    /// Caller-defined tokens, applied after the standard ones.
    pub extra: ReplacementMap,
}

impl PipelineTokens {
    /// Collect the token values of `env`.
    pub fn from_environment(env: &Environment) -> Self {
        PipelineTokens {
            opensearch_domain: env.resources.opensearch_domain.clone(),
            dynamodb_table_arn: env.resources.dynamodb_table_arn.clone(),
            sts_role_arn: env.resources.sts_role_arn.clone(),
            bucket_name: env.resources.bucket_name.clone(),
            region: env.region.clone(),
            extra: env.tokens.clone(),
        }
    }

    /// Flatten into the ordered mapping consumed by the renderer.
    ///
    /// Order: `REGION_NAME`, `BUCKET_NAME`, `DYNAMODB_TABLE_ARN`, `STS_ROLE_ARN`,
    /// `OpenSearch_DOMAIN`, then extras. An extra that reuses a standard name
    /// overwrites its value in place.
    pub fn to_replacements(&self) -> ReplacementMap {
        let mut map = ReplacementMap::new();
        map.insert(REGION_NAME, self.region.as_str());
        map.insert(BUCKET_NAME, self.bucket_name.as_str());
        map.insert(DYNAMODB_TABLE_ARN, self.dynamodb_table_arn.as_str());
        map.insert(STS_ROLE_ARN, self.sts_role_arn.as_str());
        map.insert(OPENSEARCH_DOMAIN, self.opensearch_domain.as_str());
        map.extend(self.extra.iter());
        map
    }

    /// Standard tokens whose value is still empty.
    pub fn missing(&self) -> Vec<&'static str> {
        [
            (REGION_NAME, &self.region),
            (BUCKET_NAME, &self.bucket_name),
            (DYNAMODB_TABLE_ARN, &self.dynamodb_table_arn),
            (STS_ROLE_ARN, &self.sts_role_arn),
            (OPENSEARCH_DOMAIN, &self.opensearch_domain),
        ]
        .into_iter()
        .filter(|(_, value)| value.trim().is_empty())
        .map(|(token, _)| token)
        .collect()
    }
}
