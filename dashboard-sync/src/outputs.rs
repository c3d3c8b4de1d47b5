//! Materialized outputs of an environment.
//!
//! | Output                  | File                               |
//! |-------------------------|------------------------------------|
//! | Pipeline configuration  | `<output_dir>/pipeline.yaml`       |
//! | Create-pipeline request | `<output_dir>/create-pipeline.json`|
//!
//! The request document has the shape accepted by
//! `aws osis create-pipeline --cli-input-json`.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use dashboard_core::types::Environment;
use dashboard_renderer::{render, unresolved_tokens, PipelineTokens};

use crate::error::SyncError;

/// All files produced for an environment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OutputKind {
    PipelineConfiguration,
    CreatePipelineRequest,
}

impl OutputKind {
    /// All outputs in a stable order.
    pub fn all() -> &'static [OutputKind] {
        &[OutputKind::PipelineConfiguration, OutputKind::CreatePipelineRequest]
    }

    pub fn file_name(&self) -> &'static str {
        match self {
            OutputKind::PipelineConfiguration => "pipeline.yaml",
            OutputKind::CreatePipelineRequest => "create-pipeline.json",
        }
    }

    pub fn output_path(&self, env: &Environment) -> PathBuf {
        env.output_dir.join(self.file_name())
    }
}

/// Request payload for creating the ingestion pipeline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct CreatePipelineRequest {
    pub pipeline_name: String,
    pub min_units: u32,
    pub max_units: u32,
    pub pipeline_configuration_body: String,
    pub log_publishing_options: LogPublishingOptions,
    pub tags: Vec<Tag>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct LogPublishingOptions {
    pub is_logging_enabled: bool,
    pub cloud_watch_log_destination: CloudWatchLogDestination,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct CloudWatchLogDestination {
    pub log_group: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Tag {
    pub key: String,
    pub value: String,
}

impl CreatePipelineRequest {
    pub fn new(env: &Environment, configuration_body: String) -> Self {
        CreatePipelineRequest {
            pipeline_name: env.pipeline.name.clone(),
            min_units: env.pipeline.min_units,
            max_units: env.pipeline.max_units,
            pipeline_configuration_body: configuration_body,
            log_publishing_options: LogPublishingOptions {
                is_logging_enabled: true,
                cloud_watch_log_destination: CloudWatchLogDestination {
                    log_group: env.pipeline.log_group.clone(),
                },
            },
            tags: env
                .pipeline
                .tags
                .iter()
                .map(|(key, value)| Tag {
                    key: key.clone(),
                    value: value.clone(),
                })
                .collect(),
        }
    }
}

/// Render the pipeline template of `env`.
///
/// Empty standard values and tokens left in the output are logged, not fatal.
pub fn render_configuration(env: &Environment) -> Result<String, SyncError> {
    let tokens = PipelineTokens::from_environment(env);
    for token in tokens.missing() {
        tracing::warn!(environment = %env.name, token, "no value configured for token");
    }

    let mapping = tokens.to_replacements();
    let body = render(&env.template, &mapping)?;
    let left = unresolved_tokens(&body, &mapping);
    if !left.is_empty() {
        tracing::warn!(
            environment = %env.name,
            tokens = ?left,
            "rendered configuration still contains tokens"
        );
    }
    Ok(body)
}

/// Render every output of `env`.
///
/// Returns `Vec<(output_path, content)>` in [`OutputKind::all`] order.
pub fn render_outputs(env: &Environment) -> Result<Vec<(PathBuf, String)>, SyncError> {
    let body = render_configuration(env)?;
    let request = CreatePipelineRequest::new(env, body.clone());
    let mut request_json = serde_json::to_string_pretty(&request)?;
    request_json.push('\n');

    let mut results = Vec::with_capacity(OutputKind::all().len());
    for kind in OutputKind::all() {
        let content = match kind {
            OutputKind::PipelineConfiguration => body.clone(),
            OutputKind::CreatePipelineRequest => request_json.clone(),
        };
        results.push((kind.output_path(env), content));
    }
    Ok(results)
}
