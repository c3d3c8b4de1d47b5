//! Literal token substitution over text templates.
//!
//! Templates are plain text with placeholder tokens such as `REGION_NAME`
//! embedded in otherwise opaque pipeline configuration. No parsing happens:
//! each token of the [`ReplacementMap`] is replaced as a literal substring,
//! in map order, against the same evolving text.

use std::path::Path;

use dashboard_core::types::ReplacementMap;

use crate::error::RenderError;

/// Default DynamoDB → OpenSearch ingestion pipeline template, baked into the
/// binary at compile time.
pub const DEFAULT_PIPELINE_TEMPLATE: &str = include_str!("templates/pipeline.txt");

/// Read the template at `location` and apply `mapping`.
///
/// Returns [`RenderError::NotFound`] when nothing exists at `location` and
/// [`RenderError::Read`] for any other read failure (permissions, a directory,
/// non-UTF-8 content). No text is produced on failure.
pub fn render(location: &Path, mapping: &ReplacementMap) -> Result<String, RenderError> {
    let template =
        std::fs::read_to_string(location).map_err(|e| RenderError::from_io(location, e))?;
    tracing::debug!(
        path = %location.display(),
        tokens = mapping.len(),
        "rendering template"
    );
    Ok(render_str(&template, mapping))
}

/// Apply `mapping` to an in-memory template.
///
/// Empty tokens are skipped.
pub fn render_str(template: &str, mapping: &ReplacementMap) -> String {
    let mut content = template.to_string();
    for (token, value) in mapping.iter() {
        if token.is_empty() {
            continue;
        }
        if content.contains(token) {
            content = content.replace(token, value);
        }
    }
    content
}

/// Tokens of `mapping` that still occur in `text`, in map order.
pub fn unresolved_tokens<'m>(text: &str, mapping: &'m ReplacementMap) -> Vec<&'m str> {
    mapping
        .tokens()
        .filter(|token| !token.is_empty() && text.contains(token))
        .collect()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
