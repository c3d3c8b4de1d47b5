//! # dashboard-renderer
//!
//! Literal-substitution renderer that materializes a pipeline connection
//! configuration from a text template.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use std::path::Path;
//! use dashboard_core::types::ReplacementMap;
//! use dashboard_renderer::render;
//!
//! let mapping: ReplacementMap = [("REGION_NAME", "us-west-2")].into_iter().collect();
//! match render(Path::new("template.txt"), &mapping) {
//!     Ok(body) => println!("{body}"),
//!     Err(err) => eprintln!("{err}"),
//! }
//! ```

pub mod engine;
pub mod error;
pub mod tokens;

pub use engine::{render, render_str, unresolved_tokens, DEFAULT_PIPELINE_TEMPLATE};
pub use error::RenderError;
pub use tokens::PipelineTokens;
