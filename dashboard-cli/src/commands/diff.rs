//! `dashboard diff <env>`: show unified diffs for what sync would write.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;

use dashboard_sync::diff_environment;

/// Arguments for `dashboard diff`.
#[derive(Args, Debug)]
pub struct DiffArgs {
    /// Environment name to diff.
    pub environment: String,
}

impl DiffArgs {
    pub fn run(self) -> Result<()> {
        let home: PathBuf = dirs::home_dir().context("could not determine home directory")?;

        let result = diff_environment(&self.environment, &home)
            .with_context(|| format!("diff failed for '{}'", self.environment))?;

        if result.diffs.is_empty() {
            println!("No differences for '{}'.", result.environment);
            return Ok(());
        }

        for diff in result.diffs {
            print!("{}", diff.unified_diff);
            if !diff.unified_diff.ends_with('\n') {
                println!();
            }
        }

        Ok(())
    }
}
