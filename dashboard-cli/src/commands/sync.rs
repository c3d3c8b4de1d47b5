//! `dashboard sync`: render and write the pipeline outputs of an environment.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use colored::Colorize;

use dashboard_sync::{
    pipeline::{self, SyncScope},
    WriteResult,
};

/// Arguments for `dashboard sync`.
#[derive(Args, Debug)]
pub struct SyncArgs {
    /// Name of the environment to sync (omit when using `--all`).
    pub environment: Option<String>,

    /// Sync every registered environment.
    #[arg(long, conflicts_with = "environment")]
    pub all: bool,

    /// Show what would be written without actually writing any files.
    #[arg(long)]
    pub dry_run: bool,
}

impl SyncArgs {
    pub fn run(self) -> Result<()> {
        let home: PathBuf = dirs::home_dir().context("could not determine home directory")?;

        if self.all {
            let results =
                pipeline::run(&home, SyncScope::All, self.dry_run).context("sync --all failed")?;
            for r in &results {
                print_results(&r.environment, &r.writes, self.dry_run);
            }
            if results.is_empty() {
                println!("No environments registered. Run `dashboard init` first.");
            }
        } else {
            let name = self
                .environment
                .clone()
                .context("provide an environment name or use --all")?;
            let mut results =
                pipeline::run(&home, SyncScope::Environment(name.clone()), self.dry_run)
                    .with_context(|| format!("sync failed for '{name}'"))?;
            if let Some(result) = results.pop() {
                print_results(&result.environment, &result.writes, self.dry_run);
            }
        }

        Ok(())
    }
}

fn print_results(environment: &str, writes: &[WriteResult], dry_run: bool) {
    let prefix = if dry_run { "[dry-run] " } else { "" };
    let written = writes
        .iter()
        .filter(|r| matches!(r, WriteResult::Written { .. } | WriteResult::WouldWrite { .. }))
        .count();
    let unchanged = writes
        .iter()
        .filter(|r| matches!(r, WriteResult::Unchanged { .. }))
        .count();

    println!(
        "{prefix}{} '{environment}' synced ({written} written, {unchanged} unchanged)",
        "✓".green()
    );

    for r in writes {
        match r {
            WriteResult::Written { path } => println!("  ✎  {}", path.display()),
            WriteResult::WouldWrite { path } => println!("  ~  {}", path.display()),
            WriteResult::Unchanged { path } => println!("  ·  {}", path.display().to_string().dimmed()),
        }
    }
}
