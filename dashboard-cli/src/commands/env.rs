//! `dashboard env list`

use anyhow::{Context, Result};
use clap::Subcommand;
use serde::Serialize;
use tabled::{settings::Style, Table, Tabled};

use dashboard_core::environment;

/// Inspect registered environments.
#[derive(Subcommand, Debug)]
pub enum EnvCommand {
    /// List all registered environments.
    List {
        /// Emit machine-readable JSON.
        #[arg(long)]
        json: bool,
    },
}

#[derive(Tabled, Serialize)]
struct EnvironmentRow {
    #[tabled(rename = "environment")]
    name: String,
    #[tabled(rename = "region")]
    region: String,
    #[tabled(rename = "template")]
    template: String,
    #[tabled(rename = "output")]
    output_dir: String,
}

pub fn run(cmd: EnvCommand) -> Result<()> {
    match cmd {
        EnvCommand::List { json } => list(json),
    }
}

fn list(json: bool) -> Result<()> {
    let envs = environment::list().context("failed to load environments")?;
    let rows: Vec<EnvironmentRow> = envs
        .into_iter()
        .map(|env| EnvironmentRow {
            name: env.name.0,
            region: env.region,
            template: env.template.display().to_string(),
            output_dir: env.output_dir.display().to_string(),
        })
        .collect();

    if json {
        println!(
            "{}",
            serde_json::to_string_pretty(&rows).context("failed to serialize environments")?
        );
        return Ok(());
    }

    if rows.is_empty() {
        println!("No environments registered.");
        println!("Run: dashboard init <dir> --name <env>");
        return Ok(());
    }

    let mut table = Table::new(rows);
    table.with(Style::rounded());
    println!("{table}");
    Ok(())
}
