//! `dashboard pools`: resolve existing user and identity pools by name.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use colored::Colorize;
use serde::Serialize;
use tabled::{settings::Style, Table, Tabled};

use dashboard_core::{
    environment,
    types::{EnvironmentName, PoolId, PoolName, PoolNames},
};
use dashboard_identity::{
    find_existing_pools, lookup_pools, AwsCliDirectory, ExistingPools, JsonListingDirectory,
    PoolDirectory,
};

/// Arguments for `dashboard pools`.
#[derive(Args, Debug)]
pub struct PoolsArgs {
    /// Take pool names and region from this environment.
    pub environment: Option<String>,

    /// User pool name to look up.
    #[arg(long)]
    pub user_pool: Option<String>,

    /// Identity pool name to look up.
    #[arg(long)]
    pub identity_pool: Option<String>,

    /// Saved `list-user-pools` JSON instead of calling the aws CLI.
    #[arg(long, requires = "identity_pools_json")]
    pub user_pools_json: Option<PathBuf>,

    /// Saved `list-identity-pools` JSON instead of calling the aws CLI.
    #[arg(long, requires = "user_pools_json")]
    pub identity_pools_json: Option<PathBuf>,

    /// Region passed to the aws CLI.
    #[arg(long)]
    pub region: Option<String>,

    /// Named profile passed to the aws CLI.
    #[arg(long)]
    pub profile: Option<String>,

    /// Fail when the directory query fails instead of reporting both pools absent.
    #[arg(long)]
    pub strict: bool,

    /// Emit machine-readable JSON.
    #[arg(long)]
    pub json: bool,
}

#[derive(Tabled)]
struct PoolRow {
    #[tabled(rename = "pool")]
    kind: &'static str,
    #[tabled(rename = "name")]
    name: String,
    #[tabled(rename = "id")]
    id: String,
}

#[derive(Serialize)]
struct PoolsJson {
    user_pool: PoolJson,
    identity_pool: PoolJson,
}

#[derive(Serialize)]
struct PoolJson {
    name: String,
    id: Option<String>,
}

impl PoolsArgs {
    pub fn run(self) -> Result<()> {
        let (names, env_region) = match &self.environment {
            Some(name) => {
                let env = environment::load(&EnvironmentName::from(name.as_str()))
                    .with_context(|| format!("failed to load environment '{name}'"))?;
                (env.pools, Some(env.region))
            }
            None => (PoolNames::default(), None),
        };
        let user_pool = self.user_pool.clone().map(PoolName::from).unwrap_or(names.user_pool);
        let identity_pool = self
            .identity_pool
            .clone()
            .map(PoolName::from)
            .unwrap_or(names.identity_pool);

        let directory: Box<dyn PoolDirectory> =
            match (&self.user_pools_json, &self.identity_pools_json) {
                (Some(users), Some(identities)) => {
                    Box::new(JsonListingDirectory::new(users, identities))
                }
                _ => Box::new(AwsCliDirectory::new(
                    self.region.clone().or(env_region),
                    self.profile.clone(),
                )),
            };

        let found = if self.strict {
            lookup_pools(directory.as_ref(), &user_pool, &identity_pool)
                .context("pool lookup failed")?
        } else {
            find_existing_pools(directory.as_ref(), &user_pool, &identity_pool)
        };

        if self.json {
            print_json(&user_pool, &identity_pool, found)
        } else {
            print_table(&user_pool, &identity_pool, found);
            Ok(())
        }
    }
}

fn print_json(user_pool: &PoolName, identity_pool: &PoolName, found: ExistingPools) -> Result<()> {
    let payload = PoolsJson {
        user_pool: PoolJson {
            name: user_pool.0.clone(),
            id: found.user_pool_id.map(|id| id.0),
        },
        identity_pool: PoolJson {
            name: identity_pool.0.clone(),
            id: found.identity_pool_id.map(|id| id.0),
        },
    };
    println!(
        "{}",
        serde_json::to_string_pretty(&payload).context("failed to serialize pools JSON")?
    );
    Ok(())
}

fn print_table(user_pool: &PoolName, identity_pool: &PoolName, found: ExistingPools) {
    let display = |id: Option<PoolId>| match id {
        Some(id) => id.0,
        None => "not found".to_string(),
    };
    let rows = vec![
        PoolRow {
            kind: "user",
            name: user_pool.0.clone(),
            id: display(found.user_pool_id),
        },
        PoolRow {
            kind: "identity",
            name: identity_pool.0.clone(),
            id: display(found.identity_pool_id),
        },
    ];
    let missing = rows.iter().filter(|r| r.id == "not found").count();

    let mut table = Table::new(rows);
    table.with(Style::rounded());
    println!("{table}");
    if missing > 0 {
        println!("{}", format!("{missing} pool(s) not found").yellow());
    }
}
