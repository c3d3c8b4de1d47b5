//! Dashboard: render and materialize analytics dashboard pipeline configuration.
//!
//! # Usage
//!
//! ```text
//! dashboard init <dir> --name <env> [--region <region>]
//! dashboard env list [--json]
//! dashboard render <template> [--env <env>] [--set TOKEN=VALUE]... [--output <path>]
//! dashboard sync <env> [--dry-run]
//! dashboard sync --all [--dry-run]
//! dashboard diff <env>
//! dashboard pools [<env>] [--user-pool <name>] [--identity-pool <name>] [--strict]
//! ```

mod commands;

use anyhow::Result;
use clap::{Parser, Subcommand};

use commands::{
    diff::DiffArgs, env::EnvCommand, init::InitArgs, pools::PoolsArgs, render::RenderArgs,
    sync::SyncArgs,
};

// ---------------------------------------------------------------------------
// CLI entry point
// ---------------------------------------------------------------------------

#[derive(Parser, Debug)]
#[command(
    name = "dashboard",
    version,
    about = "Render pipeline configuration for analytics dashboard environments",
    long_about = None,
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Register an environment and scaffold its pipeline template.
    Init(InitArgs),

    /// Inspect registered environments.
    Env {
        #[command(subcommand)]
        command: EnvCommand,
    },

    /// Render a template with literal token substitution.
    Render(RenderArgs),

    /// Render and write the pipeline outputs of an environment.
    Sync(SyncArgs),

    /// Show unified diff of what sync would write for an environment.
    Diff(DiffArgs),

    /// Resolve existing user and identity pools by name.
    Pools(PoolsArgs),
}

// ---------------------------------------------------------------------------
// Main
// ---------------------------------------------------------------------------

fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();
    match cli.command {
        Commands::Init(args) => args.run(),
        Commands::Env { command } => commands::env::run(command),
        Commands::Render(args) => args.run(),
        Commands::Sync(args) => args.run(),
        Commands::Diff(args) => args.run(),
        Commands::Pools(args) => args.run(),
    }
}

fn init_tracing() {
    use tracing_subscriber::{fmt, EnvFilter};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}
