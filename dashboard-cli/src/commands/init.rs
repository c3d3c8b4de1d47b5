//! `dashboard init <dir> --name <env> [--region <region>]`

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Args;
use colored::Colorize;

use dashboard_core::{environment, types::EnvironmentName};
use dashboard_renderer::DEFAULT_PIPELINE_TEMPLATE;

/// Register an environment and scaffold its pipeline template.
#[derive(Args, Debug)]
pub struct InitArgs {
    /// Environment root directory; created if missing. Holds `template.txt`
    /// and the `build/` output directory.
    pub dir: PathBuf,

    /// Environment name (letters, digits, '-' or '_'). Creates
    /// ~/.dashboard/environments/<name>.yaml
    #[arg(long, short = 'n')]
    pub name: String,

    /// Region substituted for `REGION_NAME`.
    #[arg(long, short = 'r', default_value = "us-west-2")]
    pub region: String,
}

impl InitArgs {
    pub fn run(self) -> Result<()> {
        let home = dirs::home_dir().context("could not determine home directory")?;
        let name = EnvironmentName::from(self.name.clone());
        environment::validate_name(&name)?;

        if environment::environment_path_at(&home, &name).exists() {
            return self.report_existing(&home, &name);
        }

        std::fs::create_dir_all(&self.dir)
            .with_context(|| format!("cannot create '{}'", self.dir.display()))?;
        let root = self
            .dir
            .canonicalize()
            .with_context(|| format!("cannot resolve path '{}'", self.dir.display()))?;

        let env = environment::init_at(name, &root, &self.region, &home)
            .with_context(|| format!("failed to init environment '{}'", self.name))?;

        if env.template.exists() {
            println!("  Keeping existing template: {}", env.template.display());
        } else {
            std::fs::write(&env.template, DEFAULT_PIPELINE_TEMPLATE).with_context(|| {
                format!("failed to write template '{}'", env.template.display())
            })?;
            println!("  Wrote default template: {}", env.template.display());
        }

        println!(
            "{} Registered environment '{}' ({})",
            "✓".green(),
            env.name,
            env.region
        );
        println!("  Saved to: ~/.dashboard/environments/{}.yaml", env.name);
        println!("  Fill in `resources:` there, then run `dashboard sync {}`.", env.name);
        Ok(())
    }

    /// Re-running `init` never rewrites a registered environment.
    fn report_existing(&self, home: &Path, name: &EnvironmentName) -> Result<()> {
        let env = environment::load_at(home, name)
            .with_context(|| format!("failed to load environment '{name}'"))?;
        let root = env.template.parent().unwrap_or(env.template.as_path());

        println!(
            "{} Environment '{}' is already registered (root {}, region {})",
            "!".yellow(),
            env.name,
            root.display(),
            env.region
        );

        let requested_root = self.dir.canonicalize().unwrap_or_else(|_| self.dir.clone());
        if requested_root.as_path() != root {
            println!("  Ignored <dir>: {}", self.dir.display());
        }
        if self.region != env.region {
            println!("  Ignored --region: {}", self.region);
        }
        println!("  Edit ~/.dashboard/environments/{}.yaml to change it.", env.name);
        Ok(())
    }
}
