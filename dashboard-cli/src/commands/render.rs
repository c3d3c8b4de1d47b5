//! `dashboard render <template>`: ad-hoc literal substitution.

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use anyhow::{Context, Result};
use clap::Args;

use dashboard_core::{
    environment,
    types::{EnvironmentName, ReplacementMap},
};
use dashboard_renderer::{render, PipelineTokens};

/// Arguments for `dashboard render`.
#[derive(Args, Debug)]
pub struct RenderArgs {
    /// Template file to render.
    pub template: PathBuf,

    /// Seed the mapping with the pipeline tokens of this environment.
    #[arg(long)]
    pub env: Option<String>,

    /// Literal replacement, applied in the order given (repeatable).
    #[arg(long = "set", value_name = "TOKEN=VALUE")]
    pub set: Vec<TokenArg>,

    /// Write the result here instead of stdout.
    #[arg(long, short = 'o')]
    pub output: Option<PathBuf>,
}

/// `TOKEN=VALUE` pair parsed from the command line. The value may contain `=`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenArg {
    pub token: String,
    pub value: String,
}

impl FromStr for TokenArg {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.split_once('=') {
            Some((token, value)) if !token.is_empty() => Ok(TokenArg {
                token: token.to_string(),
                value: value.to_string(),
            }),
            _ => Err(format!("expected TOKEN=VALUE, got '{s}'")),
        }
    }
}

impl fmt::Display for TokenArg {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}={}", self.token, self.value)
    }
}

impl RenderArgs {
    pub fn run(self) -> Result<()> {
        let mut mapping = match &self.env {
            Some(name) => {
                let env = environment::load(&EnvironmentName::from(name.as_str()))
                    .with_context(|| format!("failed to load environment '{name}'"))?;
                PipelineTokens::from_environment(&env).to_replacements()
            }
            None => ReplacementMap::new(),
        };
        mapping.extend(self.set.iter().map(|t| (t.token.as_str(), t.value.as_str())));

        let rendered = render(&self.template, &mapping)
            .with_context(|| format!("failed to render '{}'", self.template.display()))?;

        match self.output {
            Some(path) => {
                if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                    std::fs::create_dir_all(parent)
                        .with_context(|| format!("cannot create '{}'", parent.display()))?;
                }
                std::fs::write(&path, rendered)
                    .with_context(|| format!("failed to write '{}'", path.display()))?;
                tracing::info!(path = %path.display(), "wrote rendered template");
            }
            None => print!("{rendered}"),
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn token_arg_splits_on_first_equals() {
        let arg: TokenArg = "STS_ROLE_ARN=arn:aws:iam::1:role/a=b".parse().unwrap();
        assert_eq!(arg.token, "STS_ROLE_ARN");
        assert_eq!(arg.value, "arn:aws:iam::1:role/a=b");
    }

    #[test]
    fn token_arg_allows_empty_value() {
        let arg: TokenArg = "BUCKET_NAME=".parse().unwrap();
        assert_eq!(arg.value, "");
    }

    #[test]
    fn token_arg_rejects_missing_token() {
        assert!("=value".parse::<TokenArg>().is_err());
        assert!("novalue".parse::<TokenArg>().is_err());
    }
}
