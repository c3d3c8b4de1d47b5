//! Pool directory backed by the `aws` command-line client.

use std::ffi::OsString;
use std::process::Command;

use crate::directory::{parse_identity_pools, parse_user_pools, PoolDirectory, PoolRecord};
use crate::error::LookupError;

/// Runs `aws cognito-idp list-user-pools` / `aws cognito-identity
/// list-identity-pools` and parses their JSON output.
#[derive(Debug, Clone)]
pub struct AwsCliDirectory {
    /// Executable to invoke; `aws` unless overridden.
    pub program: OsString,
    pub region: Option<String>,
    pub profile: Option<String>,
}

impl Default for AwsCliDirectory {
    fn default() -> Self {
        AwsCliDirectory {
            program: OsString::from("aws"),
            region: None,
            profile: None,
        }
    }
}

impl AwsCliDirectory {
    pub fn new(region: Option<String>, profile: Option<String>) -> Self {
        AwsCliDirectory {
            region,
            profile,
            ..Self::default()
        }
    }

    /// Full argument list for one listing call.
    pub fn args(&self, service: &str, operation: &str, max_results: u32) -> Vec<String> {
        let mut args = vec![
            service.to_string(),
            operation.to_string(),
            "--max-results".to_string(),
            max_results.to_string(),
            "--output".to_string(),
            "json".to_string(),
        ];
        if let Some(region) = &self.region {
            args.push("--region".to_string());
            args.push(region.clone());
        }
        if let Some(profile) = &self.profile {
            args.push("--profile".to_string());
            args.push(profile.clone());
        }
        args
    }

    fn run(&self, service: &str, operation: &str, max_results: u32) -> Result<Vec<u8>, LookupError> {
        if max_results == 0 {
            return Err(LookupError::Directory(
                "max results must be at least 1".to_string(),
            ));
        }

        let program = self.program.to_string_lossy().into_owned();
        let args = self.args(service, operation, max_results);
        tracing::debug!(program = %program, args = ?args, "querying pool directory");

        let output = Command::new(&self.program)
            .args(&args)
            .output()
            .map_err(|source| LookupError::Spawn {
                program: program.clone(),
                source,
            })?;

        if !output.status.success() {
            return Err(LookupError::CommandFailed {
                program,
                status: output.status,
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }
        Ok(output.stdout)
    }
}

impl PoolDirectory for AwsCliDirectory {
    fn list_user_pools(&self, max_results: u32) -> Result<Vec<PoolRecord>, LookupError> {
        let stdout = self.run("cognito-idp", "list-user-pools", max_results)?;
        parse_user_pools(&stdout)
    }

    fn list_identity_pools(&self, max_results: u32) -> Result<Vec<PoolRecord>, LookupError> {
        let stdout = self.run("cognito-identity", "list-identity-pools", max_results)?;
        parse_identity_pools(&stdout)
    }
}
