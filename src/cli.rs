//! CLI argument parsing module for depbump

use crate::domain::DependencyClass;
use crate::error::ConfigError;
use crate::orchestrator::{WorkflowConfig, DEFAULT_AUTHOR};
use crate::remote::BITBUCKET_API_URL;
use clap::{ArgAction, Parser};

/// Environment variable holding the repository access token
pub const ACCESS_TOKEN_ENV: &str = "BITBUCKET_ACCESS_TOKEN";

/// Bump a package.json dependency and open a pull request for it
#[derive(Parser, Debug, Clone)]
#[command(
    name = "depbump",
    version,
    about = "Bump a package.json dependency on Bitbucket and open a pull request"
)]
pub struct CliArgs {
    /// Bitbucket workspace that owns the repository
    #[arg(long)]
    pub workspace: Option<String>,

    /// Repository slug
    #[arg(long = "reposlug")]
    pub repo_slug: Option<String>,

    /// Name of the library to upgrade
    #[arg(long)]
    pub library: Option<String>,

    /// Version to upgrade to (exact x.y.z)
    #[arg(long = "library-version")]
    pub library_version: Option<String>,

    /// Repository access token
    #[arg(long, env = ACCESS_TOKEN_ENV, hide_env_values = true)]
    pub access_token: Option<String>,

    /// Dependency section to upgrade (can be specified multiple times)
    ///
    /// Accepts dependencies, dev-dependencies or peer-dependencies.
    /// Defaults to dependencies and devDependencies.
    #[arg(long = "dep-class", action = ArgAction::Append)]
    pub dep_class: Vec<DependencyClass>,

    /// Commit author in "Name <email>" form
    #[arg(long, default_value = DEFAULT_AUTHOR)]
    pub author: String,

    /// Bitbucket API base URL
    #[arg(long, env = "BITBUCKET_API_URL", default_value = BITBUCKET_API_URL)]
    pub base_url: String,

    // General options
    /// Dry run mode - upgrade locally and print the result without touching the repository
    #[arg(short = 'n', long)]
    pub dry_run: bool,

    /// Enable verbose output
    #[arg(long)]
    pub verbose: bool,

    /// Enable quiet mode - minimal output
    #[arg(short, long)]
    pub quiet: bool,
}

/// Required inputs once validated
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScriptInputs {
    pub workspace: String,
    pub repo_slug: String,
    pub library: String,
    pub library_version: String,
    pub access_token: String,
}

impl CliArgs {
    /// Check that every required input is present and non-empty
    ///
    /// Inputs are checked in a fixed order and the first missing one is reported.
    pub fn validate(&self) -> Result<ScriptInputs, ConfigError> {
        Ok(ScriptInputs {
            workspace: required(&self.workspace, "--workspace")?,
            repo_slug: required(&self.repo_slug, "--reposlug")?,
            library: required(&self.library, "--library")?,
            library_version: required(&self.library_version, "--library-version")?,
            access_token: required(&self.access_token, ACCESS_TOKEN_ENV)?,
        })
    }

    /// Workflow settings derived from the flags
    pub fn workflow_config(&self) -> WorkflowConfig {
        let classes = if self.dep_class.is_empty() {
            DependencyClass::defaults().to_vec()
        } else {
            let mut classes = Vec::new();
            for class in &self.dep_class {
                if !classes.contains(class) {
                    classes.push(*class);
                }
            }
            classes
        };

        WorkflowConfig {
            author: self.author.clone(),
            classes,
            dry_run: self.dry_run,
            show_progress: !self.quiet,
            verbose: self.verbose,
        }
    }
}

fn required(value: &Option<String>, name: &str) -> Result<String, ConfigError> {
    match value.as_deref().map(str::trim) {
        Some(v) if !v.is_empty() => Ok(v.to_string()),
        _ => Err(ConfigError::missing_required_input(name)),
    }
}
