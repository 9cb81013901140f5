//! Remote repository abstraction
//!
//! This module provides:
//! - The provider-neutral [`RemoteRepository`] trait used by the workflow
//! - Shared HTTP client foundation
//! - Bitbucket Cloud implementation
//!
//! GitHub or GitLab support means another `RemoteRepository` implementation;
//! nothing outside this module depends on the provider.

mod bitbucket;
mod client;

pub use bitbucket::{BitbucketApiClient, BitbucketHost, BitbucketRepository, BITBUCKET_API_URL};
pub use client::HttpClient;

use crate::error::RemoteError;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A branch and the commit hash of its head
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoteBranch {
    /// Branch name
    pub name: String,
    /// Commit hash the branch points at
    pub head: String,
}

impl RemoteBranch {
    /// Creates a new branch descriptor
    pub fn new(name: impl Into<String>, head: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            head: head.into(),
        }
    }
}

/// A pull request as created on the host
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PullRequest {
    /// Host-assigned identifier
    pub id: u64,
    /// Web link to the pull request
    pub link: String,
    /// Title of the pull request
    pub title: String,
}

/// Data needed to open a pull request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PullRequestCreate {
    /// Title of the pull request
    pub title: String,
    /// Branch holding the changes
    pub source_branch: String,
    /// Branch to merge into; the repository's main branch when `None`
    pub target_branch: Option<String>,
    /// Optional body text
    pub description: Option<String>,
}

impl PullRequestCreate {
    /// Creates a request targeting the main branch
    pub fn new(title: impl Into<String>, source_branch: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            source_branch: source_branch.into(),
            target_branch: None,
            description: None,
        }
    }

    /// Sets the target branch (builder pattern)
    pub fn with_target(mut self, target_branch: impl Into<String>) -> Self {
        self.target_branch = Some(target_branch.into());
        self
    }

    /// Sets the description (builder pattern)
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Target branch, falling back to `main_branch`
    pub fn target_or<'a>(&'a self, main_branch: &'a str) -> &'a str {
        self.target_branch.as_deref().unwrap_or(main_branch)
    }
}

/// Whole-file replacements keyed by path relative to the repository root
pub type FileChanges = BTreeMap<String, String>;

/// Operations the upgrade workflow needs from a hosted repository
#[async_trait]
pub trait RemoteRepository: Send + Sync {
    /// Human-readable name of the hosting provider
    fn provider_name(&self) -> &'static str;

    /// The repository's default branch and its head commit
    fn main_branch(&self) -> &RemoteBranch;

    /// Create a branch pointing at `from_commit`
    async fn create_branch(&self, name: &str, from_commit: &str)
        -> Result<RemoteBranch, RemoteError>;

    /// Raw content of a file at the main branch head
    async fn download_file_contents(&self, path: &str) -> Result<String, RemoteError>;

    /// Create a single commit replacing the given files on `branch`
    async fn create_commit(
        &self,
        message: &str,
        files: &FileChanges,
        branch: &RemoteBranch,
        author: &str,
    ) -> Result<(), RemoteError>;

    /// Open a pull request
    async fn open_pull_request(&self, request: &PullRequestCreate)
        -> Result<PullRequest, RemoteError>;
}
