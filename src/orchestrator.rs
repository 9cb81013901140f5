//! Upgrade workflow against a hosted repository
//!
//! This module provides:
//! - Workflow coordination: download → stage → upgrade → branch → commit → pull request
//! - Dry-run mode (no remote mutations)
//! - Branch naming for upgrade branches
//!
//! Steps run strictly in sequence and the first failure aborts the run. The
//! upgrade happens before any remote mutation, so a rejected upgrade never
//! leaves a branch behind.

use crate::domain::{DependencyClass, UpgradeReport, UpgradeRequest};
use crate::error::{AppError, ManifestError};
use crate::manifest::{read_manifest, write_manifest, MANIFEST_FILENAME};
use crate::progress::Progress;
use crate::remote::{FileChanges, PullRequest, PullRequestCreate, RemoteBranch, RemoteRepository};
use crate::update::LibraryUpgrader;
use regex::Regex;
use std::path::Path;
use std::sync::LazyLock;
use tempfile::Builder;

/// Commit author used when none is configured
pub const DEFAULT_AUTHOR: &str = "depbump <depbump@users.noreply.bitbucket.org>";

/// Characters that are not allowed in generated branch names
static BRANCH_UNSAFE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^A-Za-z0-9._/-]").unwrap());

/// Workflow settings
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkflowConfig {
    /// Commit author in `Name <email>` form
    pub author: String,
    /// Dependency classes to upgrade
    pub classes: Vec<DependencyClass>,
    /// Stop after the local upgrade, without touching the remote
    pub dry_run: bool,
    /// Show spinners while waiting on the host
    pub show_progress: bool,
    /// Print step-by-step status to stderr
    pub verbose: bool,
}

impl Default for WorkflowConfig {
    fn default() -> Self {
        Self {
            author: DEFAULT_AUTHOR.to_string(),
            classes: DependencyClass::defaults().to_vec(),
            dry_run: false,
            show_progress: false,
            verbose: false,
        }
    }
}

/// Result of a workflow run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkflowOutcome {
    /// What the upgrader rewrote
    pub report: UpgradeReport,
    /// Branch holding the change (None in dry-run mode)
    pub branch: Option<RemoteBranch>,
    /// Pull request opened for the change (None in dry-run mode)
    pub pull_request: Option<PullRequest>,
    /// Upgraded manifest content
    pub manifest: String,
    /// Whether this was a dry run
    pub dry_run: bool,
}

/// Drives a library upgrade from download to pull request
pub struct Workflow {
    config: WorkflowConfig,
    upgrader: LibraryUpgrader,
}

impl Workflow {
    /// Create a workflow with the given settings
    pub fn new(config: WorkflowConfig) -> Self {
        Self {
            config,
            upgrader: LibraryUpgrader::new(),
        }
    }

    /// Upgrade `library` to `new_version` in the repository's package.json
    pub async fn run(
        &self,
        repo: &dyn RemoteRepository,
        library: &str,
        new_version: &str,
    ) -> Result<WorkflowOutcome, AppError> {
        let mut progress = Progress::new(self.config.show_progress);

        // Assume the repository root is the project root (no monorepo support)
        progress.spinner(&format!(
            "Downloading {} from {}...",
            MANIFEST_FILENAME,
            repo.provider_name()
        ));
        let original = repo.download_file_contents(MANIFEST_FILENAME).await?;
        progress.finish_and_clear();
        self.log(&format!(
            "Downloaded {} at {}",
            MANIFEST_FILENAME,
            repo.main_branch().head
        ));

        let (report, manifest) =
            self.upgrade_staged(&std::env::temp_dir(), &original, library, new_version)?;
        self.log(&format!("Upgraded {}", report));

        if self.config.dry_run {
            return Ok(WorkflowOutcome {
                report,
                branch: None,
                pull_request: None,
                manifest,
                dry_run: true,
            });
        }

        let main_branch = repo.main_branch();
        let branch_name = upgrade_branch_name(library, new_version);
        progress.spinner(&format!("Creating branch {}...", branch_name));
        let branch = repo.create_branch(&branch_name, &main_branch.head).await?;
        self.log(&format!(
            "Created branch {} from {}",
            branch.name, main_branch.name
        ));

        progress.spinner("Committing changes...");
        let mut files = FileChanges::new();
        files.insert(MANIFEST_FILENAME.to_string(), manifest.clone());
        repo.create_commit(
            &commit_message(library, new_version),
            &files,
            &branch,
            &self.config.author,
        )
        .await?;
        self.log(&format!("Committed {} to {}", MANIFEST_FILENAME, branch.name));

        progress.spinner("Opening pull request...");
        let request = PullRequestCreate::new(pull_request_title(library, new_version), &branch.name)
            .with_target(&main_branch.name)
            .with_description(pull_request_description(&report));
        let pull_request = repo.open_pull_request(&request).await?;
        progress.finish_and_clear();
        self.log(&format!("Opened pull request #{}", pull_request.id));

        Ok(WorkflowOutcome {
            report,
            branch: Some(branch),
            pull_request: Some(pull_request),
            manifest,
            dry_run: false,
        })
    }

    /// Run the upgrader against a copy of `content` staged in `staging_dir`
    ///
    /// The staged file is removed when this returns, on success or failure.
    fn upgrade_staged(
        &self,
        staging_dir: &Path,
        content: &str,
        library: &str,
        new_version: &str,
    ) -> Result<(UpgradeReport, String), AppError> {
        let staged = Builder::new()
            .prefix("depbump-")
            .suffix(".json")
            .tempfile_in(staging_dir)
            .map_err(|e| ManifestError::write_error(staging_dir, e))?;
        write_manifest(staged.path(), content)?;

        let request = UpgradeRequest::new(staged.path(), library, new_version)
            .with_classes(self.config.classes.iter().copied());
        let report = self.upgrader.upgrade_library(&request)?;

        let upgraded = read_manifest(staged.path())?;
        Ok((report, upgraded))
    }

    fn log(&self, message: &str) {
        if self.config.verbose {
            eprintln!("{}", message);
        }
    }
}

/// Branch name for an upgrade, restricted to characters every host accepts
pub fn upgrade_branch_name(library: &str, new_version: &str) -> String {
    let library = library.trim_start_matches(&['@', '-', '/'][..]);
    let raw = format!("lib-upgrade-{}-{}", library, new_version);
    BRANCH_UNSAFE_RE.replace_all(&raw, "-").into_owned()
}

/// Commit message for an upgrade
pub fn commit_message(library: &str, new_version: &str) -> String {
    format!("Upgrade {} to {}", library, new_version)
}

/// Pull request title for an upgrade
pub fn pull_request_title(library: &str, new_version: &str) -> String {
    format!("Library version upgrade: {} => {}", library, new_version)
}

/// Pull request body listing every rewritten declaration
pub fn pull_request_description(report: &UpgradeReport) -> String {
    let lines: Vec<String> = report
        .changes
        .iter()
        .map(|change| {
            format!(
                "- {}: `{}` → `{}`",
                change.class, change.previous, report.new_version
            )
        })
        .collect();

    format!(
        "Upgrades `{}` to `{}`.\n\n{}\n",
        report.library,
        report.new_version,
        lines.join("\n")
    )
}
