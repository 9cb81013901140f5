//! Text output formatter for human-readable display
//!
//! This module provides:
//! - The upgraded library line and pull request link
//! - Per-declaration changes with semantic version change type (verbose)
//! - The rewritten manifest in dry-run mode

use crate::orchestrator::WorkflowOutcome;
use crate::output::{OutputFormatter, Verbosity};
use crate::parser::NodeVersionParser;
use colored::Colorize;
use semver::Version;
use std::io::Write;

/// Semantic version change type
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VersionChangeType {
    /// Major version change (breaking)
    Major,
    /// Minor version change (features)
    Minor,
    /// Patch version change (fixes)
    Patch,
    /// Old specifier has no comparable floor
    Unknown,
}

impl VersionChangeType {
    /// Determine the change type from an old specifier to a new exact version
    ///
    /// Ranges are compared by their lowest admitted version.
    pub fn from_versions(old: &str, new: &str) -> Self {
        let old = NodeVersionParser.parse(old).floor;
        let new = Version::parse(new.trim()).ok();

        match (old, new) {
            (Some(old), Some(new)) => {
                if new.major != old.major {
                    VersionChangeType::Major
                } else if new.minor != old.minor {
                    VersionChangeType::Minor
                } else {
                    VersionChangeType::Patch
                }
            }
            _ => VersionChangeType::Unknown,
        }
    }

    /// Get the display label with color
    pub fn colored_label(&self) -> String {
        match self {
            VersionChangeType::Major => "major".red().bold().to_string(),
            VersionChangeType::Minor => "minor".yellow().to_string(),
            VersionChangeType::Patch => "patch".green().to_string(),
            VersionChangeType::Unknown => "?".dimmed().to_string(),
        }
    }

    /// Get the plain label
    pub fn label(&self) -> &'static str {
        match self {
            VersionChangeType::Major => "major",
            VersionChangeType::Minor => "minor",
            VersionChangeType::Patch => "patch",
            VersionChangeType::Unknown => "?",
        }
    }
}

/// Text formatter for human-readable output
pub struct TextFormatter {
    /// Verbosity level
    verbosity: Verbosity,
    /// Whether to use colors
    color: bool,
}

impl TextFormatter {
    /// Create a new text formatter
    pub fn new(verbosity: Verbosity) -> Self {
        Self {
            verbosity,
            color: true,
        }
    }

    /// Create a new text formatter with color option
    pub fn with_color(verbosity: Verbosity, color: bool) -> Self {
        Self { verbosity, color }
    }

    fn dry_run_prefix(&self, dry_run: bool) -> String {
        if !dry_run {
            String::new()
        } else if self.color {
            format!("{} ", "(dry-run)".cyan())
        } else {
            "(dry-run) ".to_string()
        }
    }

    /// Note printed when every declaration already held the new version
    fn format_unchanged(
        &self,
        outcome: &WorkflowOutcome,
        writer: &mut dyn Write,
    ) -> std::io::Result<()> {
        if outcome.report.has_effective_changes() {
            return Ok(());
        }
        let note = format!(
            "{} is already at {} in every declaration",
            outcome.report.library, outcome.report.new_version
        );
        if self.color {
            writeln!(writer, "{}", note.yellow())
        } else {
            writeln!(writer, "{}", note)
        }
    }

    fn format_changes(
        &self,
        outcome: &WorkflowOutcome,
        writer: &mut dyn Write,
    ) -> std::io::Result<()> {
        let report = &outcome.report;
        let width = report
            .changes
            .iter()
            .map(|c| c.class.key().len())
            .max()
            .unwrap_or(0);

        for change in &report.changes {
            let change_type =
                VersionChangeType::from_versions(&change.previous, &report.new_version);
            let class = format!("{:width$}", change.class.key(), width = width);
            if self.color {
                writeln!(
                    writer,
                    "  {} {} {} {} [{}]",
                    class,
                    change.previous.dimmed(),
                    "→".dimmed(),
                    report.new_version.bright_white().bold(),
                    change_type.colored_label()
                )?;
            } else {
                writeln!(
                    writer,
                    "  {} {} → {} [{}]",
                    class,
                    change.previous,
                    report.new_version,
                    change_type.label()
                )?;
            }
        }
        Ok(())
    }
}

impl OutputFormatter for TextFormatter {
    fn format(&self, outcome: &WorkflowOutcome, writer: &mut dyn Write) -> std::io::Result<()> {
        if outcome.dry_run {
            if self.verbosity != Verbosity::Quiet {
                writeln!(
                    writer,
                    "{}Library version upgraded: {}",
                    self.dry_run_prefix(true),
                    outcome.report
                )?;
                self.format_unchanged(outcome, writer)?;
                self.format_changes(outcome, writer)?;
                writeln!(writer)?;
            }
            write!(writer, "{}", outcome.manifest)?;
            if !outcome.manifest.ends_with('\n') {
                writeln!(writer)?;
            }
            return Ok(());
        }

        if self.verbosity == Verbosity::Quiet {
            if let Some(pr) = &outcome.pull_request {
                writeln!(writer, "{}", pr.link)?;
            }
            return Ok(());
        }

        writeln!(writer, "Library version upgraded: {}", outcome.report)?;
        self.format_unchanged(outcome, writer)?;
        if self.verbosity == Verbosity::Verbose {
            self.format_changes(outcome, writer)?;
            if let Some(branch) = &outcome.branch {
                writeln!(writer, "Branch: {} ({})", branch.name, branch.head)?;
            }
        }
        if let Some(pr) = &outcome.pull_request {
            let link = if self.color {
                pr.link.underline().to_string()
            } else {
                pr.link.clone()
            };
            writeln!(writer, "PR created: {}", link)?;
        }
        Ok(())
    }
}
