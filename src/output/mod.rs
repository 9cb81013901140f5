//! Output formatting for workflow results
//!
//! This module provides:
//! - Text output for human-readable display
//! - Verbosity levels shared with the CLI flags

mod text;

pub use text::{TextFormatter, VersionChangeType};

use crate::orchestrator::WorkflowOutcome;
use std::io::Write;

/// Output verbosity level
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Verbosity {
    /// Minimal output
    Quiet,
    /// Normal output
    #[default]
    Normal,
    /// Detailed output with additional information
    Verbose,
}

impl Verbosity {
    /// Derive the level from the CLI flags (quiet wins over verbose)
    pub fn from_flags(verbose: bool, quiet: bool) -> Self {
        if quiet {
            Verbosity::Quiet
        } else if verbose {
            Verbosity::Verbose
        } else {
            Verbosity::Normal
        }
    }
}

/// Trait for output formatters
pub trait OutputFormatter {
    /// Format and write a workflow outcome
    fn format(&self, outcome: &WorkflowOutcome, writer: &mut dyn Write) -> std::io::Result<()>;
}
