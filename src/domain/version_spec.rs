//! Version specifier types for package.json declarations
//!
//! A declaration value is classified as:
//! - Range: any valid npm range (`^1.2.3`, `~1.2.3`, `>=1.0.0 <2.0.0`, `1.2.3`, `*`)
//! - Exact: a strict semver version the range grammar cannot express (`1.2.3+build`)
//! - Unrecognized: anything else (`latest`, `file:../lib`, `git+https://...`)

use semver::{BuildMetadata, Version};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;

/// The kind of version specifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VersionSpecKind {
    /// Valid npm semver range
    Range,
    /// Exact semantic version
    Exact,
    /// Neither a range nor a version
    Unrecognized,
}

/// A version specifier with its original string representation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VersionSpec {
    /// The kind of version specifier
    pub kind: VersionSpecKind,
    /// The raw value as it appears in the manifest
    pub raw: String,
    /// Lowest version the specifier admits, if any
    pub floor: Option<Version>,
}

impl VersionSpec {
    /// Creates a range specifier with its computed floor
    pub fn range(raw: impl Into<String>, floor: Option<Version>) -> Self {
        Self {
            kind: VersionSpecKind::Range,
            raw: raw.into(),
            floor,
        }
    }

    /// Creates an exact version specifier
    pub fn exact(raw: impl Into<String>, version: Version) -> Self {
        Self {
            kind: VersionSpecKind::Exact,
            raw: raw.into(),
            floor: Some(version),
        }
    }

    /// Creates a specifier that could not be interpreted
    pub fn unrecognized(raw: impl Into<String>) -> Self {
        Self {
            kind: VersionSpecKind::Unrecognized,
            raw: raw.into(),
            floor: None,
        }
    }

    /// Returns true if `candidate` sorts strictly below everything this specifier admits.
    ///
    /// Unrecognized specifiers and unsatisfiable ranges never report a downgrade.
    pub fn is_downgrade_to(&self, candidate: &Version) -> bool {
        match &self.floor {
            Some(floor) => compare_precedence(candidate, floor) == Ordering::Less,
            None => false,
        }
    }
}

impl fmt::Display for VersionSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.raw)
    }
}

/// Compares two versions by semver precedence, ignoring build metadata
pub fn compare_precedence(a: &Version, b: &Version) -> Ordering {
    strip_build(a).cmp(&strip_build(b))
}

fn strip_build(version: &Version) -> Version {
    let mut stripped = version.clone();
    stripped.build = BuildMetadata::EMPTY;
    stripped
}
