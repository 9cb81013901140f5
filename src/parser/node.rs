//! Node.js (npm/yarn/pnpm) version specifier parser
//!
//! Handles declaration values:
//! - Exact: `1.2.3`
//! - Caret / tilde: `^1.2.3`, `~1.2.3`
//! - Comparison: `>=1.2.3`, `>1.2.3`, `<=1.2.3`, `<1.2.3`
//! - Wildcard: `*`, `1.x`, `1.2.*`
//! - Range: `>=1.0.0 <2.0.0`, `1.0.0 - 2.0.0`, `^1.0.0 || ^2.0.0`
//!
//! Anything else (dist-tags, paths, git URLs, workspace protocol) is kept as
//! an unrecognized specifier.

use crate::domain::VersionSpec;
use crate::parser::NpmRange;
use semver::Version;

/// Node.js version specifier parser
pub struct NodeVersionParser;

impl NodeVersionParser {
    /// Classify a declaration value and compute its floor
    pub fn parse(&self, raw: &str) -> VersionSpec {
        if let Ok(range) = NpmRange::parse(raw) {
            return VersionSpec::range(raw, range.floor());
        }

        if let Ok(version) = Version::parse(raw.trim()) {
            return VersionSpec::exact(raw, version);
        }

        VersionSpec::unrecognized(raw)
    }

    /// Parse a strict exact version (`MAJOR.MINOR.PATCH[-pre][+build]`)
    pub fn parse_exact(&self, raw: &str) -> Option<Version> {
        Version::parse(raw).ok()
    }
}
