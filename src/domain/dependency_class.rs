//! Dependency class definitions for package.json sections

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The package.json sections a dependency can be declared under
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum DependencyClass {
    /// Runtime dependencies (`dependencies`)
    Dependencies,
    /// Development-only dependencies (`devDependencies`)
    DevDependencies,
    /// Peer dependencies (`peerDependencies`)
    PeerDependencies,
}

impl DependencyClass {
    /// Returns the package.json key for this class
    pub fn key(&self) -> &'static str {
        match self {
            DependencyClass::Dependencies => "dependencies",
            DependencyClass::DevDependencies => "devDependencies",
            DependencyClass::PeerDependencies => "peerDependencies",
        }
    }

    /// Returns all dependency classes in manifest order
    pub fn all() -> &'static [DependencyClass] {
        &[
            DependencyClass::Dependencies,
            DependencyClass::DevDependencies,
            DependencyClass::PeerDependencies,
        ]
    }

    /// Classes searched when the caller does not name any
    pub fn defaults() -> &'static [DependencyClass] {
        &[
            DependencyClass::Dependencies,
            DependencyClass::DevDependencies,
        ]
    }
}

impl fmt::Display for DependencyClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.key())
    }
}

impl FromStr for DependencyClass {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "dependencies" | "deps" | "prod" => Ok(DependencyClass::Dependencies),
            "devDependencies" | "dev-dependencies" | "dev" => Ok(DependencyClass::DevDependencies),
            "peerDependencies" | "peer-dependencies" | "peer" => {
                Ok(DependencyClass::PeerDependencies)
            }
            other => Err(format!(
                "unknown dependency class '{}': expected 'dependencies', 'devDependencies' or 'peerDependencies'",
                other
            )),
        }
    }
}
