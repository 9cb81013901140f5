//! Upgrade request and result types

use super::DependencyClass;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

/// A request to bump one library inside one manifest
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpgradeRequest {
    /// Location of the manifest on disk
    pub manifest_path: PathBuf,
    /// Name of the library as declared in the manifest
    pub library: String,
    /// Requested version, must be an exact semantic version
    pub new_version: String,
    /// Dependency classes to search, in order, without duplicates
    pub classes: Vec<DependencyClass>,
}

impl UpgradeRequest {
    /// Creates a request searching the default dependency classes
    pub fn new(
        manifest_path: impl Into<PathBuf>,
        library: impl Into<String>,
        new_version: impl Into<String>,
    ) -> Self {
        Self {
            manifest_path: manifest_path.into(),
            library: library.into(),
            new_version: new_version.into(),
            classes: DependencyClass::defaults().to_vec(),
        }
    }

    /// Restricts the request to the given classes (builder pattern)
    ///
    /// An empty list falls back to the defaults; duplicates keep their first position.
    pub fn with_classes(mut self, classes: impl IntoIterator<Item = DependencyClass>) -> Self {
        let mut unique = Vec::new();
        for class in classes {
            if !unique.contains(&class) {
                unique.push(class);
            }
        }
        if unique.is_empty() {
            unique = DependencyClass::defaults().to_vec();
        }
        self.classes = unique;
        self
    }
}

/// One declaration rewritten by an upgrade
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeclarationChange {
    /// Section the declaration lives in
    pub class: DependencyClass,
    /// Value before the upgrade
    pub previous: String,
}

/// Outcome of a successful upgrade
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpgradeReport {
    /// Library that was upgraded
    pub library: String,
    /// Version written to every declaration
    pub new_version: String,
    /// Declarations that were rewritten, in request order
    pub changes: Vec<DeclarationChange>,
}

impl UpgradeReport {
    /// Creates an empty report
    pub fn new(library: impl Into<String>, new_version: impl Into<String>) -> Self {
        Self {
            library: library.into(),
            new_version: new_version.into(),
            changes: Vec::new(),
        }
    }

    /// Records a rewritten declaration
    pub fn add_change(&mut self, class: DependencyClass, previous: impl Into<String>) {
        self.changes.push(DeclarationChange {
            class,
            previous: previous.into(),
        });
    }

    /// Returns true if at least one declaration actually changed value
    pub fn has_effective_changes(&self) -> bool {
        self.changes.iter().any(|c| c.previous != self.new_version)
    }
}

impl fmt::Display for UpgradeReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} => {}", self.library, self.new_version)
    }
}
