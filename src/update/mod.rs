//! Library version upgrade logic
//!
//! This module provides:
//! - Validation of the requested version
//! - Lookup of every declaration of a library across dependency classes
//! - Downgrade protection for ranges and exact versions
//! - All-or-nothing rewrite of the manifest
//!
//! Every declaration is checked before any of them is touched, and the file
//! is written once, after all checks passed.

use crate::domain::{DependencyClass, UpgradeReport, UpgradeRequest};
use crate::error::{AppError, UpgradeError};
use crate::manifest::PackageJson;
use crate::parser::NodeVersionParser;
use semver::Version;
use serde_json::Value;

/// Upgrades a library version inside a package.json file
#[derive(Debug, Default, Clone, Copy)]
pub struct LibraryUpgrader;

impl LibraryUpgrader {
    /// Create a new upgrader
    pub fn new() -> Self {
        Self
    }

    /// Upgrade the library named in `request` inside the manifest it points at
    pub fn upgrade_library(&self, request: &UpgradeRequest) -> Result<UpgradeReport, AppError> {
        let new_version = self.validate_version(&request.new_version)?;

        let mut manifest = PackageJson::read(&request.manifest_path)?;
        let report = self.apply(
            &mut manifest,
            &request.library,
            &request.new_version,
            &new_version,
            &request.classes,
        )?;

        manifest.write(&request.manifest_path)?;
        Ok(report)
    }

    /// Upgrade the library in an in-memory document
    pub fn upgrade_document(
        &self,
        manifest: &mut PackageJson,
        library: &str,
        new_version: &str,
        classes: &[DependencyClass],
    ) -> Result<UpgradeReport, UpgradeError> {
        let parsed = self.validate_version(new_version)?;
        self.apply(manifest, library, new_version, &parsed, classes)
    }

    fn validate_version(&self, new_version: &str) -> Result<Version, UpgradeError> {
        NodeVersionParser
            .parse_exact(new_version)
            .ok_or_else(|| UpgradeError::invalid_version_format(new_version))
    }

    fn apply(
        &self,
        manifest: &mut PackageJson,
        library: &str,
        raw_version: &str,
        new_version: &Version,
        classes: &[DependencyClass],
    ) -> Result<UpgradeReport, UpgradeError> {
        let declaring = manifest.declaring_classes(library, classes);
        if declaring.is_empty() {
            return Err(UpgradeError::library_usage_not_found(library));
        }

        // Check every location first so a rejection leaves the document untouched
        let mut report = UpgradeReport::new(library, raw_version);
        for class in &declaring {
            let current = manifest.declaration(*class, library);
            if let Some(Value::String(current)) = current {
                if is_version_downgrade(current, new_version) {
                    return Err(UpgradeError::maybe_library_downgrade(
                        current.as_str(),
                        raw_version,
                        *class,
                    ));
                }
            }
            report.add_change(*class, describe(current));
        }

        for class in &declaring {
            manifest.set_declaration(*class, library, raw_version);
        }

        Ok(report)
    }
}

/// Returns true if `new_version` sorts below what `current` admits.
///
/// Ranges compare against their lowest satisfying version, exact versions
/// against themselves. Specifiers that are neither never count as a downgrade.
pub fn is_version_downgrade(current: &str, new_version: &Version) -> bool {
    NodeVersionParser.parse(current).is_downgrade_to(new_version)
}

fn describe(value: Option<&Value>) -> String {
    match value {
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
        None => String::new(),
    }
}
