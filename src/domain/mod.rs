//! Core domain models for depbump
//!
//! This module contains the fundamental types used throughout the application:
//! - Dependency classes (the package.json sections a library can live in)
//! - Version specifier types with their computed floor
//! - Upgrade requests and reports

mod dependency_class;
mod upgrade;
mod version_spec;

pub use dependency_class::DependencyClass;
pub use upgrade::{DeclarationChange, UpgradeReport, UpgradeRequest};
pub use version_spec::{compare_precedence, VersionSpec, VersionSpecKind};
