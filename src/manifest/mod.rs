//! package.json loading, lookup and persistence
//!
//! This module provides:
//! - An ordered, mutable package.json document
//! - Per-class access to dependency maps
//! - File read/write helpers with typed errors

mod package_json;
mod writer;

pub use package_json::PackageJson;
pub use writer::{read_manifest, write_manifest};

/// File name of the manifest at the repository root
pub const MANIFEST_FILENAME: &str = "package.json";
