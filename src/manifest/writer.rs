//! Manifest file reading and writing
//!
//! A missing file is reported as [`ManifestError::NotFound`]; every other I/O
//! failure keeps the original `std::io::Error` as its source.

use crate::error::ManifestError;
use std::fs;
use std::io::ErrorKind;
use std::path::Path;

/// Read a manifest file content
pub fn read_manifest(path: &Path) -> Result<String, ManifestError> {
    fs::read_to_string(path).map_err(|e| {
        if e.kind() == ErrorKind::NotFound {
            ManifestError::not_found(path)
        } else {
            ManifestError::read_error(path, e)
        }
    })
}

/// Replace a manifest file with new content
pub fn write_manifest(path: &Path, content: &str) -> Result<(), ManifestError> {
    fs::write(path, content).map_err(|e| ManifestError::write_error(path, e))
}
