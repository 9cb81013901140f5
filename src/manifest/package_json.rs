//! package.json document model
//!
//! The manifest is kept as an ordered JSON tree so that a rewrite keeps every
//! key in place. Dependency sections are reached through [`DependencyClass`]:
//! - dependencies
//! - devDependencies
//! - peerDependencies

use crate::domain::DependencyClass;
use crate::error::ManifestError;
use crate::manifest::{read_manifest, write_manifest};
use serde_json::{Map, Value};
use std::path::{Path, PathBuf};

/// An owned, mutable package.json document
#[derive(Debug, Clone, PartialEq)]
pub struct PackageJson {
    /// Where the document was read from (used in error messages)
    path: PathBuf,
    /// Top-level object, in source key order
    root: Map<String, Value>,
    /// Whether the source text ended with a newline
    trailing_newline: bool,
}

impl PackageJson {
    /// Parse a document from text
    pub fn parse(content: &str, path: impl Into<PathBuf>) -> Result<Self, ManifestError> {
        let path = path.into();
        let json: Value = serde_json::from_str(content)
            .map_err(|e| ManifestError::json_parse_error(&path, e.to_string()))?;

        let Value::Object(root) = json else {
            return Err(ManifestError::not_an_object(&path));
        };

        Ok(Self {
            path,
            root,
            trailing_newline: content.ends_with('\n'),
        })
    }

    /// Read and parse a document from disk
    pub fn read(path: &Path) -> Result<Self, ManifestError> {
        let content = read_manifest(path)?;
        Self::parse(&content, path)
    }

    /// Returns the dependency map for a class, if present and an object
    pub fn dependencies(&self, class: DependencyClass) -> Option<&Map<String, Value>> {
        self.root.get(class.key()).and_then(Value::as_object)
    }

    /// Mutable access to the dependency map for a class
    pub fn dependencies_mut(&mut self, class: DependencyClass) -> Option<&mut Map<String, Value>> {
        self.root.get_mut(class.key()).and_then(Value::as_object_mut)
    }

    /// Returns the raw declaration value of `name` in `class`
    pub fn declaration(&self, class: DependencyClass, name: &str) -> Option<&Value> {
        self.dependencies(class).and_then(|deps| deps.get(name))
    }

    /// Classes among `classes` that declare `name`, in the given order
    pub fn declaring_classes(
        &self,
        name: &str,
        classes: &[DependencyClass],
    ) -> Vec<DependencyClass> {
        classes
            .iter()
            .copied()
            .filter(|class| self.declaration(*class, name).is_some())
            .collect()
    }

    /// Overwrite an existing declaration; returns false if there was none
    pub fn set_declaration(&mut self, class: DependencyClass, name: &str, value: &str) -> bool {
        match self
            .dependencies_mut(class)
            .and_then(|deps| deps.get_mut(name))
        {
            Some(slot) => {
                *slot = Value::String(value.to_string());
                true
            }
            None => false,
        }
    }

    /// Serialize with 2-space indentation, keeping a trailing newline if the source had one
    pub fn to_json_string(&self) -> Result<String, ManifestError> {
        let mut out =
            serde_json::to_string_pretty(&self.root).map_err(|e| ManifestError::SerializeError {
                path: self.path.clone(),
                message: e.to_string(),
            })?;
        if self.trailing_newline {
            out.push('\n');
        }
        Ok(out)
    }

    /// Replace the file at `path` with this document
    pub fn write(&self, path: &Path) -> Result<(), ManifestError> {
        let content = self.to_json_string()?;
        write_manifest(path, &content)
    }
}
