//! Application error types using thiserror
//!
//! Error hierarchy:
//! - ManifestError: Issues reading, parsing or writing package.json
//! - UpgradeError: Rejected upgrade requests (bad version, missing usage, downgrade)
//! - RemoteError: Issues talking to the remote repository host
//! - ConfigError: Issues with CLI configuration

use std::path::PathBuf;
use thiserror::Error;

use crate::domain::DependencyClass;

/// Application-level error type
#[derive(Error, Debug)]
pub enum AppError {
    /// Manifest file related errors
    #[error(transparent)]
    Manifest(#[from] ManifestError),

    /// Upgrade decision errors
    #[error(transparent)]
    Upgrade(#[from] UpgradeError),

    /// Remote repository related errors
    #[error(transparent)]
    Remote(#[from] RemoteError),

    /// Configuration related errors
    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// Errors related to manifest file operations
#[derive(Error, Debug)]
pub enum ManifestError {
    /// Manifest file not found
    #[error("File at '{}' is not found", path.display())]
    NotFound { path: PathBuf },

    /// Failed to read manifest file
    #[error("failed to read manifest file {}: {source}", path.display())]
    ReadError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Failed to write manifest file
    #[error("failed to write manifest file {}: {source}", path.display())]
    WriteError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// JSON parsing error
    #[error("failed to parse JSON in {}: {message}", path.display())]
    JsonParseError { path: PathBuf, message: String },

    /// The document parsed but its root is not a JSON object
    #[error("manifest {} is not a JSON object", path.display())]
    NotAnObject { path: PathBuf },

    /// Failed to serialize the manifest back to text
    #[error("failed to serialize manifest {}: {message}", path.display())]
    SerializeError { path: PathBuf, message: String },
}

/// Errors raised while deciding whether an upgrade is allowed
#[derive(Error, Debug, PartialEq, Eq)]
pub enum UpgradeError {
    /// The requested version is not an exact semantic version
    #[error("Library version '{version}' is not valid version number (x.y.z)")]
    InvalidVersionFormat { version: String },

    /// The library is not declared in any of the requested dependency classes
    #[error("Usage of library '{library}' is not found in package.json")]
    LibraryUsageNotFound { library: String },

    /// The requested version is lower than an existing declaration
    #[error(
        "Current library version '{current}' looks to be greater than supplied version '{new}'"
    )]
    MaybeLibraryDowngrade {
        current: String,
        new: String,
        class: DependencyClass,
    },
}

/// Errors related to the remote repository host
#[derive(Error, Debug)]
pub enum RemoteError {
    /// File not found in the remote repository
    #[error("File at '{path}' is not found")]
    FileNotFound { path: String },

    /// The host answered with a non-success status
    #[error("{host} API error. status: {status}. Response: {body}")]
    Api {
        host: String,
        status: u16,
        body: String,
    },

    /// The request could not be sent or the connection failed
    #[error("failed to reach {host}: {message}")]
    Network { host: String, message: String },

    /// The host answered with a body we could not decode
    #[error("invalid response from {host}: {message}")]
    InvalidResponse { host: String, message: String },
}

/// Errors related to configuration
#[derive(Error, Debug, PartialEq, Eq)]
pub enum ConfigError {
    /// A required input was not supplied
    #[error("Missing required script argument: '{name}'")]
    MissingRequiredInput { name: String },
}

impl ManifestError {
    /// Creates a new NotFound error
    pub fn not_found(path: impl Into<PathBuf>) -> Self {
        ManifestError::NotFound { path: path.into() }
    }

    /// Creates a new ReadError
    pub fn read_error(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        ManifestError::ReadError {
            path: path.into(),
            source,
        }
    }

    /// Creates a new WriteError
    pub fn write_error(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        ManifestError::WriteError {
            path: path.into(),
            source,
        }
    }

    /// Creates a new JsonParseError
    pub fn json_parse_error(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        ManifestError::JsonParseError {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Creates a new NotAnObject error
    pub fn not_an_object(path: impl Into<PathBuf>) -> Self {
        ManifestError::NotAnObject { path: path.into() }
    }
}

impl UpgradeError {
    /// Creates a new InvalidVersionFormat error
    pub fn invalid_version_format(version: impl Into<String>) -> Self {
        UpgradeError::InvalidVersionFormat {
            version: version.into(),
        }
    }

    /// Creates a new LibraryUsageNotFound error
    pub fn library_usage_not_found(library: impl Into<String>) -> Self {
        UpgradeError::LibraryUsageNotFound {
            library: library.into(),
        }
    }

    /// Creates a new MaybeLibraryDowngrade error
    pub fn maybe_library_downgrade(
        current: impl Into<String>,
        new: impl Into<String>,
        class: DependencyClass,
    ) -> Self {
        UpgradeError::MaybeLibraryDowngrade {
            current: current.into(),
            new: new.into(),
            class,
        }
    }
}

impl RemoteError {
    /// Creates a new FileNotFound error
    pub fn file_not_found(path: impl Into<String>) -> Self {
        RemoteError::FileNotFound { path: path.into() }
    }

    /// Creates a new Api error
    pub fn api(host: impl Into<String>, status: u16, body: impl Into<String>) -> Self {
        RemoteError::Api {
            host: host.into(),
            status,
            body: body.into(),
        }
    }

    /// Creates a new Network error
    pub fn network(host: impl Into<String>, message: impl Into<String>) -> Self {
        RemoteError::Network {
            host: host.into(),
            message: message.into(),
        }
    }

    /// Creates a new InvalidResponse error
    pub fn invalid_response(host: impl Into<String>, message: impl Into<String>) -> Self {
        RemoteError::InvalidResponse {
            host: host.into(),
            message: message.into(),
        }
    }
}

impl ConfigError {
    /// Creates a new MissingRequiredInput error
    pub fn missing_required_input(name: impl Into<String>) -> Self {
        ConfigError::MissingRequiredInput { name: name.into() }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_manifest_error_not_found() {
        let err = ManifestError::not_found("test/fixture/non-existent-file.json");
        let msg = format!("{}", err);
        assert_eq!(
            msg,
            "File at 'test/fixture/non-existent-file.json' is not found"
        );
    }

    #[test]
    fn test_manifest_error_json_parse() {
        let err = ManifestError::json_parse_error("/path/to/package.json", "expected value");
        let msg = format!("{}", err);
        assert!(msg.contains("failed to parse JSON"));
        assert!(msg.contains("expected value"));
    }

    #[test]
    fn test_manifest_error_read_keeps_source() {
        use std::error::Error;

        let io = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        let err = ManifestError::read_error("/path/to/package.json", io);
        assert!(err.source().is_some());
        assert!(err.to_string().contains("denied"));
    }

    #[test]
    fn test_upgrade_error_invalid_version() {
        let err = UpgradeError::invalid_version_format("1.0");
        assert_eq!(
            err.to_string(),
            "Library version '1.0' is not valid version number (x.y.z)"
        );
    }

    #[test]
    fn test_upgrade_error_usage_not_found() {
        let err = UpgradeError::library_usage_not_found("axios");
        let msg = err.to_string();
        assert!(msg.contains("'axios'"));
        assert!(msg.contains("not found in package.json"));
    }

    #[test]
    fn test_upgrade_error_downgrade() {
        let err = UpgradeError::maybe_library_downgrade(
            "^2.11.0",
            "2.10.0",
            DependencyClass::Dependencies,
        );
        assert_eq!(
            err.to_string(),
            "Current library version '^2.11.0' looks to be greater than supplied version '2.10.0'"
        );
    }

    #[test]
    fn test_remote_error_api() {
        let err = RemoteError::api("Bitbucket", 403, "forbidden");
        let msg = err.to_string();
        assert!(msg.contains("status: 403"));
        assert!(msg.contains("forbidden"));
    }

    #[test]
    fn test_config_error_missing_input() {
        let err = ConfigError::missing_required_input("--workspace");
        assert_eq!(
            err.to_string(),
            "Missing required script argument: '--workspace'"
        );
    }

    #[test]
    fn test_app_error_is_transparent() {
        let app_err: AppError = UpgradeError::library_usage_not_found("axios").into();
        assert!(app_err.to_string().starts_with("Usage of library 'axios'"));

        let app_err: AppError = ManifestError::not_found("package.json").into();
        assert!(app_err.to_string().contains("is not found"));
    }

    #[test]
    fn test_app_error_matches_kind() {
        let app_err: AppError = ConfigError::missing_required_input("--reposlug").into();
        assert!(matches!(
            app_err,
            AppError::Config(ConfigError::MissingRequiredInput { .. })
        ));
    }
}
