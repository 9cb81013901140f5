//! Integration tests for depbump
//!
//! These tests verify:
//! - Upgrade scenarios against package.json files on disk
//! - All-or-nothing behavior when any declaration rejects the upgrade
//! - Formatting and key order preservation

use depbump::domain::{DependencyClass, UpgradeRequest};
use depbump::error::{AppError, ManifestError, UpgradeError};
use depbump::update::LibraryUpgrader;
use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Test fixture directory creation helper
fn create_test_dir() -> TempDir {
    tempfile::tempdir().expect("Failed to create temp directory")
}

fn write_manifest(dir: &TempDir, content: &str) -> PathBuf {
    let path = dir.path().join("package.json");
    fs::write(&path, content).unwrap();
    path
}

fn read_json(path: &Path) -> Value {
    serde_json::from_str(&fs::read_to_string(path).unwrap()).unwrap()
}

mod scenarios {
    use super::*;

    #[test]
    fn test_upgrade_dev_dependency_range() {
        let dir = create_test_dir();
        let path = write_manifest(&dir, r#"{ "devDependencies": { "shelljs": "^1.0.0" } }"#);

        LibraryUpgrader::new()
            .upgrade_library(&UpgradeRequest::new(&path, "shelljs", "1.0.0"))
            .unwrap();

        assert_eq!(read_json(&path)["devDependencies"]["shelljs"], "1.0.0");
    }

    #[test]
    fn test_upgrade_all_three_classes() {
        let dir = create_test_dir();
        let path = write_manifest(
            &dir,
            r#"{
                "dependencies": { "shelljs": "^0.8.0" },
                "devDependencies": { "shelljs": "~0.9.1" },
                "peerDependencies": { "shelljs": ">=0.7.0" }
            }"#,
        );

        let request = UpgradeRequest::new(&path, "shelljs", "1.0.0")
            .with_classes(DependencyClass::all().iter().copied());
        let report = LibraryUpgrader::new().upgrade_library(&request).unwrap();

        assert_eq!(report.changes.len(), 3);
        let json = read_json(&path);
        for class in DependencyClass::all() {
            assert_eq!(json[class.key()]["shelljs"], "1.0.0");
        }
    }

    #[test]
    fn test_missing_manifest() {
        let dir = create_test_dir();
        let path = dir.path().join("package.json");

        let err = LibraryUpgrader::new()
            .upgrade_library(&UpgradeRequest::new(&path, "shelljs", "1.0.0"))
            .unwrap_err();

        assert!(matches!(
            err,
            AppError::Manifest(ManifestError::NotFound { .. })
        ));
        assert!(err.to_string().contains("is not found"));
    }

    #[test]
    fn test_downgrade_rejected() {
        let dir = create_test_dir();
        let path = write_manifest(&dir, r#"{ "dependencies": { "bitbucket": "^2.11.0" } }"#);

        let err = LibraryUpgrader::new()
            .upgrade_library(&UpgradeRequest::new(&path, "bitbucket", "2.10.0"))
            .unwrap_err();

        let message = err.to_string();
        assert!(message.contains("^2.11.0"));
        assert!(message.contains("2.10.0"));
        assert_eq!(read_json(&path)["dependencies"]["bitbucket"], "^2.11.0");
    }

    #[test]
    fn test_usage_not_found() {
        let dir = create_test_dir();
        let path = write_manifest(
            &dir,
            r#"{
                "dependencies": { "lodash": "^4.17.21" },
                "peerDependencies": { "axios": "^1.0.0" }
            }"#,
        );

        let err = LibraryUpgrader::new()
            .upgrade_library(&UpgradeRequest::new(&path, "axios", "1.2.0"))
            .unwrap_err();

        let message = err.to_string();
        assert!(message.contains("axios"));
        assert!(message.contains("not found in package.json"));
    }

    #[test]
    fn test_invalid_version_format() {
        let dir = create_test_dir();
        let path = write_manifest(&dir, r#"{ "dependencies": { "shelljs": "^0.8.0" } }"#);

        for bad in ["1.0", "v1.0.0", "latest", ""] {
            let err = LibraryUpgrader::new()
                .upgrade_library(&UpgradeRequest::new(&path, "shelljs", bad))
                .unwrap_err();
            assert!(
                matches!(
                    err,
                    AppError::Upgrade(UpgradeError::InvalidVersionFormat { .. })
                ),
                "expected invalid version for {:?}",
                bad
            );
        }
    }

    #[test]
    fn test_malformed_json() {
        let dir = create_test_dir();
        let path = write_manifest(&dir, r#"{ "dependencies": { "shelljs": "#);

        let err = LibraryUpgrader::new()
            .upgrade_library(&UpgradeRequest::new(&path, "shelljs", "1.0.0"))
            .unwrap_err();
        assert!(matches!(
            err,
            AppError::Manifest(ManifestError::JsonParseError { .. })
        ));
    }

    #[test]
    fn test_non_object_root() {
        let dir = create_test_dir();
        let path = write_manifest(&dir, r#"["shelljs"]"#);

        let err = LibraryUpgrader::new()
            .upgrade_library(&UpgradeRequest::new(&path, "shelljs", "1.0.0"))
            .unwrap_err();
        assert!(matches!(
            err,
            AppError::Manifest(ManifestError::NotAnObject { .. })
        ));
    }
}

mod atomicity {
    use super::*;

    #[test]
    fn test_downgrade_in_last_class_leaves_file_identical() {
        let dir = create_test_dir();
        let content = r#"{
  "dependencies": { "shelljs": "^0.8.0" },
  "devDependencies": { "shelljs": "^0.8.0" },
  "peerDependencies": { "shelljs": "3.0.0" }
}"#;
        let path = write_manifest(&dir, content);

        let request = UpgradeRequest::new(&path, "shelljs", "1.0.0")
            .with_classes(DependencyClass::all().iter().copied());
        let err = LibraryUpgrader::new().upgrade_library(&request).unwrap_err();

        assert!(matches!(
            err,
            AppError::Upgrade(UpgradeError::MaybeLibraryDowngrade {
                class: DependencyClass::PeerDependencies,
                ..
            })
        ));
        assert_eq!(fs::read_to_string(&path).unwrap(), content);
    }

    #[test]
    fn test_unparseable_specifier_is_not_a_downgrade() {
        let dir = create_test_dir();
        let path = write_manifest(
            &dir,
            r#"{ "dependencies": { "shelljs": "github:shelljs/shelljs" } }"#,
        );

        LibraryUpgrader::new()
            .upgrade_library(&UpgradeRequest::new(&path, "shelljs", "0.0.1"))
            .unwrap();
        assert_eq!(read_json(&path)["dependencies"]["shelljs"], "0.0.1");
    }
}

mod format_preservation {
    use super::*;

    #[test]
    fn test_second_identical_upgrade_is_idempotent() {
        let dir = create_test_dir();
        let path = write_manifest(&dir, r#"{ "dependencies": { "shelljs": "^0.8.0" } }"#);
        let request = UpgradeRequest::new(&path, "shelljs", "1.0.0");

        LibraryUpgrader::new().upgrade_library(&request).unwrap();
        let first = fs::read_to_string(&path).unwrap();

        let report = LibraryUpgrader::new().upgrade_library(&request).unwrap();
        let second = fs::read_to_string(&path).unwrap();

        assert_eq!(first, second);
        assert!(!report.has_effective_changes());
    }

    #[test]
    fn test_key_order_and_unrelated_content_preserved() {
        let dir = create_test_dir();
        let content = r#"{
  "name": "web-app",
  "version": "3.1.0",
  "scripts": {
    "test": "jest",
    "build": "tsc"
  },
  "dependencies": {
    "zod": "^3.0.0",
    "shelljs": "^0.8.0",
    "axios": "1.6.0"
  },
  "private": true
}
"#;
        let path = write_manifest(&dir, content);

        LibraryUpgrader::new()
            .upgrade_library(&UpgradeRequest::new(&path, "shelljs", "1.0.0"))
            .unwrap();

        let expected = content.replace(r#""shelljs": "^0.8.0""#, r#""shelljs": "1.0.0""#);
        assert_eq!(fs::read_to_string(&path).unwrap(), expected);
    }

    #[test]
    fn test_output_uses_two_space_indentation() {
        let dir = create_test_dir();
        let path = write_manifest(
            &dir,
            r#"{"name":"compact","dependencies":{"shelljs":"0.8.5"}}"#,
        );

        LibraryUpgrader::new()
            .upgrade_library(&UpgradeRequest::new(&path, "shelljs", "1.0.0"))
            .unwrap();

        assert_eq!(
            fs::read_to_string(&path).unwrap(),
            "{\n  \"name\": \"compact\",\n  \"dependencies\": {\n    \"shelljs\": \"1.0.0\"\n  }\n}"
        );
    }
}
