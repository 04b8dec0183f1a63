//! Error type tests
//!
//! Tests for RevlockError and its conversions.

#![allow(clippy::expect_used)]

use crate::dependency::ResolvedSet;
use crate::error::{ResolveFailure, RevlockError};
use miette::Diagnostic;

macro_rules! test_error_contains {
    ($test_name:ident, $err:expr, $($contains:expr),+ $(,)?) => {
        #[test]
        fn $test_name() {
            let err = $err;
            let error_string = err.to_string();
            $(
                assert!(error_string.contains($contains),
                    "Error message should contain '{}', got: {}",
                    $contains,
                    error_string
                );
            )+
        }
    };
}

#[test]
fn test_error_display() {
    let err = RevlockError::UnknownRepositoryType {
        path: "/src/org/proj".to_string(),
    };
    assert_eq!(err.to_string(), "Unknown repository type at '/src/org/proj'");
}

#[test]
fn test_error_code() {
    let err = RevlockError::VersionConflict {
        path: "org/shared".to_string(),
        pinned: "v1".to_string(),
        requested: "v2".to_string(),
    };
    assert_eq!(
        err.code().map(|c| c.to_string()),
        Some("revlock::resolve::version_conflict".to_string())
    );
}

test_error_contains!(
    test_version_conflict_message,
    RevlockError::VersionConflict {
        path: "org/shared".to_string(),
        pinned: "v1".to_string(),
        requested: "v2".to_string(),
    },
    "org/shared",
    "'v1'",
    "'v2'"
);

test_error_contains!(
    test_checkout_failed_keeps_backend_output,
    RevlockError::CheckoutFailed {
        path: "org/proj".to_string(),
        version: "v9".to_string(),
        reason: "error: pathspec 'v9' did not match".to_string(),
    },
    "v9",
    "pathspec 'v9' did not match"
);

test_error_contains!(
    test_lockfile_outdated_error,
    RevlockError::LockfileOutdated,
    "Lockfile is out of date"
);

#[test]
fn test_io_error_conversion() {
    let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
    let err: RevlockError = io_err.into();
    assert!(matches!(err, RevlockError::IoError { .. }));
}

#[test]
fn test_yaml_error_conversion() {
    let parse_result: std::result::Result<serde_yaml::Value, _> =
        serde_yaml::from_str("invalid: yaml: content: [unclosed");
    let err: RevlockError = parse_result.expect_err("yaml should not parse").into();
    assert!(matches!(err, RevlockError::ManifestParseFailed { .. }));
}

#[test]
fn test_json_error_conversion() {
    let parse_result: std::result::Result<serde_json::Value, _> =
        serde_json::from_str("invalid json content");
    let err: RevlockError = parse_result.expect_err("json should not parse").into();
    assert!(matches!(err, RevlockError::LockfileParseFailed { .. }));
}

#[test]
fn test_resolve_failure_converts_to_its_error() {
    let failure = ResolveFailure {
        error: RevlockError::DiscoveryFailed {
            path: "org/proj".to_string(),
            reason: "bad manifest".to_string(),
        },
        partial: ResolvedSet::new(),
    };
    let err: RevlockError = failure.into();
    assert!(matches!(err, RevlockError::DiscoveryFailed { .. }));
}
