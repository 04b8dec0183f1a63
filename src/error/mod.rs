//! Error types and handling for revlock
//!
//! Uses `thiserror` for error definitions and `miette` for pretty diagnostics.
//!
//! Variants are grouped by the area that raises them:
//! - repository detection and version-control commands
//! - dependency fetching and resolution
//! - manifest, lockfile and install orchestration
//! - file system

use miette::Diagnostic;
use thiserror::Error;

use crate::dependency::ResolvedSet;

/// Main error type for revlock operations
#[derive(Error, Diagnostic, Debug)]
pub enum RevlockError {
    // Repository errors
    #[error("Unknown repository type at '{path}'")]
    #[diagnostic(
        code(revlock::repository::unknown_type),
        help("Expected a .git, .hg or .bzr directory in the dependency path or one of its parents")
    )]
    UnknownRepositoryType { path: String },

    // Fetch errors
    #[error("Failed to fetch '{path}': {reason}")]
    #[diagnostic(
        code(revlock::fetch::download_failed),
        help("Check that the origin is reachable and the version-control client is installed")
    )]
    FetchFailed { path: String, reason: String },

    #[error("Failed to check out '{version}' for '{path}': {reason}")]
    #[diagnostic(code(revlock::fetch::checkout_failed))]
    CheckoutFailed {
        path: String,
        version: String,
        reason: String,
    },

    #[error("Failed to read current revision of '{path}': {reason}")]
    #[diagnostic(code(revlock::fetch::revision_query_failed))]
    RevisionQueryFailed { path: String, reason: String },

    #[error("Locked revision '{expected}' of '{path}' checked out as '{actual}'")]
    #[diagnostic(
        code(revlock::fetch::revision_mismatch),
        help("The origin may have rewritten history. Run 'revlock install --update' to re-pin")
    )]
    RevisionMismatch {
        path: String,
        expected: String,
        actual: String,
    },

    #[error("Invalid dependency path '{path}': {reason}")]
    #[diagnostic(code(revlock::dependency::invalid_path))]
    InvalidDependencyPath { path: String, reason: String },

    // Resolution errors
    #[error("Version conflict for '{path}': '{pinned}' is already required, but '{requested}' was requested")]
    #[diagnostic(
        code(revlock::resolve::version_conflict),
        help("Pin a single version of this dependency in your manifest")
    )]
    VersionConflict {
        path: String,
        pinned: String,
        requested: String,
    },

    #[error("Failed to discover dependencies of '{path}': {reason}")]
    #[diagnostic(code(revlock::resolve::discovery_failed))]
    DiscoveryFailed { path: String, reason: String },

    #[error("Failed to start fetch workers: {reason}")]
    #[diagnostic(code(revlock::resolve::worker_pool_failed))]
    WorkerPoolFailed { reason: String },

    // Manifest errors
    #[error("Manifest not found: {path}")]
    #[diagnostic(
        code(revlock::manifest::not_found),
        help("Create a revlock.yaml listing your dependencies")
    )]
    ManifestNotFound { path: String },

    #[error("Failed to parse manifest: {path}: {reason}")]
    #[diagnostic(code(revlock::manifest::parse_failed))]
    ManifestParseFailed { path: String, reason: String },

    // Lockfile errors
    #[error("Failed to parse lockfile: {path}: {reason}")]
    #[diagnostic(code(revlock::lockfile::parse_failed))]
    LockfileParseFailed { path: String, reason: String },

    #[error("Lockfile is out of date")]
    #[diagnostic(
        code(revlock::lockfile::outdated),
        help("Run 'revlock install' without --frozen to update the lockfile")
    )]
    LockfileOutdated,

    // Install errors
    #[error("Another install is running in this workspace")]
    #[diagnostic(
        code(revlock::install::locked),
        help("Wait for the other process to finish or remove the lock file manually")
    )]
    InstallLocked,

    #[error("Failed to acquire install lock: {reason}")]
    #[diagnostic(code(revlock::install::lock_failed))]
    InstallLockFailed { reason: String },

    // File system errors
    #[error("Failed to write file: {path}: {reason}")]
    #[diagnostic(code(revlock::fs::write_failed))]
    FileWriteFailed { path: String, reason: String },

    #[error("IO error: {message}")]
    #[diagnostic(code(revlock::fs::io_error))]
    IoError { message: String },

    // CLI errors
    #[error("Unknown shell: {shell}")]
    #[diagnostic(
        code(revlock::cli::unknown_shell),
        help("Supported shells: bash, elvish, fish, powershell, zsh")
    )]
    UnknownShell { shell: String },
}

impl From<std::io::Error> for RevlockError {
    fn from(err: std::io::Error) -> Self {
        RevlockError::IoError {
            message: err.to_string(),
        }
    }
}

impl From<serde_yaml::Error> for RevlockError {
    fn from(err: serde_yaml::Error) -> Self {
        RevlockError::ManifestParseFailed {
            path: "unknown".to_string(),
            reason: err.to_string(),
        }
    }
}

impl From<serde_json::Error> for RevlockError {
    fn from(err: serde_json::Error) -> Self {
        RevlockError::LockfileParseFailed {
            path: "unknown".to_string(),
            reason: err.to_string(),
        }
    }
}

/// Result type alias using miette for error handling
pub type Result<T> = miette::Result<T, RevlockError>;

/// A failed resolution together with whatever had been resolved before the first error.
///
/// The partial set is kept for diagnostics only; it is never written to the lockfile.
#[derive(Debug)]
pub struct ResolveFailure {
    pub error: RevlockError,
    pub partial: ResolvedSet,
}

impl From<ResolveFailure> for RevlockError {
    fn from(failure: ResolveFailure) -> Self {
        failure.error
    }
}

#[cfg(test)]
mod tests;
