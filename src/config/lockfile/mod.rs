//! Lockfile (revlock.lock) main module
//!
//! The lockfile records every dependency of the last successful install pinned to an exact
//! revision, together with the edges discovered at that revision and a BLAKE3 digest of the
//! manifest it was produced from. Entries are kept sorted by path so the file is byte-for-byte
//! identical across runs that resolve the same set.

pub mod entry;

use std::io::Write;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::dependency::ResolvedSet;
use crate::error::{Result, RevlockError};

pub use entry::LockedDependency;

/// Lockfile name
pub const LOCKFILE_NAME: &str = "revlock.lock";

/// Lockfile structure (revlock.lock)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Lockfile {
    /// Digest of the manifest this lockfile was resolved from
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub manifest: Option<String>,

    /// Pinned dependencies, sorted by path
    #[serde(default)]
    pub dependencies: Vec<LockedDependency>,
}

impl Lockfile {
    /// Create a new lockfile
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a lockfile from a resolved set
    pub fn from_resolved(manifest: Option<String>, resolved: &ResolvedSet) -> Self {
        // BTreeMap iteration is already ordered by path
        Self {
            manifest,
            dependencies: resolved.values().map(LockedDependency::from).collect(),
        }
    }

    /// Pinned entries keyed by path
    pub fn to_resolved_set(&self) -> ResolvedSet {
        self.dependencies
            .iter()
            .cloned()
            .map(|locked| (locked.path.clone(), locked.into()))
            .collect()
    }

    /// Parse lockfile from JSON string
    pub fn from_json(json: &str) -> Result<Self> {
        let mut lockfile: Self =
            serde_json::from_str(json).map_err(|e| RevlockError::LockfileParseFailed {
                path: LOCKFILE_NAME.to_string(),
                reason: e.to_string(),
            })?;
        lockfile.validate()?;
        lockfile.dependencies.sort_by(|a, b| a.path.cmp(&b.path));
        Ok(lockfile)
    }

    /// Serialize lockfile to JSON string (pretty-printed, trailing newline)
    pub fn to_json(&self) -> Result<String> {
        let mut json =
            serde_json::to_string_pretty(self).map_err(|e| RevlockError::LockfileParseFailed {
                path: LOCKFILE_NAME.to_string(),
                reason: e.to_string(),
            })?;
        json.push('\n');
        Ok(json)
    }

    /// Load the lockfile at `path` if it exists
    pub fn load_optional(path: &Path) -> Result<Option<Self>> {
        if !path.is_file() {
            return Ok(None);
        }
        let content = std::fs::read_to_string(path)?;
        Self::from_json(&content).map(Some).map_err(|e| match e {
            RevlockError::LockfileParseFailed { reason, .. } => RevlockError::LockfileParseFailed {
                path: path.display().to_string(),
                reason,
            },
            other => other,
        })
    }

    /// Write the lockfile atomically
    ///
    /// The new content goes to a temporary file next to `path` which then replaces it, so a
    /// crash never leaves a truncated lockfile behind.
    pub fn save(&self, path: &Path) -> Result<()> {
        let write_failed = |reason: String| RevlockError::FileWriteFailed {
            path: path.display().to_string(),
            reason,
        };

        let json = self.to_json()?;
        let dir = path
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or_else(|| Path::new("."));

        let mut temp = tempfile::NamedTempFile::new_in(dir).map_err(|e| write_failed(e.to_string()))?;
        temp.write_all(json.as_bytes())
            .map_err(|e| write_failed(e.to_string()))?;
        temp.persist(path).map_err(|e| write_failed(e.error.to_string()))?;
        Ok(())
    }

    /// Find a pinned dependency by path
    pub fn find(&self, path: &str) -> Option<&LockedDependency> {
        self.dependencies.iter().find(|d| d.path == path)
    }

    /// Validate lockfile contents
    pub fn validate(&self) -> Result<()> {
        let mut seen = std::collections::HashSet::new();
        for dep in &self.dependencies {
            dep.validate()?;
            if !seen.insert(dep.path.as_str()) {
                return Err(RevlockError::LockfileParseFailed {
                    path: LOCKFILE_NAME.to_string(),
                    reason: format!("Dependency '{}' is listed twice", dep.path),
                });
            }
        }
        Ok(())
    }
}
