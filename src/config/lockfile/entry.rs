//! `LockedDependency` struct for lockfile
//!
//! One pinned dependency in the lockfile.

use serde::{Deserialize, Serialize};

use crate::dependency::{Dependency, ResolvedDependency};
use crate::error::{Result, RevlockError};
use crate::repository::VcsKind;

/// A pinned dependency in the lockfile
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LockedDependency {
    /// Import-style identifier
    pub path: String,

    /// Version constraint the revision was resolved from (empty for tip)
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub version: String,

    /// Exact revision
    pub revision: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub origin: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vcs: Option<VcsKind>,

    /// Dependencies declared by this dependency at this revision
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub dependencies: Vec<Dependency>,
}

impl LockedDependency {
    /// Validate a single entry
    pub fn validate(&self) -> Result<()> {
        if self.revision.trim().is_empty() {
            return Err(RevlockError::LockfileParseFailed {
                path: crate::config::lockfile::LOCKFILE_NAME.to_string(),
                reason: format!("Dependency '{}' has empty revision", self.path),
            });
        }
        Dependency::new(self.path.clone(), "").validate()
    }
}

impl From<&ResolvedDependency> for LockedDependency {
    fn from(resolved: &ResolvedDependency) -> Self {
        Self {
            path: resolved.path.clone(),
            version: resolved.requested.clone(),
            revision: resolved.version.clone(),
            origin: resolved.origin.clone(),
            vcs: resolved.vcs,
            dependencies: resolved.dependencies.clone(),
        }
    }
}

impl From<LockedDependency> for ResolvedDependency {
    fn from(locked: LockedDependency) -> Self {
        Self {
            path: locked.path,
            version: locked.revision,
            requested: locked.version,
            origin: locked.origin,
            vcs: locked.vcs,
            dependencies: locked.dependencies,
        }
    }
}
