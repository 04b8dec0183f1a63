//! Dependency data model
//!
//! A [`Dependency`] is what a manifest (or a fetched dependency's own manifest) declares:
//! an import-style path plus an optional version constraint. Once fetched it becomes a
//! [`ResolvedDependency`] whose `version` is the exact revision reported by the
//! version-control backend. Resolved dependencies are collected into a [`ResolvedSet`].

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{Result, RevlockError};
use crate::repository::VcsKind;

/// A declared dependency
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dependency {
    /// Import-style identifier, e.g. `github.com/org/project`
    pub path: String,

    /// Tag, branch or revision. Empty means "take the current tip".
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub version: String,

    /// Download URL, defaults to `https://<path>`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub origin: Option<String>,

    /// Backend used to download the origin, defaults to git
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vcs: Option<VcsKind>,
}

impl Dependency {
    /// Create a dependency on `path` at `version` (empty for unspecified)
    pub fn new(path: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            version: version.into(),
            origin: None,
            vcs: None,
        }
    }

    /// Whether a version constraint was given
    pub fn has_version(&self) -> bool {
        !self.version.is_empty()
    }

    /// Origin to download from
    pub fn origin_url(&self) -> String {
        self.origin
            .clone()
            .unwrap_or_else(|| format!("https://{}", self.path))
    }

    /// Backend to download with
    pub fn download_vcs(&self) -> VcsKind {
        self.vcs.unwrap_or(VcsKind::Git)
    }

    /// Conventional install location of this dependency under `root`
    pub fn full_path(&self, root: &Path) -> PathBuf {
        full_path(root, &self.path)
    }

    /// Reject paths that would escape the install root
    pub fn validate(&self) -> Result<()> {
        let invalid = |reason: &str| RevlockError::InvalidDependencyPath {
            path: self.path.clone(),
            reason: reason.to_string(),
        };

        if self.path.trim().is_empty() {
            return Err(invalid("path cannot be empty"));
        }
        if self.path.starts_with('/') || self.path.contains('\\') {
            return Err(invalid("path must be a relative import path using '/'"));
        }
        if self
            .path
            .split('/')
            .any(|segment| segment.is_empty() || segment == "." || segment == "..")
        {
            return Err(invalid("path segments cannot be empty, '.' or '..'"));
        }

        Ok(())
    }
}

/// Join an import path's segments onto `root`
///
/// Pure function of its inputs: the installer and the test suite both rely on it.
pub fn full_path(root: &Path, path: &str) -> PathBuf {
    path.split('/')
        .filter(|segment| !segment.is_empty())
        .fold(root.to_path_buf(), |acc, segment| acc.join(segment))
}

/// A dependency pinned to an exact revision
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedDependency {
    /// Import-style identifier
    pub path: String,

    /// Exact revision reported by the backend, never a symbolic name
    pub version: String,

    /// The version constraint this revision was resolved from
    pub requested: String,

    pub origin: Option<String>,

    pub vcs: Option<VcsKind>,

    /// Dependencies discovered in this dependency's source tree
    pub dependencies: Vec<Dependency>,
}

impl ResolvedDependency {
    /// Pin `dependency` to `revision`
    pub fn pinned(dependency: &Dependency, revision: impl Into<String>) -> Self {
        Self {
            path: dependency.path.clone(),
            version: revision.into(),
            requested: dependency.version.clone(),
            origin: dependency.origin.clone(),
            vcs: dependency.vcs,
            dependencies: Vec::new(),
        }
    }

    /// The declaration this entry was resolved from
    pub fn requirement(&self) -> Dependency {
        Dependency {
            path: self.path.clone(),
            version: self.requested.clone(),
            origin: self.origin.clone(),
            vcs: self.vcs,
        }
    }

    /// The declaration that reproduces this exact revision
    pub fn locked_requirement(&self) -> Dependency {
        Dependency {
            version: self.version.clone(),
            ..self.requirement()
        }
    }
}

/// Resolved dependencies keyed by path, ordered for deterministic output
pub type ResolvedSet = BTreeMap<String, ResolvedDependency>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_full_path_is_derived_from_segments() {
        let dep = Dependency::new("github.com/org/proj", "v1.2");
        assert_eq!(
            dep.full_path(Path::new("/opt/deps/src")),
            PathBuf::from("/opt/deps/src/github.com/org/proj")
        );
    }

    #[test]
    fn test_origin_defaults_to_https() {
        let dep = Dependency::new("github.com/org/proj", "");
        assert_eq!(dep.origin_url(), "https://github.com/org/proj");
        assert_eq!(dep.download_vcs(), VcsKind::Git);
    }

    #[test]
    fn test_validate_rejects_escaping_paths() {
        for path in ["", "/abs/path", "org/../etc", "org//proj", "./org", "org\\proj"] {
            let dep = Dependency::new(path, "");
            assert!(
                matches!(
                    dep.validate(),
                    Err(RevlockError::InvalidDependencyPath { .. })
                ),
                "expected '{path}' to be rejected"
            );
        }
        assert!(Dependency::new("launchpad.net/gocheck", "").validate().is_ok());
    }

    #[test]
    fn test_pinned_keeps_requested_version() {
        let dep = Dependency::new("org/proj", "v1.2");
        let resolved = ResolvedDependency::pinned(&dep, "some-sha");
        assert_eq!(resolved.version, "some-sha");
        assert_eq!(resolved.requested, "v1.2");
        assert_eq!(resolved.requirement(), dep);
        assert_eq!(resolved.locked_requirement().version, "some-sha");
    }

    #[test]
    fn test_manifest_entry_deserializes_with_defaults() {
        let dep: Dependency = serde_yaml::from_str("path: org/proj\n").unwrap();
        assert_eq!(dep, Dependency::new("org/proj", ""));

        let dep: Dependency =
            serde_yaml::from_str("path: org/proj\nversion: v2\nvcs: hg\n").unwrap();
        assert_eq!(dep.version, "v2");
        assert_eq!(dep.vcs, Some(VcsKind::Mercurial));
    }
}
