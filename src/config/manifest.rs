//! Manifest (revlock.yaml)
//!
//! Lists the direct dependencies of a project:
//!
//! ```yaml
//! dependencies:
//!   - path: github.com/xoebus/gocart
//!     version: v1.2
//!   - path: launchpad.net/gocheck
//!     origin: lp:gocheck
//!     vcs: bzr
//! ```
//!
//! Fetched dependencies may carry their own manifest; it is read the same way during
//! discovery.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::dependency::Dependency;
use crate::error::{Result, RevlockError};

/// Manifest file name
pub const MANIFEST_FILE: &str = "revlock.yaml";

/// Declared direct dependencies, in manifest order
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Manifest {
    #[serde(default)]
    pub dependencies: Vec<Dependency>,
}

impl Manifest {
    pub fn new(dependencies: Vec<Dependency>) -> Self {
        Self { dependencies }
    }

    /// Parse manifest from YAML string
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        // An empty file is an empty manifest
        if yaml.trim().is_empty() {
            return Ok(Self::default());
        }
        let manifest: Self = serde_yaml::from_str(yaml)?;
        manifest.validate()?;
        Ok(manifest)
    }

    /// Serialize manifest to YAML string
    pub fn to_yaml(&self) -> Result<String> {
        Ok(serde_yaml::to_string(self)?)
    }

    /// Load a manifest that must exist
    pub fn load(path: &Path) -> Result<Self> {
        Self::load_optional(path)?.ok_or_else(|| RevlockError::ManifestNotFound {
            path: path.display().to_string(),
        })
    }

    /// Load a manifest if the file exists
    pub fn load_optional(path: &Path) -> Result<Option<Self>> {
        if !path.is_file() {
            return Ok(None);
        }

        let content = std::fs::read_to_string(path).map_err(|e| RevlockError::ManifestParseFailed {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;

        Self::from_yaml(&content)
            .map(Some)
            .map_err(|e| match e {
                RevlockError::ManifestParseFailed { reason, .. } => {
                    RevlockError::ManifestParseFailed {
                        path: path.display().to_string(),
                        reason,
                    }
                }
                other => other,
            })
    }

    /// Validate every declared dependency
    pub fn validate(&self) -> Result<()> {
        for dep in &self.dependencies {
            dep.validate()?;
        }
        Ok(())
    }
}
