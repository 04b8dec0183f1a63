//! Install root layout
//!
//! Dependencies live under `<root>/src/<path-segments>`, where `<root>` is the first entry
//! of a search-path list (`REVLOCK_PATH`, separated like `PATH`). Nothing is stored anywhere
//! else, so the location of a dependency is a pure function of the root and its path.

use std::path::{Path, PathBuf};

use crate::dependency::{self, Dependency};
use crate::error::{Result, RevlockError};

/// Environment variable holding the install search path
pub const SEARCH_PATH_ENV: &str = "REVLOCK_PATH";

/// Subdirectory holding dependency sources
pub const SOURCE_DIR: &str = "src";

/// Default root under the home directory when no search path is set
const DEFAULT_ROOT: &str = ".revlock";

/// Directory dependencies are installed into
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstallRoot {
    source_dir: PathBuf,
}

impl InstallRoot {
    /// Use `root` directly (sources go to `<root>/src`)
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            source_dir: root.into().join(SOURCE_DIR),
        }
    }

    /// Pick the first non-empty entry of a `PATH`-style list
    pub fn from_search_path(search_path: &str) -> Result<Self> {
        std::env::split_paths(search_path)
            .find(|entry| !entry.as_os_str().is_empty())
            .map(Self::new)
            .ok_or_else(|| RevlockError::IoError {
                message: format!("{SEARCH_PATH_ENV} does not name any directory"),
            })
    }

    /// Resolve from an explicit value, falling back to `~/.revlock`
    pub fn discover(search_path: Option<&str>) -> Result<Self> {
        if let Some(value) = search_path.filter(|v| !v.is_empty()) {
            return Self::from_search_path(value);
        }

        let home = dirs::home_dir().ok_or_else(|| RevlockError::IoError {
            message: format!("Could not determine home directory; set {SEARCH_PATH_ENV}"),
        })?;
        Ok(Self::new(home.join(DEFAULT_ROOT)))
    }

    /// Directory holding all dependency sources
    pub fn source_dir(&self) -> &Path {
        &self.source_dir
    }

    /// Install location of `dependency`
    pub fn full_path(&self, dependency: &Dependency) -> PathBuf {
        dependency.full_path(&self.source_dir)
    }

    /// Install location of an import path
    pub fn path_for(&self, path: &str) -> PathBuf {
        dependency::full_path(&self.source_dir, path)
    }
}
