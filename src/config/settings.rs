//! Per-run settings
//!
//! Collected by the CLI from flags and their environment fallbacks (`REVLOCK_WORKSPACE`,
//! `REVLOCK_PATH`, `REVLOCK_JOBS`) and handed to the install operation.

use std::path::{Path, PathBuf};

use crate::config::{LOCKFILE_NAME, MANIFEST_FILE};
use crate::install_root::InstallRoot;

/// Advisory lock file guarding concurrent installs in one workspace
pub const INSTALL_GUARD_FILE: &str = ".revlock.guard";

/// Options for one install run
#[derive(Debug, Clone)]
pub struct Settings {
    /// Directory holding the manifest and lockfile
    pub workspace: PathBuf,

    /// Where dependencies are installed
    pub install_root: InstallRoot,

    /// Number of concurrent fetch workers
    pub jobs: usize,

    /// Ignore the previous lockfile and re-resolve everything
    pub update: bool,

    /// Fail instead of changing the lockfile
    pub frozen: bool,
}

impl Settings {
    pub fn new(workspace: impl Into<PathBuf>, install_root: InstallRoot) -> Self {
        Self {
            workspace: workspace.into(),
            install_root,
            jobs: default_jobs(),
            update: false,
            frozen: false,
        }
    }

    pub fn with_jobs(mut self, jobs: Option<usize>) -> Self {
        self.jobs = jobs.filter(|j| *j > 0).unwrap_or_else(default_jobs);
        self
    }

    pub fn with_update(mut self, update: bool) -> Self {
        self.update = update;
        self
    }

    pub fn with_frozen(mut self, frozen: bool) -> Self {
        self.frozen = frozen;
        self
    }

    pub fn manifest_path(&self) -> PathBuf {
        self.workspace.join(MANIFEST_FILE)
    }

    pub fn lock_path(&self) -> PathBuf {
        self.workspace.join(LOCKFILE_NAME)
    }

    pub fn guard_path(&self) -> PathBuf {
        self.workspace.join(INSTALL_GUARD_FILE)
    }

    pub fn workspace(&self) -> &Path {
        &self.workspace
    }
}

/// One worker per available CPU
pub fn default_jobs() -> usize {
    std::thread::available_parallelism()
        .map(std::num::NonZeroUsize::get)
        .unwrap_or(1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_paths_are_inside_workspace() {
        let settings = Settings::new("/work/project", InstallRoot::new("/deps"));
        assert_eq!(settings.manifest_path(), PathBuf::from("/work/project/revlock.yaml"));
        assert_eq!(settings.lock_path(), PathBuf::from("/work/project/revlock.lock"));
        assert_eq!(settings.guard_path(), PathBuf::from("/work/project/.revlock.guard"));
    }

    #[test]
    fn test_zero_jobs_falls_back_to_default() {
        let settings = Settings::new("/w", InstallRoot::new("/deps")).with_jobs(Some(0));
        assert_eq!(settings.jobs, default_jobs());
        assert!(settings.jobs >= 1);

        let settings = settings.with_jobs(Some(3));
        assert_eq!(settings.jobs, 3);
    }
}
