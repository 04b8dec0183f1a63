//! Workspace locking
//!
//! A workspace is the directory holding `revlock.yaml` and `revlock.lock`. Installs take an
//! advisory lock on a guard file inside it so two runs never write the lockfile at once.

use std::fs;
use std::path::{Path, PathBuf};

use fslock::LockFile;
use tracing::debug;

use crate::config::INSTALL_GUARD_FILE;
use crate::error::{Result, RevlockError};

/// RAII guard for workspace locking
///
/// Acquires an advisory file lock on creation and releases it on drop.
pub struct WorkspaceGuard {
    lock: LockFile,
    lock_path: PathBuf,
}

impl WorkspaceGuard {
    /// Lock `workspace`, failing with [`RevlockError::InstallLocked`] if another run holds it
    pub fn acquire(workspace: &Path) -> Result<Self> {
        Self::try_acquire(workspace)?.ok_or(RevlockError::InstallLocked)
    }

    /// Try to lock `workspace` without blocking
    pub fn try_acquire(workspace: &Path) -> Result<Option<Self>> {
        let lock_path = workspace.join(INSTALL_GUARD_FILE);

        let mut lock = LockFile::open(&lock_path).map_err(|e| RevlockError::InstallLockFailed {
            reason: format!("Failed to open {}: {}", lock_path.display(), e),
        })?;

        let acquired = lock
            .try_lock()
            .map_err(|e| RevlockError::InstallLockFailed {
                reason: format!("Failed to try lock: {}", e),
            })?;

        if acquired {
            debug!(path = %lock_path.display(), "workspace locked");
            Ok(Some(Self { lock, lock_path }))
        } else {
            Ok(None)
        }
    }

    pub fn path(&self) -> &Path {
        &self.lock_path
    }
}

impl Drop for WorkspaceGuard {
    fn drop(&mut self) {
        let _ = self.lock.unlock();

        // Recreated on the next run
        let _ = fs::remove_file(&self.lock_path);
    }
}
