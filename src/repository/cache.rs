//! Per-run memo of detected repositories

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use parking_lot::Mutex;

use super::{Repository, detect};
use crate::error::Result;

/// Detects each working tree at most once per run
#[derive(Debug, Default)]
pub struct RepositoryCache {
    entries: Mutex<HashMap<PathBuf, Repository>>,
}

impl RepositoryCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Detected repository for `path`, detecting on first use
    ///
    /// Failures are not cached: a later call after the tree appears can still succeed.
    pub fn get(&self, path: &Path) -> Result<Repository> {
        if let Some(repo) = self.entries.lock().get(path) {
            return Ok(repo.clone());
        }

        let repo = detect(path)?;
        self.entries
            .lock()
            .entry(path.to_path_buf())
            .or_insert_with(|| repo.clone());
        Ok(repo)
    }

    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.lock().is_empty()
    }
}
