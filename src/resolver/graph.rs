//! Shared resolution state
//!
//! Every worker goes through one [`GraphState`] behind a mutex. Admitting a dependency
//! (dedup plus conflict check) and recording a resolved one both happen while holding that
//! lock, so two workers can never both claim the same path or pin it to different versions
//! unnoticed.

use std::collections::HashMap;

use crate::dependency::{Dependency, ResolvedDependency, ResolvedSet};
use crate::error::{Result, RevlockError};

/// Outcome of offering a dependency to the graph
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Admission {
    /// First time this path is seen: the caller must fetch it
    New,
    /// Already claimed with a compatible requirement
    Seen,
}

/// Visited paths, resolved entries and the first error of a run
#[derive(Debug, Default)]
pub struct GraphState {
    /// Requested version per claimed path
    requested: HashMap<String, String>,
    resolved: ResolvedSet,
    error: Option<RevlockError>,
}

impl GraphState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Claim `dependency.path` or check it against the existing claim
    ///
    /// Any difference in requested version is a conflict, including one side asking for the
    /// tip. The verdict depends only on the set of requirements for a path, never on which
    /// of them arrived first.
    pub fn admit(&mut self, dependency: &Dependency) -> Result<Admission> {
        match self.requested.get(&dependency.path) {
            None => {
                self.requested
                    .insert(dependency.path.clone(), dependency.version.clone());
                Ok(Admission::New)
            }
            Some(pinned) if *pinned == dependency.version => Ok(Admission::Seen),
            Some(pinned) => Err(RevlockError::VersionConflict {
                path: dependency.path.clone(),
                pinned: display_version(pinned),
                requested: display_version(&dependency.version),
            }),
        }
    }

    /// Store a resolved dependency
    pub fn record(&mut self, resolved: ResolvedDependency) {
        self.resolved.insert(resolved.path.clone(), resolved);
    }

    /// Remember `error` unless an earlier one is already recorded
    pub fn fail(&mut self, error: RevlockError) {
        if self.error.is_none() {
            self.error = Some(error);
        }
    }

    pub fn is_failed(&self) -> bool {
        self.error.is_some()
    }

    pub fn claimed(&self) -> usize {
        self.requested.len()
    }

    /// Resolved set, or the first error with whatever was resolved before it
    pub fn finish(self) -> std::result::Result<ResolvedSet, (RevlockError, ResolvedSet)> {
        match self.error {
            Some(error) => Err((error, self.resolved)),
            None => Ok(self.resolved),
        }
    }
}

fn display_version(version: &str) -> String {
    if version.is_empty() {
        "<tip>".to_string()
    } else {
        version.to_string()
    }
}
