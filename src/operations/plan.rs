//! Plan operation
//!
//! Reconciles the manifest against the lockfile without fetching anything, so users can see
//! which dependencies an install would resolve again.

use crate::config::{Lockfile, Manifest, Settings};
use crate::dependency::ResolvedSet;
use crate::error::Result;
use crate::reconcile::{LockReconciler, ReconcilePlan};

/// Reconcile-only view of an install
pub struct PlanOperation<'a> {
    settings: &'a Settings,
}

impl<'a> PlanOperation<'a> {
    pub fn new(settings: &'a Settings) -> Self {
        Self { settings }
    }

    pub fn run(&self) -> Result<ReconcilePlan> {
        let manifest = Manifest::load(&self.settings.manifest_path())?;
        let previous = if self.settings.update {
            ResolvedSet::new()
        } else {
            Lockfile::load_optional(&self.settings.lock_path())?
                .map(|lock| lock.to_resolved_set())
                .unwrap_or_default()
        };
        Ok(LockReconciler::reconcile(&manifest.dependencies, &previous))
    }
}
