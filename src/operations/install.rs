//! Install operation
//!
//! One run goes:
//! 1. lock the workspace
//! 2. load the manifest and the previous lockfile (ignored with `update`)
//! 3. reconcile, keeping lock entries that are still requested as locked
//! 4. resolve the rest of the graph
//! 5. diff against the previous lock and write the new one if anything changed
//!
//! The lockfile is written only after every dependency resolved. With `frozen`, any change is
//! an error and the lockfile is left untouched.

use tracing::{debug, info};

use crate::command::CommandRunner;
use crate::config::{Lockfile, Manifest, Settings};
use crate::dependency::ResolvedSet;
use crate::error::{Result, RevlockError};
use crate::hash;
use crate::reconcile::{LockDiff, LockReconciler};
use crate::resolver::{DependencyFetcher, GraphResolver, ManifestDiscovery};
use crate::ui::ProgressReporter;
use crate::workspace::WorkspaceGuard;

/// Result of a successful install
#[derive(Debug, Clone)]
pub struct InstallOutcome {
    /// Changes relative to the previous lockfile
    pub diff: LockDiff,
    /// Everything now installed, pinned
    pub resolved: ResolvedSet,
    /// Whether the lockfile was (re)written
    pub lock_written: bool,
}

impl InstallOutcome {
    pub fn is_up_to_date(&self) -> bool {
        !self.lock_written
    }
}

/// High-level install operation
pub struct InstallOperation<'a, R> {
    settings: &'a Settings,
    runner: R,
    reporter: Option<&'a dyn ProgressReporter>,
}

impl<'a, R: CommandRunner> InstallOperation<'a, R> {
    pub fn new(settings: &'a Settings, runner: R) -> Self {
        Self {
            settings,
            runner,
            reporter: None,
        }
    }

    pub fn with_reporter(mut self, reporter: &'a dyn ProgressReporter) -> Self {
        self.reporter = Some(reporter);
        self
    }

    /// Execute the install
    pub fn run(self) -> Result<InstallOutcome> {
        let settings = self.settings;
        let manifest_path = settings.manifest_path();
        let lock_path = settings.lock_path();

        let manifest = Manifest::load(&manifest_path)?;
        let _guard = WorkspaceGuard::acquire(settings.workspace())?;
        let digest = hash::hash_file(&manifest_path)?;

        let previous_lock = Lockfile::load_optional(&lock_path)?;
        let previous = previous_lock
            .as_ref()
            .map(Lockfile::to_resolved_set)
            .unwrap_or_default();
        let baseline = if settings.update {
            ResolvedSet::new()
        } else {
            previous.clone()
        };

        let plan = LockReconciler::reconcile(&manifest.dependencies, &baseline);
        info!(
            fetch = plan.fetch.len(),
            keep = plan.keep.len(),
            drop = plan.drop.len(),
            "reconciled lockfile"
        );

        let fetcher = DependencyFetcher::new(self.runner, settings.install_root.clone());
        let discovery = ManifestDiscovery;
        let mut resolver = GraphResolver::new(&fetcher, &discovery)
            .with_pins(plan.pins())
            .with_jobs(settings.jobs);
        if let Some(reporter) = self.reporter {
            resolver = resolver.with_reporter(reporter);
        }
        let resolved = resolver
            .resolve(&manifest.dependencies)
            .map_err(|failure| {
                debug!(resolved = failure.partial.len(), "resolution aborted");
                RevlockError::from(failure)
            })?;

        let diff = LockReconciler::diff(&previous, &resolved);
        let manifest_changed = previous_lock
            .as_ref()
            .and_then(|lock| lock.manifest.as_deref())
            != Some(digest.as_str());
        let outdated = previous_lock.is_none() || manifest_changed || !diff.is_empty();

        if outdated && settings.frozen {
            return Err(RevlockError::LockfileOutdated);
        }
        if outdated {
            Lockfile::from_resolved(Some(digest), &resolved).save(&lock_path)?;
            info!(path = %lock_path.display(), entries = resolved.len(), "lockfile written");
        }

        Ok(InstallOutcome {
            diff,
            resolved,
            lock_written: outdated,
        })
    }
}
