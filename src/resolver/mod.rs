//! Dependency resolution
//!
//! This module handles:
//! - Fetching every dependency reachable from the manifest, each exactly once
//! - Detecting conflicting version requirements for the same path
//! - Reusing lockfile pins without downloading or re-querying the backend
//!
//! Work is spread over a bounded rayon pool. Each dependency becomes one task; when a task
//! discovers new dependencies it admits them to the shared [`graph::GraphState`] and spawns
//! a task for each path it claimed. Tasks are spawned FIFO so a single worker walks the graph
//! breadth first. The first error stops new fetches; fetches already running finish but their
//! results are dropped.

pub mod discovery;
pub mod fetcher;
pub mod graph;

use parking_lot::Mutex;
use tracing::{debug, warn};

use crate::command::CommandRunner;
use crate::dependency::{Dependency, ResolvedDependency, ResolvedSet};
use crate::error::{ResolveFailure, Result, RevlockError};
use crate::ui::{ProgressReporter, SilentProgressReporter};

pub use discovery::{Discovery, ManifestDiscovery};
pub use fetcher::DependencyFetcher;
use graph::{Admission, GraphState};

static SILENT: SilentProgressReporter = SilentProgressReporter;

/// Resolves a manifest into a complete, conflict-free set of pinned dependencies
pub struct GraphResolver<'a, R, D> {
    fetcher: &'a DependencyFetcher<R>,
    discovery: &'a D,
    pins: ResolvedSet,
    jobs: usize,
    reporter: &'a dyn ProgressReporter,
}

impl<'a, R: CommandRunner, D: Discovery> GraphResolver<'a, R, D> {
    pub fn new(fetcher: &'a DependencyFetcher<R>, discovery: &'a D) -> Self {
        Self {
            fetcher,
            discovery,
            pins: ResolvedSet::new(),
            jobs: 1,
            reporter: &SILENT,
        }
    }

    /// Lock entries to reuse when a dependency is requested exactly as it was locked
    pub fn with_pins(mut self, pins: ResolvedSet) -> Self {
        self.pins = pins;
        self
    }

    /// Number of concurrent workers (at least one)
    pub fn with_jobs(mut self, jobs: usize) -> Self {
        self.jobs = jobs.max(1);
        self
    }

    pub fn with_reporter(mut self, reporter: &'a dyn ProgressReporter) -> Self {
        self.reporter = reporter;
        self
    }

    /// Resolve `manifest` and everything reachable from it
    ///
    /// On failure the error of the first failing dependency is returned together with the
    /// dependencies resolved before it.
    pub fn resolve(&self, manifest: &[Dependency]) -> std::result::Result<ResolvedSet, ResolveFailure> {
        let state = Mutex::new(GraphState::new());

        // Manifest-level conflicts surface before anything is fetched
        let mut seeds = Vec::with_capacity(manifest.len());
        {
            let mut guard = state.lock();
            for dependency in manifest {
                match guard.admit(dependency) {
                    Ok(Admission::New) => seeds.push(dependency.clone()),
                    Ok(Admission::Seen) => {}
                    Err(error) => {
                        return Err(ResolveFailure {
                            error,
                            partial: ResolvedSet::new(),
                        });
                    }
                }
            }
        }

        if seeds.is_empty() {
            return Ok(ResolvedSet::new());
        }
        self.reporter.admitted(seeds.len());

        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(self.jobs)
            .thread_name(|i| format!("revlock-worker-{i}"))
            .build()
            .map_err(|e| ResolveFailure {
                error: RevlockError::WorkerPoolFailed {
                    reason: e.to_string(),
                },
                partial: ResolvedSet::new(),
            })?;

        debug!(jobs = self.jobs, seeds = seeds.len(), "resolving");
        pool.scope_fifo(|scope| {
            for dependency in seeds {
                let state = &state;
                scope.spawn_fifo(move |scope| self.visit(scope, dependency, state));
            }
        });

        match state.into_inner().finish() {
            Ok(resolved) => {
                self.reporter.finish();
                Ok(resolved)
            }
            Err((error, partial)) => {
                self.reporter.abandon();
                Err(ResolveFailure { error, partial })
            }
        }
    }

    fn visit<'s>(
        &'s self,
        scope: &rayon::ScopeFifo<'s>,
        dependency: Dependency,
        state: &'s Mutex<GraphState>,
    ) {
        if state.lock().is_failed() {
            debug!(path = %dependency.path, "skipped after earlier failure");
            return;
        }

        self.reporter.started(&dependency.path);
        let (resolved, kept) = match self.resolve_one(&dependency) {
            Ok(outcome) => outcome,
            Err(error) => {
                warn!(path = %dependency.path, %error, "resolution failed");
                state.lock().fail(error);
                return;
            }
        };

        let next = {
            let mut guard = state.lock();
            if guard.is_failed() {
                return;
            }

            let mut next = Vec::new();
            for child in &resolved.dependencies {
                match guard.admit(child) {
                    Ok(Admission::New) => next.push(child.clone()),
                    Ok(Admission::Seen) => {}
                    Err(error) => {
                        guard.fail(error);
                        break;
                    }
                }
            }
            self.reporter.finished(&resolved, kept);
            guard.record(resolved);
            if guard.is_failed() {
                return;
            }
            next
        };

        if !next.is_empty() {
            self.reporter.admitted(next.len());
        }
        for child in next {
            scope.spawn_fifo(move |scope| self.visit(scope, child, state));
        }
    }

    /// Pin one dependency, returning whether the lockfile entry was reused as is
    fn resolve_one(&self, dependency: &Dependency) -> Result<(ResolvedDependency, bool)> {
        dependency.validate()?;

        if let Some(pin) = self
            .pins
            .get(&dependency.path)
            .filter(|pin| pin.requirement() == *dependency)
        {
            if self.fetcher.is_present(dependency) {
                // The install root is shared, so the tree may sit at another revision
                self.fetcher.restore(pin)?;
                debug!(path = %dependency.path, revision = %pin.version, "kept from lockfile");
                return Ok((pin.clone(), true));
            }
            debug!(path = %dependency.path, revision = %pin.version, "restoring locked revision");
            return self.fetcher.materialize(pin).map(|restored| (restored, false));
        }

        let mut resolved = self.fetcher.fetch(dependency)?;
        let source_dir = self.fetcher.root().full_path(dependency);
        resolved.dependencies = self
            .discovery
            .discover(&resolved, &source_dir)
            .map_err(|e| match e {
                failed @ RevlockError::DiscoveryFailed { .. } => failed,
                other => RevlockError::DiscoveryFailed {
                    path: dependency.path.clone(),
                    reason: other.to_string(),
                },
            })?;
        Ok((resolved, false))
    }
}
