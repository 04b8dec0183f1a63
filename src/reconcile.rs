//! Lock reconciliation
//!
//! Compares the manifest against the previous lock before resolution, and the previous lock
//! against the new resolved set after it.
//!
//! A lock entry is kept when it is reached from the manifest through kept entries and is
//! requested exactly as it was locked. Kept entries become pins for the resolver, which then
//! trusts their revision and stored edges without asking the backend again.

use std::collections::{HashSet, VecDeque};

use crate::dependency::{Dependency, ResolvedDependency, ResolvedSet};

/// What an install would do with each dependency
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReconcilePlan {
    /// Requirements that must be resolved against their backend
    pub fetch: Vec<Dependency>,
    /// Lock entries reused as they are
    pub keep: ResolvedSet,
    /// Lock entries no longer reachable through kept entries
    ///
    /// Dependencies below a fetched entry are only known after resolution, so an entry listed
    /// here may still come back.
    pub drop: Vec<String>,
}

impl ReconcilePlan {
    /// Kept entries in the form the resolver takes as pins
    pub fn pins(&self) -> ResolvedSet {
        self.keep.clone()
    }

    /// Nothing to fetch and nothing to drop
    pub fn is_satisfied(&self) -> bool {
        self.fetch.is_empty() && self.drop.is_empty()
    }
}

/// A locked dependency whose entry changed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LockUpdate {
    pub path: String,
    pub from: String,
    pub to: String,
}

/// Difference between two lock states
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LockDiff {
    pub added: Vec<ResolvedDependency>,
    pub updated: Vec<LockUpdate>,
    pub removed: Vec<ResolvedDependency>,
    pub unchanged: Vec<String>,
}

impl LockDiff {
    pub fn is_empty(&self) -> bool {
        self.added.is_empty() && self.updated.is_empty() && self.removed.is_empty()
    }
}

/// Plans installs from a previous lock and diffs lock states
pub struct LockReconciler;

impl LockReconciler {
    /// Split `manifest` into what must be fetched and what the previous lock already pins
    pub fn reconcile(manifest: &[Dependency], previous: &ResolvedSet) -> ReconcilePlan {
        let mut plan = ReconcilePlan::default();
        let mut seen: HashSet<&str> = HashSet::new();
        let mut queue: VecDeque<&Dependency> = manifest.iter().collect();

        while let Some(dependency) = queue.pop_front() {
            if !seen.insert(dependency.path.as_str()) {
                continue;
            }

            match previous
                .get(&dependency.path)
                .filter(|locked| locked.requirement() == *dependency)
            {
                Some(locked) => {
                    queue.extend(locked.dependencies.iter());
                    plan.keep.insert(locked.path.clone(), locked.clone());
                }
                None => plan.fetch.push(dependency.clone()),
            }
        }

        plan.drop = previous
            .keys()
            .filter(|path| !seen.contains(path.as_str()))
            .cloned()
            .collect();
        plan
    }

    /// Changes from `previous` to `resolved`
    pub fn diff(previous: &ResolvedSet, resolved: &ResolvedSet) -> LockDiff {
        let mut diff = LockDiff::default();

        for (path, entry) in resolved {
            match previous.get(path) {
                None => diff.added.push(entry.clone()),
                Some(old) if old == entry => diff.unchanged.push(path.clone()),
                Some(old) => diff.updated.push(LockUpdate {
                    path: path.clone(),
                    from: old.version.clone(),
                    to: entry.version.clone(),
                }),
            }
        }

        diff.removed = previous
            .iter()
            .filter(|(path, _)| !resolved.contains_key(*path))
            .map(|(_, entry)| entry.clone())
            .collect();
        diff
    }
}
