//! Dependency discovery
//!
//! After a dependency is fetched its source tree is asked what it depends on. How that is
//! answered varies by ecosystem, so the resolver only sees the [`Discovery`] trait.
//! [`ManifestDiscovery`] reads the fetched tree's own `revlock.yaml`.

use std::path::Path;

use crate::config::{MANIFEST_FILE, Manifest};
use crate::dependency::{Dependency, ResolvedDependency};
use crate::error::{Result, RevlockError};

/// Reports the dependencies of a fetched source tree
pub trait Discovery: Send + Sync {
    /// Dependencies referenced by `dependency`, whose tree lives at `source_dir`
    fn discover(&self, dependency: &ResolvedDependency, source_dir: &Path)
    -> Result<Vec<Dependency>>;
}

/// Reads the declared dependencies from a fetched tree's manifest
///
/// A tree without a manifest has no dependencies.
#[derive(Debug, Default, Clone, Copy)]
pub struct ManifestDiscovery;

impl Discovery for ManifestDiscovery {
    fn discover(
        &self,
        dependency: &ResolvedDependency,
        source_dir: &Path,
    ) -> Result<Vec<Dependency>> {
        let manifest = Manifest::load_optional(&source_dir.join(MANIFEST_FILE)).map_err(|e| {
            RevlockError::DiscoveryFailed {
                path: dependency.path.clone(),
                reason: e.to_string(),
            }
        })?;
        Ok(manifest.map(|m| m.dependencies).unwrap_or_default())
    }
}

impl<D: Discovery + ?Sized> Discovery for &D {
    fn discover(
        &self,
        dependency: &ResolvedDependency,
        source_dir: &Path,
    ) -> Result<Vec<Dependency>> {
        (**self).discover(dependency, source_dir)
    }
}
