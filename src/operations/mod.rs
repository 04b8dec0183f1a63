//! Operations module
//!
//! High-level workflows the commands call into:
//! - InstallOperation: reconcile, resolve, fetch and write the lockfile
//! - PlanOperation: reconcile only and report what an install would do
//!
//! The operations coordinate with:
//! - Config: manifest, lockfile and settings (from config module)
//! - Reconcile: lock reuse and diffs (from reconcile module)
//! - Resolver: graph resolution and fetching (from resolver module)
//! - Workspace: advisory locking (from workspace module)
//! - UI: Progress reporting (from ui module)

pub mod install;
pub mod plan;

pub use install::{InstallOperation, InstallOutcome};
pub use plan::PlanOperation;
