//! Configuration file handling for revlock
//!
//! This module contains data structures for:
//! - `revlock.yaml` - Manifest with declared dependencies
//! - `revlock.lock` - Lockfile with dependencies pinned to exact revisions
//! - [`Settings`] - Per-run options gathered from the command line and environment

pub mod lockfile;
pub mod manifest;
pub mod settings;

// Re-export commonly used types
pub use lockfile::{LOCKFILE_NAME, LockedDependency, Lockfile};
pub use manifest::{MANIFEST_FILE, Manifest};
pub use settings::{INSTALL_GUARD_FILE, Settings};
