//! Command implementations for revlock CLI

pub mod completions;
pub mod install;
pub mod plan;
pub mod version;

use std::path::PathBuf;

use crate::config::Settings;
use crate::error::{Result, RevlockError};
use crate::install_root::InstallRoot;

/// Resolve workspace path from optional argument
///
/// If a workspace path is provided, use it. Otherwise,
/// resolve to the current directory.
pub fn resolve_workspace_path(workspace: Option<PathBuf>) -> Result<PathBuf> {
    match workspace {
        Some(path) => Ok(path),
        None => std::env::current_dir().map_err(|e| RevlockError::IoError {
            message: format!("Failed to get current directory: {}", e),
        }),
    }
}

/// Settings shared by the commands that read the workspace
pub fn load_settings(workspace: Option<PathBuf>, root: Option<&str>) -> Result<Settings> {
    let workspace = resolve_workspace_path(workspace)?;
    let install_root = InstallRoot::discover(root)?;
    Ok(Settings::new(workspace, install_root))
}
