//! Version-control backends
//!
//! A [`Repository`] is bound to one working tree and describes the two commands the
//! installer needs from any backend:
//! - move the tree to a version ([`Repository::checkout_command`])
//! - report the exact revision checked out ([`Repository::current_version_command`])
//!
//! Which backend owns a tree is decided once by [`detect`]; callers treat the result as
//! opaque and never branch on the backend themselves.

pub mod cache;
pub mod detect;

use std::fmt;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::command::{CommandIntent, CommandSpec};

pub use cache::RepositoryCache;
pub use detect::detect;

/// Supported version-control systems
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum VcsKind {
    #[serde(rename = "git")]
    Git,
    #[serde(rename = "hg")]
    Mercurial,
    #[serde(rename = "bzr")]
    Bazaar,
}

impl VcsKind {
    /// Detection order when several markers sit in the same directory
    pub const ALL: [VcsKind; 3] = [VcsKind::Git, VcsKind::Mercurial, VcsKind::Bazaar];

    /// Metadata directory identifying a working tree of this backend
    pub fn marker(self) -> &'static str {
        match self {
            VcsKind::Git => ".git",
            VcsKind::Mercurial => ".hg",
            VcsKind::Bazaar => ".bzr",
        }
    }

    /// Client program name
    pub fn program(self) -> &'static str {
        match self {
            VcsKind::Git => "git",
            VcsKind::Mercurial => "hg",
            VcsKind::Bazaar => "bzr",
        }
    }

    /// Download `origin` into `dest`, leaving it at the default branch tip
    ///
    /// Runs in the parent of `dest` with the final path component as target.
    pub fn download_command(self, origin: &str, dest: &Path) -> CommandSpec {
        let dir = dest.parent().unwrap_or(dest);
        let target = dest
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| ".".to_string());

        let args = match self {
            VcsKind::Git => vec!["clone".to_string(), "--quiet".to_string(), origin.to_string(), target],
            VcsKind::Mercurial => vec!["clone".to_string(), "--quiet".to_string(), origin.to_string(), target],
            VcsKind::Bazaar => vec!["branch".to_string(), "--quiet".to_string(), origin.to_string(), target],
        };
        CommandSpec::new(CommandIntent::Download, self.program(), args, dir)
    }
}

impl fmt::Display for VcsKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.program())
    }
}

/// A detected backend bound to a working tree
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Repository {
    kind: VcsKind,
    work_tree: PathBuf,
}

impl Repository {
    pub fn new(kind: VcsKind, work_tree: impl Into<PathBuf>) -> Self {
        Self {
            kind,
            work_tree: work_tree.into(),
        }
    }

    pub fn kind(&self) -> VcsKind {
        self.kind
    }

    pub fn work_tree(&self) -> &Path {
        &self.work_tree
    }

    /// Move the working tree to `version`
    ///
    /// Running it again with the same version leaves the tree unchanged.
    pub fn checkout_command(&self, version: &str) -> CommandSpec {
        let args: Vec<&str> = match self.kind {
            VcsKind::Git => vec!["checkout", version],
            VcsKind::Mercurial => vec!["update", "-c", version],
            VcsKind::Bazaar => vec!["update", "-r", version],
        };
        CommandSpec::new(
            CommandIntent::Checkout,
            self.kind.program(),
            args,
            &self.work_tree,
        )
    }

    /// Print the exact revision currently checked out
    pub fn current_version_command(&self) -> CommandSpec {
        let args: Vec<&str> = match self.kind {
            VcsKind::Git => vec!["rev-parse", "HEAD"],
            VcsKind::Mercurial => vec!["id", "-i"],
            VcsKind::Bazaar => vec!["revno", "--tree"],
        };
        CommandSpec::new(
            CommandIntent::CurrentVersion,
            self.kind.program(),
            args,
            &self.work_tree,
        )
    }

    /// Extract the revision from current-version output
    ///
    /// Returns `None` when the backend printed nothing usable.
    pub fn parse_current_version(&self, output: &str) -> Option<String> {
        let line = output.lines().map(str::trim).find(|line| !line.is_empty())?;

        // hg appends '+' when the working tree has uncommitted changes
        let revision = match self.kind {
            VcsKind::Mercurial => {
                let trimmed = line.trim_end_matches('+');
                if trimmed.len() != line.len() {
                    tracing::warn!(
                        path = %self.work_tree.display(),
                        "working tree has uncommitted changes"
                    );
                }
                trimmed
            }
            VcsKind::Git | VcsKind::Bazaar => line,
        };

        (!revision.is_empty()).then(|| revision.to_string())
    }
}
