//! Subprocess boundary
//!
//! The resolution engine never spawns processes itself. Backends describe what they want
//! run as a [`CommandSpec`], and a [`CommandRunner`] executes it. Production code uses
//! [`SystemCommandRunner`]; tests use [`FakeCommandRunner`] so they need neither network
//! access nor a version-control client.

pub mod fake;
pub mod system;

use std::fmt;
use std::path::{Path, PathBuf};

use thiserror::Error;

pub use fake::FakeCommandRunner;
pub use system::SystemCommandRunner;

/// What a command is for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CommandIntent {
    /// Bring a dependency's origin into the install root
    Download,
    /// Move a working tree to a version
    Checkout,
    /// Print the exact revision currently checked out
    CurrentVersion,
}

/// An unexecuted command: program, arguments and working directory
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandSpec {
    pub program: String,
    pub args: Vec<String>,
    pub dir: PathBuf,
    pub intent: CommandIntent,
}

impl CommandSpec {
    pub fn new<I, S>(intent: CommandIntent, program: &str, args: I, dir: &Path) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            program: program.to_string(),
            args: args.into_iter().map(Into::into).collect(),
            dir: dir.to_path_buf(),
            intent,
        }
    }

    /// Program followed by its arguments
    pub fn argv(&self) -> Vec<&str> {
        std::iter::once(self.program.as_str())
            .chain(self.args.iter().map(String::as_str))
            .collect()
    }
}

impl fmt::Display for CommandSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.argv().join(" "))
    }
}

/// Why a command did not succeed
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum RunError {
    /// The program could not be found on this machine
    #[error("'{program}' is not installed or not on PATH")]
    ProgramNotFound { program: String },

    /// The program ran and exited unsuccessfully
    #[error("{command} exited with {status}: {output}")]
    Failed {
        command: String,
        status: String,
        output: String,
    },

    /// The program could not be started for another reason
    #[error("failed to run {command}: {message}")]
    Io { command: String, message: String },
}

impl RunError {
    /// What the backend printed, or the error itself when it never ran
    pub fn output(&self) -> String {
        match self {
            RunError::Failed { output, .. } if !output.trim().is_empty() => {
                output.trim().to_string()
            }
            other => other.to_string(),
        }
    }
}

/// Executes command descriptions
///
/// Implementations must be shareable between fetch workers.
pub trait CommandRunner: Send + Sync {
    /// Run `command` in its working directory and return its standard output
    fn run(&self, command: &CommandSpec) -> Result<String, RunError>;
}

impl<R: CommandRunner + ?Sized> CommandRunner for &R {
    fn run(&self, command: &CommandSpec) -> Result<String, RunError> {
        (**self).run(command)
    }
}

impl<R: CommandRunner + ?Sized> CommandRunner for std::sync::Arc<R> {
    fn run(&self, command: &CommandSpec) -> Result<String, RunError> {
        (**self).run(command)
    }
}
