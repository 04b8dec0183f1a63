//! Real subprocess execution

use std::io::ErrorKind;
use std::process::{Command, Stdio};

use tracing::debug;

use super::{CommandRunner, CommandSpec, RunError};

/// Runs commands with `std::process::Command`, capturing their output
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemCommandRunner;

impl SystemCommandRunner {
    pub fn new() -> Self {
        Self
    }
}

impl CommandRunner for SystemCommandRunner {
    fn run(&self, spec: &CommandSpec) -> Result<String, RunError> {
        debug!(command = %spec, dir = %spec.dir.display(), "running");

        let output = Command::new(&spec.program)
            .args(&spec.args)
            .current_dir(&spec.dir)
            // Never wait on a credential prompt
            .stdin(Stdio::null())
            .env("GIT_TERMINAL_PROMPT", "0")
            .output()
            .map_err(|e| match e.kind() {
                ErrorKind::NotFound => RunError::ProgramNotFound {
                    program: spec.program.clone(),
                },
                _ => RunError::Io {
                    command: spec.to_string(),
                    message: e.to_string(),
                },
            })?;

        let stdout = String::from_utf8_lossy(&output.stdout).into_owned();
        if output.status.success() {
            return Ok(stdout);
        }

        let stderr = String::from_utf8_lossy(&output.stderr);
        Err(RunError::Failed {
            command: spec.to_string(),
            status: output.status.to_string(),
            output: format!("{stderr}{stdout}"),
        })
    }
}
