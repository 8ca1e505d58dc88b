//! Execution of external tools (`snap`, the runtime's hook tools).

use std::io;
use std::process::{Command, Stdio};

use thiserror::Error;
use tracing::debug;

const COMMAND_TARGET: &str = concat!(env!("CARGO_PKG_NAME"), "::command");

/// Captured result of a finished command.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CommandOutput {
    /// Exit code, absent when the process was killed by a signal.
    pub status: Option<i32>,
    /// Captured standard output.
    pub stdout: String,
    /// Captured standard error.
    pub stderr: String,
}

impl CommandOutput {
    /// Builds a successful output with the given stdout.
    #[must_use]
    pub fn success(stdout: impl Into<String>) -> Self {
        Self {
            status: Some(0),
            stdout: stdout.into(),
            stderr: String::new(),
        }
    }

    /// Builds a failed output with the given exit code and stderr.
    #[must_use]
    pub fn failure(status: i32, stderr: impl Into<String>) -> Self {
        Self {
            status: Some(status),
            stdout: String::new(),
            stderr: stderr.into(),
        }
    }

    /// Returns `true` when the command exited with status zero.
    #[must_use]
    pub fn succeeded(&self) -> bool {
        self.status == Some(0)
    }
}

/// Errors raised while running an external command.
#[derive(Debug, Error)]
pub enum CommandError {
    /// The program could not be started.
    #[error("failed to run '{program}': {source}")]
    Spawn {
        /// Program name.
        program: String,
        /// Underlying IO error.
        #[source]
        source: io::Error,
    },
    /// The program exited unsuccessfully.
    #[error("'{program}' exited with status {status:?}: {stderr}")]
    Failed {
        /// Program name.
        program: String,
        /// Exit code, if any.
        status: Option<i32>,
        /// Trimmed standard error.
        stderr: String,
    },
}

/// Runs external programs; the seam the adapters are tested through.
pub trait CommandRunner {
    /// Runs `program` with `args` and captures its output.
    ///
    /// A non-zero exit is not an error at this level; see [`run_checked`].
    fn run(&self, program: &str, args: &[String]) -> Result<CommandOutput, CommandError>;
}

impl<T> CommandRunner for &T
where
    T: CommandRunner + ?Sized,
{
    fn run(&self, program: &str, args: &[String]) -> Result<CommandOutput, CommandError> {
        (**self).run(program, args)
    }
}

/// Runs a command and turns a non-zero exit into [`CommandError::Failed`].
pub fn run_checked<R>(runner: &R, program: &str, args: &[String]) -> Result<String, CommandError>
where
    R: CommandRunner + ?Sized,
{
    let output = runner.run(program, args)?;
    if output.succeeded() {
        Ok(output.stdout)
    } else {
        Err(CommandError::Failed {
            program: program.to_owned(),
            status: output.status,
            stderr: output.stderr.trim().to_owned(),
        })
    }
}

/// Runner backed by [`std::process::Command`].
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemCommandRunner;

impl CommandRunner for SystemCommandRunner {
    fn run(&self, program: &str, args: &[String]) -> Result<CommandOutput, CommandError> {
        debug!(target: COMMAND_TARGET, program, ?args, "running command");
        let output = Command::new(program)
            .args(args)
            .stdin(Stdio::null())
            .output()
            .map_err(|source| CommandError::Spawn {
                program: program.to_owned(),
                source,
            })?;
        let result = CommandOutput {
            status: output.status.code(),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        };
        debug!(
            target: COMMAND_TARGET,
            program,
            status = ?result.status,
            "command finished"
        );
        Ok(result)
    }
}

/// Converts string literals into the owned argument vector runners expect.
pub(crate) fn args<const N: usize>(values: [&str; N]) -> Vec<String> {
    values.iter().map(|value| (*value).to_owned()).collect()
}
