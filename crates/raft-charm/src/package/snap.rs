//! [`PackageManager`] backed by the `snap` command line client.

use tracing::{debug, info};

use crate::command::{CommandError, CommandRunner, SystemCommandRunner, args, run_checked};

use super::{PackageError, PackageManager, SnapState};

const SNAP_TARGET: &str = concat!(env!("CARGO_PKG_NAME"), "::snap");
const SNAP: &str = "snap";
const NOT_INSTALLED_MARKER: &str = "no matching snaps installed";

/// Package manager that shells out to `snap`.
#[derive(Debug, Clone, Default)]
pub struct SnapPackageManager<R = SystemCommandRunner> {
    runner: R,
}

impl SnapPackageManager {
    /// Builds a manager using the system command runner.
    #[must_use]
    pub fn system() -> Self {
        Self::new(SystemCommandRunner)
    }
}

impl<R> SnapPackageManager<R>
where
    R: CommandRunner,
{
    /// Builds a manager over the supplied runner.
    #[must_use]
    pub fn new(runner: R) -> Self {
        Self { runner }
    }

    fn snap(&self, command: &[String]) -> Result<(), PackageError> {
        run_checked(&self.runner, SNAP, command)
            .map(|_| ())
            .map_err(|error| snap_error(command, error))
    }
}

impl<R> PackageManager for SnapPackageManager<R>
where
    R: CommandRunner,
{
    fn present(&self, name: &str) -> Result<bool, PackageError> {
        let command = args(["list", name]);
        let output = self
            .runner
            .run(SNAP, &command)
            .map_err(|error| snap_error(&command, error))?;
        if output.succeeded() {
            return Ok(true);
        }
        if output.stderr.contains(NOT_INSTALLED_MARKER) {
            debug!(target: SNAP_TARGET, snap = name, "snap not installed");
            return Ok(false);
        }
        Err(snap_error(
            &command,
            CommandError::Failed {
                program: SNAP.to_owned(),
                status: output.status,
                stderr: output.stderr.trim().to_owned(),
            },
        ))
    }

    fn ensure(&self, name: &str, state: SnapState, channel: &str) -> Result<(), PackageError> {
        let channel_flag = format!("--channel={channel}");
        let installed = self.present(name)?;
        let command = match (state, installed) {
            (SnapState::Latest, true) => Some(args(["refresh", name, channel_flag.as_str()])),
            (SnapState::Latest | SnapState::Present, false) => {
                Some(args(["install", name, channel_flag.as_str()]))
            }
            (SnapState::Absent, true) => Some(args(["remove", name])),
            (SnapState::Present, true) | (SnapState::Absent, false) => None,
        };
        let Some(command) = command else {
            debug!(target: SNAP_TARGET, snap = name, %state, "snap already in desired state");
            return Ok(());
        };
        self.snap(&command)?;
        info!(target: SNAP_TARGET, snap = name, %state, channel, "snap ensured");
        Ok(())
    }
}

fn snap_error(command: &[String], error: CommandError) -> PackageError {
    let reason = match &error {
        CommandError::Failed { stderr, .. } if !stderr.is_empty() => stderr.clone(),
        other => other.to_string(),
    };
    PackageError::with_source(format!("snap {}: {reason}", command.join(" ")), error)
}
