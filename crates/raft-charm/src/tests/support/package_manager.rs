//! Scripted [`PackageManager`] that records every ensure request.

use std::sync::{Arc, Mutex, MutexGuard};

use crate::package::{PackageError, PackageManager, SnapState};

/// One recorded `ensure` call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnsureCall {
    pub package: String,
    pub state: SnapState,
    pub channel: String,
}

#[derive(Debug, Default)]
struct PackageState {
    installed: bool,
    failure: Option<String>,
    presence_failure: Option<String>,
    ensure_calls: Vec<EnsureCall>,
}

/// Package manager whose outcome is chosen by the scenario.
#[derive(Debug, Clone, Default)]
pub struct ScriptedPackageManager {
    state: Arc<Mutex<PackageState>>,
}

impl ScriptedPackageManager {
    fn state(&self) -> MutexGuard<'_, PackageState> {
        self.state.lock().expect("package manager mutex poisoned")
    }

    /// Marks the package as already installed.
    pub fn mark_installed(&self) {
        self.state().installed = true;
    }

    /// Makes every ensure request fail with `message`.
    pub fn fail_with(&self, message: &str) {
        self.state().failure = Some(message.to_owned());
    }

    /// Makes every presence check fail with `message`.
    pub fn fail_presence_check(&self, message: &str) {
        self.state().presence_failure = Some(message.to_owned());
    }

    /// Whether the package is installed.
    #[must_use]
    pub fn installed(&self) -> bool {
        self.state().installed
    }

    /// Every ensure request, in order.
    #[must_use]
    pub fn ensure_calls(&self) -> Vec<EnsureCall> {
        self.state().ensure_calls.clone()
    }
}

impl PackageManager for ScriptedPackageManager {
    fn present(&self, _name: &str) -> Result<bool, PackageError> {
        let guard = self.state();
        match &guard.presence_failure {
            Some(message) => Err(PackageError::new(message.clone())),
            None => Ok(guard.installed),
        }
    }

    fn ensure(&self, name: &str, state: SnapState, channel: &str) -> Result<(), PackageError> {
        let mut guard = self.state();
        guard.ensure_calls.push(EnsureCall {
            package: name.to_owned(),
            state,
            channel: channel.to_owned(),
        });
        if let Some(message) = guard.failure.clone() {
            return Err(PackageError::new(message));
        }
        guard.installed = !matches!(state, SnapState::Absent);
        Ok(())
    }
}
