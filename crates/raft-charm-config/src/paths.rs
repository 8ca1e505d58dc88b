//! Derives the on-disk state paths owned by the charm.
//!
//! The runtime keeps unit status and relation data in its own store. The only
//! thing the charm persists itself is the queue of deferred events, which has
//! to survive between hook processes.

use std::fs;

use camino::{Utf8Path, Utf8PathBuf};
use thiserror::Error;

use crate::Config;
use crate::defaults::STATE_FILE_NAME;

/// Canonical paths for state written by the charm between dispatches.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatePaths {
    state_dir: Utf8PathBuf,
    state_file: Utf8PathBuf,
}

impl StatePaths {
    /// Derives state paths from the configuration, creating the directory
    /// when it does not exist yet.
    pub fn from_config(config: &Config) -> Result<Self, StatePathsError> {
        let state_dir = config.charm_dir().to_path_buf();
        if state_dir.as_str().is_empty() {
            return Err(StatePathsError::EmptyCharmDir);
        }
        fs::create_dir_all(&state_dir).map_err(|source| StatePathsError::StateDirectory {
            path: state_dir.clone(),
            source,
        })?;
        Ok(Self {
            state_file: state_dir.join(STATE_FILE_NAME),
            state_dir,
        })
    }

    /// Directory holding charm state.
    #[must_use]
    pub fn state_dir(&self) -> &Utf8Path {
        self.state_dir.as_path()
    }

    /// File holding the deferred event queue.
    #[must_use]
    pub fn state_file(&self) -> &Utf8Path {
        self.state_file.as_path()
    }
}

/// Errors raised while deriving charm state paths.
#[derive(Debug, Error)]
pub enum StatePathsError {
    /// The configured charm directory was empty.
    #[error("charm directory must not be empty")]
    EmptyCharmDir,
    /// Creating the state directory failed.
    #[error("failed to prepare state directory '{path}': {source}")]
    StateDirectory {
        /// Directory that could not be created.
        path: Utf8PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },
}
