//! Package manager collaborator.
//!
//! The charm only needs two operations from the package manager: a presence
//! check and an idempotent "ensure" that drives a package towards a desired
//! state. Errors are opaque to the caller; any failure aborts the current
//! install attempt.

mod snap;

use std::fmt;

pub use snap::SnapPackageManager;

/// Snap carrying the Patroni Raft controller daemon.
pub const CONTROLLER_SNAP: &str = "neppel-charmed-patroni-raft-controller";

/// Channel the controller snap is tracked from.
pub const CONTROLLER_CHANNEL: &str = "edge";

/// Desired state of a package.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SnapState {
    /// Installed and refreshed to the newest revision on the channel.
    Latest,
    /// Installed at any revision.
    Present,
    /// Not installed.
    Absent,
}

impl fmt::Display for SnapState {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Latest => "latest",
            Self::Present => "present",
            Self::Absent => "absent",
        };
        formatter.write_str(label)
    }
}

/// Error reported by the package manager.
#[derive(Debug, thiserror::Error)]
#[error("{message}")]
pub struct PackageError {
    message: String,
    #[source]
    source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl PackageError {
    /// Builds an error without an underlying source.
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            source: None,
        }
    }

    /// Builds an error that wraps an underlying source.
    #[must_use]
    pub fn with_source(
        message: impl Into<String>,
        source: impl Into<Box<dyn std::error::Error + Send + Sync>>,
    ) -> Self {
        Self {
            message: message.into(),
            source: Some(source.into()),
        }
    }

    /// Human-readable reason for the failure.
    #[must_use]
    pub fn message(&self) -> &str {
        self.message.as_str()
    }
}

/// Trait implemented by types capable of installing packages.
pub trait PackageManager {
    /// Reports whether the package is installed.
    fn present(&self, name: &str) -> Result<bool, PackageError>;

    /// Drives the package towards `state`, tracking `channel`.
    fn ensure(&self, name: &str, state: SnapState, channel: &str) -> Result<(), PackageError>;
}

impl<T> PackageManager for &T
where
    T: PackageManager + ?Sized,
{
    fn present(&self, name: &str) -> Result<bool, PackageError> {
        (**self).present(name)
    }

    fn ensure(&self, name: &str, state: SnapState, channel: &str) -> Result<(), PackageError> {
        (**self).ensure(name, state, channel)
    }
}
