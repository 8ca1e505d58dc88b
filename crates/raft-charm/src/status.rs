//! Unit status values exchanged with the orchestration runtime.

use std::fmt;

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Status category understood by the runtime's status tools.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize, EnumString, Display,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum StatusKind {
    /// No status has been reported yet.
    Unknown,
    /// The unit is performing work that needs no operator action.
    Maintenance,
    /// The unit is waiting on something outside its control.
    Waiting,
    /// The unit needs operator intervention.
    Blocked,
    /// The workload is running.
    Active,
    /// A hook failed; only the runtime sets this.
    Error,
}

/// Status held by the unit, as seen by the runtime.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum UnitStatus {
    /// Implicit pre-install state.
    #[default]
    Unknown,
    /// Work in progress, with a human-readable message.
    Maintenance(String),
    /// Waiting on initialisation or another party.
    Waiting(String),
    /// Stuck until an operator remediates the cause.
    Blocked(String),
    /// The workload is installed and serving.
    Active,
    /// A hook failed and the runtime is retrying it.
    Error(String),
}

impl UnitStatus {
    /// Builds a maintenance status.
    #[must_use]
    pub fn maintenance(message: impl Into<String>) -> Self {
        Self::Maintenance(message.into())
    }

    /// Builds a waiting status.
    #[must_use]
    pub fn waiting(message: impl Into<String>) -> Self {
        Self::Waiting(message.into())
    }

    /// Builds a blocked status.
    #[must_use]
    pub fn blocked(message: impl Into<String>) -> Self {
        Self::Blocked(message.into())
    }

    /// Rebuilds a status from the category and message reported by the runtime.
    ///
    /// Messages attached to `active` and `unknown` are dropped.
    #[must_use]
    pub fn from_parts(kind: StatusKind, message: impl Into<String>) -> Self {
        match kind {
            StatusKind::Unknown => Self::Unknown,
            StatusKind::Maintenance => Self::Maintenance(message.into()),
            StatusKind::Waiting => Self::Waiting(message.into()),
            StatusKind::Blocked => Self::Blocked(message.into()),
            StatusKind::Active => Self::Active,
            StatusKind::Error => Self::Error(message.into()),
        }
    }

    /// Status category.
    #[must_use]
    pub fn kind(&self) -> StatusKind {
        match self {
            Self::Unknown => StatusKind::Unknown,
            Self::Maintenance(_) => StatusKind::Maintenance,
            Self::Waiting(_) => StatusKind::Waiting,
            Self::Blocked(_) => StatusKind::Blocked,
            Self::Active => StatusKind::Active,
            Self::Error(_) => StatusKind::Error,
        }
    }

    /// Message attached to the status; empty for `active` and `unknown`.
    #[must_use]
    pub fn message(&self) -> &str {
        match self {
            Self::Maintenance(message)
            | Self::Waiting(message)
            | Self::Blocked(message)
            | Self::Error(message) => message.as_str(),
            Self::Unknown | Self::Active => "",
        }
    }

    /// Returns `true` for [`UnitStatus::Active`].
    #[must_use]
    pub fn is_active(&self) -> bool {
        matches!(self, Self::Active)
    }

    /// Returns `true` for [`UnitStatus::Blocked`].
    #[must_use]
    pub fn is_blocked(&self) -> bool {
        matches!(self, Self::Blocked(_))
    }
}

impl fmt::Display for UnitStatus {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        let message = self.message();
        if message.is_empty() {
            write!(formatter, "{}", self.kind())
        } else {
            write!(formatter, "{}: {message}", self.kind())
        }
    }
}
