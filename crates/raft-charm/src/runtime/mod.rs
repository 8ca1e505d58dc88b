//! Orchestration runtime collaborator.
//!
//! The runtime owns every piece of state the charm touches: the unit status,
//! the relation databags and the network bindings. [`Runtime`] is the seam
//! the controller talks through; [`HookTools`] implements it with the tools
//! the runtime places on `PATH` for each hook.

mod hook_tools;

use thiserror::Error;

use crate::command::CommandError;
use crate::event::RelationId;
use crate::status::{StatusKind, UnitStatus};

pub use hook_tools::HookTools;

/// Access to unit status, relation data, and network bindings.
pub trait Runtime {
    /// Reads the unit's current status.
    fn unit_status(&self) -> Result<UnitStatus, RuntimeError>;

    /// Replaces the unit's status.
    fn set_unit_status(&self, status: &UnitStatus) -> Result<(), RuntimeError>;

    /// Resolves the address bound to the relation's endpoint, if any.
    ///
    /// The value is returned as the runtime reports it. It is usually an IP
    /// address, but a hostname is passed through unchanged.
    fn bind_address(&self, relation: &RelationId) -> Result<Option<String>, RuntimeError>;

    /// Reads one key from this application's side of the relation.
    fn relation_data(&self, relation: &RelationId, key: &str)
    -> Result<Option<String>, RuntimeError>;

    /// Writes one key into this application's side of the relation.
    fn set_relation_data(
        &self,
        relation: &RelationId,
        key: &str,
        value: &str,
    ) -> Result<(), RuntimeError>;
}

impl<T> Runtime for &T
where
    T: Runtime + ?Sized,
{
    fn unit_status(&self) -> Result<UnitStatus, RuntimeError> {
        (**self).unit_status()
    }

    fn set_unit_status(&self, status: &UnitStatus) -> Result<(), RuntimeError> {
        (**self).set_unit_status(status)
    }

    fn bind_address(&self, relation: &RelationId) -> Result<Option<String>, RuntimeError> {
        (**self).bind_address(relation)
    }

    fn relation_data(
        &self,
        relation: &RelationId,
        key: &str,
    ) -> Result<Option<String>, RuntimeError> {
        (**self).relation_data(relation, key)
    }

    fn set_relation_data(
        &self,
        relation: &RelationId,
        key: &str,
        value: &str,
    ) -> Result<(), RuntimeError> {
        (**self).set_relation_data(relation, key, value)
    }
}

/// Errors reported by the runtime collaborator.
#[derive(Debug, Error)]
pub enum RuntimeError {
    /// A hook tool could not be run or exited unsuccessfully.
    #[error("hook tool '{tool}' failed: {source}")]
    Tool {
        /// Hook tool name.
        tool: &'static str,
        /// Underlying command error.
        #[source]
        source: CommandError,
    },
    /// A hook tool printed output that could not be decoded.
    #[error("failed to decode output of '{tool}': {source}")]
    Decode {
        /// Hook tool name.
        tool: &'static str,
        /// Underlying JSON error.
        #[source]
        source: serde_json::Error,
    },
    /// The runtime reported a status category the charm does not know.
    #[error("unrecognised unit status '{value}'")]
    UnknownStatus {
        /// Offending value.
        value: String,
    },
    /// The charm attempted to set a status only the runtime may set.
    #[error("unit status '{kind}' cannot be set by the charm")]
    UnsettableStatus {
        /// Rejected status category.
        kind: StatusKind,
    },
}
