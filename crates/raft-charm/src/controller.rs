//! The lifecycle controller: applies planned transitions to the runtime.

use std::sync::Arc;

use thiserror::Error;
use tracing::debug;

use crate::event::{CharmEvent, RelationId};
use crate::lifecycle::{ADDRESS_KEY, Effect, after_install, plan};
use crate::package::{CONTROLLER_CHANNEL, CONTROLLER_SNAP, PackageError, PackageManager, SnapState};
use crate::reporter::LifecycleReporter;
use crate::runtime::{Runtime, RuntimeError};
use crate::status::UnitStatus;

const CONTROLLER_TARGET: &str = concat!(env!("CARGO_PKG_NAME"), "::controller");

/// Result of delivering one event to the controller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HandlerOutcome {
    /// The event was fully handled.
    Handled,
    /// The event must be delivered again after a later state change.
    Deferred(CharmEvent),
}

/// Errors surfaced while handling an event.
///
/// Install failures are not errors: they are recorded as a blocked status.
/// Only failures of the runtime itself propagate.
#[derive(Debug, Error)]
pub enum ControllerError {
    /// The runtime collaborator failed.
    #[error("runtime operation failed while handling {event}: {source}")]
    Runtime {
        /// Event being handled.
        event: String,
        /// Underlying runtime error.
        #[source]
        source: RuntimeError,
    },
}

/// Reacts to install, start and relation-joined events.
pub struct LifecycleController<P, R> {
    packages: P,
    runtime: R,
    reporter: Arc<dyn LifecycleReporter>,
}

impl<P, R> LifecycleController<P, R>
where
    P: PackageManager,
    R: Runtime,
{
    /// Builds a controller over its collaborators.
    pub fn new(packages: P, runtime: R, reporter: Arc<dyn LifecycleReporter>) -> Self {
        Self {
            packages,
            runtime,
            reporter,
        }
    }

    /// Accessor for the runtime collaborator.
    #[must_use]
    pub fn runtime(&self) -> &R {
        &self.runtime
    }

    /// Delivers one event.
    ///
    /// Every decision is re-derived from the unit status held by the runtime,
    /// so redelivering a deferred event in a fresh process behaves the same
    /// as delivering it in the process that deferred it.
    pub fn handle(&self, event: &CharmEvent) -> Result<HandlerOutcome, ControllerError> {
        let wrap = |source: RuntimeError| ControllerError::Runtime {
            event: event.to_string(),
            source,
        };
        let status = self.runtime.unit_status().map_err(wrap)?;
        let transition = plan(&status, event);
        debug!(
            target: CONTROLLER_TARGET,
            %event,
            %status,
            effect = ?transition.effect,
            "planned transition"
        );
        if let Some(next) = &transition.status {
            self.set_status(next).map_err(wrap)?;
        }
        match transition.effect {
            Effect::None => {}
            Effect::EnsurePackage => {
                let result = self.install();
                self.set_status(&after_install(&result)).map_err(wrap)?;
            }
            Effect::PublishAddress(relation) => self.publish_address(&relation).map_err(wrap)?,
            Effect::WarnBlocked(relation) => self.reporter.relation_join_blocked(&relation),
            Effect::Defer => {
                self.reporter.event_deferred(event, &status);
                return Ok(HandlerOutcome::Deferred(event.clone()));
            }
        }
        Ok(HandlerOutcome::Handled)
    }

    fn set_status(&self, status: &UnitStatus) -> Result<(), RuntimeError> {
        self.runtime.set_unit_status(status)?;
        self.reporter.status_changed(status);
        Ok(())
    }

    fn install(&self) -> Result<(), PackageError> {
        self.reporter.install_starting(CONTROLLER_SNAP);
        let result = self.ensure_controller_package();
        match &result {
            Ok(()) => self.reporter.install_succeeded(CONTROLLER_SNAP),
            Err(error) => self.reporter.install_failed(CONTROLLER_SNAP, error),
        }
        result
    }

    fn ensure_controller_package(&self) -> Result<(), PackageError> {
        if self.packages.present(CONTROLLER_SNAP)? {
            self.reporter.install_skipped(CONTROLLER_SNAP);
            return Ok(());
        }
        self.packages
            .ensure(CONTROLLER_SNAP, SnapState::Latest, CONTROLLER_CHANNEL)
    }

    fn publish_address(&self, relation: &RelationId) -> Result<(), RuntimeError> {
        match self.runtime.bind_address(relation)? {
            Some(address) => {
                self.runtime
                    .set_relation_data(relation, ADDRESS_KEY, &address)?;
                self.reporter.address_published(relation, &address);
            }
            None => self.reporter.address_missing(relation),
        }
        Ok(())
    }
}
