//! Test double for [`LifecycleReporter`] that records lifecycle facts for
//! assertions.

use std::sync::Mutex;

use raft_charm_config::Config;

use crate::bootstrap::BootstrapError;
use crate::event::{CharmEvent, RelationId};
use crate::package::PackageError;
use crate::reporter::LifecycleReporter;
use crate::status::UnitStatus;

/// Lifecycle facts tracked during scenarios.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LifecycleEvent {
    BootstrapStarting,
    BootstrapSucceeded,
    BootstrapFailed(String),
    StatusChanged(UnitStatus),
    InstallStarting,
    InstallSkipped,
    InstallSucceeded,
    InstallFailed(String),
    AddressPublished { relation: RelationId, address: String },
    AddressMissing(RelationId),
    RelationJoinBlocked(RelationId),
    EventDeferred(CharmEvent),
    EventRedelivered(CharmEvent),
}

/// Records lifecycle facts for assertions.
#[derive(Debug, Default)]
pub struct RecordingLifecycleReporter {
    events: Mutex<Vec<LifecycleEvent>>,
}

impl RecordingLifecycleReporter {
    /// Captures a copy of the recorded events.
    #[must_use]
    pub fn events(&self) -> Vec<LifecycleEvent> {
        self.events
            .lock()
            .expect("lifecycle reporter mutex poisoned")
            .clone()
    }

    /// Returns whether any recorded event satisfies `predicate`.
    pub fn recorded(&self, predicate: impl Fn(&LifecycleEvent) -> bool) -> bool {
        self.events().iter().any(predicate)
    }

    fn record(&self, event: LifecycleEvent) {
        self.events
            .lock()
            .expect("lifecycle reporter mutex poisoned")
            .push(event);
    }
}

impl LifecycleReporter for RecordingLifecycleReporter {
    fn bootstrap_starting(&self) {
        self.record(LifecycleEvent::BootstrapStarting);
    }

    fn bootstrap_succeeded(&self, _config: &Config) {
        self.record(LifecycleEvent::BootstrapSucceeded);
    }

    fn bootstrap_failed(&self, error: &BootstrapError) {
        self.record(LifecycleEvent::BootstrapFailed(error.to_string()));
    }

    fn status_changed(&self, status: &UnitStatus) {
        self.record(LifecycleEvent::StatusChanged(status.clone()));
    }

    fn install_starting(&self, _package: &str) {
        self.record(LifecycleEvent::InstallStarting);
    }

    fn install_skipped(&self, _package: &str) {
        self.record(LifecycleEvent::InstallSkipped);
    }

    fn install_succeeded(&self, _package: &str) {
        self.record(LifecycleEvent::InstallSucceeded);
    }

    fn install_failed(&self, _package: &str, error: &PackageError) {
        self.record(LifecycleEvent::InstallFailed(error.message().to_owned()));
    }

    fn address_published(&self, relation: &RelationId, address: &str) {
        self.record(LifecycleEvent::AddressPublished {
            relation: relation.clone(),
            address: address.to_owned(),
        });
    }

    fn address_missing(&self, relation: &RelationId) {
        self.record(LifecycleEvent::AddressMissing(relation.clone()));
    }

    fn relation_join_blocked(&self, relation: &RelationId) {
        self.record(LifecycleEvent::RelationJoinBlocked(relation.clone()));
    }

    fn event_deferred(&self, event: &CharmEvent, _status: &UnitStatus) {
        self.record(LifecycleEvent::EventDeferred(event.clone()));
    }

    fn event_redelivered(&self, event: &CharmEvent) {
        self.record(LifecycleEvent::EventRedelivered(event.clone()));
    }
}
