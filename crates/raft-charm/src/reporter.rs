//! Structured reporting of lifecycle facts.

use std::sync::Arc;

use raft_charm_config::Config;

use crate::bootstrap::BootstrapError;
use crate::event::{CharmEvent, RelationId};
use crate::package::PackageError;
use crate::status::UnitStatus;

const REPORTER_TARGET: &str = concat!(env!("CARGO_PKG_NAME"), "::lifecycle");

/// Observer the controller and dispatcher report lifecycle facts to.
pub trait LifecycleReporter: Send + Sync {
    /// Invoked before configuration loading begins.
    fn bootstrap_starting(&self);

    /// Invoked after bootstrap completes successfully.
    fn bootstrap_succeeded(&self, config: &Config);

    /// Invoked when bootstrap fails.
    fn bootstrap_failed(&self, error: &BootstrapError);

    /// Invoked after the unit status changes.
    fn status_changed(&self, status: &UnitStatus);

    /// Invoked before the package is ensured.
    fn install_starting(&self, package: &str);

    /// Invoked when the package is already installed and ensure is skipped.
    fn install_skipped(&self, package: &str);

    /// Invoked after the package is installed.
    fn install_succeeded(&self, package: &str);

    /// Invoked when installing the package fails.
    fn install_failed(&self, package: &str, error: &PackageError);

    /// Invoked after the address is written into the relation databag.
    fn address_published(&self, relation: &RelationId, address: &str);

    /// Invoked when no bind address is available for the relation.
    fn address_missing(&self, relation: &RelationId);

    /// Invoked when a relation join arrives while the unit is blocked.
    fn relation_join_blocked(&self, relation: &RelationId);

    /// Invoked when an event is deferred.
    fn event_deferred(&self, event: &CharmEvent, status: &UnitStatus);

    /// Invoked before a previously deferred event is delivered again.
    fn event_redelivered(&self, event: &CharmEvent);
}

impl<T> LifecycleReporter for Arc<T>
where
    T: LifecycleReporter + ?Sized,
{
    fn bootstrap_starting(&self) {
        (**self).bootstrap_starting();
    }

    fn bootstrap_succeeded(&self, config: &Config) {
        (**self).bootstrap_succeeded(config);
    }

    fn bootstrap_failed(&self, error: &BootstrapError) {
        (**self).bootstrap_failed(error);
    }

    fn status_changed(&self, status: &UnitStatus) {
        (**self).status_changed(status);
    }

    fn install_starting(&self, package: &str) {
        (**self).install_starting(package);
    }

    fn install_skipped(&self, package: &str) {
        (**self).install_skipped(package);
    }

    fn install_succeeded(&self, package: &str) {
        (**self).install_succeeded(package);
    }

    fn install_failed(&self, package: &str, error: &PackageError) {
        (**self).install_failed(package, error);
    }

    fn address_published(&self, relation: &RelationId, address: &str) {
        (**self).address_published(relation, address);
    }

    fn address_missing(&self, relation: &RelationId) {
        (**self).address_missing(relation);
    }

    fn relation_join_blocked(&self, relation: &RelationId) {
        (**self).relation_join_blocked(relation);
    }

    fn event_deferred(&self, event: &CharmEvent, status: &UnitStatus) {
        (**self).event_deferred(event, status);
    }

    fn event_redelivered(&self, event: &CharmEvent) {
        (**self).event_redelivered(event);
    }
}

/// Default reporter that records lifecycle facts using `tracing`.
#[derive(Debug, Default, Clone, Copy)]
pub struct StructuredLifecycleReporter;

impl StructuredLifecycleReporter {
    /// Builds a new reporter.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl LifecycleReporter for StructuredLifecycleReporter {
    fn bootstrap_starting(&self) {
        tracing::info!(
            target: REPORTER_TARGET,
            event = "bootstrap_starting",
            "starting charm bootstrap"
        );
    }

    fn bootstrap_succeeded(&self, config: &Config) {
        tracing::info!(
            target: REPORTER_TARGET,
            event = "bootstrap_succeeded",
            unit = config.unit_name(),
            charm_dir = %config.charm_dir(),
            hook = config.dispatch_path().unwrap_or("-"),
            "charm bootstrap complete"
        );
    }

    fn bootstrap_failed(&self, error: &BootstrapError) {
        tracing::error!(
            target: REPORTER_TARGET,
            event = "bootstrap_failed",
            error = %error,
            "charm bootstrap failed"
        );
    }

    fn status_changed(&self, status: &UnitStatus) {
        tracing::debug!(
            target: REPORTER_TARGET,
            event = "status_changed",
            status = %status.kind(),
            detail = status.message(),
            "unit status changed"
        );
    }

    fn install_starting(&self, package: &str) {
        tracing::info!(
            target: REPORTER_TARGET,
            event = "install_starting",
            package,
            "installing Patroni Raft Controller"
        );
    }

    fn install_skipped(&self, package: &str) {
        tracing::info!(
            target: REPORTER_TARGET,
            event = "install_skipped",
            package,
            "package already present"
        );
    }

    fn install_succeeded(&self, package: &str) {
        tracing::info!(
            target: REPORTER_TARGET,
            event = "install_succeeded",
            package,
            "Patroni Raft Controller installed"
        );
    }

    fn install_failed(&self, package: &str, error: &PackageError) {
        tracing::error!(
            target: REPORTER_TARGET,
            event = "install_failed",
            package,
            reason = error.message(),
            "failed to install Patroni Raft Controller"
        );
    }

    fn address_published(&self, relation: &RelationId, address: &str) {
        tracing::info!(
            target: REPORTER_TARGET,
            event = "address_published",
            %relation,
            address,
            "set address in application relation databag"
        );
    }

    fn address_missing(&self, relation: &RelationId) {
        tracing::warn!(
            target: REPORTER_TARGET,
            event = "address_missing",
            %relation,
            "no address found to set in application relation databag"
        );
    }

    fn relation_join_blocked(&self, relation: &RelationId) {
        tracing::warn!(
            target: REPORTER_TARGET,
            event = "relation_join_blocked",
            %relation,
            "unit is blocked, not setting address in application relation databag"
        );
    }

    fn event_deferred(&self, event: &CharmEvent, status: &UnitStatus) {
        tracing::debug!(
            target: REPORTER_TARGET,
            event = "event_deferred",
            deferred = %event,
            status = %status,
            "unit not ready, deferring event"
        );
    }

    fn event_redelivered(&self, event: &CharmEvent) {
        tracing::debug!(
            target: REPORTER_TARGET,
            event = "event_redelivered",
            redelivered = %event,
            "redelivering deferred event"
        );
    }
}
