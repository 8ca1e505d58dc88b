//! Entry point wiring for a single hook invocation.

use std::sync::Arc;

use thiserror::Error;
use tracing::info;

use raft_charm_config::Config;

use crate::bootstrap::{BootstrapError, ConfigLoader, SystemConfigLoader, bootstrap_with};
use crate::controller::LifecycleController;
use crate::dispatch::{DispatchError, DispatchReport, Dispatcher};
use crate::event::{CharmEvent, EventError};
use crate::package::{PackageManager, SnapPackageManager};
use crate::reporter::{LifecycleReporter, StructuredLifecycleReporter};
use crate::runtime::{HookTools, Runtime};
use crate::store::FileEventStore;
use crate::telemetry;

const PROCESS_TARGET: &str = concat!(env!("CARGO_PKG_NAME"), "::process");

/// Errors surfaced while running a hook.
#[derive(Debug, Error)]
pub enum LaunchError {
    /// Bootstrapping the hook run failed.
    #[error("charm bootstrap failed: {source}")]
    Bootstrap {
        /// Underlying bootstrap error.
        #[source]
        source: BootstrapError,
    },
    /// The hook context did not describe a valid event.
    #[error("invalid hook context: {source}")]
    Event {
        /// Underlying event error.
        #[source]
        source: EventError,
    },
    /// Dispatching the event failed.
    #[error("dispatch failed: {source}")]
    Dispatch {
        /// Underlying dispatch error.
        #[source]
        source: DispatchError,
    },
}

impl From<BootstrapError> for LaunchError {
    fn from(source: BootstrapError) -> Self {
        Self::Bootstrap { source }
    }
}

impl From<EventError> for LaunchError {
    fn from(source: EventError) -> Self {
        Self::Event { source }
    }
}

impl From<DispatchError> for LaunchError {
    fn from(source: DispatchError) -> Self {
        Self::Dispatch { source }
    }
}

/// Collaborators required to run a hook.
pub(crate) struct LaunchPlan<L, P, F> {
    pub(crate) loader: L,
    pub(crate) reporter: Arc<dyn LifecycleReporter>,
    pub(crate) packages: P,
    /// Builds the runtime once the unit's configuration is known.
    pub(crate) runtime: F,
}

/// Runs the current hook using the production collaborators.
pub fn run_charm() -> Result<DispatchReport, LaunchError> {
    let plan = LaunchPlan {
        loader: SystemConfigLoader,
        reporter: Arc::new(StructuredLifecycleReporter::new()),
        packages: SnapPackageManager::system(),
        runtime: |config: &Config| HookTools::system(config.app_name()),
    };
    run_charm_with(plan)
}

/// Runs the current hook with injected collaborators.
pub(crate) fn run_charm_with<L, P, R, F>(plan: LaunchPlan<L, P, F>) -> Result<DispatchReport, LaunchError>
where
    L: ConfigLoader,
    P: PackageManager,
    R: Runtime,
    F: FnOnce(&Config) -> R,
{
    let LaunchPlan {
        loader,
        reporter,
        packages,
        runtime,
    } = plan;

    let charm = bootstrap_with(&loader, Arc::clone(&reporter))?;
    let config = charm.config();
    let _hook = telemetry::hook_span(config).entered();
    let event = CharmEvent::from_config(config)?;
    let event_label = event
        .as_ref()
        .map_or_else(|| "none".to_owned(), ToString::to_string);
    info!(target: PROCESS_TARGET, event = %event_label, "running hook");

    let controller = LifecycleController::new(packages, runtime(config), Arc::clone(&reporter));
    let store = FileEventStore::new(charm.paths());
    let dispatcher = Dispatcher::new(controller, store, reporter);
    Ok(dispatcher.dispatch(event)?)
}
