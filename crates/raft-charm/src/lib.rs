//! Machine charm for the Patroni Raft controller.
//!
//! Each hook invocation runs the charm binary once. The binary loads the hook
//! context from the environment, initialises structured telemetry and hands
//! the event named by the dispatch path to a [`Dispatcher`]. The dispatcher
//! first redelivers any events deferred by earlier hooks, then delivers the
//! current one to the [`LifecycleController`].
//!
//! The controller keeps no state of its own. Every decision is derived from
//! the unit status held by the orchestration runtime:
//!
//! - `install` marks the unit as under maintenance, installs the controller
//!   snap unless it is already present and leaves the unit waiting, or
//!   blocked when the install failed;
//! - `start` activates the unit unless it is blocked;
//! - a peer joining the controller relation publishes the unit's bind
//!   address into the application databag once the unit is active. Joins
//!   that arrive while the unit is still settling are deferred.
//!
//! Collaborators sit behind traits ([`PackageManager`], [`Runtime`],
//! [`DeferredEventStore`], [`LifecycleReporter`]) so the lifecycle can be
//! exercised without a machine, a snap daemon or the runtime's hook tools.

mod bootstrap;
mod command;
mod controller;
mod dispatch;
mod event;
mod lifecycle;
mod package;
mod process;
mod reporter;
mod runtime;
mod status;
mod store;
mod telemetry;

pub use bootstrap::{
    BootstrapError, Charm, ConfigLoader, StaticConfigLoader, SystemConfigLoader, bootstrap_with,
};
pub use command::{CommandError, CommandOutput, CommandRunner, SystemCommandRunner};
pub use controller::{ControllerError, HandlerOutcome, LifecycleController};
pub use dispatch::{DispatchError, DispatchReport, Dispatcher};
pub use event::{CharmEvent, EventError, PEER_RELATION, RelationId};
pub use lifecycle::{
    ADDRESS_KEY, Effect, INSTALL_FAILED_MESSAGE, INSTALLING_MESSAGE, Transition, WAITING_MESSAGE,
    after_install, plan,
};
pub use package::{
    CONTROLLER_CHANNEL, CONTROLLER_SNAP, PackageError, PackageManager, SnapPackageManager,
    SnapState,
};
pub use process::{LaunchError, run_charm};
pub use reporter::{LifecycleReporter, StructuredLifecycleReporter};
pub use runtime::{HookTools, Runtime, RuntimeError};
pub use status::{StatusKind, UnitStatus};
pub use store::{DeferredEventStore, FileEventStore, StoreError};
pub use telemetry::{TelemetryError, TelemetryHandle};

#[cfg(test)]
mod tests;
