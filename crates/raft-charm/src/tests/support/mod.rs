//! Test harness utilities for the charm's behavioural and unit suites.

mod config_loader;
mod package_manager;
mod reporter;
mod runtime;
mod store;
mod world;

pub use config_loader::{FailingConfigLoader, TestConfigLoader, UNIT_NAME};
pub use package_manager::{EnsureCall, ScriptedPackageManager};
pub use reporter::{LifecycleEvent, RecordingLifecycleReporter};
pub use runtime::InMemoryRuntime;
pub use store::MemoryEventStore;
pub use world::{TestWorld, peer_relation, world};
