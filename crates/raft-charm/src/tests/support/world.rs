//! BDD test world: owns the runtime, package manager, store and reporter
//! doubles plus the results of the last delivery.

use std::cell::RefCell;
use std::sync::Arc;

use crate::controller::{HandlerOutcome, LifecycleController};
use crate::dispatch::{DispatchReport, Dispatcher};
use crate::event::{CharmEvent, PEER_RELATION, RelationId};

use super::package_manager::ScriptedPackageManager;
use super::reporter::RecordingLifecycleReporter;
use super::runtime::InMemoryRuntime;
use super::store::MemoryEventStore;

/// Scenario world shared across BDD steps.
pub struct TestWorld {
    pub runtime: InMemoryRuntime,
    pub packages: ScriptedPackageManager,
    pub store: MemoryEventStore,
    pub reporter: Arc<RecordingLifecycleReporter>,
    outcome: Option<Result<HandlerOutcome, String>>,
    report: Option<Result<DispatchReport, String>>,
}

impl TestWorld {
    /// Builds a world with a fresh unit and an empty queue.
    #[must_use]
    pub fn new() -> Self {
        Self {
            runtime: InMemoryRuntime::default(),
            packages: ScriptedPackageManager::default(),
            store: MemoryEventStore::default(),
            reporter: Arc::new(RecordingLifecycleReporter::default()),
            outcome: None,
            report: None,
        }
    }

    /// Controller wired to the world's doubles.
    #[must_use]
    pub fn controller(&self) -> LifecycleController<ScriptedPackageManager, InMemoryRuntime> {
        LifecycleController::new(
            self.packages.clone(),
            self.runtime.clone(),
            self.reporter.clone(),
        )
    }

    /// Delivers one event straight to the controller.
    pub fn deliver(&mut self, event: &CharmEvent) {
        self.outcome = Some(
            self.controller()
                .handle(event)
                .map_err(|error| error.to_string()),
        );
    }

    /// Runs one dispatch for `event` through the deferred-event queue.
    pub fn dispatch(&mut self, event: Option<CharmEvent>) {
        let dispatcher = Dispatcher::new(
            self.controller(),
            self.store.clone(),
            self.reporter.clone(),
        );
        self.report = Some(
            dispatcher
                .dispatch(event)
                .map_err(|error| error.to_string()),
        );
    }

    /// Outcome of the last controller delivery.
    #[must_use]
    pub fn outcome(&self) -> Option<&Result<HandlerOutcome, String>> {
        self.outcome.as_ref()
    }

    /// Report of the last dispatch.
    #[must_use]
    pub fn report(&self) -> Option<&Result<DispatchReport, String>> {
        self.report.as_ref()
    }
}

impl Default for TestWorld {
    fn default() -> Self {
        Self::new()
    }
}

/// Peer relation with the given id.
#[must_use]
pub fn peer_relation(id: u32) -> RelationId {
    RelationId::new(PEER_RELATION, id)
}

/// Default test world fixture.
#[must_use]
pub fn world() -> RefCell<TestWorld> {
    RefCell::new(TestWorld::new())
}
