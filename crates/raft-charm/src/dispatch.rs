//! Hook dispatch: redelivers deferred events, then delivers the current one.

use std::sync::Arc;

use thiserror::Error;
use tracing::{debug, info};

use crate::controller::{ControllerError, HandlerOutcome, LifecycleController};
use crate::event::CharmEvent;
use crate::package::PackageManager;
use crate::reporter::LifecycleReporter;
use crate::runtime::Runtime;
use crate::store::{DeferredEventStore, StoreError};

const DISPATCH_TARGET: &str = concat!(env!("CARGO_PKG_NAME"), "::dispatch");

/// Counts of what one dispatch did.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DispatchReport {
    /// Events fully handled, redeliveries included.
    pub handled: usize,
    /// Events left in the queue afterwards.
    pub deferred: usize,
}

/// Errors surfaced by a dispatch.
#[derive(Debug, Error)]
pub enum DispatchError {
    /// The deferred-event store failed.
    #[error("deferred event store failed: {source}")]
    Store {
        /// Underlying store error.
        #[source]
        source: StoreError,
    },
    /// The controller failed while handling an event.
    #[error("event handling failed: {source}")]
    Controller {
        /// Underlying controller error.
        #[from]
        source: ControllerError,
    },
}

impl From<StoreError> for DispatchError {
    fn from(source: StoreError) -> Self {
        Self::Store { source }
    }
}

/// Drives one hook invocation through the controller.
pub struct Dispatcher<P, R, S> {
    controller: LifecycleController<P, R>,
    store: S,
    reporter: Arc<dyn LifecycleReporter>,
}

impl<P, R, S> Dispatcher<P, R, S>
where
    P: PackageManager,
    R: Runtime,
    S: DeferredEventStore,
{
    /// Builds a dispatcher around a controller and its deferred-event store.
    pub fn new(
        controller: LifecycleController<P, R>,
        store: S,
        reporter: Arc<dyn LifecycleReporter>,
    ) -> Self {
        Self {
            controller,
            store,
            reporter,
        }
    }

    /// Accessor for the wrapped controller.
    #[must_use]
    pub fn controller(&self) -> &LifecycleController<P, R> {
        &self.controller
    }

    /// Accessor for the deferred-event store.
    #[must_use]
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Redelivers every queued event in order, then delivers `current`.
    ///
    /// Events that defer again keep their place in the queue; a newly
    /// deferred event is appended unless an identical one is already queued.
    /// The queue is written back only when it changed. A controller error
    /// aborts the dispatch without touching the stored queue, so the
    /// runtime's retry of the hook starts from the same state.
    pub fn dispatch(&self, current: Option<CharmEvent>) -> Result<DispatchReport, DispatchError> {
        let queued = self.store.load()?;
        let mut report = DispatchReport::default();
        let mut remaining = Vec::with_capacity(queued.len() + 1);

        for event in &queued {
            self.reporter.event_redelivered(event);
            match self.controller.handle(event)? {
                HandlerOutcome::Handled => report.handled += 1,
                HandlerOutcome::Deferred(event) => remaining.push(event),
            }
        }

        if let Some(event) = current {
            debug!(target: DISPATCH_TARGET, %event, "delivering event");
            match self.controller.handle(&event)? {
                HandlerOutcome::Handled => report.handled += 1,
                HandlerOutcome::Deferred(event) => {
                    if !remaining.contains(&event) {
                        remaining.push(event);
                    }
                }
            }
        }

        if remaining != queued {
            self.store.save(&remaining)?;
        }
        report.deferred = remaining.len();
        info!(
            target: DISPATCH_TARGET,
            handled = report.handled,
            deferred = report.deferred,
            "dispatch complete"
        );
        Ok(report)
    }
}
