//! Deferred-event store kept in memory, counting writes.

use std::sync::{Arc, Mutex, MutexGuard};

use crate::event::CharmEvent;
use crate::store::{DeferredEventStore, StoreError};

#[derive(Debug, Default)]
struct QueueState {
    events: Vec<CharmEvent>,
    saves: usize,
}

/// In-memory queue shared between clones.
#[derive(Debug, Clone, Default)]
pub struct MemoryEventStore {
    state: Arc<Mutex<QueueState>>,
}

impl MemoryEventStore {
    fn state(&self) -> MutexGuard<'_, QueueState> {
        self.state.lock().expect("event store mutex poisoned")
    }

    /// Seeds the queue as if an earlier hook had deferred `events`.
    pub fn seed(&self, events: Vec<CharmEvent>) {
        self.state().events = events;
    }

    /// Queued events.
    #[must_use]
    pub fn queued(&self) -> Vec<CharmEvent> {
        self.state().events.clone()
    }

    /// Number of times the queue was written.
    #[must_use]
    pub fn saves(&self) -> usize {
        self.state().saves
    }
}

impl DeferredEventStore for MemoryEventStore {
    fn load(&self) -> Result<Vec<CharmEvent>, StoreError> {
        Ok(self.queued())
    }

    fn save(&self, events: &[CharmEvent]) -> Result<(), StoreError> {
        let mut state = self.state();
        state.events = events.to_vec();
        state.saves += 1;
        Ok(())
    }
}
