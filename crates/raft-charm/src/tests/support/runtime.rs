//! In-memory [`Runtime`] standing in for the orchestration runtime.
//!
//! Clones share state, so a scenario can hand one clone to the controller
//! and inspect the other.

use std::collections::{BTreeMap, HashMap};
use std::sync::{Arc, Mutex, MutexGuard};

use crate::command::CommandError;
use crate::event::RelationId;
use crate::runtime::{Runtime, RuntimeError};
use crate::status::UnitStatus;

#[derive(Debug, Default)]
struct RuntimeState {
    status: UnitStatus,
    status_history: Vec<UnitStatus>,
    bind_address: Option<String>,
    databags: HashMap<RelationId, BTreeMap<String, String>>,
    relation_writes: usize,
    unavailable: bool,
}

/// Runtime keeping status, bind address and databags in memory.
#[derive(Debug, Clone, Default)]
pub struct InMemoryRuntime {
    state: Arc<Mutex<RuntimeState>>,
}

impl InMemoryRuntime {
    fn state(&self) -> MutexGuard<'_, RuntimeState> {
        self.state.lock().expect("runtime mutex poisoned")
    }

    /// Overrides the unit status without recording it as a transition.
    pub fn force_status(&self, status: UnitStatus) {
        self.state().status = status;
    }

    /// Sets the address `network-get` would report.
    pub fn set_bind_address(&self, address: Option<&str>) {
        self.state().bind_address = address.map(str::to_owned);
    }

    /// Makes every subsequent call fail as if the hook tools were missing.
    pub fn make_unavailable(&self) {
        self.state().unavailable = true;
    }

    /// Current unit status.
    #[must_use]
    pub fn status(&self) -> UnitStatus {
        self.state().status.clone()
    }

    /// Every status the controller set, in order.
    #[must_use]
    pub fn status_history(&self) -> Vec<UnitStatus> {
        self.state().status_history.clone()
    }

    /// Application databag of `relation`.
    #[must_use]
    pub fn databag(&self, relation: &RelationId) -> BTreeMap<String, String> {
        self.state()
            .databags
            .get(relation)
            .cloned()
            .unwrap_or_default()
    }

    /// Number of databag writes performed.
    #[must_use]
    pub fn relation_writes(&self) -> usize {
        self.state().relation_writes
    }

    fn check_available(&self, tool: &'static str) -> Result<(), RuntimeError> {
        if self.state().unavailable {
            return Err(RuntimeError::Tool {
                tool,
                source: CommandError::Spawn {
                    program: tool.to_owned(),
                    source: std::io::Error::from(std::io::ErrorKind::NotFound),
                },
            });
        }
        Ok(())
    }
}

impl Runtime for InMemoryRuntime {
    fn unit_status(&self) -> Result<UnitStatus, RuntimeError> {
        self.check_available("status-get")?;
        Ok(self.status())
    }

    fn set_unit_status(&self, status: &UnitStatus) -> Result<(), RuntimeError> {
        self.check_available("status-set")?;
        let mut state = self.state();
        state.status = status.clone();
        state.status_history.push(status.clone());
        Ok(())
    }

    fn bind_address(&self, _relation: &RelationId) -> Result<Option<String>, RuntimeError> {
        self.check_available("network-get")?;
        Ok(self.state().bind_address.clone())
    }

    fn relation_data(
        &self,
        relation: &RelationId,
        key: &str,
    ) -> Result<Option<String>, RuntimeError> {
        self.check_available("relation-get")?;
        Ok(self.databag(relation).remove(key))
    }

    fn set_relation_data(
        &self,
        relation: &RelationId,
        key: &str,
        value: &str,
    ) -> Result<(), RuntimeError> {
        self.check_available("relation-set")?;
        let mut state = self.state();
        state
            .databags
            .entry(relation.clone())
            .or_default()
            .insert(key.to_owned(), value.to_owned());
        state.relation_writes += 1;
        Ok(())
    }
}
