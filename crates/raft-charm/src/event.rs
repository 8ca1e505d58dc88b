//! Events delivered by the orchestration runtime.
//!
//! The runtime names the hook it is running through the dispatch path. Only
//! three hooks matter to the charm; every other hook still runs the
//! dispatcher so deferred events get a chance to be redelivered.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use raft_charm_config::Config;

/// Endpoint of the relation the controller publishes its address on.
pub const PEER_RELATION: &str = "patroni-raft-controller";

const RELATION_JOINED_SUFFIX: &str = "-relation-joined";

/// Identity of one relation, as reported by the runtime (`<endpoint>:<id>`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct RelationId {
    endpoint: String,
    id: u32,
}

impl RelationId {
    /// Builds a relation id for the given endpoint and number.
    #[must_use]
    pub fn new(endpoint: impl Into<String>, id: u32) -> Self {
        Self {
            endpoint: endpoint.into(),
            id,
        }
    }

    /// Relation endpoint name.
    #[must_use]
    pub fn endpoint(&self) -> &str {
        self.endpoint.as_str()
    }

    /// Numeric relation id.
    #[must_use]
    pub fn id(&self) -> u32 {
        self.id
    }
}

impl fmt::Display for RelationId {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(formatter, "{}:{}", self.endpoint, self.id)
    }
}

impl FromStr for RelationId {
    type Err = EventError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let invalid = || EventError::InvalidRelationId {
            value: value.to_owned(),
        };
        let (endpoint, id) = value.rsplit_once(':').ok_or_else(invalid)?;
        if endpoint.is_empty() {
            return Err(invalid());
        }
        let id = id.parse::<u32>().map_err(|_| invalid())?;
        Ok(Self::new(endpoint, id))
    }
}

impl TryFrom<String> for RelationId {
    type Error = EventError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<RelationId> for String {
    fn from(relation: RelationId) -> Self {
        relation.to_string()
    }
}

/// Events the lifecycle controller reacts to.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum CharmEvent {
    /// The charm was deployed on the machine.
    Install,
    /// The unit should start its workload.
    Start,
    /// A peer joined the controller relation.
    RelationJoined {
        /// Relation the peer joined.
        relation: RelationId,
    },
}

impl CharmEvent {
    /// Builds a relation-joined event.
    #[must_use]
    pub fn relation_joined(relation: RelationId) -> Self {
        Self::RelationJoined { relation }
    }

    /// Derives the event for the hook named in the configuration.
    ///
    /// Returns `Ok(None)` for hooks the charm does not observe.
    pub fn from_config(config: &Config) -> Result<Option<Self>, EventError> {
        let Some(path) = config.dispatch_path() else {
            return Ok(None);
        };
        let hook = path.rsplit('/').next().unwrap_or(path);
        match hook {
            "install" => Ok(Some(Self::Install)),
            "start" => Ok(Some(Self::Start)),
            _ => match hook.strip_suffix(RELATION_JOINED_SUFFIX) {
                Some(endpoint) if endpoint == PEER_RELATION => {
                    let relation = relation_from_config(hook, config)?;
                    Ok(Some(Self::relation_joined(relation)))
                }
                _ => Ok(None),
            },
        }
    }
}

fn relation_from_config(hook: &str, config: &Config) -> Result<RelationId, EventError> {
    let raw = config
        .relation_id()
        .ok_or_else(|| EventError::MissingRelationId {
            hook: hook.to_owned(),
        })?;
    let relation: RelationId = raw.parse()?;
    if relation.endpoint() != PEER_RELATION {
        return Err(EventError::RelationMismatch {
            hook: hook.to_owned(),
            relation: relation.to_string(),
        });
    }
    Ok(relation)
}

impl fmt::Display for CharmEvent {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Install => formatter.write_str("install"),
            Self::Start => formatter.write_str("start"),
            Self::RelationJoined { relation } => write!(formatter, "relation-joined({relation})"),
        }
    }
}

/// Errors raised while deriving the current event.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum EventError {
    /// A relation hook ran without a relation id.
    #[error("hook '{hook}' did not receive a relation id")]
    MissingRelationId {
        /// Hook name.
        hook: String,
    },
    /// The relation id did not have the `<endpoint>:<id>` shape.
    #[error("invalid relation id '{value}'")]
    InvalidRelationId {
        /// Offending value.
        value: String,
    },
    /// The relation id belongs to another endpoint than the hook.
    #[error("hook '{hook}' received relation id '{relation}' for another endpoint")]
    RelationMismatch {
        /// Hook name.
        hook: String,
        /// Relation id received.
        relation: String,
    },
}
