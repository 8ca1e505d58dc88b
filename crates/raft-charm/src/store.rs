//! Persistence of deferred events between hook invocations.

use std::fs;
use std::io::{self, Write};

use camino::{Utf8Path, Utf8PathBuf};
use tempfile::Builder;
use thiserror::Error;

use raft_charm_config::StatePaths;

use crate::event::CharmEvent;

/// Errors raised while reading or writing the deferred-event queue.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The state file could not be read.
    #[error("failed to read deferred events from '{path}': {source}")]
    Read {
        /// State file path.
        path: Utf8PathBuf,
        /// Underlying IO error.
        #[source]
        source: io::Error,
    },
    /// The state file could not be written.
    #[error("failed to write deferred events to '{path}': {source}")]
    Write {
        /// State file path.
        path: Utf8PathBuf,
        /// Underlying IO error.
        #[source]
        source: io::Error,
    },
    /// The state file held something other than a list of events.
    #[error("deferred events in '{path}' are malformed: {source}")]
    Decode {
        /// State file path.
        path: Utf8PathBuf,
        /// Underlying JSON error.
        #[source]
        source: serde_json::Error,
    },
    /// The queue could not be serialised.
    #[error("failed to serialise deferred events: {source}")]
    Encode {
        /// Underlying JSON error.
        #[from]
        source: serde_json::Error,
    },
}

/// Storage for events awaiting redelivery, in delivery order.
pub trait DeferredEventStore {
    /// Loads the queued events. An empty store yields an empty queue.
    fn load(&self) -> Result<Vec<CharmEvent>, StoreError>;

    /// Replaces the queued events.
    fn save(&self, events: &[CharmEvent]) -> Result<(), StoreError>;
}

impl<T> DeferredEventStore for &T
where
    T: DeferredEventStore + ?Sized,
{
    fn load(&self) -> Result<Vec<CharmEvent>, StoreError> {
        (**self).load()
    }

    fn save(&self, events: &[CharmEvent]) -> Result<(), StoreError> {
        (**self).save(events)
    }
}

/// Store keeping the queue as a JSON array in the unit's state file.
#[derive(Debug, Clone)]
pub struct FileEventStore {
    path: Utf8PathBuf,
}

impl FileEventStore {
    /// Builds a store backed by the state file in `paths`.
    #[must_use]
    pub fn new(paths: &StatePaths) -> Self {
        Self::at(paths.state_file())
    }

    /// Builds a store backed by an explicit file.
    #[must_use]
    pub fn at(path: impl AsRef<Utf8Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    /// Location of the state file.
    #[must_use]
    pub fn path(&self) -> &Utf8Path {
        &self.path
    }
}

impl DeferredEventStore for FileEventStore {
    fn load(&self) -> Result<Vec<CharmEvent>, StoreError> {
        let contents = match fs::read_to_string(&self.path) {
            Ok(contents) => contents,
            Err(error) if error.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(source) => {
                return Err(StoreError::Read {
                    path: self.path.clone(),
                    source,
                });
            }
        };
        if contents.trim().is_empty() {
            return Ok(Vec::new());
        }
        serde_json::from_str(&contents).map_err(|source| StoreError::Decode {
            path: self.path.clone(),
            source,
        })
    }

    fn save(&self, events: &[CharmEvent]) -> Result<(), StoreError> {
        let payload = serde_json::to_vec_pretty(events)?;
        atomic_write(&self.path, &payload).map_err(|source| StoreError::Write {
            path: self.path.clone(),
            source,
        })
    }
}

/// Writes `contents` to `path` through a temporary sibling renamed into place.
fn atomic_write(path: &Utf8Path, contents: &[u8]) -> io::Result<()> {
    let directory = path.parent().ok_or_else(|| {
        io::Error::new(
            io::ErrorKind::NotFound,
            "state file did not have a parent directory",
        )
    })?;
    let directory = if directory.as_str().is_empty() {
        Utf8Path::new(".")
    } else {
        directory
    };

    let mut file = Builder::new()
        .prefix(path.file_name().unwrap_or("unit-state"))
        .tempfile_in(directory)?;
    file.write_all(contents)?;
    file.as_file().sync_all()?;
    file.persist(path).map_err(|error| error.error)?;
    Ok(())
}
