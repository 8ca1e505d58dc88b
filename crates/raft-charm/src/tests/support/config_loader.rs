//! Configuration loaders for bootstrap scenarios.

use camino::Utf8PathBuf;
use tempfile::TempDir;

use raft_charm_config::{CHARM_DIR_VAR, Config, ConfigError};

use crate::bootstrap::ConfigLoader;

/// Unit name used throughout the suites.
pub const UNIT_NAME: &str = "patroni-raft-controller/0";

/// Loader that points the charm directory at a temporary directory.
pub struct TestConfigLoader {
    charm_dir: TempDir,
    dispatch_path: Option<String>,
    relation_id: Option<String>,
}

impl TestConfigLoader {
    #[must_use]
    pub fn new() -> Self {
        Self {
            charm_dir: TempDir::new().expect("failed to create temporary charm directory"),
            dispatch_path: None,
            relation_id: None,
        }
    }

    /// Names the hook being run.
    #[must_use]
    pub fn with_hook(mut self, hook: &str) -> Self {
        self.dispatch_path = Some(format!("hooks/{hook}"));
        self
    }

    /// Sets the relation id exported to relation hooks.
    #[must_use]
    pub fn with_relation(mut self, relation: &str) -> Self {
        self.relation_id = Some(relation.to_owned());
        self
    }

    /// Charm directory handed to the charm.
    #[must_use]
    pub fn charm_dir(&self) -> Utf8PathBuf {
        Utf8PathBuf::from_path_buf(self.charm_dir.path().to_path_buf())
            .expect("temporary charm directory was not valid UTF-8")
    }
}

impl Default for TestConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigLoader for TestConfigLoader {
    fn load(&self) -> Result<Config, ConfigError> {
        Ok(Config {
            charm_dir: self.charm_dir(),
            dispatch_path: self.dispatch_path.clone(),
            relation_id: self.relation_id.clone(),
            ..Config::for_unit(UNIT_NAME)
        })
    }
}

/// Loader that fails the way a hook run outside the runtime does.
pub struct FailingConfigLoader;

impl ConfigLoader for FailingConfigLoader {
    fn load(&self) -> Result<Config, ConfigError> {
        Config::from_vars([(CHARM_DIR_VAR, "/var/lib/juju/charm")])
    }
}
