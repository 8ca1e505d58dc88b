//! Shared configuration for the Patroni Raft controller charm.
//!
//! Every hook invocation receives its context from the orchestration runtime
//! through a fixed set of environment variables. This crate turns those into
//! a validated [`Config`] and derives the paths the charm uses for its own
//! state. The charm exposes no flags or configuration files of its own; log
//! settings are fixed defaults that tests may override.

mod defaults;
mod logging;
mod paths;

use std::collections::HashMap;
use std::env;

use camino::{Utf8Path, Utf8PathBuf};
use thiserror::Error;

pub use defaults::{
    CHARM_DIR_VAR, DEFAULT_LOG_FILTER, DISPATCH_PATH_VAR, HOOK_NAME_VAR, RELATION_ID_VAR,
    STATE_FILE_NAME, UNIT_NAME_VAR, default_charm_dir, default_log_filter,
    default_log_filter_string, default_log_format,
};
pub use logging::{LogFormat, LogFormatParseError};
pub use paths::{StatePaths, StatePathsError};

/// Resolved hook context and logging settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Unit name in the form `<application>/<number>`.
    pub unit_name: String,
    /// Root directory of the deployed charm.
    pub charm_dir: Utf8PathBuf,
    /// Dispatch path naming the hook being run, e.g. `hooks/install`.
    pub dispatch_path: Option<String>,
    /// Relation id for relation hooks, e.g. `patroni-raft-controller:3`.
    pub relation_id: Option<String>,
    /// `tracing` filter expression.
    pub log_filter: String,
    /// Output format for log lines.
    pub log_format: LogFormat,
}

/// Errors raised while reading the hook environment.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// A required variable was not exported by the runtime.
    #[error("required environment variable {name} is not set")]
    Missing {
        /// Variable name.
        name: &'static str,
    },
    /// The unit name did not have the `<application>/<number>` shape.
    #[error("invalid unit name '{value}': expected '<application>/<number>'")]
    InvalidUnitName {
        /// Offending value.
        value: String,
    },
    /// The charm directory was not valid UTF-8.
    #[error("charm directory is not valid UTF-8")]
    NonUtf8CharmDir,
}

impl Config {
    /// Builds a configuration for the named unit with default settings.
    #[must_use]
    pub fn for_unit(unit_name: impl Into<String>) -> Self {
        Self {
            unit_name: unit_name.into(),
            charm_dir: default_charm_dir(),
            dispatch_path: None,
            relation_id: None,
            log_filter: default_log_filter_string(),
            log_format: default_log_format(),
        }
    }

    /// Loads the configuration from the process environment.
    pub fn load() -> Result<Self, ConfigError> {
        let mut vars = Vec::new();
        for (key, value) in env::vars_os() {
            let Some(key) = key.to_str().map(str::to_owned) else {
                continue;
            };
            match value.into_string() {
                Ok(value) => vars.push((key, value)),
                Err(_) if key == CHARM_DIR_VAR => return Err(ConfigError::NonUtf8CharmDir),
                Err(_) => {}
            }
        }
        Self::from_vars(vars)
    }

    /// Builds the configuration from an explicit set of variables.
    pub fn from_vars<I, K, V>(vars: I) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let vars: HashMap<String, String> = vars
            .into_iter()
            .map(|(key, value)| (key.into(), value.into()))
            .filter(|(_, value)| !value.is_empty())
            .collect();

        let unit_name = vars
            .get(UNIT_NAME_VAR)
            .cloned()
            .ok_or(ConfigError::Missing {
                name: UNIT_NAME_VAR,
            })?;
        validate_unit_name(&unit_name)?;

        let dispatch_path = vars.get(DISPATCH_PATH_VAR).cloned().or_else(|| {
            vars.get(HOOK_NAME_VAR)
                .map(|hook| format!("hooks/{hook}"))
        });

        Ok(Self {
            charm_dir: vars
                .get(CHARM_DIR_VAR)
                .map_or_else(default_charm_dir, Utf8PathBuf::from),
            dispatch_path,
            relation_id: vars.get(RELATION_ID_VAR).cloned(),
            ..Self::for_unit(unit_name)
        })
    }

    /// Unit name in the form `<application>/<number>`.
    #[must_use]
    pub fn unit_name(&self) -> &str {
        self.unit_name.as_str()
    }

    /// Application the unit belongs to.
    #[must_use]
    pub fn app_name(&self) -> &str {
        self.unit_name
            .split_once('/')
            .map_or(self.unit_name.as_str(), |(app, _)| app)
    }

    /// Root directory of the deployed charm.
    #[must_use]
    pub fn charm_dir(&self) -> &Utf8Path {
        self.charm_dir.as_path()
    }

    /// Dispatch path for the current hook, if any.
    #[must_use]
    pub fn dispatch_path(&self) -> Option<&str> {
        self.dispatch_path.as_deref()
    }

    /// Relation id for relation hooks.
    #[must_use]
    pub fn relation_id(&self) -> Option<&str> {
        self.relation_id.as_deref()
    }

    /// `tracing` filter expression.
    #[must_use]
    pub fn log_filter(&self) -> &str {
        self.log_filter.as_str()
    }

    /// Output format for log lines.
    #[must_use]
    pub fn log_format(&self) -> LogFormat {
        self.log_format
    }
}

fn validate_unit_name(value: &str) -> Result<(), ConfigError> {
    let valid = value.split_once('/').is_some_and(|(app, number)| {
        !app.is_empty() && !number.is_empty() && number.bytes().all(|byte| byte.is_ascii_digit())
    });
    if valid {
        Ok(())
    } else {
        Err(ConfigError::InvalidUnitName {
            value: value.to_owned(),
        })
    }
}
