use camino::Utf8PathBuf;

/// Default log filter expression used by the charm.
pub const DEFAULT_LOG_FILTER: &str = "info";

/// Name of the file holding events deferred between dispatches.
pub const STATE_FILE_NAME: &str = ".unit-state.json";

/// Environment variable carrying the unit name (`<application>/<number>`).
pub const UNIT_NAME_VAR: &str = "JUJU_UNIT_NAME";

/// Environment variable carrying the charm's root directory.
pub const CHARM_DIR_VAR: &str = "JUJU_CHARM_DIR";

/// Environment variable carrying the dispatch path (`hooks/<name>`).
pub const DISPATCH_PATH_VAR: &str = "JUJU_DISPATCH_PATH";

/// Legacy environment variable carrying the bare hook name.
pub const HOOK_NAME_VAR: &str = "JUJU_HOOK_NAME";

/// Environment variable carrying the relation id for relation hooks.
pub const RELATION_ID_VAR: &str = "JUJU_RELATION_ID";

/// Default log filter expression used by the charm.
pub fn default_log_filter() -> &'static str {
    DEFAULT_LOG_FILTER
}

/// Owned log filter value used where allocation is required (e.g. serde).
pub fn default_log_filter_string() -> String {
    DEFAULT_LOG_FILTER.to_owned()
}

/// Default logging format for the charm.
pub fn default_log_format() -> crate::logging::LogFormat {
    crate::logging::LogFormat::Compact
}

/// Charm directory used when the runtime does not export one.
pub fn default_charm_dir() -> Utf8PathBuf {
    Utf8PathBuf::from(".")
}
