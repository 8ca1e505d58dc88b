//! Structured telemetry for hook runs.
//!
//! The runtime captures a hook's stderr into the unit's debug log and stamps
//! each captured line with its own timestamp and unit prefix. Compact output
//! therefore carries neither. JSON output keeps an RFC 3339 timestamp.

use std::io::{self, IsTerminal};

use once_cell::sync::OnceCell;
use tracing::{Span, Subscriber, info_span, subscriber::SetGlobalDefaultError};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt::{self, time::UtcTime};

use raft_charm_config::{Config, LogFormat, default_log_filter};

static TELEMETRY_GUARD: OnceCell<()> = OnceCell::new();

/// Handle returned when telemetry has been initialised.
#[derive(Debug, Default, Clone, Copy)]
pub struct TelemetryHandle;

/// Errors encountered while configuring telemetry.
#[derive(Debug, thiserror::Error)]
pub enum TelemetryError {
    /// The configured log filter expression could not be parsed.
    #[error("invalid log filter '{filter}': {reason}")]
    Filter {
        /// Rejected filter expression.
        filter: String,
        /// Parser diagnostic.
        reason: String,
    },
    /// Failed to install the tracing subscriber.
    #[error("failed to install telemetry subscriber: {0}")]
    Subscriber(SetGlobalDefaultError),
}

/// Installs the global subscriber on the first call of the process.
///
/// A hook is one short-lived process, so later calls only hand back a
/// [`TelemetryHandle`]; the first configuration wins.
pub fn initialise(config: &Config) -> Result<TelemetryHandle, TelemetryError> {
    TELEMETRY_GUARD
        .get_or_try_init(|| install_subscriber(config))
        .map(|_| TelemetryHandle)
}

/// Span covering one hook run. Every line logged inside it carries the unit
/// and hook that produced it.
#[must_use]
pub(crate) fn hook_span(config: &Config) -> Span {
    info_span!(
        "hook",
        unit = config.unit_name(),
        hook = config.dispatch_path().unwrap_or("-"),
    )
}

fn hook_filter(config: &Config) -> Result<EnvFilter, TelemetryError> {
    let expression = match config.log_filter().trim() {
        "" => default_log_filter(),
        configured => configured,
    };
    EnvFilter::try_new(expression).map_err(|error| TelemetryError::Filter {
        filter: expression.to_owned(),
        reason: error.to_string(),
    })
}

fn install_subscriber(config: &Config) -> Result<(), TelemetryError> {
    let filter = hook_filter(config)?;
    let builder = fmt::Subscriber::builder()
        .with_env_filter(filter)
        .with_target(true)
        .with_level(true)
        .with_thread_ids(false)
        .with_thread_names(false)
        .with_writer(io::stderr)
        .with_ansi(io::stderr().is_terminal());

    let subscriber: Box<dyn Subscriber + Send + Sync> = match config.log_format() {
        LogFormat::Json => Box::new(
            builder
                .with_timer(UtcTime::rfc_3339())
                .json()
                .flatten_event(true)
                .with_current_span(true)
                .finish(),
        ),
        LogFormat::Compact => Box::new(builder.without_time().compact().finish()),
    };

    tracing::subscriber::set_global_default(subscriber).map_err(TelemetryError::Subscriber)
}
