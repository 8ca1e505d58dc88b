//! [`Runtime`] implemented with the runtime's hook tools.

use std::collections::HashMap;

use serde::Deserialize;
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::command::{CommandRunner, SystemCommandRunner, args, run_checked};
use crate::event::RelationId;
use crate::status::{StatusKind, UnitStatus};

use super::{Runtime, RuntimeError};

const RUNTIME_TARGET: &str = concat!(env!("CARGO_PKG_NAME"), "::runtime");

const STATUS_GET: &str = "status-get";
const STATUS_SET: &str = "status-set";
const NETWORK_GET: &str = "network-get";
const RELATION_GET: &str = "relation-get";
const RELATION_SET: &str = "relation-set";

/// Runtime adapter driving `status-*`, `relation-*` and `network-get`.
#[derive(Debug, Clone)]
pub struct HookTools<R = SystemCommandRunner> {
    runner: R,
    app_name: String,
}

impl HookTools {
    /// Builds an adapter for `app_name` using the system command runner.
    #[must_use]
    pub fn system(app_name: impl Into<String>) -> Self {
        Self::new(SystemCommandRunner, app_name)
    }
}

impl<R> HookTools<R>
where
    R: CommandRunner,
{
    /// Builds an adapter for `app_name` over the supplied runner.
    #[must_use]
    pub fn new(runner: R, app_name: impl Into<String>) -> Self {
        Self {
            runner,
            app_name: app_name.into(),
        }
    }

    fn invoke(&self, tool: &'static str, arguments: &[String]) -> Result<String, RuntimeError> {
        run_checked(&self.runner, tool, arguments)
            .map_err(|source| RuntimeError::Tool { tool, source })
    }

    fn invoke_json<T>(&self, tool: &'static str, arguments: &[String]) -> Result<T, RuntimeError>
    where
        T: DeserializeOwned,
    {
        let stdout = self.invoke(tool, arguments)?;
        serde_json::from_str(&stdout).map_err(|source| RuntimeError::Decode { tool, source })
    }
}

#[derive(Debug, Deserialize)]
struct StatusReport {
    status: String,
    #[serde(default)]
    message: String,
}

#[derive(Debug, Deserialize)]
struct NetworkReport {
    #[serde(rename = "bind-addresses", default)]
    bind_addresses: Vec<BindInterface>,
}

#[derive(Debug, Deserialize)]
struct BindInterface {
    #[serde(default)]
    addresses: Vec<BindAddressEntry>,
}

#[derive(Debug, Deserialize)]
struct BindAddressEntry {
    #[serde(default)]
    value: Option<String>,
    #[serde(default)]
    address: Option<String>,
}

impl NetworkReport {
    /// First non-empty address across every bound interface, in report order.
    fn first_address(self) -> Option<String> {
        self.bind_addresses
            .into_iter()
            .flat_map(|interface| interface.addresses)
            .filter_map(|entry| entry.value.or(entry.address))
            .find(|value| !value.is_empty())
    }
}

impl<R> Runtime for HookTools<R>
where
    R: CommandRunner,
{
    fn unit_status(&self) -> Result<UnitStatus, RuntimeError> {
        let report: StatusReport = self.invoke_json(STATUS_GET, &args(["--format=json"]))?;
        let kind = report
            .status
            .parse::<StatusKind>()
            .map_err(|_| RuntimeError::UnknownStatus {
                value: report.status.clone(),
            })?;
        Ok(UnitStatus::from_parts(kind, report.message))
    }

    fn set_unit_status(&self, status: &UnitStatus) -> Result<(), RuntimeError> {
        let kind = status.kind();
        if matches!(kind, StatusKind::Unknown | StatusKind::Error) {
            return Err(RuntimeError::UnsettableStatus { kind });
        }
        let kind_label = kind.to_string();
        self.invoke(STATUS_SET, &args([kind_label.as_str(), status.message()]))?;
        debug!(target: RUNTIME_TARGET, %status, "unit status set");
        Ok(())
    }

    fn bind_address(&self, relation: &RelationId) -> Result<Option<String>, RuntimeError> {
        let relation_arg = relation.to_string();
        let report: NetworkReport = self.invoke_json(
            NETWORK_GET,
            &args([
                relation.endpoint(),
                "-r",
                relation_arg.as_str(),
                "--format=json",
            ]),
        )?;
        Ok(report.first_address())
    }

    fn relation_data(
        &self,
        relation: &RelationId,
        key: &str,
    ) -> Result<Option<String>, RuntimeError> {
        let relation_arg = relation.to_string();
        let mut databag: Option<HashMap<String, String>> = self.invoke_json(
            RELATION_GET,
            &args([
                "-r",
                relation_arg.as_str(),
                "--app",
                "--format=json",
                "-",
                self.app_name.as_str(),
            ]),
        )?;
        Ok(databag.as_mut().and_then(|values| values.remove(key)))
    }

    fn set_relation_data(
        &self,
        relation: &RelationId,
        key: &str,
        value: &str,
    ) -> Result<(), RuntimeError> {
        let relation_arg = relation.to_string();
        let assignment = format!("{key}={value}");
        self.invoke(
            RELATION_SET,
            &args(["-r", relation_arg.as_str(), "--app", assignment.as_str()]),
        )?;
        debug!(target: RUNTIME_TARGET, %relation, key, "relation data set");
        Ok(())
    }
}
