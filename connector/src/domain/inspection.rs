//! Docker-style container inspection view and the overlays derived from a
//! workspace Service.
//!
//! Pure functions only — no I/O, no async.

use std::collections::BTreeMap;

use anyhow::Result;
use connector_common::Service;
use serde::{Deserialize, Serialize};

use crate::domain::env::extract_workspace_id;
use crate::domain::error::ConnectorError;

/// Subset of `docker inspect` output the workspace runtime consumes.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ContainerInfo {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub image: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub config: Option<ContainerConfig>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state: Option<ContainerState>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub network_settings: Option<NetworkSettings>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ContainerConfig {
    #[serde(default)]
    pub image: String,
    #[serde(default)]
    pub env: Vec<String>,
    #[serde(default)]
    pub labels: BTreeMap<String, String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ContainerState {
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub running: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct NetworkSettings {
    #[serde(rename = "IPAddress", default)]
    pub ip_address: String,
    /// `"<port>/<protocol>"` → host bindings.
    #[serde(default)]
    pub ports: BTreeMap<String, Vec<PortBinding>>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct PortBinding {
    pub host_ip: String,
    pub host_port: String,
}

/// Host-visible bindings for every port of `service`.
///
/// Keys are `"<targetPort>/<protocol lowercased>"`; each binding points at the
/// node port on `host_ip`. Ports the cluster has not assigned a node port to
/// get an empty host port.
#[must_use]
pub fn service_port_bindings(service: &Service, host_ip: &str) -> BTreeMap<String, Vec<PortBinding>> {
    service
        .spec
        .ports
        .iter()
        .map(|port| {
            let key = format!("{}/{}", port.target_port, port.protocol.to_lowercase());
            let binding = PortBinding {
                host_ip: host_ip.to_string(),
                host_port: port.node_port.map(|p| p.to_string()).unwrap_or_default(),
            };
            (key, vec![binding])
        })
        .collect()
}

/// Workspace id carried in the container's environment, if any.
#[must_use]
pub fn workspace_id_of(info: &ContainerInfo) -> Option<String> {
    let config = info.config.as_ref()?;
    let id = extract_workspace_id(&config.env);
    (!id.is_empty()).then_some(id)
}

/// Pick the Service backing a workspace container.
///
/// With a workspace id the Service named `<prefix><id>` is required. Without
/// one, exactly one Service may carry the prefix.
///
/// # Errors
///
/// Returns `ServiceNotFound` when nothing matches and `AmbiguousService` when
/// several prefixed Services exist and no workspace id disambiguates them.
pub fn select_workspace_service<'a>(
    services: &'a [Service],
    prefix: &str,
    workspace_id: Option<&str>,
) -> Result<&'a Service> {
    if let Some(id) = workspace_id {
        let name = format!("{prefix}{id}");
        return services
            .iter()
            .find(|s| s.metadata.name == name)
            .ok_or_else(|| ConnectorError::ServiceNotFound(name).into());
    }

    let candidates: Vec<&Service> = services
        .iter()
        .filter(|s| s.metadata.name.starts_with(prefix))
        .collect();
    match candidates.as_slice() {
        [] => Err(ConnectorError::ServiceNotFound(prefix.to_string()).into()),
        [only] => Ok(*only),
        many => Err(ConnectorError::AmbiguousService {
            prefix: prefix.to_string(),
            candidates: many
                .iter()
                .map(|s| s.metadata.name.as_str())
                .collect::<Vec<_>>()
                .join(", "),
        }
        .into()),
    }
}
