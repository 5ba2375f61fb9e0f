//! Application service — inspection enrichment.
//!
//! The runtime's own inspection record knows nothing about cluster port
//! exposure; the workspace Service does.

use std::collections::BTreeMap;

use anyhow::{Context, Result};

use crate::application::ports::ClusterApi;
use crate::application::services::project::resolve_project;
use crate::domain::{ContainerInfo, select_workspace_service, service_port_bindings, workspace_id_of};

/// Configuration slice the overlay needs.
#[derive(Debug, Clone, Copy)]
pub struct InspectionSettings<'a> {
    pub project: &'a str,
    pub resource_prefix: &'a str,
    /// Reported as `HostIp` of every binding.
    pub external_address: &'a str,
    /// Replaces `Config.Labels` wholesale.
    pub server_labels: &'a BTreeMap<String, String>,
}

/// Overlay cluster port bindings and server labels onto `info`.
///
/// A record without network settings is returned untouched.
///
/// # Errors
///
/// Returns `ProjectNotFound`, `ServiceNotFound`, `AmbiguousService`, or the
/// listing failure.
pub async fn enrich(
    mut info: ContainerInfo,
    cluster: &impl ClusterApi,
    settings: &InspectionSettings<'_>,
) -> Result<ContainerInfo> {
    if info.network_settings.is_none() {
        return Ok(info);
    }

    let project = resolve_project(cluster, settings.project).await?;
    let services = cluster
        .list_services(project.namespace())
        .await
        .context("failed to list services")?;
    let workspace_id = workspace_id_of(&info);
    let service =
        select_workspace_service(&services, settings.resource_prefix, workspace_id.as_deref())?;

    let bindings = service_port_bindings(service, settings.external_address);
    tracing::debug!(
        container = %info.id,
        service = %service.metadata.name,
        bindings = bindings.len(),
        "enriched inspection record"
    );
    if let Some(network) = info.network_settings.as_mut() {
        network.ports = bindings;
    }
    if let Some(config) = info.config.as_mut() {
        config.labels.clone_from(settings.server_labels);
    }
    Ok(info)
}
