//! Application service — NodePort Service provisioning.

use anyhow::{Context, Result};
use connector_common::{
    ObjectMeta, Project, SERVICE_API_VERSION, SERVICE_KIND, Service, ServiceSpec,
};

use crate::application::ports::ClusterApi;
use crate::domain::{ConnectorError, ExposedPorts, PortNames, ResourceNames, to_service_ports};

const NODE_PORT: &str = "NodePort";

/// Build the workspace Service without submitting it.
///
/// # Errors
///
/// Returns `MalformedPortSpec` for an invalid exposed-port key.
pub fn build_service(
    project: &Project,
    names: &ResourceNames,
    exposed_ports: &ExposedPorts,
    port_names: &PortNames,
) -> Result<Service> {
    Ok(Service {
        api_version: SERVICE_API_VERSION.to_string(),
        kind: SERVICE_KIND.to_string(),
        metadata: ObjectMeta {
            name: names.name().to_string(),
            namespace: Some(project.namespace().to_string()),
            labels: Default::default(),
        },
        spec: ServiceSpec {
            service_type: Some(NODE_PORT.to_string()),
            selector: names.selector(),
            ports: to_service_ports(exposed_ports, port_names)?,
        },
    })
}

/// Submit `service` to the cluster.
///
/// Not idempotent: a second submission under the same name fails with the
/// cluster's conflict error as cause.
///
/// # Errors
///
/// Returns `ServiceCreationFailed` wrapping the cluster error.
pub async fn create_service(cluster: &impl ClusterApi, service: &Service) -> Result<Service> {
    let created = cluster
        .create_service(service)
        .await
        .context(ConnectorError::ServiceCreationFailed(
            service.metadata.name.clone(),
        ))?;
    tracing::info!(
        service = %created.metadata.name,
        namespace = service.metadata.namespace.as_deref().unwrap_or_default(),
        ports = created.spec.ports.len(),
        "created service"
    );
    Ok(created)
}
