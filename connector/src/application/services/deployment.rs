//! Application service — DeploymentConfig provisioning.

use anyhow::{Context, Result};
use connector_common::{
    Container, DEPLOYMENT_CONFIG_API_VERSION, DEPLOYMENT_CONFIG_KIND, DeploymentConfig,
    DeploymentConfigSpec, DeploymentTrigger, EnvVar, ObjectMeta, PodSpec, PodTemplateSpec,
    Project,
};

use crate::application::ports::ClusterApi;
use crate::domain::{
    ConnectorError, ExposedPorts, PortNames, ResourceNames, normalize_container_name, parse_env,
    to_container_ports,
};

/// Always pull so a rebuilt image with the same tag is picked up.
const IMAGE_PULL_POLICY: &str = "Always";
/// Resolve names through the node rather than cluster DNS.
const DNS_POLICY: &str = "Default";
const CONFIG_CHANGE_TRIGGER: &str = "ConfigChange";

/// Caller-supplied parts of the workspace pod template.
#[derive(Debug, Clone, Copy)]
pub struct DeploymentRequest<'a> {
    pub image: &'a str,
    /// Docker-style name; normalized into an RFC 1123 label.
    pub container_name: &'a str,
    pub exposed_ports: &'a ExposedPorts,
    /// `NAME=VALUE` entries.
    pub env: &'a [String],
    pub service_account: &'a str,
}

/// Build the workspace DeploymentConfig without submitting it.
///
/// # Errors
///
/// Returns `InvalidContainerName`, `MalformedPortSpec` or `MalformedEnvEntry`
/// for unusable request fields.
pub fn build_deployment_config(
    project: &Project,
    names: &ResourceNames,
    request: &DeploymentRequest<'_>,
    port_names: &PortNames,
) -> Result<DeploymentConfig> {
    let container = Container {
        name: normalize_container_name(request.container_name)?,
        image: request.image.to_string(),
        ports: to_container_ports(request.exposed_ports, port_names)?
            .into_iter()
            .collect(),
        env: parse_env(request.env)?
            .into_iter()
            .map(|(name, value)| EnvVar { name, value })
            .collect(),
        image_pull_policy: Some(IMAGE_PULL_POLICY.to_string()),
    };

    Ok(DeploymentConfig {
        api_version: DEPLOYMENT_CONFIG_API_VERSION.to_string(),
        kind: DEPLOYMENT_CONFIG_KIND.to_string(),
        metadata: ObjectMeta {
            name: names.name().to_string(),
            namespace: Some(project.namespace().to_string()),
            labels: Default::default(),
        },
        spec: DeploymentConfigSpec {
            replicas: 1,
            selector: names.selector(),
            template: PodTemplateSpec {
                metadata: ObjectMeta {
                    labels: names.selector(),
                    ..ObjectMeta::default()
                },
                spec: PodSpec {
                    containers: vec![container],
                    dns_policy: Some(DNS_POLICY.to_string()),
                    service_account_name: Some(request.service_account.to_string()),
                },
            },
            triggers: vec![DeploymentTrigger {
                trigger_type: CONFIG_CHANGE_TRIGGER.to_string(),
            }],
        },
    })
}

/// Submit `deployment` and return the name the cluster stored it under.
///
/// # Errors
///
/// Returns `DeploymentCreationFailed` wrapping the cluster error.
pub async fn create_deployment_config(
    cluster: &impl ClusterApi,
    deployment: &DeploymentConfig,
) -> Result<String> {
    let created = cluster
        .create_deployment_config(deployment)
        .await
        .context(ConnectorError::DeploymentCreationFailed(
            deployment.metadata.name.clone(),
        ))?;

    let name = if created.metadata.name.is_empty() {
        deployment.metadata.name.clone()
    } else {
        created.metadata.name
    };
    tracing::info!(
        deployment_config = %name,
        namespace = deployment.metadata.namespace.as_deref().unwrap_or_default(),
        "created deployment config"
    );
    Ok(name)
}
