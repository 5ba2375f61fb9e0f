//! Application service — the container create / inspect contract.
//!
//! Imports only from `crate::domain` and `crate::application`.
//! All I/O is routed through the injected [`ClusterApi`] and
//! [`ContainerBackend`] ports.

use std::future::Future;

use anyhow::{Context, Result};
use connector_common::{ConnectorConfig, Project};

use crate::application::ports::{ClusterApi, ContainerBackend};
use crate::application::services::deployment::{
    DeploymentRequest, build_deployment_config, create_deployment_config,
};
use crate::application::services::discovery::{Discovery, wait_for_container_id};
use crate::application::services::inspection::{InspectionSettings, enrich};
use crate::application::services::project::resolve_project;
use crate::application::services::service::{build_service, create_service};
use crate::application::services::wait::PollPolicy;
use crate::domain::{
    ClusterError, ConnectorError, ContainerInfo, ExposedPorts, PortNames, ResourceNames, extract_workspace_id,
    validate_config,
};

/// Context attached to every creation failure.
pub const CREATE_CONTAINER_FAILED: &str = "could not create workspace container";

/// A Docker-style "create container" call.
#[derive(Debug, Clone, Default)]
pub struct CreateContainerRequest {
    pub container_name: String,
    pub image: String,
    pub exposed_ports: ExposedPorts,
    /// `NAME=VALUE` entries; must carry `CHE_WORKSPACE_ID`.
    pub env: Vec<String>,
}

/// Backs container create / inspect with OpenShift resources.
pub struct ContainerConnector<C, B> {
    cluster: C,
    backend: B,
    config: ConnectorConfig,
    port_names: PortNames,
    policy: PollPolicy,
}

impl<C: ClusterApi, B: ContainerBackend> ContainerConnector<C, B> {
    /// # Errors
    ///
    /// Returns `ConfigError` if `config` fails validation.
    pub fn new(cluster: C, backend: B, config: ConnectorConfig) -> Result<Self> {
        validate_config(&config)?;
        Ok(Self {
            port_names: PortNames::new(config.port_names.clone()),
            policy: PollPolicy::from_config(&config),
            cluster,
            backend,
            config,
        })
    }

    #[must_use]
    pub fn config(&self) -> &ConnectorConfig {
        &self.config
    }

    #[must_use]
    pub fn cluster(&self) -> &C {
        &self.cluster
    }

    /// Create the workspace Service and DeploymentConfig and wait for the
    /// pod's container. Returns the runtime container id.
    ///
    /// # Errors
    ///
    /// Any failure is reported as "could not create workspace container"; the
    /// cause (a [`ConnectorError`] or cluster error) stays in the chain.
    pub async fn create_container(&self, request: &CreateContainerRequest) -> Result<String> {
        self.create_container_with_cancel(request, std::future::pending())
            .await
    }

    /// Like [`Self::create_container`], giving up the discovery wait as soon
    /// as `cancel` resolves.
    ///
    /// # Errors
    ///
    /// See [`Self::create_container`]; cancellation surfaces as
    /// `ContainerDiscoveryCancelled`.
    pub async fn create_container_with_cancel(
        &self,
        request: &CreateContainerRequest,
        cancel: impl Future<Output = ()>,
    ) -> Result<String> {
        self.provision(request, cancel)
            .await
            .context(CREATE_CONTAINER_FAILED)
    }

    async fn provision(
        &self,
        request: &CreateContainerRequest,
        cancel: impl Future<Output = ()>,
    ) -> Result<String> {
        let names = ResourceNames::new(
            &self.config.resource_prefix,
            &extract_workspace_id(&request.env),
        )?;
        let project = resolve_project(&self.cluster, &self.config.project).await?;

        let image = self
            .config
            .image_override
            .as_deref()
            .unwrap_or(&request.image);
        let service = build_service(&project, &names, &request.exposed_ports, &self.port_names)?;
        let deployment = build_deployment_config(
            &project,
            &names,
            &DeploymentRequest {
                image,
                container_name: &request.container_name,
                exposed_ports: &request.exposed_ports,
                env: &request.env,
                service_account: &self.config.service_account,
            },
            &self.port_names,
        )?;

        create_service(&self.cluster, &service).await?;

        let namespace = project.namespace();
        let name = match create_deployment_config(&self.cluster, &deployment).await {
            Ok(name) => name,
            Err(e) => {
                let conflict = e
                    .downcast_ref::<ClusterError>()
                    .is_some_and(ClusterError::is_conflict);
                self.roll_back(namespace, names.name(), !conflict).await;
                return Err(e);
            }
        };
        let discovered = self.discover(&project, name, cancel).await;
        if discovered.is_err() {
            self.roll_back(namespace, names.name(), true).await;
        }
        discovered
    }

    async fn discover(
        &self,
        project: &Project,
        name: String,
        cancel: impl Future<Output = ()>,
    ) -> Result<String> {
        match wait_for_container_id(&self.cluster, project, &name, &self.policy, cancel).await? {
            Discovery::Found(id) => Ok(id),
            Discovery::TimedOut => Err(ConnectorError::ContainerDiscoveryTimeout {
                name,
                attempts: self.policy.attempts,
            }
            .into()),
            Discovery::Cancelled => Err(ConnectorError::ContainerDiscoveryCancelled(name).into()),
        }
    }

    /// Best-effort removal of what this request may have created. A
    /// DeploymentConfig rejected as a conflict belongs to someone else and is
    /// left alone; any other failed submission may still have been stored.
    async fn roll_back(&self, namespace: &str, name: &str, deployment_created: bool) {
        tracing::warn!(namespace, name, "removing partially created workspace resources");
        if deployment_created {
            if let Err(e) = self.cluster.delete_deployment_config(namespace, name).await {
                tracing::warn!(namespace, name, error = %e, "failed to delete deployment config");
            }
        }
        if let Err(e) = self.cluster.delete_service(namespace, name).await {
            tracing::warn!(namespace, name, error = %e, "failed to delete service");
        }
    }

    /// Inspect container `id`, overlaying cluster port bindings.
    ///
    /// # Errors
    ///
    /// Returns the backend failure, or the enrichment failure
    /// (`ServiceNotFound`, `AmbiguousService`, `ProjectNotFound`).
    pub async fn inspect_container(&self, id: &str) -> Result<Option<ContainerInfo>> {
        let Some(info) = self.backend.inspect(id).await? else {
            return Ok(None);
        };
        let settings = InspectionSettings {
            project: &self.config.project,
            resource_prefix: &self.config.resource_prefix,
            external_address: &self.config.external_address,
            server_labels: &self.config.server_labels,
        };
        enrich(info, &self.cluster, &settings).await.map(Some)
    }
}
