//! Port trait definitions for the Application layer.
//!
//! Ports are the interfaces (contracts) that infrastructure must fulfill.
//! This file imports only from `crate::domain` and `connector_common` — never
//! from `crate::infra`.

use anyhow::Result;
use connector_common::{DeploymentConfig, Pod, Project, Service};

use crate::domain::ContainerInfo;

// ── Cluster Port ──────────────────────────────────────────────────────────────

/// Typed access to the OpenShift API server.
///
/// Implementations surface non-success responses as
/// [`crate::domain::ClusterError`] inside the returned `anyhow::Error`.
#[allow(async_fn_in_trait)]
pub trait ClusterApi {
    /// List the projects visible to the connector's credentials.
    async fn list_projects(&self) -> Result<Vec<Project>>;
    /// List every pod in `namespace`.
    async fn list_pods(&self, namespace: &str) -> Result<Vec<Pod>>;
    /// List every service in `namespace`.
    async fn list_services(&self, namespace: &str) -> Result<Vec<Service>>;
    /// Submit a service; returns the object as stored by the cluster.
    async fn create_service(&self, service: &Service) -> Result<Service>;
    /// Submit a deployment config; returns the object as stored by the cluster.
    async fn create_deployment_config(
        &self,
        deployment: &DeploymentConfig,
    ) -> Result<DeploymentConfig>;
    /// Delete a service. Deleting an absent service succeeds.
    async fn delete_service(&self, namespace: &str, name: &str) -> Result<()>;
    /// Delete a deployment config and its pods. Deleting an absent one succeeds.
    async fn delete_deployment_config(&self, namespace: &str, name: &str) -> Result<()>;
}

// ── Container Runtime Port ────────────────────────────────────────────────────

/// Local container runtime used for the base inspection view.
#[allow(async_fn_in_trait)]
pub trait ContainerBackend {
    /// Inspect container `id`; `None` when the runtime does not know it.
    async fn inspect(&self, id: &str) -> Result<Option<ContainerInfo>>;
}
