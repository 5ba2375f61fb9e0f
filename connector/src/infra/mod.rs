//! Infrastructure layer — concrete implementations of application port traits.
//!
//! This module contains all I/O-performing code: the OpenShift REST client,
//! the Docker inspection backend, configuration loading and tracing setup.
//!
//! Imports from `crate::domain` and `crate::application::ports` are allowed.

pub mod cluster;
pub mod config;
pub mod docker;
pub mod telemetry;

use anyhow::Result;
use connector_common::ConnectorConfig;

pub use cluster::OpenShiftClient;
pub use docker::DockerBackend;

use crate::application::services::container::ContainerConnector;

/// Wire the production adapters into a [`ContainerConnector`].
///
/// # Errors
///
/// Returns an error if the configuration is invalid or a client cannot be
/// built.
pub fn connect(config: ConnectorConfig) -> Result<ContainerConnector<OpenShiftClient, DockerBackend>> {
    let cluster = OpenShiftClient::new(&config)?;
    let backend = DockerBackend::connect()?;
    ContainerConnector::new(cluster, backend, config)
}
