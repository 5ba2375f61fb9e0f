//! OpenShift connector — satisfies container create / inspect calls with a
//! Service, a DeploymentConfig and the pod it rolls out.

#![cfg_attr(test, allow(clippy::expect_used))]

pub mod application;
pub mod domain;
pub mod infra;

pub use application::services::container::{
    CREATE_CONTAINER_FAILED, ContainerConnector, CreateContainerRequest,
};
pub use application::{ClusterApi, ContainerBackend};
pub use connector_common::ConnectorConfig;
pub use domain::{ClusterError, ConfigError, ConnectorError, ContainerInfo};
