//! Infrastructure implementation of the `ContainerBackend` port using the
//! local Docker daemon.

use anyhow::{Context, Result};
use bollard::Docker;
use bollard::container::InspectContainerOptions;
use bollard::errors::Error as BollardError;
use bollard::models::ContainerInspectResponse;

use crate::application::ports::ContainerBackend;
use crate::domain::{ContainerConfig, ContainerInfo, ContainerState, NetworkSettings, PortBinding};

/// Delegate inspection backed by `bollard`.
pub struct DockerBackend {
    docker: Docker,
}

impl DockerBackend {
    /// Connect using `DOCKER_HOST` or the platform's default socket.
    ///
    /// # Errors
    ///
    /// Returns an error if the client cannot be configured.
    pub fn connect() -> Result<Self> {
        let docker =
            Docker::connect_with_local_defaults().context("failed to connect to Docker")?;
        Ok(Self { docker })
    }
}

impl ContainerBackend for DockerBackend {
    async fn inspect(&self, id: &str) -> Result<Option<ContainerInfo>> {
        match self
            .docker
            .inspect_container(id, None::<InspectContainerOptions>)
            .await
        {
            Ok(response) => Ok(Some(to_container_info(response))),
            Err(BollardError::DockerResponseServerError {
                status_code: 404, ..
            }) => Ok(None),
            Err(e) => Err(e).with_context(|| format!("failed to inspect container {id}")),
        }
    }
}

/// Map the daemon's inspection record onto the connector's view.
pub(crate) fn to_container_info(response: ContainerInspectResponse) -> ContainerInfo {
    ContainerInfo {
        id: response.id.unwrap_or_default(),
        name: response.name.unwrap_or_default(),
        image: response.image.unwrap_or_default(),
        config: response.config.map(|config| ContainerConfig {
            image: config.image.unwrap_or_default(),
            env: config.env.unwrap_or_default(),
            labels: config.labels.unwrap_or_default().into_iter().collect(),
        }),
        state: response.state.map(|state| ContainerState {
            status: state.status.map(|s| s.to_string()).unwrap_or_default(),
            running: state.running.unwrap_or(false),
        }),
        network_settings: response.network_settings.map(|network| NetworkSettings {
            ip_address: network.ip_address.unwrap_or_default(),
            ports: network
                .ports
                .unwrap_or_default()
                .into_iter()
                .map(|(key, bindings)| {
                    let bindings = bindings
                        .unwrap_or_default()
                        .into_iter()
                        .map(|b| PortBinding {
                            host_ip: b.host_ip.unwrap_or_default(),
                            host_port: b.host_port.unwrap_or_default(),
                        })
                        .collect();
                    (key, bindings)
                })
                .collect(),
        }),
    }
}
