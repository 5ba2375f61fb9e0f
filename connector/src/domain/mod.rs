//! Domain layer — pure translation rules, naming and validation.
//!
//! This module has zero imports from `crate::infra`, `crate::application`,
//! `tokio`, `reqwest` or `bollard`. All functions are synchronous and take
//! data in, returning data out.

pub mod config;
pub mod discovery;
pub mod env;
pub mod error;
pub mod inspection;
pub mod naming;
pub mod port_mapping;

pub use config::validate_config;
pub use discovery::{PodScan, parse_container_id, scan_pods};
pub use env::{WORKSPACE_ID_VAR, extract_workspace_id, normalize_container_name, parse_env};
pub use error::{ClusterError, ConfigError, ConnectorError};
pub use inspection::{
    ContainerConfig, ContainerInfo, ContainerState, NetworkSettings, PortBinding,
    select_workspace_service, service_port_bindings, workspace_id_of,
};
pub use naming::{DEPLOYER_POD_LABEL, DEPLOYMENT_CONFIG_LABEL, ResourceNames};
pub use port_mapping::{
    ExposedPorts, PortNames, PortSpec, parse_port_spec, to_container_ports, to_service_ports,
};
