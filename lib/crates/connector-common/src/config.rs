use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Connector configuration.
///
/// Loaded from `CHE_OPENSHIFT_*` environment variables or a YAML file; every
/// field has a default so an empty source yields a usable lab configuration.
/// The two tables (`port_names`, `server_labels`) can only be overridden from
/// YAML.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConnectorConfig {
    /// Base URL of the OpenShift API server.
    #[serde(default = "default_api_endpoint")]
    pub api_endpoint: String,

    /// Bearer token presented to the API server.
    #[serde(default)]
    pub token: Option<String>,

    /// Accept self-signed API server certificates (lab clusters only).
    #[serde(default)]
    pub insecure_skip_tls_verify: bool,

    /// Per-request timeout for cluster calls.
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,

    /// Project (namespace) every workspace resource is created in.
    #[serde(default = "default_project")]
    pub project: String,

    /// Service account the workspace pods run as.
    #[serde(default = "default_service_account")]
    pub service_account: String,

    /// Address reported as `HostIp` in inspected port bindings.
    #[serde(default = "default_external_address")]
    pub external_address: String,

    /// Prefix of every generated Service / DeploymentConfig name.
    #[serde(default = "default_resource_prefix")]
    pub resource_prefix: String,

    /// Image deployed instead of the one requested by the caller.
    #[serde(default)]
    pub image_override: Option<String>,

    /// Number of pod listings before discovery gives up.
    #[serde(default = "default_discovery_attempts")]
    pub discovery_attempts: u32,

    /// Pause before each pod listing.
    #[serde(default = "default_discovery_interval_secs")]
    pub discovery_interval_secs: u64,

    /// Well-known port numbers and the names given to their ports.
    #[serde(default = "default_port_names")]
    pub port_names: BTreeMap<u16, String>,

    /// Labels written onto inspected containers.
    #[serde(default = "default_server_labels")]
    pub server_labels: BTreeMap<String, String>,
}

fn default_api_endpoint() -> String {
    "https://10.0.2.15:8443/".to_string()
}

fn default_request_timeout_secs() -> u64 {
    30
}

fn default_project() -> String {
    "eclipse-che".to_string()
}

fn default_service_account() -> String {
    "cheserviceaccount".to_string()
}

fn default_external_address() -> String {
    "172.17.0.1".to_string()
}

fn default_resource_prefix() -> String {
    "che-ws-".to_string()
}

fn default_discovery_attempts() -> u32 {
    120
}

fn default_discovery_interval_secs() -> u64 {
    1
}

/// Names for the ports a workspace agent image usually exposes.
#[must_use]
pub fn default_port_names() -> BTreeMap<u16, String> {
    [
        (22, "sshd"),
        (4401, "wsagent"),
        (4403, "wsagent-jpda"),
        (4411, "terminal"),
        (8080, "tomcat"),
        (8000, "tomcat-jpda"),
        (9876, "codeserver"),
    ]
    .into_iter()
    .map(|(port, name)| (port, name.to_string()))
    .collect()
}

/// Server labels describing the IDE-facing ports.
#[must_use]
pub fn default_server_labels() -> BTreeMap<String, String> {
    [
        ("che:server:8000:protocol", "http"),
        ("che:server:8000:ref", "tomcat8-debug"),
        ("che:server:8080:protocol", "http"),
        ("che:server:8080:ref", "tomcat8"),
        ("che:server:9876:protocol", "http"),
        ("che:server:9876:ref", "codeserver"),
    ]
    .into_iter()
    .map(|(k, v)| (k.to_string(), v.to_string()))
    .collect()
}

impl Default for ConnectorConfig {
    fn default() -> Self {
        Self {
            api_endpoint: default_api_endpoint(),
            token: None,
            insecure_skip_tls_verify: false,
            request_timeout_secs: default_request_timeout_secs(),
            project: default_project(),
            service_account: default_service_account(),
            external_address: default_external_address(),
            resource_prefix: default_resource_prefix(),
            image_override: None,
            discovery_attempts: default_discovery_attempts(),
            discovery_interval_secs: default_discovery_interval_secs(),
            port_names: default_port_names(),
            server_labels: default_server_labels(),
        }
    }
}
