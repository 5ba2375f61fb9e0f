//! Typed domain error enums.
//!
//! This module has zero imports from `crate::infra`, `crate::application`,
//! `tokio`, or `reqwest`. All error types implement `thiserror::Error` and
//! convert to `anyhow::Error` via the `?` operator. Callers recover the kind
//! with `anyhow::Error::downcast_ref`.

use thiserror::Error;

// ── Connector errors ──────────────────────────────────────────────────────────

/// Failures of the container create / inspect flows.
#[derive(Debug, Error)]
pub enum ConnectorError {
    #[error("OpenShift project '{0}' not found")]
    ProjectNotFound(String),

    #[error("OpenShift project '{name}' is listed {count} times; expected exactly one")]
    AmbiguousProject { name: String, count: usize },

    #[error("Malformed exposed port '{spec}': {reason}")]
    MalformedPortSpec { spec: String, reason: String },

    #[error("Malformed environment entry '{0}': expected NAME=VALUE")]
    MalformedEnvEntry(String),

    #[error("No workspace id found in CHE_WORKSPACE_ID")]
    MissingWorkspaceId,

    #[error("Invalid container name '{name}': {reason}")]
    InvalidContainerName { name: String, reason: String },

    #[error("Failed to create service '{0}'")]
    ServiceCreationFailed(String),

    #[error("Failed to create deployment config '{0}'")]
    DeploymentCreationFailed(String),

    #[error("No container observed for deployment config '{name}' after {attempts} attempts")]
    ContainerDiscoveryTimeout { name: String, attempts: u32 },

    #[error("Waiting for the container of deployment config '{0}' was cancelled")]
    ContainerDiscoveryCancelled(String),

    #[error("No service with prefix '{0}' found")]
    ServiceNotFound(String),

    #[error("Several services match prefix '{prefix}': {candidates}")]
    AmbiguousService { prefix: String, candidates: String },
}

// ── Cluster errors ────────────────────────────────────────────────────────────

/// Non-success answers from the cluster API server.
#[derive(Debug, Error)]
pub enum ClusterError {
    #[error("{method} {path} failed with HTTP {status}: {message}")]
    Status {
        method: String,
        path: String,
        status: u16,
        reason: Option<String>,
        message: String,
    },
}

impl ClusterError {
    #[must_use]
    pub fn status(&self) -> u16 {
        match self {
            Self::Status { status, .. } => *status,
        }
    }

    /// The object already exists (duplicate name).
    #[must_use]
    pub fn is_conflict(&self) -> bool {
        self.status() == 409
    }

    #[must_use]
    pub fn is_not_found(&self) -> bool {
        self.status() == 404
    }
}

// ── Config errors ─────────────────────────────────────────────────────────────

/// Errors related to connector configuration values.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid value for {key}: '{value}'\n\n{reason}")]
    InvalidValue {
        key: String,
        value: String,
        reason: String,
    },
}
