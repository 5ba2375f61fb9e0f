//! Resource naming convention.
//!
//! A workspace's Service, DeploymentConfig and pods are tied together only by
//! the name `<prefix><workspace id>` and the `deploymentConfig` label carrying
//! that name. Every provisioner derives names through [`ResourceNames`] so the
//! two sides cannot drift apart.

use std::collections::BTreeMap;

use anyhow::Result;

use crate::domain::error::ConnectorError;

/// Label linking Service selector, DeploymentConfig selector and pods.
pub const DEPLOYMENT_CONFIG_LABEL: &str = "deploymentConfig";

/// Label present on deployer helper pods while a rollout is in progress.
pub const DEPLOYER_POD_LABEL: &str = "openshift.io/deployer-pod-for.name";

/// Generated names for one workspace.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceNames {
    name: String,
}

impl ResourceNames {
    /// # Errors
    ///
    /// Returns `MissingWorkspaceId` if `workspace_id` is empty; every
    /// workspace would otherwise share the bare prefix as its name.
    pub fn new(prefix: &str, workspace_id: &str) -> Result<Self> {
        if workspace_id.is_empty() {
            return Err(ConnectorError::MissingWorkspaceId.into());
        }
        Ok(Self {
            name: format!("{prefix}{workspace_id}"),
        })
    }

    /// Name shared by the Service and the DeploymentConfig.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Selector matching the workspace pods.
    #[must_use]
    pub fn selector(&self) -> BTreeMap<String, String> {
        BTreeMap::from([(DEPLOYMENT_CONFIG_LABEL.to_string(), self.name.clone())])
    }
}
