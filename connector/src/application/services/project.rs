//! Application service — project resolution.

use anyhow::{Context, Result};
use connector_common::Project;

use crate::application::ports::ClusterApi;
use crate::domain::ConnectorError;

/// Find the one project named `name` among those visible to the connector.
///
/// # Errors
///
/// Returns `ProjectNotFound` if no project carries the name,
/// `AmbiguousProject` if more than one does, or the listing failure.
pub async fn resolve_project(cluster: &impl ClusterApi, name: &str) -> Result<Project> {
    let projects = cluster
        .list_projects()
        .await
        .context("failed to list projects")?;

    let mut matches = projects.into_iter().filter(|p| p.name() == name);
    let Some(project) = matches.next() else {
        return Err(ConnectorError::ProjectNotFound(name.to_string()).into());
    };
    let extra = matches.count();
    if extra > 0 {
        return Err(ConnectorError::AmbiguousProject {
            name: name.to_string(),
            count: extra + 1,
        }
        .into());
    }

    tracing::debug!(project = name, namespace = project.namespace(), "resolved project");
    Ok(project)
}
