//! Application service — container discovery.
//!
//! Rides out the cluster's eventual consistency: the DeploymentConfig is
//! accepted long before a pod with a runtime container exists.

use std::future::Future;

use anyhow::Result;
use connector_common::Project;

use crate::application::ports::ClusterApi;
use crate::application::services::wait::{PollOutcome, PollPolicy, poll_until};
use crate::domain::{ClusterError, PodScan, scan_pods};

/// Result of waiting for a deployment's container.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Discovery {
    Found(String),
    TimedOut,
    Cancelled,
}

/// Poll the project's pods until the pod of `deployment_name` reports a
/// runtime container id.
///
/// Listing failures are logged and the attempt counts as "not yet", except
/// for authorization failures which no amount of waiting will fix.
///
/// # Errors
///
/// Returns the listing error when the cluster rejects the credentials.
pub async fn wait_for_container_id(
    cluster: &impl ClusterApi,
    project: &Project,
    deployment_name: &str,
    policy: &PollPolicy,
    cancel: impl Future<Output = ()>,
) -> Result<Discovery> {
    let namespace = project.namespace();

    let outcome = poll_until(policy, cancel, |attempt| async move {
        let pods = match cluster.list_pods(namespace).await {
            Ok(pods) => pods,
            Err(e) if is_unauthorized(&e) => return Some(Err(e)),
            Err(e) => {
                tracing::warn!(attempt, namespace, error = %e, "failed to list pods");
                return None;
            }
        };
        match scan_pods(&pods, deployment_name) {
            PodScan::Ready(id) => Some(Ok(id)),
            PodScan::RolloutInProgress { deployer_pods } => {
                tracing::debug!(
                    attempt,
                    deployer_pods,
                    deployment_config = deployment_name,
                    "rollout in progress"
                );
                None
            }
            PodScan::Pending => {
                tracing::debug!(
                    attempt,
                    deployment_config = deployment_name,
                    "container not yet observed"
                );
                None
            }
        }
    })
    .await;

    Ok(match outcome {
        PollOutcome::Ready(found) => {
            let id = found?;
            tracing::info!(
                deployment_config = deployment_name,
                container_id = %id,
                "container discovered"
            );
            Discovery::Found(id)
        }
        PollOutcome::TimedOut => Discovery::TimedOut,
        PollOutcome::Cancelled => Discovery::Cancelled,
    })
}

fn is_unauthorized(err: &anyhow::Error) -> bool {
    err.downcast_ref::<ClusterError>()
        .is_some_and(|e| matches!(e.status(), 401 | 403))
}
