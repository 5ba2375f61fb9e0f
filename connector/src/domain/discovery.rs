//! Reading container placement out of a pod listing.
//!
//! Pure functions only — the polling itself lives in
//! `application::services::discovery`.

use connector_common::Pod;

use crate::domain::naming::{DEPLOYER_POD_LABEL, DEPLOYMENT_CONFIG_LABEL};

/// Length of a runtime container id (hex SHA-256).
pub const CONTAINER_ID_LEN: usize = 64;

const SCHEME_SEPARATOR: &str = "://";

/// What one pod listing says about a deployment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PodScan {
    /// Deployer pods are still present in the namespace.
    RolloutInProgress { deployer_pods: usize },
    /// Rollout finished but no pod of the deployment reports a container yet.
    Pending,
    /// Runtime container id of the deployment's pod.
    Ready(String),
}

/// Inspect one pod listing for the container of `deployment_name`.
#[must_use]
pub fn scan_pods(pods: &[Pod], deployment_name: &str) -> PodScan {
    let deployer_pods = pods
        .iter()
        .filter(|pod| pod.metadata.labels.contains_key(DEPLOYER_POD_LABEL))
        .count();
    if deployer_pods > 0 {
        return PodScan::RolloutInProgress { deployer_pods };
    }

    pods.iter()
        .filter(|pod| {
            pod.metadata
                .labels
                .get(DEPLOYMENT_CONFIG_LABEL)
                .is_some_and(|name| name == deployment_name)
        })
        .find_map(first_container_id)
        .map_or(PodScan::Pending, PodScan::Ready)
}

fn first_container_id(pod: &Pod) -> Option<String> {
    pod.status
        .as_ref()?
        .container_statuses
        .first()?
        .container_id
        .as_deref()
        .and_then(parse_container_id)
}

/// Extract the runtime id from `<scheme>://<64 hex chars>`.
#[must_use]
pub fn parse_container_id(raw: &str) -> Option<String> {
    let (_, rest) = raw.split_once(SCHEME_SEPARATOR)?;
    let id = rest.get(..CONTAINER_ID_LEN)?;
    id.chars()
        .all(|c| c.is_ascii_hexdigit())
        .then(|| id.to_string())
}
