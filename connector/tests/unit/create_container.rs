//! Container creation through `ContainerConnector` against a fake cluster.

#![allow(clippy::expect_used, clippy::unwrap_used)]

use std::collections::BTreeMap;
use std::time::Duration;

use connector_common::{ConnectorConfig, IntOrString};
use openshift_connector::{
    ClusterError, ConnectorError, ContainerConnector, CreateContainerRequest,
};

use crate::fakes::{
    CONTAINER_HASH, FakeCluster, NoBackend, PodListing, connector, deployer_pod, running_pod,
    workspace_pod,
};

fn request(ports: &[&str], env: &[&str]) -> CreateContainerRequest {
    CreateContainerRequest {
        container_name: "workspaceabc_machine".to_string(),
        image: "eclipse/ubuntu_jdk8".to_string(),
        exposed_ports: ports
            .iter()
            .map(|p| ((*p).to_string(), BTreeMap::new()))
            .collect(),
        env: env.iter().map(|e| (*e).to_string()).collect(),
    }
}

fn workspace_request() -> CreateContainerRequest {
    request(&["8080/tcp", "22/tcp"], &["CHE_WORKSPACE_ID=workspaceabc"])
}

fn connector_error(err: &anyhow::Error) -> &ConnectorError {
    err.downcast_ref::<ConnectorError>()
        .expect("a ConnectorError in the chain")
}

#[tokio::test(start_paused = true)]
async fn creates_service_and_deployment_and_returns_container_id() {
    let cluster = FakeCluster::with_project("eclipse-che").script(vec![
        PodListing::Pods(vec![deployer_pod("che-ws-abc")]),
        PodListing::Pods(vec![running_pod("che-ws-abc")]),
    ]);
    let connector = connector(cluster, NoBackend);

    let id = connector
        .create_container(&workspace_request())
        .await
        .unwrap();
    assert_eq!(id, CONTAINER_HASH);

    let cluster = connector.cluster();
    let services = cluster.created_services();
    assert_eq!(services.len(), 1);
    let service = &services[0];
    assert_eq!(service.metadata.name, "che-ws-abc");
    assert_eq!(service.metadata.namespace.as_deref(), Some("eclipse-che"));
    assert_eq!(service.spec.service_type.as_deref(), Some("NodePort"));
    let port_names: Vec<&str> = service.spec.ports.iter().map(|p| p.name.as_str()).collect();
    assert_eq!(port_names, vec!["sshd", "tomcat"]);
    assert!(
        service
            .spec
            .ports
            .iter()
            .all(|p| p.target_port == IntOrString::Int(i32::from(p.port)))
    );

    let deployments = cluster.created_deployments();
    assert_eq!(deployments.len(), 1);
    let deployment = &deployments[0];
    assert_eq!(deployment.metadata.name, "che-ws-abc");
    assert_eq!(deployment.spec.selector, service.spec.selector);
    let container = &deployment.spec.template.spec.containers[0];
    assert_eq!(container.image, "eclipse/ubuntu_jdk8");
    assert_eq!(container.image_pull_policy.as_deref(), Some("Always"));
    let mut container_ports: Vec<(u16, &str, &str)> = container
        .ports
        .iter()
        .map(|p| (p.container_port, p.name.as_str(), p.protocol.as_str()))
        .collect();
    container_ports.sort_unstable();
    assert_eq!(container_ports, vec![(22, "sshd", "TCP"), (8080, "tomcat", "TCP")]);
    assert_eq!(container.env[0].name, "CHE_WORKSPACE_ID");
    assert_eq!(container.env[0].value, "workspaceabc");

    assert_eq!(cluster.pod_lists(), 2);
    assert!(cluster.deleted().is_empty());
}

#[tokio::test(start_paused = true)]
async fn image_override_replaces_requested_image() {
    let cluster = FakeCluster::with_project("eclipse-che")
        .script(vec![PodListing::Pods(vec![running_pod("che-ws-abc")])]);
    let config = ConnectorConfig {
        image_override: Some("mariolet/che-ws-agent".to_string()),
        ..ConnectorConfig::default()
    };
    let connector = ContainerConnector::new(cluster, NoBackend, config).unwrap();

    connector
        .create_container(&workspace_request())
        .await
        .unwrap();

    let deployments = connector.cluster().created_deployments();
    assert_eq!(
        deployments[0].spec.template.spec.containers[0].image,
        "mariolet/che-ws-agent"
    );
}

#[tokio::test]
async fn missing_project_fails_before_any_creation() {
    let connector = connector(FakeCluster::with_project("other"), NoBackend);

    let err = connector
        .create_container(&workspace_request())
        .await
        .unwrap_err();

    assert_eq!(err.to_string(), "could not create workspace container");
    assert!(matches!(
        connector_error(&err),
        ConnectorError::ProjectNotFound(name) if name == "eclipse-che"
    ));
    assert!(connector.cluster().created_services().is_empty());
    assert!(connector.cluster().created_deployments().is_empty());
}

#[tokio::test]
async fn duplicate_project_is_ambiguous() {
    let mut cluster = FakeCluster::with_project("eclipse-che");
    cluster.projects.push(cluster.projects[0].clone());
    let connector = connector(cluster, NoBackend);

    let err = connector
        .create_container(&workspace_request())
        .await
        .unwrap_err();

    assert!(matches!(
        connector_error(&err),
        ConnectorError::AmbiguousProject { count: 2, .. }
    ));
}

#[tokio::test]
async fn missing_workspace_id_is_rejected_without_cluster_calls() {
    let connector = connector(FakeCluster::with_project("eclipse-che"), NoBackend);

    let err = connector
        .create_container(&request(&["8080/tcp"], &["PATH=/bin"]))
        .await
        .unwrap_err();

    assert!(matches!(connector_error(&err), ConnectorError::MissingWorkspaceId));
    assert_eq!(connector.cluster().project_lists(), 0);
}

#[tokio::test]
async fn malformed_input_leaves_nothing_behind() {
    let connector = connector(FakeCluster::with_project("eclipse-che"), NoBackend);

    let err = connector
        .create_container(&request(
            &["8080/tcp"],
            &["CHE_WORKSPACE_ID=workspaceabc", "BROKEN"],
        ))
        .await
        .unwrap_err();
    assert!(matches!(
        connector_error(&err),
        ConnectorError::MalformedEnvEntry(entry) if entry == "BROKEN"
    ));

    let err = connector
        .create_container(&request(&["http/tcp"], &["CHE_WORKSPACE_ID=workspaceabc"]))
        .await
        .unwrap_err();
    assert!(matches!(
        connector_error(&err),
        ConnectorError::MalformedPortSpec { .. }
    ));

    assert!(connector.cluster().created_services().is_empty());
    assert!(connector.cluster().deleted().is_empty());
}

#[tokio::test]
async fn service_conflict_is_surfaced_and_not_rolled_back() {
    let cluster = FakeCluster {
        fail_service_with: Some(409),
        ..FakeCluster::with_project("eclipse-che")
    };
    let connector = connector(cluster, NoBackend);

    let err = connector
        .create_container(&workspace_request())
        .await
        .unwrap_err();

    assert!(matches!(
        connector_error(&err),
        ConnectorError::ServiceCreationFailed(name) if name == "che-ws-abc"
    ));
    let cause = err.downcast_ref::<ClusterError>().expect("cluster cause");
    assert!(cause.is_conflict());
    assert!(connector.cluster().deleted().is_empty());
    assert!(connector.cluster().created_deployments().is_empty());
}

#[tokio::test]
async fn deployment_failure_deletes_both_resources() {
    let cluster = FakeCluster {
        fail_deployment_with: Some(504),
        ..FakeCluster::with_project("eclipse-che")
    };
    let connector = connector(cluster, NoBackend);

    let err = connector
        .create_container(&workspace_request())
        .await
        .unwrap_err();

    assert!(matches!(
        connector_error(&err),
        ConnectorError::DeploymentCreationFailed(name) if name == "che-ws-abc"
    ));
    assert_eq!(
        connector.cluster().deleted(),
        vec!["deploymentconfig/che-ws-abc", "service/che-ws-abc"]
    );
}

#[tokio::test]
async fn conflicting_deployment_is_left_alone() {
    let cluster = FakeCluster {
        fail_deployment_with: Some(409),
        ..FakeCluster::with_project("eclipse-che")
    };
    let connector = connector(cluster, NoBackend);

    let err = connector
        .create_container(&workspace_request())
        .await
        .unwrap_err();

    assert!(err.downcast_ref::<ClusterError>().expect("cluster cause").is_conflict());
    assert_eq!(connector.cluster().deleted(), vec!["service/che-ws-abc"]);
}

#[tokio::test(start_paused = true)]
async fn discovery_timeout_rolls_back_both_resources() {
    let cluster = FakeCluster::with_project("eclipse-che")
        .script(vec![PodListing::Pods(vec![workspace_pod("che-ws-abc", None)])]);
    let connector = connector(cluster, NoBackend);
    let start = tokio::time::Instant::now();

    let err = connector
        .create_container(&workspace_request())
        .await
        .unwrap_err();

    assert!(matches!(
        connector_error(&err),
        ConnectorError::ContainerDiscoveryTimeout { attempts: 120, .. }
    ));
    assert!(start.elapsed() <= Duration::from_secs(120));
    assert_eq!(connector.cluster().pod_lists(), 120);
    assert_eq!(
        connector.cluster().deleted(),
        vec!["deploymentconfig/che-ws-abc", "service/che-ws-abc"]
    );
}

#[tokio::test(start_paused = true)]
async fn cleanup_failure_keeps_original_error() {
    let cluster = FakeCluster {
        fail_deletes: true,
        ..FakeCluster::with_project("eclipse-che")
    };
    let config = ConnectorConfig {
        discovery_attempts: 3,
        ..ConnectorConfig::default()
    };
    let connector = ContainerConnector::new(cluster, NoBackend, config).unwrap();

    let err = connector
        .create_container(&workspace_request())
        .await
        .unwrap_err();

    assert!(matches!(
        connector_error(&err),
        ConnectorError::ContainerDiscoveryTimeout { attempts: 3, .. }
    ));
    assert_eq!(connector.cluster().deleted().len(), 2);
}

#[tokio::test(start_paused = true)]
async fn cancellation_stops_discovery_and_rolls_back() {
    let connector = connector(FakeCluster::with_project("eclipse-che"), NoBackend);

    let err = connector
        .create_container_with_cancel(
            &workspace_request(),
            tokio::time::sleep(Duration::from_millis(4500)),
        )
        .await
        .unwrap_err();

    assert!(matches!(
        connector_error(&err),
        ConnectorError::ContainerDiscoveryCancelled(name) if name == "che-ws-abc"
    ));
    assert_eq!(connector.cluster().pod_lists(), 4);
    assert_eq!(connector.cluster().deleted().len(), 2);
}

#[tokio::test(start_paused = true)]
async fn rejected_credentials_end_discovery_early() {
    let cluster = FakeCluster::with_project("eclipse-che").script(vec![
        PodListing::Fail(500),
        PodListing::Fail(401),
        PodListing::Pods(vec![running_pod("che-ws-abc")]),
    ]);
    let connector = connector(cluster, NoBackend);

    let err = connector
        .create_container(&workspace_request())
        .await
        .unwrap_err();

    let cause = err.downcast_ref::<ClusterError>().expect("cluster cause");
    assert_eq!(cause.status(), 401);
    assert_eq!(connector.cluster().pod_lists(), 2);
    assert_eq!(connector.cluster().deleted().len(), 2);
}
