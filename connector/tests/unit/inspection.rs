//! Inspection enrichment through `ContainerConnector`.

#![allow(clippy::expect_used, clippy::unwrap_used)]

use connector_common::default_server_labels;
use openshift_connector::ConnectorError;
use openshift_connector::domain::{ContainerInfo, PortBinding};

use crate::fakes::{
    CONTAINER_HASH, FakeBackend, FakeCluster, connector, inspected, node_port_service,
};

fn cluster_with(services: Vec<connector_common::Service>) -> FakeCluster {
    FakeCluster {
        services,
        ..FakeCluster::with_project("eclipse-che")
    }
}

#[tokio::test]
async fn node_ports_become_host_bindings() {
    let cluster = cluster_with(vec![node_port_service(
        "che-ws-abc",
        &[("TCP", 8080, Some(31080)), ("TCP", 22, Some(32022))],
    )]);
    let backend = FakeBackend(Some(inspected(&["CHE_WORKSPACE_ID=workspaceabc"], true)));
    let connector = connector(cluster, backend);

    let info = connector
        .inspect_container(CONTAINER_HASH)
        .await
        .unwrap()
        .expect("container exists");

    let ports = &info.network_settings.as_ref().unwrap().ports;
    assert_eq!(
        ports["8080/tcp"],
        vec![PortBinding {
            host_ip: "172.17.0.1".to_string(),
            host_port: "31080".to_string(),
        }]
    );
    assert_eq!(ports["22/tcp"][0].host_port, "32022");
    assert_eq!(ports.len(), 2);
    assert_eq!(info.config.unwrap().labels, default_server_labels());
}

#[tokio::test]
async fn prefix_lookup_without_workspace_id() {
    let cluster = cluster_with(vec![
        node_port_service("router", &[("TCP", 80, Some(30080))]),
        node_port_service("che-ws-abc", &[("UDP", 9876, Some(31876))]),
    ]);
    let connector = connector(cluster, FakeBackend(Some(inspected(&[], true))));

    let info = connector
        .inspect_container(CONTAINER_HASH)
        .await
        .unwrap()
        .unwrap();

    let ports = info.network_settings.unwrap().ports;
    assert_eq!(ports.keys().collect::<Vec<_>>(), vec!["9876/udp"]);
}

#[tokio::test]
async fn record_without_network_settings_is_untouched() {
    let original = inspected(&["CHE_WORKSPACE_ID=workspaceabc"], false);
    let connector = connector(cluster_with(Vec::new()), FakeBackend(Some(original.clone())));

    let info = connector
        .inspect_container(CONTAINER_HASH)
        .await
        .unwrap()
        .unwrap();

    assert_eq!(info, original);
    assert_eq!(connector.cluster().project_lists(), 0);
}

#[tokio::test]
async fn record_without_config_gets_ports_but_no_labels() {
    let cluster = cluster_with(vec![node_port_service(
        "che-ws-abc",
        &[("TCP", 8080, Some(31080))],
    )]);
    let record = ContainerInfo {
        config: None,
        ..inspected(&[], true)
    };
    let connector = connector(cluster, FakeBackend(Some(record)));

    let info = connector
        .inspect_container(CONTAINER_HASH)
        .await
        .unwrap()
        .unwrap();

    assert!(info.config.is_none());
    let ports = info.network_settings.unwrap().ports;
    assert_eq!(ports["8080/tcp"][0].host_port, "31080");
    assert_eq!(ports["8080/tcp"][0].host_ip, "172.17.0.1");
}

#[tokio::test]
async fn unknown_container_is_none() {
    let connector = connector(cluster_with(Vec::new()), FakeBackend(None));
    assert!(connector.inspect_container("nope").await.unwrap().is_none());
}

#[tokio::test]
async fn missing_service_is_an_error() {
    let cluster = cluster_with(vec![node_port_service("router", &[("TCP", 80, Some(30080))])]);
    let backend = FakeBackend(Some(inspected(&["CHE_WORKSPACE_ID=workspaceabc"], true)));
    let connector = connector(cluster, backend);

    let err = connector
        .inspect_container(CONTAINER_HASH)
        .await
        .unwrap_err();

    assert!(matches!(
        err.downcast_ref::<ConnectorError>(),
        Some(ConnectorError::ServiceNotFound(name)) if name == "che-ws-abc"
    ));
}

#[tokio::test]
async fn several_workspaces_need_a_workspace_id() {
    let services = vec![
        node_port_service("che-ws-abc", &[("TCP", 8080, Some(31080))]),
        node_port_service("che-ws-def", &[("TCP", 8080, Some(31081))]),
    ];

    let connector = connector(
        cluster_with(services.clone()),
        FakeBackend(Some(inspected(&[], true))),
    );
    let err = connector
        .inspect_container(CONTAINER_HASH)
        .await
        .unwrap_err();
    assert!(matches!(
        err.downcast_ref::<ConnectorError>(),
        Some(ConnectorError::AmbiguousService { .. })
    ));

    let connector = connector_for(services, "CHE_WORKSPACE_ID=workspacedef");
    let info = connector
        .inspect_container(CONTAINER_HASH)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(info.network_settings.unwrap().ports["8080/tcp"][0].host_port, "31081");
}

fn connector_for(
    services: Vec<connector_common::Service>,
    env: &str,
) -> openshift_connector::ContainerConnector<FakeCluster, FakeBackend> {
    connector(cluster_with(services), FakeBackend(Some(inspected(&[env], true))))
}
