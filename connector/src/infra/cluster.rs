//! Infrastructure implementation of the `ClusterApi` port over the OpenShift
//! REST API.

use std::time::Duration;

use anyhow::{Context, Result};
use connector_common::{
    ApiStatus, ConnectorConfig, DeploymentConfig, Pod, Project, ResourceList, Service,
};
use reqwest::{Method, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use serde_json::json;

use crate::application::ports::ClusterApi;
use crate::domain::ClusterError;

const PROJECTS_PATH: &str = "/apis/project.openshift.io/v1/projects";

/// Namespaced collection path, e.g. `/api/v1/namespaces/ns/pods`.
fn core_path(namespace: &str, resource: &str) -> String {
    format!("/api/v1/namespaces/{namespace}/{resource}")
}

fn deployment_configs_path(namespace: &str) -> String {
    format!("/apis/apps.openshift.io/v1/namespaces/{namespace}/deploymentconfigs")
}

/// REST client for the OpenShift API server.
#[derive(Debug, Clone)]
pub struct OpenShiftClient {
    base_url: String,
    token: Option<String>,
    http: reqwest::Client,
}

impl OpenShiftClient {
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(config: &ConnectorConfig) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .danger_accept_invalid_certs(config.insecure_skip_tls_verify)
            .build()
            .context("failed to build HTTP client")?;
        if config.insecure_skip_tls_verify {
            tracing::warn!(endpoint = %config.api_endpoint, "TLS certificate verification disabled");
        }
        Ok(Self {
            base_url: config.api_endpoint.trim_end_matches('/').to_string(),
            token: config.token.clone(),
            http,
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let builder = self.http.request(method, self.url(path));
        match &self.token {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    async fn send(&self, method: Method, path: &str, builder: RequestBuilder) -> Result<Response> {
        let response = builder
            .send()
            .await
            .with_context(|| format!("{method} {path} failed"))?;
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response.text().await.unwrap_or_default();
        Err(status_error(method.as_str(), path, status.as_u16(), &body).into())
    }

    async fn get_list<T: DeserializeOwned>(&self, path: &str) -> Result<Vec<T>> {
        let response = self
            .send(Method::GET, path, self.request(Method::GET, path))
            .await?;
        let list: ResourceList<T> = response
            .json()
            .await
            .with_context(|| format!("cannot parse response of GET {path}"))?;
        Ok(list.into_items())
    }

    async fn post<T: serde::Serialize + DeserializeOwned>(&self, path: &str, body: &T) -> Result<T> {
        let response = self
            .send(Method::POST, path, self.request(Method::POST, path).json(body))
            .await?;
        response
            .json()
            .await
            .with_context(|| format!("cannot parse response of POST {path}"))
    }

    async fn delete(&self, path: &str) -> Result<()> {
        let options = json!({
            "kind": "DeleteOptions",
            "apiVersion": "v1",
            "propagationPolicy": "Background",
        });
        let builder = self.request(Method::DELETE, path).json(&options);
        match self.send(Method::DELETE, path, builder).await {
            Ok(_) => Ok(()),
            Err(e) if e.downcast_ref::<ClusterError>().is_some_and(ClusterError::is_not_found) => {
                tracing::debug!(path, "already deleted");
                Ok(())
            }
            Err(e) => Err(e),
        }
    }
}

/// Turn a non-2xx answer into a [`ClusterError`], using the Kubernetes
/// `Status` body when there is one.
fn status_error(method: &str, path: &str, status: u16, body: &str) -> ClusterError {
    let parsed: ApiStatus = serde_json::from_str(body).unwrap_or_default();
    let message = parsed
        .message
        .filter(|m| !m.is_empty())
        .unwrap_or_else(|| body.trim().to_string());
    ClusterError::Status {
        method: method.to_string(),
        path: path.to_string(),
        status,
        reason: parsed.reason,
        message,
    }
}

impl ClusterApi for OpenShiftClient {
    async fn list_projects(&self) -> Result<Vec<Project>> {
        self.get_list(PROJECTS_PATH).await
    }

    async fn list_pods(&self, namespace: &str) -> Result<Vec<Pod>> {
        self.get_list(&core_path(namespace, "pods")).await
    }

    async fn list_services(&self, namespace: &str) -> Result<Vec<Service>> {
        self.get_list(&core_path(namespace, "services")).await
    }

    async fn create_service(&self, service: &Service) -> Result<Service> {
        let namespace = service.metadata.namespace.as_deref().unwrap_or_default();
        self.post(&core_path(namespace, "services"), service).await
    }

    async fn create_deployment_config(
        &self,
        deployment: &DeploymentConfig,
    ) -> Result<DeploymentConfig> {
        let namespace = deployment.metadata.namespace.as_deref().unwrap_or_default();
        self.post(&deployment_configs_path(namespace), deployment)
            .await
    }

    async fn delete_service(&self, namespace: &str, name: &str) -> Result<()> {
        self.delete(&format!("{}/{name}", core_path(namespace, "services")))
            .await
    }

    async fn delete_deployment_config(&self, namespace: &str, name: &str) -> Result<()> {
        self.delete(&format!("{}/{name}", deployment_configs_path(namespace)))
            .await
    }
}
