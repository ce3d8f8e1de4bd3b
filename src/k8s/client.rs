//! Kubernetes client wrapper for AwairPoller

use k8s_openapi::api::apps::v1::Deployment;
use k8s_openapi::api::core::v1::Service;
use kube::{
    api::{Api, DeleteParams, PostParams},
    config::{KubeConfigOptions, Kubeconfig},
    Client, Config,
};
use tracing::{info, instrument};

use super::ResourceKind;
use crate::error::{DeployError, DeployResult};

/// Build an authenticated client from the kubeconfig file at `path`
///
/// Only the file is read here; the cluster is not contacted until the first
/// request.
#[instrument]
pub async fn connect(path: &str) -> DeployResult<Client> {
    let kubeconfig = Kubeconfig::read_from(path).map_err(|source| DeployError::Kubeconfig {
        path: path.to_string(),
        source,
    })?;

    let config = Config::from_custom_kubeconfig(kubeconfig, &KubeConfigOptions::default())
        .await
        .map_err(|source| DeployError::Kubeconfig {
            path: path.to_string(),
            source,
        })?;

    let client = Client::try_from(config).map_err(|source| DeployError::Authentication {
        path: path.to_string(),
        source,
    })?;

    info!("Created Kubernetes client");
    Ok(client)
}

/// Wrapper around kube::Client scoped to one namespace
#[derive(Clone)]
pub struct K8sClient {
    client: Client,
    namespace: String,
}

impl K8sClient {
    /// Create a K8sClient operating in `namespace`
    pub fn new(client: Client, namespace: &str) -> Self {
        Self {
            client,
            namespace: namespace.to_string(),
        }
    }

    fn deployments(&self) -> Api<Deployment> {
        Api::namespaced(self.client.clone(), &self.namespace)
    }

    fn services(&self) -> Api<Service> {
        Api::namespaced(self.client.clone(), &self.namespace)
    }

    /// Create a deployment, returning the object stored by the API server
    #[instrument(skip(self, deployment), fields(namespace = %self.namespace, deployment_name = %deployment.metadata.name.as_deref().unwrap_or("unknown")))]
    pub async fn create_deployment(&self, deployment: &Deployment) -> DeployResult<Deployment> {
        let created = self
            .deployments()
            .create(&PostParams::default(), deployment)
            .await
            .map_err(|source| DeployError::Create {
                kind: ResourceKind::Deployment,
                name: deployment.metadata.name.clone().unwrap_or_default(),
                source,
            })?;
        info!("Created deployment");
        Ok(created)
    }

    /// Delete a deployment by name
    #[instrument(skip(self), fields(namespace = %self.namespace))]
    pub async fn delete_deployment(&self, name: &str) -> DeployResult<()> {
        self.deployments()
            .delete(name, &DeleteParams::default())
            .await
            .map_err(|source| DeployError::Delete {
                kind: ResourceKind::Deployment,
                name: name.to_string(),
                source,
            })?;
        info!(name, "Deleted deployment");
        Ok(())
    }

    /// Create a service, returning the object stored by the API server
    #[instrument(skip(self, service), fields(namespace = %self.namespace, service_name = %service.metadata.name.as_deref().unwrap_or("unknown")))]
    pub async fn create_service(&self, service: &Service) -> DeployResult<Service> {
        let created = self
            .services()
            .create(&PostParams::default(), service)
            .await
            .map_err(|source| DeployError::Create {
                kind: ResourceKind::Service,
                name: service.metadata.name.clone().unwrap_or_default(),
                source,
            })?;
        info!("Created service");
        Ok(created)
    }
}
