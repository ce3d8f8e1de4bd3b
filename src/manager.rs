//! Deployment manager for AwairPoller
//!
//! Owns the cluster and Istio clients and drives the uninstall / install
//! sequence. Calls are made one after another; nothing is retried and a failed
//! install leaves already created resources in place.

use k8s_openapi::api::apps::v1::Deployment;
use k8s_openapi::api::core::v1::Service;
use serde::Serialize;
use tracing::{debug, info, instrument, warn};

use crate::config::Config;
use crate::error::{DeployError, DeployResult, ValidationError};
use crate::istio::{build_gateway, build_virtual_service, Gateway, IstioClient, VirtualService};
use crate::k8s::{
    self, build_deployment, build_service, K8sClient, DEFAULT_CONTAINER_IMAGE,
    DEFAULT_CONTAINER_PORT, DEPLOYMENT_NAME, NAMESPACE,
};

/// Fragment every deployment name has to contain
pub const REQUIRED_NAME_FRAGMENT: &str = "yam";

/// Installs and removes the AwairPoller workload
pub struct DeploymentManager {
    pub container_image: String,
    pub container_port: i32,
    client: Option<K8sClient>,
    istio: Option<IstioClient>,
    deployment: Option<Deployment>,
    service: Option<Service>,
    virtual_service: Option<VirtualService>,
    gateway: Option<Gateway>,
}

impl Default for DeploymentManager {
    fn default() -> Self {
        Self::new()
    }
}

impl DeploymentManager {
    /// Create a manager with no clients and no resources
    pub fn new() -> Self {
        Self {
            container_image: DEFAULT_CONTAINER_IMAGE.to_string(),
            container_port: DEFAULT_CONTAINER_PORT,
            client: None,
            istio: None,
            deployment: None,
            service: None,
            virtual_service: None,
            gateway: None,
        }
    }

    /// Create a manager deploying the image and port from `config`
    pub fn from_config(config: &Config) -> Self {
        Self {
            container_image: config.container_image.clone(),
            container_port: config.container_port,
            ..Self::new()
        }
    }

    /// Configure the Kubernetes client from a kubeconfig file
    pub async fn kubernetes_client(&mut self, kubeconfig_path: &str) -> DeployResult<()> {
        let client = k8s::connect(kubeconfig_path).await?;
        self.client = Some(K8sClient::new(client, NAMESPACE));
        Ok(())
    }

    /// Configure the Istio client from a kubeconfig file
    pub async fn istio_client(&mut self, kubeconfig_path: &str) -> DeployResult<()> {
        let client = k8s::connect(kubeconfig_path).await?;
        self.istio = Some(IstioClient::new(client, NAMESPACE));
        Ok(())
    }

    pub fn has_kube_client(&self) -> bool {
        self.client.is_some()
    }

    pub fn has_istio_client(&self) -> bool {
        self.istio.is_some()
    }

    pub fn deployment(&self) -> Option<&Deployment> {
        self.deployment.as_ref()
    }

    pub fn service(&self) -> Option<&Service> {
        self.service.as_ref()
    }

    pub fn virtual_service(&self) -> Option<&VirtualService> {
        self.virtual_service.as_ref()
    }

    pub fn gateway(&self) -> Option<&Gateway> {
        self.gateway.as_ref()
    }

    /// Install the Deployment, Service, VirtualService and Gateway
    ///
    /// On success the stored resources are replaced with the objects returned by
    /// the API server.
    #[instrument(skip(self), fields(image = %self.container_image, port = self.container_port))]
    pub async fn install(&mut self) -> DeployResult<()> {
        if self.client.is_none() {
            return Err(DeployError::MissingKubeClient);
        }

        let deployment = build_deployment(&self.container_image, self.container_port);
        let service = build_service(self.container_port);
        let virtual_service = build_virtual_service();
        let gateway = build_gateway();

        self.deployment = Some(deployment.clone());
        self.validate().map_err(DeployError::Validation)?;
        self.archive().map_err(DeployError::Archive)?;

        self.submit(deployment, service, virtual_service, gateway)
            .await
    }

    /// Create the resources in order, stopping at the first failure
    ///
    /// Stored resources are only replaced once every create succeeded.
    async fn submit(
        &mut self,
        deployment: Deployment,
        service: Service,
        virtual_service: VirtualService,
        gateway: Gateway,
    ) -> DeployResult<()> {
        let client = self.client.as_ref().ok_or(DeployError::MissingKubeClient)?;
        let istio = self.istio.as_ref().ok_or(DeployError::MissingIstioClient)?;

        match render(&deployment, &service, &virtual_service, &gateway) {
            Ok(manifests) => debug!("Submitting manifests:\n{}", manifests),
            Err(e) => warn!("Unable to render manifests: {}", e),
        }

        info!("Installing AwairPoller");
        let deployment = client.create_deployment(&deployment).await?;
        let service = client.create_service(&service).await?;
        let virtual_service = istio.create_virtual_service(&virtual_service).await?;
        let gateway = istio.create_gateway(&gateway).await?;

        self.deployment = Some(deployment);
        self.service = Some(service);
        self.virtual_service = Some(virtual_service);
        self.gateway = Some(gateway);

        info!("AwairPoller installed");
        Ok(())
    }

    /// Check the stored deployment before it is submitted
    pub fn validate(&self) -> Result<(), ValidationError> {
        let deployment = self
            .deployment
            .as_ref()
            .ok_or(ValidationError::MissingDeployment)?;

        let containers = deployment
            .spec
            .as_ref()
            .and_then(|s| s.template.spec.as_ref())
            .map(|p| p.containers.len())
            .unwrap_or(0);
        if containers < 1 {
            return Err(ValidationError::NoContainers);
        }

        let name = deployment.metadata.name.as_deref().unwrap_or_default();
        if !name.contains(REQUIRED_NAME_FRAGMENT) {
            return Err(ValidationError::InvalidName(name.to_string()));
        }

        Ok(())
    }

    /// Remove the AwairPoller deployment
    ///
    /// Only the Deployment is deleted; the Service, Gateway and VirtualService
    /// are left in the cluster.
    #[instrument(skip(self))]
    pub async fn uninstall(&self) -> DeployResult<()> {
        let client = self.client.as_ref().ok_or(DeployError::MissingKubeClient)?;
        client.delete_deployment(DEPLOYMENT_NAME).await
    }

    /// Record the deployment about to be installed
    ///
    /// Nothing is persisted yet; only the presence of a deployment is checked.
    pub fn archive(&self) -> Result<(), ValidationError> {
        let deployment = self
            .deployment
            .as_ref()
            .ok_or(ValidationError::MissingDeployment)?;
        debug!(
            name = deployment.metadata.name.as_deref().unwrap_or("unknown"),
            "Archive requested, no archive backend configured"
        );
        Ok(())
    }

    /// Render the resources `install` would submit as a multi-document YAML string
    pub fn render_manifests(&self) -> DeployResult<String> {
        render(
            &build_deployment(&self.container_image, self.container_port),
            &build_service(self.container_port),
            &build_virtual_service(),
            &build_gateway(),
        )
    }
}

fn render(
    deployment: &Deployment,
    service: &Service,
    virtual_service: &VirtualService,
    gateway: &Gateway,
) -> DeployResult<String> {
    let documents = [
        to_yaml(deployment)?,
        to_yaml(service)?,
        to_yaml(virtual_service)?,
        to_yaml(gateway)?,
    ];

    Ok(documents
        .iter()
        .map(|doc| format!("---\n{}", doc))
        .collect())
}

fn to_yaml<T: Serialize>(resource: &T) -> DeployResult<String> {
    Ok(serde_yaml::to_string(resource)?)
}
