//! Istio networking client
//!
//! Submits Gateway and VirtualService CRDs through the dynamic API

use kube::{
    api::{Api, DynamicObject, PostParams},
    discovery::ApiResource,
    Client,
};
use serde::{de::DeserializeOwned, Serialize};
use tracing::{error, info, instrument};

use super::types::*;
use crate::error::{DeployError, DeployResult};
use crate::k8s::ResourceKind;

/// Istio API client wrapper
#[derive(Clone)]
pub struct IstioClient {
    client: Client,
    namespace: String,
}

impl IstioClient {
    /// Create an IstioClient operating in `namespace`
    pub fn new(client: Client, namespace: &str) -> Self {
        Self {
            client,
            namespace: namespace.to_string(),
        }
    }

    /// Create a Gateway resource
    #[instrument(skip(self, gateway), fields(namespace = %self.namespace))]
    pub async fn create_gateway(&self, gateway: &Gateway) -> DeployResult<Gateway> {
        self.create(ResourceKind::Gateway, &gateway_resource(), gateway)
            .await
    }

    /// Create a VirtualService resource
    #[instrument(skip(self, virtual_service), fields(namespace = %self.namespace))]
    pub async fn create_virtual_service(
        &self,
        virtual_service: &VirtualService,
    ) -> DeployResult<VirtualService> {
        self.create(
            ResourceKind::VirtualService,
            &virtual_service_resource(),
            virtual_service,
        )
        .await
    }

    /// Round-trip a typed resource through a DynamicObject and back
    async fn create<T>(&self, kind: ResourceKind, ar: &ApiResource, resource: &T) -> DeployResult<T>
    where
        T: Serialize + DeserializeOwned,
    {
        let manifest_err = |source| DeployError::Manifest { kind, source };

        let obj: DynamicObject = serde_json::to_value(resource)
            .and_then(serde_json::from_value)
            .map_err(manifest_err)?;
        let name = obj.metadata.name.clone().unwrap_or_default();

        info!("Creating {} '{}'", kind, name);

        let api: Api<DynamicObject> =
            Api::namespaced_with(self.client.clone(), &self.namespace, ar);

        match api.create(&PostParams::default(), &obj).await {
            Ok(created) => {
                info!("Created {}: {}", kind, name);
                serde_json::to_value(created)
                    .and_then(serde_json::from_value)
                    .map_err(manifest_err)
            }
            Err(source) => {
                error!("Failed to create {}: {}", kind, source);
                Err(DeployError::Create { kind, name, source })
            }
        }
    }
}
