//! Istio networking resource models
//!
//! Only the fields this crate sets are modelled; anything else the API server
//! returns in `spec` is dropped on deserialization.

use k8s_openapi::apimachinery::pkg::apis::meta::v1::ObjectMeta;
use kube::discovery::ApiResource;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

pub const ISTIO_GROUP: &str = "networking.istio.io";
pub const ISTIO_VERSION: &str = "v1alpha3";

/// `networking.istio.io/v1alpha3`
pub fn api_version() -> String {
    format!("{}/{}", ISTIO_GROUP, ISTIO_VERSION)
}

/// API resource for the Gateway CRD
pub fn gateway_resource() -> ApiResource {
    ApiResource {
        group: ISTIO_GROUP.to_string(),
        version: ISTIO_VERSION.to_string(),
        api_version: api_version(),
        kind: "Gateway".to_string(),
        plural: "gateways".to_string(),
    }
}

/// API resource for the VirtualService CRD
pub fn virtual_service_resource() -> ApiResource {
    ApiResource {
        group: ISTIO_GROUP.to_string(),
        version: ISTIO_VERSION.to_string(),
        api_version: api_version(),
        kind: "VirtualService".to_string(),
        plural: "virtualservices".to_string(),
    }
}

/// Gateway custom resource
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Gateway {
    pub api_version: String,
    pub kind: String,
    pub metadata: ObjectMeta,
    pub spec: GatewaySpec,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<serde_json::Value>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct GatewaySpec {
    #[serde(default)]
    pub servers: Vec<Server>,
    /// Labels picking the ingress gateway pods this configuration applies to
    #[serde(default)]
    pub selector: BTreeMap<String, String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Server {
    pub port: Port,
    pub hosts: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Port {
    pub number: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub protocol: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

/// VirtualService custom resource
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct VirtualService {
    pub api_version: String,
    pub kind: String,
    pub metadata: ObjectMeta,
    pub spec: VirtualServiceSpec,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<serde_json::Value>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct VirtualServiceSpec {
    #[serde(default)]
    pub hosts: Vec<String>,
    #[serde(default)]
    pub gateways: Vec<String>,
    #[serde(default)]
    pub http: Vec<HttpRoute>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct HttpRoute {
    pub route: Vec<HttpRouteDestination>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct HttpRouteDestination {
    pub destination: Destination,
    /// Share of traffic in percent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weight: Option<i32>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Destination {
    pub host: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subset: Option<String>,
}
