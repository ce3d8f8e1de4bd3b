//! Kubernetes resource builders for AwairPoller
//!
//! Functions to create the Deployment and Service specs. Names, labels and
//! sizing are fixed; only the container image and port vary.

use k8s_openapi::api::apps::v1::{Deployment, DeploymentSpec};
use k8s_openapi::api::core::v1::{
    Container, ContainerPort, PodSpec, PodTemplateSpec, ResourceRequirements, Service,
    ServicePort, ServiceSpec,
};
use k8s_openapi::apimachinery::pkg::api::resource::Quantity;
use k8s_openapi::apimachinery::pkg::apis::meta::v1::{LabelSelector, ObjectMeta};
use k8s_openapi::apimachinery::pkg::util::intstr::IntOrString;
use std::collections::BTreeMap;

/// Namespace every resource is installed into
pub const NAMESPACE: &str = "default";

pub const DEPLOYMENT_NAME: &str = "awair-poller";
pub const CONTAINER_NAME: &str = "awair-poller";
pub const SERVICE_NAME: &str = "static-site-service";
pub const VIRTUAL_SERVICE_NAME: &str = "static-site";
pub const GATEWAY_NAME: &str = "static-site-gateway";

/// Value of the `app` label shared by the pods and the service
pub const APP_LABEL: &str = "static-site";
pub const VERSION_LABEL: &str = "v1";

pub const REPLICAS: i32 = 3;

pub const DEFAULT_CONTAINER_IMAGE: &str = "thenetworkchuck/nccoffee:vacpot";
pub const DEFAULT_CONTAINER_PORT: i32 = 80;

/// Port the service exposes in front of the container port
pub const SERVICE_PORT: i32 = 80;

const LB_THROTTLE_ANNOTATION: &str = "service.beta.kubernetes.io/linode-loadbalancer-throttle";

/// Labels used to select the AwairPoller pods
pub fn selector_labels() -> BTreeMap<String, String> {
    [("app".to_string(), APP_LABEL.to_string())]
        .into_iter()
        .collect()
}

/// Labels attached to the deployment and its pod template
pub fn workload_labels() -> BTreeMap<String, String> {
    let mut labels = selector_labels();
    labels.insert("version".to_string(), VERSION_LABEL.to_string());
    labels
}

/// Create the AwairPoller Deployment running `image` on `container_port`
pub fn build_deployment(image: &str, container_port: i32) -> Deployment {
    Deployment {
        metadata: ObjectMeta {
            name: Some(DEPLOYMENT_NAME.to_string()),
            namespace: Some(NAMESPACE.to_string()),
            labels: Some(workload_labels()),
            ..Default::default()
        },
        spec: Some(DeploymentSpec {
            replicas: Some(REPLICAS),
            selector: LabelSelector {
                match_labels: Some(selector_labels()),
                ..Default::default()
            },
            template: PodTemplateSpec {
                metadata: Some(ObjectMeta {
                    labels: Some(workload_labels()),
                    ..Default::default()
                }),
                spec: Some(PodSpec {
                    containers: vec![Container {
                        name: CONTAINER_NAME.to_string(),
                        image: Some(image.to_string()),
                        image_pull_policy: Some("Always".to_string()),
                        ports: Some(vec![ContainerPort {
                            name: Some("http".to_string()),
                            protocol: Some("TCP".to_string()),
                            container_port,
                            ..Default::default()
                        }]),
                        resources: Some(build_resource_requirements()),
                        ..Default::default()
                    }],
                    ..Default::default()
                }),
            },
            ..Default::default()
        }),
        ..Default::default()
    }
}

fn build_resource_requirements() -> ResourceRequirements {
    let requests = [
        ("cpu".to_string(), Quantity("25m".to_string())),
        ("memory".to_string(), Quantity("64Mi".to_string())),
    ]
    .into_iter()
    .collect();

    let limits = [
        ("cpu".to_string(), Quantity("50m".to_string())),
        ("memory".to_string(), Quantity("128Mi".to_string())),
    ]
    .into_iter()
    .collect();

    ResourceRequirements {
        requests: Some(requests),
        limits: Some(limits),
        ..Default::default()
    }
}

/// Create the Service routing port 80 to the AwairPoller pods
pub fn build_service(container_port: i32) -> Service {
    Service {
        metadata: ObjectMeta {
            name: Some(SERVICE_NAME.to_string()),
            namespace: Some(NAMESPACE.to_string()),
            labels: Some(selector_labels()),
            annotations: Some(
                [(LB_THROTTLE_ANNOTATION.to_string(), "4".to_string())]
                    .into_iter()
                    .collect(),
            ),
            ..Default::default()
        },
        spec: Some(ServiceSpec {
            selector: Some(selector_labels()),
            ports: Some(vec![ServicePort {
                name: Some("http".to_string()),
                port: SERVICE_PORT,
                target_port: Some(IntOrString::Int(container_port)),
                protocol: Some("TCP".to_string()),
                ..Default::default()
            }]),
            ..Default::default()
        }),
        ..Default::default()
    }
}
