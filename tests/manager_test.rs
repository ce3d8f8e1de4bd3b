//! Tests for the deployment manager
//!
//! None of these reach a cluster: the fixture kubeconfigs point at local
//! addresses, one of them a closed port.

use std::io::Write;

use awair_deploy::k8s::ResourceKind;
use awair_deploy::{DeployError, DeploymentManager, ValidationError};

const FIXTURE_KUBECONFIG: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/tests/fixtures/kubeconfig.yaml");
const CLOSED_PORT_KUBECONFIG: &str = concat!(
    env!("CARGO_MANIFEST_DIR"),
    "/tests/fixtures/kubeconfig-closed-port.yaml"
);

#[test]
fn test_fresh_manager_holds_nothing() {
    let manager = DeploymentManager::default();

    assert!(!manager.has_kube_client());
    assert!(!manager.has_istio_client());
    assert!(manager.deployment().is_none());
    assert!(manager.service().is_none());
    assert!(manager.virtual_service().is_none());
    assert!(manager.gateway().is_none());
}

#[tokio::test]
async fn test_install_without_client() {
    let mut manager = DeploymentManager::new();

    let result = manager.install().await;
    assert!(matches!(result, Err(DeployError::MissingKubeClient)));
}

#[tokio::test]
async fn test_uninstall_without_client() {
    let manager = DeploymentManager::new();

    let result = manager.uninstall().await;
    assert!(matches!(result, Err(DeployError::MissingKubeClient)));
}

#[tokio::test]
async fn test_missing_kubeconfig() {
    let mut manager = DeploymentManager::new();
    let path = "/nonexistent/.kube/kubeconfig.yaml";

    let err = manager.kubernetes_client(path).await.unwrap_err();
    assert!(matches!(err, DeployError::Kubeconfig { .. }));
    assert!(err.to_string().contains(path));
    assert!(!manager.has_kube_client());
}

#[tokio::test]
async fn test_malformed_kubeconfig() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "clusters: [this is not: a kubeconfig").unwrap();
    let path = file.path().to_str().unwrap().to_string();

    let mut manager = DeploymentManager::new();
    let err = manager.istio_client(&path).await.unwrap_err();
    assert!(err.to_string().contains(&path));
    assert!(!manager.has_istio_client());
}

#[tokio::test]
async fn test_configure_clients_from_kubeconfig() {
    let mut manager = DeploymentManager::new();

    manager.kubernetes_client(FIXTURE_KUBECONFIG).await.unwrap();
    assert!(manager.has_kube_client());
    assert!(!manager.has_istio_client());

    manager.istio_client(FIXTURE_KUBECONFIG).await.unwrap();
    assert!(manager.has_istio_client());
}

#[tokio::test]
async fn test_install_rejects_placeholder_name_before_submitting() {
    let mut manager = DeploymentManager::new();
    manager.kubernetes_client(FIXTURE_KUBECONFIG).await.unwrap();

    let err = manager.install().await.unwrap_err();
    assert!(matches!(
        err,
        DeployError::Validation(ValidationError::InvalidName(ref name)) if name == "awair-poller"
    ));

    // The built deployment is kept for inspection; nothing was submitted.
    let deployment = manager.deployment().unwrap();
    assert_eq!(deployment.metadata.name.as_deref(), Some("awair-poller"));
    assert!(deployment.metadata.uid.is_none());
    assert!(manager.service().is_none());
    assert!(manager.gateway().is_none());
}

#[tokio::test]
async fn test_unreachable_cluster() {
    let mut manager = DeploymentManager::new();
    manager.kubernetes_client(CLOSED_PORT_KUBECONFIG).await.unwrap();
    manager.istio_client(CLOSED_PORT_KUBECONFIG).await.unwrap();

    let err = manager.uninstall().await.unwrap_err();
    assert!(matches!(
        err,
        DeployError::Delete {
            kind: ResourceKind::Deployment,
            ..
        }
    ));
    assert!(err
        .to_string()
        .starts_with("failed to delete Deployment awair-poller"));

    // Validation rejects the deployment before the cluster is contacted.
    let err = manager.install().await.unwrap_err();
    assert!(matches!(err, DeployError::Validation(_)));
    assert!(manager.deployment().unwrap().metadata.uid.is_none());
    assert!(manager.service().is_none());
    assert!(manager.virtual_service().is_none());
}

#[tokio::test]
async fn test_istio_client_alone_is_not_enough() {
    let mut manager = DeploymentManager::new();
    manager.istio_client(FIXTURE_KUBECONFIG).await.unwrap();

    let result = manager.install().await;
    assert!(matches!(result, Err(DeployError::MissingKubeClient)));
    assert!(manager.deployment().is_none());
}
