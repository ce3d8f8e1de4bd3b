//! Error types for cluster operations

use kube::config::KubeconfigError;
use thiserror::Error;

use crate::k8s::ResourceKind;

pub type DeployResult<T> = Result<T, DeployError>;

/// Errors returned by the deployment manager and its clients
#[derive(Debug, Error)]
pub enum DeployError {
    #[error("missing kube client: use kubernetes_client()")]
    MissingKubeClient,

    #[error("missing istio client: use istio_client()")]
    MissingIstioClient,

    #[error("unable to read kube config {path}: {source}")]
    Kubeconfig {
        path: String,
        #[source]
        source: KubeconfigError,
    },

    #[error("unable to authenticate with Kubernetes with kube config {path}: {source}")]
    Authentication {
        path: String,
        #[source]
        source: kube::Error,
    },

    #[error("invalid deployment: {0}")]
    Validation(#[source] ValidationError),

    #[error("unable to archive deployment: {0}")]
    Archive(#[source] ValidationError),

    #[error("failed to create {kind} {name}: {source}")]
    Create {
        kind: ResourceKind,
        name: String,
        #[source]
        source: kube::Error,
    },

    #[error("failed to delete {kind} {name}: {source}")]
    Delete {
        kind: ResourceKind,
        name: String,
        #[source]
        source: kube::Error,
    },

    #[error("failed to convert {kind} manifest: {source}")]
    Manifest {
        kind: ResourceKind,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to render manifests: {0}")]
    Render(#[from] serde_yaml::Error),
}

/// Reasons a deployment descriptor is rejected before submission
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("missing deployment")]
    MissingDeployment,

    #[error("less than 1 container")]
    NoContainers,

    #[error("invalid name {0:?}")]
    InvalidName(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_messages_are_wrapped() {
        let err = DeployError::Validation(ValidationError::NoContainers);
        assert_eq!(err.to_string(), "invalid deployment: less than 1 container");

        let err = DeployError::Archive(ValidationError::MissingDeployment);
        assert_eq!(err.to_string(), "unable to archive deployment: missing deployment");
    }

    #[test]
    fn test_invalid_name_quotes_the_name() {
        let err = ValidationError::InvalidName("static-site".to_string());
        assert_eq!(err.to_string(), "invalid name \"static-site\"");
    }
}
