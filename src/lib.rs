//! AwairPoller deployment library
//!
//! Authenticates against a Kubernetes cluster and (re)installs the AwairPoller
//! workload together with its Istio routing.

pub mod config;
pub mod error;
pub mod istio;
pub mod k8s;
pub mod manager;

pub use error::{DeployError, DeployResult, ValidationError};
pub use manager::DeploymentManager;
