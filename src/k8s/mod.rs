//! Kubernetes integration module for AwairPoller
//!
//! This module handles the core cluster interactions:
//! - Building an authenticated client from a kubeconfig file
//! - Creating and deleting the AwairPoller Deployment
//! - Creating the Service that fronts it

mod client;
mod resources;

use strum::Display;

pub use client::{connect, K8sClient};
pub use resources::*;

/// Kinds of objects the deployment manager submits
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum ResourceKind {
    Deployment,
    Service,
    Gateway,
    VirtualService,
}
