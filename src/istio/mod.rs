//! Istio integration module for AwairPoller
//!
//! Creates the mesh routing in front of the AwairPoller service:
//! - Gateway on the default ingress gateway
//! - VirtualService sending all HTTP traffic to the service

mod client;
mod resources;
pub mod types;

pub use client::IstioClient;
pub use resources::{build_gateway, build_virtual_service};
pub use types::{Gateway, VirtualService};
