use anyhow::Result;
use serde::Deserialize;

use crate::k8s::{DEFAULT_CONTAINER_IMAGE, DEFAULT_CONTAINER_PORT};

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    #[serde(default = "default_kubeconfig")]
    pub kubeconfig: String,

    #[serde(default = "default_container_image")]
    pub container_image: String,

    #[serde(default = "default_container_port")]
    pub container_port: i32,
}

/// `$HOME/.kube/kubeconfig.yaml`, or a relative `.kube/kubeconfig.yaml` when no
/// home directory can be resolved
fn default_kubeconfig() -> String {
    dirs::home_dir()
        .unwrap_or_default()
        .join(".kube")
        .join("kubeconfig.yaml")
        .to_string_lossy()
        .into_owned()
}

fn default_container_image() -> String {
    DEFAULT_CONTAINER_IMAGE.to_string()
}

fn default_container_port() -> i32 {
    DEFAULT_CONTAINER_PORT
}

impl Config {
    /// Load settings from `AWAIR_*` environment variables, reading `.env` first
    pub fn load() -> Result<Self> {
        dotenvy::dotenv().ok();

        let config = config::Config::builder()
            .add_source(config::Environment::with_prefix("AWAIR").try_parsing(true))
            .build()?;

        let settings: Config = config.try_deserialize()?;

        Ok(settings)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            kubeconfig: default_kubeconfig(),
            container_image: default_container_image(),
            container_port: default_container_port(),
        }
    }
}
