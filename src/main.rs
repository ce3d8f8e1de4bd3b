use anyhow::{Context, Result};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use awair_deploy::{config::Config, DeploymentManager};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("AwairPoller");
    tracing::info!("Precheck: Uninstalling previous AwairPoller if it exists.");

    let config = Config::load()?;
    tracing::info!(kubeconfig = %config.kubeconfig, "Configuration loaded");

    let mut manager = DeploymentManager::from_config(&config);

    manager
        .kubernetes_client(&config.kubeconfig)
        .await
        .context("Unable to load the Kubernetes client")?;
    tracing::info!("Created Kubernetes client");

    manager
        .istio_client(&config.kubeconfig)
        .await
        .context("Unable to load the Istio client")?;
    tracing::info!("Created Istio client");

    match manager.uninstall().await {
        Ok(()) => tracing::info!("Cleaned up existing deployment"),
        Err(e) => tracing::warn!("Uninstall failed, continuing: {}", e),
    }

    manager
        .install()
        .await
        .context("Unable to install in Kubernetes")?;
    tracing::info!("Installed AwairPoller");

    Ok(())
}
