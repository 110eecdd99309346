//! Kubernetes client module
//!
//! Handles connection to the Kubernetes API server and provides a
//! configured client for use throughout the application.

pub mod actions;
pub mod fetch;

use anyhow::Result;
use kube::{Client, Config};

/// Initialize and return a Kubernetes client
///
/// Uses the default kubeconfig loading strategy:
/// 1. In-cluster config (if running in a pod)
/// 2. KUBECONFIG environment variable
/// 3. ~/.kube/config
pub async fn create_client() -> Result<Client> {
    let config = Config::infer().await?;
    let client = Client::try_from(config)?;
    Ok(client)
}

/// Get the current Kubernetes context name
pub async fn get_context() -> Result<String> {
    // Try to get context from KUBECONFIG or default location
    let kubeconfig_path = std::env::var("KUBECONFIG").ok().or_else(|| {
        let home = std::env::var("HOME").ok()?;
        Some(format!("{}/.kube/config", home))
    });

    if let Some(path) = kubeconfig_path {
        if let Ok(contents) = std::fs::read_to_string(&path) {
            // Parse current-context from kubeconfig
            for line in contents.lines() {
                if line.trim().starts_with("current-context:") {
                    if let Some(context) = line.split(':').nth(1) {
                        return Ok(context.trim().to_string());
                    }
                }
            }
        }
    }

    // Fallback: the config loaded, but the context name is unknown
    let _config = Config::infer().await?;
    Ok("default".to_string())
}

/// Get the namespace the dashboard opens on
///
/// The NAMESPACE environment variable overrides the config-file default.
pub fn get_default_namespace(config_default: &str) -> String {
    match std::env::var("NAMESPACE") {
        Ok(ns) if !ns.is_empty() => ns,
        _ => config_default.to_string(),
    }
}
