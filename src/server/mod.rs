//! HTTP API server
//!
//! Serves the JSON API the dashboard frontend polls. Handlers are thin:
//! each one is a single service call or a gatekeeper-then-exec round trip,
//! with failures mapped onto the API error taxonomy.

mod error;
mod handlers;

pub use error::ApiError;

use std::sync::Arc;

use anyhow::{Context, Result};
use axum::routing::{delete, get, post};
use axum::Router;

use crate::config::Config;
use crate::exec::{CommandRunner, Gatekeeper};
use crate::services::ClusterService;

/// Shared state for API handlers
#[derive(Clone)]
pub struct AppState {
    pub cluster: Arc<ClusterService>,
    pub gatekeeper: Arc<Gatekeeper>,
    pub runner: Arc<dyn CommandRunner>,
    /// Binary the validated commands are spawned as
    pub kubectl_binary: String,
    /// Per-command execution timeout in seconds
    pub kubectl_timeout_secs: u64,
    /// Namespace used when a request omits ?namespace=
    pub default_namespace: String,
    /// Kubeconfig context name, reported by /api/health
    pub context: String,
}

/// Create the API router with all endpoints
pub fn api_router(state: AppState) -> Router {
    Router::new()
        .route("/api/health", get(handlers::health))
        .route("/api/namespaces", get(handlers::namespaces))
        .route("/api/ingresses", get(handlers::ingresses))
        .route("/api/services", get(handlers::services))
        .route("/api/deployments", get(handlers::deployments))
        .route("/api/pods", get(handlers::pods))
        .route("/api/pods/:namespace/:name", delete(handlers::delete_pod))
        .route("/api/deployments/scale", post(handlers::scale_deployment))
        .route("/api/topology", get(handlers::topology))
        .route("/api/helm/releases", get(handlers::helm_releases))
        .route("/api/kubectl", post(handlers::kubectl))
        .with_state(state)
}

/// Bind the configured address and serve the API until the process exits
pub async fn run(config: &Config, state: AppState) -> Result<()> {
    let app = api_router(state);

    let listener = tokio::net::TcpListener::bind(&config.server.bind)
        .await
        .with_context(|| format!("Failed to bind {}", config.server.bind))?;

    tracing::info!(addr = %config.server.bind, "kubedeck API listening");

    axum::serve(listener, app)
        .await
        .context("HTTP server exited with error")?;

    Ok(())
}

impl AppState {
    /// Build the state from loaded configuration and a connected client
    pub fn new(config: &Config, client: kube::Client, context: String) -> Self {
        use crate::exec::{GatekeeperConfig, ProcessRunner};

        let mut gate_config = GatekeeperConfig::kubectl();
        gate_config.program = config.kubectl.binary.clone();

        Self {
            cluster: Arc::new(ClusterService::new(client)),
            gatekeeper: Arc::new(Gatekeeper::new(gate_config)),
            runner: Arc::new(ProcessRunner),
            kubectl_binary: config.kubectl.binary.clone(),
            kubectl_timeout_secs: config.kubectl.timeout_secs,
            default_namespace: config.default_namespace.clone(),
            context,
        }
    }
}
