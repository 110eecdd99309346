//! API request handlers

use std::time::Duration;

use axum::extract::{Path, Query, State};
use axum::Json;
use serde::Deserialize;
use serde_json::{json, Value};

use crate::exec::{CommandRunner, Gatekeeper};
use crate::helm::HelmReleaseSnapshot;
use crate::models::{DeploymentSnapshot, IngressSnapshot, PodSnapshot, ServiceSnapshot};

use super::{ApiError, AppState};

/// Query string shared by the namespaced list endpoints
#[derive(Debug, Deserialize)]
pub struct NamespaceQuery {
    pub namespace: Option<String>,
}

impl NamespaceQuery {
    fn resolve(&self, state: &AppState) -> String {
        self.namespace
            .clone()
            .filter(|ns| !ns.is_empty())
            .unwrap_or_else(|| state.default_namespace.clone())
    }
}

/// Body of POST /api/kubectl
#[derive(Debug, Deserialize)]
pub struct KubectlRequest {
    pub command: String,
}

/// Body of POST /api/deployments/scale
#[derive(Debug, Deserialize)]
pub struct ScaleRequest {
    pub namespace: Option<String>,
    pub name: String,
    pub replicas: i32,
}

pub async fn health(State(state): State<AppState>) -> Json<Value> {
    Json(json!({
        "status": "ok",
        "context": state.context,
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

pub async fn namespaces(State(state): State<AppState>) -> Result<Json<Vec<String>>, ApiError> {
    Ok(Json(state.cluster.namespaces().await?))
}

pub async fn ingresses(
    State(state): State<AppState>,
    Query(query): Query<NamespaceQuery>,
) -> Result<Json<Vec<IngressSnapshot>>, ApiError> {
    let namespace = query.resolve(&state);
    Ok(Json(state.cluster.ingresses(&namespace).await?))
}

pub async fn services(
    State(state): State<AppState>,
    Query(query): Query<NamespaceQuery>,
) -> Result<Json<Vec<ServiceSnapshot>>, ApiError> {
    let namespace = query.resolve(&state);
    Ok(Json(state.cluster.services(&namespace).await?))
}

pub async fn deployments(
    State(state): State<AppState>,
    Query(query): Query<NamespaceQuery>,
) -> Result<Json<Vec<DeploymentSnapshot>>, ApiError> {
    let namespace = query.resolve(&state);
    Ok(Json(state.cluster.deployments(&namespace).await?))
}

pub async fn pods(
    State(state): State<AppState>,
    Query(query): Query<NamespaceQuery>,
) -> Result<Json<Vec<PodSnapshot>>, ApiError> {
    let namespace = query.resolve(&state);
    Ok(Json(state.cluster.pods(&namespace).await?))
}

pub async fn topology(
    State(state): State<AppState>,
    Query(query): Query<NamespaceQuery>,
) -> Result<Json<Value>, ApiError> {
    let namespace = query.resolve(&state);
    let view = state.cluster.topology(&namespace).await?;
    Ok(Json(json!({
        "namespace": namespace,
        "lines": view.lines(),
    })))
}

pub async fn helm_releases(
    State(state): State<AppState>,
    Query(query): Query<NamespaceQuery>,
) -> Result<Json<Vec<HelmReleaseSnapshot>>, ApiError> {
    let namespace = query.resolve(&state);
    Ok(Json(state.cluster.helm_releases(&namespace).await?))
}

pub async fn scale_deployment(
    State(state): State<AppState>,
    Json(req): Json<ScaleRequest>,
) -> Result<Json<Value>, ApiError> {
    let namespace = req
        .namespace
        .clone()
        .unwrap_or_else(|| state.default_namespace.clone());
    state
        .cluster
        .scale_deployment(&namespace, &req.name, req.replicas)
        .await?;
    Ok(Json(json!({
        "output": format!("deployment {}/{} scaled to {}", namespace, req.name, req.replicas),
    })))
}

pub async fn delete_pod(
    State(state): State<AppState>,
    Path((namespace, name)): Path<(String, String)>,
) -> Result<Json<Value>, ApiError> {
    state.cluster.delete_pod(&namespace, &name).await?;
    Ok(Json(json!({
        "output": format!("pod {}/{} deleted", namespace, name),
    })))
}

pub async fn kubectl(
    State(state): State<AppState>,
    Json(req): Json<KubectlRequest>,
) -> Result<Json<Value>, ApiError> {
    let output = execute_command(
        &state.gatekeeper,
        state.runner.as_ref(),
        &state.kubectl_binary,
        state.kubectl_timeout_secs,
        &req.command,
    )
    .await?;
    Ok(Json(json!({ "output": output })))
}

/// Gatekeeper-then-exec round trip shared by the kubectl endpoint.
///
/// The gatekeeper runs before any process exists; the runner receives the
/// argument vector of the validated command, never a joined shell string.
pub(crate) async fn execute_command(
    gatekeeper: &Gatekeeper,
    runner: &dyn CommandRunner,
    binary: &str,
    timeout_secs: u64,
    raw: &str,
) -> Result<String, ApiError> {
    let validated = gatekeeper.validate(raw)?;
    let args = validated.argv();

    match tokio::time::timeout(Duration::from_secs(timeout_secs), runner.run(binary, &args)).await
    {
        Ok(result) => Ok(result?),
        Err(_) => Err(ApiError::ExecutionFailure(format!(
            "command timed out after {}s",
            timeout_secs
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::exec::{GatekeeperConfig, MockCommandRunner, ProcessRunner};

    fn gate() -> Gatekeeper {
        Gatekeeper::new(GatekeeperConfig::kubectl())
    }

    #[tokio::test]
    async fn test_runner_receives_argument_vector() {
        let mut runner = MockCommandRunner::new();
        runner
            .expect_run()
            .withf(|program, args| {
                program == "kubectl"
                    && args
                        .iter()
                        .map(String::as_str)
                        .eq(["get", "pods", "-n", "default"])
            })
            .times(1)
            .returning(|_, _| Ok("NAME  READY\n".to_string()));

        let output = execute_command(&gate(), &runner, "kubectl", 30, "kubectl get pods -n default")
            .await
            .unwrap();
        assert_eq!(output, "NAME  READY\n");
    }

    #[tokio::test]
    async fn test_forbidden_subcommand_never_reaches_runner() {
        let mut runner = MockCommandRunner::new();
        runner.expect_run().times(0);

        let err = execute_command(&gate(), &runner, "kubectl", 30, "kubectl drain node1")
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::Forbidden(_)));
    }

    #[tokio::test]
    async fn test_missing_prefix_never_reaches_runner() {
        let mut runner = MockCommandRunner::new();
        runner.expect_run().times(0);

        let err = execute_command(&gate(), &runner, "kubectl", 30, "get pods")
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::InvalidCommand(_)));
    }

    #[tokio::test]
    async fn test_execution_timeout_is_classified() {
        // A gate for the test binary: "sleep 5" parses as subcommand "5"
        let config = GatekeeperConfig {
            program: "sleep".to_string(),
            allowed_subcommands: ["5"].iter().map(|s| s.to_string()).collect(),
        };
        let gatekeeper = Gatekeeper::new(config);
        let runner = ProcessRunner;

        let err = execute_command(&gatekeeper, &runner, "sleep", 0, "sleep 5")
            .await
            .unwrap_err();
        match err {
            ApiError::ExecutionFailure(details) => assert!(details.contains("timed out")),
            other => panic!("expected ExecutionFailure, got {:?}", other),
        }
    }
}
