//! Mutating resource operations
//!
//! One API call per action, no retries; failures carry the cluster's answer
//! back to the caller.

use anyhow::{Context, Result};
use k8s_openapi::api::apps::v1::Deployment;
use k8s_openapi::api::core::v1::Pod;
use kube::api::{Api, DeleteParams, Patch, PatchParams};
use serde_json::json;

/// Scale a deployment to the requested replica count
pub async fn scale_deployment(
    client: &kube::Client,
    namespace: &str,
    name: &str,
    replicas: i32,
) -> Result<()> {
    tracing::debug!(
        "Scaling deployment {}/{} to {} replicas",
        namespace,
        name,
        replicas
    );

    let api: Api<Deployment> = Api::namespaced(client.clone(), namespace);
    let patch = json!({
        "spec": {
            "replicas": replicas
        }
    });

    api.patch(name, &PatchParams::default(), &Patch::Merge(patch))
        .await
        .with_context(|| {
            format!(
                "Failed to scale deployment {}/{} to {}",
                namespace, name, replicas
            )
        })?;

    tracing::info!(
        "Scaled deployment {}/{} to {} replicas",
        namespace,
        name,
        replicas
    );
    Ok(())
}

/// Delete a pod
pub async fn delete_pod(client: &kube::Client, namespace: &str, name: &str) -> Result<()> {
    tracing::debug!("Deleting pod {}/{}", namespace, name);

    let api: Api<Pod> = Api::namespaced(client.clone(), namespace);
    api.delete(name, &DeleteParams::default())
        .await
        .with_context(|| format!("Failed to delete pod {}/{}", namespace, name))?;

    tracing::info!("Deleted pod {}/{}", namespace, name);
    Ok(())
}
