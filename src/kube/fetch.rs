//! Resource fetching utilities
//!
//! Typed list calls against the Kubernetes API, mapped into the snapshot
//! models. Every fetch is a fresh point-in-time read; nothing is cached or
//! watched (the UI polls).

use anyhow::{Context, Result};
use k8s_openapi::api::apps::v1::Deployment;
use k8s_openapi::api::core::v1::{Namespace, Pod, Service};
use k8s_openapi::api::networking::v1::Ingress;
use kube::api::{Api, ListParams};

use crate::models::{DeploymentSnapshot, IngressSnapshot, PodSnapshot, ServiceSnapshot};

/// List all namespace names in the cluster
pub async fn list_namespaces(client: &kube::Client) -> Result<Vec<String>> {
    let api: Api<Namespace> = Api::all(client.clone());
    let list = api
        .list(&ListParams::default())
        .await
        .context("Failed to list namespaces")?;
    Ok(list
        .items
        .iter()
        .filter_map(|ns| ns.metadata.name.clone())
        .collect())
}

/// List the ingresses in a namespace
pub async fn list_ingresses(client: &kube::Client, namespace: &str) -> Result<Vec<IngressSnapshot>> {
    let api: Api<Ingress> = Api::namespaced(client.clone(), namespace);
    let list = api
        .list(&ListParams::default())
        .await
        .with_context(|| format!("Failed to list ingresses in namespace {}", namespace))?;
    Ok(list.items.iter().map(IngressSnapshot::from).collect())
}

/// List the services in a namespace
pub async fn list_services(client: &kube::Client, namespace: &str) -> Result<Vec<ServiceSnapshot>> {
    let api: Api<Service> = Api::namespaced(client.clone(), namespace);
    let list = api
        .list(&ListParams::default())
        .await
        .with_context(|| format!("Failed to list services in namespace {}", namespace))?;
    Ok(list.items.iter().map(ServiceSnapshot::from).collect())
}

/// List the deployments in a namespace
pub async fn list_deployments(
    client: &kube::Client,
    namespace: &str,
) -> Result<Vec<DeploymentSnapshot>> {
    let api: Api<Deployment> = Api::namespaced(client.clone(), namespace);
    let list = api
        .list(&ListParams::default())
        .await
        .with_context(|| format!("Failed to list deployments in namespace {}", namespace))?;
    Ok(list.items.iter().map(DeploymentSnapshot::from).collect())
}

/// List the pods in a namespace
pub async fn list_pods(client: &kube::Client, namespace: &str) -> Result<Vec<PodSnapshot>> {
    let api: Api<Pod> = Api::namespaced(client.clone(), namespace);
    let list = api
        .list(&ListParams::default())
        .await
        .with_context(|| format!("Failed to list pods in namespace {}", namespace))?;
    Ok(list.items.iter().map(PodSnapshot::from).collect())
}
