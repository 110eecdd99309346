//! Cluster service for Kubernetes operations
//!
//! Abstracts all Kubernetes API interactions away from the HTTP layer.
//! Every method is a fresh request/response round trip; nothing is cached.

use anyhow::{Context, Result};

use crate::helm::{self, HelmReleaseSnapshot};
use crate::kube::{actions, fetch};
use crate::models::{DeploymentSnapshot, IngressSnapshot, PodSnapshot, ServiceSnapshot};
use crate::topology::{resolve_topology, TopologyView};

/// Service for cluster reads and mutations
pub struct ClusterService {
    client: kube::Client,
}

impl ClusterService {
    pub fn new(client: kube::Client) -> Self {
        Self { client }
    }

    /// List all namespace names
    pub async fn namespaces(&self) -> Result<Vec<String>> {
        fetch::list_namespaces(&self.client).await
    }

    /// List ingresses in a namespace
    pub async fn ingresses(&self, namespace: &str) -> Result<Vec<IngressSnapshot>> {
        fetch::list_ingresses(&self.client, namespace).await
    }

    /// List services in a namespace
    pub async fn services(&self, namespace: &str) -> Result<Vec<ServiceSnapshot>> {
        fetch::list_services(&self.client, namespace).await
    }

    /// List deployments in a namespace
    pub async fn deployments(&self, namespace: &str) -> Result<Vec<DeploymentSnapshot>> {
        fetch::list_deployments(&self.client, namespace).await
    }

    /// List pods in a namespace
    pub async fn pods(&self, namespace: &str) -> Result<Vec<PodSnapshot>> {
        fetch::list_pods(&self.client, namespace).await
    }

    /// Resolve the namespace topology tree.
    ///
    /// The four lists are fetched concurrently and may land at slightly
    /// different wall-clock times; the resulting snapshot is not
    /// transactionally consistent, which is inherent to a polling dashboard
    /// and accepted here.
    pub async fn topology(&self, namespace: &str) -> Result<TopologyView> {
        let (ingresses, services, pods, deployments) = futures::try_join!(
            fetch::list_ingresses(&self.client, namespace),
            fetch::list_services(&self.client, namespace),
            fetch::list_pods(&self.client, namespace),
            fetch::list_deployments(&self.client, namespace),
        )
        .context("Failed to fetch topology inputs")?;

        Ok(resolve_topology(&ingresses, &services, &pods, &deployments))
    }

    /// List Helm releases in a namespace
    pub async fn helm_releases(&self, namespace: &str) -> Result<Vec<HelmReleaseSnapshot>> {
        helm::list_releases(&self.client, namespace).await
    }

    /// Scale a deployment
    pub async fn scale_deployment(&self, namespace: &str, name: &str, replicas: i32) -> Result<()> {
        actions::scale_deployment(&self.client, namespace, name, replicas).await
    }

    /// Delete a pod
    pub async fn delete_pod(&self, namespace: &str, name: &str) -> Result<()> {
        actions::delete_pod(&self.client, namespace, name).await
    }
}
