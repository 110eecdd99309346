//! Snapshot structs built from listed Kubernetes objects
//!
//! Every snapshot treats absent optional wire fields (missing selector,
//! missing labels, missing rules) as empty collections rather than errors,
//! so a half-populated object still renders as a row.

use std::collections::BTreeMap;

use k8s_openapi::api::apps::v1::Deployment;
use k8s_openapi::api::core::v1::{Pod, Service};
use k8s_openapi::api::networking::v1::Ingress;
use k8s_openapi::apimachinery::pkg::apis::meta::v1::Time;
use serde::{Deserialize, Serialize};

/// Identity triple used for graph edges and display labels
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ObjectRef {
    pub kind: String,
    pub namespace: String,
    pub name: String,
}

/// One routing rule of an Ingress
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IngressRule {
    pub host: Option<String>,
    pub paths: Vec<IngressPath>,
}

/// One path entry of an Ingress rule, pointing at a backend Service
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IngressPath {
    pub path: Option<String>,
    pub backend_service_name: String,
    pub backend_service_port: Option<i32>,
}

/// Ingress snapshot for the list view and the topology resolver
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IngressSnapshot {
    pub name: String,
    pub namespace: String,
    pub rules: Vec<IngressRule>,
    pub age: Option<String>,
}

/// Service snapshot; the selector is the resolver's join key
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceSnapshot {
    pub name: String,
    pub namespace: String,
    /// Empty for headless or externally-managed services; matches nothing
    #[serde(default)]
    pub selector: BTreeMap<String, String>,
    pub service_type: Option<String>,
    pub cluster_ip: Option<String>,
    pub age: Option<String>,
}

/// Deployment snapshot; pod-template labels are the join key towards Pods
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeploymentSnapshot {
    pub name: String,
    pub namespace: String,
    #[serde(default)]
    pub pod_template_labels: BTreeMap<String, String>,
    pub replicas: i32,
    pub ready_replicas: i32,
    pub age: Option<String>,
}

/// Pod snapshot for the list view and the topology resolver
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PodSnapshot {
    pub name: String,
    pub namespace: String,
    #[serde(default)]
    pub labels: BTreeMap<String, String>,
    pub phase: Option<String>,
    /// "ready/total" container readiness, e.g. "2/2"
    pub ready: String,
    pub restarts: i32,
    pub age: Option<String>,
}

impl From<&Ingress> for IngressSnapshot {
    fn from(ing: &Ingress) -> Self {
        let rules = ing
            .spec
            .as_ref()
            .and_then(|spec| spec.rules.as_ref())
            .map(|rules| {
                rules
                    .iter()
                    .map(|rule| IngressRule {
                        host: rule.host.clone(),
                        paths: rule
                            .http
                            .as_ref()
                            .map(|http| {
                                http.paths
                                    .iter()
                                    .filter_map(|p| {
                                        let svc = p.backend.service.as_ref()?;
                                        Some(IngressPath {
                                            path: p.path.clone(),
                                            backend_service_name: svc.name.clone(),
                                            backend_service_port: svc
                                                .port
                                                .as_ref()
                                                .and_then(|port| port.number),
                                        })
                                    })
                                    .collect()
                            })
                            .unwrap_or_default(),
                    })
                    .collect()
            })
            .unwrap_or_default();

        Self {
            name: ing.metadata.name.clone().unwrap_or_default(),
            namespace: ing.metadata.namespace.clone().unwrap_or_default(),
            rules,
            age: ing.metadata.creation_timestamp.as_ref().map(format_age),
        }
    }
}

impl From<&Service> for ServiceSnapshot {
    fn from(svc: &Service) -> Self {
        let spec = svc.spec.as_ref();
        Self {
            name: svc.metadata.name.clone().unwrap_or_default(),
            namespace: svc.metadata.namespace.clone().unwrap_or_default(),
            selector: spec
                .and_then(|s| s.selector.clone())
                .unwrap_or_default(),
            service_type: spec.and_then(|s| s.type_.clone()),
            cluster_ip: spec.and_then(|s| s.cluster_ip.clone()),
            age: svc.metadata.creation_timestamp.as_ref().map(format_age),
        }
    }
}

impl From<&Deployment> for DeploymentSnapshot {
    fn from(dep: &Deployment) -> Self {
        let spec = dep.spec.as_ref();
        Self {
            name: dep.metadata.name.clone().unwrap_or_default(),
            namespace: dep.metadata.namespace.clone().unwrap_or_default(),
            pod_template_labels: spec
                .and_then(|s| s.template.metadata.as_ref())
                .and_then(|m| m.labels.clone())
                .unwrap_or_default(),
            replicas: spec.and_then(|s| s.replicas).unwrap_or(0),
            ready_replicas: dep
                .status
                .as_ref()
                .and_then(|s| s.ready_replicas)
                .unwrap_or(0),
            age: dep.metadata.creation_timestamp.as_ref().map(format_age),
        }
    }
}

impl From<&Pod> for PodSnapshot {
    fn from(pod: &Pod) -> Self {
        let statuses = pod
            .status
            .as_ref()
            .and_then(|s| s.container_statuses.as_ref());
        let total = statuses.map(|cs| cs.len()).unwrap_or(0);
        let ready = statuses
            .map(|cs| cs.iter().filter(|c| c.ready).count())
            .unwrap_or(0);
        let restarts = statuses
            .map(|cs| cs.iter().map(|c| c.restart_count).sum())
            .unwrap_or(0);

        Self {
            name: pod.metadata.name.clone().unwrap_or_default(),
            namespace: pod.metadata.namespace.clone().unwrap_or_default(),
            labels: pod.metadata.labels.clone().unwrap_or_default(),
            phase: pod.status.as_ref().and_then(|s| s.phase.clone()),
            ready: format!("{}/{}", ready, total),
            restarts,
            age: pod.metadata.creation_timestamp.as_ref().map(format_age),
        }
    }
}

/// Render a creation timestamp as a compact age column ("45s", "12m", "3h", "5d")
pub fn format_age(created: &Time) -> String {
    let elapsed = chrono::Utc::now().signed_duration_since(created.0);
    let secs = elapsed.num_seconds().max(0);
    if secs < 60 {
        format!("{}s", secs)
    } else if secs < 3600 {
        format!("{}m", secs / 60)
    } else if secs < 86_400 {
        format!("{}h", secs / 3600)
    } else {
        format!("{}d", secs / 86_400)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};

    #[test]
    fn test_format_age_units() {
        let t = Time(Utc::now() - Duration::seconds(30));
        assert!(format_age(&t).ends_with('s'));

        let t = Time(Utc::now() - Duration::minutes(5));
        assert_eq!(format_age(&t), "5m");

        let t = Time(Utc::now() - Duration::hours(7));
        assert_eq!(format_age(&t), "7h");

        let t = Time(Utc::now() - Duration::days(2));
        assert_eq!(format_age(&t), "2d");
    }

    #[test]
    fn test_format_age_future_timestamp_clamps_to_zero() {
        let t = Time(Utc::now() + Duration::minutes(5));
        assert_eq!(format_age(&t), "0s");
    }

    #[test]
    fn test_pod_snapshot_from_empty_pod() {
        let pod = Pod::default();
        let snap = PodSnapshot::from(&pod);
        assert_eq!(snap.name, "");
        assert!(snap.labels.is_empty());
        assert_eq!(snap.ready, "0/0");
        assert_eq!(snap.restarts, 0);
    }
}
