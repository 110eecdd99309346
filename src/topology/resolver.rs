//! Core topology resolution
//!
//! Joins the four per-namespace object lists by label-selector matching and
//! ingress backend references, then flattens the result into ordered tree
//! entries. Output is deterministic for a fixed input ordering: ingresses in
//! input order, each ingress's backend services in first-seen rule order,
//! ingress-less services appended in input order.

use std::collections::{BTreeMap, HashMap, HashSet};

use crate::models::{DeploymentSnapshot, IngressSnapshot, PodSnapshot, ServiceSnapshot};

use super::models::{TopologyEntry, TopologyView};

/// Subset match shared by every label join: true iff every key in the
/// selector exists in `labels` with an equal value. An empty or absent
/// selector matches nothing, never everything.
pub fn selector_matches(
    selector: &BTreeMap<String, String>,
    labels: &BTreeMap<String, String>,
) -> bool {
    if selector.is_empty() {
        return false;
    }
    selector.iter().all(|(k, v)| labels.get(k) == Some(v))
}

/// Resolve the Ingress → Service → Deployment → Pod tree for one namespace.
///
/// The caller scopes all four lists to the same namespace; the resolver does
/// no filtering of its own. Pure and total: missing data produces fewer
/// entries, not an error.
pub fn resolve_topology(
    ingresses: &[IngressSnapshot],
    services: &[ServiceSnapshot],
    pods: &[PodSnapshot],
    deployments: &[DeploymentSnapshot],
) -> TopologyView {
    // Name lookup for ingress backend references; first occurrence wins.
    let mut service_index: HashMap<&str, usize> = HashMap::new();
    for (i, svc) in services.iter().enumerate() {
        service_index.entry(svc.name.as_str()).or_insert(i);
    }

    // Service -> Deployments whose pod-template labels cover the selector.
    let service_deployments: Vec<Vec<usize>> = services
        .iter()
        .map(|svc| {
            deployments
                .iter()
                .enumerate()
                .filter(|(_, dep)| selector_matches(&svc.selector, &dep.pod_template_labels))
                .map(|(i, _)| i)
                .collect()
        })
        .collect();

    // Deployment -> Pods whose labels cover the pod-template labels.
    let deployment_pods: Vec<Vec<usize>> = deployments
        .iter()
        .map(|dep| {
            pods.iter()
                .enumerate()
                .filter(|(_, pod)| selector_matches(&dep.pod_template_labels, &pod.labels))
                .map(|(i, _)| i)
                .collect()
        })
        .collect();

    // Direct Service -> Pod attribution, suppressed entirely for services
    // that matched a Deployment: such pods are assumed reachable via the
    // Deployment path (a label-match approximation, not an ownership check).
    let service_pods: Vec<Vec<usize>> = services
        .iter()
        .enumerate()
        .map(|(s, svc)| {
            if !service_deployments[s].is_empty() {
                return Vec::new();
            }
            pods.iter()
                .enumerate()
                .filter(|(_, pod)| selector_matches(&svc.selector, &pod.labels))
                .map(|(i, _)| i)
                .collect()
        })
        .collect();

    let mut entries = Vec::new();
    let mut emitted_services: HashSet<usize> = HashSet::new();

    for ing in ingresses {
        entries.push(TopologyEntry::new("Ingress", &ing.namespace, &ing.name, 0));

        // Distinct backend names in first-seen order across this ingress's
        // rules; duplicate (service, ingress) pairs are discarded here.
        let mut seen_backends: HashSet<&str> = HashSet::new();
        for rule in &ing.rules {
            for path in &rule.paths {
                let backend = path.backend_service_name.as_str();
                if !seen_backends.insert(backend) {
                    continue;
                }
                // Orphaned references (no such Service) leave the ingress
                // header standing with no children for that name.
                if let Some(&s) = service_index.get(backend) {
                    if emitted_services.insert(s) {
                        emit_service(
                            &mut entries,
                            s,
                            services,
                            deployments,
                            pods,
                            &service_deployments,
                            &deployment_pods,
                            &service_pods,
                        );
                    }
                }
            }
        }
    }

    // Services unreachable from any ingress, appended in input order.
    for s in 0..services.len() {
        if emitted_services.insert(s) {
            emit_service(
                &mut entries,
                s,
                services,
                deployments,
                pods,
                &service_deployments,
                &deployment_pods,
                &service_pods,
            );
        }
    }

    TopologyView { entries }
}

/// Emit one Service line with its Deployment/Pod substructure.
#[allow(clippy::too_many_arguments)]
fn emit_service(
    entries: &mut Vec<TopologyEntry>,
    s: usize,
    services: &[ServiceSnapshot],
    deployments: &[DeploymentSnapshot],
    pods: &[PodSnapshot],
    service_deployments: &[Vec<usize>],
    deployment_pods: &[Vec<usize>],
    service_pods: &[Vec<usize>],
) {
    let svc = &services[s];
    entries.push(TopologyEntry::new("Service", &svc.namespace, &svc.name, 1));

    for &d in &service_deployments[s] {
        let dep = &deployments[d];
        entries.push(TopologyEntry::new(
            "Deployment",
            &dep.namespace,
            &dep.name,
            2,
        ));
        for &p in &deployment_pods[d] {
            entries.push(TopologyEntry::new("Pod", &pods[p].namespace, &pods[p].name, 3));
        }
    }

    for &p in &service_pods[s] {
        entries.push(TopologyEntry::new("Pod", &pods[p].namespace, &pods[p].name, 2));
    }
}
