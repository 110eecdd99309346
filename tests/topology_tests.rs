//! Topology resolver tests
//!
//! These tests pin the tree semantics: selector subset matching, the
//! deployment-versus-direct-pod attribution rule, emission ordering, and
//! the no-connections sentinel. All inputs are hand-built snapshots; the
//! resolver never touches a cluster.

use std::collections::BTreeMap;

use kubedeck::models::{
    DeploymentSnapshot, IngressPath, IngressRule, IngressSnapshot, PodSnapshot, ServiceSnapshot,
};
use kubedeck::{resolve_topology, NO_CONNECTIONS};

fn labels(pairs: &[(&str, &str)]) -> BTreeMap<String, String> {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

fn ingress(name: &str, backends: &[&str]) -> IngressSnapshot {
    IngressSnapshot {
        name: name.to_string(),
        namespace: "default".to_string(),
        rules: vec![IngressRule {
            host: Some(format!("{}.local", name)),
            paths: backends
                .iter()
                .map(|backend| IngressPath {
                    path: Some("/".to_string()),
                    backend_service_name: backend.to_string(),
                    backend_service_port: Some(80),
                })
                .collect(),
        }],
        age: None,
    }
}

fn service(name: &str, selector: &[(&str, &str)]) -> ServiceSnapshot {
    ServiceSnapshot {
        name: name.to_string(),
        namespace: "default".to_string(),
        selector: labels(selector),
        service_type: Some("ClusterIP".to_string()),
        cluster_ip: None,
        age: None,
    }
}

fn deployment(name: &str, template_labels: &[(&str, &str)]) -> DeploymentSnapshot {
    DeploymentSnapshot {
        name: name.to_string(),
        namespace: "default".to_string(),
        pod_template_labels: labels(template_labels),
        replicas: 1,
        ready_replicas: 1,
        age: None,
    }
}

fn pod(name: &str, pod_labels: &[(&str, &str)]) -> PodSnapshot {
    PodSnapshot {
        name: name.to_string(),
        namespace: "default".to_string(),
        labels: labels(pod_labels),
        phase: Some("Running".to_string()),
        ready: "1/1".to_string(),
        restarts: 0,
        age: None,
    }
}

#[test]
fn test_empty_input_yields_sentinel_line() {
    let view = resolve_topology(&[], &[], &[], &[]);
    assert_eq!(view.lines(), vec![NO_CONNECTIONS.to_string()]);
}

#[test]
fn test_simple_chain_renders_four_lines() {
    let ingresses = vec![ingress("web", &["svc-a"])];
    let services = vec![service("svc-a", &[("app", "a")])];
    let deployments = vec![deployment("dep-a", &[("app", "a")])];
    let pods = vec![pod("pod-a", &[("app", "a")])];

    let view = resolve_topology(&ingresses, &services, &pods, &deployments);
    assert_eq!(
        view.lines(),
        vec![
            "Ingress: web".to_string(),
            "  Service: svc-a".to_string(),
            "    Deployment: dep-a".to_string(),
            "      Pod: pod-a".to_string(),
        ]
    );
}

#[test]
fn test_orphan_backend_reference_keeps_ingress_header() {
    // The ingress routes to a service that does not exist; the header is
    // still emitted, with no children and no error.
    let ingresses = vec![ingress("web", &["ghost"])];
    let view = resolve_topology(&ingresses, &[], &[], &[]);
    assert_eq!(view.lines(), vec!["Ingress: web".to_string()]);
}

#[test]
fn test_direct_pod_fallback_sits_under_service() {
    // No deployment matches, so the pod attaches directly to the service
    // at depth 2, not 3.
    let services = vec![service("svc-b", &[("app", "b")])];
    let pods = vec![pod("pod-b", &[("app", "b")])];

    let view = resolve_topology(&[], &services, &pods, &[]);
    assert_eq!(
        view.lines(),
        vec![
            "  Service: svc-b".to_string(),
            "    Pod: pod-b".to_string(),
        ]
    );
}

/// Decision pin: services unreachable from any ingress still render at the
/// Service indent level (depth 1) - indentation is fixed per kind, not
/// relative to a missing parent.
#[test]
fn test_orphan_service_appended_after_ingresses() {
    let ingresses = vec![ingress("web", &["svc-a"])];
    let services = vec![
        service("svc-a", &[("app", "a")]),
        service("svc-standalone", &[("app", "z")]),
    ];

    let view = resolve_topology(&ingresses, &services, &[], &[]);
    assert_eq!(
        view.lines(),
        vec![
            "Ingress: web".to_string(),
            "  Service: svc-a".to_string(),
            "  Service: svc-standalone".to_string(),
        ]
    );
}

#[test]
fn test_resolver_is_deterministic() {
    let ingresses = vec![ingress("web", &["svc-a", "svc-b"]), ingress("api", &["svc-b"])];
    let services = vec![
        service("svc-a", &[("app", "a")]),
        service("svc-b", &[("app", "b")]),
    ];
    let deployments = vec![
        deployment("dep-a", &[("app", "a")]),
        deployment("dep-b", &[("app", "b")]),
    ];
    let pods = vec![
        pod("pod-a", &[("app", "a")]),
        pod("pod-b1", &[("app", "b")]),
        pod("pod-b2", &[("app", "b")]),
    ];

    let first = resolve_topology(&ingresses, &services, &pods, &deployments);
    let second = resolve_topology(&ingresses, &services, &pods, &deployments);
    assert_eq!(first.lines(), second.lines());
}

#[test]
fn test_service_shared_by_two_ingresses_emitted_once() {
    let ingresses = vec![ingress("first", &["svc-a"]), ingress("second", &["svc-a"])];
    let services = vec![service("svc-a", &[("app", "a")])];

    let view = resolve_topology(&ingresses, &services, &[], &[]);
    let lines = view.lines();

    let service_lines: Vec<usize> = lines
        .iter()
        .enumerate()
        .filter(|(_, line)| line.contains("Service: svc-a"))
        .map(|(i, _)| i)
        .collect();
    assert_eq!(service_lines.len(), 1, "service must appear exactly once");

    // ... and under the first ingress that references it
    let first_pos = lines.iter().position(|l| l == "Ingress: first").unwrap();
    let second_pos = lines.iter().position(|l| l == "Ingress: second").unwrap();
    assert!(service_lines[0] > first_pos && service_lines[0] < second_pos);
}

#[test]
fn test_duplicate_backend_within_one_ingress_deduplicated() {
    // Two rules of the same ingress route to the same service
    let mut ing = ingress("web", &["svc-a"]);
    ing.rules.push(IngressRule {
        host: Some("alias.local".to_string()),
        paths: vec![IngressPath {
            path: Some("/v2".to_string()),
            backend_service_name: "svc-a".to_string(),
            backend_service_port: Some(80),
        }],
    });
    let services = vec![service("svc-a", &[("app", "a")])];

    let view = resolve_topology(&[ing], &services, &[], &[]);
    assert_eq!(
        view.lines(),
        vec!["Ingress: web".to_string(), "  Service: svc-a".to_string()]
    );
}

#[test]
fn test_backend_services_visited_in_first_seen_rule_order() {
    let ingresses = vec![ingress("web", &["svc-z", "svc-a"])];
    let services = vec![
        service("svc-a", &[("app", "a")]),
        service("svc-z", &[("app", "z")]),
    ];

    let view = resolve_topology(&ingresses, &services, &[], &[]);
    assert_eq!(
        view.lines(),
        vec![
            "Ingress: web".to_string(),
            "  Service: svc-z".to_string(),
            "  Service: svc-a".to_string(),
        ]
    );
}

#[test]
fn test_empty_selector_matches_nothing() {
    // A headless/externally-managed service must never wildcard-match
    let services = vec![service("svc-headless", &[])];
    let pods = vec![pod("pod-a", &[("app", "a")])];
    let deployments = vec![deployment("dep-a", &[("app", "a")])];

    let view = resolve_topology(&[], &services, &pods, &deployments);
    assert_eq!(view.lines(), vec!["  Service: svc-headless".to_string()]);
}

#[test]
fn test_deployment_without_template_labels_matches_no_pods() {
    let services = vec![service("svc-a", &[("app", "a")])];
    let deployments = vec![deployment("dep-bare", &[])];
    let pods = vec![pod("pod-a", &[("app", "a")])];

    let view = resolve_topology(&[], &services, &pods, &deployments);
    // dep-bare matches neither the service selector nor any pod; the pod
    // falls back to direct attribution
    assert_eq!(
        view.lines(),
        vec![
            "  Service: svc-a".to_string(),
            "    Pod: pod-a".to_string(),
        ]
    );
}

#[test]
fn test_service_matching_many_deployments_shows_all() {
    let services = vec![service("svc-a", &[("app", "a")])];
    let deployments = vec![
        deployment("dep-blue", &[("app", "a"), ("slot", "blue")]),
        deployment("dep-green", &[("app", "a"), ("slot", "green")]),
    ];
    let pods = vec![
        pod("pod-blue", &[("app", "a"), ("slot", "blue")]),
        pod("pod-green", &[("app", "a"), ("slot", "green")]),
    ];

    let view = resolve_topology(&[], &services, &pods, &deployments);
    assert_eq!(
        view.lines(),
        vec![
            "  Service: svc-a".to_string(),
            "    Deployment: dep-blue".to_string(),
            "      Pod: pod-blue".to_string(),
            "    Deployment: dep-green".to_string(),
            "      Pod: pod-green".to_string(),
        ]
    );
}

/// Decision pin: once a service matched any deployment, direct pod
/// attribution for that service is suppressed entirely - even for a pod
/// that satisfies the selector without belonging to a matched deployment.
/// This is the documented label-match approximation, not an ownership
/// check.
#[test]
fn test_direct_pods_suppressed_when_deployment_matches() {
    let services = vec![service("svc-c", &[("app", "c")])];
    let deployments = vec![deployment("dep-c", &[("app", "c"), ("tier", "web")])];
    let pods = vec![
        // Belongs to the deployment (superset of its template labels)
        pod("pod-owned", &[("app", "c"), ("tier", "web")]),
        // Satisfies the service selector but not the deployment template
        pod("pod-stray", &[("app", "c")]),
    ];

    let view = resolve_topology(&[], &services, &pods, &deployments);
    let lines = view.lines();
    assert!(lines.contains(&"      Pod: pod-owned".to_string()));
    assert!(
        !lines.iter().any(|l| l.contains("pod-stray")),
        "stray pod must not be attributed while a deployment matched: {:?}",
        lines
    );
}

#[test]
fn test_no_namespace_filtering_is_done() {
    // The resolver trusts the caller's scoping; objects from different
    // namespaces still join if their labels match.
    let mut svc = service("svc-a", &[("app", "a")]);
    svc.namespace = "other".to_string();
    let pods = vec![pod("pod-a", &[("app", "a")])];

    let view = resolve_topology(&[], &[svc], &pods, &[]);
    assert_eq!(
        view.lines(),
        vec![
            "  Service: svc-a".to_string(),
            "    Pod: pod-a".to_string(),
        ]
    );
}
