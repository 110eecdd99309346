//! Namespace topology
//!
//! Computes the Ingress → Service → Deployment → Pod connectivity tree for
//! one namespace's already-fetched object lists and renders it as indented
//! text lines. The resolver is a pure function over the snapshots; it never
//! talks to the cluster itself.

mod models;
mod resolver;

pub use models::{TopologyEntry, TopologyView, NO_CONNECTIONS};
pub use resolver::{resolve_topology, selector_matches};
