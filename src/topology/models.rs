//! Data structures for topology results

use serde::Serialize;

use crate::models::ObjectRef;

/// Sentinel line emitted when the namespace has no renderable objects,
/// so callers can tell "ran, found nothing" from "did not run".
pub const NO_CONNECTIONS: &str = "No connections found";

/// Indentation per tree depth in the rendered output.
const INDENT: &str = "  ";

/// One node of the rendered tree: the object's identity triple plus its
/// depth. Depths are fixed per kind: 0 Ingress, 1 Service, 2 Deployment or
/// direct Pod, 3 Pod-under-Deployment.
#[derive(Debug, Clone, Serialize)]
pub struct TopologyEntry {
    #[serde(flatten)]
    pub object: ObjectRef,
    pub depth: usize,
}

impl TopologyEntry {
    pub fn new(
        kind: impl Into<String>,
        namespace: impl Into<String>,
        name: impl Into<String>,
        depth: usize,
    ) -> Self {
        Self {
            object: ObjectRef {
                kind: kind.into(),
                namespace: namespace.into(),
                name: name.into(),
            },
            depth,
        }
    }

    fn render(&self) -> String {
        format!(
            "{}{}: {}",
            INDENT.repeat(self.depth),
            self.object.kind,
            self.object.name
        )
    }
}

/// Resolved topology for one namespace
#[derive(Debug, Clone, Default, Serialize)]
pub struct TopologyView {
    pub entries: Vec<TopologyEntry>,
}

impl TopologyView {
    /// Render the tree as display lines. Never empty: an empty tree yields
    /// the single sentinel line.
    pub fn lines(&self) -> Vec<String> {
        if self.entries.is_empty() {
            return vec![NO_CONNECTIONS.to_string()];
        }
        self.entries.iter().map(TopologyEntry::render).collect()
    }
}

impl std::fmt::Display for TopologyView {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.lines().join("\n"))
    }
}
