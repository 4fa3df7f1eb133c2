//! Path descriptor export
//!
//! Converts enumerated paths back into the flowchart vocabulary: sequences
//! of `{id, label, type}` node descriptors, serializable as JSON for the
//! test-generation stage downstream.

use crate::graph::FlowGraph;
use crate::paths::Path;
use serde::{Deserialize, Serialize};

/// One node of an exported path
///
/// `label` and `kind` mirror the metadata the parser attached to the node;
/// both serialize as `null` when absent. `kind` appears as `"type"` on the
/// wire.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeDescriptor {
    /// Node identifier
    pub id: String,
    /// Display label, if any
    pub label: Option<String>,
    /// Node type, if any
    #[serde(rename = "type")]
    pub kind: Option<String>,
}

/// Resolve a path to its node descriptors, in traversal order
///
/// Nodes visited more than once appear once per visit. Indices not present
/// in the graph are skipped; they can only come from a foreign graph.
pub fn to_descriptors(path: &Path, graph: &FlowGraph) -> Vec<NodeDescriptor> {
    path.nodes
        .iter()
        .filter_map(|&idx| graph.node(idx))
        .map(|data| NodeDescriptor {
            id: data.id.clone(),
            label: data.label.clone(),
            kind: data.kind.clone(),
        })
        .collect()
}

/// Serialize a path set as a JSON array of descriptor sequences
pub fn export_json(paths: &[Path], graph: &FlowGraph) -> serde_json::Result<String> {
    let descriptors: Vec<Vec<NodeDescriptor>> =
        paths.iter().map(|p| to_descriptors(p, graph)).collect();
    serde_json::to_string_pretty(&descriptors)
}
