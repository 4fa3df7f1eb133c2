//! Start/end node resolution from graph degrees
//!
//! A well-formed flowchart has exactly one source (in-degree 0) and at
//! least one sink (out-degree 0). Anything else is rejected before any
//! enumeration starts.

use crate::error::{AnalysisError, Result};
use crate::graph::FlowGraph;
use petgraph::graph::NodeIndex;

/// Resolved entry/exit points of a flowchart graph
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoints {
    /// The unique start node
    pub start: NodeIndex,
    /// All end nodes, in node insertion order
    pub ends: Vec<NodeIndex>,
}

impl Endpoints {
    /// Whether a node is one of the resolved end nodes
    pub fn is_end(&self, node: NodeIndex) -> bool {
        self.ends.contains(&node)
    }
}

/// Resolve the unique start node and the end-node set
///
/// Start candidates are nodes with in-degree 0, end candidates nodes with
/// out-degree 0. Fails with [`AnalysisError::NoEndNode`] when no sink
/// exists, and with [`AnalysisError::MultipleStartNodes`] when there is
/// not exactly one source. A single node with no edges is both start and
/// end.
pub fn resolve_endpoints(graph: &FlowGraph) -> Result<Endpoints> {
    let starts: Vec<NodeIndex> = graph
        .node_indices()
        .filter(|&n| graph.in_degree(n) == 0)
        .collect();
    let ends: Vec<NodeIndex> = graph
        .node_indices()
        .filter(|&n| graph.out_degree(n) == 0)
        .collect();

    if ends.is_empty() {
        return Err(AnalysisError::NoEndNode);
    }

    if starts.len() != 1 {
        let candidates = starts.iter().map(|&n| graph.id_of(n).to_owned()).collect();
        return Err(AnalysisError::MultipleStartNodes(candidates));
    }

    Ok(Endpoints {
        start: starts[0],
        ends,
    })
}
