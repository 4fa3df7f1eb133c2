//! Flowchart graph model
//!
//! Wraps a petgraph directed graph whose nodes are opaque string
//! identifiers with the optional label/type metadata attached by the
//! flowchart parser. Downstream analyses only see the typed accessors
//! here; the raw adjacency storage is never exposed.

use petgraph::algo::tarjan_scc;
use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::visit::EdgeRef;
use petgraph::Direction;
use std::collections::HashMap;

/// Metadata carried by a flowchart node
///
/// `label` is the human-readable text of the shape, `kind` the optional
/// node type (decision, process, external call, ...). Both may be absent:
/// edges can reference nodes the parser never declared, which are created
/// implicitly with empty metadata.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NodeData {
    /// Opaque node identifier, unique within the graph
    pub id: String,
    /// Optional display label
    pub label: Option<String>,
    /// Optional node type
    pub kind: Option<String>,
}

/// Metadata carried by a flowchart edge
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EdgeData {
    /// Optional edge label (branch annotation)
    pub label: Option<String>,
}

/// Directed flowchart graph
///
/// Built once by the external parser and immutable for the lifetime of an
/// analysis run. Self-loops and parallel edges are permitted. Neighbor
/// iteration follows edge insertion order, so every enumeration downstream
/// is reproducible across runs.
#[derive(Debug, Clone, Default)]
pub struct FlowGraph {
    graph: DiGraph<NodeData, EdgeData>,
    index: HashMap<String, NodeIndex>,
}

impl FlowGraph {
    /// Create an empty graph
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a graph from `(node, neighbors)` adjacency pairs
    ///
    /// Convenience constructor for tests and callers that already hold a
    /// plain adjacency description; nodes get no metadata.
    pub fn from_adjacency(adjacency: &[(&str, &[&str])]) -> Self {
        let mut g = Self::new();
        for (node, _) in adjacency {
            g.add_node(node, None, None);
        }
        for (node, neighbors) in adjacency {
            for neighbor in *neighbors {
                g.add_edge(node, neighbor, None);
            }
        }
        g
    }

    /// Insert a node, or update the metadata of an existing one
    pub fn add_node(&mut self, id: &str, label: Option<&str>, kind: Option<&str>) -> NodeIndex {
        match self.index.get(id) {
            Some(&idx) => {
                let data = &mut self.graph[idx];
                if label.is_some() {
                    data.label = label.map(str::to_owned);
                }
                if kind.is_some() {
                    data.kind = kind.map(str::to_owned);
                }
                idx
            }
            None => {
                let idx = self.graph.add_node(NodeData {
                    id: id.to_owned(),
                    label: label.map(str::to_owned),
                    kind: kind.map(str::to_owned),
                });
                self.index.insert(id.to_owned(), idx);
                idx
            }
        }
    }

    /// Add a directed edge, implicitly creating endpoints that were never
    /// declared as nodes
    pub fn add_edge(&mut self, source: &str, target: &str, label: Option<&str>) {
        let s = self.add_node(source, None, None);
        let t = self.add_node(target, None, None);
        self.graph.add_edge(
            s,
            t,
            EdgeData {
                label: label.map(str::to_owned),
            },
        );
    }

    /// Look up a node by identifier
    pub fn node_index(&self, id: &str) -> Option<NodeIndex> {
        self.index.get(id).copied()
    }

    /// Metadata of a node
    pub fn node(&self, idx: NodeIndex) -> Option<&NodeData> {
        self.graph.node_weight(idx)
    }

    /// Identifier of a node
    ///
    /// Panics only if `idx` does not belong to this graph, which indicates
    /// a caller bug (indices are never shared between graphs).
    pub fn id_of(&self, idx: NodeIndex) -> &str {
        &self.graph[idx].id
    }

    /// All node indices, in insertion order
    pub fn node_indices(&self) -> impl Iterator<Item = NodeIndex> + '_ {
        self.graph.node_indices()
    }

    /// Outgoing neighbors of a node, in edge insertion order
    ///
    /// Parallel edges yield the neighbor once per edge. Unknown indices
    /// yield nothing.
    pub fn neighbors(&self, node: NodeIndex) -> Vec<NodeIndex> {
        // petgraph walks out-edges newest first
        let mut out: Vec<NodeIndex> = self
            .graph
            .neighbors_directed(node, Direction::Outgoing)
            .collect();
        out.reverse();
        out
    }

    /// Number of incoming edges
    pub fn in_degree(&self, node: NodeIndex) -> usize {
        self.graph
            .neighbors_directed(node, Direction::Incoming)
            .count()
    }

    /// Number of outgoing edges
    pub fn out_degree(&self, node: NodeIndex) -> usize {
        self.graph
            .neighbors_directed(node, Direction::Outgoing)
            .count()
    }

    /// All edges as `(source, target)` pairs, in insertion order
    pub fn edges(&self) -> Vec<(NodeIndex, NodeIndex)> {
        self.graph
            .edge_references()
            .map(|e| (e.source(), e.target()))
            .collect()
    }

    /// Label of the first edge from `source` to `target`, if any
    pub fn edge_label(&self, source: NodeIndex, target: NodeIndex) -> Option<&str> {
        self.graph
            .edges_connecting(source, target)
            .next()
            .and_then(|e| e.weight().label.as_deref())
    }

    /// Number of nodes
    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    /// Number of edges
    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    /// Whether the graph has no nodes
    pub fn is_empty(&self) -> bool {
        self.graph.node_count() == 0
    }

    /// Cyclomatic number of the flowchart
    ///
    /// `v(G) = E - N + 2 * P`, with `P` the number of strongly connected
    /// components (singletons included).
    pub fn cyclomatic_number(&self) -> isize {
        let e = self.graph.edge_count() as isize;
        let n = self.graph.node_count() as isize;
        let p = tarjan_scc(&self.graph).len() as isize;
        e - n + 2 * p
    }
}
