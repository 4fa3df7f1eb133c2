//! Elementary cycle enumeration
//!
//! Johnson-style depth-first search with node blocking. Each elementary
//! cycle is produced exactly once, anchored at its lowest-index node, so
//! cyclic rotations are never duplicated. Enumeration is independent of
//! the resolved start/end nodes: cycles unreachable from the start are
//! harmless and simply never matched during path search.
//!
//! Worst case is exponential in graph size; callers operating on large
//! graphs should use [`find_cycles_capped`] to bound the enumeration.

use crate::error::{AnalysisError, LimitKind, Result};
use crate::graph::FlowGraph;
use petgraph::graph::NodeIndex;
use std::collections::{HashMap, HashSet};
use tracing::debug;

/// One elementary cycle of the graph
///
/// Stores a representative node sequence plus all of its closed rotations,
/// precomputed once so path enumeration never rebuilds them per DFS step.
/// The rotation anchored at index `i` is `nodes[i..] ++ nodes[..=i]`: one
/// node longer than the cycle, closing back on its anchor. A self-loop
/// `[A]` has the single rotation `[A, A]`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cycle {
    nodes: Vec<NodeIndex>,
    rotations: Vec<Vec<NodeIndex>>,
}

impl Cycle {
    /// Build a cycle from its node sequence, precomputing rotations
    pub fn new(nodes: Vec<NodeIndex>) -> Self {
        let rotations = (0..nodes.len())
            .map(|i| {
                let mut rot = Vec::with_capacity(nodes.len() + 1);
                rot.extend_from_slice(&nodes[i..]);
                rot.extend_from_slice(&nodes[..=i]);
                rot
            })
            .collect();
        Self { nodes, rotations }
    }

    /// Representative node sequence (one rotation, without the closing node)
    pub fn nodes(&self) -> &[NodeIndex] {
        &self.nodes
    }

    /// Number of nodes in the cycle
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Whether the cycle has no nodes
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// How often this cycle occurs in `path`
    ///
    /// Returns the maximum, over all rotations, of the number of times the
    /// closed rotation appears as a contiguous subsequence of `path`.
    /// A result of 0 means the path never completes the cycle; 1 means one
    /// full traversal; anything above 1 is a replay.
    pub fn occurrences_in(&self, path: &[NodeIndex]) -> usize {
        self.rotations
            .iter()
            .map(|rot| count_contiguous(path, rot))
            .max()
            .unwrap_or(0)
    }
}

/// Count contiguous occurrences of `needle` in `haystack`
fn count_contiguous(haystack: &[NodeIndex], needle: &[NodeIndex]) -> usize {
    if needle.is_empty() || haystack.len() < needle.len() {
        return 0;
    }
    haystack.windows(needle.len()).filter(|w| *w == needle).count()
}

/// Enumerate all elementary cycles of the graph
pub fn find_cycles(graph: &FlowGraph) -> Vec<Cycle> {
    let cycles = match enumerate_cycles(graph, usize::MAX) {
        Some(cycles) => cycles,
        // the cycle list would have to hold usize::MAX entries first
        None => unreachable!("uncapped enumeration cannot overflow"),
    };
    debug!(count = cycles.len(), "enumerated elementary cycles");
    cycles
}

/// Enumerate elementary cycles, failing once more than `cap` exist
///
/// The cap bounds combinatorial blow-up on dense graphs. Exceeding it is
/// an explicit [`AnalysisError::EnumerationLimitExceeded`], never a
/// silently truncated result.
pub fn find_cycles_capped(graph: &FlowGraph, cap: usize) -> Result<Vec<Cycle>> {
    enumerate_cycles(graph, cap).ok_or(AnalysisError::EnumerationLimitExceeded {
        kind: LimitKind::Cycles,
        limit: cap,
    })
}

/// Shared search state for one anchor node
struct CycleSearch<'a> {
    adj: &'a [Vec<NodeIndex>],
    start: NodeIndex,
    path: Vec<NodeIndex>,
    blocked: HashSet<NodeIndex>,
    blocked_on: HashMap<NodeIndex, Vec<NodeIndex>>,
    found: &'a mut Vec<Cycle>,
    cap: usize,
    overflow: bool,
}

/// Returns `None` when the cap was exceeded
fn enumerate_cycles(graph: &FlowGraph, cap: usize) -> Option<Vec<Cycle>> {
    // Adjacency snapshot in insertion order. Parallel edges collapse to one
    // entry: elementary cycles are node sequences.
    let adj: Vec<Vec<NodeIndex>> = graph
        .node_indices()
        .map(|v| {
            let mut seen = HashSet::new();
            graph
                .neighbors(v)
                .into_iter()
                .filter(|&w| seen.insert(w))
                .collect()
        })
        .collect();

    let mut found = Vec::new();
    for s in graph.node_indices() {
        let mut search = CycleSearch {
            adj: &adj,
            start: s,
            path: Vec::new(),
            blocked: HashSet::new(),
            blocked_on: HashMap::new(),
            found: &mut found,
            cap,
            overflow: false,
        };
        search.circuit(s);
        if search.overflow {
            return None;
        }
    }
    Some(found)
}

impl CycleSearch<'_> {
    /// Extend the current elementary path by `v`; returns whether any
    /// cycle through `v` back to the anchor was closed
    fn circuit(&mut self, v: NodeIndex) -> bool {
        let mut closed = false;
        self.path.push(v);
        self.blocked.insert(v);

        let neighbors = self.adj[v.index()].clone();
        for &w in &neighbors {
            if self.overflow {
                break;
            }
            // Anchoring: only nodes at or above the anchor participate, so
            // each cycle is reported from its lowest-index node only.
            if w.index() < self.start.index() {
                continue;
            }
            if w == self.start {
                if self.found.len() >= self.cap {
                    self.overflow = true;
                    break;
                }
                self.found.push(Cycle::new(self.path.clone()));
                closed = true;
            } else if !self.blocked.contains(&w) && self.circuit(w) {
                closed = true;
            }
        }

        if closed {
            self.unblock(v);
        } else {
            // No cycle through v for now: v stays blocked until one of its
            // successors gets unblocked.
            for &w in &neighbors {
                if w.index() >= self.start.index() {
                    let waiters = self.blocked_on.entry(w).or_default();
                    if !waiters.contains(&v) {
                        waiters.push(v);
                    }
                }
            }
        }

        self.path.pop();
        closed
    }

    fn unblock(&mut self, v: NodeIndex) {
        let mut stack = vec![v];
        while let Some(u) = stack.pop() {
            self.blocked.remove(&u);
            if let Some(waiters) = self.blocked_on.remove(&u) {
                for w in waiters {
                    if self.blocked.contains(&w) {
                        stack.push(w);
                    }
                }
            }
        }
    }
}
