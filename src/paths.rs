//! Cycle-bounded path enumeration
//!
//! Explicit-stack depth-first search from the start node to the end set.
//! A branch may traverse each elementary cycle at most once: any extension
//! that makes one rotation of a cycle occur twice as a contiguous
//! subsequence is pruned. The explicit stack keeps memory predictable on
//! deep cyclic graphs instead of risking call-stack overflow.
//!
//! Termination: every surviving branch strictly consumes cycle rotations,
//! and a graph with finitely many elementary cycles only has finitely many
//! rotation windows to consume before every branch reaches an end node or
//! is pruned.

use crate::cycles::Cycle;
use crate::endpoints::Endpoints;
use crate::error::{AnalysisError, LimitKind, Result};
use crate::graph::FlowGraph;
use petgraph::graph::NodeIndex;
use std::collections::HashSet;
use tracing::{debug, trace};

/// Execution path from the start node to one of the end nodes
///
/// Intermediate nodes may repeat when cycles are traversed. `path_id` is
/// a BLAKE3 hash of the node sequence and defines path identity for
/// result de-duplication.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Path {
    /// Unique identifier (BLAKE3 hash of the node sequence)
    pub path_id: String,
    /// Ordered node indices in traversal order
    pub nodes: Vec<NodeIndex>,
}

impl Path {
    /// Create a path from a node sequence
    pub fn new(nodes: Vec<NodeIndex>) -> Self {
        let path_id = hash_path(&nodes);
        Self { path_id, nodes }
    }

    /// Number of nodes in the path
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Whether the path has no nodes
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Whether the path visits a node
    pub fn contains(&self, node: NodeIndex) -> bool {
        self.nodes.contains(&node)
    }

    /// Consecutive `(source, target)` pairs traversed by the path
    pub fn edges(&self) -> Vec<(NodeIndex, NodeIndex)> {
        self.nodes.windows(2).map(|w| (w[0], w[1])).collect()
    }

    /// Node identifiers along the path
    pub fn ids<'g>(&self, graph: &'g FlowGraph) -> Vec<&'g str> {
        self.nodes.iter().map(|&n| graph.id_of(n)).collect()
    }
}

/// Compute the BLAKE3 signature of a node sequence
///
/// The length is hashed first so a sequence and its prefix never collide.
pub fn hash_path(nodes: &[NodeIndex]) -> String {
    let mut hasher = blake3::Hasher::new();
    hasher.update(&nodes.len().to_le_bytes());
    for node in nodes {
        hasher.update(&(node.index() as u64).to_le_bytes());
    }
    hasher.finalize().to_hex().to_string()
}

/// Caller-imposed bounds on path enumeration
///
/// Unset means unbounded. When a bound is exceeded the search fails with
/// [`AnalysisError::EnumerationLimitExceeded`] instead of truncating, so
/// callers can decide to reduce the graph or raise the limit.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchLimits {
    /// Maximum number of distinct result paths
    pub max_paths: Option<usize>,
}

impl SearchLimits {
    /// Unbounded search
    pub fn new() -> Self {
        Self::default()
    }

    /// Bound the number of result paths
    pub fn with_max_paths(mut self, max_paths: usize) -> Self {
        self.max_paths = Some(max_paths);
        self
    }
}

/// Search progress callbacks
///
/// Injectable replacement for ambient logging: implementations receive the
/// completed paths and pruned candidates as the search runs. All methods
/// default to no-ops.
pub trait SearchObserver {
    /// A new distinct path reached an end node
    fn on_path_found(&mut self, path: &[NodeIndex]) {
        let _ = path;
    }

    /// A candidate extension replayed a cycle and was abandoned
    fn on_branch_pruned(&mut self, candidate: &[NodeIndex]) {
        let _ = candidate;
    }
}

/// Observer that ignores every event
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopObserver;

impl SearchObserver for NoopObserver {}

/// Enumerate all cycle-bounded paths from the start to any end node
///
/// Unbounded, with no observer. See [`find_paths_with`].
pub fn find_paths(graph: &FlowGraph, endpoints: &Endpoints, cycles: &[Cycle]) -> Result<Vec<Path>> {
    find_paths_with(
        graph,
        endpoints,
        cycles,
        &SearchLimits::default(),
        &mut NoopObserver,
    )
}

/// Enumerate all cycle-bounded paths, with limits and an observer
///
/// Depth-first search over an explicit frame stack. Each frame carries the
/// node sequence so far and the set of cycles already consumed on its
/// branch. For every neighbor extension, each elementary cycle is checked
/// against the candidate sequence:
///
/// - some rotation occurs more than once: the extension replays a consumed
///   cycle and is abandoned;
/// - some rotation occurs exactly once and the cycle was already consumed:
///   a terminal neighbor still completes a valid path, otherwise the
///   branch continues inside the cycle region with its used set unchanged;
/// - some rotation occurs exactly once and the cycle is new: the cycle is
///   consumed by this branch;
/// - no rotation occurs: the extension is unaffected by this cycle.
///
/// Two completed paths with identical node sequences count once. The frame
/// stack is LIFO and neighbor order is fixed, so enumeration order is
/// deterministic.
pub fn find_paths_with(
    graph: &FlowGraph,
    endpoints: &Endpoints,
    cycles: &[Cycle],
    limits: &SearchLimits,
    observer: &mut dyn SearchObserver,
) -> Result<Vec<Path>> {
    struct Frame {
        node: NodeIndex,
        path: Vec<NodeIndex>,
        used: Vec<usize>,
    }

    let mut results: Vec<Path> = Vec::new();
    let mut seen: HashSet<String> = HashSet::new();

    let mut stack = vec![Frame {
        node: endpoints.start,
        path: vec![endpoints.start],
        used: Vec::new(),
    }];

    while let Some(frame) = stack.pop() {
        if endpoints.is_end(frame.node) {
            record(frame.path, &mut results, &mut seen, observer);
            check_limit(&results, limits)?;
            continue;
        }

        for neighbor in graph.neighbors(frame.node) {
            let mut candidate = frame.path.clone();
            candidate.push(neighbor);
            let mut used = frame.used.clone();

            let mut abandoned = false;
            let mut terminal = false;
            for (ci, cycle) in cycles.iter().enumerate() {
                match cycle.occurrences_in(&candidate) {
                    0 => {}
                    1 => {
                        if used.contains(&ci) {
                            // Looped back into a consumed cycle. Reaching an
                            // end here still completes a valid path; anything
                            // else keeps walking the cycle region and the
                            // replay check above will cut it off.
                            if endpoints.is_end(neighbor) {
                                terminal = true;
                                break;
                            }
                        } else {
                            used.push(ci);
                        }
                    }
                    _ => {
                        abandoned = true;
                        break;
                    }
                }
            }

            if abandoned {
                trace!(len = candidate.len(), "pruned branch replaying a cycle");
                observer.on_branch_pruned(&candidate);
                continue;
            }
            if terminal {
                record(candidate, &mut results, &mut seen, observer);
                check_limit(&results, limits)?;
                continue;
            }
            stack.push(Frame {
                node: neighbor,
                path: candidate,
                used,
            });
        }
    }

    debug!(count = results.len(), "path enumeration complete");
    Ok(results)
}

/// Append a completed path unless an identical sequence was already seen
fn record(
    nodes: Vec<NodeIndex>,
    results: &mut Vec<Path>,
    seen: &mut HashSet<String>,
    observer: &mut dyn SearchObserver,
) {
    let path = Path::new(nodes);
    if seen.insert(path.path_id.clone()) {
        observer.on_path_found(&path.nodes);
        results.push(path);
    }
}

fn check_limit(results: &[Path], limits: &SearchLimits) -> Result<()> {
    if let Some(cap) = limits.max_paths {
        if results.len() > cap {
            return Err(AnalysisError::EnumerationLimitExceeded {
                kind: LimitKind::Paths,
                limit: cap,
            });
        }
    }
    Ok(())
}
