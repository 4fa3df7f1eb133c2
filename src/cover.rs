//! Minimal path-cover selection
//!
//! Reduces the enumerated path set to a small subset whose union touches
//! every node (or every edge) of the graph. Two interchangeable policies:
//!
//! - **Greedy-by-length**: polynomial; walks candidates shortest-first and
//!   keeps every path that still introduces an uncovered element. Fast but
//!   not guaranteed to find the globally smallest cover.
//! - **Exhaustive-minimum**: tries every combination of candidate paths by
//!   increasing size and stops at the first one that covers the target.
//!   Guarantees minimum cardinality at `O(2^n)` worst-case cost, so it is
//!   gated on the candidate count.

use crate::cycles::find_cycles;
use crate::endpoints::resolve_endpoints;
use crate::error::{AnalysisError, LimitKind, Result};
use crate::graph::FlowGraph;
use crate::paths::{find_paths, Path};
use petgraph::graph::NodeIndex;
use std::collections::HashSet;
use tracing::debug;

/// Which graph elements a cover must touch
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CoverageTarget {
    /// Every node of the graph
    Nodes,
    /// Every edge of the graph
    Edges,
}

/// Cover selection policy
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CoverPolicy {
    /// Greedy-by-length heuristic
    Greedy,
    /// Smallest-cardinality cover by combination search
    ExhaustiveMinimum,
}

/// Candidate gate for [`CoverPolicy::ExhaustiveMinimum`]
///
/// Above this many candidate paths the combination search is refused;
/// callers wanting more must pass an explicit gate to
/// [`exhaustive_cover`].
pub const EXHAUSTIVE_GATE: usize = 20;

/// A coverable graph element
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
enum Element {
    Node(NodeIndex),
    Edge(NodeIndex, NodeIndex),
}

/// Target elements of the graph, deduplicated, in insertion order
fn required_elements(graph: &FlowGraph, target: CoverageTarget) -> Vec<Element> {
    let mut seen = HashSet::new();
    match target {
        CoverageTarget::Nodes => graph
            .node_indices()
            .map(Element::Node)
            .filter(|&e| seen.insert(e))
            .collect(),
        CoverageTarget::Edges => graph
            .edges()
            .into_iter()
            .map(|(s, t)| Element::Edge(s, t))
            .filter(|&e| seen.insert(e))
            .collect(),
    }
}

/// Elements a path contributes to the target
fn path_elements(path: &Path, target: CoverageTarget) -> Vec<Element> {
    match target {
        CoverageTarget::Nodes => path.nodes.iter().copied().map(Element::Node).collect(),
        CoverageTarget::Edges => path
            .edges()
            .into_iter()
            .map(|(s, t)| Element::Edge(s, t))
            .collect(),
    }
}

fn describe(graph: &FlowGraph, element: Element) -> String {
    match element {
        Element::Node(n) => graph.id_of(n).to_owned(),
        Element::Edge(s, t) => format!("{}->{}", graph.id_of(s), graph.id_of(t)),
    }
}

/// Select a cover with the given policy
///
/// The exhaustive policy runs behind [`EXHAUSTIVE_GATE`].
pub fn select_cover(
    graph: &FlowGraph,
    paths: &[Path],
    target: CoverageTarget,
    policy: CoverPolicy,
) -> Result<Vec<Path>> {
    match policy {
        CoverPolicy::Greedy => greedy_cover(graph, paths, target),
        CoverPolicy::ExhaustiveMinimum => exhaustive_cover(graph, paths, target, EXHAUSTIVE_GATE),
    }
}

/// Greedy-by-length cover
///
/// Sorts candidates ascending by length (ties keep enumeration order) and
/// takes every path that still introduces at least one uncovered element,
/// until the target is covered or candidates run out. Fails with
/// [`AnalysisError::CoverageIncomplete`] when elements remain uncovered.
pub fn greedy_cover(
    graph: &FlowGraph,
    paths: &[Path],
    target: CoverageTarget,
) -> Result<Vec<Path>> {
    let required = required_elements(graph, target);
    if required.is_empty() {
        return Ok(Vec::new());
    }

    let mut candidates: Vec<&Path> = paths.iter().collect();
    candidates.sort_by_key(|p| p.len());

    let mut covered: HashSet<Element> = HashSet::new();
    let mut cover: Vec<Path> = Vec::new();
    for path in candidates {
        if covered.len() == required.len() {
            break;
        }
        let elements = path_elements(path, target);
        if elements.iter().any(|e| !covered.contains(e)) {
            covered.extend(elements);
            cover.push(path.clone());
        }
    }

    let missing: Vec<String> = required
        .iter()
        .filter(|e| !covered.contains(e))
        .map(|&e| describe(graph, e))
        .collect();
    if !missing.is_empty() {
        return Err(AnalysisError::CoverageIncomplete { missing });
    }

    debug!(paths = cover.len(), "greedy cover selected");
    Ok(cover)
}

/// Exhaustive minimum-cardinality cover
///
/// Considers only paths touching at least one target element, then tries
/// all combinations of size 1, 2, 3, ... and returns the first covering
/// one. Refuses to run on more than `gate` candidates.
pub fn exhaustive_cover(
    graph: &FlowGraph,
    paths: &[Path],
    target: CoverageTarget,
    gate: usize,
) -> Result<Vec<Path>> {
    let required = required_elements(graph, target);
    if required.is_empty() {
        return Ok(Vec::new());
    }
    let required_set: HashSet<Element> = required.iter().copied().collect();

    let candidates: Vec<(&Path, HashSet<Element>)> = paths
        .iter()
        .filter_map(|p| {
            let elements: HashSet<Element> = path_elements(p, target)
                .into_iter()
                .filter(|e| required_set.contains(e))
                .collect();
            if elements.is_empty() {
                None
            } else {
                Some((p, elements))
            }
        })
        .collect();

    if candidates.len() > gate {
        return Err(AnalysisError::EnumerationLimitExceeded {
            kind: LimitKind::CoverCandidates,
            limit: gate,
        });
    }

    for r in 1..=candidates.len() {
        let mut indices: Vec<usize> = (0..r).collect();
        loop {
            let mut union: HashSet<Element> = HashSet::new();
            for &i in &indices {
                union.extend(candidates[i].1.iter().copied());
            }
            if union.len() == required_set.len() {
                debug!(paths = r, "exhaustive cover selected");
                return Ok(indices.iter().map(|&i| candidates[i].0.clone()).collect());
            }
            if !next_combination(&mut indices, candidates.len()) {
                break;
            }
        }
    }

    let mut reachable: HashSet<Element> = HashSet::new();
    for (_, elements) in &candidates {
        reachable.extend(elements.iter().copied());
    }
    let missing = required
        .iter()
        .filter(|e| !reachable.contains(e))
        .map(|&e| describe(graph, e))
        .collect();
    Err(AnalysisError::CoverageIncomplete { missing })
}

/// Advance `indices` to the next lexicographic r-combination of `0..n`
fn next_combination(indices: &mut [usize], n: usize) -> bool {
    let r = indices.len();
    let mut i = r;
    while i > 0 {
        i -= 1;
        if indices[i] != i + n - r {
            indices[i] += 1;
            for j in i + 1..r {
                indices[j] = indices[j - 1] + 1;
            }
            return true;
        }
    }
    false
}

/// Whole pipeline: endpoints, cycles, paths, greedy node cover
///
/// The default end-to-end reduction for a parsed flowchart graph.
pub fn minimum_cover(graph: &FlowGraph) -> Result<Vec<Path>> {
    let endpoints = resolve_endpoints(graph)?;
    let cycles = find_cycles(graph);
    let paths = find_paths(graph, &endpoints, &cycles)?;
    greedy_cover(graph, &paths, CoverageTarget::Nodes)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn enumerate(graph: &FlowGraph) -> Vec<Path> {
        let endpoints = resolve_endpoints(graph).unwrap();
        let cycles = find_cycles(graph);
        find_paths(graph, &endpoints, &cycles).unwrap()
    }

    fn covered_nodes(graph: &FlowGraph, cover: &[Path]) -> HashSet<String> {
        cover
            .iter()
            .flat_map(|p| p.ids(graph))
            .map(str::to_owned)
            .collect()
    }

    fn covered_edges(cover: &[Path]) -> HashSet<(NodeIndex, NodeIndex)> {
        cover.iter().flat_map(|p| p.edges()).collect()
    }

    #[test]
    fn test_greedy_node_cover_covers_everything() {
        let g = FlowGraph::from_adjacency(&[
            ("1", &["2"]),
            ("2", &["3"]),
            ("3", &["7", "4"]),
            ("4", &["6", "5"]),
            ("5", &[]),
            ("6", &["3"]),
            ("7", &["2"]),
        ]);
        let paths = enumerate(&g);
        let cover = greedy_cover(&g, &paths, CoverageTarget::Nodes).unwrap();

        assert!(cover.len() < paths.len());
        let all: HashSet<String> = g.node_indices().map(|n| g.id_of(n).to_owned()).collect();
        assert_eq!(covered_nodes(&g, &cover), all);
    }

    #[test]
    fn test_greedy_prefers_short_paths_first() {
        let g = FlowGraph::from_adjacency(&[
            ("A", &["B", "C"]),
            ("B", &["D"]),
            ("C", &["D"]),
            ("D", &[]),
        ]);
        let paths = enumerate(&g);
        let cover = greedy_cover(&g, &paths, CoverageTarget::Nodes).unwrap();

        assert_eq!(cover.len(), 2);
    }

    #[test]
    fn test_exhaustive_beats_greedy_when_one_long_path_suffices() {
        // S,C,E then S,B,C,E then S,A,B,C,E is greedy's order; the longest
        // path alone already covers every node
        let g = FlowGraph::from_adjacency(&[
            ("S", &["A", "B", "C"]),
            ("A", &["B"]),
            ("B", &["C"]),
            ("C", &["E"]),
            ("E", &[]),
        ]);
        let paths = enumerate(&g);

        let greedy = greedy_cover(&g, &paths, CoverageTarget::Nodes).unwrap();
        let exhaustive =
            exhaustive_cover(&g, &paths, CoverageTarget::Nodes, EXHAUSTIVE_GATE).unwrap();

        assert_eq!(exhaustive.len(), 1);
        assert!(exhaustive.len() <= greedy.len());
        assert_eq!(exhaustive[0].ids(&g), vec!["S", "A", "B", "C", "E"]);
    }

    #[test]
    fn test_edge_cover_touches_every_edge() {
        let g = FlowGraph::from_adjacency(&[
            ("A", &["B", "C"]),
            ("B", &["D"]),
            ("C", &["D"]),
            ("D", &[]),
        ]);
        let paths = enumerate(&g);

        for cover in [
            greedy_cover(&g, &paths, CoverageTarget::Edges).unwrap(),
            exhaustive_cover(&g, &paths, CoverageTarget::Edges, EXHAUSTIVE_GATE).unwrap(),
        ] {
            let all: HashSet<(NodeIndex, NodeIndex)> = g.edges().into_iter().collect();
            assert_eq!(covered_edges(&cover), all);
            assert_eq!(cover.len(), 2);
        }
    }

    #[test]
    fn test_coverage_incomplete_reports_missing_nodes() {
        // C sits on a self-loop island: never reachable from the start
        let g = FlowGraph::from_adjacency(&[("A", &["B"]), ("B", &[]), ("C", &["C"])]);
        let paths = enumerate(&g);

        let err = greedy_cover(&g, &paths, CoverageTarget::Nodes).unwrap_err();
        assert_eq!(
            err,
            AnalysisError::CoverageIncomplete {
                missing: vec!["C".into()]
            }
        );

        let err = exhaustive_cover(&g, &paths, CoverageTarget::Nodes, EXHAUSTIVE_GATE).unwrap_err();
        assert!(matches!(err, AnalysisError::CoverageIncomplete { .. }));
    }

    #[test]
    fn test_exhaustive_gate_refuses_large_candidate_sets() {
        let g = FlowGraph::from_adjacency(&[
            ("A", &["B", "C"]),
            ("B", &["D"]),
            ("C", &["D"]),
            ("D", &[]),
        ]);
        let paths = enumerate(&g);

        let err = exhaustive_cover(&g, &paths, CoverageTarget::Nodes, 1).unwrap_err();
        assert_eq!(
            err,
            AnalysisError::EnumerationLimitExceeded {
                kind: LimitKind::CoverCandidates,
                limit: 1
            }
        );
    }

    #[test]
    fn test_select_cover_dispatch() {
        let g = FlowGraph::from_adjacency(&[("A", &["B"]), ("B", &[])]);
        let paths = enumerate(&g);

        let greedy = select_cover(&g, &paths, CoverageTarget::Nodes, CoverPolicy::Greedy).unwrap();
        let exhaustive =
            select_cover(&g, &paths, CoverageTarget::Nodes, CoverPolicy::ExhaustiveMinimum)
                .unwrap();
        assert_eq!(greedy, exhaustive);
    }

    #[test]
    fn test_minimum_cover_pipeline() {
        let g = FlowGraph::from_adjacency(&[
            ("1", &["2"]),
            ("2", &["3"]),
            ("3", &["7", "4"]),
            ("4", &["6", "5"]),
            ("5", &[]),
            ("6", &["3"]),
            ("7", &["2"]),
        ]);
        let cover = minimum_cover(&g).unwrap();

        let all: HashSet<String> = g.node_indices().map(|n| g.id_of(n).to_owned()).collect();
        assert_eq!(covered_nodes(&g, &cover), all);
    }

    #[test]
    fn test_next_combination_enumerates_lexicographically() {
        let mut indices = vec![0, 1];
        let mut seen = vec![indices.clone()];
        while next_combination(&mut indices, 4) {
            seen.push(indices.clone());
        }
        assert_eq!(
            seen,
            vec![
                vec![0, 1],
                vec![0, 2],
                vec![0, 3],
                vec![1, 2],
                vec![1, 3],
                vec![2, 3]
            ]
        );
    }

    #[test]
    fn test_empty_graph_needs_no_cover() {
        let g = FlowGraph::new();
        assert_eq!(greedy_cover(&g, &[], CoverageTarget::Nodes).unwrap(), vec![]);
        assert_eq!(
            exhaustive_cover(&g, &[], CoverageTarget::Edges, EXHAUSTIVE_GATE).unwrap(),
            vec![]
        );
    }
}
