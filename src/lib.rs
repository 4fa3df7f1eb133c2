// Flowpath: basis-path enumeration for flowchart control-flow graphs
//
// Resolves endpoints, enumerates elementary cycles and cycle-bounded
// start-to-end paths, selects minimal covering path sets and exports them
// as node descriptor sequences.

pub mod cover;
pub mod cycles;
pub mod endpoints;
pub mod error;
pub mod export;
pub mod graph;
pub mod paths;

pub use cover::{
    exhaustive_cover, greedy_cover, minimum_cover, select_cover, CoverPolicy, CoverageTarget,
    EXHAUSTIVE_GATE,
};
pub use cycles::{find_cycles, find_cycles_capped, Cycle};
pub use endpoints::{resolve_endpoints, Endpoints};
pub use error::{AnalysisError, LimitKind, Result};
pub use export::{export_json, to_descriptors, NodeDescriptor};
pub use graph::{EdgeData, FlowGraph, NodeData};
pub use paths::{
    find_paths, find_paths_with, hash_path, NoopObserver, Path, SearchLimits, SearchObserver,
};
