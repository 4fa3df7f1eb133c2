//! Error types for flowchart path analysis
//!
//! Every error is terminal for the current analysis call: nothing is
//! retried internally and no partial result list accompanies a failure.

use std::fmt;
use thiserror::Error;

/// Which enumeration hit its caller-imposed cap
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LimitKind {
    /// Elementary-cycle enumeration
    Cycles,
    /// Start-to-end path enumeration
    Paths,
    /// Candidate set of the exhaustive cover selector
    CoverCandidates,
}

impl fmt::Display for LimitKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            LimitKind::Cycles => "cycle",
            LimitKind::Paths => "path",
            LimitKind::CoverCandidates => "cover candidate",
        };
        f.write_str(name)
    }
}

/// Errors produced by the analysis pipeline
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum AnalysisError {
    /// The graph has no node with out-degree zero.
    #[error("the graph does not have an ending node")]
    NoEndNode,

    /// The graph does not have exactly one node with in-degree zero.
    /// Carries every candidate so callers can report the offending shapes.
    #[error("multiple start nodes found in the graph: {0:?}")]
    MultipleStartNodes(Vec<String>),

    /// A caller-imposed cap on an enumeration was exceeded. Surfaced
    /// instead of silently truncating so a partial result is never
    /// mistaken for a complete one.
    #[error("{kind} enumeration exceeded the configured limit of {limit}")]
    EnumerationLimitExceeded { kind: LimitKind, limit: usize },

    /// No combination of the available paths covers the requested target
    /// elements. Carries the elements left uncovered.
    #[error("coverage incomplete: no path combination covers {missing:?}")]
    CoverageIncomplete { missing: Vec<String> },
}

/// Result alias for analysis operations
pub type Result<T> = std::result::Result<T, AnalysisError>;
