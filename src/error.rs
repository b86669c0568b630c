//! Error type shared by every layer of the crate.

use crate::layout::types::NodeId;
use crate::translate::OperationKind;
use crate::version::EngineVersion;

/// Crate-wide result alias.
pub type Result<T> = std::result::Result<T, PlotError>;

/// Everything that can stop a plotting call.
///
/// Label-count mismatches are not in here unless strict labeling is on;
/// they travel as [`crate::labels::PlotWarning`] instead.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum PlotError {
    // ── Input shape ──────────────────────────────────────────────────────────
    #[error("unsupported graph input: {0}")]
    UnsupportedGraphInput(String),

    #[error("unknown layout algorithm '{0}'")]
    UnknownLayout(String),

    #[error("layout has no position for node {0}")]
    MissingPosition(NodeId),

    #[error("layout position for node {0} is not finite")]
    NonFinitePosition(NodeId),

    #[error("node {0} is not part of the graph")]
    UnknownNode(NodeId),

    #[error("edge ({0}, {1}) is not part of the graph")]
    UnknownEdge(NodeId, NodeId),

    #[error("no data to plot: {0}")]
    EmptyData(String),

    #[error("invalid inset bounds: {0}")]
    InvalidBounds(String),

    #[error("option '{key}' expects {expected}")]
    InvalidOption { key: String, expected: &'static str },

    // ── Cardinality ──────────────────────────────────────────────────────────
    #[error("option '{option}' has {actual} values but there are {expected} artists")]
    Cardinality {
        option: String,
        expected: usize,
        actual: usize,
    },

    #[error("{given} labels for {expected} artists")]
    LabelCount { given: usize, expected: usize },

    // ── Version handling ─────────────────────────────────────────────────────
    #[error("no '{concept}' rule for {operation} at engine version {version}")]
    NoMatchingRule {
        operation: OperationKind,
        concept: &'static str,
        version: EngineVersion,
    },

    #[error("overlapping '{concept}' rules for {operation}")]
    OverlappingRules {
        operation: OperationKind,
        concept: &'static str,
    },

    #[error("cannot parse engine version '{0}'")]
    VersionParse(String),

    // ── Engine ───────────────────────────────────────────────────────────────
    #[error("engine error: {0}")]
    Engine(String),
}

impl PlotError {
    /// True for errors caused by the shape or content of caller input.
    pub fn is_input_shape(&self) -> bool {
        matches!(
            self,
            PlotError::UnsupportedGraphInput(_)
                | PlotError::UnknownLayout(_)
                | PlotError::MissingPosition(_)
                | PlotError::NonFinitePosition(_)
                | PlotError::UnknownNode(_)
                | PlotError::UnknownEdge(..)
                | PlotError::EmptyData(_)
                | PlotError::InvalidBounds(_)
                | PlotError::InvalidOption { .. }
        )
    }
}
