use crate::lgraph::{BreakingPointId, EdgeId, NodeId};

/// Failures of the wrapping phases.
///
/// Apart from [`Error::Canceled`] and [`Error::InvalidOptions`] every variant means an earlier
/// phase handed over a graph that breaks its contract, or the cut bookkeeping is inconsistent.
/// None of them is recoverable; the caller should abandon the layout run.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("wrapping phase `{phase}` was canceled")]
    Canceled { phase: &'static str },

    #[error("cut #{index} has already been assigned")]
    CutAlreadyAssigned { index: usize },

    #[error("cut #{index} must be assigned before its offset can be propagated")]
    CutNotAssigned { index: usize },

    #[error("node {node} is a {found} node, expected a {expected} node")]
    UnexpectedNodeKind {
        node: NodeId,
        expected: &'static str,
        found: &'static str,
    },

    #[error("breaking point chain is broken at {record}")]
    BrokenChain { record: BreakingPointId },

    #[error("edge {edge} is missing an endpoint")]
    DanglingEdge { edge: EdgeId },

    #[error("node {node} is not assigned to a layer")]
    DetachedNode { node: NodeId },

    #[error("long-edge dummy {node} has {incoming} incoming but {outgoing} outgoing edges")]
    MalformedDummy {
        node: NodeId,
        incoming: usize,
        outgoing: usize,
    },

    #[error("invalid wrapping options: {0}")]
    InvalidOptions(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
