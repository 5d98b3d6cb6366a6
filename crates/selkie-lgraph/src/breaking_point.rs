//! Bookkeeping records for edges that were cut at a wrapping boundary.
//!
//! A cut edge is rewritten into `source -> start -> end -> target`. The record remembers the
//! two dummies and the three edges so the split can be undone after routing. Records of the same
//! logical edge crossing consecutive cuts form a doubly linked chain through `prev`/`next`.

use crate::graph::{BreakingPointId, EdgeId, NodeId};

/// The in-layer connectors created once the edge between the start and end dummy has been
/// wrapped back into the first row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InLayerDummies {
    /// Dummy sharing the start dummy's layer.
    pub start_dummy: NodeId,
    /// Edge from `start_dummy` to the start dummy.
    pub start_edge: EdgeId,
    /// Dummy sharing the end dummy's layer.
    pub end_dummy: NodeId,
    /// Edge from the end dummy to `end_dummy`.
    pub end_edge: EdgeId,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BreakingPointState {
    /// Dummies exist but the graph has not been wrapped yet.
    Inserted,
    Wrapped(InLayerDummies),
    /// Replaced by a merged record; its dummies are gone.
    Superseded,
    /// Dummies and helper edges have been removed again.
    Spliced,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BreakingPoint {
    pub start: NodeId,
    pub end: NodeId,
    /// `original source -> start`.
    pub node_start_edge: EdgeId,
    /// `start -> end`.
    pub start_end_edge: EdgeId,
    /// The original edge, now leaving `end`.
    pub original_edge: EdgeId,
    pub prev: Option<BreakingPointId>,
    pub next: Option<BreakingPointId>,
    pub state: BreakingPointState,
}

impl BreakingPoint {
    pub fn new(
        start: NodeId,
        end: NodeId,
        node_start_edge: EdgeId,
        start_end_edge: EdgeId,
        original_edge: EdgeId,
    ) -> Self {
        Self {
            start,
            end,
            node_start_edge,
            start_end_edge,
            original_edge,
            prev: None,
            next: None,
            state: BreakingPointState::Inserted,
        }
    }

    pub fn in_layer(&self) -> Option<&InLayerDummies> {
        match &self.state {
            BreakingPointState::Wrapped(dummies) => Some(dummies),
            _ => None,
        }
    }

    /// Whether the record still describes dummies that are part of the graph.
    pub fn is_live(&self) -> bool {
        matches!(
            self.state,
            BreakingPointState::Inserted | BreakingPointState::Wrapped(_)
        )
    }
}
