//! Wrapping general graphs with breaking-point dummies.
//!
//! Three phases work together:
//!
//! 1. [`insert`] runs right after layering. It picks the cut indexes and, at every cut, inserts
//!    two layers holding a start and an end dummy for each edge crossing the cut.
//! 2. [`process`] runs after crossing minimization. It moves the rows after each cut back to
//!    the first layers, reverses the start-to-end edges and expands them into dummy chains, then
//!    optionally shortens the resulting detours.
//! 3. [`remove`] runs after edge routing. It splices the dummies out again and rebuilds every
//!    original edge's bend points.

pub mod insert;
pub mod process;
pub mod remove;

use crate::lgraph::{BreakingPoint, BreakingPointId, LGraph, NodeId};
use crate::{Error, Result};

/// The record of the breaking-point dummy `node`.
pub(crate) fn record_of(g: &LGraph, node: NodeId) -> Result<(BreakingPointId, &BreakingPoint)> {
    let kind = g.node(node).kind;
    match kind.breaking_point() {
        Some(id) => Ok((id, g.breaking_point(id))),
        None => Err(Error::UnexpectedNodeKind {
            node,
            expected: "breaking-point",
            found: kind.name(),
        }),
    }
}
