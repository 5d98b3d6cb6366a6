//! Breaking-point removal.
//!
//! Runs after edge routing. Every chain of records is spliced from its tail towards its head:
//! the three edges of a record become the original edge again, with the bend points of the
//! helper edges prepended in drawing order.

use super::record_of;
use crate::lgraph::{BreakingPointId, BreakingPointState, EdgeId, EdgeRouting, LGraph, Point};
use crate::long_edge::join_at;
use crate::progress::{ProgressMonitor, begin_phase};
use crate::{Error, Result};

const PHASE: &str = "breaking point removal";

/// Returns the number of records spliced.
pub fn run(g: &mut LGraph, monitor: &mut dyn ProgressMonitor) -> Result<usize> {
    let _span = tracing::debug_span!("breaking_point_remove").entered();
    begin_phase(monitor, PHASE)?;

    let routing = g.label().edge_routing;
    let tails: Vec<BreakingPointId> = g
        .layered_nodes()
        .filter(|n| g.is_breaking_point_end(*n))
        .map(|n| record_of(g, n).map(|(id, _)| id))
        .collect::<Result<Vec<_>>>()?
        .into_iter()
        .filter(|id| g.breaking_point(*id).next.is_none())
        .collect();

    let mut spliced = 0;
    for tail in tails {
        spliced += splice_chain(g, tail, routing)?;
    }

    tracing::debug!(spliced, "removed breaking points");
    monitor.done();
    Ok(spliced)
}

fn splice_chain(g: &mut LGraph, tail: BreakingPointId, routing: EdgeRouting) -> Result<usize> {
    let mut count = 0;
    let mut current = Some(tail);
    let mut from: Option<BreakingPointId> = None;
    while let Some(id) = current {
        let bp = g.breaking_point(id).clone();
        if !bp.is_live() || bp.next != from {
            return Err(Error::BrokenChain { record: id });
        }
        if record_of(g, bp.start)?.0 != id || record_of(g, bp.end)?.0 != id {
            return Err(Error::BrokenChain { record: id });
        }

        collapse_long_edge_dummies(g, bp.node_start_edge)?;
        collapse_long_edge_dummies(g, bp.start_end_edge)?;
        collapse_long_edge_dummies(g, bp.original_edge)?;

        let node_start = g.edge(bp.node_start_edge).clone();
        let start_end = g.edge(bp.start_end_edge).clone();
        let original = g.edge(bp.original_edge).clone();

        // After wrapping the start-to-end edge runs from the end dummy back to the start dummy.
        let reversed = start_end.is_reversed();
        let mut middle = start_end.bend_points;
        if reversed {
            middle.reverse();
        }

        let mut bends: Vec<Point> = node_start.bend_points;
        match routing {
            EdgeRouting::Splines | EdgeRouting::Polyline => {
                bends.push(g.node(bp.start).position);
                bends.extend(middle);
                bends.push(g.node(bp.end).position);
            }
            EdgeRouting::Orthogonal => bends.extend(middle),
        }
        bends.extend(original.bend_points);

        let junctions = [
            original.junction_points,
            start_end.junction_points,
            node_start.junction_points,
        ]
        .into_iter()
        .flatten()
        .reduce(|mut acc, more| {
            acc.extend(more);
            acc
        });

        let source = g.source(bp.node_start_edge);
        g.set_source(bp.original_edge, source);
        let edge = g.edge_mut(bp.original_edge);
        edge.bend_points = bends;
        edge.junction_points = junctions;

        g.remove_edge(bp.node_start_edge);
        g.remove_edge(bp.start_end_edge);
        g.remove_node(bp.start);
        g.remove_node(bp.end);
        g.breaking_point_mut(id).state = BreakingPointState::Spliced;

        tracing::trace!(record = %id, edge = %bp.original_edge, "spliced breaking point");
        count += 1;
        from = Some(id);
        current = bp.prev;
    }
    Ok(count)
}

/// Joins away long-edge dummies following `edge` until it reaches a node of another kind.
fn collapse_long_edge_dummies(g: &mut LGraph, edge: EdgeId) -> Result<()> {
    loop {
        let Some(target) = g.target_node(edge) else {
            return Err(Error::DanglingEdge { edge });
        };
        if !g.node(target).kind.is_long_edge() {
            return Ok(());
        }
        join_at(g, target, false)?;
        g.remove_node(target);
    }
}
