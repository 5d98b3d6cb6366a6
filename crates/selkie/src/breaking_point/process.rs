//! Breaking-point processing: the actual wrap.
//!
//! Layers are walked left to right while a write cursor names the destination layer. Layers are
//! copied onto the destination verbatim until a layer of start dummies has been placed. The
//! following layer holds the end dummies; it goes to the very first layer, each edge entering an
//! end dummy is reversed and expanded into a dummy chain leading back to its start dummy, and
//! the cursor continues from the first layer. Layers left empty are dropped afterwards.
//!
//! The optional improvements then
//!
//! * merge chained records of one edge crossing several cuts into a single record, and
//! * pull start and end dummies towards each other as long as the long-edge dummies in front of
//!   them line up with the dummies of their in-layer connector.

use super::record_of;
use crate::dummy_chain::insert_dummies;
use crate::lgraph::{
    BreakingPoint, BreakingPointId, BreakingPointState, EdgeId, InLayerDummies, LGraph, NodeId,
    NodeKind,
};
use crate::long_edge::join_at;
use crate::options::WrappingOptions;
use crate::progress::{ProgressMonitor, begin_phase};
use crate::{Error, Result};

const PHASE: &str = "breaking point processing";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Walk {
    Forward,
    Reverse,
}

/// Direction in which dummy chains are followed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Along {
    /// Along outgoing edges, starting at end dummies.
    Outgoing,
    /// Along incoming edges, starting at start dummies.
    Incoming,
}

pub fn run(
    g: &mut LGraph,
    options: &WrappingOptions,
    monitor: &mut dyn ProgressMonitor,
) -> Result<()> {
    let _span = tracing::debug_span!("breaking_point_process", layers = g.layer_count()).entered();
    begin_phase(monitor, PHASE)?;

    let wrapped = perform_wrapping(g, options.additional_edge_spacing)?;
    tracing::debug!(wrapped, layers = g.layer_count(), "wrapped graph");

    if options.improve_wrapped_edges {
        let merged = improve_multi_cut_index_edges(g)?;
        let forward = improve_unnecessarily_long_edges(g, Along::Outgoing)?;
        let backward = improve_unnecessarily_long_edges(g, Along::Incoming)?;
        // Pulled dummies may have emptied the layers they came from.
        let emptied = g.remove_empty_layers();
        tracing::debug!(merged, forward, backward, emptied, "improved wrapped edges");
    }

    debug_assert!(g.check_layer_indices());
    monitor.done();
    Ok(())
}

/// Returns the number of reversed start-to-end edges.
fn perform_wrapping(g: &mut LGraph, additional_spacing: f64) -> Result<usize> {
    g.insert_layer(0);
    let layers = g.layers()[1..].to_vec();

    let mut walk = Walk::Forward;
    let mut cursor = 1;
    let mut wrapped = 0;

    for layer in layers {
        let Some(destination) = g.layer_at(cursor) else {
            break;
        };
        let nodes = g.layer_nodes(layer).to_vec();
        let offset = nodes.len();
        if destination != layer {
            for node in &nodes {
                g.set_layer(*node, Some(destination));
            }
        }

        match walk {
            Walk::Reverse => {
                for node in nodes.iter().rev() {
                    for edge in g.incoming_edges(*node) {
                        let mark = g.reverse_edge(edge);
                        g.mark_cyclic(mark);
                        let dummy_edges = insert_dummies(g, edge, offset, additional_spacing)?;
                        attach_in_layer_dummies(g, *node, edge, &dummy_edges)?;
                        wrapped += 1;
                    }
                }
                walk = Walk::Forward;
                cursor += 1;
            }
            Walk::Forward => {
                let wraps = nodes
                    .first()
                    .is_some_and(|n| g.node(*n).kind.is_breaking_point());
                if wraps {
                    walk = Walk::Reverse;
                    cursor = 0;
                } else {
                    cursor += 1;
                }
            }
        }
    }

    g.remove_empty_layers();
    Ok(wrapped)
}

fn attach_in_layer_dummies(
    g: &mut LGraph,
    end: NodeId,
    reversed: EdgeId,
    dummy_edges: &[EdgeId],
) -> Result<()> {
    let (id, _) = record_of(g, end)?;
    let (Some(&start_edge), Some(end_dummy)) = (dummy_edges.last(), g.target_node(reversed))
    else {
        return Err(Error::BrokenChain { record: id });
    };
    let Some(start_dummy) = g.source_node(start_edge) else {
        return Err(Error::DanglingEdge { edge: start_edge });
    };
    g.breaking_point_mut(id).state = BreakingPointState::Wrapped(InLayerDummies {
        start_dummy,
        start_edge,
        end_dummy,
        end_edge: reversed,
    });
    Ok(())
}

/// Merges the records along every chain of consecutive cuts crossed by the same edge. Returns
/// the number of merges.
fn improve_multi_cut_index_edges(g: &mut LGraph) -> Result<usize> {
    let mut merges = 0;
    for layer in g.layers().to_vec() {
        for node in g.layer_nodes(layer).to_vec() {
            if !g.is_breaking_point_start(node) {
                continue;
            }
            let (head, info) = record_of(g, node)?;
            if info.prev.is_some() || info.next.is_none() {
                continue;
            }

            let mut current = head;
            let mut next = info.next;
            while let Some(successor) = next {
                let Some(merged) = merge_records(g, current, successor)? else {
                    break;
                };
                merges += 1;
                current = merged;
                next = g.breaking_point(merged).next;
            }
        }
    }
    Ok(merges)
}

/// Merges `successor` into `current` if its dummies can be pulled next to `current`'s end
/// dummy. Returns the id of the merged record, or `None` with the graph untouched if they
/// cannot.
fn merge_records(
    g: &mut LGraph,
    current: BreakingPointId,
    successor: BreakingPointId,
) -> Result<Option<BreakingPointId>> {
    let cur = g.breaking_point(current).clone();
    let nxt = g.breaking_point(successor).clone();
    if nxt.prev != Some(current) {
        return Err(Error::BrokenChain { record: successor });
    }
    let Some(cur_in) = cur.in_layer().copied() else {
        return Err(Error::BrokenChain { record: current });
    };
    let Some(nxt_in) = nxt.in_layer().copied() else {
        return Err(Error::BrokenChain { record: successor });
    };

    if !chains_line_up(g, cur.end, nxt.start, &nxt_in) {
        tracing::trace!(%current, %successor, "records kept apart");
        return Ok(None);
    }
    drop_dummies(g, nxt.start, nxt_in.start_dummy, Along::Incoming, true)?;

    let adjacent = g.source_node(nxt.node_start_edge) == Some(cur.end)
        && g
            .outgoing_edges(nxt_in.end_dummy)
            .iter()
            .any(|e| g.target_node(*e) == Some(nxt_in.start_dummy));
    if !adjacent {
        return Err(Error::BrokenChain { record: successor });
    }

    // The successor's connector now ends where the current one did.
    let target = g.target(cur_in.end_edge);
    g.set_target(nxt_in.end_edge, target);
    g.remove_edge(cur_in.end_edge);
    for dropped in [cur.end, nxt.start, nxt_in.start_dummy, nxt_in.end_dummy] {
        g.remove_node(dropped);
    }

    let merged = g.add_breaking_point(BreakingPoint {
        start: cur.start,
        end: nxt.end,
        node_start_edge: cur.node_start_edge,
        start_end_edge: nxt.start_end_edge,
        original_edge: nxt.original_edge,
        prev: cur.prev,
        next: nxt.next,
        state: BreakingPointState::Wrapped(InLayerDummies {
            start_dummy: cur_in.start_dummy,
            start_edge: cur_in.start_edge,
            end_dummy: cur_in.end_dummy,
            end_edge: nxt_in.end_edge,
        }),
    });
    g.node_mut(cur.start).kind = NodeKind::BreakingPoint(merged);
    g.node_mut(nxt.end).kind = NodeKind::BreakingPoint(merged);
    if let Some(before) = cur.prev {
        g.breaking_point_mut(before).next = Some(merged);
    }
    if let Some(after) = nxt.next {
        g.breaking_point_mut(after).prev = Some(merged);
    }
    g.breaking_point_mut(current).state = BreakingPointState::Superseded;
    g.breaking_point_mut(successor).state = BreakingPointState::Superseded;

    tracing::trace!(%current, %successor, %merged, "merged breaking points");
    Ok(Some(merged))
}

/// Repeatedly shortens wrapped edges from one side until a full pass changes nothing. Returns
/// the number of passes that removed dummies.
fn improve_unnecessarily_long_edges(g: &mut LGraph, along: Along) -> Result<usize> {
    let mut passes = 0;
    loop {
        let mut progressed = false;

        let mut layers = g.layers().to_vec();
        if along == Along::Outgoing {
            layers.reverse();
        }
        for layer in layers {
            let mut nodes = g.layer_nodes(layer).to_vec();
            if along == Along::Incoming {
                nodes.reverse();
            }
            for node in nodes {
                let candidate = match along {
                    Along::Outgoing => g.is_breaking_point_end(node),
                    Along::Incoming => g.is_breaking_point_start(node),
                };
                if !candidate {
                    continue;
                }
                let (id, info) = record_of(g, node)?;
                let Some(in_layer) = info.in_layer() else {
                    return Err(Error::BrokenChain { record: id });
                };
                let dummy = match along {
                    Along::Outgoing => in_layer.end_dummy,
                    Along::Incoming => in_layer.start_dummy,
                };
                progressed |= drop_dummies(g, node, dummy, along, false)?;
            }
        }

        if !progressed {
            return Ok(passes);
        }
        passes += 1;
    }
}

/// Drops pairs of long-edge dummies in front of `bp_node` and its in-layer dummy:
///
/// ```text
///  ... -- d1 -- d2 -- start
///                       |
///  ... -- d4 -- d3 -- in-layer
/// ```
///
/// `(d2, d3)` and then `(d1, d4)` are joined away, `start` and `in-layer` take their slots.
/// Without `force` a pair is only dropped while its dummies are adjacent in their layer or
/// separated by breaking-point and in-layer dummies only. Returns whether anything was dropped.
fn drop_dummies(
    g: &mut LGraph,
    bp_node: NodeId,
    in_layer_dummy: NodeId,
    along: Along,
    force: bool,
) -> Result<bool> {
    let mut one = next_long_edge_dummy(g, bp_node, along);
    let mut two = next_long_edge_dummy(g, in_layer_dummy, along);

    let mut dropped = false;
    while let (Some(pred_one), Some(pred_two)) = (one, two) {
        if !force && !is_adjacent_or_separated_by_breaking_points(g, pred_one, pred_two, along) {
            break;
        }
        let next_one = next_long_edge_dummy(g, pred_one, along);
        let next_two = next_long_edge_dummy(g, pred_two, along);

        join_at(g, pred_one, false)?;
        join_at(g, pred_two, false)?;
        g.replace_node_in_layer(pred_two, in_layer_dummy);
        g.replace_node_in_layer(pred_one, bp_node);
        g.remove_node(pred_one);
        g.remove_node(pred_two);

        one = next_one;
        two = next_two;
        dropped = true;
    }
    Ok(dropped)
}

/// Whether dropping dummy pairs in front of `start` and its start dummy, as a forced
/// [`drop_dummies`] would, leaves `start` fed directly by `end` and the connector running
/// straight from the end dummy to the start dummy. Only walks the chains.
fn chains_line_up(g: &LGraph, end: NodeId, start: NodeId, in_layer: &InLayerDummies) -> bool {
    let one = incoming_chain(g, start);
    let two = incoming_chain(g, in_layer.start_dummy);
    let pairs = one.len().min(two.len());
    let fed_by = |from: NodeId, chain: &[NodeId]| {
        let front = pairs
            .checked_sub(1)
            .and_then(|i| chain.get(i))
            .copied()
            .unwrap_or(from);
        let layer = g.node_layer(front);
        g.incoming_edges(front).into_iter().find_map(|e| {
            let source = g.source_node(e)?;
            (g.node_layer(source) != layer).then_some(source)
        })
    };
    fed_by(start, &one) == Some(end)
        && fed_by(in_layer.start_dummy, &two) == Some(in_layer.end_dummy)
}

fn incoming_chain(g: &LGraph, from: NodeId) -> Vec<NodeId> {
    std::iter::successors(next_long_edge_dummy(g, from, Along::Incoming), |n| {
        next_long_edge_dummy(g, *n, Along::Incoming)
    })
    .collect()
}

/// `dummy1` is the dummy in line with the breaking point.
fn is_adjacent_or_separated_by_breaking_points(
    g: &LGraph,
    dummy1: NodeId,
    dummy2: NodeId,
    along: Along,
) -> bool {
    let (Some(layer), Some(other)) = (g.node_layer(dummy1), g.node_layer(dummy2)) else {
        return false;
    };
    if layer != other {
        return false;
    }
    let (first, last) = match along {
        Along::Outgoing => (dummy2, dummy1),
        Along::Incoming => (dummy1, dummy2),
    };
    let (Some(lo), Some(hi)) = (g.node_index(first), g.node_index(last)) else {
        return false;
    };
    g.layer_nodes(layer)
        .get(lo + 1..hi)
        .unwrap_or_default()
        .iter()
        .all(|n| g.node(*n).kind.is_breaking_point() || is_in_layer_dummy(g, *n))
}

/// The long-edge dummy in an adjacent layer reached from `start`. In-layer connectors of
/// `start` are skipped.
fn next_long_edge_dummy(g: &LGraph, start: NodeId, along: Along) -> Option<NodeId> {
    let edges = match along {
        Along::Outgoing => g.outgoing_edges(start),
        Along::Incoming => g.incoming_edges(start),
    };
    let layer = g.node_layer(start);
    edges.into_iter().find_map(|e| {
        let other = g.other_node(e, start)?;
        (g.node(other).kind.is_long_edge() && g.node_layer(other) != layer).then_some(other)
    })
}

fn is_in_layer_dummy(g: &LGraph, node: NodeId) -> bool {
    if !g.node(node).kind.is_long_edge() {
        return false;
    }
    let layer = g.node_layer(node);
    g.connected_edges(node).into_iter().any(|e| {
        !g.is_self_loop(e) && g.other_node(e, node).and_then(|o| g.node_layer(o)) == layer
    })
}
