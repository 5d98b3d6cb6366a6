//! Splitting edges that span several layers into dummy chains, and joining them back.
//!
//! The wrapping phases expect every edge of the wrapped graph to connect adjacent layers, so the
//! splitter runs between breaking-point insertion and processing. The joiner undoes the split
//! once routing has produced bend points.

use crate::dummy_chain::{layer_index_of, split_with_dummy};
use crate::lgraph::{LGraph, NodeId, NodeKind};
use crate::{Error, Result};

/// Splits every edge whose target lies more than one layer to the right of its source. The
/// original edge stays the first segment of its chain. Returns the number of dummies created.
pub fn split_long_edges(g: &mut LGraph) -> Result<usize> {
    let _span = tracing::debug_span!("split_long_edges", layers = g.layer_count()).entered();

    let mut created = 0;
    for layer in g.layers().to_vec() {
        for node in g.layer_nodes(layer).to_vec() {
            for edge in g.outgoing_edges(node) {
                let Some(target) = g.target_node(edge) else {
                    continue;
                };
                let src_index = layer_index_of(g, node)?;
                let tgt_index = layer_index_of(g, target)?;

                let mut current = edge;
                for position in src_index + 1..tgt_index {
                    let Some(dummy_layer) = g.layer_at(position) else {
                        break;
                    };
                    let (dummy, next) = split_with_dummy(g, current, edge)?;
                    g.set_layer(dummy, Some(dummy_layer));
                    current = next;
                    created += 1;
                }
            }
        }
    }
    tracing::debug!(created, "split long edges");
    Ok(created)
}

/// Joins the edges entering and leaving the long-edge dummy `dummy`.
///
/// Incoming and outgoing edges are paired by position. Of each pair the chain's origin edge
/// survives if it is one of the two, otherwise the incoming edge does. The survivor spans from
/// the incoming edge's source to the outgoing edge's target and collects the bend and junction
/// points of both in route order. The dummy keeps its layer and is left without edges. With
/// `add_unnecessary_bend_points` the dummy's position is kept as an extra bend point even though
/// the route does not change direction there.
///
/// Reversed segments have to be restored first. A dummy between a reversed and a forward
/// segment has only outgoing or only incoming edges and is reported as malformed.
pub fn join_at(g: &mut LGraph, dummy: NodeId, add_unnecessary_bend_points: bool) -> Result<()> {
    let kind = g.node(dummy).kind;
    let NodeKind::LongEdge { origin, .. } = kind else {
        return Err(Error::UnexpectedNodeKind {
            node: dummy,
            expected: "long-edge",
            found: kind.name(),
        });
    };
    let incoming = g.incoming_edges(dummy);
    let outgoing = g.outgoing_edges(dummy);
    if incoming.len() != outgoing.len() {
        return Err(Error::MalformedDummy {
            node: dummy,
            incoming: incoming.len(),
            outgoing: outgoing.len(),
        });
    }

    let bend = add_unnecessary_bend_points.then(|| g.node(dummy).position);
    for (inc, out) in incoming.into_iter().zip(outgoing) {
        let head = g.edge(inc).clone();
        let tail = g.edge(out).clone();

        let mut bend_points = head.bend_points;
        bend_points.extend(bend);
        bend_points.extend(tail.bend_points);
        let junction_points = match (head.junction_points, tail.junction_points) {
            (Some(mut first), Some(second)) => {
                first.extend(second);
                Some(first)
            }
            (first, second) => first.or(second),
        };

        let surviving = if out == origin {
            let source = g.source(inc);
            g.set_source(out, source);
            g.remove_edge(inc);
            out
        } else {
            let target = g.target(out);
            g.set_target(inc, target);
            g.remove_edge(out);
            inc
        };
        let edge = g.edge_mut(surviving);
        edge.bend_points = bend_points;
        edge.junction_points = junction_points;
    }
    Ok(())
}

/// Joins and removes every long-edge dummy in the graph. Returns the number of dummies removed.
pub fn join_long_edges(g: &mut LGraph, add_unnecessary_bend_points: bool) -> Result<usize> {
    let _span = tracing::debug_span!("join_long_edges").entered();

    let dummies: Vec<NodeId> = g
        .layered_nodes()
        .filter(|n| g.node(*n).kind.is_long_edge())
        .collect();
    for dummy in &dummies {
        join_at(g, *dummy, add_unnecessary_bend_points)?;
        g.remove_node(*dummy);
    }
    tracing::debug!(removed = dummies.len(), "joined long edges");
    Ok(dummies.len())
}
