//! Expanding an edge into a chain of long-edge dummies.
//!
//! Used after an edge has been reversed across a wrap: the edge now runs from a node in an early
//! layer to a node further right, and both endpoints may share their layer with the first and
//! last dummy. One dummy is created for every layer from the source's to the target's,
//! inclusive.

use crate::lgraph::{
    EdgeId, IndividualSpacing, LGraph, NodeId, NodeKind, PortConstraints, PortId, PortSide,
};
use crate::{Error, Result};

/// Splits `edge` into a chain of dummies and returns the newly created edges in order.
///
/// The first dummy goes `offset` slots before the end of the source layer, all others are
/// appended to their layer. `edge` itself becomes the first segment. When `edge` is a segment of
/// an existing long-edge chain, the new dummies belong to that chain's origin.
pub fn insert_dummies(
    g: &mut LGraph,
    edge: EdgeId,
    offset: usize,
    additional_spacing: f64,
) -> Result<Vec<EdgeId>> {
    let (Some(src), Some(tgt)) = (g.source_node(edge), g.target_node(edge)) else {
        return Err(Error::DanglingEdge { edge });
    };
    let src_index = layer_index_of(g, src)?;
    let tgt_index = layer_index_of(g, tgt)?;

    let spacing = g.label().spacing;
    let spacing_override = IndividualSpacing {
        edge_node: spacing.edge_node + additional_spacing,
        edge_edge: spacing.edge_edge + additional_spacing,
    };

    let origin = [src, tgt]
        .into_iter()
        .find_map(|n| match g.node(n).kind {
            NodeKind::LongEdge { origin, .. } => Some(origin),
            _ => None,
        })
        .unwrap_or(edge);

    let mut created = Vec::with_capacity(tgt_index.saturating_sub(src_index) + 1);
    let mut current = edge;
    for (k, position) in (src_index..=tgt_index).enumerate() {
        let Some(layer) = g.layer_at(position) else {
            break;
        };
        let (dummy, next) = split_with_dummy(g, current, origin)?;
        g.node_mut(dummy).spacing_override = Some(spacing_override);
        if k == 0 {
            let len = g.layer_nodes(layer).len();
            g.set_layer_at(dummy, layer, len.saturating_sub(offset));
        } else {
            g.set_layer(dummy, Some(layer));
        }
        created.push(next);
        current = next;
    }

    tracing::trace!(%edge, dummies = created.len(), "expanded edge into dummy chain");
    Ok(created)
}

/// Cuts `edge` with a new long-edge dummy that is not assigned to a layer yet.
///
/// `edge` keeps its source and now ends at the dummy's west port; a new edge with the same
/// properties (but no bend or junction points) runs from the dummy's east port to the old
/// target. Returns the dummy and the new edge.
pub(crate) fn split_with_dummy(
    g: &mut LGraph,
    edge: EdgeId,
    origin: EdgeId,
) -> Result<(NodeId, EdgeId)> {
    let Some(target_port) = g.target(edge) else {
        return Err(Error::DanglingEdge { edge });
    };
    let (source, target) = provenance(g, edge, target_port)?;

    let thickness = {
        let e = g.edge_mut(edge);
        if e.thickness < 0.0 {
            e.thickness = 0.0;
        }
        e.thickness
    };
    let port_offset = (thickness / 2.0).floor();

    let dummy = g.add_node(NodeKind::LongEdge {
        origin,
        source,
        target,
    });
    {
        let node = g.node_mut(dummy);
        node.size.height = thickness;
        node.port_constraints = PortConstraints::FixedPos;
    }
    let input = g.add_port(dummy, PortSide::West);
    g.port_mut(input).position.y = port_offset;
    let output = g.add_port(dummy, PortSide::East);
    g.port_mut(output).position.y = port_offset;

    g.set_target(edge, Some(input));
    let props = g.edge(edge).copy_properties();
    let next = g.add_edge_with(output, target_port, props);
    Ok((dummy, next))
}

/// Long-edge source and target for a dummy entered through `incoming`: inherited from a
/// long-edge dummy the edge comes from, otherwise the edge's own source and the chain's final
/// target.
fn provenance(g: &LGraph, incoming: EdgeId, final_target: PortId) -> Result<(PortId, PortId)> {
    let Some(src_port) = g.source(incoming) else {
        return Err(Error::DanglingEdge { edge: incoming });
    };
    match g.node(g.port_node(src_port)).kind {
        NodeKind::LongEdge { source, target, .. } => Ok((source, target)),
        _ => Ok((src_port, final_target)),
    }
}

pub(crate) fn layer_index_of(g: &LGraph, node: NodeId) -> Result<usize> {
    g.node_layer(node)
        .and_then(|l| g.layer_index(l))
        .ok_or(Error::DetachedNode { node })
}
