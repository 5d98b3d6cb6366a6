//! Breaking-point insertion.
//!
//! Splitting an edge `e` at a cut looks like this:
//!
//! ```text
//! source --node_start--> start --start_end--> end --e--> target
//! ```
//!
//! The original edge is pushed to the right, so it can be split again at a later cut. Records
//! of the same edge at consecutive cuts are linked into a chain.

use crate::cuts::{calculator_for, improve, validify};
use crate::lgraph::{
    BreakingPoint, EdgeId, LGraph, LayerId, NodeId, NodeKind, PortConstraints, PortId, PortSide,
};
use crate::options::WrappingOptions;
use crate::progress::{ProgressMonitor, begin_phase};
use crate::stats::GraphStats;
use crate::{Error, Result};
use indexmap::IndexSet;
use rustc_hash::FxBuildHasher;

type HashSet<T> = hashbrown::HashSet<T, FxBuildHasher>;
type FxIndexSet<T> = IndexSet<T, FxBuildHasher>;

const PHASE: &str = "breaking point insertion";

/// Chooses the cuts and inserts breaking points for them. Returns the number of distinct edges
/// that were split; `0` leaves the graph untouched.
pub fn run(
    g: &mut LGraph,
    options: &WrappingOptions,
    monitor: &mut dyn ProgressMonitor,
) -> Result<usize> {
    let _span = tracing::debug_span!("breaking_point_insert", layers = g.layer_count()).entered();
    begin_phase(monitor, PHASE)?;

    let cuts = select_cuts(g, options)?;
    if cuts.is_empty() {
        tracing::debug!("no cuts, nothing to insert");
        monitor.done();
        return Ok(0);
    }

    let split = apply_cuts(g, &cuts)?;
    debug_assert!(g.check_layer_indices());
    tracing::debug!(?cuts, split, "inserted breaking points");
    monitor.done();
    Ok(split)
}

/// Cut indexes the inserter would apply to `g`.
pub fn select_cuts(g: &LGraph, options: &WrappingOptions) -> Result<Vec<usize>> {
    let stats = GraphStats::new(g, options);
    let calculator = calculator_for(options);
    let mut cuts = calculator.cut_indexes(&stats);
    tracing::debug!(strategy = ?options.cutting_strategy, ?cuts, "computed cut indexes");

    if options.improve_cuts {
        cuts = improve::improve_cuts(g, &cuts, options.distance_penalty)?;
    }
    if !calculator.guarantee_valid() {
        cuts = validify::validify(options.multi_edge_validify, &stats, &cuts);
    }
    Ok(cuts)
}

/// Inserts two layers and the breaking-point dummies at every cut in `cuts` (sorted). Cuts
/// outside `1..layer count` and repeated cuts are ignored. Returns the number of distinct edges
/// split.
pub fn apply_cuts(g: &mut LGraph, cuts: &[usize]) -> Result<usize> {
    let layers = g.layers().to_vec();
    let mut cuts = cuts.iter().copied().peekable();
    let mut open: FxIndexSet<EdgeId> = FxIndexSet::default();
    let mut already_split: HashSet<EdgeId> = HashSet::default();

    for (idx, layer) in layers.iter().enumerate() {
        for node in g.layer_nodes(*layer).to_vec() {
            open.extend(g.outgoing_edges(node));
            for e in g.incoming_edges(node) {
                open.shift_remove(&e);
            }
        }

        while cuts.next_if(|c| *c <= idx).is_some() {}
        if idx + 1 >= layers.len() {
            break;
        }
        if cuts.next_if_eq(&(idx + 1)).is_none() {
            continue;
        }
        let Some(position) = g.layer_index(*layer) else {
            continue;
        };

        let start_layer = g.insert_layer(position + 1);
        let end_layer = g.insert_layer(position + 2);

        for edge in open.iter().copied().collect::<Vec<_>>() {
            already_split.insert(edge);
            split_edge(g, edge, start_layer, end_layer)?;
        }
        tracing::trace!(cut = idx + 1, edges = open.len(), "applied cut");
    }

    Ok(already_split.len())
}

fn split_edge(g: &mut LGraph, edge: EdgeId, start_layer: LayerId, end_layer: LayerId) -> Result<()> {
    let Some(source) = g.source(edge) else {
        return Err(Error::DanglingEdge { edge });
    };

    let (start, start_in, start_out) = add_marker(g, start_layer);
    let (end, end_in, end_out) = add_marker(g, end_layer);

    let node_start_edge = g.add_edge(source, start_in);
    let start_end_edge = g.add_edge(start_out, end_in);
    g.set_source(edge, Some(end_out));

    let mut record = BreakingPoint::new(start, end, node_start_edge, start_end_edge, edge);
    let prev = g.port_node(source);
    record.prev = g.node(prev).kind.breaking_point();
    let id = g.add_breaking_point(record);
    if let Some(prev) = g.breaking_point(id).prev {
        g.breaking_point_mut(prev).next = Some(id);
    }
    g.node_mut(start).kind = NodeKind::BreakingPoint(id);
    g.node_mut(end).kind = NodeKind::BreakingPoint(id);

    tracing::trace!(%edge, record = %id, "split edge at cut");
    Ok(())
}

fn add_marker(g: &mut LGraph, layer: LayerId) -> (NodeId, PortId, PortId) {
    let marker = g.add_node(NodeKind::Normal);
    g.node_mut(marker).port_constraints = PortConstraints::FixedSide;
    g.set_layer(marker, Some(layer));
    let input = g.add_port(marker, PortSide::West);
    let output = g.add_port(marker, PortSide::East);
    (marker, input, output)
}
