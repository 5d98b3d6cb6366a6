//! Wrapping path-like graphs.
//!
//! When every boundary that may be cut is crossed by edges between a single pair of nodes, no
//! breaking points are needed: the rows after each cut are moved back to the first layers
//! directly, and the edges entering a row's first layer are reversed and expanded into a chain
//! of dummies running back to their source.

use crate::cuts::{calculator_for, validify};
use crate::dummy_chain::insert_dummies;
use crate::lgraph::LGraph;
use crate::options::WrappingOptions;
use crate::progress::{ProgressMonitor, begin_phase};
use crate::stats::GraphStats;
use crate::Result;

const PHASE: &str = "path-like graph wrapping";

pub fn run(
    g: &mut LGraph,
    options: &WrappingOptions,
    monitor: &mut dyn ProgressMonitor,
) -> Result<()> {
    let _span = tracing::debug_span!("path_like_wrap", layers = g.layer_count()).entered();
    begin_phase(monitor, PHASE)?;

    if g.layer_count() == 0 {
        monitor.done();
        return Ok(());
    }

    let cuts = {
        let stats = GraphStats::new(g, options);
        // Wrapping only ever makes the drawing narrower.
        let current_ratio = stats.longest_path() as f64;
        if stats.dar() > current_ratio {
            tracing::debug!(dar = stats.dar(), current_ratio, "graph already narrow enough");
            monitor.done();
            return Ok(());
        }

        let calculator = calculator_for(options);
        let mut cuts = calculator.cut_indexes(&stats);
        if !calculator.guarantee_valid() {
            cuts = validify::validify(options.path_like_validify, &stats, &cuts);
        }
        cuts
    };
    tracing::debug!(?cuts, "path-like cut indexes");

    perform_cuts(g, &cuts, options.additional_edge_spacing)?;
    debug_assert!(g.check_layer_indices());
    monitor.done();
    Ok(())
}

/// Moves the layers of every row after a cut onto the first layers and expands the edges that
/// now point backwards. `cuts` must be sorted; indexes that are never reached are ignored.
pub fn perform_cuts(g: &mut LGraph, cuts: &[usize], additional_spacing: f64) -> Result<()> {
    if cuts.is_empty() {
        return Ok(());
    }

    let layers = g.layers().to_vec();
    let mut cuts = cuts.iter().copied().peekable();
    let mut new_index = 0;

    for (index, layer) in layers.iter().enumerate() {
        while cuts.next_if(|c| *c < index).is_some() {}
        if cuts.next_if_eq(&index).is_some() {
            new_index = 0;
        }

        if index != new_index {
            let destination = layers[new_index];
            for node in g.layer_nodes(*layer).to_vec() {
                g.set_layer(node, Some(destination));
                if new_index != 0 {
                    continue;
                }
                for edge in g.incoming_edges(node) {
                    let mark = g.reverse_edge(edge);
                    g.mark_cyclic(mark);
                    insert_dummies(g, edge, 1, additional_spacing)?;
                }
            }
        }

        new_index += 1;
    }

    let removed = g.remove_empty_layers();
    tracing::debug!(removed, layers = g.layer_count(), "performed path-like cuts");
    Ok(())
}

/// Turns every reversed edge back into its original direction, reversing its bend points along
/// with it. Returns the number of edges restored.
///
/// Runs after routing and before the dummy chains are joined: a wrapped chain whose row starts
/// with a long-edge dummy would otherwise leave that dummy with two outgoing edges.
pub fn restore_reversed_edges(g: &mut LGraph) -> usize {
    let reversed: Vec<_> = g.edges().filter(|e| g.edge(*e).is_reversed()).collect();
    for edge in &reversed {
        g.restore_edge(*edge);
    }
    tracing::debug!(restored = reversed.len(), "restored reversed edges");
    reversed.len()
}
