//! Where the wrapping phases hook into a layered layout run.
//!
//! A layout pipeline calls [`after_layering`], [`after_crossing_minimization`] and
//! [`after_edge_routing`] at the matching points. Each dispatches on
//! [`WrappingOptions::strategy`]; [`WrappingStrategy::Off`] turns all three into no-ops.

use crate::breaking_point::{insert, process, remove};
use crate::lgraph::LGraph;
use crate::long_edge::{join_long_edges, split_long_edges};
use crate::options::{WrappingOptions, WrappingStrategy};
use crate::path_like;
use crate::progress::ProgressMonitor;
use crate::Result;

/// Inserts breaking points and splits the edges that now span several layers.
pub fn after_layering(
    g: &mut LGraph,
    options: &WrappingOptions,
    monitor: &mut dyn ProgressMonitor,
) -> Result<()> {
    let _span = tracing::debug_span!("after_layering", strategy = ?options.strategy).entered();
    match options.strategy {
        WrappingStrategy::MultiEdge => {
            let split = insert::run(g, options, monitor)?;
            if split > 0 {
                split_long_edges(g)?;
            }
        }
        WrappingStrategy::Off | WrappingStrategy::SingleEdge => {}
    }
    Ok(())
}

pub fn after_crossing_minimization(
    g: &mut LGraph,
    options: &WrappingOptions,
    monitor: &mut dyn ProgressMonitor,
) -> Result<()> {
    let _span = tracing::debug_span!("after_crossing_minimization", strategy = ?options.strategy)
        .entered();
    match options.strategy {
        WrappingStrategy::MultiEdge => process::run(g, options, monitor),
        WrappingStrategy::SingleEdge => path_like::run(g, options, monitor),
        WrappingStrategy::Off => Ok(()),
    }
}

/// Joins long-edge dummies back into their edges and, for general graphs, splices out the
/// breaking points. Path-like graphs get their reversed edges restored before the join.
pub fn after_edge_routing(
    g: &mut LGraph,
    options: &WrappingOptions,
    monitor: &mut dyn ProgressMonitor,
) -> Result<()> {
    let _span = tracing::debug_span!("after_edge_routing", strategy = ?options.strategy).entered();
    match options.strategy {
        WrappingStrategy::MultiEdge => {
            join_long_edges(g, false)?;
            remove::run(g, monitor)?;
        }
        WrappingStrategy::SingleEdge => {
            path_like::restore_reversed_edges(g);
            join_long_edges(g, false)?;
        }
        WrappingStrategy::Off => {}
    }
    Ok(())
}

/// Runs both wrapping steps that precede coordinate assignment, for callers that do not reorder
/// nodes in between.
pub fn wrap_layered(
    g: &mut LGraph,
    options: &WrappingOptions,
    monitor: &mut dyn ProgressMonitor,
) -> Result<()> {
    after_layering(g, options, monitor)?;
    after_crossing_minimization(g, options, monitor)
}

/// Alias of [`after_edge_routing`], the counterpart of [`wrap_layered`].
pub fn unwrap_routed(
    g: &mut LGraph,
    options: &WrappingOptions,
    monitor: &mut dyn ProgressMonitor,
) -> Result<()> {
    after_edge_routing(g, options, monitor)
}
