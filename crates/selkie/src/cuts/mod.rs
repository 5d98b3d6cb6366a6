//! Choosing the layer boundaries to wrap at.
//!
//! A cut index `i` means "start a new row with layer `i`". Calculators propose indexes, the
//! validators in [`validify`] move them onto legal boundaries and [`improve`] shifts them to
//! boundaries crossed by fewer edges.

mod ard;
mod manual;
mod msd;

pub mod improve;
pub mod validify;

pub use ard::{ArdCutIndexHeuristic, ard_row_count};
pub use manual::ManualCutIndexCalculator;
pub use msd::{MsdCutIndexHeuristic, scale_score};

use crate::options::{CuttingStrategy, WrappingOptions};
use crate::stats::GraphStats;

pub trait CutIndexCalculator {
    /// Cut indexes in increasing order.
    fn cut_indexes(&self, stats: &GraphStats<'_>) -> Vec<usize>;

    /// Whether every returned index is already a legal boundary.
    fn guarantee_valid(&self) -> bool {
        false
    }
}

pub fn calculator_for(options: &WrappingOptions) -> Box<dyn CutIndexCalculator> {
    match options.cutting_strategy {
        CuttingStrategy::Manual => Box::new(ManualCutIndexCalculator::new(
            options.manual_cuts.clone().unwrap_or_default(),
        )),
        CuttingStrategy::Ard => Box::new(ArdCutIndexHeuristic),
        CuttingStrategy::Msd => Box::new(MsdCutIndexHeuristic::new(options.msd_freedom)),
    }
}
