use super::CutIndexCalculator;
use crate::stats::GraphStats;

/// Aspect-ratio driven cuts: pick a row count from the desired aspect ratio and cut the layers
/// into rows with the same number of layers.
#[derive(Debug, Clone, Copy, Default)]
pub struct ArdCutIndexHeuristic;

/// Row count that brings the drawing closest to the desired aspect ratio, in
/// `1..=layer count` (`1` for an empty graph).
pub fn ard_row_count(stats: &GraphStats<'_>) -> usize {
    let layers = stats.longest_path().max(1);
    let rows = (stats.sum_width() / (stats.dar() * stats.max_height()))
        .sqrt()
        .round();
    // NaN (empty or zero-sized graphs) saturates to 0, infinity to usize::MAX.
    (rows as usize).clamp(1, layers)
}

impl CutIndexCalculator for ArdCutIndexHeuristic {
    fn cut_indexes(&self, stats: &GraphStats<'_>) -> Vec<usize> {
        let layers = stats.longest_path();
        if layers == 0 {
            return Vec::new();
        }
        let rows = ard_row_count(stats);
        (1..rows)
            .map(|i| ((i * layers) as f64 / rows as f64).round() as usize)
            .collect()
    }
}
