use super::{CutIndexCalculator, ard_row_count};
use crate::stats::GraphStats;

/// Max-scale driven cuts.
///
/// Tries every cut count within `freedom` of the ARD estimate, fills rows greedily up to an
/// even share of the total width, and keeps the cut set whose drawing could be scaled up the
/// most when fitted into the desired aspect ratio.
#[derive(Debug, Clone, Copy)]
pub struct MsdCutIndexHeuristic {
    freedom: usize,
}

impl MsdCutIndexHeuristic {
    pub fn new(freedom: usize) -> Self {
        Self { freedom }
    }

    fn greedy_rows(stats: &GraphStats<'_>, cut_count: usize) -> Vec<usize> {
        let widths = stats.widths();
        let threshold = stats.sum_width() / (cut_count + 1) as f64;
        let mut cuts = Vec::with_capacity(cut_count);
        let mut row_width = 0.0;
        for (i, w) in widths.iter().enumerate() {
            row_width += w;
            if row_width >= threshold && cuts.len() < cut_count && i + 1 < widths.len() {
                cuts.push(i + 1);
                row_width = 0.0;
            }
        }
        cuts
    }
}

impl Default for MsdCutIndexHeuristic {
    fn default() -> Self {
        Self::new(1)
    }
}

/// `min(1 / width, (1 / dar) / height)` of the drawing the `cuts` would produce, where width is
/// the widest row and height the sum of the rows' tallest layers. Higher is better.
pub fn scale_score(stats: &GraphStats<'_>, cuts: &[usize]) -> f64 {
    let widths = stats.widths();
    let heights = stats.heights();
    let mut max_width: f64 = 0.0;
    let mut height_sum = 0.0;
    let mut row_width = 0.0;
    let mut row_height: f64 = 0.0;
    let mut next_cut = cuts.iter().copied().peekable();
    for (i, (w, h)) in widths.iter().zip(heights).enumerate() {
        if next_cut.next_if(|c| *c == i).is_some() {
            max_width = max_width.max(row_width);
            height_sum += row_height;
            row_width = 0.0;
            row_height = 0.0;
        }
        row_width += w;
        row_height = row_height.max(*h);
    }
    max_width = max_width.max(row_width);
    height_sum += row_height;

    (1.0 / max_width).min((1.0 / stats.dar()) / height_sum)
}

impl CutIndexCalculator for MsdCutIndexHeuristic {
    fn cut_indexes(&self, stats: &GraphStats<'_>) -> Vec<usize> {
        let layers = stats.longest_path();
        if layers == 0 {
            return Vec::new();
        }
        let estimate = ard_row_count(stats) - 1;
        let lo = estimate.saturating_sub(self.freedom);
        let hi = estimate.saturating_add(self.freedom).min(layers - 1);

        let mut best = Vec::new();
        let mut best_score = f64::NEG_INFINITY;
        for cut_count in lo..=hi {
            let cuts = Self::greedy_rows(stats, cut_count);
            let score = scale_score(stats, &cuts);
            tracing::trace!(cut_count, score, ?cuts, "msd candidate");
            if score > best_score {
                best_score = score;
                best = cuts;
            }
        }
        best
    }
}
