use super::CutIndexCalculator;
use crate::stats::GraphStats;

/// Cuts given by the user.
#[derive(Debug, Clone, Default)]
pub struct ManualCutIndexCalculator {
    cuts: Vec<usize>,
}

impl ManualCutIndexCalculator {
    pub fn new(mut cuts: Vec<usize>) -> Self {
        cuts.sort_unstable();
        cuts.dedup();
        Self { cuts }
    }
}

impl CutIndexCalculator for ManualCutIndexCalculator {
    fn cut_indexes(&self, _stats: &GraphStats<'_>) -> Vec<usize> {
        self.cuts.clone()
    }
}
