//! Wrapping configuration.
//!
//! Options deserialize from camelCase JSON with every field optional, e.g.
//! `{"strategy": "MULTI_EDGE", "cuttingStrategy": "MANUAL", "manualCuts": [3]}`.

use crate::Result;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum WrappingStrategy {
    #[default]
    Off,
    /// Path-like graphs where every boundary is crossed by a single edge.
    SingleEdge,
    /// General graphs, using breaking-point dummies.
    MultiEdge,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CuttingStrategy {
    Manual,
    /// Aspect-ratio driven.
    Ard,
    /// Max-scale driven.
    #[default]
    Msd,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ValidifyStrategy {
    No,
    #[default]
    Greedy,
    LookBack,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct WrappingOptions {
    pub strategy: WrappingStrategy,
    pub cutting_strategy: CuttingStrategy,
    /// Cut indexes used by [`CuttingStrategy::Manual`].
    pub manual_cuts: Option<Vec<usize>>,
    /// How many row counts around the ARD estimate the MSD heuristic evaluates on each side.
    pub msd_freedom: usize,
    /// Multiplied into the graph's aspect ratio before cut indexes are computed.
    pub correction_factor: f64,
    /// Extra edge spacing around dummies of wrapped edges.
    pub additional_edge_spacing: f64,
    pub path_like_validify: ValidifyStrategy,
    pub multi_edge_validify: ValidifyStrategy,
    /// When set, replaces the built-in legality check: every boundary except `0` and the
    /// listed ones may be cut.
    pub forbidden_cut_indices: Option<Vec<usize>>,
    pub improve_cuts: bool,
    /// Exponent applied to the distance a cut is moved by during cut improvement.
    pub distance_penalty: f64,
    pub improve_wrapped_edges: bool,
}

impl Default for WrappingOptions {
    fn default() -> Self {
        Self {
            strategy: WrappingStrategy::Off,
            cutting_strategy: CuttingStrategy::Msd,
            manual_cuts: None,
            msd_freedom: 1,
            correction_factor: 1.0,
            additional_edge_spacing: 10.0,
            path_like_validify: ValidifyStrategy::Greedy,
            multi_edge_validify: ValidifyStrategy::No,
            forbidden_cut_indices: None,
            improve_cuts: true,
            distance_penalty: 2.0,
            improve_wrapped_edges: true,
        }
    }
}

impl WrappingOptions {
    pub fn from_json(text: &str) -> Result<Self> {
        Ok(serde_json::from_str(text)?)
    }

    pub fn with_strategy(mut self, strategy: WrappingStrategy) -> Self {
        self.strategy = strategy;
        self
    }

    /// Switches to [`CuttingStrategy::Manual`] with the given cuts.
    pub fn with_manual_cuts(mut self, cuts: Vec<usize>) -> Self {
        self.cutting_strategy = CuttingStrategy::Manual;
        self.manual_cuts = Some(cuts);
        self
    }
}
