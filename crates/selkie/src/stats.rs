//! Lazily computed size estimates of a layered graph.
//!
//! Widths are measured along the layering direction, heights across it. Both are estimates
//! from node sizes and spacings, good enough to choose where to cut.

use crate::lgraph::{LGraph, LayerId, NodeKind};
use crate::options::WrappingOptions;
use std::cell::OnceCell;

#[derive(Debug)]
pub struct GraphStats<'g> {
    graph: &'g LGraph,
    /// Desired aspect ratio, already adjusted for vertical layouts.
    dar: f64,
    longest_path: usize,
    spacing: f64,
    in_layer_spacing: f64,
    forbidden: Option<Vec<usize>>,
    widths: OnceCell<Vec<f64>>,
    heights: OnceCell<Vec<f64>>,
    cuts_allowed: OnceCell<Vec<bool>>,
}

impl<'g> GraphStats<'g> {
    pub fn new(graph: &'g LGraph, options: &WrappingOptions) -> Self {
        let label = graph.label();
        let ratio = label.aspect_ratio * options.correction_factor;
        let dar = if label.direction.is_horizontal() {
            ratio
        } else {
            1.0 / ratio
        };
        Self {
            graph,
            dar,
            longest_path: graph.layer_count(),
            spacing: label.spacing.node_node_between_layers,
            in_layer_spacing: label.spacing.node_node,
            forbidden: options.forbidden_cut_indices.clone(),
            widths: OnceCell::new(),
            heights: OnceCell::new(),
            cuts_allowed: OnceCell::new(),
        }
    }

    pub fn graph(&self) -> &'g LGraph {
        self.graph
    }

    pub fn dar(&self) -> f64 {
        self.dar
    }

    /// Number of layers.
    pub fn longest_path(&self) -> usize {
        self.longest_path
    }

    pub fn widths(&self) -> &[f64] {
        self.widths.get_or_init(|| {
            self.graph
                .layers()
                .iter()
                .map(|l| self.layer_width(*l))
                .collect()
        })
    }

    pub fn heights(&self) -> &[f64] {
        self.heights.get_or_init(|| {
            self.graph
                .layers()
                .iter()
                .map(|l| self.layer_height(*l))
                .collect()
        })
    }

    pub fn max_width(&self) -> f64 {
        self.widths().iter().copied().fold(0.0, f64::max)
    }

    pub fn sum_width(&self) -> f64 {
        self.widths().iter().sum()
    }

    pub fn max_height(&self) -> f64 {
        self.heights().iter().copied().fold(0.0, f64::max)
    }

    /// Width of the layering the `cuts` would produce: the widest row.
    pub fn approximate_chunk_based_layering_width(&self, cuts: &[usize]) -> f64 {
        if cuts.is_empty() {
            return self.sum_width();
        }
        self.chunks(cuts)
            .map(|(lo, hi)| self.widths()[lo..hi].iter().sum::<f64>())
            .fold(0.0, f64::max)
    }

    /// Height of the layering the `cuts` would produce: the rows' heights stacked. Zero when
    /// there are no cuts.
    pub fn approximate_chunk_based_layering_height(&self, cuts: &[usize]) -> f64 {
        if cuts.is_empty() {
            return 0.0;
        }
        self.chunks(cuts)
            .map(|(lo, hi)| self.heights()[lo..hi].iter().copied().fold(0.0, f64::max))
            .sum()
    }

    fn chunks<'a>(&'a self, cuts: &'a [usize]) -> impl Iterator<Item = (usize, usize)> + 'a {
        let n = self.longest_path;
        let bounds = std::iter::once(0)
            .chain(cuts.iter().map(move |c| (*c).min(n)))
            .chain(std::iter::once(n));
        bounds
            .clone()
            .zip(bounds.skip(1))
            .filter(|(lo, hi)| lo < hi)
    }

    /// Widest node of the layer plus the spacing to the next layer.
    pub fn layer_width(&self, layer: LayerId) -> f64 {
        self.graph
            .layer_nodes(layer)
            .iter()
            .map(|n| {
                let node = self.graph.node(*n);
                node.size.width + node.margin.horizontal() + self.spacing
            })
            .fold(0.0, f64::max)
    }

    /// Stacked node heights of the layer. North/south port dummies feeding into the layer also
    /// count the height of the node they were created for.
    pub fn layer_height(&self, layer: LayerId) -> f64 {
        let g = self.graph;
        let mut height = 0.0;
        for n in g.layer_nodes(layer) {
            let node = g.node(*n);
            height += node.size.height + node.margin.vertical() + self.in_layer_spacing;

            for e in g.incoming_edges(*n) {
                let Some(src) = g.source_node(e) else {
                    continue;
                };
                if let NodeKind::NorthSouthPort { origin } = g.node(src).kind {
                    let origin = g.node(origin);
                    height += origin.size.height + origin.margin.vertical();
                }
            }
        }
        height
    }

    /// Whether the boundary in front of layer `index` may be cut.
    ///
    /// Boundary `0` and boundaries past the last layer never may. Otherwise all edges entering
    /// the layer must connect the same pair of nodes, so rerouting at that boundary is
    /// unambiguous.
    pub fn is_cut_allowed(&self, index: usize) -> bool {
        self.cuts_allowed().get(index).copied().unwrap_or(false)
    }

    pub fn cuts_allowed(&self) -> &[bool] {
        self.cuts_allowed.get_or_init(|| {
            let n = self.longest_path;
            let mut allowed = match &self.forbidden {
                Some(forbidden) => {
                    let mut allowed = vec![true; n];
                    for f in forbidden {
                        if let Some(slot) = allowed.get_mut(*f) {
                            *slot = false;
                        }
                    }
                    allowed
                }
                None => self
                    .graph
                    .layers()
                    .iter()
                    .map(|l| self.single_edge_pair(*l))
                    .collect(),
            };
            if let Some(first) = allowed.first_mut() {
                *first = false;
            }
            allowed
        })
    }

    fn single_edge_pair(&self, layer: LayerId) -> bool {
        let g = self.graph;
        let mut target = None;
        let mut source = None;
        for n in g.layer_nodes(layer) {
            for e in g.incoming_edges(*n) {
                if target.is_some_and(|t| t != *n) {
                    return false;
                }
                target = Some(*n);
                let src = g.source_node(e);
                if source.is_some() && source != src {
                    return false;
                }
                source = src;
            }
        }
        true
    }
}
