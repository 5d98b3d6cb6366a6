//! Local search that moves cuts to boundaries crossed by fewer edges.
//!
//! Each round considers every boundary once. A boundary is scored against the nearest cut that
//! has not been fixed yet: `open edges across the boundary + distance^penalty`. The best
//! (cut, boundary) pair of the round is fixed, and the distance it moved is applied to all
//! still-open neighbours on both sides so rows keep their lengths. After as many rounds as there
//! are cuts, every cut is fixed.

use crate::lgraph::{EdgeId, LGraph};
use crate::{Error, Result};
use rustc_hash::FxBuildHasher;

type HashSet<T> = hashbrown::HashSet<T, FxBuildHasher>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CutState {
    Open,
    Assigned,
}

#[derive(Debug, Clone)]
struct Cut {
    index: i64,
    tentative: i64,
    prev: Option<usize>,
    next: Option<usize>,
    state: CutState,
}

#[derive(Debug, Clone)]
struct CutChain {
    cuts: Vec<Cut>,
}

impl CutChain {
    fn new(indexes: &[usize]) -> Self {
        let n = indexes.len();
        let cuts = indexes
            .iter()
            .enumerate()
            .map(|(i, idx)| Cut {
                index: *idx as i64,
                tentative: *idx as i64,
                prev: i.checked_sub(1),
                next: (i + 1 < n).then_some(i + 1),
                state: CutState::Open,
            })
            .collect();
        Self { cuts }
    }

    /// `cut` itself if still open, otherwise the first open cut after it.
    fn self_or_next(&self, cut: usize) -> Option<usize> {
        let mut current = Some(cut);
        while let Some(c) = current {
            if self.cuts[c].state == CutState::Open {
                return Some(c);
            }
            current = self.cuts[c].next;
        }
        None
    }

    /// The first open cut after `cut`.
    fn next_open(&self, cut: usize) -> Option<usize> {
        self.cuts[cut].next.and_then(|n| self.self_or_next(n))
    }

    fn assign(&mut self, cut: usize, index: i64) -> Result<()> {
        if self.cuts[cut].state == CutState::Assigned {
            return Err(Error::CutAlreadyAssigned { index: cut });
        }
        self.cuts[cut].tentative = index;
        self.cuts[cut].state = CutState::Assigned;
        self.propagate_offset(cut)
    }

    fn propagate_offset(&mut self, cut: usize) -> Result<()> {
        if self.cuts[cut].state != CutState::Assigned {
            return Err(Error::CutNotAssigned { index: cut });
        }
        let delta = self.cuts[cut].tentative - self.cuts[cut].index;
        self.cuts[cut].index += delta;

        let mut prev = self.cuts[cut].prev;
        while let Some(p) = prev {
            if self.cuts[p].state == CutState::Assigned {
                break;
            }
            self.cuts[p].index += delta;
            prev = self.cuts[p].prev;
        }
        let mut next = self.cuts[cut].next;
        while let Some(n) = next {
            if self.cuts[n].state == CutState::Assigned {
                break;
            }
            self.cuts[n].index += delta;
            next = self.cuts[n].next;
        }
        Ok(())
    }
}

/// Number of edges open across each boundary; `spans[i]` counts edges leaving layers before `i`
/// and entering layer `i` or later. The result has `layer count + 1` entries.
pub fn edge_spans(g: &LGraph) -> Vec<usize> {
    let mut spans = vec![0; g.layer_count() + 1];
    let mut open: HashSet<EdgeId> = HashSet::default();
    for (i, layer) in g.layers().iter().enumerate() {
        spans[i] = open.len();
        for n in g.layer_nodes(*layer) {
            open.extend(g.outgoing_edges(*n));
        }
        for n in g.layer_nodes(*layer) {
            for e in g.incoming_edges(*n) {
                open.remove(&e);
            }
        }
    }
    spans
}

/// Returns the improved cuts, sorted. The number of cuts does not change.
pub fn improve_cuts(g: &LGraph, cuts: &[usize], distance_penalty: f64) -> Result<Vec<usize>> {
    if cuts.is_empty() {
        return Ok(Vec::new());
    }
    let layers = g.layer_count();
    if layers <= 1 {
        // No boundary to move to.
        let mut unchanged = cuts.to_vec();
        unchanged.sort_unstable();
        return Ok(unchanged);
    }

    let mut chain = CutChain::new(cuts);
    let spans = edge_spans(g);
    let mut improved = Vec::with_capacity(cuts.len());

    for _ in 0..cuts.len() {
        let mut left: Option<usize> = None;
        let mut right = chain.self_or_next(0);
        let mut best: Option<(usize, usize)> = None;
        let mut best_score = f64::INFINITY;

        for idx in 1..layers {
            let at = idx as i64;
            let (hit, dist) = match (left, right) {
                (Some(l), Some(r)) => {
                    let l_dist = (at - chain.cuts[l].index).abs();
                    let r_dist = (chain.cuts[r].index - at).abs();
                    if l_dist < r_dist { (l, l_dist) } else { (r, r_dist) }
                }
                (Some(l), None) => (l, (at - chain.cuts[l].index).abs()),
                (None, Some(r)) => (r, (chain.cuts[r].index - at).abs()),
                (None, None) => break,
            };

            let score = spans[idx] as f64 + (dist as f64).powf(distance_penalty);
            if score < best_score {
                best_score = score;
                best = Some((hit, idx));
            }

            if let Some(r) = right {
                if chain.cuts[r].index == at {
                    left = right;
                    right = chain.next_open(r);
                }
            }
        }

        if let Some((cut, idx)) = best {
            improved.push(idx);
            chain.assign(cut, idx as i64)?;
        }
    }

    improved.sort_unstable();
    tracing::debug!(?cuts, ?improved, "improved cut indexes");
    Ok(improved)
}
