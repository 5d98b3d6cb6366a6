//! Moving proposed cuts onto legal boundaries.
//!
//! Both validators keep a running offset: once a cut had to move by `k`, every later cut is
//! shifted by `k` as well so the rows keep their relative lengths.

use crate::options::ValidifyStrategy;
use crate::stats::GraphStats;

pub fn validify(strategy: ValidifyStrategy, stats: &GraphStats<'_>, cuts: &[usize]) -> Vec<usize> {
    match strategy {
        ValidifyStrategy::No => cuts.to_vec(),
        ValidifyStrategy::Greedy => greedy(stats, cuts),
        ValidifyStrategy::LookBack => look_back(stats, cuts),
    }
}

/// Advances every cut to the next legal boundary. The first cut that runs out of layers ends
/// validation; it and all later cuts are dropped.
pub fn greedy(stats: &GraphStats<'_>, cuts: &[usize]) -> Vec<usize> {
    let layers = stats.longest_path();
    let mut valid = Vec::with_capacity(cuts.len());
    let mut offset = 0;
    for cut in cuts {
        let mut cut = cut + offset;
        while cut < layers && !stats.is_cut_allowed(cut) {
            cut += 1;
            offset += 1;
        }
        if cut >= layers {
            break;
        }
        valid.push(cut);
    }
    valid
}

/// Snaps every cut to the closest legal boundary in either direction, preferring the higher
/// one on ties. A boundary is used at most once; cuts that would land on or before an already
/// chosen boundary are skipped.
pub fn look_back(stats: &GraphStats<'_>, cuts: &[usize]) -> Vec<usize> {
    if cuts.is_empty() {
        return Vec::new();
    }

    let mut legal = vec![i64::MIN];
    legal.extend(
        (1..stats.longest_path())
            .filter(|i| stats.is_cut_allowed(*i))
            .map(|i| i as i64),
    );
    if legal.len() == 1 {
        return Vec::new();
    }
    legal.push(i64::MAX);

    snap_to_legal(cuts, &legal)
}

/// `legal` is sorted and bracketed by `i64::MIN` / `i64::MAX` sentinels.
fn snap_to_legal(cuts: &[usize], legal: &[i64]) -> Vec<usize> {
    let mut chosen = Vec::new();
    let mut lower = 0;
    let mut next = 0;
    let mut offset: i64 = 0;

    while lower < legal.len() - 1 && next < cuts.len() {
        let current = cuts[next] as i64 + offset;
        while legal[lower + 1] < current {
            lower += 1;
        }

        let dist_lower = current.saturating_sub(legal[lower]);
        let dist_higher = legal[lower + 1].saturating_sub(current);
        let select = usize::from(dist_lower >= dist_higher);
        let boundary = legal[lower + select];
        if boundary == i64::MIN || boundary == i64::MAX {
            break;
        }

        chosen.push(boundary as usize);
        offset += boundary - current;
        next += 1;
        while next < cuts.len() && cuts[next] as i64 + offset <= boundary {
            next += 1;
        }
        lower += 1 + select;
    }

    chosen
}
