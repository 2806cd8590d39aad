//! Score components.

use std::collections::BTreeSet;

use serde::Serialize;

use weave_core::config::SimilarityConfig;
use weave_core::models::Pattern;
use weave_core::FxHashSet;

/// The three weighted terms of one pair's score.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SimilarityBreakdown {
    /// Shared-neighbor overlap before weighting.
    pub relational: f64,
    /// Tag Jaccard before weighting.
    pub tags: f64,
    /// Domain bonus actually applied (0 or the configured bonus).
    pub domain: f64,
    pub total: f64,
}

impl SimilarityBreakdown {
    pub(crate) fn compute(
        config: &SimilarityConfig,
        (a, a_neighbors): (&Pattern, &FxHashSet<usize>),
        (b, b_neighbors): (&Pattern, &FxHashSet<usize>),
        (ai, bi): (usize, usize),
    ) -> Self {
        let relational = relational_overlap(a_neighbors, b_neighbors, ai, bi, config.normalize_relational);
        let tags = tag_jaccard(&a.tags, &b.tags);
        let domain = match (&a.domain, &b.domain) {
            (Some(x), Some(y)) if x == y => config.domain_bonus,
            _ => 0.0,
        };
        let total = config.relational_weight * relational + config.tag_weight * tags + domain;
        Self {
            relational,
            tags,
            domain,
            total,
        }
    }
}

/// Shared neighbors of `a` and `b`, not counting either endpoint.
/// Jaccard of the two neighbor sets when `normalize`, else the raw count.
pub(crate) fn relational_overlap(
    a_neighbors: &FxHashSet<usize>,
    b_neighbors: &FxHashSet<usize>,
    a: usize,
    b: usize,
    normalize: bool,
) -> f64 {
    let mut shared = 0usize;
    let mut a_only = 0usize;
    for n in a_neighbors.iter().filter(|&&n| n != a && n != b) {
        if b_neighbors.contains(n) {
            shared += 1;
        } else {
            a_only += 1;
        }
    }
    if !normalize {
        return shared as f64;
    }
    let b_count = b_neighbors.iter().filter(|&&n| n != a && n != b).count();
    let union = a_only + b_count;
    if union == 0 {
        return 0.0;
    }
    shared as f64 / union as f64
}

/// Jaccard index of two tag sets; 0 when both are empty.
pub fn tag_jaccard(a: &BTreeSet<String>, b: &BTreeSet<String>) -> f64 {
    let intersection = a.intersection(b).count();
    let union = a.len() + b.len() - intersection;
    if union == 0 {
        return 0.0;
    }
    intersection as f64 / union as f64
}
