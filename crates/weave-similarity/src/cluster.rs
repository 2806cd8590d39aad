//! Greedy cluster ordering.
//!
//! A nearest-neighbor chain: seed with the smallest id, then repeatedly
//! append the unplaced pattern whose best similarity to any placed pattern
//! is highest. This is a heuristic. It guarantees only the local greedy
//! choice at each step, not a globally optimal layout.

use serde::{Deserialize, Serialize};

use weave_core::PatternId;

use crate::matrix::SimilarityMatrix;

/// One appended pattern and the placed pattern it was chosen against.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClusterStep {
    pub pattern: PatternId,
    pub anchor: PatternId,
    pub score: f64,
}

/// The full order plus one step per non-seed pattern.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ClusterOrder {
    pub order: Vec<PatternId>,
    pub steps: Vec<ClusterStep>,
}

impl ClusterOrder {
    pub fn seed(&self) -> Option<&PatternId> {
        self.order.first()
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    pub fn position(&self, id: &PatternId) -> Option<usize> {
        self.order.iter().position(|p| p == id)
    }
}

#[derive(Clone, Copy)]
struct Best {
    score: f64,
    anchor: usize,
}

/// Order the matrix positions in `members` (sorted ascending by id).
pub(crate) fn greedy_chain(matrix: &SimilarityMatrix, members: &[usize]) -> ClusterOrder {
    let Some((&seed, rest)) = members.split_first() else {
        return ClusterOrder::default();
    };

    let mut order = vec![matrix.ids()[seed].clone()];
    let mut steps = Vec::with_capacity(rest.len());

    let mut pending: Vec<(usize, Best)> = rest
        .iter()
        .map(|&m| {
            let score = matrix.at(seed, m).unwrap_or(0.0);
            (m, Best { score, anchor: seed })
        })
        .collect();

    while !pending.is_empty() {
        // `pending` stays in id order, so strict `>` keeps the smallest id on ties.
        let mut pick = 0;
        for (slot, (_, best)) in pending.iter().enumerate().skip(1) {
            if best.score > pending[pick].1.score {
                pick = slot;
            }
        }
        let (placed, best) = pending.remove(pick);

        order.push(matrix.ids()[placed].clone());
        steps.push(ClusterStep {
            pattern: matrix.ids()[placed].clone(),
            anchor: matrix.ids()[best.anchor].clone(),
            score: best.score,
        });

        for (candidate, best) in pending.iter_mut() {
            let score = matrix.at(placed, *candidate).unwrap_or(0.0);
            if score > best.score {
                *best = Best { score, anchor: placed };
            }
        }
    }

    ClusterOrder { order, steps }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn matrix(n: usize, score: impl Fn(usize, usize) -> f64 + Sync) -> SimilarityMatrix {
        let ids = (0..n).map(|i| PatternId::from(format!("p{i}"))).collect();
        SimilarityMatrix::compute(ids, score)
    }

    #[test]
    fn empty_and_single_inputs() {
        let m = matrix(1, |_, _| 0.0);
        assert!(greedy_chain(&m, &[]).is_empty());
        let single = greedy_chain(&m, &[0]);
        assert_eq!(single.order, vec![PatternId::from("p0")]);
        assert!(single.steps.is_empty());
    }

    #[test]
    fn ties_go_to_the_smallest_id() {
        let m = matrix(4, |_, _| 0.5);
        let order = greedy_chain(&m, &[0, 1, 2, 3]);
        let ids: Vec<&str> = order.order.iter().map(PatternId::as_str).collect();
        assert_eq!(ids, ["p0", "p1", "p2", "p3"]);
        assert!(order.steps.iter().all(|s| s.anchor.as_str() == "p0"));
    }

    #[test]
    fn follows_the_strongest_link_from_any_placed_pattern() {
        // p0-p3 strong, p3-p1 strong, p2 weakly tied to everyone.
        let m = matrix(4, |i, j| match (i, j) {
            (0, 3) => 0.9,
            (1, 3) => 0.8,
            _ => 0.1,
        });
        let order = greedy_chain(&m, &[0, 1, 2, 3]);
        let ids: Vec<&str> = order.order.iter().map(PatternId::as_str).collect();
        assert_eq!(ids, ["p0", "p3", "p1", "p2"]);
        assert_eq!(order.steps[1].anchor.as_str(), "p3");
        assert_eq!(order.seed().map(PatternId::as_str), Some("p0"));
    }
}
