//! Renderer-facing similarity table.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use weave_core::constants::PAIR_KEY_SEPARATOR;
use weave_core::{PatternId, WeaveResult};

use crate::cluster::ClusterOrder;
use crate::matrix::SimilarityMatrix;

/// Scores keyed by `"idA:idB"` with `idA < idB`, plus the cluster order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SimilarityExport {
    pub scores: BTreeMap<String, f64>,
    pub order: Vec<PatternId>,
}

impl SimilarityExport {
    pub(crate) fn build(matrix: &SimilarityMatrix, order: ClusterOrder) -> Self {
        let scores = matrix
            .pairs()
            .map(|(a, b, score)| (pair_key(a, b), score))
            .collect();
        Self {
            scores,
            order: order.order,
        }
    }

    /// Symmetric lookup by either id order.
    pub fn score(&self, a: &PatternId, b: &PatternId) -> Option<f64> {
        self.scores.get(&pair_key(a, b)).copied()
    }

    pub fn to_json(&self) -> WeaveResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// Unordered pair key; the smaller id always comes first.
pub fn pair_key(a: &PatternId, b: &PatternId) -> String {
    let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
    format!("{lo}{PAIR_KEY_SEPARATOR}{hi}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pair_key_is_order_independent() {
        let a = PatternId::from("alpha");
        let b = PatternId::from("beta");
        assert_eq!(pair_key(&a, &b), "alpha:beta");
        assert_eq!(pair_key(&b, &a), "alpha:beta");
    }
}
