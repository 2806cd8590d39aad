//! Pairwise score matrix.

use rayon::prelude::*;

use weave_core::{FxHashMap, PatternId};

/// Scores for every unordered pair, stored as the strict upper triangle.
#[derive(Debug, Clone)]
pub struct SimilarityMatrix {
    ids: Vec<PatternId>,
    index: FxHashMap<PatternId, usize>,
    /// Row `i` holds pairs `(i, j)` for `j > i`.
    upper: Vec<f64>,
}

impl SimilarityMatrix {
    /// Evaluate `score(i, j)` for all `i < j`, rows split across the rayon pool.
    pub(crate) fn compute<F>(ids: Vec<PatternId>, score: F) -> Self
    where
        F: Fn(usize, usize) -> f64 + Sync,
    {
        let n = ids.len();
        let rows: Vec<Vec<f64>> = (0..n)
            .into_par_iter()
            .map(|i| ((i + 1)..n).map(|j| score(i, j)).collect())
            .collect();
        let upper = rows.into_iter().flatten().collect();
        let index = ids.iter().enumerate().map(|(i, id)| (id.clone(), i)).collect();
        Self { ids, index, upper }
    }

    pub fn ids(&self) -> &[PatternId] {
        &self.ids
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Symmetric lookup. `None` for unknown ids and for `a == b`.
    pub fn get(&self, a: &PatternId, b: &PatternId) -> Option<f64> {
        let i = *self.index.get(a)?;
        let j = *self.index.get(b)?;
        self.at(i, j)
    }

    pub(crate) fn at(&self, i: usize, j: usize) -> Option<f64> {
        if i == j {
            return None;
        }
        let (lo, hi) = if i < j { (i, j) } else { (j, i) };
        let n = self.ids.len();
        // Rows before `lo` hold (n-1) + (n-2) + ... + (n-lo) entries.
        let row_start = lo * (2 * n - lo - 1) / 2;
        self.upper.get(row_start + (hi - lo - 1)).copied()
    }

    pub(crate) fn position(&self, id: &PatternId) -> Option<usize> {
        self.index.get(id).copied()
    }

    /// Every pair `(a, b, score)` with `a` before `b` in id order.
    pub fn pairs(&self) -> impl Iterator<Item = (&PatternId, &PatternId, f64)> + '_ {
        let n = self.ids.len();
        (0..n).flat_map(move |i| {
            ((i + 1)..n).filter_map(move |j| self.at(i, j).map(|s| (&self.ids[i], &self.ids[j], s)))
        })
    }
}
