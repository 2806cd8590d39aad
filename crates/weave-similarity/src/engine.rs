//! Similarity engine over an immutable pattern set.

use std::collections::BTreeMap;

use tracing::debug;

use weave_core::config::SimilarityConfig;
use weave_core::constants::{DEFAULT_MAX_METADATA_DEPTH, PAIR_KEY_SEPARATOR};
use weave_core::models::{FrameworkInstance, Pattern, Relationship};
use weave_core::{FxHashSet, PatternId, ValidationError, WeaveError, WeaveResult};

use crate::cluster::{greedy_chain, ClusterOrder};
use crate::export::SimilarityExport;
use crate::graph::NeighborGraph;
use crate::matrix::SimilarityMatrix;
use crate::score::SimilarityBreakdown;

/// Scores pattern pairs by shared neighbors, shared tags, and domain.
///
/// Patterns are held in id order; position `i` everywhere below is the
/// `i`-th smallest id. Immutable after construction and `Send + Sync`.
pub struct SimilarityEngine {
    config: SimilarityConfig,
    patterns: Vec<Pattern>,
    positions: BTreeMap<PatternId, usize>,
    graph: NeighborGraph,
    neighbors: Vec<FxHashSet<usize>>,
}

impl SimilarityEngine {
    /// Build an engine over `patterns`.
    ///
    /// Pattern ids must be unique and must not contain the export's pair-key
    /// separator. Relationships that are malformed, or whose references do not
    /// resolve to a supplied pattern of the matching kind, are skipped and add
    /// no neighbor links.
    pub fn new<P, R>(patterns: P, relationships: R, config: SimilarityConfig) -> WeaveResult<Self>
    where
        P: IntoIterator<Item = Pattern>,
        R: IntoIterator<Item = Relationship>,
    {
        config.validate()?;

        let mut by_id = BTreeMap::new();
        for pattern in patterns {
            check_pair_key_safe(&pattern.id)?;
            if by_id.contains_key(&pattern.id) {
                return Err(ValidationError::DuplicateInput {
                    id: pattern.id.to_string(),
                }
                .into());
            }
            by_id.insert(pattern.id.clone(), pattern);
        }
        let relationships: Vec<Relationship> = relationships.into_iter().collect();
        Ok(Self::assemble(by_id.into_values().collect(), &relationships, config))
    }

    /// Engine over a snapshot's patterns and relationships.
    pub fn from_instance(instance: &FrameworkInstance, config: SimilarityConfig) -> WeaveResult<Self> {
        config.validate()?;
        for id in instance.pattern_map().keys() {
            check_pair_key_safe(id)?;
        }
        let patterns = instance.patterns().cloned().collect();
        let relationships: Vec<Relationship> = instance.relationships().cloned().collect();
        Ok(Self::assemble(patterns, &relationships, config))
    }

    fn assemble(patterns: Vec<Pattern>, relationships: &[Relationship], config: SimilarityConfig) -> Self {
        let ids: Vec<PatternId> = patterns.iter().map(|p| p.id.clone()).collect();
        let kind_of = |id: &PatternId| {
            ids.binary_search(id)
                .ok()
                .map(|i| patterns[i].kind())
        };
        let usable: Vec<&Relationship> = relationships
            .iter()
            .filter(|r| {
                r.validate_shape(DEFAULT_MAX_METADATA_DEPTH).is_ok() && r.check_references(&kind_of).is_ok()
            })
            .collect();
        if usable.len() < relationships.len() {
            debug!(
                skipped = relationships.len() - usable.len(),
                "malformed or unresolved relationships skipped"
            );
        }
        let graph = NeighborGraph::build(&ids, usable, config.strength_floor);
        let neighbors = graph.neighbor_sets();
        let positions = ids.into_iter().enumerate().map(|(i, id)| (id, i)).collect();
        debug!(
            patterns = patterns.len(),
            relationships = relationships.len(),
            edges = graph.edge_count(),
            "similarity engine built"
        );
        Self {
            config,
            patterns,
            positions,
            graph,
            neighbors,
        }
    }

    pub fn config(&self) -> &SimilarityConfig {
        &self.config
    }

    pub fn graph(&self) -> &NeighborGraph {
        &self.graph
    }

    pub fn len(&self) -> usize {
        self.patterns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }

    /// Pattern ids in ascending order.
    pub fn ids(&self) -> impl Iterator<Item = &PatternId> + '_ {
        self.patterns.iter().map(|p| &p.id)
    }

    pub fn similarity(&self, a: &PatternId, b: &PatternId) -> WeaveResult<f64> {
        Ok(self.breakdown(a, b)?.total)
    }

    /// Per-component scores for one pair.
    pub fn breakdown(&self, a: &PatternId, b: &PatternId) -> WeaveResult<SimilarityBreakdown> {
        let (i, j) = self.pair(a, b)?;
        Ok(self.score_at(i, j))
    }

    fn pair(&self, a: &PatternId, b: &PatternId) -> WeaveResult<(usize, usize)> {
        if a == b {
            return Err(ValidationError::SelfComparison { id: a.to_string() }.into());
        }
        let i = self.position(a)?;
        let j = self.position(b)?;
        Ok((i, j))
    }

    fn position(&self, id: &PatternId) -> WeaveResult<usize> {
        self.positions
            .get(id)
            .copied()
            .ok_or_else(|| WeaveError::pattern_not_found(id))
    }

    fn score_at(&self, i: usize, j: usize) -> SimilarityBreakdown {
        SimilarityBreakdown::compute(
            &self.config,
            (&self.patterns[i], &self.neighbors[i]),
            (&self.patterns[j], &self.neighbors[j]),
            (i, j),
        )
    }

    /// Every unordered pair, computed in parallel.
    pub fn matrix(&self) -> SimilarityMatrix {
        let ids: Vec<PatternId> = self.ids().cloned().collect();
        let matrix = SimilarityMatrix::compute(ids, |i, j| self.score_at(i, j).total);
        debug!(patterns = matrix.len(), "similarity matrix computed");
        matrix
    }

    /// Greedy order over every pattern. See [`crate::cluster`].
    pub fn cluster_order(&self) -> ClusterOrder {
        self.cluster_order_in(&self.matrix())
    }

    /// Greedy order over a subset of patterns. Duplicate ids are rejected.
    pub fn cluster_order_of<'a, I>(&self, ids: I) -> WeaveResult<ClusterOrder>
    where
        I: IntoIterator<Item = &'a PatternId>,
    {
        let matrix = self.matrix();
        let mut members = Vec::new();
        let mut seen = FxHashSet::default();
        for id in ids {
            if !seen.insert(id.clone()) {
                return Err(ValidationError::DuplicateInput { id: id.to_string() }.into());
            }
            let position = matrix.position(id).ok_or_else(|| WeaveError::pattern_not_found(id))?;
            members.push(position);
        }
        members.sort_unstable();
        Ok(greedy_chain(&matrix, &members))
    }

    fn cluster_order_in(&self, matrix: &SimilarityMatrix) -> ClusterOrder {
        let members: Vec<usize> = (0..matrix.len()).collect();
        greedy_chain(matrix, &members)
    }

    /// Scores and order for the renderer.
    pub fn export(&self) -> SimilarityExport {
        let matrix = self.matrix();
        let order = self.cluster_order_in(&matrix);
        SimilarityExport::build(&matrix, order)
    }
}

/// Export keys join two ids with the separator, so it may not appear in one.
fn check_pair_key_safe(id: &PatternId) -> Result<(), ValidationError> {
    if id.as_str().contains(PAIR_KEY_SEPARATOR) {
        return Err(ValidationError::ReservedCharacter {
            id: id.to_string(),
            character: PAIR_KEY_SEPARATOR,
        });
    }
    Ok(())
}
