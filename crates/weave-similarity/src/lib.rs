//! # weave-similarity
//!
//! Pairwise similarity between patterns and a greedy cluster ordering for
//! visual layout.
//!
//! A score combines three terms:
//! - shared neighbors in the relationship graph (above a strength floor),
//! - the Jaccard index of the two tag sets,
//! - a fixed bonus when both patterns carry the same domain.
//!
//! Scores are symmetric and never defined for a pattern against itself.

pub mod cluster;
pub mod engine;
pub mod export;
pub mod graph;
pub mod matrix;
pub mod score;

pub use cluster::{ClusterOrder, ClusterStep};
pub use engine::SimilarityEngine;
pub use export::{pair_key, SimilarityExport};
pub use graph::NeighborGraph;
pub use matrix::SimilarityMatrix;
pub use score::{tag_jaccard, SimilarityBreakdown};
