//! Similarity scoring configuration.

use serde::{Deserialize, Serialize};

use crate::errors::ConfigError;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct SimilarityConfig {
    /// Weight of the shared-neighbor component.
    pub relational_weight: f64,
    /// Weight of the tag Jaccard component.
    pub tag_weight: f64,
    /// Fixed additive bonus when both patterns carry the same domain.
    pub domain_bonus: f64,
    /// Relationships at or below this strength do not link neighbors.
    pub strength_floor: f64,
    /// Divide shared neighbors by the neighbor union (Jaccard) instead of
    /// using the raw count.
    pub normalize_relational: bool,
}

impl Default for SimilarityConfig {
    fn default() -> Self {
        Self {
            relational_weight: 0.5,
            tag_weight: 0.3,
            domain_bonus: 0.2,
            strength_floor: 0.0,
            normalize_relational: true,
        }
    }
}

impl SimilarityConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        super::check_non_negative("similarity.relational_weight", self.relational_weight)?;
        super::check_non_negative("similarity.tag_weight", self.tag_weight)?;
        super::check_non_negative("similarity.domain_bonus", self.domain_bonus)?;
        super::check_unit_interval("similarity.strength_floor", self.strength_floor)
    }
}
