//! Registry and relationship store configuration.

use serde::{Deserialize, Serialize};

use crate::constants::DEFAULT_MAX_METADATA_DEPTH;
use crate::errors::ConfigError;

/// What happens to relationships when a pattern they reference is removed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CascadeMode {
    /// Delete every relationship referencing the removed pattern.
    #[default]
    Strict,
    /// Clear the dangling reference and scale strength by `downrank_factor`.
    /// Relationships left with fewer than two references are still deleted.
    DownRank,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct StoreConfig {
    pub cascade_mode: CascadeMode,
    /// Strength multiplier applied by `CascadeMode::DownRank`. Default: 0.5.
    pub downrank_factor: f64,
    /// Maximum nesting depth of metadata values. Default: 8.
    pub max_metadata_depth: usize,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            cascade_mode: CascadeMode::Strict,
            downrank_factor: 0.5,
            max_metadata_depth: DEFAULT_MAX_METADATA_DEPTH,
        }
    }
}

impl StoreConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        super::check_unit_interval("store.downrank_factor", self.downrank_factor)
    }
}
