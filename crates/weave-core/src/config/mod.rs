pub mod composition_config;
pub mod observability_config;
pub mod similarity_config;
pub mod store_config;

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::errors::ConfigError;

pub use composition_config::{CompositionConfig, PolicyName};
pub use observability_config::ObservabilityConfig;
pub use similarity_config::SimilarityConfig;
pub use store_config::{CascadeMode, StoreConfig};

/// Top-level configuration aggregating all subsystem configs.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(default)]
pub struct WeaveConfig {
    pub store: StoreConfig,
    pub similarity: SimilarityConfig,
    pub composition: CompositionConfig,
    pub observability: ObservabilityConfig,
}

impl WeaveConfig {
    /// Load config from a TOML string, falling back to defaults for missing fields.
    pub fn from_toml(toml_str: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(toml_str)?;
        config.validate()?;
        Ok(config)
    }

    /// Load config from a TOML file on disk.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(|e| ConfigError::Read {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;
        Self::from_toml(&contents)
    }

    /// Reject values that would break engine invariants.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.store.validate()?;
        self.similarity.validate()?;
        Ok(())
    }
}

pub(crate) fn check_unit_interval(field: &str, value: f64) -> Result<(), ConfigError> {
    if !(0.0..=1.0).contains(&value) {
        return Err(ConfigError::InvalidValue {
            field: field.to_string(),
            message: format!("{value} is outside [0, 1]"),
        });
    }
    Ok(())
}

pub(crate) fn check_non_negative(field: &str, value: f64) -> Result<(), ConfigError> {
    if !value.is_finite() || value < 0.0 {
        return Err(ConfigError::InvalidValue {
            field: field.to_string(),
            message: format!("{value} must be a finite non-negative number"),
        });
    }
    Ok(())
}
