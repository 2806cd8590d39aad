use std::fmt;

use super::error_code::{self, WeaveErrorCode};
use super::{CompositionError, ConfigError, ValidationError};

/// Which kind of entity an id-level error refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityKind {
    Pattern,
    Relationship,
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Pattern => f.write_str("pattern"),
            Self::Relationship => f.write_str("relationship"),
        }
    }
}

/// Top-level error type for the Weave engine.
/// All subsystem errors convert into this via `From` impls.
#[derive(Debug, thiserror::Error)]
pub enum WeaveError {
    #[error("duplicate {entity} id: {id}")]
    DuplicateId { entity: EntityKind, id: String },

    #[error("{entity} not found: {id}")]
    NotFound { entity: EntityKind, id: String },

    #[error("validation error: {0}")]
    Validation(#[from] ValidationError),

    #[error("composition error: {0}")]
    Composition(#[from] CompositionError),

    #[error("config error: {0}")]
    Config(#[from] ConfigError),

    #[error("concurrency error: {0}")]
    Concurrency(String),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl WeaveError {
    pub fn duplicate_pattern(id: impl fmt::Display) -> Self {
        Self::DuplicateId {
            entity: EntityKind::Pattern,
            id: id.to_string(),
        }
    }

    pub fn duplicate_relationship(id: impl fmt::Display) -> Self {
        Self::DuplicateId {
            entity: EntityKind::Relationship,
            id: id.to_string(),
        }
    }

    pub fn pattern_not_found(id: impl fmt::Display) -> Self {
        Self::NotFound {
            entity: EntityKind::Pattern,
            id: id.to_string(),
        }
    }

    pub fn relationship_not_found(id: impl fmt::Display) -> Self {
        Self::NotFound {
            entity: EntityKind::Relationship,
            id: id.to_string(),
        }
    }

    /// Stable rule name for reporting; validation errors expose their own rule.
    pub fn rule(&self) -> &'static str {
        match self {
            Self::DuplicateId { .. } => "duplicate_id",
            Self::NotFound { .. } => "not_found",
            Self::Validation(e) => e.rule(),
            Self::Composition(_) => "composition",
            Self::Config(_) => "config",
            Self::Concurrency(_) => "concurrency",
            Self::Serialization(_) => "serialization",
        }
    }
}

impl WeaveErrorCode for WeaveError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::DuplicateId { .. } => error_code::DUPLICATE_ID,
            Self::NotFound { .. } => error_code::NOT_FOUND,
            Self::Validation(e) => e.error_code(),
            Self::Composition(e) => e.error_code(),
            Self::Config(e) => e.error_code(),
            Self::Concurrency(_) => error_code::CONCURRENCY_ERROR,
            Self::Serialization(_) => error_code::SERIALIZATION_ERROR,
        }
    }
}

/// Convenience type alias.
pub type WeaveResult<T> = Result<T, WeaveError>;
