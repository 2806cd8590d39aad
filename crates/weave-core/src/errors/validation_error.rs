//! Validation errors raised at every mutating boundary.

use super::error_code::{self, WeaveErrorCode};

/// One variant per rule; `rule()` is the stable name used in import reports.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ValidationError {
    #[error("empty {entity} id")]
    EmptyId { entity: &'static str },

    #[error("unknown pattern kind: {tag}")]
    UnknownKind { tag: String },

    #[error("relationship {id}: strength {value} outside [0, 1]")]
    StrengthOutOfRange { id: String, value: f64 },

    #[error("relationship {id}: confidence {value} outside [0, 1]")]
    ConfidenceOutOfRange { id: String, value: f64 },

    #[error("relationship {id}: anchored in {anchored} dimension(s), at least 2 required")]
    InsufficientAnchors { id: String, anchored: usize },

    #[error("relationship {id}: {field} references unknown pattern {pattern_id}")]
    DanglingReference {
        id: String,
        field: &'static str,
        pattern_id: String,
    },

    #[error("relationship {id}: {field} references {pattern_id} of kind {found}, expected {expected}")]
    KindMismatch {
        id: String,
        field: &'static str,
        pattern_id: String,
        expected: String,
        found: String,
    },

    #[error("field `{field}` is immutable")]
    ImmutableField { field: &'static str },

    #[error("invalid metadata at `{key}`: {reason}")]
    InvalidMetadata { key: String, reason: String },

    #[error("duplicate id in input: {id}")]
    DuplicateInput { id: String },

    #[error("similarity of a pattern with itself is undefined: {id}")]
    SelfComparison { id: String },

    #[error("id {id} contains reserved character `{character}`")]
    ReservedCharacter { id: String, character: char },
}

impl ValidationError {
    /// Stable rule name, used in bulk-import rejection reports.
    pub fn rule(&self) -> &'static str {
        match self {
            Self::EmptyId { .. } => "empty_id",
            Self::UnknownKind { .. } => "unknown_kind",
            Self::StrengthOutOfRange { .. } => "strength_range",
            Self::ConfidenceOutOfRange { .. } => "confidence_range",
            Self::InsufficientAnchors { .. } => "insufficient_anchors",
            Self::DanglingReference { .. } => "dangling_reference",
            Self::KindMismatch { .. } => "kind_mismatch",
            Self::ImmutableField { .. } => "immutable_field",
            Self::InvalidMetadata { .. } => "invalid_metadata",
            Self::DuplicateInput { .. } => "duplicate_input",
            Self::SelfComparison { .. } => "self_comparison",
            Self::ReservedCharacter { .. } => "reserved_character",
        }
    }
}

impl WeaveErrorCode for ValidationError {
    fn error_code(&self) -> &'static str {
        error_code::VALIDATION_ERROR
    }
}
