//! Errors raised while combining framework instances.

use super::error_code::{self, WeaveErrorCode};

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum CompositionError {
    #[error("pattern {id} has kind {left} in one operand and {right} in the other")]
    KindConflict {
        id: String,
        left: String,
        right: String,
    },

    #[error("hot-swap remap {old} -> {new}: {new} is not among the replacement patterns")]
    UnknownRemapTarget { old: String, new: String },

    #[error("hot-swap remap {old} -> {new}: {old} is not a {dimension} pattern of the instance")]
    UnknownRemapSource {
        old: String,
        new: String,
        dimension: String,
    },

    #[error("replacement pattern {id} has kind {found}, expected {expected}")]
    ReplacementKindMismatch {
        id: String,
        expected: String,
        found: String,
    },
}

impl WeaveErrorCode for CompositionError {
    fn error_code(&self) -> &'static str {
        error_code::COMPOSITION_ERROR
    }
}
