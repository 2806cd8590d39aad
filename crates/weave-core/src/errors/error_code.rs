//! Stable machine-readable error codes.
//!
//! Codes are part of the export surface: collaborators match on them, so
//! existing values never change meaning.

pub const DUPLICATE_ID: &str = "DUPLICATE_ID";
pub const NOT_FOUND: &str = "NOT_FOUND";
pub const VALIDATION_ERROR: &str = "VALIDATION_ERROR";
pub const COMPOSITION_ERROR: &str = "COMPOSITION_ERROR";
pub const CONFIG_ERROR: &str = "CONFIG_ERROR";
pub const CONCURRENCY_ERROR: &str = "CONCURRENCY_ERROR";
pub const SERIALIZATION_ERROR: &str = "SERIALIZATION_ERROR";

/// Implemented by every error type in the workspace.
pub trait WeaveErrorCode {
    fn error_code(&self) -> &'static str;
}
