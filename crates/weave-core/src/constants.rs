//! Engine-wide constants.

/// Default confidence for relationships that do not state one.
pub const DEFAULT_CONFIDENCE: f64 = 1.0;

/// Minimum number of populated references for a well-formed relationship.
pub const MIN_ANCHORED_DIMENSIONS: usize = 2;

/// Default maximum nesting depth for metadata values.
pub const DEFAULT_MAX_METADATA_DEPTH: usize = 8;

/// Separator used in similarity export keys (`"idA:idB"`).
pub const PAIR_KEY_SEPARATOR: char = ':';

/// Environment variable that overrides the configured log filter.
pub const LOG_ENV_VAR: &str = "WEAVE_LOG";
