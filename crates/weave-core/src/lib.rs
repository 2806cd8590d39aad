//! # weave-core
//!
//! Foundation crate for the Weave pattern engine.
//! Defines the pattern and relationship model, framework snapshots, import
//! records, errors, config, and tracing setup. Every other crate in the
//! workspace depends on this.

pub mod config;
pub mod constants;
pub mod errors;
pub mod models;
pub mod tracing;
pub mod types;

// Re-export the most commonly used types at the crate root.
pub use config::WeaveConfig;
pub use errors::{
    CompositionError, ConfigError, ValidationError, WeaveError, WeaveErrorCode, WeaveResult,
};
pub use models::{
    DomainDefinition, FrameworkExport, FrameworkInstance, Pattern, PatternRecord, PatternUpdate,
    Relationship, RelationshipRecord,
};
pub use types::collections::{FxHashMap, FxHashSet};
pub use types::identifiers::{PatternId, RelationshipId};
pub use types::kind::PatternKind;
pub use types::metadata::{Metadata, MetadataValue};
