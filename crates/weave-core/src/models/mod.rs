mod framework;
mod pattern;
mod records;
mod relationship;

pub use framework::FrameworkInstance;
pub use pattern::{Pattern, PatternUpdate};
pub use records::{DomainDefinition, FrameworkExport, PatternRecord, RelationshipRecord};
pub use relationship::Relationship;
