//! # weave-store
//!
//! Authoritative, validated storage for patterns and relationships.
//!
//! - `registry`: `PatternRegistry`, insertion-ordered, kind-immutable
//! - `relationships`: `RelationshipStore`, reference/range validation, bulk import
//! - `catalog`: both stores behind one `RwLock`, cascade on removal, snapshots
//! - `import`: `DomainDefinition` ingestion
//! - `report`: import and removal reports

pub mod catalog;
pub mod import;
pub mod registry;
pub mod relationships;
pub mod report;

pub use catalog::{Catalog, CatalogState};
pub use registry::{PatternFilter, PatternListing, PatternRegistry};
pub use relationships::{RelationshipListing, RelationshipQuery, RelationshipStore};
pub use report::{DomainImportReport, ImportReport, Rejection, RemovalReport};
