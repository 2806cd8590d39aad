pub mod collections;
pub mod identifiers;
pub mod kind;
pub mod metadata;
