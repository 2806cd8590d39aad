//! FrameworkInstance: a named, immutable, closed snapshot of patterns and
//! the relationships among them.
//!
//! "Closed" means every relationship reference resolves to a pattern of the
//! matching kind inside the same instance. Both constructors guarantee it, so
//! any instance a caller holds is valid.

use std::collections::{BTreeMap, BTreeSet};

use crate::constants::DEFAULT_MAX_METADATA_DEPTH;
use crate::errors::ValidationError;
use crate::models::records::{FrameworkExport, PatternRecord, RelationshipRecord};
use crate::models::{Pattern, Relationship};
use crate::types::identifiers::{PatternId, RelationshipId};
use crate::types::kind::PatternKind;

#[derive(Debug, Clone)]
pub struct FrameworkInstance {
    name: String,
    patterns: BTreeMap<PatternId, Pattern>,
    relationships: BTreeMap<RelationshipId, Relationship>,
}

impl FrameworkInstance {
    pub fn empty(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            patterns: BTreeMap::new(),
            relationships: BTreeMap::new(),
        }
    }

    /// Build a snapshot, rejecting duplicate ids and any relationship that is
    /// malformed or not fully contained in `patterns`.
    pub fn new<P, R>(name: impl Into<String>, patterns: P, relationships: R) -> Result<Self, ValidationError>
    where
        P: IntoIterator<Item = Pattern>,
        R: IntoIterator<Item = Relationship>,
    {
        let mut pattern_map = BTreeMap::new();
        for pattern in patterns {
            pattern.validate(DEFAULT_MAX_METADATA_DEPTH)?;
            if pattern_map.contains_key(&pattern.id) {
                return Err(ValidationError::DuplicateInput {
                    id: pattern.id.to_string(),
                });
            }
            pattern_map.insert(pattern.id.clone(), pattern);
        }

        let mut relationship_map = BTreeMap::new();
        for relationship in relationships {
            relationship.validate_shape(DEFAULT_MAX_METADATA_DEPTH)?;
            relationship.check_references(|id| pattern_map.get(id).map(Pattern::kind))?;
            if relationship_map.contains_key(&relationship.id) {
                return Err(ValidationError::DuplicateInput {
                    id: relationship.id.to_string(),
                });
            }
            relationship_map.insert(relationship.id.clone(), relationship);
        }

        Ok(Self {
            name: name.into(),
            patterns: pattern_map,
            relationships: relationship_map,
        })
    }

    /// Build a snapshot from already-keyed maps, dropping every relationship
    /// that does not resolve inside `patterns`. Returns the dropped ids.
    ///
    /// Used by composition operators, whose intermediate pattern sets can
    /// leave relationships dangling.
    pub fn closure(
        name: impl Into<String>,
        patterns: BTreeMap<PatternId, Pattern>,
        relationships: BTreeMap<RelationshipId, Relationship>,
    ) -> (Self, Vec<RelationshipId>) {
        let mut dropped = Vec::new();
        let mut kept = BTreeMap::new();
        for (id, relationship) in relationships {
            let closed = relationship.validate_shape(DEFAULT_MAX_METADATA_DEPTH).is_ok()
                && relationship
                    .check_references(|pid| patterns.get(pid).map(Pattern::kind))
                    .is_ok();
            if closed {
                kept.insert(id, relationship);
            } else {
                dropped.push(id);
            }
        }

        (
            Self {
                name: name.into(),
                patterns,
                relationships: kept,
            },
            dropped,
        )
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Same contents under a different label.
    pub fn renamed(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn patterns(&self) -> impl Iterator<Item = &Pattern> + '_ {
        self.patterns.values()
    }

    pub fn patterns_of(&self, kind: PatternKind) -> impl Iterator<Item = &Pattern> + '_ {
        self.patterns.values().filter(move |p| p.kind() == kind)
    }

    pub fn relationships(&self) -> impl Iterator<Item = &Relationship> + '_ {
        self.relationships.values()
    }

    pub fn pattern_map(&self) -> &BTreeMap<PatternId, Pattern> {
        &self.patterns
    }

    pub fn relationship_map(&self) -> &BTreeMap<RelationshipId, Relationship> {
        &self.relationships
    }

    pub fn get_pattern(&self, id: &PatternId) -> Option<&Pattern> {
        self.patterns.get(id)
    }

    pub fn get_relationship(&self, id: &RelationshipId) -> Option<&Relationship> {
        self.relationships.get(id)
    }

    pub fn contains_pattern(&self, id: &PatternId) -> bool {
        self.patterns.contains_key(id)
    }

    pub fn contains_relationship(&self, id: &RelationshipId) -> bool {
        self.relationships.contains_key(id)
    }

    pub fn pattern_ids(&self) -> BTreeSet<PatternId> {
        self.patterns.keys().cloned().collect()
    }

    pub fn relationship_ids(&self) -> BTreeSet<RelationshipId> {
        self.relationships.keys().cloned().collect()
    }

    /// Dimensions that have at least one pattern in this instance.
    pub fn dimensions(&self) -> BTreeSet<PatternKind> {
        self.patterns.values().map(Pattern::kind).collect()
    }

    pub fn pattern_count(&self) -> usize {
        self.patterns.len()
    }

    pub fn relationship_count(&self) -> usize {
        self.relationships.len()
    }

    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }

    /// Split into owned maps, consuming the snapshot.
    pub fn into_parts(
        self,
    ) -> (
        String,
        BTreeMap<PatternId, Pattern>,
        BTreeMap<RelationshipId, Relationship>,
    ) {
        (self.name, self.patterns, self.relationships)
    }

    /// Export in the import schema, ordered by id.
    pub fn export(&self) -> FrameworkExport {
        FrameworkExport {
            name: self.name.clone(),
            patterns: self.patterns.values().map(PatternRecord::from).collect(),
            relationships: self
                .relationships
                .values()
                .map(RelationshipRecord::from)
                .collect(),
        }
    }
}

/// Contents only; the name is a label and does not take part.
impl PartialEq for FrameworkInstance {
    fn eq(&self, other: &Self) -> bool {
        self.patterns == other.patterns && self.relationships == other.relationships
    }
}
