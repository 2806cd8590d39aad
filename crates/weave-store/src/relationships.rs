//! RelationshipStore: weighted ties validated against the registry.
//!
//! Every write is validated in full before anything is stored, so a failed
//! `add` leaves the store exactly as it was. A reverse index from pattern id
//! to relationship ids backs cascades and pattern-scoped queries.

use chrono::Utc;
use tracing::{debug, warn};

use weave_core::models::Relationship;
use weave_core::{FxHashMap, FxHashSet, PatternId, PatternKind, RelationshipId, WeaveError, WeaveResult};

use crate::registry::PatternRegistry;
use crate::report::{ImportReport, Rejection};

/// Optional predicates for [`RelationshipStore::query`]. Thresholds are inclusive.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RelationshipQuery {
    pub pattern_id: Option<PatternId>,
    pub min_strength: Option<f64>,
    pub min_confidence: Option<f64>,
}

impl RelationshipQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn pattern(mut self, id: impl Into<PatternId>) -> Self {
        self.pattern_id = Some(id.into());
        self
    }

    pub fn min_strength(mut self, value: f64) -> Self {
        self.min_strength = Some(value);
        self
    }

    pub fn min_confidence(mut self, value: f64) -> Self {
        self.min_confidence = Some(value);
        self
    }

    pub fn matches(&self, rel: &Relationship) -> bool {
        if let Some(pattern_id) = &self.pattern_id {
            if !rel.references_pattern(pattern_id) {
                return false;
            }
        }
        if let Some(min) = self.min_strength {
            if rel.strength < min {
                return false;
            }
        }
        if let Some(min) = self.min_confidence {
            if rel.confidence < min {
                return false;
            }
        }
        true
    }
}

pub struct RelationshipStore {
    relationships: FxHashMap<RelationshipId, Relationship>,
    order: Vec<RelationshipId>,
    by_pattern: FxHashMap<PatternId, FxHashSet<RelationshipId>>,
}

impl RelationshipStore {
    pub fn new() -> Self {
        Self {
            relationships: FxHashMap::default(),
            order: Vec::new(),
            by_pattern: FxHashMap::default(),
        }
    }

    /// Validate against `registry` and store. No partial write on failure.
    pub fn add(&mut self, relationship: Relationship, registry: &PatternRegistry) -> WeaveResult<()> {
        if self.relationships.contains_key(&relationship.id) {
            return Err(WeaveError::duplicate_relationship(&relationship.id));
        }
        relationship.validate_shape(registry.max_metadata_depth())?;
        relationship.check_references(|id| registry.kind_of(id))?;

        debug!(
            id = %relationship.id,
            anchored = relationship.anchored_count(),
            strength = relationship.strength,
            "relationship added"
        );
        self.insert(relationship);
        Ok(())
    }

    pub fn get(&self, id: &RelationshipId) -> WeaveResult<&Relationship> {
        self.relationships
            .get(id)
            .ok_or_else(|| WeaveError::relationship_not_found(id))
    }

    pub fn contains(&self, id: &RelationshipId) -> bool {
        self.relationships.contains_key(id)
    }

    pub fn remove(&mut self, id: &RelationshipId) -> WeaveResult<Relationship> {
        let relationship = self
            .relationships
            .remove(id)
            .ok_or_else(|| WeaveError::relationship_not_found(id))?;
        self.order.retain(|existing| existing != id);
        self.unindex(&relationship);
        Ok(relationship)
    }

    /// Lazy listing in insertion order; clone to restart.
    pub fn query(&self, query: RelationshipQuery) -> RelationshipListing<'_> {
        RelationshipListing {
            store: self,
            query,
            position: 0,
        }
    }

    /// Attempt every relationship independently. Invalid ones are reported,
    /// never fatal to the batch.
    pub fn bulk_import<I>(&mut self, relationships: I, registry: &PatternRegistry) -> ImportReport
    where
        I: IntoIterator<Item = Relationship>,
    {
        let mut report = ImportReport::default();
        for relationship in relationships {
            self.import_one(relationship, registry, &mut report);
        }
        report
    }

    /// One bulk-import attempt, recorded into `report`.
    pub(crate) fn import_one(&mut self, relationship: Relationship, registry: &PatternRegistry, report: &mut ImportReport) {
        let id = relationship.id.clone();
        match self.add(relationship, registry) {
            Ok(()) => report.imported.push(id),
            Err(e) => {
                warn!(id = %id, rule = e.rule(), error = %e, "relationship rejected during bulk import");
                report.rejected.push(Rejection::from_error(id.to_string(), &e));
            }
        }
    }

    /// Ids of relationships referencing `pattern_id`, in insertion order.
    pub fn referencing(&self, pattern_id: &PatternId) -> Vec<RelationshipId> {
        match self.by_pattern.get(pattern_id) {
            Some(ids) if !ids.is_empty() => self
                .order
                .iter()
                .filter(|id| ids.contains(*id))
                .cloned()
                .collect(),
            _ => Vec::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.relationships.len()
    }

    pub fn is_empty(&self) -> bool {
        self.relationships.is_empty()
    }

    pub(crate) fn iter(&self) -> impl Iterator<Item = &Relationship> + '_ {
        self.order.iter().filter_map(|id| self.relationships.get(id))
    }

    /// Clear every slot pointing at `pattern_id` and scale the strength.
    /// Returns false, leaving the relationship untouched, when fewer than
    /// two references would remain.
    pub(crate) fn downrank(&mut self, id: &RelationshipId, pattern_id: &PatternId, factor: f64) -> bool {
        let Some(relationship) = self.relationships.get(id) else {
            return false;
        };
        let mut updated = relationship.clone();
        for kind in PatternKind::ALL {
            if updated.reference(kind) == Some(pattern_id) {
                updated.set_reference(kind, None);
            }
        }
        if updated.anchored_count() < weave_core::constants::MIN_ANCHORED_DIMENSIONS {
            return false;
        }
        updated.strength = (updated.strength * factor).clamp(0.0, 1.0);
        updated.updated_at = Utc::now();

        if let Some(ids) = self.by_pattern.get_mut(pattern_id) {
            ids.remove(id);
            if ids.is_empty() {
                self.by_pattern.remove(pattern_id);
            }
        }
        self.relationships.insert(id.clone(), updated);
        true
    }

    fn insert(&mut self, relationship: Relationship) {
        for (_, pattern_id) in relationship.references() {
            self.by_pattern
                .entry(pattern_id.clone())
                .or_default()
                .insert(relationship.id.clone());
        }
        self.order.push(relationship.id.clone());
        self.relationships.insert(relationship.id.clone(), relationship);
    }

    fn unindex(&mut self, relationship: &Relationship) {
        for (_, pattern_id) in relationship.references() {
            if let Some(ids) = self.by_pattern.get_mut(pattern_id) {
                ids.remove(&relationship.id);
                if ids.is_empty() {
                    self.by_pattern.remove(pattern_id);
                }
            }
        }
    }
}

impl Default for RelationshipStore {
    fn default() -> Self {
        Self::new()
    }
}

/// Iterator returned by [`RelationshipStore::query`].
#[derive(Clone)]
pub struct RelationshipListing<'a> {
    store: &'a RelationshipStore,
    query: RelationshipQuery,
    position: usize,
}

impl<'a> Iterator for RelationshipListing<'a> {
    type Item = &'a Relationship;

    fn next(&mut self) -> Option<Self::Item> {
        let store = self.store;
        while let Some(id) = store.order.get(self.position) {
            self.position += 1;
            if let Some(rel) = store.relationships.get(id) {
                if self.query.matches(rel) {
                    return Some(rel);
                }
            }
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use weave_core::models::Pattern;

    fn registry() -> PatternRegistry {
        let mut registry = PatternRegistry::new();
        registry.register(Pattern::new("prop", "Prop", PatternKind::Property)).unwrap();
        registry.register(Pattern::new("proc", "Proc", PatternKind::Process)).unwrap();
        registry.register(Pattern::new("persp", "Persp", PatternKind::Perspective)).unwrap();
        registry
    }

    fn tie(id: &str, strength: f64) -> Relationship {
        Relationship::new(id, strength).with_property("prop").with_process("proc")
    }

    #[test]
    fn add_rejects_kind_mismatch_without_writing() {
        let registry = registry();
        let mut store = RelationshipStore::new();
        let bad = Relationship::new("r1", 0.5).with_property("proc").with_process("prop");
        let err = store.add(bad, &registry).unwrap_err();
        assert_eq!(err.rule(), "kind_mismatch");
        assert!(store.is_empty());
        assert!(store.referencing(&"proc".into()).is_empty());
    }

    #[test]
    fn add_rejects_duplicate_id() {
        let registry = registry();
        let mut store = RelationshipStore::new();
        store.add(tie("r1", 0.5), &registry).unwrap();
        let err = store.add(tie("r1", 0.9), &registry).unwrap_err();
        assert!(matches!(err, WeaveError::DuplicateId { .. }));
        assert_eq!(store.get(&"r1".into()).unwrap().strength, 0.5);
    }

    #[test]
    fn query_filters_are_inclusive() {
        let registry = registry();
        let mut store = RelationshipStore::new();
        store.add(tie("weak", 0.2), &registry).unwrap();
        store.add(tie("firm", 0.6).with_confidence(0.4), &registry).unwrap();
        store
            .add(
                Relationship::new("side", 0.6).with_process("proc").with_perspective("persp"),
                &registry,
            )
            .unwrap();

        let ids: Vec<_> = store
            .query(RelationshipQuery::new().pattern("prop").min_strength(0.6))
            .map(|r| r.id.as_str())
            .collect();
        assert_eq!(ids, ["firm"]);

        let confident: Vec<_> = store
            .query(RelationshipQuery::new().min_confidence(1.0))
            .map(|r| r.id.as_str())
            .collect();
        assert_eq!(confident, ["weak", "side"]);
    }

    #[test]
    fn remove_unindexes() {
        let registry = registry();
        let mut store = RelationshipStore::new();
        store.add(tie("r1", 0.5), &registry).unwrap();
        store.remove(&"r1".into()).unwrap();
        assert!(store.referencing(&"prop".into()).is_empty());
        assert!(matches!(store.remove(&"r1".into()), Err(WeaveError::NotFound { .. })));
    }

    #[test]
    fn bulk_import_collects_rejections() {
        let registry = registry();
        let mut store = RelationshipStore::new();
        let report = store.bulk_import(
            vec![
                tie("ok", 0.5),
                tie("too-strong", 1.5),
                Relationship::new("lonely", 0.5).with_property("prop"),
                Relationship::new("dangling", 0.5).with_property("prop").with_perspective("ghost"),
                tie("ok", 0.7),
            ],
            &registry,
        );

        assert_eq!(report.imported, vec![RelationshipId::from("ok")]);
        let rules: Vec<_> = report.rejected.iter().map(|r| r.rule.as_str()).collect();
        assert_eq!(
            rules,
            ["strength_range", "insufficient_anchors", "dangling_reference", "duplicate_id"]
        );
        assert_eq!(report.total(), 5);
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn downrank_keeps_two_anchored_relationships() {
        let registry = registry();
        let mut store = RelationshipStore::new();
        store
            .add(
                Relationship::new("tri", 0.8)
                    .with_property("prop")
                    .with_process("proc")
                    .with_perspective("persp"),
                &registry,
            )
            .unwrap();
        store.add(tie("pair", 0.8), &registry).unwrap();

        assert!(store.downrank(&"tri".into(), &"persp".into(), 0.5));
        let tri = store.get(&"tri".into()).unwrap();
        assert!(tri.perspective.is_none());
        assert!((tri.strength - 0.4).abs() < 1e-12);

        assert!(!store.downrank(&"pair".into(), &"prop".into(), 0.5));
        assert_eq!(store.get(&"pair".into()).unwrap().strength, 0.8);
    }
}
