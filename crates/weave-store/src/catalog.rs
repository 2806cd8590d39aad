//! Catalog: the registry and relationship store behind one `RwLock`.
//!
//! Writers are serialized by the write lock, readers share the read lock.
//! The catalog is an explicit object owned by the caller (one per import
//! session or application context); there is no global instance. Cloning
//! shares the same underlying state.

use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use tracing::{debug, info};

use weave_core::config::{CascadeMode, StoreConfig};
use weave_core::models::{FrameworkInstance, Pattern, PatternUpdate, Relationship};
use weave_core::{PatternId, RelationshipId, WeaveError, WeaveResult};

use crate::registry::{PatternFilter, PatternRegistry};
use crate::relationships::{RelationshipQuery, RelationshipStore};
use crate::report::{ImportReport, RemovalReport};

/// The guarded state: both stores, always mutated together.
pub struct CatalogState {
    pub registry: PatternRegistry,
    pub relationships: RelationshipStore,
}

impl CatalogState {
    fn new(config: &StoreConfig) -> Self {
        Self {
            registry: PatternRegistry::with_max_metadata_depth(config.max_metadata_depth),
            relationships: RelationshipStore::new(),
        }
    }

    /// Cross-reference violations. Empty unless there is a bug in this crate:
    /// every write path validates before storing.
    pub fn integrity_violations(&self) -> Vec<String> {
        let mut violations = Vec::new();
        for rel in self.relationships.iter() {
            if let Err(e) = rel.check_references(|id| self.registry.kind_of(id)) {
                violations.push(e.to_string());
            }
        }
        violations
    }
}

pub struct Catalog {
    inner: Arc<RwLock<CatalogState>>,
    config: StoreConfig,
}

impl Catalog {
    pub fn new(config: StoreConfig) -> Self {
        Self {
            inner: Arc::new(RwLock::new(CatalogState::new(&config))),
            config,
        }
    }

    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    // ─── Patterns ───────────────────────────────────────────────────────────

    pub fn register(&self, pattern: Pattern) -> WeaveResult<()> {
        let mut state = self.write()?;
        let id = pattern.id.clone();
        let kind = pattern.kind();
        state.registry.register(pattern)?;
        debug!(id = %id, kind = %kind, "pattern registered");
        Ok(())
    }

    pub fn get_pattern(&self, id: &PatternId) -> WeaveResult<Pattern> {
        self.read()?.registry.get(id).cloned()
    }

    /// Owned snapshot of a filtered listing. Use [`Catalog::read`] to
    /// iterate lazily without cloning.
    pub fn list_patterns(&self, filter: PatternFilter) -> WeaveResult<Vec<Pattern>> {
        Ok(self.read()?.registry.list(filter).cloned().collect())
    }

    pub fn update_pattern(&self, id: &PatternId, update: PatternUpdate) -> WeaveResult<Pattern> {
        let mut state = self.write()?;
        let updated = state.registry.update(id, update)?.clone();
        debug!(id = %id, "pattern updated");
        Ok(updated)
    }

    /// Remove a pattern and cascade into the relationships referencing it,
    /// according to the configured [`CascadeMode`].
    pub fn remove_pattern(&self, id: &PatternId) -> WeaveResult<RemovalReport> {
        let mut state = self.write()?;
        state.registry.take(id)?;

        let mut report = RemovalReport {
            pattern: id.clone(),
            deleted: Vec::new(),
            downranked: Vec::new(),
        };
        for rel_id in state.relationships.referencing(id) {
            let kept = match self.config.cascade_mode {
                CascadeMode::Strict => false,
                CascadeMode::DownRank => {
                    state
                        .relationships
                        .downrank(&rel_id, id, self.config.downrank_factor)
                }
            };
            if kept {
                report.downranked.push(rel_id);
            } else {
                state.relationships.remove(&rel_id)?;
                report.deleted.push(rel_id);
            }
        }

        debug_assert!(
            state.integrity_violations().is_empty(),
            "cascade left dangling references: {:?}",
            state.integrity_violations()
        );
        info!(
            id = %id,
            deleted = report.deleted.len(),
            downranked = report.downranked.len(),
            "pattern removed"
        );
        Ok(report)
    }

    pub fn pattern_count(&self) -> WeaveResult<usize> {
        Ok(self.read()?.registry.len())
    }

    // ─── Relationships ──────────────────────────────────────────────────────

    pub fn add_relationship(&self, relationship: Relationship) -> WeaveResult<()> {
        let mut state = self.write()?;
        let CatalogState {
            registry,
            relationships,
        } = &mut *state;
        relationships.add(relationship, registry)
    }

    pub fn get_relationship(&self, id: &RelationshipId) -> WeaveResult<Relationship> {
        self.read()?.relationships.get(id).cloned()
    }

    pub fn remove_relationship(&self, id: &RelationshipId) -> WeaveResult<Relationship> {
        let removed = self.write()?.relationships.remove(id)?;
        debug!(id = %id, "relationship removed");
        Ok(removed)
    }

    pub fn query_relationships(&self, query: RelationshipQuery) -> WeaveResult<Vec<Relationship>> {
        Ok(self.read()?.relationships.query(query).cloned().collect())
    }

    pub fn bulk_import<I>(&self, relationships: I) -> WeaveResult<ImportReport>
    where
        I: IntoIterator<Item = Relationship>,
    {
        let mut state = self.write()?;
        let CatalogState {
            registry,
            relationships: store,
        } = &mut *state;
        let report = store.bulk_import(relationships, registry);
        info!(
            imported = report.imported.len(),
            rejected = report.rejected.len(),
            "bulk relationship import finished"
        );
        Ok(report)
    }

    pub fn relationship_count(&self) -> WeaveResult<usize> {
        Ok(self.read()?.relationships.len())
    }

    // ─── Snapshots ──────────────────────────────────────────────────────────

    /// Framework instance holding the whole catalog.
    pub fn snapshot(&self, name: impl Into<String>) -> WeaveResult<FrameworkInstance> {
        self.snapshot_where(name, &PatternFilter::new())
    }

    /// Framework instance restricted to patterns matching `filter`.
    /// Relationships not fully contained in that subset are left out.
    pub fn snapshot_where(
        &self,
        name: impl Into<String>,
        filter: &PatternFilter,
    ) -> WeaveResult<FrameworkInstance> {
        let state = self.read()?;
        let patterns = state
            .registry
            .list(filter.clone())
            .map(|p| (p.id.clone(), p.clone()))
            .collect();
        let relationships = state
            .relationships
            .iter()
            .map(|r| (r.id.clone(), r.clone()))
            .collect();
        let (instance, excluded) = FrameworkInstance::closure(name, patterns, relationships);
        debug!(
            name = instance.name(),
            patterns = instance.pattern_count(),
            relationships = instance.relationship_count(),
            excluded = excluded.len(),
            "snapshot taken"
        );
        Ok(instance)
    }

    // ─── Lock helpers ───────────────────────────────────────────────────────

    /// Read guard for lazy, zero-copy iteration over both stores.
    pub fn read(&self) -> WeaveResult<RwLockReadGuard<'_, CatalogState>> {
        self.inner
            .read()
            .map_err(|e| WeaveError::Concurrency(e.to_string()))
    }

    pub(crate) fn write(&self) -> WeaveResult<RwLockWriteGuard<'_, CatalogState>> {
        self.inner
            .write()
            .map_err(|e| WeaveError::Concurrency(e.to_string()))
    }
}

impl Default for Catalog {
    fn default() -> Self {
        Self::new(StoreConfig::default())
    }
}

impl Clone for Catalog {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
            config: self.config.clone(),
        }
    }
}
