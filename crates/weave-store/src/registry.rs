//! PatternRegistry: the authoritative store of typed patterns.
//!
//! Iteration follows insertion order so listings are reproducible. Removal
//! is not exposed here: dropping a pattern must cascade into the relationship
//! store, so it goes through [`Catalog::remove_pattern`](crate::Catalog::remove_pattern).

use weave_core::constants::DEFAULT_MAX_METADATA_DEPTH;
use weave_core::models::{Pattern, PatternUpdate};
use weave_core::{FxHashMap, PatternId, PatternKind, WeaveError, WeaveResult};

/// Optional predicates for [`PatternRegistry::list`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PatternFilter {
    pub domain: Option<String>,
    pub kind: Option<PatternKind>,
}

impl PatternFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn domain(mut self, domain: impl Into<String>) -> Self {
        self.domain = Some(domain.into());
        self
    }

    pub fn kind(mut self, kind: PatternKind) -> Self {
        self.kind = Some(kind);
        self
    }

    pub fn matches(&self, pattern: &Pattern) -> bool {
        if let Some(kind) = self.kind {
            if pattern.kind() != kind {
                return false;
            }
        }
        if let Some(domain) = &self.domain {
            if pattern.domain.as_deref() != Some(domain.as_str()) {
                return false;
            }
        }
        true
    }
}

pub struct PatternRegistry {
    patterns: FxHashMap<PatternId, Pattern>,
    order: Vec<PatternId>,
    max_metadata_depth: usize,
}

impl PatternRegistry {
    pub fn new() -> Self {
        Self::with_max_metadata_depth(DEFAULT_MAX_METADATA_DEPTH)
    }

    pub fn with_max_metadata_depth(max_metadata_depth: usize) -> Self {
        Self {
            patterns: FxHashMap::default(),
            order: Vec::new(),
            max_metadata_depth,
        }
    }

    /// Store a new pattern. Fails on a duplicate id or invalid metadata.
    pub fn register(&mut self, pattern: Pattern) -> WeaveResult<()> {
        pattern.validate(self.max_metadata_depth)?;
        if self.patterns.contains_key(&pattern.id) {
            return Err(WeaveError::duplicate_pattern(&pattern.id));
        }
        self.order.push(pattern.id.clone());
        self.patterns.insert(pattern.id.clone(), pattern);
        Ok(())
    }

    pub fn get(&self, id: &PatternId) -> WeaveResult<&Pattern> {
        self.patterns
            .get(id)
            .ok_or_else(|| WeaveError::pattern_not_found(id))
    }

    pub fn contains(&self, id: &PatternId) -> bool {
        self.patterns.contains_key(id)
    }

    pub fn kind_of(&self, id: &PatternId) -> Option<PatternKind> {
        self.patterns.get(id).map(Pattern::kind)
    }

    /// Lazy, restartable listing in insertion order. Clone the returned
    /// iterator to walk it again from the start.
    pub fn list(&self, filter: PatternFilter) -> PatternListing<'_> {
        PatternListing {
            registry: self,
            filter,
            position: 0,
        }
    }

    /// Merge fields into an existing pattern. `kind` cannot be changed.
    pub fn update(&mut self, id: &PatternId, update: PatternUpdate) -> WeaveResult<&Pattern> {
        let max_depth = self.max_metadata_depth;
        let pattern = self
            .patterns
            .get_mut(id)
            .ok_or_else(|| WeaveError::pattern_not_found(id))?;
        pattern.apply_update(update, max_depth)?;
        Ok(pattern)
    }

    /// Distinct domain tags in first-seen order.
    pub fn domains(&self) -> Vec<String> {
        let mut seen = Vec::new();
        for pattern in self.list(PatternFilter::new()) {
            if let Some(domain) = &pattern.domain {
                if !seen.contains(domain) {
                    seen.push(domain.clone());
                }
            }
        }
        seen
    }

    pub fn len(&self) -> usize {
        self.patterns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }

    pub(crate) fn max_metadata_depth(&self) -> usize {
        self.max_metadata_depth
    }

    /// Detach a pattern. Callers are responsible for the cascade.
    pub(crate) fn take(&mut self, id: &PatternId) -> WeaveResult<Pattern> {
        let pattern = self
            .patterns
            .remove(id)
            .ok_or_else(|| WeaveError::pattern_not_found(id))?;
        self.order.retain(|existing| existing != id);
        Ok(pattern)
    }
}

impl Default for PatternRegistry {
    fn default() -> Self {
        Self::new()
    }
}

/// Iterator returned by [`PatternRegistry::list`].
#[derive(Clone)]
pub struct PatternListing<'a> {
    registry: &'a PatternRegistry,
    filter: PatternFilter,
    position: usize,
}

impl<'a> Iterator for PatternListing<'a> {
    type Item = &'a Pattern;

    fn next(&mut self) -> Option<Self::Item> {
        let registry = self.registry;
        while let Some(id) = registry.order.get(self.position) {
            self.position += 1;
            if let Some(pattern) = registry.patterns.get(id) {
                if self.filter.matches(pattern) {
                    return Some(pattern);
                }
            }
        }
        None
    }
}
