//! Hot-swap: replace one dimension's pattern set wholesale.

use std::collections::{BTreeMap, BTreeSet};

use serde::Serialize;
use tracing::debug;

use weave_core::models::{FrameworkInstance, Pattern};
use weave_core::{CompositionError, PatternId, PatternKind, RelationshipId, ValidationError, WeaveResult};

use crate::algebra::finish;

/// The swapped instance plus what happened to each affected relationship.
#[derive(Debug, Clone)]
pub struct HotSwapOutcome {
    pub instance: FrameworkInstance,
    /// Relationships whose references were rewritten through the remap.
    pub rewritten: Vec<RelationshipId>,
    /// Relationships that referenced a swapped-out pattern with no remap.
    pub dropped: Vec<RelationshipId>,
}

/// Summary counts, for logging and export.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct HotSwapStats {
    pub removed_patterns: usize,
    pub added_patterns: usize,
    pub rewritten: usize,
    pub dropped: usize,
}

impl HotSwapOutcome {
    pub fn stats(&self, original: &FrameworkInstance, dimension: PatternKind) -> HotSwapStats {
        let before: BTreeSet<&PatternId> = original.patterns_of(dimension).map(|p| &p.id).collect();
        let after: BTreeSet<&PatternId> = self.instance.patterns_of(dimension).map(|p| &p.id).collect();
        HotSwapStats {
            removed_patterns: before.difference(&after).count(),
            added_patterns: after.difference(&before).count(),
            rewritten: self.rewritten.len(),
            dropped: self.dropped.len(),
        }
    }
}

/// Replace every `dimension` pattern of `f` with `replacements`.
///
/// For each reference in `dimension`: an id present in `remap` is rewritten
/// to its target, an id re-supplied among `replacements` is kept, and any
/// other id drops the whole relationship. Rewritten relationships keep their
/// timestamps.
pub fn hot_swap(
    f: &FrameworkInstance,
    dimension: PatternKind,
    replacements: Vec<Pattern>,
    remap: &BTreeMap<PatternId, PatternId>,
) -> WeaveResult<HotSwapOutcome> {
    let mut incoming: BTreeMap<PatternId, Pattern> = BTreeMap::new();
    for pattern in replacements {
        if pattern.kind() != dimension {
            return Err(CompositionError::ReplacementKindMismatch {
                id: pattern.id.to_string(),
                expected: dimension.to_string(),
                found: pattern.kind().to_string(),
            }
            .into());
        }
        if incoming.contains_key(&pattern.id) {
            return Err(ValidationError::DuplicateInput {
                id: pattern.id.to_string(),
            }
            .into());
        }
        if let Some(existing) = f.get_pattern(&pattern.id) {
            if existing.kind() != dimension {
                return Err(CompositionError::KindConflict {
                    id: pattern.id.to_string(),
                    left: existing.kind().to_string(),
                    right: dimension.to_string(),
                }
                .into());
            }
        }
        incoming.insert(pattern.id.clone(), pattern);
    }

    for (old, new) in remap {
        if !incoming.contains_key(new) {
            return Err(CompositionError::UnknownRemapTarget {
                old: old.to_string(),
                new: new.to_string(),
            }
            .into());
        }
        let is_source = f.get_pattern(old).is_some_and(|p| p.kind() == dimension);
        if !is_source {
            return Err(CompositionError::UnknownRemapSource {
                old: old.to_string(),
                new: new.to_string(),
                dimension: dimension.to_string(),
            }
            .into());
        }
    }

    let mut patterns: BTreeMap<PatternId, Pattern> = f
        .pattern_map()
        .iter()
        .filter(|(_, p)| p.kind() != dimension)
        .map(|(id, p)| (id.clone(), p.clone()))
        .collect();
    let removed = f.patterns_of(dimension).count();
    let added = incoming.len();
    patterns.extend(incoming);

    let mut relationships = BTreeMap::new();
    let mut rewritten = Vec::new();
    let mut dropped = Vec::new();
    for (id, relationship) in f.relationship_map() {
        let Some(old) = relationship.reference(dimension) else {
            relationships.insert(id.clone(), relationship.clone());
            continue;
        };
        if let Some(new) = remap.get(old) {
            let mut swapped = relationship.clone();
            swapped.set_reference(dimension, Some(new.clone()));
            relationships.insert(id.clone(), swapped);
            rewritten.push(id.clone());
        } else if patterns.contains_key(old) {
            relationships.insert(id.clone(), relationship.clone());
        } else {
            dropped.push(id.clone());
        }
    }

    debug!(
        dimension = %dimension,
        removed,
        added,
        rewritten = rewritten.len(),
        dropped = dropped.len(),
        "hot-swap applied"
    );
    let name = format!("hot_swap({}, {dimension})", f.name());
    Ok(HotSwapOutcome {
        instance: finish("hot_swap", name, patterns, relationships),
        rewritten,
        dropped,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use weave_core::models::Relationship;
    use weave_core::WeaveError;

    fn base() -> FrameworkInstance {
        FrameworkInstance::new(
            "base",
            vec![
                Pattern::new("prop", "Prop", PatternKind::Property),
                Pattern::new("old", "Old", PatternKind::Process),
            ],
            vec![Relationship::new("r", 0.5).with_property("prop").with_process("old")],
        )
        .unwrap()
    }

    #[test]
    fn rejects_replacement_of_wrong_kind() {
        let err = hot_swap(
            &base(),
            PatternKind::Process,
            vec![Pattern::new("x", "X", PatternKind::Perspective)],
            &BTreeMap::new(),
        )
        .unwrap_err();
        assert!(matches!(
            err,
            WeaveError::Composition(CompositionError::ReplacementKindMismatch { .. })
        ));
    }

    #[test]
    fn rejects_remap_to_missing_target() {
        let remap = BTreeMap::from([(PatternId::from("old"), PatternId::from("nowhere"))]);
        let err = hot_swap(
            &base(),
            PatternKind::Process,
            vec![Pattern::new("new", "New", PatternKind::Process)],
            &remap,
        )
        .unwrap_err();
        assert_eq!(err.rule(), "composition");
        assert!(matches!(
            err,
            WeaveError::Composition(CompositionError::UnknownRemapTarget { .. })
        ));
    }

    #[test]
    fn rejects_remap_from_pattern_outside_dimension() {
        let remap = BTreeMap::from([(PatternId::from("prop"), PatternId::from("new"))]);
        let err = hot_swap(
            &base(),
            PatternKind::Process,
            vec![Pattern::new("new", "New", PatternKind::Process)],
            &remap,
        )
        .unwrap_err();
        assert!(matches!(
            err,
            WeaveError::Composition(CompositionError::UnknownRemapSource { .. })
        ));
    }

    #[test]
    fn rejects_collision_with_other_kind() {
        let err = hot_swap(
            &base(),
            PatternKind::Process,
            vec![Pattern::new("prop", "Prop", PatternKind::Process)],
            &BTreeMap::new(),
        )
        .unwrap_err();
        assert!(matches!(
            err,
            WeaveError::Composition(CompositionError::KindConflict { .. })
        ));
    }

    #[test]
    fn remap_rewrites_reference_and_keeps_timestamps() {
        let f = base();
        let remap = BTreeMap::from([(PatternId::from("old"), PatternId::from("new"))]);
        let outcome = hot_swap(
            &f,
            PatternKind::Process,
            vec![Pattern::new("new", "New", PatternKind::Process)],
            &remap,
        )
        .unwrap();

        let id = RelationshipId::from("r");
        let rel = outcome.instance.get_relationship(&id).unwrap();
        assert_eq!(rel.process.as_ref().map(PatternId::as_str), Some("new"));
        assert_eq!(rel.updated_at, f.get_relationship(&id).unwrap().updated_at);
        assert_eq!(outcome.rewritten, vec![id]);
        assert!(!outcome.instance.contains_pattern(&"old".into()));

        let stats = outcome.stats(&f, PatternKind::Process);
        assert_eq!((stats.removed_patterns, stats.added_patterns), (1, 1));
    }
}
