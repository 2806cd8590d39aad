//! Id-based set algebra: union, intersection, difference.
//!
//! When both operands hold the same id with different content, union and
//! intersection keep the copy with the greater `(updated_at, canonical JSON)`
//! key. The choice depends only on the two copies, never on operand order,
//! which is what makes both operators commutative. Differing kinds for one
//! pattern id are a hard error.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::debug;

use weave_core::models::{FrameworkInstance, Pattern, Relationship};
use weave_core::{CompositionError, PatternId, RelationshipId};

/// Entities that can be picked between canonically.
pub(crate) trait Canonical: Clone + PartialEq + Serialize {
    fn updated_at(&self) -> DateTime<Utc>;
}

impl Canonical for Pattern {
    fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }
}

impl Canonical for Relationship {
    fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }
}

/// Order-independent choice between two copies of one id.
pub(crate) fn canonical_pick<'a, T: Canonical>(a: &'a T, b: &'a T) -> &'a T {
    if a == b {
        return a;
    }
    match a.updated_at().cmp(&b.updated_at()) {
        std::cmp::Ordering::Greater => a,
        std::cmp::Ordering::Less => b,
        std::cmp::Ordering::Equal => {
            let ja = serde_json::to_string(a).unwrap_or_default();
            let jb = serde_json::to_string(b).unwrap_or_default();
            if ja >= jb {
                a
            } else {
                b
            }
        }
    }
}

pub(crate) fn check_kinds(left: &Pattern, right: &Pattern) -> Result<(), CompositionError> {
    if left.kind() != right.kind() {
        return Err(CompositionError::KindConflict {
            id: left.id.to_string(),
            left: left.kind().to_string(),
            right: right.kind().to_string(),
        });
    }
    Ok(())
}

/// Id-based union. Commutative and idempotent.
pub fn union(f1: &FrameworkInstance, f2: &FrameworkInstance) -> Result<FrameworkInstance, CompositionError> {
    let mut patterns = f1.pattern_map().clone();
    for (id, right) in f2.pattern_map() {
        let chosen = match patterns.get(id) {
            Some(left) => {
                check_kinds(left, right)?;
                canonical_pick(left, right).clone()
            }
            None => right.clone(),
        };
        patterns.insert(id.clone(), chosen);
    }

    let mut relationships = f1.relationship_map().clone();
    for (id, right) in f2.relationship_map() {
        let chosen = match relationships.get(id) {
            Some(left) => canonical_pick(left, right).clone(),
            None => right.clone(),
        };
        relationships.insert(id.clone(), chosen);
    }

    let name = format!("union({}, {})", f1.name(), f2.name());
    Ok(finish("union", name, patterns, relationships))
}

/// Keep ids present in both operands. Commutative and idempotent.
pub fn intersection(
    f1: &FrameworkInstance,
    f2: &FrameworkInstance,
) -> Result<FrameworkInstance, CompositionError> {
    let mut patterns = BTreeMap::new();
    for (id, left) in f1.pattern_map() {
        if let Some(right) = f2.get_pattern(id) {
            check_kinds(left, right)?;
            patterns.insert(id.clone(), canonical_pick(left, right).clone());
        }
    }

    let relationships = f1
        .relationship_map()
        .iter()
        .filter_map(|(id, left)| {
            f2.get_relationship(id)
                .map(|right| (id.clone(), canonical_pick(left, right).clone()))
        })
        .collect();

    let name = format!("intersection({}, {})", f1.name(), f2.name());
    Ok(finish("intersection", name, patterns, relationships))
}

/// Patterns and relationships of `f1` whose ids are absent from `f2`.
/// Relationships of `f1` that lose a referenced pattern are dropped so the
/// result stays closed.
pub fn difference(f1: &FrameworkInstance, f2: &FrameworkInstance) -> FrameworkInstance {
    let patterns = f1
        .pattern_map()
        .iter()
        .filter(|(id, _)| !f2.contains_pattern(id))
        .map(|(id, p)| (id.clone(), p.clone()))
        .collect();
    let relationships = f1
        .relationship_map()
        .iter()
        .filter(|(id, _)| !f2.contains_relationship(id))
        .map(|(id, r)| (id.clone(), r.clone()))
        .collect();

    let name = format!("difference({}, {})", f1.name(), f2.name());
    finish("difference", name, patterns, relationships)
}

/// Fold [`union`] over any number of operands.
pub fn union_all<'a, I>(instances: I) -> Result<FrameworkInstance, CompositionError>
where
    I: IntoIterator<Item = &'a FrameworkInstance>,
{
    let mut iter = instances.into_iter();
    let Some(first) = iter.next() else {
        return Ok(FrameworkInstance::empty("union()"));
    };
    iter.try_fold(first.clone(), |acc, next| union(&acc, next))
}

/// Fold [`intersection`] over any number of operands. No operands yields an
/// empty instance.
pub fn intersection_all<'a, I>(instances: I) -> Result<FrameworkInstance, CompositionError>
where
    I: IntoIterator<Item = &'a FrameworkInstance>,
{
    let mut iter = instances.into_iter();
    let Some(first) = iter.next() else {
        return Ok(FrameworkInstance::empty("intersection()"));
    };
    iter.try_fold(first.clone(), |acc, next| intersection(&acc, next))
}

pub(crate) fn finish(
    op: &'static str,
    name: String,
    patterns: BTreeMap<PatternId, Pattern>,
    relationships: BTreeMap<RelationshipId, Relationship>,
) -> FrameworkInstance {
    let (instance, dropped) = FrameworkInstance::closure(name, patterns, relationships);
    debug!(
        op,
        patterns = instance.pattern_count(),
        relationships = instance.relationship_count(),
        dropped = dropped.len(),
        "composition finished"
    );
    instance
}

#[cfg(test)]
mod tests {
    use super::*;
    use weave_core::PatternKind;

    fn instance(name: &str, patterns: Vec<Pattern>, relationships: Vec<Relationship>) -> FrameworkInstance {
        FrameworkInstance::new(name, patterns, relationships).unwrap()
    }

    #[test]
    fn canonical_pick_is_order_independent() {
        let a = Pattern::new("x", "A", PatternKind::Property);
        let mut b = a.clone();
        b.description = "different".into();
        assert_eq!(canonical_pick(&a, &b), canonical_pick(&b, &a));
    }

    #[test]
    fn union_rejects_kind_conflicts() {
        let f1 = instance("f1", vec![Pattern::new("x", "X", PatternKind::Property)], vec![]);
        let f2 = instance("f2", vec![Pattern::new("x", "X", PatternKind::Process)], vec![]);
        assert!(matches!(union(&f1, &f2), Err(CompositionError::KindConflict { .. })));
        assert!(matches!(intersection(&f1, &f2), Err(CompositionError::KindConflict { .. })));
    }

    #[test]
    fn difference_drops_relationships_left_dangling() {
        let prop = Pattern::new("prop", "Prop", PatternKind::Property);
        let proc_ = Pattern::new("proc", "Proc", PatternKind::Process);
        let rel = Relationship::new("r", 0.5).with_property("prop").with_process("proc");
        let f1 = instance("f1", vec![prop, proc_.clone()], vec![rel]);
        let f2 = instance("f2", vec![proc_], vec![]);

        let diff = difference(&f1, &f2);
        assert_eq!(diff.pattern_ids().len(), 1);
        assert_eq!(diff.relationship_count(), 0);
    }

    #[test]
    fn fold_over_no_operands_is_empty() {
        let none: Vec<FrameworkInstance> = Vec::new();
        assert!(union_all(&none).unwrap().is_empty());
        assert!(intersection_all(&none).unwrap().is_empty());
    }
}
