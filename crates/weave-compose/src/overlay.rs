//! Overlay: additive merge with an explicit conflict policy.
//!
//! Overlay is NOT commutative. Under the default `first-wins` policy the left
//! operand's copy survives every conflict, so `overlay(a, b)` and
//! `overlay(b, a)` differ whenever the operands disagree on a shared id. The
//! discarded copies are returned in the conflict log instead of vanishing.

use tracing::debug;

use weave_core::models::FrameworkInstance;
use weave_core::CompositionError;

use crate::algebra::{check_kinds, finish};
use crate::policy::{ConflictLog, ConflictPolicy, ConflictRecord, ConflictResolver, DiscardedCopy, Side};

/// Result of an overlay: the merged instance plus every resolved conflict.
#[derive(Debug, Clone)]
pub struct OverlayResult {
    pub instance: FrameworkInstance,
    pub conflicts: ConflictLog,
}

/// Overlay with the default `first-wins` policy.
pub fn overlay(f1: &FrameworkInstance, f2: &FrameworkInstance) -> Result<OverlayResult, CompositionError> {
    overlay_with(f1, f2, &ConflictPolicy::FirstWins)
}

/// Overlay `f2` onto `f1`, letting `resolver` settle same-id conflicts.
///
/// A pattern id with different kinds in the two operands cannot be settled
/// by any policy and fails the whole overlay before anything is merged.
/// Relationships are merged additively; strength and confidence are never
/// recombined.
pub fn overlay_with(
    f1: &FrameworkInstance,
    f2: &FrameworkInstance,
    resolver: &dyn ConflictResolver,
) -> Result<OverlayResult, CompositionError> {
    for (id, right) in f2.pattern_map() {
        if let Some(left) = f1.get_pattern(id) {
            check_kinds(left, right)?;
        }
    }

    let mut conflicts = ConflictLog::default();

    let mut patterns = f1.pattern_map().clone();
    for (id, right) in f2.pattern_map() {
        let Some(left) = patterns.get(id) else {
            patterns.insert(id.clone(), right.clone());
            continue;
        };
        if left.same_content(right) {
            continue;
        }
        let side = resolver.resolve_pattern(left, right);
        let (kept, discarded) = match side {
            Side::Left => (left.clone(), right.clone()),
            Side::Right => (right.clone(), left.clone()),
        };
        conflicts.record(ConflictRecord {
            id: id.to_string(),
            policy: resolver.name().to_string(),
            kept: side,
            discarded: DiscardedCopy::Pattern(discarded),
        });
        patterns.insert(id.clone(), kept);
    }

    let mut relationships = f1.relationship_map().clone();
    for (id, right) in f2.relationship_map() {
        let Some(left) = relationships.get(id) else {
            relationships.insert(id.clone(), right.clone());
            continue;
        };
        if left.same_content(right) {
            continue;
        }
        let side = resolver.resolve_relationship(left, right);
        let (kept, discarded) = match side {
            Side::Left => (left.clone(), right.clone()),
            Side::Right => (right.clone(), left.clone()),
        };
        conflicts.record(ConflictRecord {
            id: id.to_string(),
            policy: resolver.name().to_string(),
            kept: side,
            discarded: DiscardedCopy::Relationship(discarded),
        });
        relationships.insert(id.clone(), kept);
    }

    debug!(
        policy = resolver.name(),
        conflicts = conflicts.len(),
        "overlay resolved conflicts"
    );
    let name = format!("overlay({}, {})", f1.name(), f2.name());
    Ok(OverlayResult {
        instance: finish("overlay", name, patterns, relationships),
        conflicts,
    })
}
