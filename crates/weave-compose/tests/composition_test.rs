//! End-to-end composition scenarios over catalog snapshots.

use std::collections::BTreeMap;

use weave_compose::{
    difference, hot_swap, intersection, overlay, overlay_with, projection, union, ConflictPolicy,
    DiscardedCopy, Side,
};
use weave_core::models::{FrameworkInstance, Pattern, Relationship};
use weave_core::{CompositionError, PatternId, PatternKind, RelationshipId};
use weave_store::Catalog;

// ─── Fixtures ────────────────────────────────────────────────────────────────

fn security() -> FrameworkInstance {
    let catalog = Catalog::default();
    catalog
        .register(Pattern::new("confidentiality", "Confidentiality", PatternKind::Property).with_domain("security"))
        .unwrap();
    catalog
        .register(Pattern::new("threat-modeling", "Threat modeling", PatternKind::Process).with_domain("security"))
        .unwrap();
    catalog
        .register(Pattern::new("attacker", "Attacker", PatternKind::Perspective).with_domain("security"))
        .unwrap();
    catalog
        .add_relationship(
            Relationship::new("s1", 0.9)
                .with_property("confidentiality")
                .with_process("threat-modeling"),
        )
        .unwrap();
    catalog
        .add_relationship(
            Relationship::new("s2", 0.6)
                .with_property("confidentiality")
                .with_process("threat-modeling")
                .with_perspective("attacker"),
        )
        .unwrap();
    catalog.snapshot("security").unwrap()
}

fn operations() -> FrameworkInstance {
    FrameworkInstance::new(
        "operations",
        vec![
            Pattern::new("availability", "Availability", PatternKind::Property).with_domain("ops"),
            Pattern::new("threat-modeling", "Threat modeling", PatternKind::Process).with_domain("security"),
            Pattern::new("operator", "Operator", PatternKind::Perspective).with_domain("ops"),
        ],
        vec![Relationship::new("o1", 0.4)
            .with_property("availability")
            .with_process("threat-modeling")
            .with_perspective("operator")],
    )
    .unwrap()
}

fn rel_ids(f: &FrameworkInstance) -> Vec<String> {
    f.relationship_ids().into_iter().map(|id| id.to_string()).collect()
}

// ─── Set algebra ─────────────────────────────────────────────────────────────

#[test]
fn union_keeps_everything_from_both_sides() {
    let sec = security();
    let ops = operations();
    let merged = union(&sec, &ops).unwrap();
    assert_eq!(merged.pattern_count(), 5);
    assert_eq!(rel_ids(&merged), ["o1", "s1", "s2"]);
}

#[test]
fn intersection_and_difference_split_shared_ids() {
    let sec = security();
    let ops = operations();
    let shared = intersection(&sec, &ops).unwrap();
    assert_eq!(
        shared.pattern_ids().into_iter().collect::<Vec<_>>(),
        vec![PatternId::from("threat-modeling")]
    );
    assert_eq!(shared.relationship_count(), 0);

    let only_sec = difference(&sec, &ops);
    assert_eq!(only_sec.pattern_count(), 2);
    assert_eq!(only_sec.relationship_count(), 0);
}

// ─── Overlay ─────────────────────────────────────────────────────────────────

#[test]
fn overlay_with_kind_conflict_fails() {
    let f1 = FrameworkInstance::new("f1", vec![Pattern::new("x", "X", PatternKind::Property)], vec![]).unwrap();
    let f2 = FrameworkInstance::new("f2", vec![Pattern::new("x", "X", PatternKind::Process)], vec![]).unwrap();
    let err = overlay(&f1, &f2).unwrap_err();
    assert!(matches!(err, CompositionError::KindConflict { ref id, .. } if id == "x"));
}

#[test]
fn overlay_logs_conflict_and_keeps_first_operand() {
    let f1 = FrameworkInstance::new(
        "f1",
        vec![Pattern::new("x", "X", PatternKind::Property).with_description("original")],
        vec![],
    )
    .unwrap();
    let f2 = FrameworkInstance::new(
        "f2",
        vec![Pattern::new("x", "X", PatternKind::Property).with_description("rewritten")],
        vec![],
    )
    .unwrap();

    let result = overlay(&f1, &f2).unwrap();
    let kept = result.instance.get_pattern(&"x".into()).unwrap();
    assert_eq!(kept.description, "original");

    let record = result.conflicts.for_id("x").unwrap();
    assert_eq!(record.kept, Side::Left);
    assert_eq!(record.policy, "first-wins");
    match &record.discarded {
        DiscardedCopy::Pattern(p) => assert_eq!(p.description, "rewritten"),
        other => panic!("unexpected discarded copy: {other:?}"),
    }

    let flipped = overlay_with(&f1, &f2, &ConflictPolicy::SecondWins).unwrap();
    assert_eq!(
        flipped.instance.get_pattern(&"x".into()).unwrap().description,
        "rewritten"
    );
}

#[test]
fn overlay_of_identical_copies_records_nothing() {
    let sec = security();
    let result = overlay(&sec, &sec.clone()).unwrap();
    assert!(result.conflicts.is_empty());
    assert_eq!(result.instance, sec);
}

#[test]
fn overlay_then_projection_onto_first_dimensions_keeps_first_relationships() {
    let sec = security();
    let ops = operations();
    let result = overlay(&sec, &ops).unwrap();
    let projected = projection(&result.instance, sec.dimensions());
    for id in sec.relationship_ids() {
        assert!(projected.contains_relationship(&id), "missing {id}");
    }
}

// ─── Hot-swap ────────────────────────────────────────────────────────────────

#[test]
fn hot_swap_with_identity_remap_restores_relationships() {
    let sec = security();
    let originals: Vec<Pattern> = sec.patterns_of(PatternKind::Process).cloned().collect();
    let identity: BTreeMap<PatternId, PatternId> =
        originals.iter().map(|p| (p.id.clone(), p.id.clone())).collect();

    let outcome = hot_swap(&sec, PatternKind::Process, originals, &identity).unwrap();
    assert_eq!(outcome.instance.relationship_ids(), sec.relationship_ids());
    assert!(outcome.dropped.is_empty());
}

#[test]
fn hot_swap_without_remap_drops_exactly_the_affected_relationships() {
    let sec = security();
    let outcome = hot_swap(
        &sec,
        PatternKind::Perspective,
        vec![Pattern::new("defender", "Defender", PatternKind::Perspective)],
        &BTreeMap::new(),
    )
    .unwrap();

    assert_eq!(outcome.dropped, vec![RelationshipId::from("s2")]);
    assert_eq!(rel_ids(&outcome.instance), ["s1"]);
    assert!(outcome.instance.contains_pattern(&"defender".into()));
    assert!(!outcome.instance.contains_pattern(&"attacker".into()));
}

#[test]
fn hot_swap_rejects_duplicate_replacements() {
    let sec = security();
    let err = hot_swap(
        &sec,
        PatternKind::Perspective,
        vec![
            Pattern::new("defender", "Defender", PatternKind::Perspective),
            Pattern::new("defender", "Again", PatternKind::Perspective),
        ],
        &BTreeMap::new(),
    )
    .unwrap_err();
    assert_eq!(err.rule(), "duplicate_input");
}
