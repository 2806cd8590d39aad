//! Property-based tests for the relationship store.
//!
//! - Every stored relationship has strength and confidence in [0, 1].
//! - A rejected add leaves the store unchanged.

use proptest::prelude::*;

use weave_core::models::{Pattern, Relationship};
use weave_core::{PatternKind, WeaveErrorCode};
use weave_store::{Catalog, RelationshipQuery};

fn catalog() -> Catalog {
    let catalog = Catalog::default();
    catalog.register(Pattern::new("prop", "Prop", PatternKind::Property)).unwrap();
    catalog.register(Pattern::new("proc", "Proc", PatternKind::Process)).unwrap();
    catalog
        .register(Pattern::new("persp", "Persp", PatternKind::Perspective))
        .unwrap();
    catalog
}

proptest! {
    #[test]
    fn prop_stored_values_stay_in_unit_interval(
        values in prop::collection::vec((-0.5f64..1.5, -0.5f64..1.5), 1..40),
    ) {
        let catalog = catalog();
        for (i, (strength, confidence)) in values.iter().enumerate() {
            let rel = Relationship::new(format!("r{i}"), *strength)
                .with_confidence(*confidence)
                .with_property("prop")
                .with_process("proc");
            let before = catalog.relationship_count().unwrap();
            let in_range = (0.0..=1.0).contains(strength) && (0.0..=1.0).contains(confidence);
            match catalog.add_relationship(rel) {
                Ok(()) => prop_assert!(in_range),
                Err(e) => {
                    prop_assert!(!in_range);
                    prop_assert_eq!(e.error_code(), "VALIDATION_ERROR");
                    prop_assert_eq!(catalog.relationship_count().unwrap(), before);
                }
            }
        }

        for rel in catalog.query_relationships(RelationshipQuery::new()).unwrap() {
            prop_assert!((0.0..=1.0).contains(&rel.strength));
            prop_assert!((0.0..=1.0).contains(&rel.confidence));
        }
    }

    #[test]
    fn prop_bulk_import_partitions_input(
        strengths in prop::collection::vec(-1.0f64..2.0, 0..30),
    ) {
        let catalog = catalog();
        let batch: Vec<_> = strengths
            .iter()
            .enumerate()
            .map(|(i, s)| {
                Relationship::new(format!("r{i}"), *s)
                    .with_process("proc")
                    .with_perspective("persp")
            })
            .collect();
        let report = catalog.bulk_import(batch).unwrap();
        let valid = strengths.iter().filter(|s| (0.0..=1.0).contains(*s)).count();
        prop_assert_eq!(report.imported.len(), valid);
        prop_assert_eq!(report.total(), strengths.len());
        prop_assert_eq!(catalog.relationship_count().unwrap(), valid);
    }
}
