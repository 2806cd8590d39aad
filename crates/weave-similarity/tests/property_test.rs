//! Property-based tests for similarity and ordering.
//!
//! - similarity(a, b) == similarity(b, a) for every pair.
//! - Each cluster step appends the pattern with the highest best-anchor score.

use proptest::prelude::*;

use weave_core::config::SimilarityConfig;
use weave_core::models::{Pattern, Relationship};
use weave_core::{PatternId, PatternKind};
use weave_similarity::SimilarityEngine;

const KINDS: [PatternKind; 3] = PatternKind::ALL;
const TAGS: [&str; 4] = ["security", "ops", "data", "ux"];

fn engine_strategy() -> impl Strategy<Value = (Vec<Pattern>, Vec<Relationship>)> {
    (
        prop::collection::vec((prop::collection::btree_set(0usize..4, 0..3), prop::option::of(0usize..2)), 2..9),
        prop::collection::vec((0usize..9, 0usize..9, 0.0f64..=1.0), 0..16),
    )
        .prop_map(|(specs, links)| {
            let n = specs.len();
            let patterns: Vec<Pattern> = specs
                .iter()
                .enumerate()
                .map(|(i, (tags, domain))| {
                    let mut p = Pattern::new(format!("p{i}"), "P", KINDS[i % 3])
                        .with_tags(tags.iter().map(|t| TAGS[*t]));
                    if let Some(d) = domain {
                        p = p.with_domain(format!("d{d}"));
                    }
                    p
                })
                .collect();
            let relationships: Vec<Relationship> = links
                .iter()
                .enumerate()
                .filter(|(_, (a, b, _))| *a < n && *b < n && a % 3 != b % 3)
                .map(|(i, (a, b, strength))| {
                    let mut rel = Relationship::new(format!("r{i}"), *strength);
                    rel.set_reference(KINDS[a % 3], Some(format!("p{a}").into()));
                    rel.set_reference(KINDS[b % 3], Some(format!("p{b}").into()));
                    rel
                })
                .collect();
            (patterns, relationships)
        })
}

proptest! {
    #[test]
    fn prop_similarity_is_symmetric((patterns, relationships) in engine_strategy(), normalize in any::<bool>()) {
        let config = SimilarityConfig { normalize_relational: normalize, ..Default::default() };
        let engine = SimilarityEngine::new(patterns, relationships, config).unwrap();
        let ids: Vec<PatternId> = engine.ids().cloned().collect();
        let matrix = engine.matrix();
        for a in &ids {
            for b in &ids {
                if a == b {
                    prop_assert!(engine.similarity(a, b).is_err());
                    prop_assert_eq!(matrix.get(a, b), None);
                    continue;
                }
                let ab = engine.similarity(a, b).unwrap();
                prop_assert_eq!(ab, engine.similarity(b, a).unwrap());
                prop_assert_eq!(matrix.get(a, b), Some(ab));
            }
        }
    }

    #[test]
    fn prop_cluster_steps_are_locally_greedy((patterns, relationships) in engine_strategy()) {
        let engine = SimilarityEngine::new(patterns, relationships, SimilarityConfig::default()).unwrap();
        let order = engine.cluster_order();
        prop_assert_eq!(order.len(), engine.len());
        prop_assert_eq!(order.steps.len(), engine.len() - 1);

        let best_anchor = |candidate: &PatternId, placed: &[PatternId]| {
            placed
                .iter()
                .map(|p| engine.similarity(candidate, p).unwrap())
                .fold(f64::NEG_INFINITY, f64::max)
        };

        for (k, step) in order.steps.iter().enumerate() {
            let placed = &order.order[..=k];
            let chosen = best_anchor(&step.pattern, placed);
            prop_assert_eq!(chosen, step.score);
            prop_assert_eq!(engine.similarity(&step.pattern, &step.anchor).unwrap(), step.score);
            for other in &order.order[k + 2..] {
                prop_assert!(chosen >= best_anchor(other, placed));
            }
        }
    }
}
