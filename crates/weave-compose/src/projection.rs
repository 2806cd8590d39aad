//! Dimension projection.

use std::collections::BTreeSet;

use weave_core::models::FrameworkInstance;
use weave_core::PatternKind;

use crate::algebra::finish;

/// Restrict `f` to the patterns whose kind is in `dims`.
///
/// A relationship survives only when every populated reference lies inside
/// `dims`; it is never truncated to fewer anchors.
pub fn projection<I>(f: &FrameworkInstance, dims: I) -> FrameworkInstance
where
    I: IntoIterator<Item = PatternKind>,
{
    let dims: BTreeSet<PatternKind> = dims.into_iter().collect();

    let patterns = f
        .pattern_map()
        .iter()
        .filter(|(_, p)| dims.contains(&p.kind()))
        .map(|(id, p)| (id.clone(), p.clone()))
        .collect();
    let relationships = f
        .relationship_map()
        .iter()
        .filter(|(_, r)| r.dimensions().all(|kind| dims.contains(&kind)))
        .map(|(id, r)| (id.clone(), r.clone()))
        .collect();

    let label = dims.iter().map(|kind| kind.as_str()).collect::<Vec<_>>().join("+");
    finish(
        "projection",
        format!("projection({}, {label})", f.name()),
        patterns,
        relationships,
    )
}
