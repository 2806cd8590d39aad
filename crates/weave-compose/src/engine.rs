//! Config-driven front door to the composition operators.

use std::collections::BTreeMap;

use weave_core::config::CompositionConfig;
use weave_core::models::{FrameworkInstance, Pattern};
use weave_core::{CompositionError, PatternId, PatternKind, WeaveResult};

use crate::algebra;
use crate::hot_swap::{self, HotSwapOutcome};
use crate::overlay::{self, OverlayResult};
use crate::policy::ConflictResolver;
use crate::projection;

/// Stateless apart from its config; cheap to clone and share across threads.
#[derive(Debug, Clone, Default)]
pub struct CompositionEngine {
    config: CompositionConfig,
}

impl CompositionEngine {
    pub fn new(config: CompositionConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &CompositionConfig {
        &self.config
    }

    pub fn union(&self, f1: &FrameworkInstance, f2: &FrameworkInstance) -> Result<FrameworkInstance, CompositionError> {
        algebra::union(f1, f2)
    }

    pub fn intersection(
        &self,
        f1: &FrameworkInstance,
        f2: &FrameworkInstance,
    ) -> Result<FrameworkInstance, CompositionError> {
        algebra::intersection(f1, f2)
    }

    pub fn difference(&self, f1: &FrameworkInstance, f2: &FrameworkInstance) -> FrameworkInstance {
        algebra::difference(f1, f2)
    }

    /// Overlay under the configured conflict policy.
    pub fn overlay(&self, f1: &FrameworkInstance, f2: &FrameworkInstance) -> Result<OverlayResult, CompositionError> {
        overlay::overlay_with(f1, f2, &self.config.conflict_policy)
    }

    /// Overlay under a caller-supplied policy, ignoring the configured one.
    pub fn overlay_with(
        &self,
        f1: &FrameworkInstance,
        f2: &FrameworkInstance,
        resolver: &dyn ConflictResolver,
    ) -> Result<OverlayResult, CompositionError> {
        overlay::overlay_with(f1, f2, resolver)
    }

    pub fn projection<I>(&self, f: &FrameworkInstance, dims: I) -> FrameworkInstance
    where
        I: IntoIterator<Item = PatternKind>,
    {
        projection::projection(f, dims)
    }

    pub fn hot_swap(
        &self,
        f: &FrameworkInstance,
        dimension: PatternKind,
        replacements: Vec<Pattern>,
        remap: &BTreeMap<PatternId, PatternId>,
    ) -> WeaveResult<HotSwapOutcome> {
        hot_swap::hot_swap(f, dimension, replacements, remap)
    }
}
