//! # weave-compose
//!
//! Composition engine over [`FrameworkInstance`](weave_core::FrameworkInstance)
//! snapshots: id-based union, intersection and difference, overlay with a
//! named conflict policy, dimension projection, and hot-swap substitution.
//! Every operator is a pure function returning a new closed instance.

pub mod algebra;
pub mod engine;
pub mod hot_swap;
pub mod overlay;
pub mod policy;
pub mod projection;

pub use algebra::{difference, intersection, intersection_all, union, union_all};
pub use engine::CompositionEngine;
pub use hot_swap::{hot_swap, HotSwapOutcome, HotSwapStats};
pub use overlay::{overlay, overlay_with, OverlayResult};
pub use policy::{ConflictLog, ConflictPolicy, ConflictRecord, ConflictResolver, DiscardedCopy, Side};
pub use projection::projection;
