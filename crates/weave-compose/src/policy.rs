//! Conflict resolution for `overlay`.
//!
//! A conflict is one id present in both operands with different content.
//! The resolver picks which copy survives; the other one is written to the
//! [`ConflictLog`] so nothing disappears silently.

use serde::Serialize;

use weave_core::config::PolicyName;
use weave_core::models::{Pattern, Relationship};

/// Which operand's copy survives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    Left,
    Right,
}

/// Named, swappable overlay policy.
pub trait ConflictResolver: Send + Sync {
    fn name(&self) -> &str;
    fn resolve_pattern(&self, left: &Pattern, right: &Pattern) -> Side;
    fn resolve_relationship(&self, left: &Relationship, right: &Relationship) -> Side;
}

/// Built-in policies, selectable from config.
pub type ConflictPolicy = PolicyName;

impl ConflictResolver for PolicyName {
    fn name(&self) -> &str {
        match self {
            Self::FirstWins => "first-wins",
            Self::SecondWins => "second-wins",
            Self::MostRecent => "most-recent",
        }
    }

    fn resolve_pattern(&self, left: &Pattern, right: &Pattern) -> Side {
        match self {
            Self::FirstWins => Side::Left,
            Self::SecondWins => Side::Right,
            Self::MostRecent if right.updated_at > left.updated_at => Side::Right,
            Self::MostRecent => Side::Left,
        }
    }

    fn resolve_relationship(&self, left: &Relationship, right: &Relationship) -> Side {
        match self {
            Self::FirstWins => Side::Left,
            Self::SecondWins => Side::Right,
            Self::MostRecent if right.updated_at > left.updated_at => Side::Right,
            Self::MostRecent => Side::Left,
        }
    }
}

/// The copy that lost a conflict.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "entity", content = "copy", rename_all = "lowercase")]
pub enum DiscardedCopy {
    Pattern(Pattern),
    Relationship(Relationship),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConflictRecord {
    pub id: String,
    pub policy: String,
    pub kept: Side,
    pub discarded: DiscardedCopy,
}

/// Ordered record of every conflict an overlay resolved.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct ConflictLog {
    entries: Vec<ConflictRecord>,
}

impl ConflictLog {
    pub(crate) fn record(&mut self, record: ConflictRecord) {
        self.entries.push(record);
    }

    pub fn iter(&self) -> impl Iterator<Item = &ConflictRecord> + '_ {
        self.entries.iter()
    }

    pub fn for_id(&self, id: &str) -> Option<&ConflictRecord> {
        self.entries.iter().find(|r| r.id == id)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
