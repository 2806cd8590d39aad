//! Pattern: a typed entity in one of the three dimensions.

use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::errors::ValidationError;
use crate::types::identifiers::PatternId;
use crate::types::kind::PatternKind;
use crate::types::metadata::{validate_metadata, Metadata, MetadataValue};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Pattern {
    pub id: PatternId,
    pub name: String,
    /// Private so that nothing can reassign it after construction.
    kind: PatternKind,
    #[serde(default)]
    pub domain: Option<String>,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub tags: BTreeSet<String>,
    #[serde(default)]
    pub metadata: Metadata,
    #[serde(default = "Utc::now")]
    pub created_at: DateTime<Utc>,
    #[serde(default = "Utc::now")]
    pub updated_at: DateTime<Utc>,
}

impl Pattern {
    pub fn new(id: impl Into<PatternId>, name: impl Into<String>, kind: PatternKind) -> Self {
        let now = Utc::now();
        Self {
            id: id.into(),
            name: name.into(),
            kind,
            domain: None,
            description: String::new(),
            tags: BTreeSet::new(),
            metadata: Metadata::new(),
            created_at: now,
            updated_at: now,
        }
    }

    pub fn kind(&self) -> PatternKind {
        self.kind
    }

    pub fn with_domain(mut self, domain: impl Into<String>) -> Self {
        self.domain = Some(domain.into());
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.tags.insert(tag.into());
        self
    }

    pub fn with_tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tags.extend(tags.into_iter().map(Into::into));
        self
    }

    pub fn with_metadata(mut self, key: impl Into<String>, value: impl Into<MetadataValue>) -> Self {
        self.metadata.insert(key.into(), value.into());
        self
    }

    /// Equal in every field except the timestamps.
    pub fn same_content(&self, other: &Pattern) -> bool {
        self.id == other.id
            && self.name == other.name
            && self.kind == other.kind
            && self.domain == other.domain
            && self.description == other.description
            && self.tags == other.tags
            && self.metadata == other.metadata
    }

    /// Structural checks that do not need a registry.
    pub fn validate(&self, max_metadata_depth: usize) -> Result<(), ValidationError> {
        if self.id.is_empty() {
            return Err(ValidationError::EmptyId { entity: "pattern" });
        }
        validate_metadata(&self.metadata, max_metadata_depth)
    }

    /// Merge an update into this pattern. Nothing changes on error.
    pub fn apply_update(
        &mut self,
        update: PatternUpdate,
        max_metadata_depth: usize,
    ) -> Result<(), ValidationError> {
        if update.kind.is_some() {
            return Err(ValidationError::ImmutableField { field: "kind" });
        }
        validate_metadata(&update.metadata, max_metadata_depth)?;

        if let Some(description) = update.description {
            self.description = description;
        }
        self.tags.extend(update.tags);
        self.metadata.extend(update.metadata);
        self.updated_at = Utc::now();
        Ok(())
    }
}

/// Fields that may be merged into an existing pattern.
///
/// `kind` exists only so that an update arriving from outside that tries to
/// change it can be rejected instead of silently ignored.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PatternUpdate {
    /// Replaces the description.
    pub description: Option<String>,
    /// Added to the existing tag set.
    pub tags: BTreeSet<String>,
    /// Overwrites existing keys, keeps the rest.
    pub metadata: Metadata,
    pub kind: Option<PatternKind>,
}

impl PatternUpdate {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn tag(mut self, tag: impl Into<String>) -> Self {
        self.tags.insert(tag.into());
        self
    }

    pub fn metadata(mut self, key: impl Into<String>, value: impl Into<MetadataValue>) -> Self {
        self.metadata.insert(key.into(), value.into());
        self
    }

    pub fn is_empty(&self) -> bool {
        self.description.is_none()
            && self.tags.is_empty()
            && self.metadata.is_empty()
            && self.kind.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn update_merges_tags_and_metadata() {
        let mut pattern = Pattern::new("p1", "Latency", PatternKind::Property)
            .with_tag("perf")
            .with_metadata("unit", "ms");
        let before = pattern.updated_at;

        pattern
            .apply_update(
                PatternUpdate::new()
                    .description("p99 latency")
                    .tag("slo")
                    .metadata("unit", "us")
                    .metadata("source", "apm"),
                8,
            )
            .unwrap();

        assert_eq!(pattern.description, "p99 latency");
        assert!(pattern.tags.contains("perf") && pattern.tags.contains("slo"));
        assert_eq!(pattern.metadata["unit"], MetadataValue::Text("us".into()));
        assert_eq!(pattern.metadata.len(), 2);
        assert!(pattern.updated_at >= before);
    }

    #[test]
    fn update_rejects_kind_change_and_leaves_pattern_untouched() {
        let mut pattern = Pattern::new("p1", "Latency", PatternKind::Property);
        let snapshot = pattern.clone();
        let update = PatternUpdate {
            kind: Some(PatternKind::Process),
            description: Some("changed".into()),
            ..Default::default()
        };
        let err = pattern.apply_update(update, 8).unwrap_err();
        assert_eq!(err, ValidationError::ImmutableField { field: "kind" });
        assert_eq!(pattern, snapshot);
    }

    #[test]
    fn same_content_ignores_timestamps() {
        let a = Pattern::new("x", "X", PatternKind::Process).with_description("d");
        let mut b = a.clone();
        b.updated_at = b.updated_at + chrono::Duration::seconds(5);
        assert!(a.same_content(&b));
        b.description = "other".into();
        assert!(!a.same_content(&b));
    }
}
