//! Import/export records.
//!
//! Records are the untyped boundary schema shared with the importer and the
//! renderer: kinds are plain strings and metadata is arbitrary JSON. Turning a
//! record into a model value is where kind tags and metadata get validated.

use serde::{Deserialize, Serialize};

use crate::constants::DEFAULT_CONFIDENCE;
use crate::errors::{ValidationError, WeaveResult};
use crate::models::{Pattern, Relationship};
use crate::types::identifiers::{PatternId, RelationshipId};
use crate::types::kind::PatternKind;
use crate::types::metadata::{metadata_from_json, metadata_to_json};

fn default_confidence() -> f64 {
    DEFAULT_CONFIDENCE
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PatternRecord {
    pub id: String,
    pub name: String,
    pub kind: String,
    #[serde(default)]
    pub domain: Option<String>,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub metadata: serde_json::Value,
}

impl PatternRecord {
    /// Validate and convert. Records without a domain inherit `default_domain`.
    pub fn into_pattern(
        self,
        default_domain: Option<&str>,
        max_metadata_depth: usize,
    ) -> Result<Pattern, ValidationError> {
        let kind: PatternKind = self.kind.parse()?;
        let metadata = metadata_from_json(self.metadata, max_metadata_depth)?;

        let mut pattern = Pattern::new(self.id, self.name, kind)
            .with_description(self.description)
            .with_tags(self.tags);
        pattern.domain = self.domain.or_else(|| default_domain.map(str::to_string));
        pattern.metadata = metadata;
        pattern.validate(max_metadata_depth)?;
        Ok(pattern)
    }
}

impl From<&Pattern> for PatternRecord {
    fn from(pattern: &Pattern) -> Self {
        Self {
            id: pattern.id.to_string(),
            name: pattern.name.clone(),
            kind: pattern.kind().to_string(),
            domain: pattern.domain.clone(),
            description: pattern.description.clone(),
            tags: pattern.tags.iter().cloned().collect(),
            metadata: metadata_to_json(&pattern.metadata),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RelationshipRecord {
    pub id: String,
    #[serde(default)]
    pub property_id: Option<String>,
    #[serde(default)]
    pub process_id: Option<String>,
    #[serde(default)]
    pub perspective_id: Option<String>,
    pub strength: f64,
    #[serde(default = "default_confidence")]
    pub confidence: f64,
    #[serde(default)]
    pub bidirectional: bool,
    #[serde(default)]
    pub context: Option<String>,
    #[serde(default)]
    pub evidence: Vec<String>,
    #[serde(default)]
    pub metadata: serde_json::Value,
}

impl RelationshipRecord {
    /// Convert, validating metadata. Shape and reference checks belong to
    /// the store, which has the registry at hand.
    pub fn into_relationship(self, max_metadata_depth: usize) -> Result<Relationship, ValidationError> {
        let metadata = metadata_from_json(self.metadata, max_metadata_depth)?;
        let mut relationship = Relationship::new(RelationshipId::new(self.id), self.strength)
            .with_confidence(self.confidence)
            .with_bidirectional(self.bidirectional);
        relationship.property = self.property_id.map(PatternId::new);
        relationship.process = self.process_id.map(PatternId::new);
        relationship.perspective = self.perspective_id.map(PatternId::new);
        relationship.context = self.context;
        relationship.evidence = self.evidence;
        relationship.metadata = metadata;
        Ok(relationship)
    }
}

impl From<&Relationship> for RelationshipRecord {
    fn from(rel: &Relationship) -> Self {
        Self {
            id: rel.id.to_string(),
            property_id: rel.property.as_ref().map(ToString::to_string),
            process_id: rel.process.as_ref().map(ToString::to_string),
            perspective_id: rel.perspective.as_ref().map(ToString::to_string),
            strength: rel.strength,
            confidence: rel.confidence,
            bidirectional: rel.bidirectional,
            context: rel.context.clone(),
            evidence: rel.evidence.clone(),
            metadata: metadata_to_json(&rel.metadata),
        }
    }
}

/// A domain definition handed over by the importer.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DomainDefinition {
    /// Domain tag applied to patterns that do not carry their own.
    pub domain: Option<String>,
    pub patterns: Vec<PatternRecord>,
    pub relationships: Vec<RelationshipRecord>,
}

impl DomainDefinition {
    pub fn from_json(json: &str) -> WeaveResult<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

/// A framework instance in the import schema, for the renderer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FrameworkExport {
    pub name: String,
    pub patterns: Vec<PatternRecord>,
    pub relationships: Vec<RelationshipRecord>,
}

impl FrameworkExport {
    pub fn to_json(&self) -> WeaveResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}
