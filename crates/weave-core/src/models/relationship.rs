//! Relationship: a weighted tie anchored in two or three dimensions.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::constants::{DEFAULT_CONFIDENCE, MIN_ANCHORED_DIMENSIONS};
use crate::errors::ValidationError;
use crate::types::identifiers::{PatternId, RelationshipId};
use crate::types::kind::PatternKind;
use crate::types::metadata::{validate_metadata, Metadata, MetadataValue};

fn default_confidence() -> f64 {
    DEFAULT_CONFIDENCE
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Relationship {
    pub id: RelationshipId,
    #[serde(rename = "property_id", default)]
    pub property: Option<PatternId>,
    #[serde(rename = "process_id", default)]
    pub process: Option<PatternId>,
    #[serde(rename = "perspective_id", default)]
    pub perspective: Option<PatternId>,
    /// Importance weight in [0, 1].
    pub strength: f64,
    /// Certainty in [0, 1].
    #[serde(default = "default_confidence")]
    pub confidence: f64,
    #[serde(default)]
    pub bidirectional: bool,
    #[serde(default)]
    pub context: Option<String>,
    #[serde(default)]
    pub evidence: Vec<String>,
    #[serde(default)]
    pub metadata: Metadata,
    #[serde(default = "Utc::now")]
    pub created_at: DateTime<Utc>,
    #[serde(default = "Utc::now")]
    pub updated_at: DateTime<Utc>,
}

impl Relationship {
    pub fn new(id: impl Into<RelationshipId>, strength: f64) -> Self {
        let now = Utc::now();
        Self {
            id: id.into(),
            property: None,
            process: None,
            perspective: None,
            strength,
            confidence: DEFAULT_CONFIDENCE,
            bidirectional: false,
            context: None,
            evidence: Vec::new(),
            metadata: Metadata::new(),
            created_at: now,
            updated_at: now,
        }
    }

    pub fn with_property(mut self, id: impl Into<PatternId>) -> Self {
        self.property = Some(id.into());
        self
    }

    pub fn with_process(mut self, id: impl Into<PatternId>) -> Self {
        self.process = Some(id.into());
        self
    }

    pub fn with_perspective(mut self, id: impl Into<PatternId>) -> Self {
        self.perspective = Some(id.into());
        self
    }

    pub fn with_confidence(mut self, confidence: f64) -> Self {
        self.confidence = confidence;
        self
    }

    pub fn with_bidirectional(mut self, bidirectional: bool) -> Self {
        self.bidirectional = bidirectional;
        self
    }

    pub fn with_context(mut self, context: impl Into<String>) -> Self {
        self.context = Some(context.into());
        self
    }

    pub fn with_evidence(mut self, evidence: impl Into<String>) -> Self {
        self.evidence.push(evidence.into());
        self
    }

    pub fn with_metadata(mut self, key: impl Into<String>, value: impl Into<MetadataValue>) -> Self {
        self.metadata.insert(key.into(), value.into());
        self
    }

    /// The reference slot for one dimension.
    pub fn reference(&self, kind: PatternKind) -> Option<&PatternId> {
        match kind {
            PatternKind::Property => self.property.as_ref(),
            PatternKind::Process => self.process.as_ref(),
            PatternKind::Perspective => self.perspective.as_ref(),
        }
    }

    pub fn set_reference(&mut self, kind: PatternKind, id: Option<PatternId>) {
        match kind {
            PatternKind::Property => self.property = id,
            PatternKind::Process => self.process = id,
            PatternKind::Perspective => self.perspective = id,
        }
    }

    /// Populated references in canonical dimension order.
    pub fn references(&self) -> impl Iterator<Item = (PatternKind, &PatternId)> + '_ {
        PatternKind::ALL
            .into_iter()
            .filter_map(move |kind| self.reference(kind).map(|id| (kind, id)))
    }

    pub fn references_pattern(&self, pattern_id: &PatternId) -> bool {
        self.references().any(|(_, id)| id == pattern_id)
    }

    pub fn anchored_count(&self) -> usize {
        self.references().count()
    }

    /// Dimensions this relationship is anchored in.
    pub fn dimensions(&self) -> impl Iterator<Item = PatternKind> + '_ {
        self.references().map(|(kind, _)| kind)
    }

    /// Equal in every field except the timestamps.
    pub fn same_content(&self, other: &Relationship) -> bool {
        self.id == other.id
            && self.property == other.property
            && self.process == other.process
            && self.perspective == other.perspective
            && self.strength == other.strength
            && self.confidence == other.confidence
            && self.bidirectional == other.bidirectional
            && self.context == other.context
            && self.evidence == other.evidence
            && self.metadata == other.metadata
    }

    /// Checks that need no registry: id, numeric ranges, shape, metadata.
    pub fn validate_shape(&self, max_metadata_depth: usize) -> Result<(), ValidationError> {
        if self.id.is_empty() {
            return Err(ValidationError::EmptyId {
                entity: "relationship",
            });
        }
        if !(0.0..=1.0).contains(&self.strength) {
            return Err(ValidationError::StrengthOutOfRange {
                id: self.id.to_string(),
                value: self.strength,
            });
        }
        if !(0.0..=1.0).contains(&self.confidence) {
            return Err(ValidationError::ConfidenceOutOfRange {
                id: self.id.to_string(),
                value: self.confidence,
            });
        }
        let anchored = self.anchored_count();
        if anchored < MIN_ANCHORED_DIMENSIONS {
            return Err(ValidationError::InsufficientAnchors {
                id: self.id.to_string(),
                anchored,
            });
        }
        validate_metadata(&self.metadata, max_metadata_depth)
    }

    /// Every populated reference must resolve, through `lookup`, to a
    /// pattern of the slot's kind.
    pub fn check_references<F>(&self, lookup: F) -> Result<(), ValidationError>
    where
        F: Fn(&PatternId) -> Option<PatternKind>,
    {
        for (expected, pattern_id) in self.references() {
            match lookup(pattern_id) {
                None => {
                    return Err(ValidationError::DanglingReference {
                        id: self.id.to_string(),
                        field: expected.reference_field(),
                        pattern_id: pattern_id.to_string(),
                    })
                }
                Some(found) if found != expected => {
                    return Err(ValidationError::KindMismatch {
                        id: self.id.to_string(),
                        field: expected.reference_field(),
                        pattern_id: pattern_id.to_string(),
                        expected: expected.to_string(),
                        found: found.to_string(),
                    })
                }
                Some(_) => {}
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tie(strength: f64) -> Relationship {
        Relationship::new("r1", strength)
            .with_property("p")
            .with_process("q")
    }

    #[test]
    fn accepts_closed_interval_bounds() {
        assert!(tie(0.0).validate_shape(8).is_ok());
        assert!(tie(1.0).with_confidence(0.0).validate_shape(8).is_ok());
    }

    #[test]
    fn rejects_out_of_range_and_nan() {
        assert_eq!(tie(1.01).validate_shape(8).unwrap_err().rule(), "strength_range");
        assert_eq!(tie(f64::NAN).validate_shape(8).unwrap_err().rule(), "strength_range");
        assert_eq!(
            tie(0.5).with_confidence(-0.1).validate_shape(8).unwrap_err().rule(),
            "confidence_range"
        );
    }

    #[test]
    fn single_anchor_is_malformed() {
        let rel = Relationship::new("r1", 0.5).with_property("p");
        assert_eq!(
            rel.validate_shape(8).unwrap_err(),
            ValidationError::InsufficientAnchors {
                id: "r1".into(),
                anchored: 1
            }
        );
    }

    #[test]
    fn reference_check_reports_kind_mismatch() {
        let rel = tie(0.5);
        let err = rel
            .check_references(|id| match id.as_str() {
                "p" => Some(PatternKind::Property),
                _ => Some(PatternKind::Perspective),
            })
            .unwrap_err();
        assert_eq!(err.rule(), "kind_mismatch");
    }

    #[test]
    fn serde_uses_reference_field_names() {
        let json = serde_json::to_value(tie(0.5)).unwrap();
        assert_eq!(json["property_id"], "p");
        assert_eq!(json["process_id"], "q");
        assert!(json["perspective_id"].is_null());

        let parsed: Relationship =
            serde_json::from_str(r#"{"id":"r9","process_id":"a","perspective_id":"b","strength":0.3}"#)
                .unwrap();
        assert_eq!(parsed.confidence, 1.0);
        assert_eq!(parsed.anchored_count(), 2);
    }
}
