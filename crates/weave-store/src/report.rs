//! Outcome reports for ingestion and removal.

use serde::{Deserialize, Serialize};

use weave_core::{PatternId, RelationshipId, WeaveError};

/// One relationship that bulk import refused.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rejection {
    pub id: String,
    /// Stable rule name, e.g. `strength_range` or `dangling_reference`.
    pub rule: String,
    pub message: String,
}

impl Rejection {
    pub(crate) fn from_error(id: impl Into<String>, error: &WeaveError) -> Self {
        Self {
            id: id.into(),
            rule: error.rule().to_string(),
            message: error.to_string(),
        }
    }
}

/// Result of a bulk relationship import. The batch never aborts; every
/// input ends up in exactly one of the two lists.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImportReport {
    pub imported: Vec<RelationshipId>,
    pub rejected: Vec<Rejection>,
}

impl ImportReport {
    pub fn is_clean(&self) -> bool {
        self.rejected.is_empty()
    }

    pub fn total(&self) -> usize {
        self.imported.len() + self.rejected.len()
    }
}

/// What removing a pattern did to the relationships that referenced it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemovalReport {
    pub pattern: PatternId,
    pub deleted: Vec<RelationshipId>,
    pub downranked: Vec<RelationshipId>,
}

/// Result of importing a whole domain definition.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DomainImportReport {
    pub domain: Option<String>,
    pub patterns_registered: Vec<PatternId>,
    pub relationships: ImportReport,
}
