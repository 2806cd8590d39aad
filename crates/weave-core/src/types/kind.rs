//! PatternKind: the three dimensions a pattern can belong to.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::errors::ValidationError;

/// Closed set of pattern dimensions. Fixed at creation, never mutated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PatternKind {
    Property,
    Process,
    Perspective,
}

impl PatternKind {
    /// All dimensions in canonical order.
    pub const ALL: [PatternKind; 3] = [Self::Property, Self::Process, Self::Perspective];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Property => "property",
            Self::Process => "process",
            Self::Perspective => "perspective",
        }
    }

    /// Field name of the relationship reference slot for this dimension.
    pub fn reference_field(&self) -> &'static str {
        match self {
            Self::Property => "property_id",
            Self::Process => "process_id",
            Self::Perspective => "perspective_id",
        }
    }
}

impl fmt::Display for PatternKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PatternKind {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "property" => Ok(Self::Property),
            "process" => Ok(Self::Process),
            "perspective" => Ok(Self::Perspective),
            _ => Err(ValidationError::UnknownKind { tag: s.to_string() }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_case_insensitively() {
        assert_eq!("Property".parse::<PatternKind>().unwrap(), PatternKind::Property);
        assert_eq!(" PROCESS ".parse::<PatternKind>().unwrap(), PatternKind::Process);
        assert_eq!("perspective".parse::<PatternKind>().unwrap(), PatternKind::Perspective);
    }

    #[test]
    fn rejects_unknown_tags() {
        let err = "principle".parse::<PatternKind>().unwrap_err();
        assert!(matches!(err, ValidationError::UnknownKind { ref tag } if tag == "principle"));
    }

    #[test]
    fn display_matches_serde() {
        for kind in PatternKind::ALL {
            let json = serde_json::to_string(&kind).unwrap();
            assert_eq!(json, format!("\"{kind}\""));
        }
    }
}
