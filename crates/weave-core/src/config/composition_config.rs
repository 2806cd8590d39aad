//! Composition engine configuration.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Name of a built-in overlay conflict policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PolicyName {
    /// Keep the left operand's copy.
    #[default]
    FirstWins,
    /// Keep the right operand's copy.
    SecondWins,
    /// Keep the copy with the later `updated_at`; ties keep the left copy.
    MostRecent,
}

impl fmt::Display for PolicyName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::FirstWins => f.write_str("first-wins"),
            Self::SecondWins => f.write_str("second-wins"),
            Self::MostRecent => f.write_str("most-recent"),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(default)]
pub struct CompositionConfig {
    /// Policy used by `overlay` when the caller does not pick one.
    pub conflict_policy: PolicyName,
}
