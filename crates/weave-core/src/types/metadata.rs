//! Restricted metadata values.
//!
//! Metadata is open-ended but not arbitrary: values are scalars, lists, or
//! string-keyed maps of the same, floats must be finite, keys must be
//! non-empty, and nesting is bounded.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::errors::ValidationError;

/// String-keyed metadata map, ordered by key for deterministic export.
pub type Metadata = BTreeMap<String, MetadataValue>;

/// A single metadata value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MetadataValue {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
    List(Vec<MetadataValue>),
    Map(BTreeMap<String, MetadataValue>),
}

impl MetadataValue {
    /// Nesting depth: scalars are 0, a list of scalars is 1, and so on.
    pub fn depth(&self) -> usize {
        match self {
            Self::List(items) => 1 + items.iter().map(Self::depth).max().unwrap_or(0),
            Self::Map(entries) => 1 + entries.values().map(Self::depth).max().unwrap_or(0),
            _ => 0,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Int(i) => Some(*i as f64),
            Self::Float(f) => Some(*f),
            _ => None,
        }
    }

    /// Convert an untyped JSON value, validating it on the way in.
    pub fn from_json(
        key: &str,
        value: serde_json::Value,
        max_depth: usize,
    ) -> Result<Self, ValidationError> {
        let converted = Self::convert(key, value)?;
        check_value(key, &converted, max_depth)?;
        Ok(converted)
    }

    fn convert(key: &str, value: serde_json::Value) -> Result<Self, ValidationError> {
        use serde_json::Value;

        Ok(match value {
            Value::Null => Self::Null,
            Value::Bool(b) => Self::Bool(b),
            Value::Number(n) => {
                if let Some(i) = n.as_i64() {
                    Self::Int(i)
                } else if let Some(f) = n.as_f64() {
                    Self::Float(f)
                } else {
                    return Err(ValidationError::InvalidMetadata {
                        key: key.to_string(),
                        reason: format!("unrepresentable number {n}"),
                    });
                }
            }
            Value::String(s) => Self::Text(s),
            Value::Array(items) => Self::List(
                items
                    .into_iter()
                    .map(|item| Self::convert(key, item))
                    .collect::<Result<_, _>>()?,
            ),
            Value::Object(entries) => Self::Map(
                entries
                    .into_iter()
                    .map(|(k, v)| {
                        let nested = format!("{key}.{k}");
                        Self::convert(&nested, v).map(|v| (k, v))
                    })
                    .collect::<Result<_, _>>()?,
            ),
        })
    }
}

impl From<&str> for MetadataValue {
    fn from(s: &str) -> Self {
        Self::Text(s.to_string())
    }
}

impl From<String> for MetadataValue {
    fn from(s: String) -> Self {
        Self::Text(s)
    }
}

impl From<i64> for MetadataValue {
    fn from(i: i64) -> Self {
        Self::Int(i)
    }
}

impl From<f64> for MetadataValue {
    fn from(f: f64) -> Self {
        Self::Float(f)
    }
}

impl From<bool> for MetadataValue {
    fn from(b: bool) -> Self {
        Self::Bool(b)
    }
}

impl From<&MetadataValue> for serde_json::Value {
    fn from(value: &MetadataValue) -> Self {
        match value {
            MetadataValue::Null => Self::Null,
            MetadataValue::Bool(b) => Self::Bool(*b),
            MetadataValue::Int(i) => Self::from(*i),
            MetadataValue::Float(f) => serde_json::Number::from_f64(*f)
                .map(Self::Number)
                .unwrap_or(Self::Null),
            MetadataValue::Text(s) => Self::String(s.clone()),
            MetadataValue::List(items) => Self::Array(items.iter().map(Self::from).collect()),
            MetadataValue::Map(entries) => Self::Object(
                entries
                    .iter()
                    .map(|(k, v)| (k.clone(), Self::from(v)))
                    .collect(),
            ),
        }
    }
}

/// Render a metadata map as a JSON object.
pub fn metadata_to_json(metadata: &Metadata) -> serde_json::Value {
    serde_json::Value::Object(
        metadata
            .iter()
            .map(|(k, v)| (k.clone(), serde_json::Value::from(v)))
            .collect(),
    )
}

/// Convert a JSON object (or null) into a validated metadata map.
pub fn metadata_from_json(
    value: serde_json::Value,
    max_depth: usize,
) -> Result<Metadata, ValidationError> {
    match value {
        serde_json::Value::Null => Ok(Metadata::new()),
        serde_json::Value::Object(entries) => {
            let mut metadata = Metadata::new();
            for (key, raw) in entries {
                if key.trim().is_empty() {
                    return Err(ValidationError::InvalidMetadata {
                        key,
                        reason: "empty key".to_string(),
                    });
                }
                let value = MetadataValue::from_json(&key, raw, max_depth)?;
                metadata.insert(key, value);
            }
            Ok(metadata)
        }
        other => Err(ValidationError::InvalidMetadata {
            key: String::new(),
            reason: format!("expected an object, found {}", json_type_name(&other)),
        }),
    }
}

/// Validate an already-typed metadata map.
pub fn validate_metadata(metadata: &Metadata, max_depth: usize) -> Result<(), ValidationError> {
    for (key, value) in metadata {
        if key.trim().is_empty() {
            return Err(ValidationError::InvalidMetadata {
                key: key.clone(),
                reason: "empty key".to_string(),
            });
        }
        check_value(key, value, max_depth)?;
    }
    Ok(())
}

fn check_value(key: &str, value: &MetadataValue, max_depth: usize) -> Result<(), ValidationError> {
    if value.depth() > max_depth {
        return Err(ValidationError::InvalidMetadata {
            key: key.to_string(),
            reason: format!("nesting depth {} exceeds {max_depth}", value.depth()),
        });
    }
    check_finite_and_keys(key, value)
}

fn check_finite_and_keys(key: &str, value: &MetadataValue) -> Result<(), ValidationError> {
    match value {
        MetadataValue::Float(f) if !f.is_finite() => Err(ValidationError::InvalidMetadata {
            key: key.to_string(),
            reason: format!("non-finite float {f}"),
        }),
        MetadataValue::List(items) => items.iter().try_for_each(|v| check_finite_and_keys(key, v)),
        MetadataValue::Map(entries) => entries.iter().try_for_each(|(k, v)| {
            if k.trim().is_empty() {
                return Err(ValidationError::InvalidMetadata {
                    key: key.to_string(),
                    reason: "empty nested key".to_string(),
                });
            }
            check_finite_and_keys(key, v)
        }),
        _ => Ok(()),
    }
}

fn json_type_name(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "bool",
        serde_json::Value::Number(_) => "number",
        serde_json::Value::String(_) => "string",
        serde_json::Value::Array(_) => "array",
        serde_json::Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn converts_nested_json() {
        let metadata = metadata_from_json(
            json!({"source": "iso", "weight": 3, "ratio": 0.5, "refs": ["a", "b"], "extra": {"x": true}}),
            8,
        )
        .unwrap();
        assert_eq!(metadata["source"], MetadataValue::Text("iso".into()));
        assert_eq!(metadata["weight"], MetadataValue::Int(3));
        assert_eq!(metadata["ratio"], MetadataValue::Float(0.5));
        assert_eq!(metadata["refs"].depth(), 1);
        assert_eq!(metadata["extra"].depth(), 1);
    }

    #[test]
    fn rejects_non_object_root() {
        let err = metadata_from_json(json!([1, 2]), 8).unwrap_err();
        assert_eq!(err.rule(), "invalid_metadata");
    }

    #[test]
    fn rejects_excessive_depth() {
        let err = metadata_from_json(json!({"deep": [[["x"]]]}), 2).unwrap_err();
        assert!(err.to_string().contains("deep"));
    }

    #[test]
    fn rejects_non_finite_floats_in_typed_maps() {
        let mut metadata = Metadata::new();
        metadata.insert("score".into(), MetadataValue::List(vec![MetadataValue::Float(f64::NAN)]));
        assert!(validate_metadata(&metadata, 8).is_err());
    }

    #[test]
    fn rejects_empty_keys() {
        let mut metadata = Metadata::new();
        metadata.insert(" ".into(), MetadataValue::Null);
        assert!(validate_metadata(&metadata, 8).is_err());
    }

    #[test]
    fn untagged_roundtrip_keeps_variants() {
        let value = MetadataValue::Map(BTreeMap::from([
            ("n".to_string(), MetadataValue::Int(4)),
            ("f".to_string(), MetadataValue::Float(1.25)),
        ]));
        let json = serde_json::to_string(&value).unwrap();
        let back: MetadataValue = serde_json::from_str(&json).unwrap();
        assert_eq!(back, value);
    }
}
