//! Field values as supplied by the host store.

use std::fmt;

use chrono::{DateTime, FixedOffset};
use rustc_hash::FxHashMap;

use crate::ObjectId;

/// A single field value.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// No value set.
    Null,
    /// Text value.
    Text(String),
    /// Integer value.
    Integer(i64),
    /// Floating point value.
    Float(f64),
    /// Boolean value.
    Bool(bool),
    /// Date and time with offset.
    Date(DateTime<FixedOffset>),
    /// Ordered list of related object ids.
    Relations(Vec<ObjectId>),
    /// Ordered list of relations carrying metadata.
    MetadataRelations(Vec<MetadataRelation>),
}

/// A relation to another object with an opaque metadata payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MetadataRelation {
    /// Referenced object.
    pub target: ObjectId,
    /// Metadata columns in the order the host supplies them.
    pub metadata: Vec<(String, String)>,
}

impl MetadataRelation {
    /// Create a relation without metadata.
    pub fn new(target: ObjectId) -> Self {
        Self {
            target,
            metadata: Vec::new(),
        }
    }

    /// Append a metadata column.
    pub fn with(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.metadata.push((name.into(), value.into()));
        self
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Text(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Text(s)
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::Integer(v)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Float(v)
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Bool(v)
    }
}

impl From<DateTime<FixedOffset>> for Value {
    fn from(d: DateTime<FixedOffset>) -> Self {
        Value::Date(d)
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => Ok(()),
            Value::Text(s) => f.write_str(s),
            Value::Integer(v) => write!(f, "{}", v),
            Value::Float(v) => write!(f, "{}", v),
            Value::Bool(v) => f.write_str(if *v { "1" } else { "0" }),
            Value::Date(d) => f.write_str(&d.to_rfc3339()),
            Value::Relations(ids) => write!(f, "Relations[{}]", ids.len()),
            Value::MetadataRelations(rels) => write!(f, "MetadataRelations[{}]", rels.len()),
        }
    }
}

/// Stored value of one field: either plain or one value per language.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Plain(Value),
    Localized(FxHashMap<String, Value>),
}

impl FieldValue {
    /// Resolve the value for an optional language.
    ///
    /// Localized values need a language; plain values ignore it.
    pub fn get(&self, language: Option<&str>) -> Option<&Value> {
        match (self, language) {
            (FieldValue::Plain(v), _) => Some(v),
            (FieldValue::Localized(map), Some(lang)) => map.get(lang),
            (FieldValue::Localized(_), None) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_value_display() {
        assert_eq!(Value::from("hello").to_string(), "hello");
        assert_eq!(Value::Integer(42).to_string(), "42");
        assert_eq!(Value::Float(1.5).to_string(), "1.5");
        assert_eq!(Value::Null.to_string(), "");

        let date = DateTime::parse_from_rfc3339("2024-01-01T00:00:00+00:00").unwrap();
        assert_eq!(Value::Date(date).to_string(), "2024-01-01T00:00:00+00:00");
    }

    #[test]
    fn test_field_value_language() {
        let plain = FieldValue::Plain(Value::from("x"));
        assert_eq!(plain.get(None), Some(&Value::from("x")));
        assert_eq!(plain.get(Some("de")), Some(&Value::from("x")));

        let mut map = FxHashMap::default();
        map.insert("en".to_string(), Value::from("Hello"));
        let localized = FieldValue::Localized(map);
        assert_eq!(localized.get(Some("en")), Some(&Value::from("Hello")));
        assert_eq!(localized.get(Some("de")), None);
        assert_eq!(localized.get(None), None);
    }
}
