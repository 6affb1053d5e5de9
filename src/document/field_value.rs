//! Field value types for documents.
//!
//! [`FieldValue`] covers everything a record can contribute to a search document:
//! strings, numbers, timestamps, nested mappings and lists. Values serialize as
//! plain JSON (no type tags), which is what the engine expects in a document body.
//!
//! ```
//! use sarissa_sync::document::field_value::FieldValue;
//!
//! let title = FieldValue::from("Rust Programming");
//! assert_eq!(title.as_text(), Some("Rust Programming"));
//!
//! let year = FieldValue::from(2024_i64);
//! assert_eq!(year.as_integer(), Some(2024));
//! ```

use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::Value;

use crate::document::document::Document;

/// Represents a value for a field in a document.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum FieldValue {
    /// Text value
    Text(String),
    /// Integer value
    Integer(i64),
    /// Unsigned integer above `i64::MAX`
    UnsignedInteger(u64),
    /// Floating point value
    Float(f64),
    /// Boolean value
    Boolean(bool),
    /// UTC timestamp, serialized as RFC 3339
    DateTime(DateTime<Utc>),
    /// Nested mapping
    Object(Document),
    /// List of values
    List(Vec<FieldValue>),
    /// Null value
    Null,
}

impl FieldValue {
    /// Get the value as text, if it is text.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            FieldValue::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Get the value as an integer, if it is one.
    pub fn as_integer(&self) -> Option<i64> {
        match self {
            FieldValue::Integer(i) => Some(*i),
            _ => None,
        }
    }

    /// Get the value as a float. Integers are widened.
    pub fn as_float(&self) -> Option<f64> {
        match self {
            FieldValue::Float(f) => Some(*f),
            FieldValue::Integer(i) => Some(*i as f64),
            FieldValue::UnsignedInteger(u) => Some(*u as f64),
            _ => None,
        }
    }

    /// Get the value as an unsigned integer. Non-negative integers are widened.
    pub fn as_unsigned(&self) -> Option<u64> {
        match self {
            FieldValue::UnsignedInteger(u) => Some(*u),
            FieldValue::Integer(i) => u64::try_from(*i).ok(),
            _ => None,
        }
    }

    /// Get the value as a boolean, if it is one.
    pub fn as_boolean(&self) -> Option<bool> {
        match self {
            FieldValue::Boolean(b) => Some(*b),
            _ => None,
        }
    }

    /// Get the value as a timestamp, if it is one.
    pub fn as_datetime(&self) -> Option<DateTime<Utc>> {
        match self {
            FieldValue::DateTime(dt) => Some(*dt),
            _ => None,
        }
    }

    /// Get the nested document, if this is an object.
    pub fn as_object(&self) -> Option<&Document> {
        match self {
            FieldValue::Object(doc) => Some(doc),
            _ => None,
        }
    }

    /// Check if this is a null value.
    pub fn is_null(&self) -> bool {
        matches!(self, FieldValue::Null)
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        FieldValue::Text(value.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        FieldValue::Text(value)
    }
}

impl From<i64> for FieldValue {
    fn from(value: i64) -> Self {
        FieldValue::Integer(value)
    }
}

impl From<u64> for FieldValue {
    fn from(value: u64) -> Self {
        match i64::try_from(value) {
            Ok(i) => FieldValue::Integer(i),
            Err(_) => FieldValue::UnsignedInteger(value),
        }
    }
}

impl From<f64> for FieldValue {
    fn from(value: f64) -> Self {
        FieldValue::Float(value)
    }
}

impl From<bool> for FieldValue {
    fn from(value: bool) -> Self {
        FieldValue::Boolean(value)
    }
}

impl From<DateTime<Utc>> for FieldValue {
    fn from(value: DateTime<Utc>) -> Self {
        FieldValue::DateTime(value)
    }
}

impl From<Document> for FieldValue {
    fn from(value: Document) -> Self {
        FieldValue::Object(value)
    }
}

impl<T: Into<FieldValue>> From<Option<T>> for FieldValue {
    fn from(value: Option<T>) -> Self {
        value.map_or(FieldValue::Null, Into::into)
    }
}

impl From<Value> for FieldValue {
    /// Convert raw JSON. Integral numbers become `Integer` (or `UnsignedInteger`
    /// above `i64::MAX`), other numbers `Float`; strings are kept as text (no
    /// timestamp sniffing).
    fn from(value: Value) -> Self {
        match value {
            Value::Null => FieldValue::Null,
            Value::Bool(b) => FieldValue::Boolean(b),
            Value::Number(n) => {
                if let Some(i) = n.as_i64() {
                    FieldValue::Integer(i)
                } else if let Some(u) = n.as_u64() {
                    FieldValue::UnsignedInteger(u)
                } else {
                    FieldValue::Float(n.as_f64().unwrap_or(f64::NAN))
                }
            }
            Value::String(s) => FieldValue::Text(s),
            Value::Array(items) => {
                FieldValue::List(items.into_iter().map(FieldValue::from).collect())
            }
            Value::Object(map) => {
                let mut doc = Document::new();
                for (name, value) in map {
                    doc.add_field(name, FieldValue::from(value));
                }
                FieldValue::Object(doc)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;
    use serde_json::json;

    use super::*;

    #[test]
    fn test_untagged_serialization() {
        let created = Utc.with_ymd_and_hms(2024, 3, 1, 12, 30, 0).unwrap();
        let values = vec![
            FieldValue::from("hello"),
            FieldValue::from(42_i64),
            FieldValue::from(true),
            FieldValue::from(created),
            FieldValue::Null,
        ];

        let json = serde_json::to_value(&values).unwrap();
        assert_eq!(
            json,
            json!(["hello", 42, true, "2024-03-01T12:30:00Z", null])
        );
    }

    #[test]
    fn test_from_json_value() {
        let value = FieldValue::from(json!({"id": 7, "score": 1.5, "tags": ["a", "b"]}));
        let doc = value.as_object().unwrap();

        assert_eq!(doc.get_field("id").and_then(|v| v.as_integer()), Some(7));
        assert_eq!(doc.get_field("score").and_then(|v| v.as_float()), Some(1.5));
        assert_eq!(
            doc.get_field("tags"),
            Some(&FieldValue::List(vec![
                FieldValue::from("a"),
                FieldValue::from("b")
            ]))
        );
    }

    #[test]
    fn test_large_unsigned_survives_conversion() {
        let raw = json!({"views": u64::MAX, "id": i64::MAX});
        let value = FieldValue::from(raw.clone());
        let doc = value.as_object().unwrap();

        assert_eq!(
            doc.get_field("views"),
            Some(&FieldValue::UnsignedInteger(u64::MAX))
        );
        assert_eq!(doc.get_field("views").and_then(|v| v.as_unsigned()), Some(u64::MAX));
        assert_eq!(serde_json::to_value(&value).unwrap(), raw);

        assert_eq!(FieldValue::from(7_u64), FieldValue::Integer(7));
    }

    #[test]
    fn test_option_conversion() {
        assert!(FieldValue::from(None::<i64>).is_null());
        assert_eq!(FieldValue::from(Some("x")).as_text(), Some("x"));
    }
}
