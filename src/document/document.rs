//! Document structure sent to the search engine.

use std::collections::BTreeMap;

use serde::Serialize;
use serde_json::Value;

use crate::document::field_value::FieldValue;
use crate::error::Result;

/// A document is the serialized field mapping that represents one record.
///
/// Documents are built per indexing call and dropped afterwards; nothing in the
/// crate retains them. Fields are kept in name order so the emitted JSON is stable.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Document {
    fields: BTreeMap<String, FieldValue>,
}

impl Document {
    /// Create a new empty document.
    pub fn new() -> Self {
        Document {
            fields: BTreeMap::new(),
        }
    }

    /// Add a field value to the document, replacing any previous value.
    pub fn add_field<S: Into<String>, V: Into<FieldValue>>(&mut self, name: S, value: V) {
        self.fields.insert(name.into(), value.into());
    }

    /// Get a field value from the document.
    pub fn get_field(&self, name: &str) -> Option<&FieldValue> {
        self.fields.get(name)
    }

    /// Check if the document has a field.
    pub fn has_field(&self, name: &str) -> bool {
        self.fields.contains_key(name)
    }

    /// Remove a field from the document.
    pub fn remove_field(&mut self, name: &str) -> Option<FieldValue> {
        self.fields.remove(name)
    }

    /// Get all field names.
    pub fn field_names(&self) -> Vec<&str> {
        self.fields.keys().map(|s| s.as_str()).collect()
    }

    /// Get all field values.
    pub fn fields(&self) -> &BTreeMap<String, FieldValue> {
        &self.fields
    }

    /// Get the number of fields.
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Check if the document is empty.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Render the document as the JSON body of an index request.
    pub fn to_value(&self) -> Result<Value> {
        Ok(serde_json::to_value(self)?)
    }

    /// Create a builder for constructing documents.
    pub fn builder() -> DocumentBuilder {
        DocumentBuilder::new()
    }
}

/// A builder for constructing documents in a fluent manner.
#[derive(Debug, Default)]
pub struct DocumentBuilder {
    document: Document,
}

impl DocumentBuilder {
    /// Create a new document builder.
    pub fn new() -> Self {
        DocumentBuilder {
            document: Document::new(),
        }
    }

    /// Add a field of any convertible type.
    pub fn field<S: Into<String>, V: Into<FieldValue>>(mut self, name: S, value: V) -> Self {
        self.document.add_field(name, value);
        self
    }

    /// Add a text field.
    pub fn add_text<S: Into<String>, T: Into<String>>(self, name: S, value: T) -> Self {
        self.field(name, FieldValue::Text(value.into()))
    }

    /// Add an integer field.
    pub fn add_integer<S: Into<String>>(self, name: S, value: i64) -> Self {
        self.field(name, FieldValue::Integer(value))
    }

    /// Add a nested object field.
    pub fn add_object<S: Into<String>>(self, name: S, value: Document) -> Self {
        self.field(name, FieldValue::Object(value))
    }

    /// Build the document.
    pub fn build(self) -> Document {
        self.document
    }
}
