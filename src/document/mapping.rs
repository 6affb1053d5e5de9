//! Type mappings describing how the engine should interpret a record kind's fields.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Schema descriptor for one record kind.
///
/// An empty mapping serializes to `{}`, which leaves the engine to infer the
/// schema dynamically.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypeMapping {
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub properties: BTreeMap<String, FieldMapping>,
}

/// Mapping for a single field: a typed leaf, a typed object or a plain object.
///
/// Variants are matched in declaration order, so `TypedObject` precedes `Typed`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldMapping {
    /// Object field with an explicit type, such as `{"type": "nested", "properties": {...}}`.
    TypedObject {
        #[serde(rename = "type")]
        field_type: String,
        properties: BTreeMap<String, FieldMapping>,
    },
    /// Leaf field such as `{"type": "date", "format": "dateOptionalTime"}`.
    Typed {
        #[serde(rename = "type")]
        field_type: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        format: Option<String>,
    },
    /// Nested object with its own properties.
    Object {
        properties: BTreeMap<String, FieldMapping>,
    },
}

impl FieldMapping {
    /// A leaf field of the given engine type.
    pub fn typed<S: Into<String>>(field_type: S) -> Self {
        FieldMapping::Typed {
            field_type: field_type.into(),
            format: None,
        }
    }

    /// A leaf field with an explicit format (dates).
    pub fn formatted<S: Into<String>, F: Into<String>>(field_type: S, format: F) -> Self {
        FieldMapping::Typed {
            field_type: field_type.into(),
            format: Some(format.into()),
        }
    }

    /// A nested object built from another mapping.
    pub fn object(mapping: TypeMapping) -> Self {
        FieldMapping::Object {
            properties: mapping.properties,
        }
    }

    /// An object of an explicit engine type (e.g. `nested`) built from another mapping.
    pub fn typed_object<S: Into<String>>(field_type: S, mapping: TypeMapping) -> Self {
        FieldMapping::TypedObject {
            field_type: field_type.into(),
            properties: mapping.properties,
        }
    }
}

impl TypeMapping {
    /// Create an empty mapping.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a field mapping (builder style).
    pub fn with_field<S: Into<String>>(mut self, name: S, mapping: FieldMapping) -> Self {
        self.properties.insert(name.into(), mapping);
        self
    }

    /// Check if the mapping declares no fields.
    pub fn is_empty(&self) -> bool {
        self.properties.is_empty()
    }
}
