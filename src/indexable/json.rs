//! A configurable record kind over raw JSON objects.
//!
//! Used by the CLI to index JSON Lines exports without writing a dedicated
//! [`Indexable`] implementation.

use std::fs::File;
use std::io::BufReader;
use std::path::PathBuf;

use serde_json::{Map, Value};

use crate::config::IndexingSettings;
use crate::connection::RequestParams;
use crate::document::{Document, FieldValue, TypeMapping};
use crate::error::{Result, SyncError};
use crate::indexable::Indexable;
use crate::indexable::source::JsonLinesSource;

/// Record kind whose records are JSON objects.
#[derive(Debug, Clone)]
pub struct JsonRecordKind {
    index: String,
    doc_type: String,
    id_field: String,
    exclude_field: Option<String>,
    routing_field: Option<String>,
    mapping: TypeMapping,
    settings: IndexingSettings,
    path: Option<PathBuf>,
}

impl JsonRecordKind {
    /// Create a kind targeting `index`/`doc_type`, identified by the `id` field.
    pub fn new<I: Into<String>, T: Into<String>>(index: I, doc_type: T) -> Self {
        Self {
            index: index.into(),
            doc_type: doc_type.into(),
            id_field: "id".to_string(),
            exclude_field: None,
            routing_field: None,
            mapping: TypeMapping::default(),
            settings: IndexingSettings::default(),
            path: None,
        }
    }

    /// Field holding the document id.
    pub fn with_id_field<S: Into<String>>(mut self, field: S) -> Self {
        self.id_field = field.into();
        self
    }

    /// Records whose `field` is `true` are excluded from the index.
    pub fn with_exclude_field<S: Into<String>>(mut self, field: S) -> Self {
        self.exclude_field = Some(field.into());
        self
    }

    /// Field whose value is sent as the routing parameter.
    pub fn with_routing_field<S: Into<String>>(mut self, field: S) -> Self {
        self.routing_field = Some(field.into());
        self
    }

    /// Explicit type mapping.
    pub fn with_mapping(mut self, mapping: TypeMapping) -> Self {
        self.mapping = mapping;
        self
    }

    /// Bulk and query limits.
    pub fn with_settings(mut self, settings: IndexingSettings) -> Self {
        self.settings = settings;
        self
    }

    /// JSON Lines file opened by [`Indexable::records`].
    pub fn with_path<P: Into<PathBuf>>(mut self, path: P) -> Self {
        self.path = Some(path.into());
        self
    }

    fn scalar_to_string(value: &Value) -> Option<String> {
        match value {
            Value::String(s) => Some(s.clone()),
            Value::Number(n) => Some(n.to_string()),
            _ => None,
        }
    }
}

impl Indexable for JsonRecordKind {
    type Record = Map<String, Value>;
    type Source = JsonLinesSource<BufReader<File>>;

    fn index_name(&self) -> &str {
        &self.index
    }

    fn type_name(&self) -> &str {
        &self.doc_type
    }

    fn document_id(&self, record: &Self::Record) -> Result<String> {
        record
            .get(&self.id_field)
            .and_then(Self::scalar_to_string)
            .filter(|id| !id.is_empty())
            .ok_or_else(|| {
                SyncError::invalid_argument(format!(
                    "record has no string or numeric '{}' field",
                    self.id_field
                ))
            })
    }

    fn document(&self, record: &Self::Record) -> Result<Document> {
        self.document_id(record)?;

        let mut doc = Document::new();
        for (name, value) in record {
            doc.add_field(name.clone(), FieldValue::from(value.clone()));
        }
        Ok(doc)
    }

    fn records(&self) -> Result<Self::Source> {
        let path = self.path.as_ref().ok_or_else(|| {
            SyncError::unsupported(format!(
                "no record file configured for index '{}'",
                self.index
            ))
        })?;
        Ok(JsonLinesSource::new(BufReader::new(File::open(path)?)))
    }

    fn type_mapping(&self) -> TypeMapping {
        self.mapping.clone()
    }

    fn should_index(&self, record: &Self::Record) -> bool {
        match &self.exclude_field {
            Some(field) => record.get(field).and_then(Value::as_bool) != Some(true),
            None => true,
        }
    }

    fn request_params(&self, record: &Self::Record) -> RequestParams {
        let mut params = RequestParams::new();
        if let Some(routing) = self
            .routing_field
            .as_ref()
            .and_then(|field| record.get(field))
            .and_then(Self::scalar_to_string)
        {
            params.insert("routing".to_string(), Value::String(routing));
        }
        params
    }

    fn bulk_index_limit(&self) -> usize {
        self.settings.bulk_index_limit
    }

    fn query_limit(&self) -> usize {
        self.settings.query_limit
    }
}
