//! Per-query multi-search responses.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// One sub-query's response, with the requested `from`/`size` injected into its
/// `hits` section.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SearchResponse {
    raw: Value,
}

impl SearchResponse {
    pub fn new(raw: Value) -> Self {
        Self { raw }
    }

    /// The `hits` section.
    pub fn hits(&self) -> Option<&Map<String, Value>> {
        self.raw.get("hits").and_then(Value::as_object)
    }

    /// The individual hits of this page.
    pub fn hit_list(&self) -> &[Value] {
        self.hits()
            .and_then(|hits| hits.get("hits"))
            .and_then(Value::as_array)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Total matching documents, accepting both `total: n` and `total: {value: n}`.
    pub fn total(&self) -> Option<u64> {
        let total = self.hits()?.get("total")?;
        total
            .as_u64()
            .or_else(|| total.get("value").and_then(Value::as_u64))
    }

    /// Offset of this page.
    pub fn from(&self) -> Option<u64> {
        self.hits()?.get("from")?.as_u64()
    }

    /// Page size of this page.
    pub fn size(&self) -> Option<u64> {
        self.hits()?.get("size")?.as_u64()
    }

    /// Engine error reported for this sub-query, if any.
    pub fn error(&self) -> Option<&Value> {
        self.raw.get("error")
    }

    pub fn raw(&self) -> &Value {
        &self.raw
    }

    pub fn into_value(self) -> Value {
        self.raw
    }

    /// Write pagination into the `hits` section, creating it if absent.
    pub(crate) fn inject_page(&mut self, from: usize, size: usize) {
        if !self.raw.is_object() {
            self.raw = Value::Object(Map::new());
        }
        let Value::Object(root) = &mut self.raw else {
            return;
        };
        let hits = root
            .entry("hits")
            .or_insert_with(|| Value::Object(Map::new()));
        if !hits.is_object() {
            *hits = Value::Object(Map::new());
        }
        if let Value::Object(hits) = hits {
            hits.insert("from".to_string(), Value::from(from));
            hits.insert("size".to_string(), Value::from(size));
        }
    }
}
