//! Search-engine connection seam.
//!
//! The engine client itself lives outside this crate. Everything here talks to it
//! through the [`SearchConnection`] trait, constructed once by the caller and shared
//! as an `Arc<dyn SearchConnection>`. Two in-process implementations are provided:
//! [`RecordingConnection`] for tests and [`NdjsonConnection`] for exporting bulk
//! payloads without a live cluster.

pub mod ndjson;
pub mod recording;

use serde_json::{Map, Value};

use crate::error::Result;

pub use ndjson::NdjsonConnection;
pub use recording::{Call, Operation, RecordingConnection};

/// Per-request engine parameters (routing, parent, version, ...).
pub type RequestParams = Map<String, Value>;

/// The engine operations the indexing and search layers depend on.
///
/// Every call is a blocking round trip. Implementations own timeout policy; the
/// callers here never retry.
pub trait SearchConnection: Send + Sync {
    /// Index (upsert) a single document.
    fn index(
        &self,
        index: &str,
        doc_type: &str,
        document: &Value,
        id: &str,
        params: &RequestParams,
    ) -> Result<Value>;

    /// Delete a single document by id. A missing document is reported as
    /// [`SyncError::NotFound`](crate::error::SyncError::NotFound).
    fn delete(&self, index: &str, doc_type: &str, id: &str, params: &RequestParams)
    -> Result<Value>;

    /// Submit a flattened list of action headers and document bodies.
    fn bulk(&self, actions: &[Value]) -> Result<Value>;

    /// Run a flattened list of (header, body) pairs as one multi-search.
    fn msearch(&self, body: &[Value]) -> Result<Value>;
}

/// Build a bulk-API action line such as
/// `{"index": {"_index": "blog", "_type": "posts", "_id": "7"}}`.
///
/// Request params are merged into the action metadata verbatim.
pub fn action_header(
    action: &str,
    index: &str,
    doc_type: &str,
    id: &str,
    params: &RequestParams,
) -> Value {
    let mut meta = Map::new();
    meta.insert("_index".to_string(), Value::from(index));
    meta.insert("_type".to_string(), Value::from(doc_type));
    meta.insert("_id".to_string(), Value::from(id));
    for (key, value) in params {
        meta.insert(key.clone(), value.clone());
    }

    let mut header = Map::new();
    header.insert(action.to_string(), Value::Object(meta));
    Value::Object(header)
}
