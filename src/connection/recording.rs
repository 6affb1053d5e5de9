//! In-process connection that records every call.

use std::collections::VecDeque;

use parking_lot::Mutex;
use serde_json::{Value, json};

use crate::connection::{RequestParams, SearchConnection};
use crate::error::{Result, SyncError};

/// Engine operation kinds, used to count calls and to schedule failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Index,
    Delete,
    Bulk,
    MultiSearch,
}

/// One recorded engine call with its arguments.
#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    Index {
        index: String,
        doc_type: String,
        id: String,
        document: Value,
        params: RequestParams,
    },
    Delete {
        index: String,
        doc_type: String,
        id: String,
        params: RequestParams,
    },
    Bulk {
        actions: Vec<Value>,
    },
    MultiSearch {
        body: Vec<Value>,
    },
}

impl Call {
    /// The operation this call performed.
    pub fn operation(&self) -> Operation {
        match self {
            Call::Index { .. } => Operation::Index,
            Call::Delete { .. } => Operation::Delete,
            Call::Bulk { .. } => Operation::Bulk,
            Call::MultiSearch { .. } => Operation::MultiSearch,
        }
    }
}

/// A [`SearchConnection`] that stores calls instead of sending them.
///
/// Failures can be queued per operation with [`fail_next`](Self::fail_next); the
/// failing call is still recorded. Multi-search answers one empty hit set per
/// sub-query unless a canned response is set.
#[derive(Debug, Default)]
pub struct RecordingConnection {
    calls: Mutex<Vec<Call>>,
    failures: Mutex<VecDeque<(Operation, SyncError)>>,
    msearch_response: Mutex<Option<Value>>,
}

impl RecordingConnection {
    /// Create a connection with no recorded calls.
    pub fn new() -> Self {
        Self::default()
    }

    /// Make the next call of `operation` fail with `error`.
    pub fn fail_next(&self, operation: Operation, error: SyncError) {
        self.failures.lock().push_back((operation, error));
    }

    /// Answer every subsequent multi-search with `response`.
    pub fn set_msearch_response(&self, response: Value) {
        *self.msearch_response.lock() = Some(response);
    }

    /// All recorded calls, oldest first.
    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().clone()
    }

    /// Number of recorded calls of one operation.
    pub fn count(&self, operation: Operation) -> usize {
        self.calls
            .lock()
            .iter()
            .filter(|call| call.operation() == operation)
            .count()
    }

    /// The most recent call, if any.
    pub fn last_call(&self) -> Option<Call> {
        self.calls.lock().last().cloned()
    }

    /// Forget all recorded calls.
    pub fn clear(&self) {
        self.calls.lock().clear();
    }

    fn record(&self, call: Call) -> Result<()> {
        let operation = call.operation();
        self.calls.lock().push(call);

        let mut failures = self.failures.lock();
        if let Some(pos) = failures.iter().position(|(op, _)| *op == operation) {
            if let Some((_, error)) = failures.remove(pos) {
                return Err(error);
            }
        }
        Ok(())
    }
}

impl SearchConnection for RecordingConnection {
    fn index(
        &self,
        index: &str,
        doc_type: &str,
        document: &Value,
        id: &str,
        params: &RequestParams,
    ) -> Result<Value> {
        self.record(Call::Index {
            index: index.to_string(),
            doc_type: doc_type.to_string(),
            id: id.to_string(),
            document: document.clone(),
            params: params.clone(),
        })?;
        Ok(json!({"_index": index, "_type": doc_type, "_id": id, "created": true}))
    }

    fn delete(
        &self,
        index: &str,
        doc_type: &str,
        id: &str,
        params: &RequestParams,
    ) -> Result<Value> {
        self.record(Call::Delete {
            index: index.to_string(),
            doc_type: doc_type.to_string(),
            id: id.to_string(),
            params: params.clone(),
        })?;
        Ok(json!({"_index": index, "_type": doc_type, "_id": id, "found": true}))
    }

    fn bulk(&self, actions: &[Value]) -> Result<Value> {
        self.record(Call::Bulk {
            actions: actions.to_vec(),
        })?;
        Ok(json!({"errors": false, "items": []}))
    }

    fn msearch(&self, body: &[Value]) -> Result<Value> {
        self.record(Call::MultiSearch {
            body: body.to_vec(),
        })?;

        if let Some(response) = self.msearch_response.lock().clone() {
            return Ok(response);
        }
        let responses: Vec<Value> = (0..body.len() / 2)
            .map(|_| json!({"hits": {"total": 0, "hits": []}}))
            .collect();
        Ok(json!({ "responses": responses }))
    }
}
