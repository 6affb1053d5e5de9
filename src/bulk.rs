//! Bulk indexing of a whole record set.
//!
//! A bulk pass is a rebuild, not a sync: records rejected by the inclusion policy
//! are skipped, never deleted. Records are pulled from the cursor a page at a time
//! and submitted in batches of at most `bulk_index_limit` documents.
//!
//! Batches are flushed as soon as they fill up, and a trailing partial batch is
//! flushed once at the end. No empty batch is ever submitted, so the number of
//! bulk calls is `ceil(included / bulk_index_limit)`.

use std::sync::Arc;

use log::{debug, info, trace};
use serde::Serialize;
use serde_json::Value;

use crate::connection::{SearchConnection, action_header};
use crate::error::{Result, SyncError};
use crate::indexable::{Indexable, RecordSource, resolve_index};

/// Ordered (action header, document) pairs awaiting submission.
#[derive(Debug, Clone)]
pub struct BulkBatch {
    actions: Vec<Value>,
    limit: usize,
}

impl BulkBatch {
    /// Create an empty batch holding at most `limit` documents.
    pub fn new(limit: usize) -> Self {
        Self {
            actions: Vec::with_capacity(limit.min(1024) * 2),
            limit,
        }
    }

    /// Append one document with its action header.
    pub fn push(&mut self, header: Value, document: Value) {
        debug_assert!(!self.is_full(), "bulk batch overflow");
        self.actions.push(header);
        self.actions.push(document);
    }

    /// Number of documents in the batch.
    pub fn len(&self) -> usize {
        self.actions.len() / 2
    }

    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }

    /// Whether the batch reached its limit and must be flushed.
    pub fn is_full(&self) -> bool {
        self.len() >= self.limit
    }

    /// The flattened header/body lines.
    pub fn actions(&self) -> &[Value] {
        &self.actions
    }

    /// Take every action out, leaving the batch empty.
    pub fn take(&mut self) -> Vec<Value> {
        std::mem::take(&mut self.actions)
    }
}

/// Outcome of one bulk pass.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct BulkReport {
    /// Records read from the source.
    pub records_seen: usize,
    /// Documents submitted to the engine.
    pub documents_indexed: usize,
    /// Records rejected by the inclusion policy.
    pub records_skipped: usize,
    /// Bulk calls issued.
    pub batches_submitted: usize,
}

/// Streams a record set into the engine through bulk calls.
pub struct BulkIndexer<K: Indexable> {
    kind: K,
    connection: Arc<dyn SearchConnection>,
}

impl<K: Indexable> BulkIndexer<K> {
    pub fn new(kind: K, connection: Arc<dyn SearchConnection>) -> Self {
        Self { kind, connection }
    }

    pub fn kind(&self) -> &K {
        &self.kind
    }

    /// Rebuild the index from every record of the kind.
    pub fn bulk_index_all(&self, index_override: &str) -> Result<BulkReport> {
        let source = self.kind.records()?;
        self.bulk_index(source, index_override)
    }

    /// Index every included record of `source`.
    ///
    /// A failed bulk call aborts the pass; batches submitted before it are not
    /// tracked or rolled back.
    pub fn bulk_index<S>(&self, mut source: S, index_override: &str) -> Result<BulkReport>
    where
        S: RecordSource<Record = K::Record>,
    {
        let bulk_limit = self.kind.bulk_index_limit();
        let query_limit = self.kind.query_limit();
        if bulk_limit == 0 || query_limit == 0 {
            return Err(SyncError::invalid_argument(
                "bulk_index_limit and query_limit must be greater than 0",
            ));
        }

        let index = resolve_index(&self.kind, index_override);
        let doc_type = self.kind.type_name();
        let mut batch = BulkBatch::new(bulk_limit);
        let mut report = BulkReport::default();

        loop {
            let page = source.next_page(query_limit)?;
            if page.is_empty() {
                break;
            }

            for record in &page {
                report.records_seen += 1;
                if !self.kind.should_index(record) {
                    trace!("skipping excluded record");
                    report.records_skipped += 1;
                    continue;
                }

                let id = self.kind.document_id(record)?;
                let params = self.kind.request_params(record);
                let body = self.kind.document(record)?.to_value()?;
                batch.push(action_header("index", index, doc_type, &id, &params), body);
                report.documents_indexed += 1;

                if batch.is_full() {
                    self.flush(&mut batch, &mut report)?;
                }
            }
        }

        if !batch.is_empty() {
            self.flush(&mut batch, &mut report)?;
        }

        info!(
            "bulk indexed {} of {} records into {}/{} in {} batches",
            report.documents_indexed, report.records_seen, index, doc_type, report.batches_submitted
        );
        Ok(report)
    }

    fn flush(&self, batch: &mut BulkBatch, report: &mut BulkReport) -> Result<()> {
        let count = batch.len();
        let actions = batch.take();
        self.connection.bulk(&actions)?;
        report.batches_submitted += 1;
        debug!(
            "submitted bulk batch {} with {} documents",
            report.batches_submitted, count
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_batch_fills_and_clears() {
        let mut batch = BulkBatch::new(2);
        assert!(batch.is_empty());

        batch.push(json!({"index": {}}), json!({"a": 1}));
        assert!(!batch.is_full());
        batch.push(json!({"index": {}}), json!({"a": 2}));
        assert!(batch.is_full());
        assert_eq!(batch.len(), 2);
        assert_eq!(batch.actions().len(), 4);

        let actions = batch.take();
        assert_eq!(actions.len(), 4);
        assert!(batch.is_empty());
        assert!(!batch.is_full());
    }
}
