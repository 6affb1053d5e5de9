//! Single-record index synchronization.
//!
//! The persistence layer calls [`IndexSynchronizer::on_saved`] after every create or
//! update and [`IndexSynchronizer::on_deleted`] after every delete. Each call is an
//! independent engine round trip; there is no transaction tying the store write to
//! the index write.

use std::sync::Arc;

use log::{debug, trace};

use crate::connection::SearchConnection;
use crate::error::Result;
use crate::indexable::{Indexable, resolve_index};

/// Mirrors single record mutations of one record kind into the index.
pub struct IndexSynchronizer<K: Indexable> {
    kind: K,
    connection: Arc<dyn SearchConnection>,
}

impl<K: Indexable> IndexSynchronizer<K> {
    pub fn new(kind: K, connection: Arc<dyn SearchConnection>) -> Self {
        Self { kind, connection }
    }

    /// The record kind this synchronizer serves.
    pub fn kind(&self) -> &K {
        &self.kind
    }

    /// Index one record.
    ///
    /// Returns `Ok(false)` without touching the engine when the record is absent or
    /// rejected by the inclusion policy. Engine failures propagate.
    pub fn index_add(&self, record: Option<&K::Record>, index_override: &str) -> Result<bool> {
        let Some(record) = record else {
            return Ok(false);
        };
        if !self.kind.should_index(record) {
            trace!("record excluded by inclusion policy, not indexing");
            return Ok(false);
        }

        let index = resolve_index(&self.kind, index_override);
        let id = self.kind.document_id(record)?;
        let body = self.kind.document(record)?.to_value()?;
        let params = self.kind.request_params(record);

        self.connection
            .index(index, self.kind.type_name(), &body, &id, &params)?;
        debug!("indexed {}/{}/{}", index, self.kind.type_name(), id);
        Ok(true)
    }

    /// Remove one record from the index.
    ///
    /// Returns `Ok(false)` for an absent record. A document the engine reports as
    /// missing counts as removed.
    pub fn index_delete(&self, record: Option<&K::Record>, index_override: &str) -> Result<bool> {
        let Some(record) = record else {
            return Ok(false);
        };

        let index = resolve_index(&self.kind, index_override);
        let id = self.kind.document_id(record)?;
        let params = self.kind.request_params(record);

        match self
            .connection
            .delete(index, self.kind.type_name(), &id, &params)
        {
            Ok(_) => {
                debug!("deleted {}/{}/{}", index, self.kind.type_name(), id);
                Ok(true)
            }
            Err(e) if e.is_not_found() => {
                debug!("{}/{}/{} already absent", index, self.kind.type_name(), id);
                Ok(true)
            }
            Err(e) => Err(e),
        }
    }

    /// Index the record if the inclusion policy accepts it, otherwise remove it.
    ///
    /// A record that becomes excluded after being indexed is actively deleted.
    pub fn index_add_or_delete(
        &self,
        record: Option<&K::Record>,
        index_override: &str,
    ) -> Result<bool> {
        let Some(record) = record else {
            return Ok(false);
        };

        if self.kind.should_index(record) {
            self.index_add(Some(record), index_override)
        } else {
            self.index_delete(Some(record), index_override)
        }
    }

    /// Hook for record creation and update.
    pub fn on_saved(&self, record: &K::Record) -> Result<bool> {
        self.index_add_or_delete(Some(record), "")
    }

    /// Hook for record deletion.
    pub fn on_deleted(&self, record: &K::Record) -> Result<bool> {
        self.index_delete(Some(record), "")
    }
}

#[cfg(test)]
mod tests {
    use serde_json::{Map, Value, json};

    use super::*;
    use crate::connection::{Call, Operation, RecordingConnection};
    use crate::error::SyncError;
    use crate::indexable::JsonRecordKind;

    fn setup() -> (Arc<RecordingConnection>, IndexSynchronizer<JsonRecordKind>) {
        let conn = Arc::new(RecordingConnection::new());
        let kind = JsonRecordKind::new("blog", "posts").with_exclude_field("draft");
        let sync = IndexSynchronizer::new(kind, conn.clone());
        (conn, sync)
    }

    fn record(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(map) => map,
            _ => unreachable!(),
        }
    }

    #[test]
    fn test_absent_record_makes_no_calls() {
        let (conn, sync) = setup();

        assert!(!sync.index_add(None, "").unwrap());
        assert!(!sync.index_delete(None, "").unwrap());
        assert!(!sync.index_add_or_delete(None, "foo").unwrap());
        assert!(conn.calls().is_empty());
    }

    #[test]
    fn test_index_add_uses_override() {
        let (conn, sync) = setup();
        let post = record(json!({"id": 5, "title": "t"}));

        assert!(sync.index_add(Some(&post), "foo").unwrap());
        match conn.last_call() {
            Some(Call::Index { index, doc_type, id, .. }) => {
                assert_eq!(index, "foo");
                assert_eq!(doc_type, "posts");
                assert_eq!(id, "5");
            }
            other => panic!("unexpected call: {other:?}"),
        }
    }

    #[test]
    fn test_index_add_skips_excluded_record() {
        let (conn, sync) = setup();
        let draft = record(json!({"id": 1, "draft": true}));

        assert!(!sync.index_add(Some(&draft), "").unwrap());
        assert_eq!(conn.count(Operation::Index), 0);
    }

    #[test]
    fn test_delete_not_found_is_success() {
        let (conn, sync) = setup();
        conn.fail_next(Operation::Delete, SyncError::not_found("blog/posts/1"));

        assert!(sync.index_delete(Some(&record(json!({"id": 1}))), "").unwrap());
    }

    #[test]
    fn test_record_without_id_never_reaches_engine() {
        let (conn, sync) = setup();
        let draft = record(json!({"title": "x", "draft": true}));
        let post = record(json!({"title": "x"}));

        assert!(matches!(
            sync.index_add_or_delete(Some(&draft), ""),
            Err(SyncError::InvalidArgument(_))
        ));
        assert!(matches!(
            sync.index_delete(Some(&post), ""),
            Err(SyncError::InvalidArgument(_))
        ));
        assert!(matches!(
            sync.index_add(Some(&post), ""),
            Err(SyncError::InvalidArgument(_))
        ));
        assert!(conn.calls().is_empty());
    }

    #[test]
    fn test_engine_errors_propagate() {
        let (conn, sync) = setup();
        conn.fail_next(Operation::Index, SyncError::engine("rejected"));

        let result = sync.index_add(Some(&record(json!({"id": 1}))), "");
        assert!(matches!(result, Err(SyncError::Engine(_))));
    }
}
