//! Capability traits for record kinds that can be indexed.
//!
//! A record kind implements [`Indexable`] once. The required methods form the
//! document mapper (`document`, `document_id`) and the routing surface
//! (`index_name`, `type_name`, `records`); the defaulted methods are the inclusion
//! policy and the tuning knobs. A kind that leaves out a required capability does
//! not compile.
//!
//! # Example
//!
//! ```
//! use sarissa_sync::document::Document;
//! use sarissa_sync::error::Result;
//! use sarissa_sync::indexable::{Indexable, VecSource};
//!
//! #[derive(Clone)]
//! struct Note {
//!     id: u64,
//!     text: String,
//!     draft: bool,
//! }
//!
//! struct NoteIndex {
//!     notes: Vec<Note>,
//! }
//!
//! impl Indexable for NoteIndex {
//!     type Record = Note;
//!     type Source = VecSource<Note>;
//!
//!     fn index_name(&self) -> &str {
//!         "notes"
//!     }
//!
//!     fn type_name(&self) -> &str {
//!         "note"
//!     }
//!
//!     fn document_id(&self, note: &Note) -> Result<String> {
//!         Ok(note.id.to_string())
//!     }
//!
//!     fn document(&self, note: &Note) -> Result<Document> {
//!         Ok(Document::builder().add_text("text", note.text.clone()).build())
//!     }
//!
//!     fn records(&self) -> Result<VecSource<Note>> {
//!         Ok(VecSource::new(self.notes.clone()))
//!     }
//!
//!     fn should_index(&self, note: &Note) -> bool {
//!         !note.draft
//!     }
//! }
//! ```

pub mod json;
pub mod source;

use crate::config::{DEFAULT_BULK_INDEX_LIMIT, DEFAULT_QUERY_LIMIT};
use crate::connection::RequestParams;
use crate::document::{Document, TypeMapping};
use crate::error::Result;

pub use json::JsonRecordKind;
pub use source::{JsonLinesSource, RecordSource, VecSource};

/// A record kind whose records can be mirrored into the search index.
pub trait Indexable {
    /// The domain record. Owned by the persistence layer; only borrowed here.
    type Record;

    /// Cursor over every record of this kind.
    type Source: RecordSource<Record = Self::Record>;

    /// Default index for this kind.
    fn index_name(&self) -> &str;

    /// Default document type for this kind.
    fn type_name(&self) -> &str;

    /// Stable engine identifier of a record.
    ///
    /// A record without a usable identifier is an `InvalidArgument` error; no engine
    /// call is made for it.
    fn document_id(&self, record: &Self::Record) -> Result<String>;

    /// Map a record to the document body sent to the engine.
    fn document(&self, record: &Self::Record) -> Result<Document>;

    /// Open a cursor over all records of this kind.
    fn records(&self) -> Result<Self::Source>;

    /// Field schema for the engine. Empty means dynamic mapping.
    fn type_mapping(&self) -> TypeMapping {
        TypeMapping::default()
    }

    /// Inclusion policy. Must be cheap and side-effect free; it runs once per
    /// record in a bulk pass.
    fn should_index(&self, _record: &Self::Record) -> bool {
        true
    }

    /// Extra engine parameters for a record (e.g. routing).
    fn request_params(&self, _record: &Self::Record) -> RequestParams {
        RequestParams::new()
    }

    /// Maximum (header, document) pairs per bulk submission.
    fn bulk_index_limit(&self) -> usize {
        DEFAULT_BULK_INDEX_LIMIT
    }

    /// Maximum records pulled from the cursor at once.
    fn query_limit(&self) -> usize {
        DEFAULT_QUERY_LIMIT
    }
}

/// Resolve the target index: a non-empty override wins over the kind's default.
pub(crate) fn resolve_index<'a, K: Indexable + ?Sized>(
    kind: &'a K,
    index_override: &'a str,
) -> &'a str {
    if index_override.is_empty() {
        kind.index_name()
    } else {
        index_override
    }
}
