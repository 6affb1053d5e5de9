//! # sarissa-sync
//!
//! Keeps a search index in step with a record store and serves paginated
//! multi-query searches against it.
//!
//! ## Features
//!
//! - Record kinds declare their document mapping and inclusion policy once
//!   ([`indexable::Indexable`])
//! - Single-record add/delete on every store mutation ([`sync::IndexSynchronizer`])
//! - Memory-bounded bulk rebuilds with batched submission ([`bulk::BulkIndexer`])
//! - Several paginated queries in one round trip ([`search::MultiSearch`])
//! - The engine client stays behind one trait ([`connection::SearchConnection`])

pub mod bulk;
pub mod cli;
pub mod config;
pub mod connection;
pub mod document;
pub mod error;
pub mod indexable;
pub mod search;
pub mod sync;

pub mod prelude {
    pub use crate::bulk::{BulkIndexer, BulkReport};
    pub use crate::config::{ConnectionConfig, IndexingSettings, Settings};
    pub use crate::connection::{RequestParams, SearchConnection};
    pub use crate::document::{Document, FieldMapping, FieldValue, TypeMapping};
    pub use crate::error::{Result, SyncError};
    pub use crate::indexable::{Indexable, RecordSource, VecSource};
    pub use crate::search::{
        MultiSearch, PaginatedQuery, QuerySource, SearchBuilder, SearchOptions, SearchResponse,
    };
    pub use crate::sync::IndexSynchronizer;
}

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
