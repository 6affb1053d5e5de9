//! Paginated multi-search.
//!
//! See [`MultiSearch`] for the accumulate/dispatch cycle and [`QuerySource`] for
//! the query shapes it accepts.

pub mod multi;
pub mod query;
pub mod response;

// Re-export commonly used types
pub use multi::{MultiSearch, PageRange, QueryEnvelope};
pub use query::{PaginatedQuery, QuerySource, SearchBuilder, SearchOptions};
pub use response::SearchResponse;
