//! Multi-search accumulator.
//!
//! [`MultiSearch`] collects several paginated queries and sends them in one
//! multi-search round trip. Pagination is always owned by the accumulator: every
//! body gets `from = (page - 1) * page_size` and `size = page_size`, overwriting
//! whatever the caller's query said. The requested page of each query is kept
//! alongside its envelope and written back into the matching response.
//!
//! [`MultiSearch::search`] resets the accumulator before it returns, whether the
//! engine call succeeded or not. To resend, add every query again.

use std::sync::Arc;

use log::debug;
use serde::Serialize;
use serde_json::{Map, Value};

use crate::config::DEFAULT_PAGE_SIZE;
use crate::connection::SearchConnection;
use crate::error::{Result, SyncError};
use crate::search::query::{QuerySource, SearchOptions};
use crate::search::response::SearchResponse;

/// One sub-query: multi-search header and query body.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QueryEnvelope {
    pub header: Map<String, Value>,
    pub body: Map<String, Value>,
}

/// Page requested for the envelope at the same position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PageRange {
    pub page: usize,
    pub page_size: usize,
}

impl PageRange {
    /// Offset of the first hit of this page.
    ///
    /// Ranges accepted by [`MultiSearch::add_search`] never overflow here.
    pub fn from(&self) -> usize {
        self.offset().unwrap_or(usize::MAX)
    }

    /// Offset of the first hit, or `None` for page 0 or an offset past `usize::MAX`.
    pub fn offset(&self) -> Option<usize> {
        self.page.checked_sub(1)?.checked_mul(self.page_size)
    }
}

/// Accumulates queries and dispatches them as one multi-search.
///
/// Not meant to be shared: each request-handling context owns its own instance.
pub struct MultiSearch {
    connection: Arc<dyn SearchConnection>,
    envelopes: Vec<QueryEnvelope>,
    page_ranges: Vec<PageRange>,
    default_page_size: usize,
}

impl MultiSearch {
    pub fn new(connection: Arc<dyn SearchConnection>) -> Self {
        Self {
            connection,
            envelopes: Vec::new(),
            page_ranges: Vec::new(),
            default_page_size: DEFAULT_PAGE_SIZE,
        }
    }

    /// Page size used when neither the options nor the source specify one.
    pub fn with_default_page_size(mut self, page_size: usize) -> Self {
        self.default_page_size = page_size;
        self
    }

    /// Add one query.
    ///
    /// Non-empty index/type overrides in `options` replace the source's values.
    /// A page or page size supplied by a [`PaginatedQuery`](crate::search::PaginatedQuery)
    /// wins over `options`.
    pub fn add_search<'a, Q>(&mut self, source: Q, options: SearchOptions) -> Result<()>
    where
        Q: Into<QuerySource<'a>>,
    {
        let source: QuerySource<'a> = source.into();
        let (mut header, mut body, source_page, source_page_size) = source.into_parts()?;

        if !options.index.is_empty() {
            header.insert("index".to_string(), Value::from(options.index));
        }
        if !options.doc_type.is_empty() {
            header.insert("type".to_string(), Value::from(options.doc_type));
        }

        let range = PageRange {
            page: source_page.unwrap_or(options.page),
            page_size: source_page_size
                .or(options.page_size)
                .unwrap_or(self.default_page_size),
        };
        if range.page == 0 {
            return Err(SyncError::invalid_argument("page must be 1 or greater"));
        }
        if range.page_size == 0 {
            return Err(SyncError::invalid_argument("page size must be 1 or greater"));
        }
        let from = range.offset().ok_or_else(|| {
            SyncError::invalid_argument(format!(
                "page {} with page size {} is out of range",
                range.page, range.page_size
            ))
        })?;

        body.insert("from".to_string(), Value::from(from));
        body.insert("size".to_string(), Value::from(range.page_size));

        self.envelopes.push(QueryEnvelope { header, body });
        self.page_ranges.push(range);
        Ok(())
    }

    /// Accumulated envelopes, in insertion order.
    pub fn envelopes(&self) -> &[QueryEnvelope] {
        &self.envelopes
    }

    /// Requested pages, parallel to [`envelopes`](Self::envelopes).
    pub fn page_ranges(&self) -> &[PageRange] {
        &self.page_ranges
    }

    /// The flattened header/body list sent as the multi-search body.
    pub fn payload(&self) -> Vec<Value> {
        flatten(self.envelopes.iter().cloned())
    }

    pub fn len(&self) -> usize {
        self.envelopes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.envelopes.is_empty()
    }

    /// Drop every accumulated query.
    pub fn reset(&mut self) {
        self.envelopes.clear();
        self.page_ranges.clear();
    }

    /// Dispatch all accumulated queries in one multi-search call.
    ///
    /// An empty accumulator returns an empty list without calling the engine.
    /// The accumulator is empty again when this returns, on success and on error.
    pub fn search(&mut self) -> Result<Vec<SearchResponse>> {
        let envelopes = std::mem::take(&mut self.envelopes);
        let page_ranges = std::mem::take(&mut self.page_ranges);

        if envelopes.is_empty() {
            debug!("multi-search skipped: no queries accumulated");
            return Ok(Vec::new());
        }

        let query_count = envelopes.len();
        let body = flatten(envelopes);
        debug!("dispatching multi-search with {query_count} queries");
        let raw = self.connection.msearch(&body)?;

        let responses = match raw {
            Value::Object(mut root) => match root.remove("responses") {
                Some(Value::Array(responses)) => responses,
                _ => {
                    return Err(SyncError::engine(
                        "multi-search response has no 'responses' array",
                    ));
                }
            },
            _ => return Err(SyncError::engine("multi-search response is not an object")),
        };
        if responses.len() != query_count {
            return Err(SyncError::engine(format!(
                "multi-search returned {} responses for {} queries",
                responses.len(),
                query_count
            )));
        }

        Ok(responses
            .into_iter()
            .zip(page_ranges)
            .map(|(raw, range)| {
                let mut response = SearchResponse::new(raw);
                response.inject_page(range.from(), range.page_size);
                response
            })
            .collect())
    }
}

fn flatten<I: IntoIterator<Item = QueryEnvelope>>(envelopes: I) -> Vec<Value> {
    envelopes
        .into_iter()
        .flat_map(|envelope| [Value::Object(envelope.header), Value::Object(envelope.body)])
        .collect()
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::connection::RecordingConnection;

    fn raw(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(map) => map,
            _ => unreachable!(),
        }
    }

    #[test]
    fn test_page_range_offset() {
        let range = PageRange {
            page: 3,
            page_size: 25,
        };
        assert_eq!(range.from(), 50);
    }

    #[test]
    fn test_pagination_overwrites_caller_values() {
        let mut multi = MultiSearch::new(Arc::new(RecordingConnection::new()));
        multi
            .add_search(
                raw(json!({"query": {"match_all": {}}, "from": 999, "size": 1})),
                SearchOptions::new().page(2).page_size(10),
            )
            .unwrap();

        let body = &multi.envelopes()[0].body;
        assert_eq!(body["from"], json!(10));
        assert_eq!(body["size"], json!(10));
    }

    #[test]
    fn test_zero_page_is_rejected() {
        let mut multi = MultiSearch::new(Arc::new(RecordingConnection::new()));

        assert!(multi.add_search(Map::new(), SearchOptions::new().page(0)).is_err());
        assert!(
            multi
                .add_search(Map::new(), SearchOptions::new().page_size(0))
                .is_err()
        );
        assert!(multi.is_empty());
    }

    #[test]
    fn test_page_offset_overflow_is_rejected() {
        let mut multi = MultiSearch::new(Arc::new(RecordingConnection::new()));

        let result = multi.add_search(
            Map::new(),
            SearchOptions::new().page(usize::MAX / 2).page_size(20),
        );
        assert!(matches!(result, Err(SyncError::InvalidArgument(_))));
        assert!(multi.is_empty());
        assert!(multi.page_ranges().is_empty());
    }

    #[test]
    fn test_default_page_size_applies() {
        let mut multi =
            MultiSearch::new(Arc::new(RecordingConnection::new())).with_default_page_size(50);
        multi.add_search(Map::new(), SearchOptions::new()).unwrap();

        assert_eq!(multi.page_ranges()[0].page_size, 50);
        assert_eq!(multi.payload(), vec![json!({}), json!({"from": 0, "size": 50})]);
    }

    #[test]
    fn test_empty_search_short_circuits() {
        let conn = Arc::new(RecordingConnection::new());
        let mut multi = MultiSearch::new(conn.clone());

        assert!(multi.search().unwrap().is_empty());
        assert!(conn.calls().is_empty());
    }
}
