//! Query shapes accepted by the multi-search accumulator.
//!
//! Callers hand over one of three shapes, wrapped in [`QuerySource`]:
//!
//! - a raw query mapping,
//! - a [`PaginatedQuery`] provider (a search form that knows its index and type),
//! - a [`SearchBuilder`] carrying its own index list, type list and parameters.
//!
//! Each shape is normalized once into a `(header, body)` pair.

use std::sync::Arc;

use serde_json::{Map, Value};

use crate::connection::SearchConnection;
use crate::error::{Result, SyncError};
use crate::search::multi::MultiSearch;
use crate::search::response::SearchResponse;

/// A provider of a paginated query, typically backed by a validated search form.
pub trait PaginatedQuery {
    /// Index to search. Empty means none.
    fn index(&self) -> &str;

    /// Document type to search. Empty means none.
    fn doc_type(&self) -> &str;

    /// Build the query body.
    fn prepare_query(&self) -> Result<Map<String, Value>>;

    /// Page requested by the provider, overriding the caller's page.
    fn page(&self) -> Option<usize> {
        None
    }

    /// Page size requested by the provider, overriding the caller's page size.
    fn page_size(&self) -> Option<usize> {
        None
    }

    /// Extra multi-search header entries (routing, preference, ...).
    fn query_params(&self) -> Map<String, Value> {
        Map::new()
    }

    /// Run this query alone and return its response.
    fn search(
        &self,
        connection: Arc<dyn SearchConnection>,
        page: usize,
        page_size: usize,
    ) -> Result<SearchResponse>
    where
        Self: Sized,
    {
        let mut multi = MultiSearch::new(connection);
        multi.add_search(
            self as &dyn PaginatedQuery,
            SearchOptions::new().page(page).page_size(page_size),
        )?;
        multi
            .search()?
            .into_iter()
            .next()
            .ok_or_else(|| SyncError::engine("multi-search returned no response"))
    }
}

/// Engine-native query builder.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SearchBuilder {
    indices: Vec<String>,
    doc_types: Vec<String>,
    params: Map<String, Value>,
    body: Map<String, Value>,
}

impl SearchBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from a serialized search body.
    pub fn from_value(body: Value) -> Result<Self> {
        match body {
            Value::Object(body) => Ok(Self {
                body,
                ..Self::default()
            }),
            _ => Err(SyncError::invalid_argument("search body must be a JSON object")),
        }
    }

    /// Add an index to search.
    pub fn index<S: Into<String>>(mut self, name: S) -> Self {
        self.indices.push(name.into());
        self
    }

    /// Add a document type to search.
    pub fn doc_type<S: Into<String>>(mut self, name: S) -> Self {
        self.doc_types.push(name.into());
        self
    }

    /// Set a request option such as `routing`.
    pub fn param<K: Into<String>, V: Into<Value>>(mut self, key: K, value: V) -> Self {
        self.params.insert(key.into(), value.into());
        self
    }

    /// Set the `query` clause.
    pub fn query(mut self, query: Value) -> Self {
        self.body.insert("query".to_string(), query);
        self
    }

    /// Set any other body entry (`sort`, `aggs`, ...).
    pub fn set<K: Into<String>, V: Into<Value>>(mut self, key: K, value: V) -> Self {
        self.body.insert(key.into(), value.into());
        self
    }

    pub fn indices(&self) -> &[String] {
        &self.indices
    }

    pub fn doc_types(&self) -> &[String] {
        &self.doc_types
    }

    /// Header from the builder's current state: index list, type list, then options.
    pub fn to_header(&self) -> Map<String, Value> {
        let mut header = Map::new();
        if !self.indices.is_empty() {
            header.insert("index".to_string(), Value::from(self.indices.clone()));
        }
        if !self.doc_types.is_empty() {
            header.insert("type".to_string(), Value::from(self.doc_types.clone()));
        }
        for (key, value) in &self.params {
            header.insert(key.clone(), value.clone());
        }
        header
    }

    /// The serialized query body.
    pub fn to_body(&self) -> Map<String, Value> {
        self.body.clone()
    }
}

/// The closed set of query shapes.
pub enum QuerySource<'a> {
    Raw(Map<String, Value>),
    Provider(&'a dyn PaginatedQuery),
    Builder(SearchBuilder),
}

impl QuerySource<'_> {
    /// Normalize into `(header, body)` and the provider's pagination, if any.
    pub(crate) fn into_parts(
        self,
    ) -> Result<(Map<String, Value>, Map<String, Value>, Option<usize>, Option<usize>)> {
        match self {
            QuerySource::Raw(body) => Ok((Map::new(), body, None, None)),
            QuerySource::Provider(provider) => {
                let mut header = Map::new();
                if !provider.index().is_empty() {
                    header.insert("index".to_string(), Value::from(provider.index()));
                }
                if !provider.doc_type().is_empty() {
                    header.insert("type".to_string(), Value::from(provider.doc_type()));
                }
                for (key, value) in provider.query_params() {
                    header.insert(key, value);
                }
                let body = provider.prepare_query()?;
                Ok((header, body, provider.page(), provider.page_size()))
            }
            QuerySource::Builder(builder) => {
                Ok((builder.to_header(), builder.to_body(), None, None))
            }
        }
    }
}

impl From<Map<String, Value>> for QuerySource<'_> {
    fn from(body: Map<String, Value>) -> Self {
        QuerySource::Raw(body)
    }
}

impl<'a> From<&'a dyn PaginatedQuery> for QuerySource<'a> {
    fn from(provider: &'a dyn PaginatedQuery) -> Self {
        QuerySource::Provider(provider)
    }
}

impl From<SearchBuilder> for QuerySource<'_> {
    fn from(builder: SearchBuilder) -> Self {
        QuerySource::Builder(builder)
    }
}

impl TryFrom<Value> for QuerySource<'_> {
    type Error = SyncError;

    fn try_from(value: Value) -> Result<Self> {
        match value {
            Value::Object(body) => Ok(QuerySource::Raw(body)),
            _ => Err(SyncError::invalid_argument("raw query must be a JSON object")),
        }
    }
}

/// Per-query overrides and pagination for [`MultiSearch::add_search`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchOptions {
    /// Index override; empty keeps the source's index.
    pub index: String,
    /// Type override; empty keeps the source's type.
    pub doc_type: String,
    /// 1-based page number.
    pub page: usize,
    /// Page size; `None` uses the accumulator default.
    pub page_size: Option<usize>,
}

impl Default for SearchOptions {
    fn default() -> Self {
        Self {
            index: String::new(),
            doc_type: String::new(),
            page: 1,
            page_size: None,
        }
    }
}

impl SearchOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn index<S: Into<String>>(mut self, index: S) -> Self {
        self.index = index.into();
        self
    }

    pub fn doc_type<S: Into<String>>(mut self, doc_type: S) -> Self {
        self.doc_type = doc_type.into();
        self
    }

    pub fn page(mut self, page: usize) -> Self {
        self.page = page;
        self
    }

    pub fn page_size(mut self, page_size: usize) -> Self {
        self.page_size = Some(page_size);
        self
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_builder_header_lists_indices_types_and_params() {
        let builder = SearchBuilder::new()
            .index("blog")
            .doc_type("posts")
            .param("routing", "id")
            .query(json!({"match_all": {}}));

        assert_eq!(
            Value::Object(builder.to_header()),
            json!({"index": ["blog"], "type": ["posts"], "routing": "id"})
        );
        assert_eq!(
            Value::Object(builder.to_body()),
            json!({"query": {"match_all": {}}})
        );
    }

    #[test]
    fn test_builder_without_state_has_empty_header() {
        let builder = SearchBuilder::from_value(json!({"query": {"match_all": {}}})).unwrap();
        assert!(builder.to_header().is_empty());
        assert!(SearchBuilder::from_value(json!([1])).is_err());
    }

    #[test]
    fn test_raw_value_conversion() {
        assert!(QuerySource::try_from(json!({"query": {}})).is_ok());
        assert!(QuerySource::try_from(json!("match_all")).is_err());
    }

    #[test]
    fn test_options_defaults() {
        let options = SearchOptions::default();
        assert_eq!(options.page, 1);
        assert_eq!(options.page_size, None);
        assert!(options.index.is_empty());
    }
}
