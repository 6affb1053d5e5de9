//! Connection that writes bulk-API payloads as newline-delimited JSON.
//!
//! Useful for dry runs and for exporting a rebuild that is later replayed with
//! `curl --data-binary @file _bulk`. It cannot answer searches.

use std::io::Write;

use parking_lot::Mutex;
use serde_json::{Value, json};

use crate::connection::{RequestParams, SearchConnection, action_header};
use crate::error::{Result, SyncError};

/// A [`SearchConnection`] that serializes every write to `W`.
#[derive(Debug)]
pub struct NdjsonConnection<W: Write + Send> {
    writer: Mutex<W>,
}

impl<W: Write + Send> NdjsonConnection<W> {
    /// Wrap a writer.
    pub fn new(writer: W) -> Self {
        Self {
            writer: Mutex::new(writer),
        }
    }

    /// Flush the underlying writer.
    pub fn flush(&self) -> Result<()> {
        self.writer.lock().flush()?;
        Ok(())
    }

    /// Recover the underlying writer.
    pub fn into_inner(self) -> W {
        self.writer.into_inner()
    }

    fn write_lines<'a, I>(&self, lines: I) -> Result<usize>
    where
        I: IntoIterator<Item = &'a Value>,
    {
        let mut writer = self.writer.lock();
        let mut written = 0;
        for line in lines {
            serde_json::to_writer(&mut *writer, line)?;
            writer.write_all(b"\n")?;
            written += 1;
        }
        Ok(written)
    }
}

impl<W: Write + Send> SearchConnection for NdjsonConnection<W> {
    fn index(
        &self,
        index: &str,
        doc_type: &str,
        document: &Value,
        id: &str,
        params: &RequestParams,
    ) -> Result<Value> {
        let header = action_header("index", index, doc_type, id, params);
        self.write_lines([&header, document])?;
        Ok(json!({"_index": index, "_type": doc_type, "_id": id}))
    }

    fn delete(
        &self,
        index: &str,
        doc_type: &str,
        id: &str,
        params: &RequestParams,
    ) -> Result<Value> {
        let header = action_header("delete", index, doc_type, id, params);
        self.write_lines([&header])?;
        Ok(json!({"_index": index, "_type": doc_type, "_id": id}))
    }

    fn bulk(&self, actions: &[Value]) -> Result<Value> {
        let written = self.write_lines(actions)?;
        Ok(json!({"errors": false, "lines": written}))
    }

    fn msearch(&self, _body: &[Value]) -> Result<Value> {
        Err(SyncError::unsupported(
            "multi-search is not available on an NDJSON export connection",
        ))
    }
}
