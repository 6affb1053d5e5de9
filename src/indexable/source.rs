//! Record cursors.
//!
//! The bulk indexer never asks for a whole record set. It pulls pages of at most
//! `query_limit` records from a [`RecordSource`] until an empty page comes back,
//! so peak memory is bounded by one page plus one bulk batch.

use std::io::BufRead;

use serde_json::{Map, Value};

use crate::error::{Result, SyncError};

/// A forward-only cursor over records.
pub trait RecordSource {
    type Record;

    /// Fetch up to `limit` further records. An empty page means exhausted.
    fn next_page(&mut self, limit: usize) -> Result<Vec<Self::Record>>;
}

impl<S: RecordSource + ?Sized> RecordSource for &mut S {
    type Record = S::Record;

    fn next_page(&mut self, limit: usize) -> Result<Vec<Self::Record>> {
        (**self).next_page(limit)
    }
}

impl<S: RecordSource + ?Sized> RecordSource for Box<S> {
    type Record = S::Record;

    fn next_page(&mut self, limit: usize) -> Result<Vec<Self::Record>> {
        (**self).next_page(limit)
    }
}

/// Cursor over records already held in memory.
#[derive(Debug)]
pub struct VecSource<R> {
    records: std::vec::IntoIter<R>,
}

impl<R> VecSource<R> {
    pub fn new(records: Vec<R>) -> Self {
        Self {
            records: records.into_iter(),
        }
    }

    /// Records not yet handed out.
    pub fn remaining(&self) -> usize {
        self.records.len()
    }
}

impl<R> From<Vec<R>> for VecSource<R> {
    fn from(records: Vec<R>) -> Self {
        Self::new(records)
    }
}

impl<R> RecordSource for VecSource<R> {
    type Record = R;

    fn next_page(&mut self, limit: usize) -> Result<Vec<R>> {
        Ok(self.records.by_ref().take(limit).collect())
    }
}

/// Cursor reading one JSON object per line. Blank lines are skipped.
#[derive(Debug)]
pub struct JsonLinesSource<B: BufRead> {
    reader: B,
    line_number: usize,
    buf: String,
}

impl<B: BufRead> JsonLinesSource<B> {
    pub fn new(reader: B) -> Self {
        Self {
            reader,
            line_number: 0,
            buf: String::new(),
        }
    }

    /// Number of lines consumed so far.
    pub fn line_number(&self) -> usize {
        self.line_number
    }

    fn next_record(&mut self) -> Result<Option<Map<String, Value>>> {
        loop {
            self.buf.clear();
            if self.reader.read_line(&mut self.buf)? == 0 {
                return Ok(None);
            }
            self.line_number += 1;

            let line = self.buf.trim();
            if line.is_empty() {
                continue;
            }

            return match serde_json::from_str::<Value>(line)? {
                Value::Object(map) => Ok(Some(map)),
                other => Err(SyncError::invalid_argument(format!(
                    "line {}: expected a JSON object, found {}",
                    self.line_number,
                    json_kind(&other)
                ))),
            };
        }
    }
}

impl<B: BufRead> RecordSource for JsonLinesSource<B> {
    type Record = Map<String, Value>;

    fn next_page(&mut self, limit: usize) -> Result<Vec<Self::Record>> {
        let mut page = Vec::with_capacity(limit.min(1024));
        while page.len() < limit {
            match self.next_record()? {
                Some(record) => page.push(record),
                None => break,
            }
        }
        Ok(page)
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use super::*;

    #[test]
    fn test_vec_source_pages() {
        let mut source = VecSource::new((1..=7).collect::<Vec<_>>());

        assert_eq!(source.next_page(3).unwrap(), vec![1, 2, 3]);
        assert_eq!(source.next_page(3).unwrap(), vec![4, 5, 6]);
        assert_eq!(source.next_page(3).unwrap(), vec![7]);
        assert!(source.next_page(3).unwrap().is_empty());
        assert_eq!(source.remaining(), 0);
    }

    #[test]
    fn test_json_lines_source_skips_blank_lines() {
        let input = "{\"id\": 1}\n\n{\"id\": 2}\n{\"id\": 3}\n";
        let mut source = JsonLinesSource::new(Cursor::new(input));

        let first = source.next_page(2).unwrap();
        assert_eq!(first.len(), 2);
        assert_eq!(first[1]["id"], 2);

        let second = source.next_page(2).unwrap();
        assert_eq!(second.len(), 1);
        assert!(source.next_page(2).unwrap().is_empty());
        assert_eq!(source.line_number(), 4);
    }

    #[test]
    fn test_json_lines_source_rejects_non_objects() {
        let mut source = JsonLinesSource::new(Cursor::new("{\"id\": 1}\n[1, 2]\n"));

        let err = source.next_page(10).unwrap_err();
        assert!(err.to_string().contains("line 2"));
    }
}
