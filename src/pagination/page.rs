//! Page result

use serde::Serialize;
use serde_json::Value;

/// One page of a paginated read
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Page {
    /// Documents on this page, at most `limit`
    pub data: Vec<Value>,
    /// Documents matching the filter, ignoring cursor and limit
    pub total: usize,
    /// More matching documents exist after this page
    pub has_more: bool,
    /// Effective page size
    pub limit: usize,
    /// Cursor for the next page; the input cursor (or empty) when exhausted
    pub cursor: String,
}

impl Page {
    /// Returns true if the page holds no documents
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Cursor to request the next page with, if there is one
    pub fn next_cursor(&self) -> Option<&str> {
        self.has_more.then_some(self.cursor.as_str())
    }
}
