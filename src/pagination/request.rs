//! Page request builder

/// Paging options for one read
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PageRequest {
    /// Page size; the configured default when absent
    pub limit: Option<usize>,
    /// Signed sort tokens, e.g. `-createdAt`
    pub sort: Vec<String>,
    /// Cursor returned by the previous page
    pub cursor: Option<String>,
}

impl PageRequest {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn with_sort<I, S>(mut self, tokens: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.sort = tokens.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_cursor(mut self, cursor: impl Into<String>) -> Self {
        self.cursor = Some(cursor.into());
        self
    }

    /// Same request positioned at `cursor`
    pub fn after(&self, cursor: impl Into<String>) -> Self {
        self.clone().with_cursor(cursor)
    }

    /// The cursor, treating an empty string as none
    pub fn active_cursor(&self) -> Option<&str> {
        self.cursor.as_deref().filter(|c| !c.is_empty())
    }
}
