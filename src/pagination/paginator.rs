//! # Cursor Paginator
//!
//! Keyset pagination over a [`DocumentStore`]:
//!
//! 1. count the filter's matches
//! 2. compile the sort, always ending on `_id`
//! 3. narrow the filter with the cursor's seek clause
//! 4. fetch `limit + 1` documents; the extra one only signals `hasMore`
//! 5. seal the last returned document's sort values as the next cursor

use super::page::Page;
use super::request::PageRequest;
use crate::cursor::{anchor_values, seek_clause, CursorBinding, CursorCodec};
use crate::errors::{QueryError, QueryResult};
use crate::filter::FilterExpr;
use crate::limits::OperationCap;
use crate::sort::SortCompiler;
use crate::store::DocumentStore;

/// Page size used when a request names none
pub const DEFAULT_PAGE_LIMIT: usize = 100;

/// Runs paginated reads against a store
#[derive(Debug, Clone)]
pub struct CursorPaginator {
    codec: CursorCodec,
    cap: OperationCap,
    sort_compiler: SortCompiler,
    default_limit: usize,
}

impl CursorPaginator {
    pub fn new(codec: CursorCodec, cap: OperationCap) -> Self {
        Self {
            codec,
            cap,
            sort_compiler: SortCompiler::default(),
            default_limit: DEFAULT_PAGE_LIMIT,
        }
    }

    pub fn with_sort_compiler(mut self, sort_compiler: SortCompiler) -> Self {
        self.sort_compiler = sort_compiler;
        self
    }

    pub fn with_default_limit(mut self, default_limit: usize) -> Self {
        self.default_limit = default_limit;
        self
    }

    pub fn cap(&self) -> &OperationCap {
        &self.cap
    }

    pub fn default_limit(&self) -> usize {
        self.default_limit
    }

    /// Resolve and check the page size against the current cap
    pub fn validate_limit(&self, limit: Option<usize>) -> QueryResult<usize> {
        let limit = limit.unwrap_or(self.default_limit);
        if limit == 0 {
            return Err(QueryError::validation("limit must be more than 0"));
        }
        let cap = self.cap.get();
        if limit > cap {
            return Err(QueryError::validation(format!("limit must be <= {}", cap)));
        }
        Ok(limit)
    }

    /// Fetch one page of documents matching `filter`
    pub async fn paginate<S>(
        &self,
        store: &S,
        filter: &FilterExpr,
        request: &PageRequest,
    ) -> QueryResult<Page>
    where
        S: DocumentStore + ?Sized,
    {
        let limit = self.validate_limit(request.limit)?;
        let total = store.count(filter).await?;
        let sort = self.sort_compiler.compile(request.sort.as_slice())?;
        let binding = CursorBinding::new(filter, &sort)?;

        let query = match request.active_cursor() {
            Some(token) => {
                let values = self.codec.decode(token, &binding, sort.len())?;
                FilterExpr::and(vec![filter.clone(), seek_clause(&sort, &values)?])
            }
            None => filter.clone(),
        };

        let mut data = store.find(&query, &sort, Some(limit.saturating_add(1))).await?;
        let has_more = data.len() > limit;

        let cursor = if has_more {
            data.truncate(limit);
            match data.last() {
                Some(last) => self.codec.encode(&anchor_values(last, &sort)?, &binding)?,
                None => String::new(),
            }
        } else {
            request.cursor.clone().unwrap_or_default()
        };

        tracing::debug!(
            total,
            limit,
            returned = data.len(),
            has_more,
            sort = ?sort.tokens(),
            "fetched page"
        );

        Ok(Page {
            data,
            total,
            has_more,
            limit,
            cursor,
        })
    }
}
