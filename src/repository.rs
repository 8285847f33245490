//! # Repository
//!
//! Document operations over one [`DocumentStore`] collection.
//!
//! Bulk operations are checked against the injected [`OperationCap`] at
//! call time. Updates and deletes count their matches first; the count and
//! the write are separate store calls, so concurrent writers can race past
//! the cap.

use serde_json::Value;

use crate::cursor::CursorCodec;
use crate::errors::QueryResult;
use crate::filter::{Combinator, FilterCompiler, FilterExpr, FilterOperator};
use crate::limits::{CappedOperation, OperationCap};
use crate::pagination::{CursorPaginator, Page, PageRequest};
use crate::params::QueryParams;
use crate::sort::{SortCompiler, SortKey, SortSpec};
use crate::store::{DocumentStore, StoreError, UpdateMode, UpdateOutcome, ID_FIELD};

/// Capped, paginated access to a document collection
#[derive(Debug, Clone)]
pub struct Repository<S> {
    store: S,
    cap: OperationCap,
    paginator: CursorPaginator,
}

impl<S: DocumentStore> Repository<S> {
    pub fn new(store: S, codec: CursorCodec, cap: OperationCap) -> Self {
        Self {
            store,
            paginator: CursorPaginator::new(codec, cap.clone()),
            cap,
        }
    }

    pub fn with_sort_compiler(mut self, sort_compiler: SortCompiler) -> Self {
        self.paginator = self.paginator.with_sort_compiler(sort_compiler);
        self
    }

    pub fn with_default_limit(mut self, default_limit: usize) -> Self {
        self.paginator = self.paginator.with_default_limit(default_limit);
        self
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Handle to the cap; changes through it apply to every later call
    pub fn cap(&self) -> &OperationCap {
        &self.cap
    }

    fn by_id(id: &str) -> FilterExpr {
        FilterExpr::eq(ID_FIELD, Value::String(id.to_string()))
    }

    fn id_order() -> SortSpec {
        SortSpec::from_keys(vec![SortKey::asc(ID_FIELD)])
    }

    // ==================
    // Create
    // ==================

    pub async fn create_one(&self, document: Value) -> QueryResult<Value> {
        let stored = self.create_many(vec![document]).await?;
        stored.into_iter().next().ok_or_else(|| {
            StoreError::Backend("insert returned no document".to_string()).into()
        })
    }

    /// Insert every document or none
    pub async fn create_many(&self, documents: Vec<Value>) -> QueryResult<Vec<Value>> {
        self.cap.check(CappedOperation::Create, documents.len())?;
        let stored = self.store.insert_many(documents).await?;
        tracing::info!(count = stored.len(), "created documents");
        Ok(stored)
    }

    // ==================
    // Read
    // ==================

    pub async fn get_by_id(&self, id: &str) -> QueryResult<Option<Value>> {
        self.get_one(&Self::by_id(id)).await
    }

    pub async fn get_one(&self, filter: &FilterExpr) -> QueryResult<Option<Value>> {
        Ok(self.store.find_one(filter).await?)
    }

    pub async fn get_one_by_value(&self, field: &str, value: Value) -> QueryResult<Option<Value>> {
        self.get_one(&FilterExpr::eq(field, value)).await
    }

    /// Every match, in `_id` order; fails when more than the cap match
    pub async fn get_many(&self, filter: &FilterExpr) -> QueryResult<Vec<Value>> {
        let count = self.store.count(filter).await?;
        self.cap.check(CappedOperation::Get, count)?;
        Ok(self.store.find(filter, &Self::id_order(), None).await?)
    }

    pub async fn count(&self, filter: &FilterExpr) -> QueryResult<usize> {
        Ok(self.store.count(filter).await?)
    }

    // ==================
    // Update
    // ==================

    pub async fn update_by_id(
        &self,
        id: &str,
        changes: &Value,
        mode: UpdateMode,
    ) -> QueryResult<Option<Value>> {
        self.update_one(&Self::by_id(id), changes, mode).await
    }

    pub async fn update_one(
        &self,
        filter: &FilterExpr,
        changes: &Value,
        mode: UpdateMode,
    ) -> QueryResult<Option<Value>> {
        let updated = self.store.update_one(filter, changes, mode).await?;
        if let Some(document) = &updated {
            tracing::info!(id = ?document.get(ID_FIELD), ?mode, "updated document");
        }
        Ok(updated)
    }

    pub async fn update_many(
        &self,
        filter: &FilterExpr,
        changes: &Value,
        mode: UpdateMode,
    ) -> QueryResult<UpdateOutcome> {
        let count = self.store.count(filter).await?;
        self.cap.check(CappedOperation::Update, count)?;

        let outcome = self.store.update_many(filter, changes, mode).await?;
        tracing::info!(
            matched = outcome.matched,
            modified = outcome.modified,
            ?mode,
            "updated documents"
        );
        Ok(outcome)
    }

    // ==================
    // Delete
    // ==================

    pub async fn delete_by_id(&self, id: &str) -> QueryResult<Option<Value>> {
        self.delete_one(&Self::by_id(id)).await
    }

    pub async fn delete_one(&self, filter: &FilterExpr) -> QueryResult<Option<Value>> {
        let deleted = self.store.delete_one(filter).await?;
        if let Some(document) = &deleted {
            tracing::info!(id = ?document.get(ID_FIELD), "deleted document");
        }
        Ok(deleted)
    }

    pub async fn delete_many(&self, filter: &FilterExpr) -> QueryResult<usize> {
        let count = self.store.count(filter).await?;
        self.cap.check(CappedOperation::Delete, count)?;

        let deleted = self.store.delete_many(filter).await?;
        tracing::info!(count = deleted, "deleted documents");
        Ok(deleted)
    }

    // ==================
    // Paginated reads
    // ==================

    pub async fn paginate(&self, filter: &FilterExpr, request: &PageRequest) -> QueryResult<Page> {
        self.paginator.paginate(&self.store, filter, request).await
    }

    /// Paginate with filters and paging options parsed from a query string
    pub async fn paginate_params(&self, params: &QueryParams) -> QueryResult<Page> {
        let filter = params.to_filter()?;
        self.paginate(&filter, &params.page_request()).await
    }

    /// Documents whose `field` equals any of `values`
    pub async fn find_with_any(
        &self,
        field: &str,
        values: Vec<Value>,
        request: &PageRequest,
    ) -> QueryResult<Page> {
        self.paginate_list(field, FilterOperator::In, values, request)
            .await
    }

    /// Documents whose array `field` holds every one of `values`
    pub async fn find_with_all(
        &self,
        field: &str,
        values: Vec<Value>,
        request: &PageRequest,
    ) -> QueryResult<Page> {
        self.paginate_list(field, FilterOperator::All, values, request)
            .await
    }

    async fn paginate_list(
        &self,
        field: &str,
        op: FilterOperator,
        values: Vec<Value>,
        request: &PageRequest,
    ) -> QueryResult<Page> {
        let key = format!("{}[{}]", field, op);
        let filter =
            FilterCompiler::compile([(key, Value::Array(values))], Combinator::Intersection)?;
        self.paginate(&filter, request).await
    }
}
