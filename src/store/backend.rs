//! # Document Store Trait
//!
//! The storage collaborator behind a repository. One store is one
//! collection of JSON documents.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::errors::StoreResult;
use crate::filter::FilterExpr;
use crate::sort::SortSpec;

/// How update changes are applied to a stored document
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UpdateMode {
    /// Set the given top-level fields, keep the rest
    #[default]
    Merge,
    /// Replace every field except the identifier and creation time
    Overwrite,
}

/// Result of a multi-document update
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateOutcome {
    /// Documents matching the filter
    pub matched: usize,
    /// Documents whose content changed
    pub modified: usize,
}

/// Asynchronous document collection
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Number of documents matching `filter`
    async fn count(&self, filter: &FilterExpr) -> StoreResult<usize>;

    /// Matching documents in `sort` order, at most `limit` of them
    async fn find(
        &self,
        filter: &FilterExpr,
        sort: &SortSpec,
        limit: Option<usize>,
    ) -> StoreResult<Vec<Value>>;

    /// First matching document in insertion order
    async fn find_one(&self, filter: &FilterExpr) -> StoreResult<Option<Value>>;

    /// Insert all documents or none; returns them as stored
    async fn insert_many(&self, documents: Vec<Value>) -> StoreResult<Vec<Value>>;

    /// Update the first match; returns the updated document
    async fn update_one(
        &self,
        filter: &FilterExpr,
        changes: &Value,
        mode: UpdateMode,
    ) -> StoreResult<Option<Value>>;

    /// Update every match
    async fn update_many(
        &self,
        filter: &FilterExpr,
        changes: &Value,
        mode: UpdateMode,
    ) -> StoreResult<UpdateOutcome>;

    /// Remove the first match; returns the removed document
    async fn delete_one(&self, filter: &FilterExpr) -> StoreResult<Option<Value>>;

    /// Remove every match; returns how many were removed
    async fn delete_many(&self, filter: &FilterExpr) -> StoreResult<usize>;
}
