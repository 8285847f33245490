//! # In-Memory Document Store
//!
//! A [`DocumentStore`] over a vector of JSON documents kept in insertion
//! order. Used by the CLI and the test suites.
//!
//! Inserted documents get a UUID `_id` when they carry none, plus
//! `createdAt`/`updatedAt` stamps (RFC 3339, milliseconds) unless the
//! caller supplied them. Updates restamp `updatedAt` when content changes.

use std::collections::HashSet;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use async_trait::async_trait;
use chrono::{SecondsFormat, Utc};
use serde_json::{Map, Value};
use uuid::Uuid;

use super::backend::{DocumentStore, UpdateMode, UpdateOutcome};
use super::document::{document_id, ID_FIELD};
use super::errors::{StoreError, StoreResult};
use super::matcher::CompiledFilter;
use super::sorter::ResultSorter;
use crate::filter::FilterExpr;
use crate::sort::SortSpec;

/// Creation timestamp field
pub const CREATED_AT_FIELD: &str = "createdAt";

/// Last-update timestamp field
pub const UPDATED_AT_FIELD: &str = "updatedAt";

fn timestamp() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Process-local document collection
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    documents: Arc<RwLock<Vec<Value>>>,
}

impl MemoryStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store seeded with `documents`
    pub fn from_documents(documents: Vec<Value>) -> StoreResult<Self> {
        let store = Self::new();
        store.insert_batch(documents)?;
        Ok(store)
    }

    /// Number of stored documents
    pub fn len(&self) -> StoreResult<usize> {
        Ok(self.read()?.len())
    }

    pub fn is_empty(&self) -> StoreResult<bool> {
        Ok(self.len()? == 0)
    }

    fn read(&self) -> StoreResult<RwLockReadGuard<'_, Vec<Value>>> {
        self.documents
            .read()
            .map_err(|_| StoreError::Backend("document lock poisoned".to_string()))
    }

    fn write(&self) -> StoreResult<RwLockWriteGuard<'_, Vec<Value>>> {
        self.documents
            .write()
            .map_err(|_| StoreError::Backend("document lock poisoned".to_string()))
    }

    /// Validate and stamp the whole batch before storing any of it
    fn insert_batch(&self, documents: Vec<Value>) -> StoreResult<Vec<Value>> {
        let now = timestamp();
        let mut stored = self.write()?;

        let mut seen: HashSet<String> = stored
            .iter()
            .filter_map(document_id)
            .map(str::to_string)
            .collect();

        let mut prepared = Vec::with_capacity(documents.len());
        for document in documents {
            let Value::Object(mut map) = document else {
                return Err(StoreError::InvalidDocument(
                    "documents must be JSON objects".to_string(),
                ));
            };

            let id = match map.get(ID_FIELD) {
                None => Uuid::new_v4().to_string(),
                Some(Value::String(id)) if !id.is_empty() => id.clone(),
                Some(other) => {
                    return Err(StoreError::InvalidDocument(format!(
                        "{} must be a non-empty string, got {}",
                        ID_FIELD, other
                    )))
                }
            };
            if !seen.insert(id.clone()) {
                return Err(StoreError::DuplicateId(id));
            }

            map.insert(ID_FIELD.to_string(), Value::String(id));
            map.entry(CREATED_AT_FIELD)
                .or_insert_with(|| Value::String(now.clone()));
            map.entry(UPDATED_AT_FIELD)
                .or_insert_with(|| Value::String(now.clone()));
            prepared.push(Value::Object(map));
        }

        stored.extend(prepared.iter().cloned());
        Ok(prepared)
    }

    /// Apply `changes` to a copy of `current`. Returns `None` when nothing
    /// would change.
    fn apply_changes(
        current: &Value,
        changes: &Value,
        mode: UpdateMode,
        now: &str,
    ) -> StoreResult<Option<Value>> {
        let Value::Object(changes) = changes else {
            return Err(StoreError::InvalidDocument(
                "update changes must be a JSON object".to_string(),
            ));
        };
        if let Some(id) = changes.get(ID_FIELD) {
            if Some(id) != current.get(ID_FIELD) {
                return Err(StoreError::InvalidDocument(format!(
                    "{} cannot be changed",
                    ID_FIELD
                )));
            }
        }

        let mut next = match mode {
            UpdateMode::Merge => current.as_object().cloned().unwrap_or_default(),
            UpdateMode::Overwrite => {
                let mut kept = Map::new();
                for key in [ID_FIELD, CREATED_AT_FIELD, UPDATED_AT_FIELD] {
                    if let Some(value) = current.get(key) {
                        kept.insert(key.to_string(), value.clone());
                    }
                }
                kept
            }
        };
        for (key, value) in changes {
            next.insert(key.clone(), value.clone());
        }

        let mut next = Value::Object(next);
        if &next == current {
            return Ok(None);
        }
        if !changes.contains_key(UPDATED_AT_FIELD) {
            next[UPDATED_AT_FIELD] = Value::String(now.to_string());
        }
        Ok(Some(next))
    }
}

#[async_trait]
impl DocumentStore for MemoryStore {
    async fn count(&self, filter: &FilterExpr) -> StoreResult<usize> {
        let compiled = CompiledFilter::new(filter)?;
        let documents = self.read()?;
        Ok(documents.iter().filter(|d| compiled.matches(d)).count())
    }

    async fn find(
        &self,
        filter: &FilterExpr,
        sort: &SortSpec,
        limit: Option<usize>,
    ) -> StoreResult<Vec<Value>> {
        let compiled = CompiledFilter::new(filter)?;
        let mut matched: Vec<Value> = {
            let documents = self.read()?;
            documents
                .iter()
                .filter(|d| compiled.matches(d))
                .cloned()
                .collect()
        };

        ResultSorter::sort(&mut matched, sort);
        if let Some(limit) = limit {
            matched.truncate(limit);
        }
        Ok(matched)
    }

    async fn find_one(&self, filter: &FilterExpr) -> StoreResult<Option<Value>> {
        let compiled = CompiledFilter::new(filter)?;
        let documents = self.read()?;
        Ok(documents.iter().find(|d| compiled.matches(d)).cloned())
    }

    async fn insert_many(&self, documents: Vec<Value>) -> StoreResult<Vec<Value>> {
        self.insert_batch(documents)
    }

    async fn update_one(
        &self,
        filter: &FilterExpr,
        changes: &Value,
        mode: UpdateMode,
    ) -> StoreResult<Option<Value>> {
        let compiled = CompiledFilter::new(filter)?;
        let now = timestamp();
        let mut documents = self.write()?;

        let Some(position) = documents.iter().position(|d| compiled.matches(d)) else {
            return Ok(None);
        };
        if let Some(next) = Self::apply_changes(&documents[position], changes, mode, &now)? {
            documents[position] = next;
        }
        Ok(Some(documents[position].clone()))
    }

    async fn update_many(
        &self,
        filter: &FilterExpr,
        changes: &Value,
        mode: UpdateMode,
    ) -> StoreResult<UpdateOutcome> {
        let compiled = CompiledFilter::new(filter)?;
        let now = timestamp();
        let mut documents = self.write()?;

        // Compute every replacement first so a bad change leaves no partial write
        let mut replacements = Vec::new();
        let mut outcome = UpdateOutcome::default();
        for (position, document) in documents.iter().enumerate() {
            if !compiled.matches(document) {
                continue;
            }
            outcome.matched += 1;
            if let Some(next) = Self::apply_changes(document, changes, mode, &now)? {
                replacements.push((position, next));
            }
        }

        outcome.modified = replacements.len();
        for (position, next) in replacements {
            documents[position] = next;
        }
        Ok(outcome)
    }

    async fn delete_one(&self, filter: &FilterExpr) -> StoreResult<Option<Value>> {
        let compiled = CompiledFilter::new(filter)?;
        let mut documents = self.write()?;
        Ok(documents
            .iter()
            .position(|d| compiled.matches(d))
            .map(|position| documents.remove(position)))
    }

    async fn delete_many(&self, filter: &FilterExpr) -> StoreResult<usize> {
        let compiled = CompiledFilter::new(filter)?;
        let mut documents = self.write()?;
        let before = documents.len();
        documents.retain(|d| !compiled.matches(d));
        Ok(before - documents.len())
    }
}
