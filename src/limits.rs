//! Operation cap
//!
//! Ceiling on how many documents one capped read, create, update or delete
//! may touch. The cap is an explicit handle owned by whoever builds the
//! repository; clones share the same value, so a runtime override through
//! one handle is seen by every holder.

use std::fmt;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use serde::Serialize;

use crate::errors::{QueryError, QueryResult};

/// Default cap when none is configured
pub const DEFAULT_MAX_OPERATIONS: usize = 2000;

/// Operations subject to the cap
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CappedOperation {
    Create,
    Get,
    Update,
    Delete,
}

impl CappedOperation {
    pub fn as_str(&self) -> &'static str {
        match self {
            CappedOperation::Create => "create",
            CappedOperation::Get => "get",
            CappedOperation::Update => "update",
            CappedOperation::Delete => "delete",
        }
    }
}

impl fmt::Display for CappedOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Shared, resettable operation cap
#[derive(Debug, Clone)]
pub struct OperationCap {
    current: Arc<AtomicUsize>,
    default: usize,
}

impl OperationCap {
    /// Create a cap whose reset value is `default`
    pub fn new(default: usize) -> Self {
        Self {
            current: Arc::new(AtomicUsize::new(default)),
            default,
        }
    }

    /// Current cap, read at call time
    pub fn get(&self) -> usize {
        self.current.load(Ordering::Relaxed)
    }

    /// Override the cap for every holder of this handle
    pub fn set(&self, value: usize) {
        tracing::warn!(cap = value, "operation cap overridden");
        self.current.store(value, Ordering::Relaxed);
    }

    /// Restore the configured default
    pub fn reset(&self) {
        self.current.store(self.default, Ordering::Relaxed);
    }

    /// The value `reset` restores
    pub fn default_value(&self) -> usize {
        self.default
    }

    /// Fails with `CapExceeded` when `count` is over the current cap
    pub fn check(&self, operation: CappedOperation, count: usize) -> QueryResult<()> {
        let cap = self.get();
        if count > cap {
            tracing::warn!(%operation, count, cap, "operation cap exceeded");
            return Err(QueryError::CapExceeded { operation, cap });
        }
        Ok(())
    }
}

impl Default for OperationCap {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_OPERATIONS)
    }
}
