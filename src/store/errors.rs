//! # Store Errors

use thiserror::Error;

/// Result type for store operations
pub type StoreResult<T> = Result<T, StoreError>;

/// Storage collaborator errors
#[derive(Debug, Clone, Error)]
pub enum StoreError {
    /// Document is not a JSON object or carries a bad identifier
    #[error("Invalid document: {0}")]
    InvalidDocument(String),

    /// Insert would reuse an identifier
    #[error("Duplicate document id: {0}")]
    DuplicateId(String),

    /// Filter could not be evaluated
    #[error("Invalid filter: {0}")]
    InvalidFilter(String),

    /// Backend failure
    #[error("Backend failure: {0}")]
    Backend(String),
}
