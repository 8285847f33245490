//! Query error types
//!
//! Error codes:
//! - QUERY_VALIDATION (400)
//! - QUERY_CURSOR (400)
//! - QUERY_CAP_EXCEEDED (400)
//! - QUERY_STORE (500)

use thiserror::Error;

use crate::limits::CappedOperation;
use crate::store::StoreError;

/// Result type for query operations
pub type QueryResult<T> = Result<T, QueryError>;

/// Errors raised while compiling, paginating or applying capped writes
#[derive(Debug, Clone, Error)]
pub enum QueryError {
    // ==================
    // Client Errors (4xx)
    // ==================
    /// Bad limit, missing field, bad operator or bad parameter cast
    #[error("Validation failed: {0}")]
    Validation(String),

    /// Corrupt, undecryptable or foreign cursor
    #[error("Invalid cursor: {0}")]
    Cursor(String),

    /// Operation would touch more documents than the cap allows
    #[error("You can only {operation} up to {cap} documents at a time")]
    CapExceeded {
        operation: CappedOperation,
        cap: usize,
    },

    // ==================
    // Server Errors (5xx)
    // ==================
    /// Storage collaborator failure
    #[error("Store error: {0}")]
    Store(#[from] StoreError),
}

impl QueryError {
    /// Create a validation error
    pub fn validation(reason: impl Into<String>) -> Self {
        QueryError::Validation(reason.into())
    }

    /// Create a cursor error
    pub fn cursor(reason: impl Into<String>) -> Self {
        QueryError::Cursor(reason.into())
    }

    /// Returns the stable error code
    pub fn code(&self) -> &'static str {
        match self {
            QueryError::Validation(_) => "QUERY_VALIDATION",
            QueryError::Cursor(_) => "QUERY_CURSOR",
            QueryError::CapExceeded { .. } => "QUERY_CAP_EXCEEDED",
            QueryError::Store(_) => "QUERY_STORE",
        }
    }

    /// HTTP-equivalent status code for this error
    pub fn status_code(&self) -> u16 {
        match self {
            QueryError::Validation(_) | QueryError::Cursor(_) | QueryError::CapExceeded { .. } => {
                400
            }
            QueryError::Store(_) => 500,
        }
    }

    /// Returns true if the caller is at fault
    pub fn is_client_error(&self) -> bool {
        self.status_code() < 500
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        assert_eq!(QueryError::validation("bad").status_code(), 400);
        assert_eq!(QueryError::cursor("bad").status_code(), 400);
        assert_eq!(
            QueryError::Store(StoreError::Backend("down".to_string())).status_code(),
            500
        );
    }

    #[test]
    fn test_cap_message_names_cap() {
        let err = QueryError::CapExceeded {
            operation: CappedOperation::Delete,
            cap: 100,
        };
        assert_eq!(
            err.to_string(),
            "You can only delete up to 100 documents at a time"
        );
        assert_eq!(err.code(), "QUERY_CAP_EXCEEDED");
        assert!(err.is_client_error());
    }
}
