//! CLI-specific error types

use std::io;

use thiserror::Error;

use crate::config::ConfigError;
use crate::errors::QueryError;
use crate::store::StoreError;

/// CLI error
#[derive(Debug, Error)]
pub enum CliError {
    #[error("{0}")]
    Config(#[from] ConfigError),

    #[error("{0}")]
    Query(#[from] QueryError),

    #[error("Failed to load documents: {0}")]
    Store(#[from] StoreError),

    #[error("Invalid data file: {0}")]
    Data(String),

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl CliError {
    /// Get the error code string
    pub fn code(&self) -> &'static str {
        match self {
            CliError::Config(e) => e.code(),
            CliError::Query(e) => e.code(),
            CliError::Store(_) => "CLI_STORE",
            CliError::Data(_) => "CLI_DATA",
            CliError::Io(_) => "CLI_IO",
            CliError::Json(_) => "CLI_JSON",
        }
    }
}

/// CLI result type
pub type CliResult<T> = Result<T, CliError>;
