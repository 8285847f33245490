//! # Configuration
//!
//! JSON configuration file:
//!
//! ```json
//! {
//!   "cursor_key": "<64 hex characters>",
//!   "max_operations": 2000,
//!   "default_limit": 100,
//!   "default_sort_direction": "asc",
//!   "log_level": "info"
//! }
//! ```
//!
//! Only `cursor_key` is required, and it may come from the
//! `DOCQUERY_CURSOR_KEY` environment variable instead.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::cursor::CursorCodec;
use crate::limits::{OperationCap, DEFAULT_MAX_OPERATIONS};
use crate::pagination::DEFAULT_PAGE_LIMIT;
use crate::repository::Repository;
use crate::sort::{SortCompiler, SortDirection};
use crate::store::DocumentStore;

/// Environment variable overriding `cursor_key`
pub const CURSOR_KEY_ENV: &str = "DOCQUERY_CURSOR_KEY";

/// Result type for configuration loading
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Configuration errors
#[derive(Debug, Clone, Error)]
pub enum ConfigError {
    #[error("Failed to read config: {0}")]
    Read(String),

    #[error("Invalid config JSON: {0}")]
    Parse(String),

    #[error("Invalid config: {0}")]
    Invalid(String),
}

impl ConfigError {
    pub fn code(&self) -> &'static str {
        match self {
            ConfigError::Read(_) => "CONFIG_READ",
            ConfigError::Parse(_) => "CONFIG_PARSE",
            ConfigError::Invalid(_) => "CONFIG_INVALID",
        }
    }
}

/// Query layer configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QueryConfig {
    /// Hex encoded AES-256 key for cursors
    #[serde(default)]
    pub cursor_key: Option<String>,

    /// Operation cap (optional, default 2000)
    #[serde(default = "default_max_operations")]
    pub max_operations: usize,

    /// Page size when a request names none (optional, default 100)
    #[serde(default = "default_limit")]
    pub default_limit: usize,

    /// Direction of the `_id` tiebreaker (optional, default "asc")
    #[serde(default)]
    pub default_sort_direction: SortDirection,

    /// Log filter used when RUST_LOG is unset (optional, default "info")
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_max_operations() -> usize {
    DEFAULT_MAX_OPERATIONS
}
fn default_limit() -> usize {
    DEFAULT_PAGE_LIMIT
}
fn default_log_level() -> String {
    "info".to_string()
}

impl QueryConfig {
    /// Load from file, apply environment overrides, then validate
    pub fn load(path: &Path) -> ConfigResult<Self> {
        let content = fs::read_to_string(path)
            .map_err(|e| ConfigError::Read(format!("{}: {}", path.display(), e)))?;

        let mut config = Self::from_json_str(&content)?;
        config.apply_overrides_from(|name| std::env::var(name).ok());
        config.validate()?;

        Ok(config)
    }

    /// Parse without overrides or validation
    pub fn from_json_str(content: &str) -> ConfigResult<Self> {
        serde_json::from_str(content).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    /// Apply overrides from a variable lookup such as the process environment
    pub fn apply_overrides_from<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(key) = lookup(CURSOR_KEY_ENV).filter(|k| !k.trim().is_empty()) {
            self.cursor_key = Some(key);
        }
    }

    pub fn validate(&self) -> ConfigResult<()> {
        self.cursor_codec()?;

        if self.max_operations == 0 {
            return Err(ConfigError::Invalid("max_operations must be > 0".to_string()));
        }

        if self.default_limit == 0 || self.default_limit > self.max_operations {
            return Err(ConfigError::Invalid(format!(
                "default_limit must be between 1 and max_operations ({})",
                self.max_operations
            )));
        }

        if self.log_level.trim().is_empty() {
            return Err(ConfigError::Invalid("log_level cannot be empty".to_string()));
        }

        Ok(())
    }

    pub fn cursor_codec(&self) -> ConfigResult<CursorCodec> {
        let key = self.cursor_key.as_deref().ok_or_else(|| {
            ConfigError::Invalid(format!(
                "cursor_key is required (or set {})",
                CURSOR_KEY_ENV
            ))
        })?;
        CursorCodec::from_hex(key).map_err(|e| ConfigError::Invalid(e.to_string()))
    }

    /// A fresh cap handle starting at `max_operations`
    pub fn operation_cap(&self) -> OperationCap {
        OperationCap::new(self.max_operations)
    }

    pub fn sort_compiler(&self) -> SortCompiler {
        SortCompiler::new(self.default_sort_direction)
    }

    /// Build a repository over `store` from this configuration
    pub fn repository<S: DocumentStore>(&self, store: S) -> ConfigResult<Repository<S>> {
        Ok(
            Repository::new(store, self.cursor_codec()?, self.operation_cap())
                .with_sort_compiler(self.sort_compiler())
                .with_default_limit(self.default_limit),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    const KEY: &str = "000102030405060708090a0b0c0d0e0f101112131415161718191a1b1c1d1e1f";

    #[test]
    fn test_config_defaults() {
        let config = QueryConfig::from_json_str(&format!(r#"{{"cursor_key": "{}"}}"#, KEY)).unwrap();

        assert!(config.validate().is_ok());
        assert_eq!(config.max_operations, 2000);
        assert_eq!(config.default_limit, 100);
        assert_eq!(config.default_sort_direction, SortDirection::Asc);
        assert_eq!(config.log_level, "info");
    }

    #[test]
    fn test_config_requires_cursor_key() {
        let config = QueryConfig::from_json_str("{}").unwrap();
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn test_env_override() {
        let mut config = QueryConfig::from_json_str(r#"{"cursor_key": "bad"}"#).unwrap();
        config.apply_overrides_from(|name| (name == CURSOR_KEY_ENV).then(|| KEY.to_string()));

        assert_eq!(config.cursor_key.as_deref(), Some(KEY));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_validates_limits() {
        let config = QueryConfig::from_json_str(&format!(
            r#"{{"cursor_key": "{}", "max_operations": 10, "default_limit": 11}}"#,
            KEY
        ))
        .unwrap();
        assert!(config.validate().is_err());

        let config = QueryConfig::from_json_str(&format!(
            r#"{{"cursor_key": "{}", "max_operations": 0}}"#,
            KEY
        ))
        .unwrap();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_load_from_file() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("docquery.json");
        fs::write(
            &config_path,
            format!(
                r#"{{"cursor_key": "{}", "default_sort_direction": "desc", "default_limit": 5}}"#,
                KEY
            ),
        )
        .unwrap();

        let config = QueryConfig::load(&config_path).unwrap();
        assert_eq!(config.default_limit, 5);
        assert_eq!(config.sort_compiler().default_direction(), SortDirection::Desc);

        let missing = QueryConfig::load(&temp_dir.path().join("nope.json"));
        assert!(matches!(missing, Err(ConfigError::Read(_))));
    }

    #[test]
    fn test_invalid_json() {
        assert!(matches!(
            QueryConfig::from_json_str("{not json"),
            Err(ConfigError::Parse(_))
        ));
    }
}
