//! Sort token compiler

use super::{SortDirection, SortKey, SortSpec};
use crate::errors::{QueryError, QueryResult};
use crate::store::ID_FIELD;

/// Compiles signed sort tokens into a total-order [`SortSpec`]
#[derive(Debug, Clone, Copy, Default)]
pub struct SortCompiler {
    /// Direction of the appended identifier key
    default_direction: SortDirection,
}

impl SortCompiler {
    pub fn new(default_direction: SortDirection) -> Self {
        Self { default_direction }
    }

    pub fn default_direction(&self) -> SortDirection {
        self.default_direction
    }

    /// Compile tokens in order, appending the identifier key if absent.
    ///
    /// Unprefixed tokens sort ascending. Empty tokens and repeated fields
    /// are rejected.
    pub fn compile<S: AsRef<str>>(&self, tokens: &[S]) -> QueryResult<SortSpec> {
        let mut keys: Vec<SortKey> = Vec::with_capacity(tokens.len() + 1);

        for token in tokens {
            let key = Self::parse_token(token.as_ref())?;
            if keys.iter().any(|k| k.field == key.field) {
                return Err(QueryError::validation(format!(
                    "Duplicate sort field: {}",
                    key.field
                )));
            }
            keys.push(key);
        }

        if keys.iter().all(|k| k.field != ID_FIELD) {
            keys.push(SortKey {
                field: ID_FIELD.to_string(),
                direction: self.default_direction,
            });
        }

        Ok(SortSpec::from_keys(keys))
    }

    /// Parse one `+field` / `-field` / `field` token
    pub fn parse_token(token: &str) -> QueryResult<SortKey> {
        let token = token.trim();
        let (field, direction) = if let Some(field) = token.strip_prefix('-') {
            (field, SortDirection::Desc)
        } else if let Some(field) = token.strip_prefix('+') {
            (field, SortDirection::Asc)
        } else {
            (token, SortDirection::Asc)
        };

        if field.is_empty() {
            return Err(QueryError::validation(format!(
                "Invalid sort field: '{}'",
                token
            )));
        }

        Ok(SortKey {
            field: field.to_string(),
            direction,
        })
    }
}
