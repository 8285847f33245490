//! Sort compilation
//!
//! Signed field tokens (`-createdAt`, `+name`, `name`) become a
//! [`SortSpec`]. The document identifier is always the last key, so the
//! resulting order is total even when other sort keys repeat.

mod compiler;

pub use compiler::SortCompiler;

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::errors::QueryError;
use crate::filter::FilterOperator;

/// Sort direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

impl SortDirection {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortDirection::Asc => "asc",
            SortDirection::Desc => "desc",
        }
    }

    /// Operator selecting documents strictly after a position in this direction
    pub fn seek_operator(&self) -> FilterOperator {
        match self {
            SortDirection::Asc => FilterOperator::SortedAfter,
            SortDirection::Desc => FilterOperator::SortedBefore,
        }
    }

    /// Orient an ascending comparison
    pub fn apply(&self, ordering: Ordering) -> Ordering {
        match self {
            SortDirection::Asc => ordering,
            SortDirection::Desc => ordering.reverse(),
        }
    }
}

impl fmt::Display for SortDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SortDirection {
    type Err = QueryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "asc" | "1" => Ok(SortDirection::Asc),
            "desc" | "-1" => Ok(SortDirection::Desc),
            _ => Err(QueryError::validation(format!(
                "Invalid sort direction: {}",
                s
            ))),
        }
    }
}

/// One sort key
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SortKey {
    pub field: String,
    pub direction: SortDirection,
}

impl SortKey {
    pub fn asc(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            direction: SortDirection::Asc,
        }
    }

    pub fn desc(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            direction: SortDirection::Desc,
        }
    }
}

/// Ordered sort keys; built by [`SortCompiler`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SortSpec {
    keys: Vec<SortKey>,
}

impl SortSpec {
    /// Wrap already-compiled keys as is
    pub fn from_keys(keys: Vec<SortKey>) -> Self {
        Self { keys }
    }

    pub fn keys(&self) -> &[SortKey] {
        &self.keys
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    /// Returns true if a key sorts on `field`
    pub fn contains(&self, field: &str) -> bool {
        self.keys.iter().any(|k| k.field == field)
    }

    /// Signed token form, e.g. `["-createdAt", "+_id"]`
    pub fn tokens(&self) -> Vec<String> {
        self.keys
            .iter()
            .map(|k| match k.direction {
                SortDirection::Asc => format!("+{}", k.field),
                SortDirection::Desc => format!("-{}", k.field),
            })
            .collect()
    }
}
