//! # Filter Operators
//!
//! The closed operator vocabulary accepted in `field[operator]` keys.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::errors::QueryError;

/// Filter operators
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FilterOperator {
    /// Equals (array fields match when they contain the value)
    Eq,
    /// Not equals
    Ne,
    /// Value in list
    In,
    /// Value not in list
    Nin,
    /// Array field contains every listed value
    All,
    /// Field presence
    Exists,
    /// Greater than
    Gt,
    /// Greater than or equal
    Gte,
    /// Less than
    Lt,
    /// Less than or equal
    Lte,
    /// Regular expression match
    Regex,
    /// Array length
    Size,
    /// Strictly after the operand in sort order
    #[serde(rename = "sorted_after")]
    SortedAfter,
    /// Strictly before the operand in sort order
    #[serde(rename = "sorted_before")]
    SortedBefore,
    /// Same sort position as the operand
    #[serde(rename = "sorted_eq")]
    SortedEq,
}

impl FilterOperator {
    /// Every operator accepted in `field[operator]` keys, in documentation order.
    /// The `Sorted*` operators are built only by cursor continuation.
    pub const ALL: [FilterOperator; 12] = [
        FilterOperator::Eq,
        FilterOperator::Ne,
        FilterOperator::In,
        FilterOperator::Nin,
        FilterOperator::All,
        FilterOperator::Exists,
        FilterOperator::Gt,
        FilterOperator::Gte,
        FilterOperator::Lt,
        FilterOperator::Lte,
        FilterOperator::Regex,
        FilterOperator::Size,
    ];

    /// Get the operator string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            FilterOperator::Eq => "eq",
            FilterOperator::Ne => "ne",
            FilterOperator::In => "in",
            FilterOperator::Nin => "nin",
            FilterOperator::All => "all",
            FilterOperator::Exists => "exists",
            FilterOperator::Gt => "gt",
            FilterOperator::Gte => "gte",
            FilterOperator::Lt => "lt",
            FilterOperator::Lte => "lte",
            FilterOperator::Regex => "regex",
            FilterOperator::Size => "size",
            FilterOperator::SortedAfter => "sorted_after",
            FilterOperator::SortedBefore => "sorted_before",
            FilterOperator::SortedEq => "sorted_eq",
        }
    }

    /// Returns true for ordered comparisons
    pub fn is_range(&self) -> bool {
        matches!(
            self,
            FilterOperator::Gt | FilterOperator::Gte | FilterOperator::Lt | FilterOperator::Lte
        )
    }

    /// Returns true for comparisons in the total sort order
    pub fn is_sort_position(&self) -> bool {
        matches!(
            self,
            FilterOperator::SortedAfter | FilterOperator::SortedBefore | FilterOperator::SortedEq
        )
    }

    /// Returns true for operators whose operand is a list
    pub fn takes_list(&self) -> bool {
        matches!(
            self,
            FilterOperator::In | FilterOperator::Nin | FilterOperator::All
        )
    }
}

impl fmt::Display for FilterOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FilterOperator {
    type Err = QueryError;

    fn from_str(name: &str) -> Result<Self, Self::Err> {
        FilterOperator::ALL
            .iter()
            .copied()
            .find(|op| op.as_str() == name)
            .ok_or_else(|| {
                let supported: Vec<&str> = FilterOperator::ALL.iter().map(|op| op.as_str()).collect();
                QueryError::validation(format!(
                    "Unsupported filter operator '{}' (expected one of: {})",
                    name,
                    supported.join(", ")
                ))
            })
    }
}
