//! Seek predicates
//!
//! For sort keys `(f1, d1) .. (fn, dn)` and last-seen values `v1 .. vn`,
//! the documents strictly after the anchor are
//!
//! ```text
//! OR over i of ( f1 = v1 AND .. AND f(i-1) = v(i-1) AND fi cmp_i vi )
//! ```
//!
//! where `cmp_i` is "after" for ascending keys and "before" for descending
//! ones. Both sides compare by the sort's total value order, so missing,
//! null and mixed-type values are continued exactly as they were sorted.

use serde_json::Value;

use crate::errors::{QueryError, QueryResult};
use crate::filter::{FilterExpr, FilterOperator};
use crate::sort::SortSpec;
use crate::store::field_value;

/// Sort-key values of the anchor document, in key order
pub fn anchor_values(document: &Value, sort: &SortSpec) -> QueryResult<Vec<Value>> {
    sort.keys()
        .iter()
        .map(|key| {
            field_value(document, &key.field).cloned().ok_or_else(|| {
                QueryError::validation(format!("{} does not exist on this document", key.field))
            })
        })
        .collect()
}

/// Filter selecting documents strictly after the anchor values
pub fn seek_clause(sort: &SortSpec, values: &[Value]) -> QueryResult<FilterExpr> {
    if values.len() != sort.len() {
        return Err(QueryError::cursor(format!(
            "expected {} sort values, found {}",
            sort.len(),
            values.len()
        )));
    }

    let keys = sort.keys();
    let branches = keys
        .iter()
        .enumerate()
        .map(|(i, key)| {
            let mut parts: Vec<FilterExpr> = keys[..i]
                .iter()
                .zip(values)
                .map(|(prefix, value)| {
                    FilterExpr::condition(
                        prefix.field.clone(),
                        FilterOperator::SortedEq,
                        value.clone(),
                    )
                })
                .collect();
            parts.push(FilterExpr::condition(
                key.field.clone(),
                key.direction.seek_operator(),
                values[i].clone(),
            ));
            FilterExpr::and(parts)
        })
        .collect();

    Ok(FilterExpr::or(branches))
}
