//! # Filter Compiler
//!
//! Turns `field[operator] -> value` entries into a [`FilterExpr`].
//!
//! Plain keys mean equality. Operators on the same field accumulate into
//! one clause; clauses for distinct fields are combined with the caller's
//! [`Combinator`].

use std::collections::HashMap;

use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::expr::{FieldClause, FilterExpr};
use super::operator::FilterOperator;
use crate::errors::{QueryError, QueryResult};

/// How per-field clauses are combined
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Combinator {
    /// Every clause must match
    #[default]
    Intersection,
    /// Any clause may match
    Union,
}

impl Combinator {
    /// Map the `union` query flag onto a combinator
    pub fn from_union_flag(union: bool) -> Self {
        if union {
            Combinator::Union
        } else {
            Combinator::Intersection
        }
    }

    fn combine(&self, exprs: Vec<FilterExpr>) -> FilterExpr {
        match self {
            Combinator::Intersection => FilterExpr::And(exprs),
            Combinator::Union => FilterExpr::Or(exprs),
        }
    }
}

/// Compiles flat filter entries
pub struct FilterCompiler;

impl FilterCompiler {
    /// Compile entries in iteration order.
    ///
    /// Fields are emitted in first-seen order. Zero entries compile to
    /// [`FilterExpr::All`], one field to its bare clause.
    pub fn compile<I, K>(entries: I, combinator: Combinator) -> QueryResult<FilterExpr>
    where
        I: IntoIterator<Item = (K, Value)>,
        K: AsRef<str>,
    {
        let mut clauses: Vec<FieldClause> = Vec::new();
        let mut positions: HashMap<String, usize> = HashMap::new();

        for (key, value) in entries {
            let (field, op) = Self::parse_key(key.as_ref())?;
            let value = Self::normalize_value(field, op, value)?;

            let index = match positions.get(field) {
                Some(&index) => index,
                None => {
                    positions.insert(field.to_string(), clauses.len());
                    clauses.push(FieldClause::new(field));
                    clauses.len() - 1
                }
            };
            clauses[index].set(op, value);
        }

        tracing::debug!(fields = clauses.len(), ?combinator, "compiled filter");

        let mut exprs: Vec<FilterExpr> = clauses.into_iter().map(FilterExpr::Field).collect();
        Ok(match exprs.len() {
            0 => FilterExpr::All,
            1 => exprs.remove(0),
            _ => combinator.combine(exprs),
        })
    }

    /// Compile a JSON object of filter entries
    pub fn compile_map(filters: &Map<String, Value>, combinator: Combinator) -> QueryResult<FilterExpr> {
        Self::compile(
            filters.iter().map(|(key, value)| (key.as_str(), value.clone())),
            combinator,
        )
    }

    /// Split `field[operator]` into its parts; a bare key means `eq`
    pub fn parse_key(key: &str) -> QueryResult<(&str, FilterOperator)> {
        let (field, op) = match key.find('[') {
            Some(open) => {
                let rest = &key[open + 1..];
                let name = rest.strip_suffix(']').ok_or_else(|| {
                    QueryError::validation(format!("Malformed filter key '{}': missing ']'", key))
                })?;
                (&key[..open], name.parse::<FilterOperator>()?)
            }
            None => (key, FilterOperator::Eq),
        };

        if field.is_empty() {
            return Err(QueryError::validation(format!(
                "Malformed filter key '{}': empty field name",
                key
            )));
        }
        if field.contains(']') || field.contains('[') {
            return Err(QueryError::validation(format!(
                "Malformed filter key '{}'",
                key
            )));
        }

        Ok((field, op))
    }

    /// Check and coerce an operand for its operator
    fn normalize_value(field: &str, op: FilterOperator, value: Value) -> QueryResult<Value> {
        match op {
            FilterOperator::In | FilterOperator::Nin | FilterOperator::All => match value {
                Value::Array(_) => Ok(value),
                Value::Object(_) => Err(operand_error(field, op, "a list")),
                scalar => Ok(Value::Array(vec![scalar])),
            },
            FilterOperator::Exists => match &value {
                Value::Bool(_) => Ok(value),
                Value::String(s) => match s.as_str() {
                    "true" | "1" => Ok(Value::Bool(true)),
                    "false" | "0" => Ok(Value::Bool(false)),
                    _ => Err(operand_error(field, op, "a boolean")),
                },
                _ => Err(operand_error(field, op, "a boolean")),
            },
            FilterOperator::Size => {
                let size = match &value {
                    Value::Number(n) => n.as_u64(),
                    Value::String(s) => s.parse::<u64>().ok(),
                    _ => None,
                };
                size.map(Value::from)
                    .ok_or_else(|| operand_error(field, op, "a non-negative integer"))
            }
            FilterOperator::Regex => match &value {
                Value::String(pattern) => {
                    Regex::new(pattern).map_err(|e| {
                        QueryError::validation(format!("Invalid pattern for '{}[regex]': {}", field, e))
                    })?;
                    Ok(value)
                }
                _ => Err(operand_error(field, op, "a string pattern")),
            },
            FilterOperator::Gt | FilterOperator::Gte | FilterOperator::Lt | FilterOperator::Lte => {
                match value {
                    Value::Array(_) | Value::Object(_) => Err(operand_error(field, op, "a scalar")),
                    scalar => Ok(scalar),
                }
            }
            FilterOperator::Eq
            | FilterOperator::Ne
            | FilterOperator::SortedAfter
            | FilterOperator::SortedBefore
            | FilterOperator::SortedEq => Ok(value),
        }
    }
}

fn operand_error(field: &str, op: FilterOperator, expected: &str) -> QueryError {
    QueryError::validation(format!("'{}[{}]' expects {}", field, op, expected))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn compile(entries: Vec<(&str, Value)>) -> QueryResult<FilterExpr> {
        FilterCompiler::compile(entries, Combinator::Intersection)
    }

    #[test]
    fn test_plain_key_is_equality() {
        let expr = compile(vec![("name", json!("Ada"))]).unwrap();
        assert_eq!(expr, FilterExpr::eq("name", json!("Ada")));
    }

    #[test]
    fn test_operators_on_same_field_accumulate() {
        let expr = compile(vec![("age[gt]", json!(18)), ("age[lte]", json!(65))]).unwrap();

        let expected = FieldClause::new("age")
            .with(FilterOperator::Gt, json!(18))
            .with(FilterOperator::Lte, json!(65));
        assert_eq!(expr, FilterExpr::Field(expected));
    }

    #[test]
    fn test_multiple_fields_use_combinator() {
        let entries = vec![("tags[in]", json!(["vip"])), ("status", json!("active"))];

        let and = FilterCompiler::compile(entries.clone(), Combinator::Intersection).unwrap();
        assert!(matches!(and, FilterExpr::And(ref v) if v.len() == 2));

        let or = FilterCompiler::compile(entries, Combinator::Union).unwrap();
        match or {
            FilterExpr::Or(exprs) => {
                assert_eq!(exprs[0], FilterExpr::in_list("tags", vec![json!("vip")]));
                assert_eq!(exprs[1], FilterExpr::eq("status", json!("active")));
            }
            other => panic!("expected union, got {:?}", other),
        }
    }

    #[test]
    fn test_empty_input_matches_everything() {
        assert_eq!(compile(vec![]).unwrap(), FilterExpr::All);
        assert_eq!(
            FilterCompiler::compile_map(&Map::new(), Combinator::Union).unwrap(),
            FilterExpr::All
        );
    }

    #[test]
    fn test_unknown_operator_rejected() {
        let err = compile(vec![("age[where]", json!(1))]).unwrap_err();
        assert!(matches!(err, QueryError::Validation(_)));
    }

    #[test]
    fn test_malformed_keys_rejected() {
        assert!(FilterCompiler::parse_key("age[gt").is_err());
        assert!(FilterCompiler::parse_key("[gt]").is_err());
        assert!(FilterCompiler::parse_key("age[gt]x").is_err());
        assert!(FilterCompiler::parse_key("age]").is_err());
    }

    #[test]
    fn test_list_operators_promote_scalars() {
        let expr = compile(vec![("tags[all]", json!("vip"))]).unwrap();
        assert_eq!(
            expr,
            FilterExpr::condition("tags", FilterOperator::All, json!(["vip"]))
        );
    }

    #[test]
    fn test_exists_and_size_coerce_strings() {
        let expr = compile(vec![("email[exists]", json!("false")), ("tags[size]", json!("2"))]).unwrap();
        match expr {
            FilterExpr::And(exprs) => {
                assert_eq!(
                    exprs[0],
                    FilterExpr::condition("email", FilterOperator::Exists, json!(false))
                );
                assert_eq!(exprs[1], FilterExpr::condition("tags", FilterOperator::Size, json!(2)));
            }
            other => panic!("expected intersection, got {:?}", other),
        }

        assert!(compile(vec![("email[exists]", json!("maybe"))]).is_err());
        assert!(compile(vec![("tags[size]", json!(-1))]).is_err());
    }

    #[test]
    fn test_invalid_regex_rejected() {
        assert!(compile(vec![("name[regex]", json!("^(ada"))]).is_err());
        assert!(compile(vec![("name[regex]", json!("(?i)^ada"))]).is_ok());
    }

    #[test]
    fn test_range_operand_must_be_scalar() {
        assert!(compile(vec![("age[gt]", json!([1, 2]))]).is_err());
    }
}
