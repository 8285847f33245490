//! Filter evaluation for in-process stores
//!
//! Evaluates a [`FilterExpr`] against JSON documents. Regex operands are
//! compiled once per query, not once per document.
//!
//! Semantics:
//! - `eq` matches equal values, array fields containing the value, and a
//!   missing field when the operand is `null`
//! - range operators only compare values of the same class
//! - array fields satisfy scalar conditions when any element does
//! - `sorted_*` compare the whole field by the sort order, missing included

use std::cmp::Ordering;

use regex::Regex;
use serde_json::Value;

use super::document::field_value;
use super::errors::{StoreError, StoreResult};
use super::value::{compare_same_class, compare_values, values_equal};
use crate::filter::{FilterExpr, FilterOperator};

/// A filter prepared for repeated evaluation
#[derive(Debug)]
pub struct CompiledFilter {
    root: Node,
}

#[derive(Debug)]
enum Node {
    All,
    Field {
        field: String,
        conditions: Vec<Check>,
    },
    And(Vec<Node>),
    Or(Vec<Node>),
}

#[derive(Debug)]
enum Check {
    Regex(Regex),
    Value(FilterOperator, Value),
}

impl CompiledFilter {
    /// Prepare a filter, compiling any regex operands
    pub fn new(filter: &FilterExpr) -> StoreResult<Self> {
        Ok(Self {
            root: Self::build(filter)?,
        })
    }

    fn build(filter: &FilterExpr) -> StoreResult<Node> {
        Ok(match filter {
            FilterExpr::All => Node::All,
            FilterExpr::Field(clause) => {
                let mut conditions = Vec::with_capacity(clause.conditions.len());
                for condition in &clause.conditions {
                    conditions.push(match (condition.op, &condition.value) {
                        (FilterOperator::Regex, Value::String(pattern)) => {
                            Check::Regex(Regex::new(pattern).map_err(|e| {
                                StoreError::InvalidFilter(format!("{}: {}", clause.field, e))
                            })?)
                        }
                        (FilterOperator::Regex, _) => {
                            return Err(StoreError::InvalidFilter(format!(
                                "{}: regex operand must be a string",
                                clause.field
                            )))
                        }
                        (op, value) => Check::Value(op, value.clone()),
                    });
                }
                Node::Field {
                    field: clause.field.clone(),
                    conditions,
                }
            }
            FilterExpr::And(exprs) => {
                Node::And(exprs.iter().map(Self::build).collect::<StoreResult<_>>()?)
            }
            FilterExpr::Or(exprs) => {
                Node::Or(exprs.iter().map(Self::build).collect::<StoreResult<_>>()?)
            }
        })
    }

    /// Checks if a document matches
    pub fn matches(&self, document: &Value) -> bool {
        Self::eval(&self.root, document)
    }

    fn eval(node: &Node, document: &Value) -> bool {
        match node {
            Node::All => true,
            Node::Field { field, conditions } => {
                let actual = field_value(document, field);
                conditions.iter().all(|check| Self::check(actual, check))
            }
            Node::And(nodes) => nodes.iter().all(|n| Self::eval(n, document)),
            Node::Or(nodes) => nodes.iter().any(|n| Self::eval(n, document)),
        }
    }

    fn check(actual: Option<&Value>, check: &Check) -> bool {
        match check {
            Check::Regex(regex) => any_element(actual, |v| v.as_str().is_some_and(|s| regex.is_match(s))),
            Check::Value(op, operand) => match op {
                FilterOperator::Eq => eq_match(actual, operand),
                FilterOperator::Ne => !eq_match(actual, operand),
                FilterOperator::In => list(operand).iter().any(|v| eq_match(actual, v)),
                FilterOperator::Nin => !list(operand).iter().any(|v| eq_match(actual, v)),
                FilterOperator::All => match actual {
                    Some(Value::Array(items)) => {
                        let wanted = list(operand);
                        !wanted.is_empty()
                            && wanted
                                .iter()
                                .all(|w| items.iter().any(|item| values_equal(item, w)))
                    }
                    _ => false,
                },
                FilterOperator::Exists => actual.is_some() == operand.as_bool().unwrap_or(true),
                FilterOperator::Size => match (actual, operand.as_u64()) {
                    (Some(Value::Array(items)), Some(size)) => items.len() as u64 == size,
                    _ => false,
                },
                FilterOperator::Gt => range_match(actual, operand, |o| o == Ordering::Greater),
                FilterOperator::Gte => range_match(actual, operand, |o| o != Ordering::Less),
                FilterOperator::Lt => range_match(actual, operand, |o| o == Ordering::Less),
                FilterOperator::Lte => range_match(actual, operand, |o| o != Ordering::Greater),
                FilterOperator::SortedAfter => {
                    compare_values(actual, Some(operand)) == Ordering::Greater
                }
                FilterOperator::SortedBefore => {
                    compare_values(actual, Some(operand)) == Ordering::Less
                }
                FilterOperator::SortedEq => compare_values(actual, Some(operand)) == Ordering::Equal,
                // Compiled into Check::Regex
                FilterOperator::Regex => false,
            },
        }
    }
}

fn list(operand: &Value) -> &[Value] {
    match operand {
        Value::Array(items) => items,
        other => std::slice::from_ref(other),
    }
}

fn any_element(actual: Option<&Value>, pred: impl Fn(&Value) -> bool) -> bool {
    match actual {
        None => false,
        Some(Value::Array(items)) => items.iter().any(&pred),
        Some(value) => pred(value),
    }
}

fn eq_match(actual: Option<&Value>, expected: &Value) -> bool {
    match actual {
        None => expected.is_null(),
        Some(value) => {
            values_equal(value, expected)
                || matches!(value, Value::Array(items) if items.iter().any(|i| values_equal(i, expected)))
        }
    }
}

fn range_match(actual: Option<&Value>, bound: &Value, accept: impl Fn(Ordering) -> bool) -> bool {
    any_element(actual, |v| compare_same_class(v, bound).is_some_and(&accept))
}
