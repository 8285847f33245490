//! # Filter Expression Tree
//!
//! Structured boolean predicate over document fields.

use serde::Serialize;
use serde_json::Value;

use super::operator::FilterOperator;

/// One operator applied to one field
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Condition {
    pub op: FilterOperator,
    pub value: Value,
}

/// Every condition on a single field, e.g. `age: {gt: 18, lt: 65}`.
///
/// Conditions keep insertion order; setting an operator twice keeps the
/// last value.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldClause {
    pub field: String,
    pub conditions: Vec<Condition>,
}

impl FieldClause {
    pub fn new(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            conditions: Vec::new(),
        }
    }

    /// Builder form of [`FieldClause::set`]
    pub fn with(mut self, op: FilterOperator, value: Value) -> Self {
        self.set(op, value);
        self
    }

    /// Add a condition, replacing any earlier value for the same operator
    pub fn set(&mut self, op: FilterOperator, value: Value) {
        match self.conditions.iter_mut().find(|c| c.op == op) {
            Some(existing) => existing.value = value,
            None => self.conditions.push(Condition { op, value }),
        }
    }

    /// Value for an operator, if present
    pub fn get(&self, op: FilterOperator) -> Option<&Value> {
        self.conditions.iter().find(|c| c.op == op).map(|c| &c.value)
    }
}

/// A filter expression
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", content = "body", rename_all = "lowercase")]
pub enum FilterExpr {
    /// Matches every document
    All,
    /// Conditions on one field, all of which must hold
    Field(FieldClause),
    /// Intersection
    And(Vec<FilterExpr>),
    /// Union; an empty union matches nothing
    Or(Vec<FilterExpr>),
}

impl Default for FilterExpr {
    fn default() -> Self {
        FilterExpr::All
    }
}

impl FilterExpr {
    /// Single-condition field expression
    pub fn condition(field: impl Into<String>, op: FilterOperator, value: Value) -> Self {
        FilterExpr::Field(FieldClause::new(field).with(op, value))
    }

    /// Equality expression
    pub fn eq(field: impl Into<String>, value: Value) -> Self {
        Self::condition(field, FilterOperator::Eq, value)
    }

    /// "In list" expression
    pub fn in_list(field: impl Into<String>, values: Vec<Value>) -> Self {
        Self::condition(field, FilterOperator::In, Value::Array(values))
    }

    /// Returns true for the match-everything expression
    pub fn is_all(&self) -> bool {
        matches!(self, FilterExpr::All)
    }

    /// Intersection of `exprs`.
    ///
    /// Nested intersections are flattened and match-everything operands
    /// dropped; zero operands give `All`, one operand is returned as is.
    pub fn and(exprs: Vec<FilterExpr>) -> Self {
        let mut flat = Vec::with_capacity(exprs.len());
        for expr in exprs {
            match expr {
                FilterExpr::All => {}
                FilterExpr::And(inner) => flat.extend(inner),
                other => flat.push(other),
            }
        }

        match flat.len() {
            0 => FilterExpr::All,
            1 => flat.remove(0),
            _ => FilterExpr::And(flat),
        }
    }

    /// Union of `exprs`.
    ///
    /// Nested unions are flattened; any match-everything operand makes the
    /// whole union `All`. One operand is returned as is.
    pub fn or(exprs: Vec<FilterExpr>) -> Self {
        let mut flat = Vec::with_capacity(exprs.len());
        for expr in exprs {
            match expr {
                FilterExpr::All => return FilterExpr::All,
                FilterExpr::Or(inner) => flat.extend(inner),
                other => flat.push(other),
            }
        }

        if flat.len() == 1 {
            flat.remove(0)
        } else {
            FilterExpr::Or(flat)
        }
    }
}
