//! # Parameter Casting
//!
//! Query-string values arrive as text. A [`ParamTypes`] map names the type
//! each key should be cast to before it reaches the filter compiler.

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use serde_json::{Number, Value};

use crate::errors::{QueryError, QueryResult};

/// Target type for one query parameter
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParamType {
    Null,
    Boolean,
    Integer,
    Number,
    String,
    Object,
    BooleanList,
    IntegerList,
    NumberList,
    StringList,
    ObjectList,
}

impl ParamType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ParamType::Null => "null",
            ParamType::Boolean => "boolean",
            ParamType::Integer => "integer",
            ParamType::Number => "number",
            ParamType::String => "string",
            ParamType::Object => "object",
            ParamType::BooleanList => "boolean[]",
            ParamType::IntegerList => "integer[]",
            ParamType::NumberList => "number[]",
            ParamType::StringList => "string[]",
            ParamType::ObjectList => "object[]",
        }
    }

    /// Cast the grouped raw values of `key`.
    ///
    /// Scalar types require exactly one value; list types accept any number.
    pub fn cast(&self, key: &str, raw: &[String]) -> QueryResult<Value> {
        let each = |cast: fn(&str, &str) -> QueryResult<Value>| -> QueryResult<Value> {
            raw.iter()
                .map(|value| cast(key, value))
                .collect::<QueryResult<Vec<_>>>()
                .map(Value::Array)
        };

        match self {
            ParamType::BooleanList => each(cast_boolean),
            ParamType::IntegerList => each(cast_integer),
            ParamType::NumberList => each(cast_number),
            ParamType::StringList => each(cast_string),
            ParamType::ObjectList => each(cast_object),
            scalar => {
                let [value] = raw else {
                    return Err(QueryError::validation(format!(
                        "{} must be a single value",
                        key
                    )));
                };
                match scalar {
                    ParamType::Null => cast_null(key, value),
                    ParamType::Boolean => cast_boolean(key, value),
                    ParamType::Integer => cast_integer(key, value),
                    ParamType::Number => cast_number(key, value),
                    ParamType::Object => cast_object(key, value),
                    _ => cast_string(key, value),
                }
            }
        }
    }
}

fn cast_null(key: &str, value: &str) -> QueryResult<Value> {
    match value {
        "null" | "" => Ok(Value::Null),
        _ => Err(QueryError::validation(format!("{} must be null", key))),
    }
}

fn cast_boolean(key: &str, value: &str) -> QueryResult<Value> {
    match value {
        "true" | "1" => Ok(Value::Bool(true)),
        "false" | "0" | "" => Ok(Value::Bool(false)),
        _ => Err(QueryError::validation(format!("{} must be a boolean", key))),
    }
}

fn cast_integer(key: &str, value: &str) -> QueryResult<Value> {
    value
        .trim()
        .parse::<i64>()
        .map(Value::from)
        .map_err(|_| QueryError::validation(format!("{} must be an integer", key)))
}

fn cast_number(key: &str, value: &str) -> QueryResult<Value> {
    let value = value.trim();
    if let Ok(int) = value.parse::<i64>() {
        return Ok(Value::from(int));
    }
    value
        .parse::<f64>()
        .ok()
        .and_then(Number::from_f64)
        .map(Value::Number)
        .ok_or_else(|| QueryError::validation(format!("{} must be a number", key)))
}

fn cast_string(_key: &str, value: &str) -> QueryResult<Value> {
    Ok(Value::String(value.to_string()))
}

fn cast_object(key: &str, value: &str) -> QueryResult<Value> {
    serde_json::from_str(value)
        .map_err(|_| QueryError::validation(format!("{} must be valid JSON", key)))
}

impl fmt::Display for ParamType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ParamType {
    type Err = QueryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s.trim() {
            "null" => ParamType::Null,
            "boolean" => ParamType::Boolean,
            "integer" => ParamType::Integer,
            "number" => ParamType::Number,
            "string" => ParamType::String,
            "object" => ParamType::Object,
            "boolean[]" => ParamType::BooleanList,
            "integer[]" => ParamType::IntegerList,
            "number[]" => ParamType::NumberList,
            "string[]" => ParamType::StringList,
            "object[]" => ParamType::ObjectList,
            other => {
                return Err(QueryError::validation(format!(
                    "Unknown parameter type '{}'",
                    other
                )))
            }
        })
    }
}

/// Desired types keyed by the full query key (e.g. `age[gte]`)
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParamTypes {
    types: HashMap<String, ParamType>,
}

impl ParamTypes {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, key: impl Into<String>, param_type: ParamType) -> Self {
        self.insert(key, param_type);
        self
    }

    pub fn insert(&mut self, key: impl Into<String>, param_type: ParamType) {
        self.types.insert(key.into(), param_type);
    }

    pub fn get(&self, key: &str) -> Option<ParamType> {
        self.types.get(key).copied()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }

    /// Parse a `key=type` declaration, as given on the command line
    pub fn parse_declaration(declaration: &str) -> QueryResult<(String, ParamType)> {
        let (key, param_type) = declaration.rsplit_once('=').ok_or_else(|| {
            QueryError::validation(format!(
                "Type declaration '{}' must look like key=type",
                declaration
            ))
        })?;
        if key.is_empty() {
            return Err(QueryError::validation(format!(
                "Type declaration '{}' has an empty key",
                declaration
            )));
        }
        Ok((key.to_string(), param_type.parse()?))
    }
}

impl FromIterator<(String, ParamType)> for ParamTypes {
    fn from_iter<T: IntoIterator<Item = (String, ParamType)>>(iter: T) -> Self {
        Self {
            types: iter.into_iter().collect(),
        }
    }
}
