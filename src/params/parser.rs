//! # Query Parameter Parser
//!
//! Turns URL query parameters into a filter plus paging options.
//!
//! Values of a repeated key accumulate and every value is split on `,`.
//! One resulting value stays a scalar; several become an array.
//!
//! Reserved keys:
//! - `union`: combine field clauses with OR instead of AND
//! - `limit`: positive page size
//! - `sort`: comma separated signed fields
//! - `cursor`: cursor from the previous page

use std::collections::HashMap;

use serde_json::Value;

use super::cast::ParamTypes;
use crate::errors::{QueryError, QueryResult};
use crate::filter::{Combinator, FilterCompiler, FilterExpr};
use crate::pagination::PageRequest;

const UNION_PARAM: &str = "union";
const LIMIT_PARAM: &str = "limit";
const SORT_PARAM: &str = "sort";
const CURSOR_PARAM: &str = "cursor";

/// Parsed query parameters
#[derive(Debug, Clone, Default, PartialEq)]
pub struct QueryParams {
    /// Combine filters with OR
    pub union: bool,

    /// Requested page size
    pub limit: Option<usize>,

    /// Sort tokens
    pub sort: Vec<String>,

    /// Cursor from a previous page
    pub cursor: Option<String>,

    /// Filter entries in first-seen key order
    pub filters: Vec<(String, Value)>,
}

impl QueryParams {
    /// Parse decoded `(key, value)` pairs
    pub fn parse<I, K, V>(pairs: I, types: &ParamTypes) -> QueryResult<Self>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let mut result = QueryParams::default();

        for (key, values) in group(pairs) {
            match key.as_str() {
                UNION_PARAM => result.union = parse_union(&values)?,
                LIMIT_PARAM => result.limit = Some(parse_limit(&values)?),
                SORT_PARAM => result.sort = parse_sort(values),
                CURSOR_PARAM => result.cursor = parse_cursor(values)?,
                _ => {
                    let value = match types.get(&key) {
                        Some(param_type) => param_type.cast(&key, &values)?,
                        None => uncast(values),
                    };
                    result.filters.push((key, value));
                }
            }
        }

        Ok(result)
    }

    /// Parse a raw query string such as `tags[in]=vip,lead&limit=2`.
    ///
    /// Keys and values are percent-decoded; `+` is kept as is so sort
    /// tokens like `+name` survive.
    pub fn parse_query_string(query: &str, types: &ParamTypes) -> QueryResult<Self> {
        let query = query.strip_prefix('?').unwrap_or(query);

        let mut pairs = Vec::new();
        for segment in query.split('&').filter(|s| !s.is_empty()) {
            let (key, value) = segment.split_once('=').unwrap_or((segment, ""));
            pairs.push((decode(key)?, decode(value)?));
        }

        Self::parse(pairs, types)
    }

    pub fn combinator(&self) -> Combinator {
        Combinator::from_union_flag(self.union)
    }

    /// Compile the filter entries with the requested combinator
    pub fn to_filter(&self) -> QueryResult<FilterExpr> {
        FilterCompiler::compile(
            self.filters
                .iter()
                .map(|(key, value)| (key.as_str(), value.clone())),
            self.combinator(),
        )
    }

    /// Paging options carried by these parameters
    pub fn page_request(&self) -> PageRequest {
        PageRequest {
            limit: self.limit,
            sort: self.sort.clone(),
            cursor: self.cursor.clone(),
        }
    }
}

/// Group values by key in first-seen order, splitting each on `,`
fn group<I, K, V>(pairs: I) -> Vec<(String, Vec<String>)>
where
    I: IntoIterator<Item = (K, V)>,
    K: AsRef<str>,
    V: AsRef<str>,
{
    let mut grouped: Vec<(String, Vec<String>)> = Vec::new();
    let mut positions: HashMap<String, usize> = HashMap::new();

    for (key, value) in pairs {
        let key = key.as_ref();
        let index = *positions.entry(key.to_string()).or_insert_with(|| {
            grouped.push((key.to_string(), Vec::new()));
            grouped.len() - 1
        });
        grouped[index]
            .1
            .extend(value.as_ref().split(',').map(str::to_string));
    }

    grouped
}

fn decode(raw: &str) -> QueryResult<String> {
    urlencoding::decode(raw)
        .map(|decoded| decoded.into_owned())
        .map_err(|_| QueryError::validation(format!("Invalid percent-encoding in '{}'", raw)))
}

fn single<'a>(key: &str, values: &'a [String]) -> QueryResult<&'a str> {
    match values {
        [value] => Ok(value.as_str()),
        _ => Err(QueryError::validation(format!(
            "{} must be a single value",
            key
        ))),
    }
}

fn uncast(mut values: Vec<String>) -> Value {
    if values.len() == 1 {
        Value::String(values.remove(0))
    } else {
        Value::Array(values.into_iter().map(Value::String).collect())
    }
}

fn parse_union(values: &[String]) -> QueryResult<bool> {
    match single(UNION_PARAM, values)? {
        "true" | "1" => Ok(true),
        "false" | "0" | "" => Ok(false),
        _ => Err(QueryError::validation("union must be a boolean")),
    }
}

fn parse_limit(values: &[String]) -> QueryResult<usize> {
    let raw = single(LIMIT_PARAM, values)?.trim();
    let limit: i64 = raw
        .parse()
        .map_err(|_| QueryError::validation("limit must be an integer"))?;
    if limit <= 0 {
        return Err(QueryError::validation("limit must be more than 0"));
    }
    usize::try_from(limit).map_err(|_| QueryError::validation("limit is too large"))
}

/// `sort=` with no value means no explicit sort
fn parse_sort(values: Vec<String>) -> Vec<String> {
    if values.iter().all(|v| v.is_empty()) {
        return Vec::new();
    }
    values
}

fn parse_cursor(values: Vec<String>) -> QueryResult<Option<String>> {
    // A cursor never contains a comma, so several values mean several cursors
    let cursor = single(CURSOR_PARAM, &values)?;
    Ok((!cursor.is_empty()).then(|| cursor.to_string()))
}
