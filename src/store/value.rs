//! JSON value comparison
//!
//! Two orderings are used:
//! - [`compare_values`]: a total order for sorting and cursor continuation,
//!   ranking types as missing < null < bool < number < string < array < object.
//! - [`compare_same_class`]: the ordering used by range operators, which
//!   only compares numbers with numbers, strings with strings and
//!   booleans with booleans.

use std::cmp::Ordering;

use serde_json::Value;

fn type_rank(value: &Value) -> u8 {
    match value {
        Value::Null => 0,
        Value::Bool(_) => 1,
        Value::Number(_) => 2,
        Value::String(_) => 3,
        Value::Array(_) => 4,
        Value::Object(_) => 5,
    }
}

fn compare_numbers(a: &serde_json::Number, b: &serde_json::Number) -> Ordering {
    if let (Some(ai), Some(bi)) = (a.as_i64(), b.as_i64()) {
        return ai.cmp(&bi);
    }
    if let (Some(au), Some(bu)) = (a.as_u64(), b.as_u64()) {
        return au.cmp(&bu);
    }
    let af = a.as_f64().unwrap_or(0.0);
    let bf = b.as_f64().unwrap_or(0.0);
    af.partial_cmp(&bf).unwrap_or(Ordering::Equal)
}

/// Total order over optional values, used for sorting
pub fn compare_values(a: Option<&Value>, b: Option<&Value>) -> Ordering {
    match (a, b) {
        (None, None) => Ordering::Equal,
        (None, Some(_)) => Ordering::Less,
        (Some(_), None) => Ordering::Greater,
        (Some(a_val), Some(b_val)) => {
            let a_type = type_rank(a_val);
            let b_type = type_rank(b_val);
            if a_type != b_type {
                return a_type.cmp(&b_type);
            }

            match (a_val, b_val) {
                (Value::Null, Value::Null) => Ordering::Equal,
                (Value::Bool(a_b), Value::Bool(b_b)) => a_b.cmp(b_b),
                (Value::Number(a_n), Value::Number(b_n)) => compare_numbers(a_n, b_n),
                (Value::String(a_s), Value::String(b_s)) => a_s.cmp(b_s),
                (Value::Array(a_items), Value::Array(b_items)) => {
                    for (x, y) in a_items.iter().zip(b_items.iter()) {
                        let ordering = compare_values(Some(x), Some(y));
                        if ordering != Ordering::Equal {
                            return ordering;
                        }
                    }
                    a_items.len().cmp(&b_items.len())
                }
                // Objects are not ordered among themselves
                _ => Ordering::Equal,
            }
        }
    }
}

/// Ordering between values of the same comparable class, else `None`
pub fn compare_same_class(a: &Value, b: &Value) -> Option<Ordering> {
    match (a, b) {
        (Value::Number(a_n), Value::Number(b_n)) => Some(compare_numbers(a_n, b_n)),
        (Value::String(a_s), Value::String(b_s)) => Some(a_s.cmp(b_s)),
        (Value::Bool(a_b), Value::Bool(b_b)) => Some(a_b.cmp(b_b)),
        _ => None,
    }
}

/// Equality that treats `1` and `1.0` as the same number
pub fn values_equal(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::Number(a_n), Value::Number(b_n)) => compare_numbers(a_n, b_n) == Ordering::Equal,
        (Value::Array(a_items), Value::Array(b_items)) => {
            a_items.len() == b_items.len()
                && a_items
                    .iter()
                    .zip(b_items.iter())
                    .all(|(x, y)| values_equal(x, y))
        }
        _ => a == b,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_type_ranking() {
        let ordered = [json!(null), json!(false), json!(-3), json!("a"), json!([1]), json!({})];
        for pair in ordered.windows(2) {
            assert_eq!(compare_values(Some(&pair[0]), Some(&pair[1])), Ordering::Less);
        }
        assert_eq!(compare_values(None, Some(&json!(null))), Ordering::Less);
    }

    #[test]
    fn test_numbers_compare_across_representations() {
        assert_eq!(compare_values(Some(&json!(2)), Some(&json!(2.5))), Ordering::Less);
        assert!(values_equal(&json!(1), &json!(1.0)));
        assert!(!values_equal(&json!(1), &json!("1")));
    }

    #[test]
    fn test_same_class_only() {
        assert_eq!(compare_same_class(&json!("b"), &json!("a")), Some(Ordering::Greater));
        assert_eq!(compare_same_class(&json!(18), &json!("18")), None);
        assert_eq!(compare_same_class(&json!(null), &json!(null)), None);
    }
}
