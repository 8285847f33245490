//! Result sorting

use std::cmp::Ordering;

use serde_json::Value;

use super::document::field_value;
use super::value::compare_values;
use crate::sort::SortSpec;

/// Sorts documents by a multi-key specification
pub struct ResultSorter;

impl ResultSorter {
    /// Sort in place. Stable, so fully equal keys keep insertion order.
    pub fn sort(documents: &mut [Value], spec: &SortSpec) {
        documents.sort_by(|a, b| Self::compare(a, b, spec));
    }

    /// Compare two documents key by key
    pub fn compare(a: &Value, b: &Value, spec: &SortSpec) -> Ordering {
        for key in spec.keys() {
            let ordering = compare_values(field_value(a, &key.field), field_value(b, &key.field));
            let ordering = key.direction.apply(ordering);
            if ordering != Ordering::Equal {
                return ordering;
            }
        }
        Ordering::Equal
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sort::SortCompiler;
    use serde_json::json;

    fn ids(docs: &[Value]) -> Vec<&str> {
        docs.iter().filter_map(|d| d["_id"].as_str()).collect()
    }

    #[test]
    fn test_sort_descending_with_tiebreaker() {
        let mut docs = vec![
            json!({"_id": "b", "score": 5}),
            json!({"_id": "c", "score": 9}),
            json!({"_id": "a", "score": 5}),
        ];
        let spec = SortCompiler::default().compile(&["-score"]).unwrap();

        ResultSorter::sort(&mut docs, &spec);
        assert_eq!(ids(&docs), vec!["c", "a", "b"]);
    }

    #[test]
    fn test_missing_fields_sort_first_ascending() {
        let mut docs = vec![
            json!({"_id": "1", "name": "charlie"}),
            json!({"_id": "2"}),
            json!({"_id": "3", "name": "alice"}),
        ];
        let spec = SortCompiler::default().compile(&["name"]).unwrap();

        ResultSorter::sort(&mut docs, &spec);
        assert_eq!(ids(&docs), vec!["2", "3", "1"]);
    }
}
