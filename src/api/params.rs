//
//  cdek-client
//  api/params.rs
//
//  Created by Ngonidzashe Mangudya on 2026/10/16.
//  Copyright (c) 2026 IAMNGONI. All rights reserved.
//

//! Request parameter normalisation.
//!
//! Options reach the transport as loosely-shaped JSON objects mirroring the
//! provider's documented parameters. Before sending, empty values are dropped
//! and, for GET/DELETE, the object is flattened into query pairs.

use serde_json::{Map, Value};

/// Whether a value counts as "not provided".
///
/// `null`, `""`, `[]` and `{}` are empty. `0` and `false` are real values.
pub fn is_empty_value(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(s) => s.is_empty(),
        Value::Array(items) => items.is_empty(),
        Value::Object(map) => map.is_empty(),
        Value::Bool(_) | Value::Number(_) => false,
    }
}

/// Recursively removes empty values from objects and arrays.
pub fn strip_empty(value: &Value) -> Value {
    match value {
        Value::Object(map) => Value::Object(
            map.iter()
                .map(|(k, v)| (k.clone(), strip_empty(v)))
                .filter(|(_, v)| !is_empty_value(v))
                .collect(),
        ),
        Value::Array(items) => Value::Array(
            items
                .iter()
                .map(strip_empty)
                .filter(|v| !is_empty_value(v))
                .collect(),
        ),
        other => other.clone(),
    }
}

/// Flattens a parameter object into query pairs.
///
/// Scalars are sent as-is, arrays of scalars are joined with `,` and nested
/// objects are JSON-encoded. Empty values are skipped.
pub fn query_pairs(params: &Value) -> Vec<(String, String)> {
    let Value::Object(map) = strip_empty(params) else {
        return Vec::new();
    };

    map.into_iter()
        .map(|(key, value)| {
            let rendered = match value {
                Value::String(s) => s,
                Value::Array(items) => items
                    .iter()
                    .map(|item| match item {
                        Value::String(s) => s.clone(),
                        other => other.to_string(),
                    })
                    .collect::<Vec<_>>()
                    .join(","),
                other => other.to_string(),
            };
            (key, rendered)
        })
        .collect()
}

/// Returns the options as an owned object, treating anything else as empty.
pub fn as_object(params: &Value) -> Map<String, Value> {
    params.as_object().cloned().unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_strip_empty_keeps_zero_and_false() {
        let params = json!({
            "a": "",
            "b": null,
            "c": 0,
            "d": false,
            "e": [],
            "f": {"g": ""},
            "h": {"i": 1}
        });
        assert_eq!(strip_empty(&params), json!({"c": 0, "d": false, "h": {"i": 1}}));
    }

    #[test]
    fn test_query_pairs_join_arrays() {
        let params = json!({"country_codes": ["RU", "KZ"], "size": 500, "city": "", "page": 0});
        let pairs = query_pairs(&params);
        assert_eq!(
            pairs,
            vec![
                ("country_codes".to_string(), "RU,KZ".to_string()),
                ("page".to_string(), "0".to_string()),
                ("size".to_string(), "500".to_string()),
            ]
        );
    }

    #[test]
    fn test_query_pairs_on_non_object() {
        assert!(query_pairs(&json!(null)).is_empty());
        assert!(query_pairs(&json!([1, 2])).is_empty());
    }
}
