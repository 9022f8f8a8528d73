//
//  cdek-client
//  api/common/extract.rs
//
//  Created by Ngonidzashe Mangudya on 2026/10/16.
//  Copyright (c) 2026 IAMNGONI. All rights reserved.
//

//! Provider Error Extraction
//!
//! The CDEK API has reported 4xx errors in several body layouts over time.
//! Each layout gets a named extractor; [`ERROR_EXTRACTORS`] lists them in the
//! order they are tried and the first one that finds something wins.
//!
//! | Order | Name | Body shape |
//! |-------|------|------------|
//! | 1 | `errors[0]` | `{"errors": [{"code": "...", "message": "..."}]}` |
//! | 2 | `error` | `{"error": "invalid_client", "error_description": "..."}` |
//! | 3 | `requests[0].errors` | `{"requests": [{"state": "INVALID", "errors": [...]}]}` |
//!
//! # Example
//!
//! ```rust
//! use cdek_client::api::common::extract_error_message;
//!
//! let body = r#"{"errors":[{"code":"v2_entity_not_found","message":"Order not found"}]}"#;
//! let message = extract_error_message(body).unwrap();
//! assert_eq!(message, "v2_entity_not_found: Order not found");
//! ```

use serde_json::Value;

/// A named strategy for pulling an error message out of a response body.
#[derive(Clone, Copy)]
pub struct ErrorExtractor {
    /// The body path this extractor reads
    pub name: &'static str,
    extract: fn(&Value) -> Option<String>,
}

impl ErrorExtractor {
    /// Runs the extractor against a decoded body.
    pub fn extract(&self, body: &Value) -> Option<String> {
        (self.extract)(body)
    }
}

impl std::fmt::Debug for ErrorExtractor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ErrorExtractor").field("name", &self.name).finish()
    }
}

/// Extractors in priority order.
pub const ERROR_EXTRACTORS: [ErrorExtractor; 3] = [
    ErrorExtractor {
        name: "errors[0]",
        extract: first_error_entry,
    },
    ErrorExtractor {
        name: "error",
        extract: top_level_error,
    },
    ErrorExtractor {
        name: "requests[0].errors",
        extract: request_errors,
    },
];

/// Extracts a human-readable message from a 4xx response body.
///
/// Returns `None` when the body is not JSON or no extractor matches.
pub fn extract_error_message(body: &str) -> Option<String> {
    let json: Value = serde_json::from_str(body).ok()?;
    ERROR_EXTRACTORS
        .iter()
        .find_map(|extractor| extractor.extract(&json))
}

fn first_error_entry(body: &Value) -> Option<String> {
    let entry = body.get("errors")?.as_array()?.first()?;
    render_entry(entry)
}

fn top_level_error(body: &Value) -> Option<String> {
    match body.get("error")? {
        Value::String(code) if !code.is_empty() => {
            match body.get("error_description").and_then(Value::as_str) {
                Some(description) if !description.is_empty() => {
                    Some(format!("{code}: {description}"))
                }
                _ => Some(code.clone()),
            }
        }
        other => render_entry(other),
    }
}

fn request_errors(body: &Value) -> Option<String> {
    let errors = body
        .get("requests")?
        .as_array()?
        .first()?
        .get("errors")?
        .as_array()?;

    let rendered: Vec<String> = errors.iter().filter_map(render_entry).collect();
    if rendered.is_empty() {
        None
    } else {
        Some(rendered.join("; "))
    }
}

/// Renders one error entry: strings as-is, objects as their scalar values
/// joined with `": "` in key order.
fn render_entry(entry: &Value) -> Option<String> {
    match entry {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Object(map) => {
            let parts: Vec<String> = map.values().filter_map(scalar_to_string).collect();
            if parts.is_empty() {
                None
            } else {
                Some(parts.join(": "))
            }
        }
        _ => None,
    }
}

fn scalar_to_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}
