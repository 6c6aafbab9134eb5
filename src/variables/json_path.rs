//! JSON path extraction for `add_json_variable` and `store_json_variables`.
//!
//! Paths use dotted field access and bracketed array indices, with an
//! optional leading `$`:
//!
//! - `origin`
//! - `user.name`
//! - `items[0].id` or `items.0.id`
//! - `$.data["key with dots"]`
//!
//! Extraction never fails: malformed JSON or a path that selects nothing
//! yields an empty string.
//!
//! # Examples
//!
//! ```
//! use mjau::variables::json_path::extract;
//!
//! assert_eq!(extract(r#"{"origin":"1.2.3.4"}"#, "origin"), "1.2.3.4");
//! assert_eq!(extract(r#"{"items":[{"id":7}]}"#, "items[0].id"), "7");
//! assert_eq!(extract("not json", "origin"), "");
//! ```

use serde_json::Value as JsonValue;

/// Extracts the value at `path` from `json_text` as a string.
///
/// Strings are returned unquoted, numbers and booleans in their JSON form,
/// objects and arrays as compact JSON. `null`, missing paths and parse
/// failures produce an empty string.
pub fn extract(json_text: &str, path: &str) -> String {
    let Ok(json) = serde_json::from_str::<JsonValue>(json_text) else {
        return String::new();
    };
    let Some(segments) = parse_path(path).filter(|s| !s.is_empty()) else {
        return String::new();
    };

    select(&json, &segments)
        .map(json_value_to_string)
        .unwrap_or_default()
}

/// Represents a segment in a path expression.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PathSegment {
    /// Object field access (e.g., "user", "name"). Numeric fields also index arrays.
    Field(String),

    /// Array index access (e.g., [0], [5])
    Index(usize),
}

/// Parses a path into segments.
///
/// Returns `None` for unbalanced brackets or a non-numeric, unquoted index.
///
/// - "user.name" -> [Field("user"), Field("name")]
/// - "items[0].id" -> [Field("items"), Index(0), Field("id")]
pub fn parse_path(path: &str) -> Option<Vec<PathSegment>> {
    let path = path.trim();
    let path = path.strip_prefix('$').unwrap_or(path);

    let mut segments = Vec::new();
    let mut current = String::new();
    let mut chars = path.chars().peekable();

    while let Some(ch) = chars.next() {
        match ch {
            '.' => {
                if !current.is_empty() {
                    segments.push(PathSegment::Field(std::mem::take(&mut current)));
                }
            }
            '[' => {
                if !current.is_empty() {
                    segments.push(PathSegment::Field(std::mem::take(&mut current)));
                }

                let mut inner = String::new();
                let mut closed = false;
                for next in chars.by_ref() {
                    if next == ']' {
                        closed = true;
                        break;
                    }
                    inner.push(next);
                }
                if !closed {
                    return None;
                }

                segments.push(parse_bracket(inner.trim())?);
            }
            '\\' => {
                // `\.` escapes a literal dot inside a field name
                if let Some(escaped) = chars.next() {
                    current.push(escaped);
                }
            }
            _ => current.push(ch),
        }
    }

    if !current.is_empty() {
        segments.push(PathSegment::Field(current));
    }

    Some(segments)
}

fn parse_bracket(inner: &str) -> Option<PathSegment> {
    for quote in ['"', '\''] {
        if let Some(name) = inner
            .strip_prefix(quote)
            .and_then(|rest| rest.strip_suffix(quote))
        {
            return Some(PathSegment::Field(name.to_string()));
        }
    }
    inner.parse::<usize>().ok().map(PathSegment::Index)
}

fn select<'a>(json: &'a JsonValue, segments: &[PathSegment]) -> Option<&'a JsonValue> {
    let mut current = json;

    for segment in segments {
        current = match (segment, current) {
            (PathSegment::Field(name), JsonValue::Object(map)) => map.get(name)?,
            (PathSegment::Field(name), JsonValue::Array(items)) => {
                items.get(name.parse::<usize>().ok()?)?
            }
            (PathSegment::Index(index), JsonValue::Array(items)) => items.get(*index)?,
            _ => return None,
        };
    }

    Some(current)
}

/// Converts a JSON value to its string representation.
///
/// - Strings: returned as-is (without quotes)
/// - Numbers, booleans: converted to string
/// - Null: empty
/// - Objects, arrays: serialized as JSON
fn json_value_to_string(value: &JsonValue) -> String {
    match value {
        JsonValue::String(s) => s.clone(),
        JsonValue::Number(n) => n.to_string(),
        JsonValue::Bool(b) => b.to_string(),
        JsonValue::Null => String::new(),
        JsonValue::Array(_) | JsonValue::Object(_) => value.to_string(),
    }
}
