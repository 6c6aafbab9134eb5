//! Pretty-printing of JSON response bodies.

use serde::Serialize;
use serde_json::Value;

/// Bodies larger than this are shown as received (10MB).
const MAX_JSON_FORMAT_SIZE: usize = 10 * 1024 * 1024;

/// Formats JSON with pretty-printing using 2-space indentation.
///
/// Returns `None` when the text is not valid JSON or is too large, in which
/// case callers show the raw body.
///
/// # Examples
///
/// ```
/// use mjau::output::format_json_pretty;
///
/// let formatted = format_json_pretty(r#"{"origin":"1.2.3.4"}"#).unwrap();
/// assert_eq!(formatted, "{\n  \"origin\": \"1.2.3.4\"\n}");
/// ```
pub fn format_json_pretty(json: &str) -> Option<String> {
    if json.len() > MAX_JSON_FORMAT_SIZE {
        return None;
    }

    let value: Value = serde_json::from_str(json).ok()?;

    // Formatted output is roughly 1.5x the input
    let mut buf = Vec::with_capacity(json.len() + json.len() / 2);
    let formatter = serde_json::ser::PrettyFormatter::with_indent(b"  ");
    let mut serializer = serde_json::Serializer::with_formatter(&mut buf, formatter);
    value.serialize(&mut serializer).ok()?;

    String::from_utf8(buf).ok()
}
