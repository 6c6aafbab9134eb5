//! Template interpolation engine.
//!
//! Replaces `{{key}}` placeholders with values from a [`VariableStore`] and
//! then evaluates `{{$name(args)}}` inline function calls. Both steps are a
//! single left-to-right scan:
//!
//! 1. Variables. A substituted value is copied to the output and never
//!    scanned again, so a value of `"{{other}}"` stays literal.
//! 2. Inline functions, one pass over the output of step 1.
//!
//! Placeholders that do not resolve (unknown key, unknown function,
//! malformed call) are left verbatim.

use super::functions::{call_inline_function, VarError};
use super::store::VariableStore;

const OPEN: &str = "{{";
const CLOSE: &str = "}}";
const FUNCTION_OPEN: &str = "{{$";

/// Interpolates `text` against `store`.
///
/// # Errors
///
/// Returns [`VarError`] when an inline function rejects its arguments,
/// e.g. `{{$random(abc)}}`.
///
/// # Examples
///
/// ```
/// use mjau::variables::{interpolate, VariableStore};
///
/// let mut store = VariableStore::new();
/// store.set("environment.host", "httpbin.org");
///
/// let url = interpolate("http://{{environment.host}}/get", &store).unwrap();
/// assert_eq!(url, "http://httpbin.org/get");
///
/// let untouched = interpolate("{{missing}} {{$random(1)}}", &store).unwrap();
/// assert_eq!(untouched, "{{missing}} 0");
/// ```
pub fn interpolate(text: &str, store: &VariableStore) -> Result<String, VarError> {
    // Fast path: no placeholder markers at all
    if !text.contains(OPEN) {
        return Ok(text.to_string());
    }

    let substituted = substitute_variables(text, store);
    expand_inline_functions(&substituted)
}

/// Step 1: replaces every `{{key}}` whose key is present in `store`.
pub fn substitute_variables(text: &str, store: &VariableStore) -> String {
    let mut result = String::with_capacity(text.len() + text.len() / 4);
    let mut rest = text;

    while let Some(start) = rest.find(OPEN) {
        result.push_str(&rest[..start]);
        let after_open = &rest[start + OPEN.len()..];

        if let Some(end) = after_open.find(CLOSE) {
            if let Some(value) = store.lookup(&after_open[..end]) {
                result.push_str(value);
                rest = &after_open[end + CLOSE.len()..];
                continue;
            }
        }

        // Not a known key: keep one brace and rescan so `{{{key}}` still resolves.
        result.push('{');
        rest = &rest[start + 1..];
    }

    result.push_str(rest);
    result
}

/// Step 2: evaluates every well-formed `{{$name(args)}}` token once.
pub fn expand_inline_functions(text: &str) -> Result<String, VarError> {
    let mut result = String::with_capacity(text.len());
    let mut rest = text;

    while let Some(start) = rest.find(FUNCTION_OPEN) {
        result.push_str(&rest[..start]);
        let token = &rest[start..];

        match parse_function_call(token) {
            Some(call) => {
                match call_inline_function(call.name, &call.args)? {
                    Some(value) => result.push_str(&value),
                    None => result.push_str(&token[..call.len]),
                }
                rest = &token[call.len..];
            }
            None => {
                result.push('{');
                rest = &token[1..];
            }
        }
    }

    result.push_str(rest);
    Ok(result)
}

/// A parsed `{{$name(arg1,arg2)}}` token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FunctionCall<'a> {
    /// Function name without the `$`
    pub name: &'a str,
    /// Comma-split, whitespace-trimmed raw arguments
    pub args: Vec<String>,
    /// Length of the whole token in bytes
    pub len: usize,
}

/// Parses an inline function token at the start of `input`.
///
/// Grammar: `{{$` name `(` args `)}}` where name is `[a-z][a-z0-9_]*` and
/// args are bare literals (alphanumerics, quotes, `_`, spaces) separated
/// by commas. Returns `None` for anything else.
pub fn parse_function_call(input: &str) -> Option<FunctionCall<'_>> {
    let body = input.strip_prefix(FUNCTION_OPEN)?;

    let name_len = body
        .char_indices()
        .find(|(i, c)| {
            let valid = if *i == 0 {
                c.is_ascii_lowercase()
            } else {
                c.is_ascii_lowercase() || c.is_ascii_digit() || *c == '_'
            };
            !valid
        })
        .map(|(i, _)| i)
        .unwrap_or(body.len());
    if name_len == 0 {
        return None;
    }
    let name = &body[..name_len];

    let after_name = body[name_len..].strip_prefix('(')?;
    let args_len = after_name.find(|c: char| !is_argument_char(c))?;
    let raw_args = &after_name[..args_len];
    let tail = after_name[args_len..].strip_prefix(')')?;
    tail.strip_prefix(CLOSE)?;

    let args = if raw_args.trim().is_empty() {
        Vec::new()
    } else {
        raw_args.split(',').map(|a| a.trim().to_string()).collect()
    };

    // `{{$` + name + `(` + args + `)` + `}}`
    let len = FUNCTION_OPEN.len() + name_len + 1 + args_len + 1 + CLOSE.len();
    Some(FunctionCall { name, args, len })
}

fn is_argument_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || matches!(c, '"' | '\'' | ',' | '_' | ' ')
}

/// Returns the inner text of every `{{...}}` placeholder still in `text`.
///
/// Useful after interpolation to report what was left unresolved.
pub fn find_placeholders(text: &str) -> Vec<&str> {
    let mut found = Vec::new();
    let mut rest = text;

    while let Some(start) = rest.find(OPEN) {
        let after_open = &rest[start + OPEN.len()..];
        match after_open.find(CLOSE) {
            Some(end) => {
                found.push(&after_open[..end]);
                rest = &after_open[end + CLOSE.len()..];
            }
            None => break,
        }
    }

    found
}
