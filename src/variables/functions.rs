//! Inline functions callable from templates as `{{$name(args)}}`.
//!
//! The set is closed: `uuid()`, `timestamp()` and `random(n)`. Names that
//! do not map to an [`InlineFunction`] are left in the text untouched by the
//! interpolation engine.

use chrono::{SecondsFormat, Utc};
use rand::Rng;
use uuid::Uuid;

/// Errors that can occur during variable resolution
#[derive(Debug, Clone, PartialEq)]
pub enum VarError {
    /// An inline function received an argument it cannot use
    InvalidArgument { function: String, message: String },
}

impl std::fmt::Display for VarError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            VarError::InvalidArgument { function, message } => {
                write!(f, "Invalid argument to ${}(): {}", function, message)
            }
        }
    }
}

impl std::error::Error for VarError {}

/// Signature shared by every inline function evaluator.
type Evaluator = fn(&[String]) -> Result<String, VarError>;

/// Inline functions known to the template engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InlineFunction {
    /// `uuid()` - random v4 UUID
    Uuid,
    /// `timestamp()` - current UTC time in RFC 3339
    Timestamp,
    /// `random(n)` - uniform integer in `[0, n)`
    Random,
}

impl InlineFunction {
    /// Every registered function.
    pub const ALL: [InlineFunction; 3] = [
        InlineFunction::Uuid,
        InlineFunction::Timestamp,
        InlineFunction::Random,
    ];

    /// Looks up a function by the name used in templates.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|f| f.name() == name)
    }

    pub fn name(&self) -> &'static str {
        match self {
            InlineFunction::Uuid => "uuid",
            InlineFunction::Timestamp => "timestamp",
            InlineFunction::Random => "random",
        }
    }

    fn evaluator(&self) -> Evaluator {
        match self {
            InlineFunction::Uuid => resolve_uuid,
            InlineFunction::Timestamp => resolve_timestamp,
            InlineFunction::Random => resolve_random,
        }
    }

    /// Evaluates the function with its raw, comma-split arguments.
    pub fn call(&self, args: &[String]) -> Result<String, VarError> {
        (self.evaluator())(args)
    }
}

/// Evaluates the inline function `name`.
///
/// Returns `Ok(None)` when no function with that name exists so the caller
/// can leave the token unresolved.
///
/// # Examples
/// ```
/// use mjau::variables::functions::call_inline_function;
///
/// let value = call_inline_function("random", &["1".to_string()]).unwrap();
/// assert_eq!(value.as_deref(), Some("0"));
///
/// assert_eq!(call_inline_function("nope", &[]).unwrap(), None);
/// ```
pub fn call_inline_function(name: &str, args: &[String]) -> Result<Option<String>, VarError> {
    match InlineFunction::from_name(name) {
        Some(function) => function.call(args).map(Some),
        None => Ok(None),
    }
}

fn resolve_uuid(_args: &[String]) -> Result<String, VarError> {
    Ok(Uuid::new_v4().to_string())
}

fn resolve_timestamp(_args: &[String]) -> Result<String, VarError> {
    Ok(Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true))
}

/// Format: `{{$random(n)}}`, yields an integer in `[0, n)`
fn resolve_random(args: &[String]) -> Result<String, VarError> {
    let raw = args.first().map(|a| unquote(a)).unwrap_or("");
    if raw.is_empty() {
        return Err(random_error("missing upper bound"));
    }

    let bound: u64 = raw
        .parse()
        .map_err(|_| random_error(&format!("'{}' is not a non-negative integer", raw)))?;
    if bound == 0 {
        return Err(random_error("upper bound must be greater than 0"));
    }

    Ok(rand::thread_rng().gen_range(0..bound).to_string())
}

fn random_error(message: &str) -> VarError {
    VarError::InvalidArgument {
        function: InlineFunction::Random.name().to_string(),
        message: message.to_string(),
    }
}

/// Strips one pair of matching single or double quotes.
fn unquote(arg: &str) -> &str {
    let arg = arg.trim();
    for quote in ['"', '\''] {
        if let Some(inner) = arg
            .strip_prefix(quote)
            .and_then(|rest| rest.strip_suffix(quote))
        {
            return inner;
        }
    }
    arg
}
