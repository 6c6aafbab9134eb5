//! Post-request assertions.
//!
//! An assertion compares a stored variable against an expected literal.
//! All comparisons are on strings: `<`, `>`, `<=` and `>=` are lexical, so
//! `"10" < "9"` holds. Failures are returned as data and never abort a run.

use crate::config::text_or_empty;
use crate::variables::VariableStore;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Comparison operator of an assertion.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Comparison {
    Equal,
    NotEqual,
    LessThan,
    GreaterThan,
    LessOrEqual,
    GreaterOrEqual,
    Contains,
    /// Anything else; always fails.
    Unknown(String),
}

impl Comparison {
    pub fn as_str(&self) -> &str {
        match self {
            Comparison::Equal => "==",
            Comparison::NotEqual => "!=",
            Comparison::LessThan => "<",
            Comparison::GreaterThan => ">",
            Comparison::LessOrEqual => "<=",
            Comparison::GreaterOrEqual => ">=",
            Comparison::Contains => "contains",
            Comparison::Unknown(raw) => raw,
        }
    }

    /// Applies the operator as `actual <op> expected`.
    pub fn compare(&self, actual: &str, expected: &str) -> bool {
        match self {
            Comparison::Equal => actual == expected,
            Comparison::NotEqual => actual != expected,
            Comparison::LessThan => actual < expected,
            Comparison::GreaterThan => actual > expected,
            Comparison::LessOrEqual => actual <= expected,
            Comparison::GreaterOrEqual => actual >= expected,
            Comparison::Contains => actual.contains(expected),
            Comparison::Unknown(_) => false,
        }
    }
}

impl From<&str> for Comparison {
    fn from(raw: &str) -> Self {
        match raw.trim() {
            "==" => Comparison::Equal,
            "!=" => Comparison::NotEqual,
            "<" => Comparison::LessThan,
            ">" => Comparison::GreaterThan,
            "<=" => Comparison::LessOrEqual,
            ">=" => Comparison::GreaterOrEqual,
            "contains" => Comparison::Contains,
            _ => Comparison::Unknown(raw.to_string()),
        }
    }
}

impl From<String> for Comparison {
    fn from(raw: String) -> Self {
        Comparison::from(raw.as_str())
    }
}

impl From<Comparison> for String {
    fn from(comparison: Comparison) -> Self {
        comparison.as_str().to_string()
    }
}

impl fmt::Display for Comparison {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A configured check against a stored variable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Assertion {
    #[serde(default)]
    pub description: String,

    /// Key of the variable to check, e.g. `response.status_code`.
    pub variable: String,

    pub comparison: Comparison,

    /// Expected literal. Numbers and booleans in YAML are read as text.
    #[serde(default, deserialize_with = "text_or_empty")]
    pub value: String,
}

impl Assertion {
    pub fn new(
        variable: impl Into<String>,
        comparison: impl Into<Comparison>,
        value: impl Into<String>,
    ) -> Self {
        Self {
            description: String::new(),
            variable: variable.into(),
            comparison: comparison.into(),
            value: value.into(),
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }
}

/// Details of a failed assertion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssertionFailure {
    pub description: String,
    pub actual: String,
    pub comparison: Comparison,
    pub expected: String,
}

impl fmt::Display for AssertionFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} failed. Expected: {} {} {}",
            self.description, self.actual, self.comparison, self.expected
        )
    }
}

/// Result of evaluating one assertion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AssertionOutcome {
    Pass { description: String },
    Fail(AssertionFailure),
}

impl AssertionOutcome {
    pub fn is_pass(&self) -> bool {
        matches!(self, AssertionOutcome::Pass { .. })
    }

    pub fn description(&self) -> &str {
        match self {
            AssertionOutcome::Pass { description } => description,
            AssertionOutcome::Fail(failure) => &failure.description,
        }
    }
}

/// Evaluates `assertion` against the current value in `store`.
///
/// A variable that is not set compares as the empty string.
///
/// # Examples
///
/// ```
/// use mjau::assertions::{evaluate, Assertion};
/// use mjau::variables::VariableStore;
///
/// let mut store = VariableStore::new();
/// store.set("response.status_code", "200");
///
/// assert!(evaluate(&Assertion::new("response.status_code", "==", "200"), &store).is_pass());
/// assert!(!evaluate(&Assertion::new("response.status_code", "<", "100"), &store).is_pass());
/// ```
pub fn evaluate(assertion: &Assertion, store: &VariableStore) -> AssertionOutcome {
    let actual = store.get(&assertion.variable);

    if assertion.comparison.compare(actual, &assertion.value) {
        AssertionOutcome::Pass {
            description: assertion.description.clone(),
        }
    } else {
        AssertionOutcome::Fail(AssertionFailure {
            description: assertion.description.clone(),
            actual: actual.to_string(),
            comparison: assertion.comparison.clone(),
            expected: assertion.value.clone(),
        })
    }
}

/// Evaluates every assertion without stopping at the first failure.
pub fn evaluate_all(assertions: &[Assertion], store: &VariableStore) -> Vec<AssertionOutcome> {
    assertions.iter().map(|a| evaluate(a, store)).collect()
}
