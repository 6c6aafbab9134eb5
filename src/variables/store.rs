//! Ordered variable store shared by every request in a batch.
//!
//! Keys are dot-delimited strings. The first segment is the namespace:
//! `environment`, `request`, `response`, or anything else for user
//! variables. Insertion order is kept so variable dumps stay stable
//! between runs.

use serde::{Deserialize, Serialize};

/// Namespace prefix for variables loaded from the active environment.
pub const ENVIRONMENT_PREFIX: &str = "environment.";

/// Namespace prefix for variables describing the outgoing request.
pub const REQUEST_PREFIX: &str = "request.";

/// Namespace prefix for variables describing the received response.
pub const RESPONSE_PREFIX: &str = "response.";

/// A single stored `(key, value)` pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Variable {
    pub key: String,
    pub value: String,
}

impl Variable {
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }

    /// Namespace this variable belongs to.
    pub fn namespace(&self) -> Namespace {
        Namespace::of(&self.key)
    }
}

/// Lifecycle group of a variable, derived from its first key segment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Namespace {
    /// `environment.*`, persists for the whole batch
    Environment,
    /// `request.*`, cleared before every request
    Request,
    /// `response.*`, cleared before every request
    Response,
    /// Anything else, persists for the whole batch
    User,
}

impl Namespace {
    /// Display order used when dumping the store.
    pub const DISPLAY_ORDER: [Namespace; 4] = [
        Namespace::Environment,
        Namespace::Request,
        Namespace::Response,
        Namespace::User,
    ];

    /// Classifies a key by its leading segment.
    pub fn of(key: &str) -> Self {
        if key.starts_with(ENVIRONMENT_PREFIX) {
            Namespace::Environment
        } else if key.starts_with(REQUEST_PREFIX) {
            Namespace::Request
        } else if key.starts_with(RESPONSE_PREFIX) {
            Namespace::Response
        } else {
            Namespace::User
        }
    }

    /// Whether variables in this namespace are dropped at the start of a request.
    pub fn is_per_request(&self) -> bool {
        matches!(self, Namespace::Request | Namespace::Response)
    }
}

/// Mutable, insertion-ordered mapping from variable keys to values.
///
/// Lookups of absent keys yield an empty string rather than an error, which
/// is what assertions and `add_json_variable` expect when a previous step
/// produced nothing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VariableStore {
    variables: Vec<Variable>,
}

impl VariableStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts or overwrites `key`.
    ///
    /// Overwriting keeps the original position of the key.
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let key = key.into();
        let value = value.into();
        match self.variables.iter_mut().find(|v| v.key == key) {
            Some(existing) => existing.value = value,
            None => self.variables.push(Variable { key, value }),
        }
    }

    /// Returns the value for `key`, or an empty string if it is not set.
    pub fn get(&self, key: &str) -> &str {
        self.lookup(key).unwrap_or("")
    }

    /// Returns the value for `key` if it is set.
    pub fn lookup(&self, key: &str) -> Option<&str> {
        self.variables
            .iter()
            .find(|v| v.key == key)
            .map(|v| v.value.as_str())
    }

    pub fn contains(&self, key: &str) -> bool {
        self.lookup(key).is_some()
    }

    /// Deletes `key` if present. Returns the removed value.
    pub fn remove(&mut self, key: &str) -> Option<String> {
        let index = self.variables.iter().position(|v| v.key == key)?;
        Some(self.variables.remove(index).value)
    }

    /// Removes every key starting with `prefix` (e.g. `"request."`).
    ///
    /// Returns the number of removed keys.
    pub fn clear_by_prefix(&mut self, prefix: &str) -> usize {
        let before = self.variables.len();
        self.variables.retain(|v| !v.key.starts_with(prefix));
        before - self.variables.len()
    }

    /// Variables whose key starts with `prefix`, in first-seen order.
    pub fn list_by_prefix<'a>(&'a self, prefix: &'a str) -> impl Iterator<Item = &'a Variable> {
        self.variables
            .iter()
            .filter(move |v| v.key.starts_with(prefix))
    }

    /// Variables in `namespace`, in first-seen order.
    pub fn list_namespace(&self, namespace: Namespace) -> impl Iterator<Item = &Variable> {
        self.variables
            .iter()
            .filter(move |v| v.namespace() == namespace)
    }

    /// All variables grouped by namespace in display order
    /// (environment, request, response, user).
    pub fn grouped(&self) -> Vec<Variable> {
        Namespace::DISPLAY_ORDER
            .iter()
            .flat_map(|ns| self.list_namespace(*ns).cloned())
            .collect()
    }

    /// Iterates over all variables in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &Variable> {
        self.variables.iter()
    }

    pub fn len(&self) -> usize {
        self.variables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.variables.is_empty()
    }
}

impl FromIterator<(String, String)> for VariableStore {
    fn from_iter<I: IntoIterator<Item = (String, String)>>(iter: I) -> Self {
        let mut store = VariableStore::new();
        for (key, value) in iter {
            store.set(key, value);
        }
        store
    }
}
