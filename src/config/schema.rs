//! Configuration document schema.
//!
//! A document holds a list of environments and a list of requests. Every
//! field except names is optional so partial documents still load.

use crate::assertions::Assertion;
use crate::commands::Command;
use crate::models::HttpMethod;
use serde::{Deserialize, Deserializer, Serialize};

/// Top-level configuration document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub environments: Vec<Environment>,

    #[serde(default)]
    pub requests: Vec<Request>,
}

/// A named, ordered set of variable definitions.
///
/// Values may reference inline functions or earlier variables; they are
/// interpolated when the environment is loaded.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Environment {
    pub name: String,

    #[serde(default)]
    pub variables: Vec<KeyValue>,
}

impl Environment {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            variables: Vec::new(),
        }
    }

    /// Appends a variable definition.
    pub fn with_variable(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.variables.push(KeyValue::new(key, value));
        self
    }
}

/// Ordered key/value pair used for headers and environment variables.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyValue {
    pub key: String,

    #[serde(default, deserialize_with = "text_or_empty")]
    pub value: String,
}

impl KeyValue {
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }
}

/// Body extraction applied to JSON responses right after they are stored.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreJsonVariable {
    /// Variable to write.
    pub key: String,

    /// JSON path into the response body.
    pub path: String,
}

/// A request template.
///
/// `url`, `body` and header values may contain `{{...}}` placeholders.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Request {
    pub name: String,

    #[serde(default)]
    pub method: HttpMethod,

    #[serde(default)]
    pub url: String,

    #[serde(default)]
    pub headers: Vec<KeyValue>,

    #[serde(default)]
    pub body: String,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub store_json_variables: Vec<StoreJsonVariable>,

    /// Commands run after templating, before the request is sent.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub pre_commands: Vec<Command>,

    /// Commands run after the response has been stored.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub commands: Vec<Command>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub asserts: Vec<Assertion>,

    /// PEM client certificate path.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cert: Option<String>,

    /// PEM private key path for `cert`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key: Option<String>,

    /// PEM CA certificate path added to the trusted roots.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ca_cert: Option<String>,
}

impl Request {
    pub fn new(name: impl Into<String>, method: HttpMethod, url: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            method,
            url: url.into(),
            ..Default::default()
        }
    }

    /// Whether both a client certificate and key are configured.
    pub fn has_client_cert(&self) -> bool {
        let set = |v: &Option<String>| v.as_deref().map_or(false, |s| !s.is_empty());
        set(&self.cert) && set(&self.key)
    }
}

/// Reads a scalar as its source text, treating an empty `value:` as `""`.
///
/// Plain scalars such as `1.10` or `0x1F` keep their spelling. This must
/// not be used on fields of internally tagged enums, whose buffered content
/// has already lost the source text.
pub fn text_or_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}
