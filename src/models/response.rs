//! HTTP response data models.
//!
//! This module defines the response returned by a transport, including
//! status information, headers, body and the elapsed wall-clock time.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Represents an HTTP response received from a server.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HttpResponse {
    /// HTTP status code (e.g., 200, 404, 500).
    pub status_code: u16,

    /// HTTP status text (e.g., "OK", "Not Found"). Empty for unknown codes.
    pub status_text: String,

    /// Response headers in arrival order.
    ///
    /// Each name appears once; repeated headers are collected into the
    /// value list.
    pub headers: Vec<(String, Vec<String>)>,

    /// Response body as raw bytes.
    pub body: Vec<u8>,

    /// Wall-clock time spent on the exchange.
    ///
    /// Set by the runner around the transport call.
    pub duration: Duration,
}

impl HttpResponse {
    /// Creates a new HttpResponse with the given status code and text.
    pub fn new(status_code: u16, status_text: impl Into<String>) -> Self {
        Self {
            status_code,
            status_text: status_text.into(),
            headers: Vec::new(),
            body: Vec::new(),
            duration: Duration::ZERO,
        }
    }

    /// Checks if the response status indicates success (2xx).
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status_code)
    }

    /// Adds a header value, merging with an existing header of the same
    /// name (case-insensitive).
    pub fn add_header(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        let value = value.into();
        match self
            .headers
            .iter_mut()
            .find(|(k, _)| k.eq_ignore_ascii_case(&name))
        {
            Some((_, values)) => values.push(value),
            None => self.headers.push((name, vec![value])),
        }
    }

    /// Returns all values of a header joined with `", "`.
    pub fn header(&self, name: &str) -> Option<String> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, values)| values.join(", "))
    }

    /// Gets the first Content-Type header value if present.
    pub fn content_type(&self) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case("content-type"))
            .and_then(|(_, values)| values.first())
            .map(String::as_str)
    }

    /// Whether the response declares a JSON body.
    pub fn is_json(&self) -> bool {
        self.content_type()
            .map_or(false, |ct| ct.contains("application/json"))
    }

    /// Sets the response body.
    pub fn set_body(&mut self, body: impl Into<Vec<u8>>) {
        self.body = body.into();
    }

    /// Body decoded as UTF-8, replacing invalid sequences.
    pub fn body_text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }
}
