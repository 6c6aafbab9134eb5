//! Integration tests module for mjau
//!
//! Shared fixtures: a scripted in-memory transport and helpers for writing
//! configuration files.

pub mod end_to_end_test;
pub mod request_chaining_test;

use mjau::executor::{ClientCertBundle, RequestError, Transport};
use mjau::models::{HttpResponse, ResolvedRequest};
use std::cell::RefCell;
use std::fs;
use std::path::PathBuf;
use std::sync::Once;
use tempfile::TempDir;

static INIT: Once = Once::new();

/// Initialize test environment (run once)
pub fn init_test_env() {
    INIT.call_once(|| {
        let _ = env_logger::builder().is_test(true).try_init();
    });
}

/// Transport that answers from a table keyed by URL path.
#[derive(Default)]
pub struct ScriptedTransport {
    routes: Vec<(String, HttpResponse)>,
    pub sent: RefCell<Vec<ResolvedRequest>>,
}

impl ScriptedTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Answers requests whose URL ends with `path`.
    pub fn route(mut self, path: &str, response: HttpResponse) -> Self {
        self.routes.push((path.to_string(), response));
        self
    }

    pub fn sent_urls(&self) -> Vec<String> {
        self.sent.borrow().iter().map(|r| r.url.clone()).collect()
    }
}

impl Transport for ScriptedTransport {
    fn send(
        &self,
        request: &ResolvedRequest,
        _client_cert: Option<&ClientCertBundle>,
    ) -> Result<HttpResponse, RequestError> {
        self.sent.borrow_mut().push(request.clone());
        self.routes
            .iter()
            .find(|(path, _)| request.url.ends_with(path.as_str()))
            .map(|(_, response)| response.clone())
            .ok_or_else(|| RequestError::NetworkError(format!("no route for {}", request.url)))
    }
}

/// Helper to create a JSON response
pub fn json_response(status_code: u16, body: serde_json::Value) -> HttpResponse {
    let mut response = HttpResponse::new(status_code, "OK");
    response.add_header("Content-Type", "application/json");
    response.set_body(body.to_string());
    response
}

/// Helper to write a configuration file into a temp dir
pub fn write_config(dir: &TempDir, yaml: &str) -> PathBuf {
    let path = dir.path().join("mjau.yaml");
    fs::write(&path, yaml).expect("Failed to write config");
    path
}
