//! End-to-end integration tests for mjau
//!
//! These tests load YAML configurations from disk and run them through the
//! runner, first against an in-memory transport and then against a local
//! HTTP server with the reqwest transport.

use super::{init_test_env, json_response, write_config, ScriptedTransport};
use httpmock::prelude::*;
use mjau::assertions::AssertionOutcome;
use mjau::config::Config;
use mjau::executor::{ExecutionConfig, ReqwestTransport};
use mjau::models::HttpResponse;
use mjau::output::{ConsoleSink, DisplayOptions, RecordingSink, RunEvent};
use mjau::runner::{RunError, Runner, RunnerOptions};
use mjau::variables::VariableStore;
use serde_json::json;
use tempfile::TempDir;

const HTTPBIN_CONFIG: &str = r#"
environments:
  - name: default
    variables:
      - key: host
        value: httpbin.org
requests:
  - name: healthz
    url: http://{{environment.host}}/get
    method: GET
    commands:
      - command: add_json_variable
        description: store origin
        variable: ip
        from_variable: response.body
        path: origin
    asserts:
      - description: status code is 200
        variable: response.status_code
        comparison: "=="
        value: 200
"#;

fn load(yaml: &str) -> (TempDir, Config) {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let path = write_config(&dir, yaml);
    let config = Config::load(&path).expect("Failed to load config");
    (dir, config)
}

#[test]
fn test_environment_host_resolves_into_url() {
    init_test_env();
    let (_dir, config) = load(HTTPBIN_CONFIG);
    let transport = ScriptedTransport::new().route("/get", json_response(200, json!({})));
    let mut runner = Runner::new(&config, &transport, RunnerOptions::default());
    let mut store = VariableStore::new();

    runner
        .run_request("healthz", &mut store, &mut RecordingSink::new())
        .unwrap();

    assert_eq!(transport.sent_urls(), vec!["http://httpbin.org/get"]);
    assert_eq!(store.get("request.url"), "http://httpbin.org/get");
}

#[test]
fn test_json_variable_from_response_body() {
    init_test_env();
    let (_dir, config) = load(HTTPBIN_CONFIG);
    let transport =
        ScriptedTransport::new().route("/get", json_response(200, json!({"origin": "1.2.3.4"})));
    let mut runner = Runner::new(&config, &transport, RunnerOptions::default());
    let mut store = VariableStore::new();

    runner
        .run_request("healthz", &mut store, &mut RecordingSink::new())
        .unwrap();

    assert_eq!(store.get("ip"), "1.2.3.4");
    assert_eq!(store.get("response.body"), r#"{"origin":"1.2.3.4"}"#);
}

#[test]
fn test_status_assertion_pass_and_fail() {
    init_test_env();
    let (_dir, config) = load(HTTPBIN_CONFIG);

    let ok = ScriptedTransport::new().route("/get", json_response(200, json!({})));
    let batch = Runner::new(&config, &ok, RunnerOptions::default())
        .run_batch(
            &["healthz".to_string()],
            &mut VariableStore::new(),
            &mut RecordingSink::new(),
        )
        .unwrap();
    assert_eq!(batch.failures(), 0);
    assert_eq!(batch.exit_code(), 0);

    let not_found = ScriptedTransport::new().route("/get", HttpResponse::new(404, "Not Found"));
    let mut sink = RecordingSink::new();
    let batch = Runner::new(&config, &not_found, RunnerOptions::default())
        .run_batch(&["healthz".to_string()], &mut VariableStore::new(), &mut sink)
        .unwrap();
    assert_eq!(batch.failures(), 1);
    assert_eq!(batch.exit_code(), 1);

    let failed: Vec<String> = sink
        .events
        .iter()
        .filter_map(|e| match e {
            RunEvent::Assertions(outcomes) => Some(outcomes),
            _ => None,
        })
        .flatten()
        .filter_map(|o| match o {
            AssertionOutcome::Fail(failure) => Some(failure.to_string()),
            AssertionOutcome::Pass { .. } => None,
        })
        .collect();
    assert_eq!(
        failed,
        vec!["status code is 200 failed. Expected: 404 == 200".to_string()]
    );
}

#[test]
fn test_random_one_is_always_zero() {
    init_test_env();
    let (_dir, config) = load(
        r#"
requests:
  - name: dice
    url: http://localhost/roll
    commands:
      - command: add_variable
        variable: x
        value: "{{$random(1)}}"
"#,
    );
    let transport = ScriptedTransport::new().route("/roll", HttpResponse::new(200, "OK"));
    let mut runner = Runner::new(&config, &transport, RunnerOptions::default());
    let mut store = VariableStore::new();

    for _ in 0..5 {
        runner
            .run_request("dice", &mut store, &mut RecordingSink::new())
            .unwrap();
        assert_eq!(store.get("x"), "0");
    }
}

#[test]
fn test_sample_config_runs_with_console_output() {
    init_test_env();
    let (_dir, config) = load(mjau::config::SAMPLE_CONFIG);
    let transport =
        ScriptedTransport::new().route("/get", json_response(200, json!({"origin": "10.0.0.1"})));
    let mut runner = Runner::new(&config, &transport, RunnerOptions::default());
    let mut sink = ConsoleSink::new(Vec::new(), DisplayOptions::verbose());

    let batch = runner
        .run_all(&mut VariableStore::new(), &mut sink)
        .unwrap();

    assert_eq!(batch.requests.len(), 2);
    assert_eq!(batch.exit_code(), 0);

    let out = String::from_utf8(sink.into_inner()).unwrap();
    assert!(out.contains("😺 Running request test"));
    assert!(out.contains("😺 Running request healthz"));
    assert!(out.contains("----------------------------------------"));
    assert!(out.contains("       response code: 200"));
    assert!(out.contains("  ✅ body contains origin"));
    assert!(out.contains("test2"));
}

#[test]
fn test_reqwest_transport_against_local_server() {
    init_test_env();
    let server = MockServer::start();
    let mock = server.mock(|when, then| {
        when.method(POST)
            .path("/login")
            .header("content-type", "application/json")
            .header_exists("user-agent")
            .body(r#"{"user":"mjau"}"#);
        then.status(201)
            .header("content-type", "application/json")
            .header("x-request-id", "abc123")
            .body(r#"{"token":"t0k3n","user":{"id":7}}"#);
    });

    let yaml = format!(
        r#"
environments:
  - name: local
    variables:
      - key: base
        value: "{}"
requests:
  - name: login
    method: POST
    url: "{{{{environment.base}}}}/login"
    headers:
      - key: Content-Type
        value: application/json
    body: '{{"user":"mjau"}}'
    store_json_variables:
      - key: token
        path: token
      - key: user_id
        path: user.id
    asserts:
      - description: created
        variable: response.status_code
        comparison: "=="
        value: 201
      - description: request id header
        variable: response.headers.X-Request-Id
        comparison: "=="
        value: abc123
"#,
        server.base_url()
    );
    let (_dir, config) = load(&yaml);
    let transport = ReqwestTransport::new(ExecutionConfig::new(5));
    let options = RunnerOptions::default().with_environment("local");
    let mut runner = Runner::new(&config, transport, options);
    let mut store = VariableStore::new();

    let report = runner
        .run_request("login", &mut store, &mut RecordingSink::new())
        .unwrap();

    mock.assert();
    assert_eq!(report.status_code, 201);
    assert!(report.is_success(), "{:?}", report.assertions);
    assert_eq!(store.get("response.status_text"), "Created");
    assert_eq!(store.get("token"), "t0k3n");
    assert_eq!(store.get("user_id"), "7");
}

#[test]
fn test_reqwest_transport_connection_refused() {
    init_test_env();
    let (_dir, config) = load(
        r#"
requests:
  - name: down
    url: http://127.0.0.1:1/unreachable
"#,
    );
    let mut runner = Runner::new(
        &config,
        ReqwestTransport::new(ExecutionConfig::new(5)),
        RunnerOptions::default(),
    );

    let err = runner
        .run_request("down", &mut VariableStore::new(), &mut RecordingSink::new())
        .unwrap_err();
    assert!(matches!(err, RunError::Transport { .. }));
    assert_eq!(err.exit_code(), 1);
}
