//! Request chaining and batch integration tests
//!
//! These tests verify that one store is shared across a batch, that
//! per-request namespaces are reset, and that fatal errors stop the batch.

use super::{init_test_env, json_response, ScriptedTransport};
use mjau::config::Config;
use mjau::models::HttpResponse;
use mjau::output::{RecordingSink, RunEvent};
use mjau::runner::{RunError, Runner, RunnerOptions};
use mjau::variables::{VarError, VariableStore};
use serde_json::json;

const CHAIN_CONFIG: &str = r#"
environments:
  - name: default
    variables:
      - key: api
        value: https://api.example.com
requests:
  - name: login
    method: POST
    url: "{{environment.api}}/auth/login"
    headers:
      - key: Content-Type
        value: application/json
    body: '{"username": "test", "password": "pass"}'
    commands:
      - command: add_json_variable
        description: keep token
        variable: token
        from_variable: response.body
        path: data.token
      - command: echo
        description: show token
        value: "token={{token}}"

  - name: profile
    url: "{{environment.api}}/api/profile"
    headers:
      - key: Authorization
        value: "Bearer {{token}}"
    asserts:
      - description: authorized
        variable: request.headers.Authorization
        comparison: "=="
        value: Bearer secret-auth-token-xyz
      - description: login response is gone
        variable: response.body
        comparison: "!="
        value: '{"data":{"token":"secret-auth-token-xyz"}}'
"#;

fn chain_transport() -> ScriptedTransport {
    ScriptedTransport::new()
        .route(
            "/auth/login",
            json_response(200, json!({"data": {"token": "secret-auth-token-xyz"}})),
        )
        .route("/api/profile", json_response(200, json!({"name": "Mjau"})))
}

#[test]
fn test_token_flows_from_login_to_profile() {
    init_test_env();
    let config = Config::from_yaml_str(CHAIN_CONFIG).unwrap();
    let transport = chain_transport();
    let mut runner = Runner::new(&config, &transport, RunnerOptions::default());
    let mut store = VariableStore::new();
    let mut sink = RecordingSink::new();

    let names = vec!["login".to_string(), "profile".to_string()];
    let batch = runner.run_batch(&names, &mut store, &mut sink).unwrap();

    assert_eq!(batch.failures(), 0, "{:?}", batch);
    assert_eq!(sink.echoes(), vec!["token=secret-auth-token-xyz".to_string()]);

    let sent = transport.sent.borrow();
    assert_eq!(sent[0].body, r#"{"username": "test", "password": "pass"}"#);
    assert_eq!(
        sent[1].header("Authorization"),
        Some("Bearer secret-auth-token-xyz")
    );

    // Only the last request's request.* and response.* remain
    assert_eq!(store.get("request.name"), "profile");
    assert!(!store.contains("request.headers.Content-Type"));
    assert_eq!(store.get("response.body"), r#"{"name":"Mjau"}"#);
    assert_eq!(store.get("token"), "secret-auth-token-xyz");
}

#[test]
fn test_profile_alone_leaves_token_placeholder() {
    init_test_env();
    let config = Config::from_yaml_str(CHAIN_CONFIG).unwrap();
    let transport = chain_transport();
    let mut runner = Runner::new(&config, &transport, RunnerOptions::default());

    let report = runner
        .run_request("profile", &mut VariableStore::new(), &mut RecordingSink::new())
        .unwrap();

    assert_eq!(report.failures(), 1);
    assert_eq!(
        transport.sent.borrow()[0].header("Authorization"),
        Some("Bearer {{token}}")
    );
}

#[test]
fn test_runall_runs_in_document_order() {
    init_test_env();
    let config = Config::from_yaml_str(CHAIN_CONFIG).unwrap();
    let transport = chain_transport();
    let mut runner = Runner::new(&config, &transport, RunnerOptions::default());
    let mut sink = RecordingSink::new();

    let batch = runner.run_all(&mut VariableStore::new(), &mut sink).unwrap();

    let names: Vec<&str> = batch.requests.iter().map(|r| r.name.as_str()).collect();
    assert_eq!(names, vec!["login", "profile"]);
    assert_eq!(
        transport.sent_urls(),
        vec![
            "https://api.example.com/auth/login",
            "https://api.example.com/api/profile"
        ]
    );
    assert_eq!(sink.count(|e| matches!(e, RunEvent::Separator)), 1);
}

#[test]
fn test_missing_request_aborts_batch() {
    init_test_env();
    let config = Config::from_yaml_str(CHAIN_CONFIG).unwrap();
    let transport = chain_transport();
    let mut runner = Runner::new(&config, &transport, RunnerOptions::default());

    let names = vec![
        "login".to_string(),
        "logout".to_string(),
        "profile".to_string(),
    ];
    let err = runner
        .run_batch(&names, &mut VariableStore::new(), &mut RecordingSink::new())
        .unwrap_err();

    assert_eq!(err, RunError::RequestNotFound("logout".to_string()));
    assert_eq!(transport.sent_urls().len(), 1);
}

#[test]
fn test_assertion_failures_do_not_stop_batch() {
    init_test_env();
    let config = Config::from_yaml_str(
        r#"
requests:
  - name: broken
    url: http://localhost/broken
    asserts:
      - description: ok status
        variable: response.status_code
        comparison: "=="
        value: 200
      - description: has body
        variable: response.body
        comparison: contains
        value: error
  - name: fine
    url: http://localhost/fine
"#,
    )
    .unwrap();
    let mut broken = HttpResponse::new(500, "Internal Server Error");
    broken.set_body("internal error");
    let transport = ScriptedTransport::new()
        .route("/broken", broken)
        .route("/fine", HttpResponse::new(200, "OK"));
    let mut runner = Runner::new(&config, &transport, RunnerOptions::default());

    let batch = runner
        .run_all(&mut VariableStore::new(), &mut RecordingSink::new())
        .unwrap();

    assert_eq!(batch.requests.len(), 2);
    assert_eq!(batch.requests[0].failures(), 1);
    assert!(batch.requests[0].assertions[1].is_pass());
    assert!(batch.requests[1].is_success());
    assert_eq!(batch.exit_code(), 1);
}

#[test]
fn test_bad_random_argument_aborts_before_sending() {
    init_test_env();
    let config = Config::from_yaml_str(
        r#"
requests:
  - name: bad
    url: "http://localhost/{{$random(abc)}}"
"#,
    )
    .unwrap();
    let transport = ScriptedTransport::new();
    let mut runner = Runner::new(&config, &transport, RunnerOptions::default());

    let err = runner
        .run_request("bad", &mut VariableStore::new(), &mut RecordingSink::new())
        .unwrap_err();

    assert!(matches!(
        err,
        RunError::Function(VarError::InvalidArgument { .. })
    ));
    assert!(transport.sent_urls().is_empty());
}

#[test]
fn test_empty_name_in_run_list_is_not_found() {
    init_test_env();
    let config = Config::from_yaml_str(CHAIN_CONFIG).unwrap();
    let transport = chain_transport();
    let mut runner = Runner::new(&config, &transport, RunnerOptions::default());

    let names = mjau::config::parse_request_list("login,,profile");
    let err = runner
        .run_batch(&names, &mut VariableStore::new(), &mut RecordingSink::new())
        .unwrap_err();

    assert_eq!(err, RunError::RequestNotFound(String::new()));
    assert_eq!(err.to_string(), "Request  not found");
    assert_eq!(transport.sent_urls().len(), 1);
}
