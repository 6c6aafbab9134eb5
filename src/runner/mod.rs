//! Request execution.
//!
//! [`Runner`] drives one configured request at a time through the stages in
//! [`RunState`]: clear per-request variables, load the environment, resolve
//! placeholders, run pre-commands, send, store the response, run
//! post-commands and evaluate assertions. A batch shares one
//! [`VariableStore`], so later requests see what earlier ones stored.
//!
//! # Example
//!
//! ```
//! use mjau::config::Config;
//! use mjau::executor::{ClientCertBundle, RequestError, Transport};
//! use mjau::models::{HttpResponse, ResolvedRequest};
//! use mjau::output::RecordingSink;
//! use mjau::runner::{Runner, RunnerOptions};
//! use mjau::variables::VariableStore;
//!
//! struct Ok200;
//!
//! impl Transport for Ok200 {
//!     fn send(
//!         &self,
//!         _request: &ResolvedRequest,
//!         _cert: Option<&ClientCertBundle>,
//!     ) -> Result<HttpResponse, RequestError> {
//!         Ok(HttpResponse::new(200, "OK"))
//!     }
//! }
//!
//! let config = Config::from_yaml_str(
//!     "requests:\n  - name: ping\n    url: http://localhost/ping\n",
//! )
//! .unwrap();
//!
//! let mut runner = Runner::new(&config, Ok200, RunnerOptions::default());
//! let mut store = VariableStore::new();
//! let report = runner
//!     .run_request("ping", &mut store, &mut RecordingSink::new())
//!     .unwrap();
//!
//! assert_eq!(report.status_code, 200);
//! assert_eq!(store.get("response.status_code"), "200");
//! ```

pub mod error;
pub mod report;
pub mod state;

pub use error::RunError;
pub use report::{BatchReport, RequestReport};
pub use state::RunState;

use crate::assertions::{evaluate_all, Comparison};
use crate::commands::run_commands;
use crate::config::{Config, Request};
use crate::executor::{default_user_agent, format_elapsed, timed, ClientCertBundle, Transport};
use crate::models::{HttpResponse, ResolvedRequest};
use crate::output::{CommandPhase, EventSink, RunEvent};
use crate::variables::{
    extract, interpolate, VariableStore, ENVIRONMENT_PREFIX, REQUEST_PREFIX, RESPONSE_PREFIX,
};
use log::{debug, info, warn};

/// Name of the environment used when none is selected.
pub const DEFAULT_ENVIRONMENT: &str = "default";

/// When the active environment is (re)loaded into the store.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum EnvironmentPolicy {
    /// Before every request, so inline functions are re-evaluated.
    #[default]
    PerRequest,
    /// Once, before the first request of the batch.
    PerBatch,
}

/// Settings that apply to every request a [`Runner`] executes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunnerOptions {
    pub environment: String,
    pub environment_policy: EnvironmentPolicy,
    /// Sent when a request configures no `User-Agent` header.
    pub user_agent: String,
}

impl Default for RunnerOptions {
    fn default() -> Self {
        Self {
            environment: DEFAULT_ENVIRONMENT.to_string(),
            environment_policy: EnvironmentPolicy::default(),
            user_agent: default_user_agent().to_string(),
        }
    }
}

impl RunnerOptions {
    pub fn with_environment(mut self, name: impl Into<String>) -> Self {
        self.environment = name.into();
        self
    }

    pub fn with_environment_policy(mut self, policy: EnvironmentPolicy) -> Self {
        self.environment_policy = policy;
        self
    }
}

/// Tracks the current stage of one request and logs each transition.
struct Progress<'a> {
    request: &'a str,
    state: RunState,
}

impl<'a> Progress<'a> {
    fn start(request: &'a str) -> Self {
        debug!("request '{}': {}", request, RunState::Init);
        Self {
            request,
            state: RunState::Init,
        }
    }

    fn advance(&mut self, to: RunState) {
        debug_assert_eq!(self.state.next(), Some(to));
        debug!("request '{}': {} -> {}", self.request, self.state, to);
        self.state = to;
    }
}

/// Executes configured requests against a [`Transport`].
pub struct Runner<'c, T> {
    config: &'c Config,
    transport: T,
    options: RunnerOptions,
    environment_loaded: bool,
}

impl<'c, T: Transport> Runner<'c, T> {
    pub fn new(config: &'c Config, transport: T, options: RunnerOptions) -> Self {
        Self {
            config,
            transport,
            options,
            environment_loaded: false,
        }
    }

    pub fn options(&self) -> &RunnerOptions {
        &self.options
    }

    /// Runs every configured request in document order.
    pub fn run_all(
        &mut self,
        store: &mut VariableStore,
        sink: &mut dyn EventSink,
    ) -> Result<BatchReport, RunError> {
        let names = self.config.request_names();
        self.run_batch(&names, store, sink)
    }

    /// Runs `names` in order, sharing `store`.
    ///
    /// Assertion failures do not stop the batch; any [`RunError`] does.
    pub fn run_batch(
        &mut self,
        names: &[String],
        store: &mut VariableStore,
        sink: &mut dyn EventSink,
    ) -> Result<BatchReport, RunError> {
        let mut batch = BatchReport::default();

        for (i, name) in names.iter().enumerate() {
            if i > 0 {
                sink.emit(RunEvent::Separator);
            }
            let report = self.run_request(name, store, sink)?;
            batch.requests.push(report);
        }

        info!(
            "batch finished: {} request(s), {} failed assertion(s)",
            batch.requests.len(),
            batch.failures()
        );
        Ok(batch)
    }

    /// Runs a single request by name.
    ///
    /// # Errors
    ///
    /// [`RunError::RequestNotFound`] before anything is touched when `name`
    /// is not configured; otherwise the first fatal error of any stage.
    pub fn run_request(
        &mut self,
        name: &str,
        store: &mut VariableStore,
        sink: &mut dyn EventSink,
    ) -> Result<RequestReport, RunError> {
        let config = self.config;
        let request = config
            .find_request(name)
            .ok_or_else(|| RunError::RequestNotFound(name.to_string()))?;

        info!("running request {}", name);
        sink.emit(RunEvent::RequestStarted {
            name: name.to_string(),
        });

        let mut progress = Progress::start(name);
        store.clear_by_prefix(REQUEST_PREFIX);
        store.clear_by_prefix(RESPONSE_PREFIX);

        progress.advance(RunState::EnvironmentLoaded);
        self.load_environment(store)?;

        progress.advance(RunState::Templated);
        let resolved = resolve_request(request, store)?;

        progress.advance(RunState::PreCommandsRun);
        let outputs = run_commands(&request.pre_commands, store)?;
        sink.emit(RunEvent::Commands {
            phase: CommandPhase::Pre,
            outputs,
        });

        progress.advance(RunState::Sent);
        let response = self.send(request, &resolved, sink)?;

        progress.advance(RunState::ResponseStored);
        store_request(&resolved, store);
        store_response(&response, store);
        if response.is_json() {
            store_json_variables(request, &response, store);
        }

        progress.advance(RunState::PostCommandsRun);
        let outputs = run_commands(&request.commands, store)?;
        sink.emit(RunEvent::Commands {
            phase: CommandPhase::Post,
            outputs,
        });
        sink.emit(RunEvent::Variables(store.grouped()));

        progress.advance(RunState::AssertsEvaluated);
        for assertion in &request.asserts {
            if let Comparison::Unknown(op) = &assertion.comparison {
                warn!(
                    "assertion '{}' uses unknown comparison '{}'",
                    assertion.description, op
                );
            }
        }
        let outcomes = evaluate_all(&request.asserts, store);
        let failures = outcomes.iter().filter(|o| !o.is_pass()).count();
        sink.emit(RunEvent::Assertions(outcomes.clone()));

        progress.advance(RunState::Done);
        info!("request {} finished with {} failed assertion(s)", name, failures);
        sink.emit(RunEvent::Summary {
            name: name.to_string(),
            failures,
        });

        Ok(RequestReport {
            name: name.to_string(),
            status_code: response.status_code,
            elapsed: response.duration,
            assertions: outcomes,
        })
    }

    /// Writes the active environment into `environment.*`.
    fn load_environment(&mut self, store: &mut VariableStore) -> Result<(), RunError> {
        if self.options.environment_policy == EnvironmentPolicy::PerBatch && self.environment_loaded
        {
            debug!("environment already loaded for this batch");
            return Ok(());
        }
        self.environment_loaded = true;

        let Some(environment) = self.config.find_environment(&self.options.environment) else {
            warn!(
                "environment '{}' not found, no environment variables loaded",
                self.options.environment
            );
            return Ok(());
        };

        store.set(format!("{}name", ENVIRONMENT_PREFIX), environment.name.clone());
        for variable in &environment.variables {
            let value = interpolate(&variable.value, store)?;
            store.set(format!("{}{}", ENVIRONMENT_PREFIX, variable.key), value);
        }
        debug!(
            "loaded {} variable(s) from environment '{}'",
            environment.variables.len(),
            environment.name
        );
        Ok(())
    }

    fn send(
        &self,
        request: &Request,
        resolved: &ResolvedRequest,
        sink: &mut dyn EventSink,
    ) -> Result<HttpResponse, RunError> {
        let bundle = ClientCertBundle::for_request(request).map_err(|source| {
            RunError::Certificate {
                request: request.name.clone(),
                source,
            }
        })?;

        let mut outgoing = resolved.clone();
        if outgoing.header("User-Agent").is_none() {
            outgoing.add_header("User-Agent", self.options.user_agent.clone());
        }

        sink.emit(RunEvent::RequestLine {
            method: outgoing.method,
            url: outgoing.url.clone(),
        });
        sink.emit(RunEvent::RequestHeaders(outgoing.headers.clone()));
        sink.emit(RunEvent::RequestBody(outgoing.body.clone()));

        let (result, elapsed) = timed(|| self.transport.send(&outgoing, bundle.as_ref()));
        let mut response = result.map_err(|source| RunError::Transport {
            request: request.name.clone(),
            source,
        })?;
        response.duration = elapsed;

        sink.emit(RunEvent::Elapsed(elapsed));
        sink.emit(RunEvent::StatusLine {
            status_code: response.status_code,
            status_text: response.status_text.clone(),
        });
        sink.emit(RunEvent::ResponseHeaders(joined_headers(&response)));
        sink.emit(RunEvent::ResponseBody {
            text: response.body_text(),
            is_json: response.is_json(),
        });

        Ok(response)
    }
}

/// Resolves URL, body and header values against `store`.
pub fn resolve_request(
    request: &Request,
    store: &VariableStore,
) -> Result<ResolvedRequest, RunError> {
    let mut resolved = ResolvedRequest::new(
        request.name.clone(),
        request.method,
        interpolate(&request.url, store)?,
    );
    resolved.body = interpolate(&request.body, store)?;
    for header in &request.headers {
        resolved.add_header(header.key.clone(), interpolate(&header.value, store)?);
    }
    Ok(resolved)
}

fn joined_headers(response: &HttpResponse) -> Vec<(String, String)> {
    response
        .headers
        .iter()
        .map(|(name, values)| (name.clone(), values.join(", ")))
        .collect()
}

fn store_request(resolved: &ResolvedRequest, store: &mut VariableStore) {
    store.set("request.name", resolved.name.clone());
    store.set("request.method", resolved.method.as_str());
    store.set("request.url", resolved.url.clone());
    store.set("request.body", resolved.body.clone());
    for (name, value) in &resolved.headers {
        store.set(format!("{}headers.{}", REQUEST_PREFIX, name), value.clone());
    }
}

fn store_response(response: &HttpResponse, store: &mut VariableStore) {
    store.set("response.status_code", response.status_code.to_string());
    store.set("response.status_text", response.status_text.clone());
    store.set("response.body", response.body_text());
    store.set("response.elapsed", format_elapsed(response.duration));
    for (name, value) in joined_headers(response) {
        store.set(format!("{}headers.{}", RESPONSE_PREFIX, name), value);
    }
}

fn store_json_variables(request: &Request, response: &HttpResponse, store: &mut VariableStore) {
    let body = response.body_text();
    for entry in &request.store_json_variables {
        let value = extract(&body, &entry.path);
        if value.is_empty() {
            debug!("store_json_variables: '{}' matched nothing", entry.path);
            continue;
        }
        store.set(entry.key.clone(), value);
    }
}
