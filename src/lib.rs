//! Mjau: declarative HTTP request runner
//!
//! Requests, environments, commands and assertions are described in a YAML
//! file and executed from the command line, one after another, sharing a
//! single variable store.
//!
//! # Architecture
//!
//! - **variables**: the variable store, `{{...}}` interpolation, inline
//!   functions and JSON path extraction
//! - **commands**: `echo`, `add_variable` and `add_json_variable`
//! - **assertions**: comparisons of stored variables against literals
//! - **config**: YAML schema and loading
//! - **models**: resolved requests and received responses
//! - **executor**: the [`executor::Transport`] seam and its reqwest
//!   implementation
//! - **runner**: the per-request state machine and batches
//! - **output**: display events and the console renderer
//! - **cli**: argument definitions for the `mjau` binary
//!
//! # Example configuration
//!
//! ```yaml
//! environments:
//!   - name: default
//!     variables:
//!       - key: host
//!         value: httpbin.org
//! requests:
//!   - name: healthz
//!     url: http://{{environment.host}}/get
//!     commands:
//!       - command: add_json_variable
//!         variable: ip
//!         from_variable: response.body
//!         path: origin
//!     asserts:
//!       - description: status code is 200
//!         variable: response.status_code
//!         comparison: "=="
//!         value: 200
//! ```

pub mod assertions;
pub mod cli;
pub mod commands;
pub mod config;
pub mod executor;
pub mod models;
pub mod output;
pub mod runner;
pub mod variables;

pub use config::Config;
pub use runner::{BatchReport, RequestReport, RunError, Runner, RunnerOptions};
pub use variables::VariableStore;
