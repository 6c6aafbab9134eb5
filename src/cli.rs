//! Command-line surface of the `mjau` binary.

use crate::config::{parse_request_list, DEFAULT_CONFIG_FILE};
use crate::executor::{ExecutionConfig, DEFAULT_TIMEOUT_SECS};
use crate::output::DisplayOptions;
use crate::runner::{EnvironmentPolicy, RunnerOptions, DEFAULT_ENVIRONMENT};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(
    name = "mjau",
    version,
    about = "Run HTTP requests defined in a YAML file"
)]
pub struct Cli {
    /// Configuration file
    #[arg(short, long, global = true, default_value = DEFAULT_CONFIG_FILE, env = "MJAU_CONFIG")]
    pub config: PathBuf,

    /// Environment to load
    #[arg(short, long, global = true, default_value = DEFAULT_ENVIRONMENT, env = "MJAU_ENV")]
    pub env: String,

    /// Show request headers and body
    #[arg(short, long, global = true)]
    pub full_request: bool,

    /// Show request headers
    #[arg(long, global = true)]
    pub request_headers: bool,

    /// Show request body
    #[arg(long, global = true)]
    pub request_body: bool,

    /// Show response headers
    #[arg(long, global = true)]
    pub headers: bool,

    /// Show stored variables
    #[arg(long, global = true)]
    pub show_variables: bool,

    /// Show assertion results
    #[arg(long, global = true)]
    pub show_asserts: bool,

    /// Show commands and echo output
    #[arg(long, global = true)]
    pub show_commands: bool,

    /// Show everything
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Load the environment once per batch instead of before every request
    #[arg(long, global = true)]
    pub env_once: bool,

    /// Disable coloured output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Request timeout in seconds, 0 disables it
    #[arg(long, global = true, default_value_t = DEFAULT_TIMEOUT_SECS)]
    pub timeout: u64,

    /// Default log filter; RUST_LOG takes precedence
    #[arg(long, global = true, default_value = "warn")]
    pub log_level: String,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand, PartialEq, Eq)]
pub enum Command {
    /// Run one or more requests separated by comma
    Run {
        /// Request names, e.g. `login,profile`
        requests: String,
    },
    /// Run all requests
    Runall,
    /// Create a sample config file
    Init,
}

impl Command {
    /// Request names to run; empty for `init`.
    pub fn request_names(&self) -> Vec<String> {
        match self {
            Command::Run { requests } => parse_request_list(requests),
            Command::Runall | Command::Init => Vec::new(),
        }
    }
}

impl Cli {
    pub fn display_options(&self) -> DisplayOptions {
        DisplayOptions {
            full_request: self.full_request,
            request_headers: self.request_headers,
            request_body: self.request_body,
            headers: self.headers,
            show_variables: self.show_variables,
            show_asserts: self.show_asserts,
            show_commands: self.show_commands,
            verbose: self.verbose,
            color: !self.no_color,
        }
    }

    pub fn runner_options(&self) -> RunnerOptions {
        let policy = if self.env_once {
            EnvironmentPolicy::PerBatch
        } else {
            EnvironmentPolicy::PerRequest
        };
        RunnerOptions::default()
            .with_environment(self.env.clone())
            .with_environment_policy(policy)
    }

    pub fn execution_config(&self) -> ExecutionConfig {
        ExecutionConfig::new(self.timeout)
    }
}
