//! HTTP request execution configuration.
//!
//! This module defines configuration options for HTTP request execution,
//! such as the request timeout.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Default timeout applied to a whole exchange.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Configuration for HTTP request execution.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExecutionConfig {
    /// Request timeout in seconds.
    ///
    /// Maximum time to wait for a complete response (including connection,
    /// headers, and body download). Zero disables the timeout.
    pub timeout_secs: u64,
}

impl ExecutionConfig {
    /// Creates a new ExecutionConfig with the given timeout.
    pub fn new(timeout_secs: u64) -> Self {
        Self { timeout_secs }
    }

    /// Returns the timeout as a `Duration`, or `None` when disabled.
    pub fn timeout_duration(&self) -> Option<Duration> {
        (self.timeout_secs > 0).then(|| Duration::from_secs(self.timeout_secs))
    }
}

impl Default for ExecutionConfig {
    fn default() -> Self {
        Self::new(DEFAULT_TIMEOUT_SECS)
    }
}
