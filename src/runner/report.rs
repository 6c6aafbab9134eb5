//! Per-request and per-batch results.

use crate::assertions::AssertionOutcome;
use std::time::Duration;

/// Result of one request that ran to completion.
#[derive(Debug, Clone, PartialEq)]
pub struct RequestReport {
    pub name: String,
    pub status_code: u16,
    pub elapsed: Duration,
    pub assertions: Vec<AssertionOutcome>,
}

impl RequestReport {
    /// Number of failed assertions.
    pub fn failures(&self) -> usize {
        self.assertions.iter().filter(|a| !a.is_pass()).count()
    }

    pub fn is_success(&self) -> bool {
        self.failures() == 0
    }
}

/// Results of every request in a batch, in execution order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BatchReport {
    pub requests: Vec<RequestReport>,
}

impl BatchReport {
    /// Total failed assertions across the batch.
    pub fn failures(&self) -> usize {
        self.requests.iter().map(RequestReport::failures).sum()
    }

    pub fn is_success(&self) -> bool {
        self.failures() == 0
    }

    /// 0 when every assertion passed, 1 otherwise.
    pub fn exit_code(&self) -> i32 {
        if self.is_success() {
            0
        } else {
            1
        }
    }
}
