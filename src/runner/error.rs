//! Fatal run errors.

use crate::executor::{CertificateError, RequestError};
use crate::variables::VarError;
use std::fmt;

/// Conditions that abort a batch.
///
/// Assertion failures are not errors; they are reported through
/// [`RequestReport`](super::RequestReport).
#[derive(Debug, Clone, PartialEq)]
pub enum RunError {
    /// The named request is not in the configuration.
    RequestNotFound(String),

    /// An inline function rejected its arguments.
    Function(VarError),

    /// The HTTP exchange could not complete.
    Transport {
        request: String,
        source: RequestError,
    },

    /// Certificate material for the request could not be read.
    Certificate {
        request: String,
        source: CertificateError,
    },
}

impl RunError {
    /// Process exit code for this failure.
    pub fn exit_code(&self) -> i32 {
        1
    }
}

impl fmt::Display for RunError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RunError::RequestNotFound(name) => write!(f, "Request {} not found", name),
            RunError::Function(err) => write!(f, "{}", err),
            RunError::Transport { request, source } => {
                write!(f, "Request {} failed: {}", request, source)
            }
            RunError::Certificate { request, source } => {
                write!(f, "Request {}: {}", request, source)
            }
        }
    }
}

impl std::error::Error for RunError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            RunError::RequestNotFound(_) => None,
            RunError::Function(err) => Some(err),
            RunError::Transport { source, .. } => Some(source),
            RunError::Certificate { source, .. } => Some(source),
        }
    }
}

impl From<VarError> for RunError {
    fn from(err: VarError) -> Self {
        RunError::Function(err)
    }
}
