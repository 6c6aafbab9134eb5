//! HTTP request executor.
//!
//! The runner talks to the network only through the [`Transport`] trait.
//! [`ReqwestTransport`] is the production implementation; tests plug in
//! their own.

pub mod certs;
pub mod config;
pub mod error;
pub mod native;
pub mod timing;

pub use certs::{CertificateError, ClientCertBundle};
pub use config::{ExecutionConfig, DEFAULT_TIMEOUT_SECS};
pub use error::RequestError;
pub use native::ReqwestTransport;
pub use timing::{format_elapsed, timed};

use crate::models::{HttpResponse, ResolvedRequest};
use once_cell::sync::Lazy;

static DEFAULT_USER_AGENT: Lazy<String> = Lazy::new(|| {
    format!(
        "mjau/{} ({}; {})",
        env!("CARGO_PKG_VERSION"),
        std::env::consts::OS,
        std::env::consts::ARCH
    )
});

/// Sends a resolved request and returns the raw response.
///
/// Implementations block until the exchange completes. The runner measures
/// elapsed time itself, so `HttpResponse::duration` may be left at zero.
pub trait Transport {
    fn send(
        &self,
        request: &ResolvedRequest,
        client_cert: Option<&ClientCertBundle>,
    ) -> Result<HttpResponse, RequestError>;
}

impl<T: Transport + ?Sized> Transport for &T {
    fn send(
        &self,
        request: &ResolvedRequest,
        client_cert: Option<&ClientCertBundle>,
    ) -> Result<HttpResponse, RequestError> {
        (**self).send(request, client_cert)
    }
}

impl<T: Transport + ?Sized> Transport for Box<T> {
    fn send(
        &self,
        request: &ResolvedRequest,
        client_cert: Option<&ClientCertBundle>,
    ) -> Result<HttpResponse, RequestError> {
        (**self).send(request, client_cert)
    }
}

/// `User-Agent` sent when a request does not configure one.
pub fn default_user_agent() -> &'static str {
    &DEFAULT_USER_AGENT
}

/// Validates that the URL is well-formed and uses a supported protocol.
pub fn validate_url(url: &str) -> Result<url::Url, RequestError> {
    let parsed = url::Url::parse(url)?;

    // Check that the protocol is HTTP or HTTPS
    let scheme = parsed.scheme();
    if scheme != "http" && scheme != "https" {
        return Err(RequestError::UnsupportedProtocol(format!(
            "Only HTTP and HTTPS are supported, got: {}",
            scheme
        )));
    }

    Ok(parsed)
}

/// Canonical MIME header form: `content-type` becomes `Content-Type`.
pub fn canonical_header_name(name: &str) -> String {
    name.split('-')
        .map(|part| {
            let mut chars = part.chars();
            match chars.next() {
                Some(first) => {
                    first.to_ascii_uppercase().to_string() + &chars.as_str().to_ascii_lowercase()
                }
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join("-")
}
