//! Blocking HTTP transport built on reqwest.

use crate::executor::certs::ClientCertBundle;
use crate::executor::config::ExecutionConfig;
use crate::executor::error::RequestError;
use crate::executor::{canonical_header_name, validate_url, Transport};
use crate::models::{HttpMethod, HttpResponse, ResolvedRequest};
use log::{debug, trace};

/// [`Transport`] that performs real HTTP exchanges.
///
/// A client is built per call so each request can carry its own client
/// certificate.
#[derive(Debug, Clone, Default)]
pub struct ReqwestTransport {
    config: ExecutionConfig,
}

impl ReqwestTransport {
    pub fn new(config: ExecutionConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ExecutionConfig {
        &self.config
    }

    fn build_client(
        &self,
        client_cert: Option<&ClientCertBundle>,
    ) -> Result<reqwest::blocking::Client, RequestError> {
        let mut builder = reqwest::blocking::Client::builder().timeout(self.config.timeout_duration());

        if let Some(bundle) = client_cert {
            let identity = reqwest::Identity::from_pkcs8_pem(&bundle.cert_pem, &bundle.key_pem)
                .map_err(|e| RequestError::TlsError(format!("Invalid client certificate: {}", e)))?;
            builder = builder.identity(identity);

            if let Some(ca_pem) = &bundle.ca_pem {
                let ca = reqwest::Certificate::from_pem(ca_pem)
                    .map_err(|e| RequestError::TlsError(format!("Invalid CA certificate: {}", e)))?;
                builder = builder.add_root_certificate(ca);
            }
        }

        builder
            .build()
            .map_err(|e| RequestError::BuildError(e.to_string()))
    }
}

fn to_reqwest_method(method: HttpMethod) -> reqwest::Method {
    match method {
        HttpMethod::GET => reqwest::Method::GET,
        HttpMethod::POST => reqwest::Method::POST,
        HttpMethod::PUT => reqwest::Method::PUT,
        HttpMethod::DELETE => reqwest::Method::DELETE,
        HttpMethod::PATCH => reqwest::Method::PATCH,
        HttpMethod::HEAD => reqwest::Method::HEAD,
        HttpMethod::OPTIONS => reqwest::Method::OPTIONS,
        HttpMethod::TRACE => reqwest::Method::TRACE,
        HttpMethod::CONNECT => reqwest::Method::CONNECT,
    }
}

impl Transport for ReqwestTransport {
    fn send(
        &self,
        request: &ResolvedRequest,
        client_cert: Option<&ClientCertBundle>,
    ) -> Result<HttpResponse, RequestError> {
        let url = validate_url(&request.url)?;
        let client = self.build_client(client_cert)?;

        let mut req_builder = client.request(to_reqwest_method(request.method), url);
        for (name, value) in &request.headers {
            req_builder = req_builder.header(name.as_str(), value.as_str());
        }
        if request.has_body() {
            req_builder = req_builder.body(request.body.clone());
        }

        debug!("sending {} {}", request.method, request.url);
        let response = req_builder.send().map_err(|e| {
            if e.is_connect() {
                RequestError::NetworkError(format!("Connection failed: {}", e))
            } else {
                RequestError::from(e)
            }
        })?;

        let status = response.status();
        let mut http_response = HttpResponse::new(
            status.as_u16(),
            status.canonical_reason().unwrap_or_default(),
        );

        for (name, value) in response.headers() {
            match value.to_str() {
                Ok(value_str) => {
                    http_response.add_header(canonical_header_name(name.as_str()), value_str)
                }
                Err(_) => trace!("skipping non-text header {}", name),
            }
        }

        let body = response
            .bytes()
            .map_err(|e| RequestError::BodyReadError(e.to_string()))?;
        http_response.set_body(body.to_vec());

        debug!(
            "received {} with {} body bytes",
            http_response.status_code,
            http_response.body.len()
        );
        Ok(http_response)
    }
}
