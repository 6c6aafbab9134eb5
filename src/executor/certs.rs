//! Client certificate material for mutual TLS.
//!
//! The runner reads the PEM files named by a request (`cert`, `key`,
//! `ca_cert`) into a [`ClientCertBundle`] and passes it to the transport,
//! which decides how to use it.

use crate::config::Request;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

/// Failure to read certificate material from disk.
#[derive(Debug, Clone, PartialEq)]
pub struct CertificateError {
    pub path: PathBuf,
    pub message: String,
}

impl fmt::Display for CertificateError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Failed to read certificate file {}: {}",
            self.path.display(),
            self.message
        )
    }
}

impl std::error::Error for CertificateError {}

/// PEM-encoded client identity plus an optional extra trusted root.
#[derive(Clone, PartialEq, Eq)]
pub struct ClientCertBundle {
    /// Client certificate chain (PEM).
    pub cert_pem: Vec<u8>,
    /// PKCS#8 private key (PEM).
    pub key_pem: Vec<u8>,
    /// CA certificate to trust in addition to the system roots (PEM).
    pub ca_pem: Option<Vec<u8>>,
}

impl fmt::Debug for ClientCertBundle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Never print key material
        f.debug_struct("ClientCertBundle")
            .field("cert_pem", &format_args!("{} bytes", self.cert_pem.len()))
            .field("key_pem", &"<redacted>")
            .field("ca_pem", &self.ca_pem.as_ref().map(|ca| ca.len()))
            .finish()
    }
}

impl ClientCertBundle {
    /// Reads the certificate, key and optional CA from disk.
    pub fn from_paths(
        cert: &Path,
        key: &Path,
        ca_cert: Option<&Path>,
    ) -> Result<Self, CertificateError> {
        Ok(Self {
            cert_pem: read_pem(cert)?,
            key_pem: read_pem(key)?,
            ca_pem: ca_cert.map(read_pem).transpose()?,
        })
    }

    /// Loads the bundle configured on `request`, if it has one.
    ///
    /// Only used when both `cert` and `key` are set; a lone `ca_cert` is
    /// ignored.
    pub fn for_request(request: &Request) -> Result<Option<Self>, CertificateError> {
        if !request.has_client_cert() {
            return Ok(None);
        }
        let (Some(cert), Some(key)) = (request.cert.as_deref(), request.key.as_deref()) else {
            return Ok(None);
        };

        let ca_cert = request
            .ca_cert
            .as_deref()
            .filter(|ca| !ca.is_empty())
            .map(Path::new);
        Self::from_paths(Path::new(cert), Path::new(key), ca_cert).map(Some)
    }
}

fn read_pem(path: &Path) -> Result<Vec<u8>, CertificateError> {
    fs::read(path).map_err(|e| CertificateError {
        path: path.to_path_buf(),
        message: e.to_string(),
    })
}
