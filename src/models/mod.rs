//! Data models for HTTP requests and responses.
//!
//! This module contains the resolved request handed to a transport and the
//! response it returns.

pub mod request;
pub mod response;

pub use request::{HttpMethod, ResolvedRequest};
pub use response::HttpResponse;
