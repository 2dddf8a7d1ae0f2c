// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Generic HTTP backend with optional TLS client identity, proxy and basic auth.
//!
//! # Example
//! ```rust,ignore
//! let mut client = ProxiedClient::new(
//!     HttpOptions::new("https://api.internal")
//!         .with_auth("svc", "secret")
//!         .with_proxy("http://proxy.internal:3128")
//!         .with_timeout(Duration::from_secs(10)),
//! );
//! let response = client.get("/v1/items", &[("page", "2")], &RequestOptions::new())?;
//! ```

mod async_client;
mod client;
pub mod options;
pub mod response;
pub mod tls;
pub mod transport;

pub use async_client::AsyncProxiedClient;
pub use client::ProxiedClient;
pub use options::{Credentials, HttpOptions};
pub use response::Response;
pub use transport::{Method, RequestOptions, Transport};

use crate::config::hosts::describe;
use crate::errors::ClientError;
use crate::observability::messages::http::SessionEstablished;
use crate::observability::messages::StructuredLog;

pub(crate) const BACKEND: &str = "HTTP";

/// The configured base URL; a blank one is reported as absent.
pub(crate) fn http_host(options: &HttpOptions) -> Option<String> {
    let host = options.host.trim();
    describe(BACKEND, (!host.is_empty()).then(|| host.to_string()))
}

pub(crate) fn build_transport(options: &HttpOptions) -> Result<Transport, ClientError> {
    let transport = Transport::build(options)
        .map_err(|error| ClientError::connection_failed(BACKEND, format!("{:#}", error)))?;
    SessionEstablished {
        host: &options.host,
        proxied: transport.is_proxied(),
        tls: transport.is_tls(),
    }
    .log();
    Ok(transport)
}
