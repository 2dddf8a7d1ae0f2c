// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Message types for the proxied HTTP backend.

use crate::observability::messages::StructuredLog;
use std::fmt::{Display, Formatter};
use std::time::Duration;
use tracing::Span;

/// A reusable HTTP transport was built.
///
/// # Log Level
/// `info!` - Important operational event
pub struct SessionEstablished<'a> {
    pub host: &'a str,
    pub proxied: bool,
    pub tls: bool,
}

impl Display for SessionEstablished<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(f, "HTTP session established for {}", self.host)?;
        if self.proxied {
            write!(f, " via proxy")?;
        }
        Ok(())
    }
}

impl StructuredLog for SessionEstablished<'_> {
    fn log(&self) {
        tracing::info!(
            host = self.host,
            proxied = self.proxied,
            tls = self.tls,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::info_span!(
            "http_session",
            span_name = name,
            host = self.host,
            proxied = self.proxied,
            tls = self.tls,
        )
    }
}

/// The HTTP transport was dropped.
///
/// # Log Level
/// `info!` - Important operational event
pub struct SessionClosed<'a> {
    pub host: &'a str,
}

impl Display for SessionClosed<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(f, "HTTP session closed for {}", self.host)
    }
}

impl StructuredLog for SessionClosed<'_> {
    fn log(&self) {
        tracing::info!(host = self.host, "{}", self);
    }

    fn span(&self, name: &str) -> Span {
        tracing::info_span!("http_session_closed", span_name = name, host = self.host)
    }
}

/// A request completed with a response, whatever its status.
///
/// # Log Level
/// `debug!` - Detailed diagnostic information
///
/// # Example
/// ```
/// use plyght::observability::messages::http::RequestCompleted;
/// use std::time::Duration;
///
/// let msg = RequestCompleted {
///     method: "GET",
///     url: "https://api.internal/v1/items",
///     status: 200,
///     elapsed: Duration::from_millis(42),
/// };
///
/// assert_eq!(
///     msg.to_string(),
///     "GET https://api.internal/v1/items -> 200 in 42ms"
/// );
/// ```
pub struct RequestCompleted<'a> {
    pub method: &'a str,
    pub url: &'a str,
    pub status: u16,
    pub elapsed: Duration,
}

impl Display for RequestCompleted<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "{} {} -> {} in {:?}",
            self.method, self.url, self.status, self.elapsed
        )
    }
}

impl StructuredLog for RequestCompleted<'_> {
    fn log(&self) {
        tracing::debug!(
            method = self.method,
            url = self.url,
            status = self.status,
            elapsed_ms = self.elapsed.as_millis() as u64,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::debug_span!(
            "http_request",
            span_name = name,
            method = self.method,
            url = self.url,
            status = self.status,
        )
    }
}

/// A request failed before a response was read.
///
/// # Log Level
/// `error!` - Failure requiring attention
pub struct RequestFailed<'a> {
    pub method: &'a str,
    pub url: &'a str,
    pub error: &'a dyn Display,
}

impl Display for RequestFailed<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(f, "{} {} failed: {}", self.method, self.url, self.error)
    }
}

impl StructuredLog for RequestFailed<'_> {
    fn log(&self) {
        tracing::error!(
            method = self.method,
            url = self.url,
            error = %self.error,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::error_span!(
            "http_request_failed",
            span_name = name,
            method = self.method,
            url = self.url,
            error = %self.error,
        )
    }
}
