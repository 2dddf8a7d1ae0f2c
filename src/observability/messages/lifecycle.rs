// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Message types for the connect / disconnect lifecycle.
//!
//! This module contains message types for logging events related to:
//! * Driver handle construction and verification
//! * Handle release and shutdown
//! * Endpoint derivation from configuration

use crate::observability::messages::StructuredLog;
use std::fmt::{Display, Formatter};
use tracing::Span;

/// A connect attempt is starting.
///
/// # Log Level
/// `debug!` - Detailed diagnostic information
pub struct ConnectAttempt<'a> {
    pub backend: &'a str,
    pub host: Option<&'a str>,
}

impl Display for ConnectAttempt<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Connecting to {} at {}",
            self.backend,
            self.host.unwrap_or("<unknown host>")
        )
    }
}

impl StructuredLog for ConnectAttempt<'_> {
    fn log(&self) {
        tracing::debug!(backend = self.backend, host = self.host, "{}", self);
    }

    fn span(&self, name: &str) -> Span {
        tracing::info_span!(
            "connect",
            span_name = name,
            backend = self.backend,
            host = self.host,
        )
    }
}

/// A driver handle was built and, where supported, verified.
///
/// # Log Level
/// `info!` - Important operational event
///
/// # Example
/// ```
/// use plyght::observability::messages::lifecycle::ConnectionEstablished;
///
/// let msg = ConnectionEstablished {
///     backend: "Neo4j",
///     host: Some("bolt://graph:7687"),
/// };
///
/// assert_eq!(msg.to_string(), "Connected to Neo4j at bolt://graph:7687");
/// ```
pub struct ConnectionEstablished<'a> {
    pub backend: &'a str,
    pub host: Option<&'a str>,
}

impl Display for ConnectionEstablished<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        match self.host {
            Some(host) => write!(f, "Connected to {} at {}", self.backend, host),
            None => write!(f, "Connected to {}", self.backend),
        }
    }
}

impl StructuredLog for ConnectionEstablished<'_> {
    fn log(&self) {
        tracing::info!(backend = self.backend, host = self.host, "{}", self);
    }

    fn span(&self, name: &str) -> Span {
        tracing::info_span!(
            "connection_established",
            span_name = name,
            backend = self.backend,
            host = self.host,
        )
    }
}

/// A connect attempt failed; the handle stays disconnected.
///
/// # Log Level
/// `error!` - Failure requiring attention
pub struct ConnectFailed<'a> {
    pub backend: &'a str,
    pub error: &'a dyn Display,
}

impl Display for ConnectFailed<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(f, "Failed to connect to {}: {}", self.backend, self.error)
    }
}

impl StructuredLog for ConnectFailed<'_> {
    fn log(&self) {
        tracing::error!(backend = self.backend, error = %self.error, "{}", self);
    }

    fn span(&self, name: &str) -> Span {
        tracing::error_span!(
            "connect_failed",
            span_name = name,
            backend = self.backend,
            error = %self.error,
        )
    }
}

/// The driver handle was released.
///
/// # Log Level
/// `info!` - Important operational event
pub struct Disconnected<'a> {
    pub backend: &'a str,
}

impl Display for Disconnected<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(f, "Disconnected from {}", self.backend)
    }
}

impl StructuredLog for Disconnected<'_> {
    fn log(&self) {
        tracing::info!(backend = self.backend, "{}", self);
    }

    fn span(&self, name: &str) -> Span {
        tracing::info_span!("disconnected", span_name = name, backend = self.backend)
    }
}

/// A lifecycle call found no driver handle to act on.
///
/// # Log Level
/// `debug!` - Detailed diagnostic information
pub struct NoActiveConnection<'a> {
    pub backend: &'a str,
    pub operation: &'a str,
}

impl Display for NoActiveConnection<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "No active {} connection for {}",
            self.backend, self.operation
        )
    }
}

impl StructuredLog for NoActiveConnection<'_> {
    fn log(&self) {
        tracing::debug!(
            backend = self.backend,
            operation = self.operation,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::debug_span!(
            "no_active_connection",
            span_name = name,
            backend = self.backend,
            operation = self.operation,
        )
    }
}

/// No endpoint information is present in the configuration.
///
/// # Log Level
/// `warn!` - Potential issue or degraded behavior
pub struct NoHostsConfigured<'a> {
    pub backend: &'a str,
}

impl Display for NoHostsConfigured<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(f, "No hosts configured for {}", self.backend)
    }
}

impl StructuredLog for NoHostsConfigured<'_> {
    fn log(&self) {
        tracing::warn!(backend = self.backend, "{}", self);
    }

    fn span(&self, name: &str) -> Span {
        tracing::warn_span!(
            "no_hosts_configured",
            span_name = name,
            backend = self.backend
        )
    }
}

/// The driver's close/shutdown primitive failed. The handle is released anyway.
///
/// # Log Level
/// `error!` - Failure requiring attention
pub struct ShutdownFailed<'a> {
    pub backend: &'a str,
    pub error: &'a dyn Display,
}

impl Display for ShutdownFailed<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(f, "Failed to shut down {} cleanly: {}", self.backend, self.error)
    }
}

impl StructuredLog for ShutdownFailed<'_> {
    fn log(&self) {
        tracing::error!(backend = self.backend, error = %self.error, "{}", self);
    }

    fn span(&self, name: &str) -> Span {
        tracing::error_span!(
            "shutdown_failed",
            span_name = name,
            backend = self.backend,
            error = %self.error,
        )
    }
}

/// A lifecycle operation returned a typed error to its caller.
///
/// # Log Level
/// `error!` - Failure requiring attention
pub struct OperationFailed<'a> {
    pub caller: &'a str,
    pub error_type: &'a str,
    pub status_code: u16,
    pub error: &'a dyn Display,
}

impl Display for OperationFailed<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(f, "Exception in {}: {}", self.caller, self.error)
    }
}

impl StructuredLog for OperationFailed<'_> {
    fn log(&self) {
        tracing::error!(
            caller = self.caller,
            error_type = self.error_type,
            status_code = self.status_code,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::error_span!(
            "operation_failed",
            span_name = name,
            caller = self.caller,
            error_type = self.error_type,
            status_code = self.status_code,
        )
    }
}
