// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! The error taxonomy surfaced by every client lifecycle operation.

use std::fmt;

/// Errors raised by client wrappers instead of raw driver errors.
///
/// Every variant carries a numeric status code, a machine-stable error-type
/// tag and a human-readable cause. The string form is always
/// `"{error_type} - {status_code} - {info}"`, so callers can branch on
/// [`ClientError::error_type`] without parsing the message.
///
/// # Example
/// ```
/// use plyght::errors::ClientError;
///
/// let err = ClientError::NotConnected("HTTP session not yet established".to_string());
/// assert_eq!(err.status_code(), 404);
/// assert_eq!(err.error_type(), "NoConnectionFound");
/// assert_eq!(
///     err.to_string(),
///     "NoConnectionFound - 404 - HTTP session not yet established"
/// );
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClientError {
    /// The declared configuration type does not exist (or cannot be built) in the scope searched.
    ConfigurationNotFound {
        type_name: String,
        scope: String,
        detail: Option<String>,
    },
    /// The driver handle was accessed while disconnected.
    NotConnected(String),
    /// The driver handle could not be built: invalid configuration or unreachable endpoint.
    ConnectionFailed(String),
    /// The driver handle was built but its liveness check failed.
    ConnectionUnhealthy(String),
    /// A transactional query failed after begin and was rolled back.
    QueryRefused(String),
    /// An operation that needs a prior mode selection was invoked before selection.
    InvalidMode(String),
    /// A request or scan failed on an otherwise usable connection.
    RequestFailed(String),
}

impl ClientError {
    pub fn status_code(&self) -> u16 {
        match self {
            ClientError::ConfigurationNotFound { .. } => 500,
            ClientError::NotConnected(_) => 404,
            ClientError::ConnectionFailed(_) => 503,
            ClientError::ConnectionUnhealthy(_) => 503,
            ClientError::QueryRefused(_) => 400,
            ClientError::InvalidMode(_) => 400,
            ClientError::RequestFailed(_) => 502,
        }
    }

    pub fn error_type(&self) -> &'static str {
        match self {
            ClientError::ConfigurationNotFound { .. } => "ConfigurationNotFound",
            ClientError::NotConnected(_) => "NoConnectionFound",
            ClientError::ConnectionFailed(_) => "ConnectionFailed",
            ClientError::ConnectionUnhealthy(_) => "Unhealthy",
            ClientError::QueryRefused(_) => "REFUSED",
            ClientError::InvalidMode(_) => "InvalidMode",
            ClientError::RequestFailed(_) => "RequestFailed",
        }
    }

    pub fn info(&self) -> String {
        match self {
            ClientError::ConfigurationNotFound {
                type_name,
                scope,
                detail,
            } => match detail {
                Some(detail) => format!(
                    "Configuration type '{}' could not be built in scope '{}': {}",
                    type_name, scope, detail
                ),
                None => format!(
                    "Configuration type '{}' not found in scope '{}'",
                    type_name, scope
                ),
            },
            ClientError::NotConnected(info)
            | ClientError::ConnectionFailed(info)
            | ClientError::ConnectionUnhealthy(info)
            | ClientError::QueryRefused(info)
            | ClientError::InvalidMode(info)
            | ClientError::RequestFailed(info) => info.clone(),
        }
    }

    /// Standard `NotConnected` error for a backend label.
    pub fn not_connected(backend: &str) -> Self {
        ClientError::NotConnected(format!(
            "Connection to {} not yet established, try connect().",
            backend
        ))
    }

    /// Standard `ConnectionFailed` error wrapping the driver's cause.
    pub fn connection_failed(backend: &str, cause: impl fmt::Display) -> Self {
        ClientError::ConnectionFailed(format!(
            "Connection to {} cannot be established caused by either an invalid configuration or unreachable host: {}",
            backend, cause
        ))
    }

    /// Whether the error leaves the wrapper usable after calling `connect()` again.
    pub fn is_recoverable(&self) -> bool {
        !matches!(self, ClientError::ConfigurationNotFound { .. })
    }
}

impl fmt::Display for ClientError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} - {} - {}",
            self.error_type(),
            self.status_code(),
            self.info()
        )
    }
}

impl std::error::Error for ClientError {}
