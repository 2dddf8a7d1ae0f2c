// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Correlation context attached to application log records.
//!
//! Two record shapes exist: `user` records, initiated by a user request and
//! keyed by a transaction id, and `data` records, initiated by a data flow and
//! keyed by a data id. The crate only populates the fields; the subscriber
//! decides how they are formatted.

use std::fmt;
use tracing::{Level, Span};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogType {
    User,
    Data,
}

impl LogType {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogType::User => "user",
            LogType::Data => "data",
        }
    }
}

impl fmt::Display for LogType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Correlation fields for one user- or data-initiated log record.
///
/// # Example
/// ```
/// use plyght::observability::{LogContext, LogType};
/// use tracing::Level;
///
/// let ctx = LogContext::user("orders", "checkout", "tx-81", "u-7", "/api/orders")
///     .with_response_code(201);
///
/// assert_eq!(ctx.log_type(), LogType::User);
/// ctx.log(Level::INFO, "order accepted");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogContext {
    log_type: LogType,
    transaction_id: Option<String>,
    data_id: Option<String>,
    service: String,
    caller: String,
    user_id: Option<String>,
    request_uri: Option<String>,
    api_response_code: Option<u16>,
}

impl LogContext {
    pub fn user(
        service: impl Into<String>,
        caller: impl Into<String>,
        transaction_id: impl Into<String>,
        user_id: impl Into<String>,
        request_uri: impl Into<String>,
    ) -> Self {
        Self {
            log_type: LogType::User,
            transaction_id: Some(transaction_id.into()),
            data_id: None,
            service: service.into(),
            caller: caller.into(),
            user_id: Some(user_id.into()),
            request_uri: Some(request_uri.into()),
            api_response_code: None,
        }
    }

    pub fn data(
        service: impl Into<String>,
        caller: impl Into<String>,
        data_id: impl Into<String>,
        request_uri: impl Into<String>,
    ) -> Self {
        Self {
            log_type: LogType::Data,
            transaction_id: None,
            data_id: Some(data_id.into()),
            service: service.into(),
            caller: caller.into(),
            user_id: None,
            request_uri: Some(request_uri.into()),
            api_response_code: None,
        }
    }

    /// Attach the data item a user request operates on.
    pub fn with_data_id(mut self, data_id: impl Into<String>) -> Self {
        self.data_id = Some(data_id.into());
        self
    }

    pub fn with_response_code(mut self, code: u16) -> Self {
        self.api_response_code = Some(code);
        self
    }

    pub fn log_type(&self) -> LogType {
        self.log_type
    }

    pub fn transaction_id(&self) -> Option<&str> {
        self.transaction_id.as_deref()
    }

    pub fn data_id(&self) -> Option<&str> {
        self.data_id.as_deref()
    }

    pub fn service(&self) -> &str {
        &self.service
    }

    pub fn caller(&self) -> &str {
        &self.caller
    }

    pub fn api_response_code(&self) -> Option<u16> {
        self.api_response_code
    }

    /// Emit one event at `level` carrying every populated correlation field.
    pub fn log(&self, level: Level, message: &str) {
        macro_rules! emit {
            ($macro:ident) => {
                tracing::$macro!(
                    log_type = self.log_type.as_str(),
                    transaction_id = self.transaction_id.as_deref(),
                    data_id = self.data_id.as_deref(),
                    service = self.service.as_str(),
                    caller = self.caller.as_str(),
                    user_id = self.user_id.as_deref(),
                    request_uri = self.request_uri.as_deref(),
                    api_response_code = self.api_response_code,
                    "{}",
                    message
                )
            };
        }

        match level {
            Level::ERROR => emit!(error),
            Level::WARN => emit!(warn),
            Level::INFO => emit!(info),
            Level::DEBUG => emit!(debug),
            _ => emit!(trace),
        }
    }

    /// Open a span carrying the correlation fields, for work done on behalf of this record.
    pub fn span(&self) -> Span {
        tracing::info_span!(
            "request",
            log_type = self.log_type.as_str(),
            transaction_id = self.transaction_id.as_deref(),
            data_id = self.data_id.as_deref(),
            service = self.service.as_str(),
            caller = self.caller.as_str(),
            user_id = self.user_id.as_deref(),
            request_uri = self.request_uri.as_deref(),
            api_response_code = self.api_response_code,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_and_data_shapes() {
        let user = LogContext::user("orders", "checkout", "tx-1", "u-1", "/orders");
        assert_eq!(user.log_type(), LogType::User);
        assert_eq!(user.transaction_id(), Some("tx-1"));
        assert_eq!(user.data_id(), None);

        let data = LogContext::data("ingest", "loader", "d-9", "s3://bucket/key")
            .with_response_code(200);
        assert_eq!(data.log_type(), LogType::Data);
        assert_eq!(data.transaction_id(), None);
        assert_eq!(data.data_id(), Some("d-9"));
        assert_eq!(data.api_response_code(), Some(200));
        assert_eq!(data.log_type().to_string(), "data");
    }

    #[test]
    fn test_log_and_span_without_subscriber() {
        let ctx = LogContext::user("svc", "caller", "tx", "user", "/uri").with_data_id("d");
        for level in [Level::ERROR, Level::WARN, Level::INFO, Level::DEBUG, Level::TRACE] {
            ctx.log(level, "message");
        }
        let _entered = ctx.span().entered();
    }
}
