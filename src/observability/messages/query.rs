// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Message types for transactional query execution.

use crate::observability::messages::StructuredLog;
use std::fmt::{Display, Formatter};
use tracing::Span;

/// A query ran and its transaction committed.
///
/// # Log Level
/// `debug!` - Detailed diagnostic information
pub struct QueryCommitted {
    pub record_count: usize,
}

impl Display for QueryCommitted {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(f, "Query committed with {} records", self.record_count)
    }
}

impl StructuredLog for QueryCommitted {
    fn log(&self) {
        tracing::debug!(record_count = self.record_count, "{}", self);
    }

    fn span(&self, name: &str) -> Span {
        tracing::debug_span!(
            "query_committed",
            span_name = name,
            record_count = self.record_count
        )
    }
}

/// A query failed after begin and its transaction was rolled back.
///
/// # Log Level
/// `warn!` - Potential issue or degraded behavior
pub struct QueryRolledBack<'a> {
    pub error: &'a dyn Display,
}

impl Display for QueryRolledBack<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(f, "Query rolled back: {}", self.error)
    }
}

impl StructuredLog for QueryRolledBack<'_> {
    fn log(&self) {
        tracing::warn!(error = %self.error, "{}", self);
    }

    fn span(&self, name: &str) -> Span {
        tracing::warn_span!("query_rolled_back", span_name = name, error = %self.error)
    }
}

/// The rollback of a failed query itself failed.
///
/// # Log Level
/// `error!` - Failure requiring attention
pub struct RollbackFailed<'a> {
    pub error: &'a dyn Display,
}

impl Display for RollbackFailed<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(f, "Transaction rollback failed: {}", self.error)
    }
}

impl StructuredLog for RollbackFailed<'_> {
    fn log(&self) {
        tracing::error!(error = %self.error, "{}", self);
    }

    fn span(&self, name: &str) -> Span {
        tracing::error_span!("rollback_failed", span_name = name, error = %self.error)
    }
}

/// Closing a query session failed after the query finished.
///
/// # Log Level
/// `warn!` - Potential issue or degraded behavior
pub struct SessionCloseFailed<'a> {
    pub error: &'a dyn Display,
}

impl Display for SessionCloseFailed<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(f, "Failed to close query session: {}", self.error)
    }
}

impl StructuredLog for SessionCloseFailed<'_> {
    fn log(&self) {
        tracing::warn!(error = %self.error, "{}", self);
    }

    fn span(&self, name: &str) -> Span {
        tracing::warn_span!("session_close_failed", span_name = name, error = %self.error)
    }
}
