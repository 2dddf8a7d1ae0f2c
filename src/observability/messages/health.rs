// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use crate::observability::messages::StructuredLog;
use std::fmt::{Display, Formatter};
use tracing::Span;

/// A liveness probe reported the connection as unusable.
///
/// Emitted by `status()`, which degrades probe failures to `false`.
///
/// # Log Level
/// `warn!` - Potential issue or degraded behavior
///
/// # Example
/// ```
/// use plyght::observability::messages::health::ProbeFailed;
///
/// let msg = ProbeFailed {
///     backend: "OpenSearch",
///     probe: "ping",
///     reason: "connection refused",
/// };
///
/// assert_eq!(
///     msg.to_string(),
///     "OpenSearch ping probe failed: connection refused"
/// );
/// ```
pub struct ProbeFailed<'a> {
    pub backend: &'a str,
    pub probe: &'a str,
    pub reason: &'a str,
}

impl Display for ProbeFailed<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "{} {} probe failed: {}",
            self.backend, self.probe, self.reason
        )
    }
}

impl StructuredLog for ProbeFailed<'_> {
    fn log(&self) {
        tracing::warn!(
            backend = self.backend,
            probe = self.probe,
            reason = self.reason,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::warn_span!(
            "probe_failed",
            span_name = name,
            backend = self.backend,
            probe = self.probe,
            reason = self.reason,
        )
    }
}
