// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Message types for declared configuration resolution.

use crate::observability::messages::StructuredLog;
use std::fmt::{Display, Formatter};
use tracing::Span;

/// A declared configuration type was found and instantiated.
///
/// # Log Level
/// `info!` - Important operational event
pub struct ConfigurationResolved<'a> {
    pub type_name: &'a str,
    pub scope: &'a str,
    pub option_count: usize,
}

impl Display for ConfigurationResolved<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Resolved configuration '{}' from scope '{}' ({} options)",
            self.type_name, self.scope, self.option_count
        )
    }
}

impl StructuredLog for ConfigurationResolved<'_> {
    fn log(&self) {
        tracing::info!(
            type_name = self.type_name,
            scope = self.scope,
            option_count = self.option_count,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::info_span!(
            "configuration_resolved",
            span_name = name,
            type_name = self.type_name,
            scope = self.scope,
            option_count = self.option_count,
        )
    }
}

/// A declared configuration type could not be located or built.
///
/// # Log Level
/// `error!` - Setup failure requiring attention
///
/// # Example
/// ```
/// use plyght::observability::messages::config::ConfigurationMissing;
///
/// let msg = ConfigurationMissing {
///     type_name: "KafkaConfig",
///     scope: "app::settings",
///     reason: None,
/// };
///
/// assert_eq!(
///     msg.to_string(),
///     "Configuration 'KafkaConfig' not found in scope 'app::settings'"
/// );
/// ```
pub struct ConfigurationMissing<'a> {
    pub type_name: &'a str,
    pub scope: &'a str,
    pub reason: Option<&'a str>,
}

impl Display for ConfigurationMissing<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        match self.reason {
            Some(reason) => write!(
                f,
                "Configuration '{}' could not be built in scope '{}': {}",
                self.type_name, self.scope, reason
            ),
            None => write!(
                f,
                "Configuration '{}' not found in scope '{}'",
                self.type_name, self.scope
            ),
        }
    }
}

impl StructuredLog for ConfigurationMissing<'_> {
    fn log(&self) {
        tracing::error!(
            type_name = self.type_name,
            scope = self.scope,
            reason = self.reason,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::error_span!(
            "configuration_missing",
            span_name = name,
            type_name = self.type_name,
            scope = self.scope,
        )
    }
}
