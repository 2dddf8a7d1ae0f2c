// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Message types for the message-broker backend.
//!
//! This module contains message types for logging events related to:
//! * Producer delivery reports
//! * Bounded lookup scans over consumed topics

use crate::observability::messages::StructuredLog;
use std::fmt::{Display, Formatter};
use std::time::Duration;
use tracing::Span;

/// The broker acknowledged a produced message.
///
/// # Log Level
/// `info!` - Important operational event
///
/// # Example
/// ```
/// use plyght::observability::messages::broker::MessageDelivered;
///
/// let msg = MessageDelivered {
///     topic: "__health__",
///     partition: Some(0),
/// };
///
/// assert_eq!(msg.to_string(), "Message delivered to __health__ [0]");
/// ```
pub struct MessageDelivered<'a> {
    pub topic: &'a str,
    pub partition: Option<i32>,
}

impl Display for MessageDelivered<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        match self.partition {
            Some(partition) => write!(f, "Message delivered to {} [{}]", self.topic, partition),
            None => write!(f, "Message delivered to {}", self.topic),
        }
    }
}

impl StructuredLog for MessageDelivered<'_> {
    fn log(&self) {
        tracing::info!(topic = self.topic, partition = self.partition, "{}", self);
    }

    fn span(&self, name: &str) -> Span {
        tracing::info_span!(
            "message_delivered",
            span_name = name,
            topic = self.topic,
            partition = self.partition,
        )
    }
}

/// The broker rejected a produced message.
///
/// # Log Level
/// `error!` - Failure requiring attention
pub struct DeliveryFailed<'a> {
    pub topic: &'a str,
    pub error: &'a str,
}

impl Display for DeliveryFailed<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(f, "Message delivery to {} failed: {}", self.topic, self.error)
    }
}

impl StructuredLog for DeliveryFailed<'_> {
    fn log(&self) {
        tracing::error!(topic = self.topic, error = self.error, "{}", self);
    }

    fn span(&self, name: &str) -> Span {
        tracing::error_span!(
            "delivery_failed",
            span_name = name,
            topic = self.topic,
            error = self.error,
        )
    }
}

/// A lookup scan reached its deadline without a match.
///
/// # Log Level
/// `info!` - Important operational event
pub struct ScanDeadlineExpired<'a> {
    pub topics: &'a [String],
    pub timeout: Duration,
}

impl Display for ScanDeadlineExpired<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "No matching message found in [{}] within {:?}",
            self.topics.join(", "),
            self.timeout
        )
    }
}

impl StructuredLog for ScanDeadlineExpired<'_> {
    fn log(&self) {
        tracing::info!(
            topics = ?self.topics,
            timeout_ms = self.timeout.as_millis() as u64,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::info_span!(
            "scan_deadline_expired",
            span_name = name,
            topics = ?self.topics,
            timeout = ?self.timeout,
        )
    }
}

/// A lookup scan found a message with the requested key.
///
/// # Log Level
/// `info!` - Important operational event
pub struct MessageMatched<'a> {
    pub topic: &'a str,
    pub key: &'a str,
}

impl Display for MessageMatched<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(f, "Found message with key '{}' on {}", self.key, self.topic)
    }
}

impl StructuredLog for MessageMatched<'_> {
    fn log(&self) {
        tracing::info!(topic = self.topic, key = self.key, "{}", self);
    }

    fn span(&self, name: &str) -> Span {
        tracing::info_span!(
            "message_matched",
            span_name = name,
            topic = self.topic,
            key = self.key,
        )
    }
}
