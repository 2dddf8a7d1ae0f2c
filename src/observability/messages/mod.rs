// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Centralized message types for structured logging.
//!
//! Every diagnostic the crate emits has a message type here. Each one
//! implements `Display` for the human-readable text and [`StructuredLog`]
//! to emit the event with typed fields at its documented level.
//!
//! # Organization
//!
//! * `config` - declared configuration resolution
//! * `lifecycle` - connect / disconnect / host derivation events
//! * `health` - liveness probe failures
//! * `query` - transactional query outcomes
//! * `broker` - delivery reports and lookup scans
//! * `http` - session and request events
//!
//! # Usage Pattern
//!
//! ```rust
//! use plyght::observability::messages::lifecycle::ConnectionEstablished;
//! use plyght::observability::messages::StructuredLog;
//!
//! let msg = ConnectionEstablished {
//!     backend: "OpenSearch",
//!     host: Some("https://search-1:9200"),
//! };
//!
//! msg.log();
//! ```

use tracing::Span;

pub mod broker;
pub mod config;
pub mod health;
pub mod http;
pub mod lifecycle;
pub mod query;

/// A message that knows how to emit itself as a structured tracing event.
pub trait StructuredLog {
    /// Emit the event at the message's level, with its fields attached.
    fn log(&self);

    /// Open a span carrying the message's fields.
    fn span(&self, name: &str) -> Span;
}
