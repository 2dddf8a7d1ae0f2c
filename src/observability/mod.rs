// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Observability module for structured logging and tracing.
//!
//! Diagnostics are emitted through `tracing` using the struct-based message
//! types in [`messages`], so no log text is scattered through the code. On top
//! of that, this module provides:
//!
//! * [`LogContext`] - user / data correlation fields for application records
//! * [`LogFailure`] - logs a failed lifecycle result with its call site
//! * [`init_tracing`] - installs an `EnvFilter`-driven `fmt` subscriber
//!
//! # Usage
//!
//! ```rust
//! use plyght::observability::messages::health::ProbeFailed;
//! use plyght::observability::messages::StructuredLog;
//!
//! ProbeFailed {
//!     backend: "Neo4j",
//!     probe: "connectivity",
//!     reason: "routing table unavailable",
//! }
//! .log();
//! ```

mod context;
mod failure;
pub mod messages;
mod subscriber;

pub use context::{LogContext, LogType};
pub use failure::LogFailure;
pub use subscriber::{init_tracing, try_init_tracing};
