// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Search-engine backend.
//!
//! The driver is built from the merged configuration as-is and must answer a
//! ping before `connect()` keeps it. `status()` pings again on every call.

mod async_client;
mod client;

use async_trait::async_trait;

use crate::config::hosts::{hosts_descriptor, HostScheme};
use crate::config::Configuration;
use crate::errors::ClientError;
use crate::health::ProbeOutcome;

pub use async_client::AsyncSearchClient;
pub use client::SearchClient;

pub(crate) const BACKEND: &str = "OpenSearch";

/// The part of a search-engine client the lifecycle needs.
pub trait SearchDriver: Send + Sync {
    /// `Ok(false)` when the cluster answered but is not available.
    fn ping(&self) -> anyhow::Result<bool>;

    fn close(self) -> anyhow::Result<()>;
}

#[async_trait]
pub trait AsyncSearchDriver: Send + Sync {
    async fn ping(&self) -> anyhow::Result<bool>;

    async fn close(self) -> anyhow::Result<()>;
}

pub(crate) fn ping_outcome(result: anyhow::Result<bool>) -> ProbeOutcome {
    match result {
        Ok(true) => ProbeOutcome::Healthy,
        Ok(false) => ProbeOutcome::Unhealthy("ping returned false".to_string()),
        Err(error) => ProbeOutcome::Unhealthy(format!("{:#}", error)),
    }
}

pub(crate) fn ping_rejected(reason: &str) -> ClientError {
    ClientError::ConnectionUnhealthy(format!(
        "Connection to {} cannot be established caused by either an invalid configuration or unreachable host: {}",
        BACKEND, reason
    ))
}

pub(crate) fn search_host(config: &Configuration) -> Option<String> {
    hosts_descriptor(config, BACKEND, HostScheme::HTTP)
}
