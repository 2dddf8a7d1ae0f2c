// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use async_trait::async_trait;

use crate::config::Configuration;

/// Builds a driver handle from a merged configuration.
///
/// This is the seam to third-party client libraries: the error type is
/// opaque, and wrappers map it into a [`crate::errors::ClientError`].
pub trait Connector: Send + Sync {
    type Driver;

    fn connect(&self, config: &Configuration) -> anyhow::Result<Self::Driver>;
}

#[async_trait]
pub trait AsyncConnector: Send + Sync {
    type Driver: Send + Sync;

    async fn connect(&self, config: &Configuration) -> anyhow::Result<Self::Driver>;
}
