// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use async_trait::async_trait;

use crate::config::Configuration;
use crate::errors::ClientError;
use crate::lifecycle::ConnectionState;

/// The lifecycle contract every blocking backend wrapper implements.
///
/// Lifecycle operations take `&mut self`, so one owner drives them in
/// sequence. A wrapper shared between threads must be serialized by the
/// caller (for example behind a `Mutex`); concurrent `connect`/`disconnect`
/// on one handle is not supported.
pub trait Client {
    type Driver;

    /// Build the driver handle from the merged configuration. No-op when connected.
    fn connect(&mut self) -> Result<(), ClientError>;

    /// Release the driver handle, invoking its shutdown primitive. No-op when disconnected.
    fn disconnect(&mut self);

    /// Whether the connection is usable. Never fails; probe failures are logged.
    fn status(&self) -> bool;

    /// Endpoint descriptor derived from configuration only.
    fn host(&self) -> Option<String>;

    /// The live driver handle, or `NotConnected`.
    fn client(&self) -> Result<&Self::Driver, ClientError>;

    fn state(&self) -> ConnectionState;

    fn configuration(&self) -> &Configuration;
}

/// The lifecycle contract every async backend wrapper implements.
///
/// `connect`, `disconnect` and `status` are suspension points. The same
/// single-owner rule as [`Client`] applies: wrap the client in a
/// `tokio::sync::Mutex` to share it between tasks.
#[async_trait]
pub trait AsyncClient: Send + Sync {
    type Driver: Send + Sync;

    async fn connect(&mut self) -> Result<(), ClientError>;

    async fn disconnect(&mut self);

    async fn status(&self) -> bool;

    fn host(&self) -> Option<String>;

    fn client(&self) -> Result<&Self::Driver, ClientError>;

    fn state(&self) -> ConnectionState;

    fn configuration(&self) -> &Configuration;
}

/// The registry scope a wrapper type searches for its declared configuration
/// when no explicit scope is supplied.
pub trait ConfigScope {
    const CONFIG_SCOPE: &'static str;
}
