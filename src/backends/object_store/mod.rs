// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Object-store backend.
//!
//! Object-store clients are stateless request signers: any [`Connector`]
//! driver works, nothing is probed, and dropping the driver is its shutdown.
//!
//! [`Connector`]: crate::traits::Connector

mod async_client;
mod client;

use crate::config::hosts::uri_descriptor;
use crate::config::Configuration;

pub use async_client::AsyncObjectStoreClient;
pub use client::ObjectStoreClient;

pub(crate) const BACKEND: &str = "S3";
pub(crate) const HOST_FALLBACK_KEYS: &[&str] = &["endpoint_url"];

pub(crate) fn object_store_host(config: &Configuration) -> Option<String> {
    uri_descriptor(config, BACKEND, HOST_FALLBACK_KEYS)
}
