// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Key-value cache backend.
//!
//! Cache clients hold a lazy connection pool, so `connect()` only builds the
//! driver and `status()` reports its presence. `disconnect()` closes the pool.

mod async_client;
mod client;

use async_trait::async_trait;

use crate::config::consts::{URI_KEY, USE_SSL_KEY};
use crate::config::hosts::{describe, first_string};
use crate::config::Configuration;

pub use async_client::AsyncCacheClient;
pub use client::CacheClient;

pub(crate) const BACKEND: &str = "Redis";

pub trait CacheDriver {
    fn close(self) -> anyhow::Result<()>;
}

#[async_trait]
pub trait AsyncCacheDriver: Send + Sync {
    async fn close(self) -> anyhow::Result<()>;
}

/// `uri` when set, otherwise `redis://host:port` (`rediss` with `use_ssl`).
pub(crate) fn cache_host(config: &Configuration) -> Option<String> {
    let descriptor = first_string(config, &[URI_KEY]).or_else(|| {
        let host = first_string(config, &["host"])?;
        let scheme = if config.get_bool(USE_SSL_KEY).unwrap_or(false) {
            "rediss"
        } else {
            "redis"
        };
        Some(match config.get_u64("port") {
            Some(port) => format!("{}://{}:{}", scheme, host, port),
            None => format!("{}://{}", scheme, host),
        })
    });
    describe(BACKEND, descriptor)
}
