// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use async_trait::async_trait;

use crate::backends::cache::{cache_host, AsyncCacheDriver, BACKEND};
use crate::config::{merge_options, BoundConfig, ConfigOverrides, Configuration};
use crate::errors::ClientError;
use crate::health::ProbeOutcome;
use crate::lifecycle::{connection_failed, ClientHandle, ConnectionState};
use crate::traits::{AsyncClient, AsyncConnector, ConfigScope};

pub struct AsyncCacheClient<C>
where
    C: AsyncConnector,
    C::Driver: AsyncCacheDriver,
{
    handle: ClientHandle<C::Driver>,
    connector: C,
}

impl<C> ConfigScope for AsyncCacheClient<C>
where
    C: AsyncConnector,
    C::Driver: AsyncCacheDriver,
{
    const CONFIG_SCOPE: &'static str = module_path!();
}

impl<C> AsyncCacheClient<C>
where
    C: AsyncConnector,
    C::Driver: AsyncCacheDriver,
{
    pub fn new(connector: C, bound: Option<&BoundConfig>, overrides: ConfigOverrides) -> Self {
        Self {
            handle: ClientHandle::new(BACKEND, merge_options(bound, overrides)),
            connector,
        }
    }
}

#[async_trait]
impl<C> AsyncClient for AsyncCacheClient<C>
where
    C: AsyncConnector,
    C::Driver: AsyncCacheDriver,
{
    type Driver = C::Driver;

    async fn connect(&mut self) -> Result<(), ClientError> {
        let host = self.host();
        let connector = &self.connector;
        self.handle
            .connect_with_async(host.as_deref(), |config| async move {
                connector
                    .connect(&config)
                    .await
                    .map_err(connection_failed(BACKEND))
            })
            .await
    }

    async fn disconnect(&mut self) {
        self.handle
            .disconnect_with_async(|driver| async move { driver.close().await })
            .await;
    }

    async fn status(&self) -> bool {
        self.handle
            .status_with_async("presence", |_| async { ProbeOutcome::Healthy })
            .await
    }

    fn host(&self) -> Option<String> {
        cache_host(self.handle.configuration())
    }

    fn client(&self) -> Result<&Self::Driver, ClientError> {
        self.handle.driver()
    }

    fn state(&self) -> ConnectionState {
        self.handle.state()
    }

    fn configuration(&self) -> &Configuration {
        self.handle.configuration()
    }
}
