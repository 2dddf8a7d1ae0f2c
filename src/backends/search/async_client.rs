// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use async_trait::async_trait;

use crate::backends::search::{
    ping_outcome, ping_rejected, search_host, AsyncSearchDriver, BACKEND,
};
use crate::config::{merge_options, BoundConfig, ConfigOverrides, Configuration};
use crate::errors::ClientError;
use crate::health::ProbeOutcome;
use crate::lifecycle::{connection_failed, ClientHandle, ConnectionState};
use crate::observability::messages::lifecycle::ShutdownFailed;
use crate::observability::messages::StructuredLog;
use crate::traits::{AsyncClient, AsyncConnector, ConfigScope};

pub struct AsyncSearchClient<C>
where
    C: AsyncConnector,
    C::Driver: AsyncSearchDriver,
{
    handle: ClientHandle<C::Driver>,
    connector: C,
}

impl<C> ConfigScope for AsyncSearchClient<C>
where
    C: AsyncConnector,
    C::Driver: AsyncSearchDriver,
{
    const CONFIG_SCOPE: &'static str = module_path!();
}

impl<C> AsyncSearchClient<C>
where
    C: AsyncConnector,
    C::Driver: AsyncSearchDriver,
{
    pub fn new(connector: C, bound: Option<&BoundConfig>, overrides: ConfigOverrides) -> Self {
        Self {
            handle: ClientHandle::new(BACKEND, merge_options(bound, overrides)),
            connector,
        }
    }
}

#[async_trait]
impl<C> AsyncClient for AsyncSearchClient<C>
where
    C: AsyncConnector,
    C::Driver: AsyncSearchDriver,
{
    type Driver = C::Driver;

    async fn connect(&mut self) -> Result<(), ClientError> {
        let host = self.host();
        let connector = &self.connector;
        self.handle
            .connect_with_async(host.as_deref(), |config| async move {
                let driver = connector
                    .connect(&config)
                    .await
                    .map_err(connection_failed(BACKEND))?;
                match ping_outcome(driver.ping().await) {
                    ProbeOutcome::Healthy => Ok(driver),
                    ProbeOutcome::Unhealthy(reason) => {
                        if let Err(error) = driver.close().await {
                            ShutdownFailed {
                                backend: BACKEND,
                                error: &error,
                            }
                            .log();
                        }
                        Err(ping_rejected(&reason))
                    }
                }
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
            .status_with_async("ping", |driver| async move { ping_outcome(driver.ping().await) })
            .await
    }

    fn host(&self) -> Option<String> {
        search_host(self.handle.configuration())
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
