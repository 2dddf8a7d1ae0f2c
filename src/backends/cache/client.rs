// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use crate::backends::cache::{cache_host, CacheDriver, BACKEND};
use crate::config::{merge_options, BoundConfig, ConfigOverrides, Configuration};
use crate::errors::ClientError;
use crate::health::ProbeOutcome;
use crate::lifecycle::{connection_failed, ClientHandle, ConnectionState};
use crate::traits::{Client, ConfigScope, Connector};

pub struct CacheClient<C>
where
    C: Connector,
    C::Driver: CacheDriver,
{
    handle: ClientHandle<C::Driver>,
    connector: C,
}

impl<C> ConfigScope for CacheClient<C>
where
    C: Connector,
    C::Driver: CacheDriver,
{
    const CONFIG_SCOPE: &'static str = module_path!();
}

impl<C> CacheClient<C>
where
    C: Connector,
    C::Driver: CacheDriver,
{
    pub fn new(connector: C, bound: Option<&BoundConfig>, overrides: ConfigOverrides) -> Self {
        Self {
            handle: ClientHandle::new(BACKEND, merge_options(bound, overrides)),
            connector,
        }
    }
}

impl<C> Client for CacheClient<C>
where
    C: Connector,
    C::Driver: CacheDriver,
{
    type Driver = C::Driver;

    fn connect(&mut self) -> Result<(), ClientError> {
        let host = self.host();
        let connector = &self.connector;
        self.handle.connect_with(host.as_deref(), |config| {
            connector.connect(config).map_err(connection_failed(BACKEND))
        })
    }

    fn disconnect(&mut self) {
        self.handle.disconnect_with(|driver| driver.close());
    }

    fn status(&self) -> bool {
        self.handle.status_with("presence", |_| ProbeOutcome::Healthy)
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
