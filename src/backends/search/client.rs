// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use crate::backends::search::{ping_outcome, ping_rejected, search_host, SearchDriver, BACKEND};
use crate::config::{merge_options, BoundConfig, ConfigOverrides, Configuration};
use crate::errors::ClientError;
use crate::health::ProbeOutcome;
use crate::lifecycle::{connection_failed, ClientHandle, ConnectionState};
use crate::observability::messages::lifecycle::ShutdownFailed;
use crate::observability::messages::StructuredLog;
use crate::traits::{Client, ConfigScope, Connector};

/// Blocking search-engine wrapper.
pub struct SearchClient<C>
where
    C: Connector,
    C::Driver: SearchDriver,
{
    handle: ClientHandle<C::Driver>,
    connector: C,
}

impl<C> ConfigScope for SearchClient<C>
where
    C: Connector,
    C::Driver: SearchDriver,
{
    const CONFIG_SCOPE: &'static str = module_path!();
}

impl<C> SearchClient<C>
where
    C: Connector,
    C::Driver: SearchDriver,
{
    pub fn new(connector: C, bound: Option<&BoundConfig>, overrides: ConfigOverrides) -> Self {
        Self {
            handle: ClientHandle::new(BACKEND, merge_options(bound, overrides)),
            connector,
        }
    }
}

impl<C> Client for SearchClient<C>
where
    C: Connector,
    C::Driver: SearchDriver,
{
    type Driver = C::Driver;

    fn connect(&mut self) -> Result<(), ClientError> {
        let host = self.host();
        let connector = &self.connector;
        self.handle.connect_with(host.as_deref(), |config| {
            let driver = connector.connect(config).map_err(connection_failed(BACKEND))?;
            match ping_outcome(driver.ping()) {
                ProbeOutcome::Healthy => Ok(driver),
                ProbeOutcome::Unhealthy(reason) => {
                    if let Err(error) = driver.close() {
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
    }

    fn disconnect(&mut self) {
        self.handle.disconnect_with(|driver| driver.close());
    }

    fn status(&self) -> bool {
        self.handle
            .status_with("ping", |driver| ping_outcome(driver.ping()))
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
