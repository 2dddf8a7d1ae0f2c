// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use crate::backends::object_store::{object_store_host, BACKEND};
use crate::config::{merge_options, BoundConfig, ConfigOverrides, Configuration};
use crate::errors::ClientError;
use crate::health::ProbeOutcome;
use crate::lifecycle::{connection_failed, ClientHandle, ConnectionState};
use crate::traits::{Client, ConfigScope, Connector};

pub struct ObjectStoreClient<C: Connector> {
    handle: ClientHandle<C::Driver>,
    connector: C,
}

impl<C: Connector> ConfigScope for ObjectStoreClient<C> {
    const CONFIG_SCOPE: &'static str = module_path!();
}

impl<C: Connector> ObjectStoreClient<C> {
    pub fn new(connector: C, bound: Option<&BoundConfig>, overrides: ConfigOverrides) -> Self {
        Self {
            handle: ClientHandle::new(BACKEND, merge_options(bound, overrides)),
            connector,
        }
    }
}

impl<C: Connector> Client for ObjectStoreClient<C> {
    type Driver = C::Driver;

    fn connect(&mut self) -> Result<(), ClientError> {
        let host = self.host();
        let connector = &self.connector;
        self.handle.connect_with(host.as_deref(), |config| {
            connector.connect(config).map_err(connection_failed(BACKEND))
        })
    }

    fn disconnect(&mut self) {
        self.handle.disconnect_with(|driver| {
            drop(driver);
            Ok(())
        });
    }

    /// `true` whenever a driver is held; no request is issued.
    fn status(&self) -> bool {
        self.handle.status_with("presence", |_| ProbeOutcome::Healthy)
    }

    fn host(&self) -> Option<String> {
        object_store_host(self.handle.configuration())
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
