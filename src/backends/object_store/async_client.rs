// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use async_trait::async_trait;

use crate::backends::object_store::{object_store_host, BACKEND};
use crate::config::{merge_options, BoundConfig, ConfigOverrides, Configuration};
use crate::errors::ClientError;
use crate::health::ProbeOutcome;
use crate::lifecycle::{connection_failed, ClientHandle, ConnectionState};
use crate::traits::{AsyncClient, AsyncConnector, ConfigScope};

pub struct AsyncObjectStoreClient<C: AsyncConnector> {
    handle: ClientHandle<C::Driver>,
    connector: C,
}

impl<C: AsyncConnector> ConfigScope for AsyncObjectStoreClient<C> {
    const CONFIG_SCOPE: &'static str = module_path!();
}

impl<C: AsyncConnector> AsyncObjectStoreClient<C> {
    pub fn new(connector: C, bound: Option<&BoundConfig>, overrides: ConfigOverrides) -> Self {
        Self {
            handle: ClientHandle::new(BACKEND, merge_options(bound, overrides)),
            connector,
        }
    }
}

#[async_trait]
impl<C: AsyncConnector> AsyncClient for AsyncObjectStoreClient<C> {
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
            .disconnect_with_async(|driver| async move {
                drop(driver);
                Ok(())
            })
            .await;
    }

    async fn status(&self) -> bool {
        self.handle
            .status_with_async("presence", |_| async { ProbeOutcome::Healthy })
            .await
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

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backends::stub::{StubBucketClient, StubConnector};

    #[tokio::test]
    async fn test_async_presence_only_lifecycle() {
        let connector = StubConnector::new(StubBucketClient::default());
        let mut client = AsyncObjectStoreClient::new(
            connector.clone(),
            None,
            ConfigOverrides::new().set("uri", "s3://archive"),
        );

        client.connect().await.unwrap();
        client.connect().await.unwrap();
        assert!(client.status().await);
        assert_eq!(connector.connects(), 1);

        client.disconnect().await;
        assert!(!client.status().await);
        assert_eq!(client.state(), ConnectionState::Disconnected);
    }
}
