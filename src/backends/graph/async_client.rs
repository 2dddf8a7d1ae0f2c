// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use async_trait::async_trait;

use crate::backends::graph::driver::{AsyncGraphDriver, Params, Record};
use crate::backends::graph::{
    connectivity_failed, export_params, graph_host, label_names, ExportFormat, BACKEND,
    EXPORT_QUERY, LABELS_QUERY,
};
use crate::config::{merge_options, BoundConfig, ConfigOverrides, Configuration};
use crate::errors::ClientError;
use crate::health::ProbeOutcome;
use crate::lifecycle::{connection_failed, ClientHandle, ConnectionState};
use crate::observability::messages::lifecycle::ShutdownFailed;
use crate::observability::messages::StructuredLog;
use crate::traits::{AsyncClient, AsyncConnector, ConfigScope};
use crate::transaction::AsyncTransactionalQueryExecutor;

pub struct AsyncGraphClient<C>
where
    C: AsyncConnector,
    C::Driver: AsyncGraphDriver,
{
    handle: ClientHandle<C::Driver>,
    connector: C,
}

impl<C> ConfigScope for AsyncGraphClient<C>
where
    C: AsyncConnector,
    C::Driver: AsyncGraphDriver,
{
    const CONFIG_SCOPE: &'static str = module_path!();
}

impl<C> AsyncGraphClient<C>
where
    C: AsyncConnector,
    C::Driver: AsyncGraphDriver,
{
    pub fn new(connector: C, bound: Option<&BoundConfig>, overrides: ConfigOverrides) -> Self {
        Self {
            handle: ClientHandle::new(BACKEND, merge_options(bound, overrides)),
            connector,
        }
    }

    pub async fn execute(
        &self,
        query: &str,
        params: Option<&Params>,
    ) -> Result<Vec<Record>, ClientError> {
        AsyncTransactionalQueryExecutor::new(self.handle.driver()?)
            .execute(query, params)
            .await
    }

    pub async fn export_subgraph(
        &self,
        query: &str,
        params: Option<&Params>,
        format: ExportFormat,
    ) -> Result<Vec<Record>, ClientError> {
        let export = export_params(query, params, format);
        self.execute(EXPORT_QUERY, Some(&export)).await
    }

    pub async fn labels(&self) -> Result<Vec<String>, ClientError> {
        self.execute(LABELS_QUERY, None).await.map(label_names)
    }
}

#[async_trait]
impl<C> AsyncClient for AsyncGraphClient<C>
where
    C: AsyncConnector,
    C::Driver: AsyncGraphDriver,
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
                match driver.verify_connectivity().await {
                    Ok(()) => Ok(driver),
                    Err(error) => {
                        if let Err(close_error) = driver.close().await {
                            ShutdownFailed {
                                backend: BACKEND,
                                error: &close_error,
                            }
                            .log();
                        }
                        Err(connectivity_failed(error))
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
            .status_with_async("connectivity", |driver| async move {
                ProbeOutcome::from_result(
                    driver
                        .verify_connectivity()
                        .await
                        .map_err(|e| format!("{:#}", e)),
                )
            })
            .await
    }

    fn host(&self) -> Option<String> {
        graph_host(self.handle.configuration())
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
    use crate::backends::stub::{StubAsyncGraphDriver, StubConnector, StubGraphFault};
    use serde_json::json;

    #[tokio::test]
    async fn test_async_graph_lifecycle() {
        let driver = StubAsyncGraphDriver::with_rows(vec![json!({"labels": "Movie"})
            .as_object()
            .cloned()
            .unwrap()]);
        let mut client = AsyncGraphClient::new(
            StubConnector::new(driver.clone()),
            None,
            ConfigOverrides::new().set("hosts", json!([{"host": "g", "port": 7687}])),
        );

        assert_eq!(client.labels().await.unwrap_err().error_type(), "NoConnectionFound");

        client.connect().await.unwrap();
        assert!(client.status().await);
        assert_eq!(client.host().as_deref(), Some("bolt://g:7687"));
        assert_eq!(client.labels().await.unwrap(), vec!["Movie"]);

        client.disconnect().await;
        assert!(driver.store().closed);
        assert_eq!(client.state(), ConnectionState::Disconnected);
    }

    #[tokio::test]
    async fn test_async_query_failure_is_refused() {
        let driver = StubAsyncGraphDriver::with_rows(vec![])
            .with_fault(StubGraphFault::Commit("deadlock detected"));
        let mut client = AsyncGraphClient::new(
            StubConnector::new(driver.clone()),
            None,
            ConfigOverrides::new(),
        );
        client.connect().await.unwrap();

        let err = client
            .export_subgraph("MATCH (n) RETURN n", None, ExportFormat::NTriples)
            .await
            .unwrap_err();

        assert_eq!(err.error_type(), "REFUSED");
        assert_eq!(driver.store().rolled_back, 1);
    }

    #[tokio::test]
    async fn test_async_connect_rejects_unreachable_graph() {
        let driver = StubAsyncGraphDriver::with_rows(vec![]);
        driver.set_reachable(false);
        let mut client =
            AsyncGraphClient::new(StubConnector::new(driver.clone()), None, ConfigOverrides::new());

        assert_eq!(client.connect().await.unwrap_err().status_code(), 503);
        assert!(driver.store().closed);
        assert!(!client.status().await);
    }
}
