// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use crate::backends::graph::driver::{GraphDriver, Params, Record};
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
use crate::traits::{Client, ConfigScope, Connector};
use crate::transaction::TransactionalQueryExecutor;

/// Blocking graph-database wrapper.
pub struct GraphClient<C>
where
    C: Connector,
    C::Driver: GraphDriver,
{
    handle: ClientHandle<C::Driver>,
    connector: C,
}

impl<C> ConfigScope for GraphClient<C>
where
    C: Connector,
    C::Driver: GraphDriver,
{
    const CONFIG_SCOPE: &'static str = module_path!();
}

impl<C> GraphClient<C>
where
    C: Connector,
    C::Driver: GraphDriver,
{
    pub fn new(connector: C, bound: Option<&BoundConfig>, overrides: ConfigOverrides) -> Self {
        Self {
            handle: ClientHandle::new(BACKEND, merge_options(bound, overrides)),
            connector,
        }
    }

    /// Run `query` in its own session and transaction.
    pub fn execute(&self, query: &str, params: Option<&Params>) -> Result<Vec<Record>, ClientError> {
        TransactionalQueryExecutor::new(self.handle.driver()?).execute(query, params)
    }

    /// Export the subgraph matched by `query` as RDF in `format`.
    pub fn export_subgraph(
        &self,
        query: &str,
        params: Option<&Params>,
        format: ExportFormat,
    ) -> Result<Vec<Record>, ClientError> {
        self.execute(EXPORT_QUERY, Some(&export_params(query, params, format)))
    }

    /// All node labels in the database.
    pub fn labels(&self) -> Result<Vec<String>, ClientError> {
        self.execute(LABELS_QUERY, None).map(label_names)
    }
}

impl<C> Client for GraphClient<C>
where
    C: Connector,
    C::Driver: GraphDriver,
{
    type Driver = C::Driver;

    /// The driver is kept only after connectivity verification succeeds.
    fn connect(&mut self) -> Result<(), ClientError> {
        let host = self.host();
        let connector = &self.connector;
        self.handle.connect_with(host.as_deref(), |config| {
            let driver = connector.connect(config).map_err(connection_failed(BACKEND))?;
            match driver.verify_connectivity() {
                Ok(()) => Ok(driver),
                Err(error) => {
                    discard(driver);
                    Err(connectivity_failed(error))
                }
            }
        })
    }

    fn disconnect(&mut self) {
        self.handle.disconnect_with(|driver| driver.close());
    }

    fn status(&self) -> bool {
        self.handle.status_with("connectivity", |driver| {
            ProbeOutcome::from_result(driver.verify_connectivity().map_err(|e| format!("{:#}", e)))
        })
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

fn discard<D: GraphDriver>(driver: D) {
    if let Err(error) = driver.close() {
        ShutdownFailed {
            backend: BACKEND,
            error: &error,
        }
        .log();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backends::stub::{StubConnector, StubGraphDriver};
    use serde_json::json;

    fn client(driver: &StubGraphDriver) -> GraphClient<StubConnector<StubGraphDriver>> {
        GraphClient::new(
            StubConnector::new(driver.clone()),
            None,
            ConfigOverrides::new().set("uri", "bolt://graph.internal:7687"),
        )
    }

    #[test]
    fn test_connect_verifies_connectivity() {
        let driver = StubGraphDriver::with_rows(vec![]);
        let mut client = client(&driver);

        client.connect().unwrap();
        client.connect().unwrap();

        assert_eq!(client.state(), ConnectionState::Connected);
        assert_eq!(driver.store().connectivity_checks, 1);
        assert!(client.status());
        assert_eq!(client.host().as_deref(), Some("bolt://graph.internal:7687"));
    }

    #[test]
    fn test_unreachable_graph_is_discarded() {
        let driver = StubGraphDriver::with_rows(vec![]);
        driver.set_reachable(false);
        let mut client = client(&driver);

        let err = client.connect().unwrap_err();

        assert_eq!(err.error_type(), "Unhealthy");
        assert_eq!(client.state(), ConnectionState::Disconnected);
        assert!(driver.store().closed);
        assert_eq!(client.execute("RETURN 1", None).unwrap_err().status_code(), 404);
    }

    #[test]
    fn test_export_and_labels_go_through_the_executor() {
        let driver = StubGraphDriver::with_rows(vec![json!({"labels": "Person"})
            .as_object()
            .cloned()
            .unwrap()]);
        let mut client = client(&driver);
        client.connect().unwrap();

        assert_eq!(client.labels().unwrap(), vec!["Person"]);
        client
            .export_subgraph("MATCH (n) RETURN n", None, ExportFormat::Turtle)
            .unwrap();

        let store = driver.store();
        assert_eq!(store.committed, vec![LABELS_QUERY, EXPORT_QUERY]);
        let (_, export) = &store.ran[1];
        assert_eq!(export["cypherQuery"], json!("MATCH (n) RETURN n"));
        assert_eq!(export["config"]["format"], json!("Turtle"));
        assert_eq!(store.sessions_opened, store.sessions_closed);
    }

    #[test]
    fn test_status_follows_connectivity_and_disconnect_closes() {
        let driver = StubGraphDriver::with_rows(vec![]);
        let mut client = client(&driver);
        client.connect().unwrap();

        driver.set_reachable(false);
        assert!(!client.status());
        assert_eq!(client.state(), ConnectionState::Connected);

        client.disconnect();
        assert!(driver.store().closed);
        assert!(!client.status());
        assert!(client.client().is_err());
    }
}
