// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use std::sync::Arc;

use async_trait::async_trait;
use tokio::task;

use crate::backends::http::options::HttpOptions;
use crate::backends::http::response::Response;
use crate::backends::http::transport::{Method, RequestOptions, Transport};
use crate::backends::http::{build_transport, http_host, BACKEND};
use crate::config::Configuration;
use crate::errors::ClientError;
use crate::health::ProbeOutcome;
use crate::lifecycle::{ClientHandle, ConnectionState};
use crate::observability::messages::http::SessionClosed;
use crate::observability::messages::StructuredLog;
use crate::traits::AsyncClient;

/// Async HTTP wrapper.
///
/// Transport construction and every request run on the blocking pool, so
/// each call is a suspension point for the calling task.
pub struct AsyncProxiedClient {
    options: Arc<HttpOptions>,
    handle: ClientHandle<Arc<Transport>>,
}

impl AsyncProxiedClient {
    pub fn new(options: HttpOptions) -> Self {
        Self {
            handle: ClientHandle::new(BACKEND, options.to_configuration()),
            options: Arc::new(options),
        }
    }

    pub fn http_options(&self) -> &HttpOptions {
        &self.options
    }

    pub async fn request(
        &mut self,
        method: Method,
        endpoint: &str,
        params: &[(&str, &str)],
        request: &RequestOptions,
    ) -> Result<Response, ClientError> {
        self.connect().await?;
        let transport = Arc::clone(self.handle.driver()?);

        let endpoint = endpoint.to_string();
        let params: Vec<(String, String)> = params
            .iter()
            .map(|(key, value)| (key.to_string(), value.to_string()))
            .collect();
        let request = request.clone();

        task::spawn_blocking(move || {
            let params: Vec<(&str, &str)> = params
                .iter()
                .map(|(key, value)| (key.as_str(), value.as_str()))
                .collect();
            transport.send(method, &endpoint, &params, &request)
        })
        .await
        .map_err(|error| ClientError::RequestFailed(format!("{} request task failed: {}", method, error)))?
    }

    pub async fn get(
        &mut self,
        endpoint: &str,
        params: &[(&str, &str)],
        request: &RequestOptions,
    ) -> Result<Response, ClientError> {
        self.request(Method::Get, endpoint, params, request).await
    }

    pub async fn head(
        &mut self,
        endpoint: &str,
        params: &[(&str, &str)],
        request: &RequestOptions,
    ) -> Result<Response, ClientError> {
        self.request(Method::Head, endpoint, params, request).await
    }

    pub async fn post(
        &mut self,
        endpoint: &str,
        params: &[(&str, &str)],
        request: &RequestOptions,
    ) -> Result<Response, ClientError> {
        self.request(Method::Post, endpoint, params, request).await
    }

    pub async fn put(
        &mut self,
        endpoint: &str,
        params: &[(&str, &str)],
        request: &RequestOptions,
    ) -> Result<Response, ClientError> {
        self.request(Method::Put, endpoint, params, request).await
    }

    pub async fn patch(
        &mut self,
        endpoint: &str,
        params: &[(&str, &str)],
        request: &RequestOptions,
    ) -> Result<Response, ClientError> {
        self.request(Method::Patch, endpoint, params, request).await
    }

    pub async fn delete(
        &mut self,
        endpoint: &str,
        params: &[(&str, &str)],
        request: &RequestOptions,
    ) -> Result<Response, ClientError> {
        self.request(Method::Delete, endpoint, params, request).await
    }

    pub async fn options(
        &mut self,
        endpoint: &str,
        params: &[(&str, &str)],
        request: &RequestOptions,
    ) -> Result<Response, ClientError> {
        self.request(Method::Options, endpoint, params, request).await
    }
}

#[async_trait]
impl AsyncClient for AsyncProxiedClient {
    type Driver = Arc<Transport>;

    async fn connect(&mut self) -> Result<(), ClientError> {
        let options = Arc::clone(&self.options);
        self.handle
            .connect_with_async(Some(&self.options.host), |_| async move {
                task::spawn_blocking(move || build_transport(&options).map(Arc::new))
                    .await
                    .map_err(|error| ClientError::connection_failed(BACKEND, error))?
            })
            .await
    }

    async fn disconnect(&mut self) {
        let host = &self.options.host;
        self.handle
            .disconnect_with_async(|transport| async move {
                drop(transport);
                SessionClosed { host }.log();
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
        http_host(&self.options)
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
    use crate::backends::stub::OneShotServer;

    #[tokio::test]
    async fn test_async_request_runs_off_the_runtime() {
        let server = OneShotServer::respond(
            "HTTP/1.1 204 No Content\r\nX-Trace: t-1\r\nContent-Length: 0\r\nConnection: close\r\n\r\n",
        );
        let mut client = AsyncProxiedClient::new(HttpOptions::new(server.base_url()));

        let response = client
            .put("/items/7", &[], &RequestOptions::new().with_body("payload"))
            .await
            .unwrap();

        assert_eq!(response.status, 204);
        assert_eq!(response.header("x-trace"), Some("t-1"));
        assert!(response.content.is_empty());
        assert!(client.status().await);

        let request = server.request();
        assert!(request.starts_with("PUT /items/7 HTTP/1.1"));
        assert!(request.ends_with("payload"));

        client.disconnect().await;
        assert_eq!(client.state(), ConnectionState::Disconnected);
    }

    #[tokio::test]
    async fn test_async_transport_failure() {
        let port = OneShotServer::closed_port();
        let mut client =
            AsyncProxiedClient::new(HttpOptions::new(format!("http://127.0.0.1:{}", port)));

        let err = client
            .head("/", &[], &RequestOptions::new())
            .await
            .unwrap_err();

        assert_eq!(err.error_type(), "RequestFailed");
        assert!(client.status().await);
    }
}
