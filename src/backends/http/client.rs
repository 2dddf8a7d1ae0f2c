// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

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
use crate::traits::Client;

/// Blocking HTTP wrapper. Each verb connects on first use.
pub struct ProxiedClient {
    options: HttpOptions,
    handle: ClientHandle<Transport>,
}

impl ProxiedClient {
    pub fn new(options: HttpOptions) -> Self {
        Self {
            handle: ClientHandle::new(BACKEND, options.to_configuration()),
            options,
        }
    }

    pub fn http_options(&self) -> &HttpOptions {
        &self.options
    }

    pub fn request(
        &mut self,
        method: Method,
        endpoint: &str,
        params: &[(&str, &str)],
        request: &RequestOptions,
    ) -> Result<Response, ClientError> {
        self.connect()?;
        self.handle.driver()?.send(method, endpoint, params, request)
    }

    pub fn get(
        &mut self,
        endpoint: &str,
        params: &[(&str, &str)],
        request: &RequestOptions,
    ) -> Result<Response, ClientError> {
        self.request(Method::Get, endpoint, params, request)
    }

    pub fn head(
        &mut self,
        endpoint: &str,
        params: &[(&str, &str)],
        request: &RequestOptions,
    ) -> Result<Response, ClientError> {
        self.request(Method::Head, endpoint, params, request)
    }

    pub fn post(
        &mut self,
        endpoint: &str,
        params: &[(&str, &str)],
        request: &RequestOptions,
    ) -> Result<Response, ClientError> {
        self.request(Method::Post, endpoint, params, request)
    }

    pub fn put(
        &mut self,
        endpoint: &str,
        params: &[(&str, &str)],
        request: &RequestOptions,
    ) -> Result<Response, ClientError> {
        self.request(Method::Put, endpoint, params, request)
    }

    pub fn patch(
        &mut self,
        endpoint: &str,
        params: &[(&str, &str)],
        request: &RequestOptions,
    ) -> Result<Response, ClientError> {
        self.request(Method::Patch, endpoint, params, request)
    }

    pub fn delete(
        &mut self,
        endpoint: &str,
        params: &[(&str, &str)],
        request: &RequestOptions,
    ) -> Result<Response, ClientError> {
        self.request(Method::Delete, endpoint, params, request)
    }

    pub fn options(
        &mut self,
        endpoint: &str,
        params: &[(&str, &str)],
        request: &RequestOptions,
    ) -> Result<Response, ClientError> {
        self.request(Method::Options, endpoint, params, request)
    }
}

impl Client for ProxiedClient {
    type Driver = Transport;

    fn connect(&mut self) -> Result<(), ClientError> {
        let options = &self.options;
        self.handle
            .connect_with(Some(&options.host), |_| build_transport(options))
    }

    fn disconnect(&mut self) {
        let host = &self.options.host;
        self.handle.disconnect_with(|transport| {
            drop(transport);
            SessionClosed { host }.log();
            Ok(())
        });
    }

    /// `true` once a transport exists; no request is issued.
    fn status(&self) -> bool {
        self.handle.status_with("presence", |_| ProbeOutcome::Healthy)
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
