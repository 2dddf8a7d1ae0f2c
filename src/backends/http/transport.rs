// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! The reusable request pipeline built once per `connect()`.

use std::fmt;
use std::io::Read;
use std::time::Instant;

use anyhow::Context;
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use serde_json::Value;

use crate::backends::http::options::HttpOptions;
use crate::backends::http::response::Response;
use crate::backends::http::tls;
use crate::errors::ClientError;
use crate::observability::messages::http::{RequestCompleted, RequestFailed};
use crate::observability::messages::StructuredLog;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Head,
    Post,
    Put,
    Patch,
    Delete,
    Options,
}

impl Method {
    pub fn as_str(&self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Head => "HEAD",
            Method::Post => "POST",
            Method::Put => "PUT",
            Method::Patch => "PATCH",
            Method::Delete => "DELETE",
            Method::Options => "OPTIONS",
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Per-request headers and body.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequestOptions {
    pub headers: Vec<(String, String)>,
    pub body: Option<Vec<u8>>,
}

impl RequestOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    pub fn with_body(mut self, body: impl Into<Vec<u8>>) -> Self {
        self.body = Some(body.into());
        self
    }

    /// Serialize `value` as the body and set the JSON content type.
    pub fn with_json(self, value: &Value) -> Self {
        self.with_header("Content-Type", "application/json")
            .with_body(value.to_string())
    }
}

/// A `ureq` agent bound to one host's TLS, proxy, auth and timeout settings.
pub struct Transport {
    agent: ureq::Agent,
    base: String,
    authorization: Option<String>,
    tls: bool,
    proxied: bool,
}

impl fmt::Debug for Transport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Transport")
            .field("base", &self.base)
            .field("basic_auth", &self.authorization.is_some())
            .field("tls", &self.tls)
            .field("proxied", &self.proxied)
            .finish()
    }
}

impl Transport {
    pub fn build(options: &HttpOptions) -> anyhow::Result<Self> {
        let mut builder = ureq::AgentBuilder::new();

        let tls_config = tls::client_config(options)?;
        let tls = tls_config.is_some();
        if let Some(config) = tls_config {
            builder = builder.tls_config(config);
        }

        let proxy_url = options.proxy_url();
        if let Some(proxy) = &proxy_url {
            let proxy = ureq::Proxy::new(proxy).context("invalid proxy URL")?;
            builder = builder.proxy(proxy);
        }

        if let Some(timeout) = options.timeout {
            builder = builder.timeout(timeout);
        }

        let authorization = options.auth.as_ref().map(|auth| {
            format!(
                "Basic {}",
                STANDARD.encode(format!("{}:{}", auth.username, auth.password))
            )
        });

        Ok(Self {
            agent: builder.build(),
            base: options.host.trim_end_matches('/').to_string(),
            authorization,
            tls,
            proxied: proxy_url.is_some(),
        })
    }

    pub fn is_tls(&self) -> bool {
        self.tls
    }

    pub fn is_proxied(&self) -> bool {
        self.proxied
    }

    /// `base/endpoint`, followed by `?` and the URL-encoded `params` when any are given.
    pub fn url(&self, endpoint: &str, params: &[(&str, &str)]) -> String {
        let mut url = format!("{}/{}", self.base, endpoint.trim_start_matches('/'));
        if !params.is_empty() {
            let query = url::form_urlencoded::Serializer::new(String::new())
                .extend_pairs(params)
                .finish();
            url.push('?');
            url.push_str(&query);
        }
        url
    }

    /// Dispatch one request and read the full body.
    ///
    /// Every status code yields a [`Response`]. Only transport failures
    /// (connection, TLS, timeout, body read) are errors.
    pub fn send(
        &self,
        method: Method,
        endpoint: &str,
        params: &[(&str, &str)],
        options: &RequestOptions,
    ) -> Result<Response, ClientError> {
        let url = self.url(endpoint, params);
        let mut request = self.agent.request(method.as_str(), &url);
        if let Some(authorization) = &self.authorization {
            request = request.set("Authorization", authorization);
        }
        for (name, value) in &options.headers {
            request = request.set(name, value);
        }

        let started = Instant::now();
        let outcome = match &options.body {
            Some(body) => request.send_bytes(body),
            None => request.call(),
        };

        let response = match outcome {
            Ok(response) | Err(ureq::Error::Status(_, response)) => response,
            Err(ureq::Error::Transport(error)) => return Err(request_failed(method, &url, &error)),
        };

        let status = response.status();
        let headers = response
            .headers_names()
            .into_iter()
            .filter_map(|name| {
                let value = response.header(&name)?.to_string();
                Some((name, value))
            })
            .collect();

        let mut content = Vec::new();
        response
            .into_reader()
            .read_to_end(&mut content)
            .map_err(|error| request_failed(method, &url, &error))?;
        let response_time = started.elapsed();

        RequestCompleted {
            method: method.as_str(),
            url: &url,
            status,
            elapsed: response_time,
        }
        .log();

        Ok(Response {
            status,
            content,
            headers,
            response_time,
        })
    }
}

fn request_failed(method: Method, url: &str, error: &dyn fmt::Display) -> ClientError {
    RequestFailed {
        method: method.as_str(),
        url,
        error,
    }
    .log();
    ClientError::RequestFailed(format!("{} {} failed: {}", method, url, error))
}
