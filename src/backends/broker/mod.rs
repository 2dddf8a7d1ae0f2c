// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Message-broker backend.
//!
//! A broker wrapper holds either a producer or a consumer, chosen by
//! allocating a [`BrokerMode`] before `connect()`. Configuration keys other
//! than the framework's own (`topics`, `uri`) are passed to the driver
//! verbatim.
//!
//! # Example
//! ```rust,ignore
//! let mut client = BrokerClient::new(connector, Some(&bound), ConfigOverrides::new().set("topics", "orders"));
//! client.allocate("consume")?;
//! client.connect()?;
//! let found = client.find("trace-id", "abc-123", Duration::from_secs(15), Duration::from_secs(1))?;
//! ```

mod async_client;
mod client;
pub mod driver;

use std::fmt;
use std::str::FromStr;

use serde_json::Value;

use crate::config::consts::TOPICS_KEY;
use crate::config::hosts::uri_descriptor;
use crate::config::Configuration;
use crate::errors::ClientError;

pub use async_client::AsyncBrokerClient;
pub use client::BrokerClient;

pub(crate) const BACKEND: &str = "Kafka";
pub(crate) const HOST_FALLBACK_KEYS: &[&str] = &["bootstrap.servers"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BrokerMode {
    Produce,
    Consume,
}

impl BrokerMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            BrokerMode::Produce => "produce",
            BrokerMode::Consume => "consume",
        }
    }
}

impl fmt::Display for BrokerMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BrokerMode {
    type Err = ClientError;

    fn from_str(mode: &str) -> Result<Self, Self::Err> {
        match mode {
            "produce" => Ok(BrokerMode::Produce),
            "consume" => Ok(BrokerMode::Consume),
            other => Err(ClientError::InvalidMode(format!(
                "Unknown broker mode '{}', expected one of: produce, consume",
                other
            ))),
        }
    }
}

/// The live driver of a broker wrapper.
#[derive(Debug)]
pub enum BrokerDriver<P, C> {
    Producer(P),
    Consumer(C),
}

impl<P, C> BrokerDriver<P, C> {
    pub fn mode(&self) -> BrokerMode {
        match self {
            BrokerDriver::Producer(_) => BrokerMode::Produce,
            BrokerDriver::Consumer(_) => BrokerMode::Consume,
        }
    }
}

/// A message located by a lookup scan.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FoundMessage {
    pub topic: String,
    pub key: Option<Vec<u8>>,
    pub value: Option<Vec<u8>>,
    pub headers: Vec<(String, Vec<u8>)>,
}

/// Decode byte headers into strings, replacing invalid UTF-8.
pub fn decode_headers(headers: &[(String, Vec<u8>)]) -> Vec<(String, String)> {
    headers
        .iter()
        .map(|(name, value)| (name.clone(), String::from_utf8_lossy(value).into_owned()))
        .collect()
}

/// Whether any header has `name` with a value equal to `value`.
pub(crate) fn header_matches(headers: &[(String, Vec<u8>)], name: &str, value: &str) -> bool {
    headers
        .iter()
        .any(|(key, bytes)| key == name && String::from_utf8_lossy(bytes) == value)
}

/// `topics` as a list, whether configured as one string or a sequence.
pub fn configured_topics(config: &Configuration) -> Vec<String> {
    match config.get(TOPICS_KEY) {
        Some(Value::String(topic)) if !topic.is_empty() => vec![topic.clone()],
        Some(Value::Array(topics)) => topics
            .iter()
            .filter_map(Value::as_str)
            .filter(|topic| !topic.is_empty())
            .map(str::to_string)
            .collect(),
        _ => Vec::new(),
    }
}

pub(crate) fn broker_host(config: &Configuration) -> Option<String> {
    uri_descriptor(config, BACKEND, HOST_FALLBACK_KEYS)
}

pub(crate) fn mode_not_set() -> ClientError {
    ClientError::InvalidMode("Mode not set, use allocate() to set the broker mode.".to_string())
}

pub(crate) fn wrong_mode(operation: &str, required: BrokerMode) -> ClientError {
    ClientError::InvalidMode(format!(
        "{} requires the broker to be allocated in {} mode",
        operation, required
    ))
}

pub(crate) fn producer_unhealthy(reason: &str) -> ClientError {
    ClientError::ConnectionUnhealthy(format!(
        "Cannot connect to producer at this stage. Caused by unreachable server: {}",
        reason
    ))
}

pub(crate) fn ping_failed(reason: &str) -> ClientError {
    ClientError::RequestFailed(format!("Failed to connect to Kafka broker: {}", reason))
}

pub(crate) fn scan_failed(error: &anyhow::Error) -> ClientError {
    ClientError::RequestFailed(format!("Lookup scan aborted by consumer error: {:#}", error))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ConfigOverrides;
    use serde_json::json;

    #[test]
    fn test_mode_parsing() {
        assert_eq!("produce".parse::<BrokerMode>().unwrap(), BrokerMode::Produce);
        assert_eq!("consume".parse::<BrokerMode>().unwrap(), BrokerMode::Consume);

        let err = "stream".parse::<BrokerMode>().unwrap_err();
        assert_eq!(err.error_type(), "InvalidMode");
        assert!(err.info().contains("'stream'"));
    }

    #[test]
    fn test_configured_topics_shapes() {
        struct TestCase {
            topics: Value,
            expected: Vec<&'static str>,
        }

        let test_cases = vec![
            TestCase {
                topics: json!("orders"),
                expected: vec!["orders"],
            },
            TestCase {
                topics: json!(["orders", "", "payments"]),
                expected: vec!["orders", "payments"],
            },
            TestCase {
                topics: json!(42),
                expected: vec![],
            },
        ];

        for test_case in test_cases {
            let config =
                Configuration::from_overrides(ConfigOverrides::new().set("topics", test_case.topics));
            assert_eq!(configured_topics(&config), test_case.expected);
        }
    }

    #[test]
    fn test_decode_headers_is_lossy() {
        let headers = vec![
            ("trace-id".to_string(), b"abc".to_vec()),
            ("raw".to_string(), vec![0xff, b'x']),
        ];

        let decoded = decode_headers(&headers);
        assert_eq!(decoded[0], ("trace-id".to_string(), "abc".to_string()));
        assert_eq!(decoded[1].1, "\u{fffd}x");

        assert!(header_matches(&headers, "trace-id", "abc"));
        assert!(!header_matches(&headers, "trace-id", "abd"));
        assert!(!header_matches(&headers, "other", "abc"));
    }
}
