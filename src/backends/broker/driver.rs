// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! The seam between the broker wrappers and a third-party broker library.
//!
//! The traits mirror the small subset of a producer / consumer API the
//! lifecycle needs: produce with delivery reports, flush, subscribe, poll,
//! metadata and close. Every call that can block takes an explicit timeout.

use async_trait::async_trait;
use std::time::Duration;

use crate::config::Configuration;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BrokerInfo {
    pub id: i32,
    pub host: String,
    pub port: u16,
}

/// Cluster metadata as returned by a bounded metadata fetch.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BrokerMetadata {
    pub brokers: Vec<BrokerInfo>,
    pub topics: Vec<String>,
}

/// Outcome of one produced message, as reported by the producer's poll.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeliveryReport {
    pub topic: String,
    pub partition: Option<i32>,
    pub offset: Option<i64>,
    pub error: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConsumedMessage {
    pub topic: String,
    pub partition: i32,
    pub offset: i64,
    pub key: Option<Vec<u8>>,
    pub payload: Option<Vec<u8>>,
    pub headers: Vec<(String, Vec<u8>)>,
}

/// One result of a consumer poll.
#[derive(Debug)]
pub enum ConsumerEvent {
    Message(ConsumedMessage),
    /// The consumer reached the current end of a partition. Not an error.
    PartitionEof { topic: String, partition: i32 },
    Error(anyhow::Error),
}

pub trait MetadataSource {
    fn fetch_metadata(&self, timeout: Duration) -> anyhow::Result<BrokerMetadata>;
}

pub trait ProducerDriver: MetadataSource + Send + Sync {
    /// Enqueue a message; delivery is reported through [`ProducerDriver::poll`].
    fn produce(&self, topic: &str, key: &[u8], payload: &[u8]) -> anyhow::Result<()>;

    /// Serve pending delivery reports, waiting at most `timeout`.
    fn poll(&self, timeout: Duration) -> Vec<DeliveryReport>;

    /// Wait for all enqueued messages to be delivered, at most `timeout`.
    fn flush(&self, timeout: Duration) -> anyhow::Result<()>;
}

pub trait ConsumerDriver: MetadataSource + Send + Sync {
    fn subscribe(&self, topics: &[String]) -> anyhow::Result<()>;

    /// Wait at most `timeout` for the next event; `None` when nothing arrived.
    fn poll(&self, timeout: Duration) -> Option<ConsumerEvent>;

    fn close(&self) -> anyhow::Result<()>;
}

/// Builds producers and consumers from driver-native options.
pub trait BrokerConnector: Send + Sync {
    type Producer: ProducerDriver;
    type Consumer: ConsumerDriver;

    fn producer(&self, config: &Configuration) -> anyhow::Result<Self::Producer>;

    fn consumer(&self, config: &Configuration) -> anyhow::Result<Self::Consumer>;
}

#[async_trait]
pub trait AsyncMetadataSource: Send + Sync {
    async fn fetch_metadata(&self, timeout: Duration) -> anyhow::Result<BrokerMetadata>;
}

#[async_trait]
pub trait AsyncProducerDriver: AsyncMetadataSource + Send + Sync {
    async fn produce(&self, topic: &str, key: &[u8], payload: &[u8]) -> anyhow::Result<()>;

    async fn poll(&self, timeout: Duration) -> Vec<DeliveryReport>;

    async fn flush(&self, timeout: Duration) -> anyhow::Result<()>;
}

#[async_trait]
pub trait AsyncConsumerDriver: AsyncMetadataSource + Send + Sync {
    async fn subscribe(&self, topics: &[String]) -> anyhow::Result<()>;

    async fn poll(&self, timeout: Duration) -> Option<ConsumerEvent>;

    async fn close(&self) -> anyhow::Result<()>;
}

#[async_trait]
pub trait AsyncBrokerConnector: Send + Sync {
    type Producer: AsyncProducerDriver;
    /// Owned by the wrapper; `'static` so a pending close can outlive a cancelled `find`.
    type Consumer: AsyncConsumerDriver + 'static;

    async fn producer(&self, config: &Configuration) -> anyhow::Result<Self::Producer>;

    async fn consumer(&self, config: &Configuration) -> anyhow::Result<Self::Consumer>;
}
