// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::Instant;

use crate::backends::broker::driver::{
    AsyncBrokerConnector, AsyncConsumerDriver, AsyncProducerDriver, ConsumerEvent,
};
use crate::backends::broker::{
    broker_host, configured_topics, header_matches, mode_not_set, ping_failed,
    producer_unhealthy, scan_failed, wrong_mode, BrokerDriver, BrokerMode, FoundMessage, BACKEND,
};
use crate::config::consts::{DEFAULT_PROBE_TIMEOUT, FRAMEWORK_KEYS};
use crate::config::{merge_options, BoundConfig, ConfigOverrides, Configuration};
use crate::errors::ClientError;
use crate::health::broker::{log_delivery_reports, metadata_probe_async, producer_probe_async};
use crate::health::ProbeOutcome;
use crate::lifecycle::{connection_failed, ClientHandle, ConnectionState};
use crate::observability::messages::broker::{MessageMatched, ScanDeadlineExpired};
use crate::observability::messages::lifecycle::{Disconnected, ShutdownFailed};
use crate::observability::messages::StructuredLog;
use crate::observability::LogFailure;
use crate::traits::{AsyncClient, ConfigScope};

type Driver<C> =
    BrokerDriver<<C as AsyncBrokerConnector>::Producer, <C as AsyncBrokerConnector>::Consumer>;

/// Async message-broker wrapper; every driver call is a suspension point.
pub struct AsyncBrokerClient<C: AsyncBrokerConnector> {
    handle: ClientHandle<Driver<C>>,
    connector: C,
    topics: Vec<String>,
    mode: Option<BrokerMode>,
}

impl<C: AsyncBrokerConnector> ConfigScope for AsyncBrokerClient<C> {
    const CONFIG_SCOPE: &'static str = module_path!();
}

impl<C: AsyncBrokerConnector> AsyncBrokerClient<C> {
    pub fn new(connector: C, bound: Option<&BoundConfig>, overrides: ConfigOverrides) -> Self {
        let config = merge_options(bound, overrides);
        Self {
            topics: configured_topics(&config),
            handle: ClientHandle::new(BACKEND, config),
            connector,
            mode: None,
        }
    }

    pub fn topics(&self) -> &[String] {
        &self.topics
    }

    pub fn mode(&self) -> Option<BrokerMode> {
        self.mode
    }

    pub fn allocate(&mut self, mode: &str) -> Result<(), ClientError> {
        self.mode = Some(mode.parse()?);
        Ok(())
    }

    pub fn set_mode(&mut self, mode: BrokerMode) {
        self.mode = Some(mode);
    }

    pub fn producer(&self) -> Result<&C::Producer, ClientError> {
        match self.handle.driver()? {
            BrokerDriver::Producer(producer) => Ok(producer),
            BrokerDriver::Consumer(_) => Err(wrong_mode("producer()", BrokerMode::Produce)),
        }
    }

    pub fn consumer(&self) -> Result<&C::Consumer, ClientError> {
        match self.handle.driver()? {
            BrokerDriver::Consumer(consumer) => Ok(consumer),
            BrokerDriver::Producer(_) => Err(wrong_mode("consumer()", BrokerMode::Consume)),
        }
    }

    /// Rebuild the driver for the allocated mode without probing it.
    pub async fn reconnect(&mut self) -> Result<(), ClientError> {
        let mode = self.mode.ok_or_else(mode_not_set)?;
        self.disconnect().await;

        let host = self.host();
        let connector = &self.connector;
        let topics = &self.topics;
        self.handle
            .connect_with_async(host.as_deref(), |config| async move {
                build_driver(connector, topics, &config, mode, false).await
            })
            .await
    }

    pub async fn ping(&self) -> Result<(), ClientError> {
        let outcome = match self.handle.driver()? {
            BrokerDriver::Producer(producer) => {
                metadata_probe_async(producer, DEFAULT_PROBE_TIMEOUT).await
            }
            BrokerDriver::Consumer(consumer) => {
                metadata_probe_async(consumer, DEFAULT_PROBE_TIMEOUT).await
            }
        };
        match outcome {
            ProbeOutcome::Healthy => Ok(()),
            ProbeOutcome::Unhealthy(reason) => Err(ping_failed(&reason)),
        }
    }

    pub async fn health(&self) -> Result<(), ClientError> {
        let outcome = match self.handle.driver()? {
            BrokerDriver::Producer(producer) => {
                producer_probe_async(producer, DEFAULT_PROBE_TIMEOUT).await
            }
            BrokerDriver::Consumer(consumer) => {
                metadata_probe_async(consumer, DEFAULT_PROBE_TIMEOUT).await
            }
        };
        outcome.into_result(BACKEND)
    }

    /// Async form of [`crate::backends::broker::BrokerClient::find`].
    pub async fn find(
        &mut self,
        key: &str,
        value: &str,
        timeout: Duration,
        poll_interval: Duration,
    ) -> Result<Option<FoundMessage>, ClientError> {
        match self.handle.driver()? {
            BrokerDriver::Consumer(_) => {}
            BrokerDriver::Producer(_) => return Err(wrong_mode("find()", BrokerMode::Consume)),
        }

        let consumer = match self.handle.release() {
            Some(BrokerDriver::Consumer(consumer)) => ReleasedConsumer::new(consumer),
            _ => return Err(ClientError::not_connected(BACKEND)),
        };

        let result = scan(
            consumer.driver(),
            &self.topics,
            key,
            value,
            timeout,
            poll_interval,
        )
        .await;
        consumer.close().await;

        result
    }
}

/// A consumer taken out of the handle by `find`.
///
/// Closed once the scan returns. If the scan unwinds or its future is
/// dropped first, the close is spawned on the current runtime instead.
struct ReleasedConsumer<D: AsyncConsumerDriver + 'static> {
    consumer: Arc<D>,
    closed: bool,
}

impl<D: AsyncConsumerDriver + 'static> ReleasedConsumer<D> {
    fn new(consumer: D) -> Self {
        Self {
            consumer: Arc::new(consumer),
            closed: false,
        }
    }

    fn driver(&self) -> &D {
        &self.consumer
    }

    async fn close(mut self) {
        self.closed = true;
        close_consumer(self.consumer.as_ref()).await;
        Disconnected { backend: BACKEND }.log();
    }
}

impl<D: AsyncConsumerDriver + 'static> Drop for ReleasedConsumer<D> {
    fn drop(&mut self) {
        if self.closed {
            return;
        }
        let consumer = Arc::clone(&self.consumer);
        if let Ok(runtime) = tokio::runtime::Handle::try_current() {
            runtime.spawn(async move {
                close_consumer(consumer.as_ref()).await;
                Disconnected { backend: BACKEND }.log();
            });
        }
    }
}

async fn close_consumer<D: AsyncConsumerDriver>(consumer: &D) {
    if let Err(error) = consumer.close().await {
        ShutdownFailed {
            backend: BACKEND,
            error: &error,
        }
        .log();
    }
}

#[async_trait]
impl<C: AsyncBrokerConnector> AsyncClient for AsyncBrokerClient<C> {
    type Driver = Driver<C>;

    async fn connect(&mut self) -> Result<(), ClientError> {
        let mode = self.mode.ok_or_else(mode_not_set).log_failure()?;
        if self.handle.is_connected() {
            return Ok(());
        }

        let host = self.host();
        let connector = &self.connector;
        let topics = &self.topics;
        self.handle
            .connect_with_async(host.as_deref(), |config| async move {
                build_driver(connector, topics, &config, mode, true).await
            })
            .await
            .log_failure()
    }

    async fn disconnect(&mut self) {
        self.handle
            .disconnect_with_async(|driver| async move {
                match driver {
                    BrokerDriver::Producer(producer) => {
                        let flushed = producer.flush(DEFAULT_PROBE_TIMEOUT).await;
                        log_delivery_reports(&producer.poll(Duration::ZERO).await);
                        flushed
                    }
                    BrokerDriver::Consumer(consumer) => consumer.close().await,
                }
            })
            .await;
    }

    async fn status(&self) -> bool {
        self.handle
            .status_with_async("metadata", |driver| async move {
                match driver {
                    BrokerDriver::Producer(producer) => {
                        metadata_probe_async(producer, DEFAULT_PROBE_TIMEOUT).await
                    }
                    BrokerDriver::Consumer(consumer) => {
                        metadata_probe_async(consumer, DEFAULT_PROBE_TIMEOUT).await
                    }
                }
            })
            .await
    }

    fn host(&self) -> Option<String> {
        broker_host(self.handle.configuration())
    }

    fn client(&self) -> Result<&Self::Driver, ClientError> {
        self.handle.driver().log_failure()
    }

    fn state(&self) -> ConnectionState {
        self.handle.state()
    }

    fn configuration(&self) -> &Configuration {
        self.handle.configuration()
    }
}

async fn build_driver<C: AsyncBrokerConnector>(
    connector: &C,
    topics: &[String],
    config: &Configuration,
    mode: BrokerMode,
    verify: bool,
) -> Result<Driver<C>, ClientError> {
    let native = config.without(FRAMEWORK_KEYS);
    match mode {
        BrokerMode::Produce => {
            let producer = connector
                .producer(&native)
                .await
                .map_err(connection_failed(BACKEND))?;
            if !verify {
                return Ok(BrokerDriver::Producer(producer));
            }
            match producer_probe_async(&producer, DEFAULT_PROBE_TIMEOUT).await {
                ProbeOutcome::Healthy => Ok(BrokerDriver::Producer(producer)),
                ProbeOutcome::Unhealthy(reason) => Err(producer_unhealthy(&reason)),
            }
        }
        BrokerMode::Consume => {
            let consumer = connector
                .consumer(&native)
                .await
                .map_err(connection_failed(BACKEND))?;
            match verify_consumer(&consumer, topics, verify).await {
                Ok(()) => Ok(BrokerDriver::Consumer(consumer)),
                Err(error) => {
                    close_consumer(&consumer).await;
                    Err(error)
                }
            }
        }
    }
}

async fn verify_consumer<D: AsyncConsumerDriver>(
    consumer: &D,
    topics: &[String],
    verify: bool,
) -> Result<(), ClientError> {
    consumer
        .subscribe(topics)
        .await
        .map_err(connection_failed(BACKEND))?;
    if !verify {
        return Ok(());
    }
    match metadata_probe_async(consumer, DEFAULT_PROBE_TIMEOUT).await {
        ProbeOutcome::Healthy => Ok(()),
        ProbeOutcome::Unhealthy(reason) => Err(ClientError::connection_failed(BACKEND, reason)),
    }
}

async fn scan<D: AsyncConsumerDriver>(
    consumer: &D,
    topics: &[String],
    key: &str,
    value: &str,
    timeout: Duration,
    poll_interval: Duration,
) -> Result<Option<FoundMessage>, ClientError> {
    // A timeout past the clock's range never expires.
    let deadline = Instant::now().checked_add(timeout);

    loop {
        let wait = match deadline {
            Some(deadline) => {
                let now = Instant::now();
                if now >= deadline {
                    ScanDeadlineExpired { topics, timeout }.log();
                    return Ok(None);
                }
                poll_interval.min(deadline - now)
            }
            None => poll_interval,
        };
        let event = match tokio::time::timeout(wait, consumer.poll(wait)).await {
            Ok(event) => event,
            Err(_) => None,
        };

        match event {
            None | Some(ConsumerEvent::PartitionEof { .. }) => continue,
            Some(ConsumerEvent::Error(error)) => return Err(scan_failed(&error)),
            Some(ConsumerEvent::Message(message)) => {
                if header_matches(&message.headers, key, value) {
                    MessageMatched {
                        topic: &message.topic,
                        key,
                    }
                    .log();
                    return Ok(Some(FoundMessage {
                        topic: message.topic,
                        key: message.key,
                        value: message.payload,
                        headers: message.headers,
                    }));
                }
            }
        }
    }
}
