// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use std::time::{Duration, Instant};

use crate::backends::broker::driver::{
    BrokerConnector, ConsumerDriver, ConsumerEvent, ProducerDriver,
};
use crate::backends::broker::{
    broker_host, configured_topics, header_matches, mode_not_set, ping_failed,
    producer_unhealthy, scan_failed, wrong_mode, BrokerDriver, BrokerMode, FoundMessage, BACKEND,
};
use crate::config::consts::{DEFAULT_PROBE_TIMEOUT, FRAMEWORK_KEYS};
use crate::config::{merge_options, BoundConfig, ConfigOverrides, Configuration};
use crate::errors::ClientError;
use crate::health::broker::{log_delivery_reports, metadata_probe, producer_probe};
use crate::health::ProbeOutcome;
use crate::lifecycle::{connection_failed, ClientHandle, ConnectionState};
use crate::observability::messages::broker::{MessageMatched, ScanDeadlineExpired};
use crate::observability::messages::lifecycle::{Disconnected, ShutdownFailed};
use crate::observability::messages::StructuredLog;
use crate::observability::LogFailure;
use crate::traits::{Client, ConfigScope};

type Driver<C> = BrokerDriver<<C as BrokerConnector>::Producer, <C as BrokerConnector>::Consumer>;

/// Blocking message-broker wrapper.
pub struct BrokerClient<C: BrokerConnector> {
    handle: ClientHandle<Driver<C>>,
    connector: C,
    topics: Vec<String>,
    mode: Option<BrokerMode>,
}

impl<C: BrokerConnector> ConfigScope for BrokerClient<C> {
    const CONFIG_SCOPE: &'static str = module_path!();
}

impl<C: BrokerConnector> BrokerClient<C> {
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

    /// Select the mode by name: `produce` or `consume`.
    pub fn allocate(&mut self, mode: &str) -> Result<(), ClientError> {
        self.mode = Some(mode.parse()?);
        Ok(())
    }

    /// Takes effect on the next connect.
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

    /// Rebuild the driver for the allocated mode after `find` or `disconnect` released it.
    ///
    /// No health probe runs; a live driver is shut down and replaced.
    pub fn reconnect(&mut self) -> Result<(), ClientError> {
        let mode = self.mode.ok_or_else(mode_not_set)?;
        self.disconnect();

        let host = self.host();
        let connector = &self.connector;
        let topics = &self.topics;
        self.handle.connect_with(host.as_deref(), |config| {
            build_driver(connector, topics, config, mode, false)
        })
    }

    /// Fetch metadata from the live driver; fails when no broker is listed.
    pub fn ping(&self) -> Result<(), ClientError> {
        let outcome = match self.handle.driver()? {
            BrokerDriver::Producer(producer) => metadata_probe(producer, DEFAULT_PROBE_TIMEOUT),
            BrokerDriver::Consumer(consumer) => metadata_probe(consumer, DEFAULT_PROBE_TIMEOUT),
        };
        match outcome {
            ProbeOutcome::Healthy => Ok(()),
            ProbeOutcome::Unhealthy(reason) => Err(ping_failed(&reason)),
        }
    }

    /// Run the mode's probe on the live driver.
    ///
    /// For a producer this publishes to the reserved health topic.
    pub fn health(&self) -> Result<(), ClientError> {
        probe_driver(self.handle.driver()?).into_result(BACKEND)
    }

    /// Scan the subscribed topics for a message carrying header `key` = `value`.
    ///
    /// Partition end-of-file events are skipped. Returns `Ok(None)` once
    /// `timeout` has elapsed. The consumer is closed and released on every
    /// path, so the wrapper is disconnected afterwards; use
    /// [`BrokerClient::reconnect`] to scan again.
    pub fn find(
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
            Some(BrokerDriver::Consumer(consumer)) => ReleasedConsumer(consumer),
            _ => return Err(ClientError::not_connected(BACKEND)),
        };

        scan(&consumer.0, &self.topics, key, value, timeout, poll_interval)
    }
}

/// A consumer taken out of the handle by `find`; closed when dropped, unwinding included.
struct ReleasedConsumer<D: ConsumerDriver>(D);

impl<D: ConsumerDriver> Drop for ReleasedConsumer<D> {
    fn drop(&mut self) {
        close_consumer(&self.0);
        Disconnected { backend: BACKEND }.log();
    }
}

fn close_consumer<D: ConsumerDriver>(consumer: &D) {
    if let Err(error) = consumer.close() {
        ShutdownFailed {
            backend: BACKEND,
            error: &error,
        }
        .log();
    }
}

impl<C: BrokerConnector> Client for BrokerClient<C> {
    type Driver = Driver<C>;

    /// Producers are verified with a synthetic publish to the health topic;
    /// consumers subscribe and are verified with a metadata fetch only.
    fn connect(&mut self) -> Result<(), ClientError> {
        let mode = self.mode.ok_or_else(mode_not_set).log_failure()?;
        if self.handle.is_connected() {
            return Ok(());
        }

        let host = self.host();
        let connector = &self.connector;
        let topics = &self.topics;
        self.handle
            .connect_with(host.as_deref(), |config| {
                build_driver(connector, topics, config, mode, true)
            })
            .log_failure()
    }

    fn disconnect(&mut self) {
        self.handle.disconnect_with(|driver| match driver {
            BrokerDriver::Producer(producer) => {
                let flushed = producer.flush(DEFAULT_PROBE_TIMEOUT);
                log_delivery_reports(&producer.poll(Duration::ZERO));
                flushed
            }
            BrokerDriver::Consumer(consumer) => consumer.close(),
        });
    }

    /// Read-only in both modes: a bounded metadata fetch.
    fn status(&self) -> bool {
        self.handle.status_with("metadata", |driver| match driver {
            BrokerDriver::Producer(producer) => metadata_probe(producer, DEFAULT_PROBE_TIMEOUT),
            BrokerDriver::Consumer(consumer) => metadata_probe(consumer, DEFAULT_PROBE_TIMEOUT),
        })
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

/// Build a driver for `mode` from driver-native options.
///
/// With `verify`, a producer must pass the publish probe and a consumer the
/// metadata probe; an unverified driver is discarded.
fn build_driver<C: BrokerConnector>(
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
                .map_err(connection_failed(BACKEND))?;
            if !verify {
                return Ok(BrokerDriver::Producer(producer));
            }
            match producer_probe(&producer, DEFAULT_PROBE_TIMEOUT) {
                ProbeOutcome::Healthy => Ok(BrokerDriver::Producer(producer)),
                ProbeOutcome::Unhealthy(reason) => Err(producer_unhealthy(&reason)),
            }
        }
        BrokerMode::Consume => {
            let consumer = connector
                .consumer(&native)
                .map_err(connection_failed(BACKEND))?;
            let verified = subscribe(&consumer, topics).and_then(|_| {
                if !verify {
                    return Ok(());
                }
                match metadata_probe(&consumer, DEFAULT_PROBE_TIMEOUT) {
                    ProbeOutcome::Healthy => Ok(()),
                    ProbeOutcome::Unhealthy(reason) => {
                        Err(ClientError::connection_failed(BACKEND, reason))
                    }
                }
            });
            match verified {
                Ok(()) => Ok(BrokerDriver::Consumer(consumer)),
                Err(error) => {
                    close_consumer(&consumer);
                    Err(error)
                }
            }
        }
    }
}

fn subscribe<D: ConsumerDriver>(consumer: &D, topics: &[String]) -> Result<(), ClientError> {
    consumer
        .subscribe(topics)
        .map_err(connection_failed(BACKEND))
}

fn probe_driver<P: ProducerDriver, D: ConsumerDriver>(driver: &BrokerDriver<P, D>) -> ProbeOutcome {
    match driver {
        BrokerDriver::Producer(producer) => producer_probe(producer, DEFAULT_PROBE_TIMEOUT),
        BrokerDriver::Consumer(consumer) => metadata_probe(consumer, DEFAULT_PROBE_TIMEOUT),
    }
}

fn scan<D: ConsumerDriver>(
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

        match consumer.poll(wait) {
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
