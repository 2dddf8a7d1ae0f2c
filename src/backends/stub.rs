// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! In-memory drivers and connectors for tests.
//!
//! Every stub is cheap to clone and clones share state, so a test keeps one
//! copy to inspect while the wrapper under test owns another.

use std::collections::VecDeque;
use std::io::{Read, Write};
use std::net::{SocketAddr, TcpListener};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use anyhow::anyhow;
use async_trait::async_trait;

use crate::backends::broker::driver::{
    AsyncBrokerConnector, AsyncConsumerDriver, AsyncMetadataSource, AsyncProducerDriver,
    BrokerConnector, BrokerInfo, BrokerMetadata, ConsumedMessage, ConsumerDriver, ConsumerEvent,
    DeliveryReport, MetadataSource, ProducerDriver,
};
use crate::backends::cache::{AsyncCacheDriver, CacheDriver};
use crate::backends::graph::driver::{
    AsyncGraphDriver, AsyncGraphSession, AsyncGraphTransaction, AsyncRecordCursor, GraphDriver,
    GraphSession, GraphTransaction, Params, Record,
};
use crate::backends::search::{AsyncSearchDriver, SearchDriver};
use crate::config::consts::HEALTH_TOPIC;
use crate::config::Configuration;
use crate::traits::{AsyncConnector, Connector};

// ---------------------------------------------------------------------------
// Connectors
// ---------------------------------------------------------------------------

/// A driver a [`StubConnector`] can hand out.
pub trait StubTemplate: Clone + Send + Sync {
    fn instantiate(&self, _config: &Configuration) -> Self {
        self.clone()
    }
}

/// Counts builds and hands out clones of one template driver.
#[derive(Clone)]
pub struct StubConnector<D> {
    template: Option<D>,
    failure: Option<&'static str>,
    connects: Arc<AtomicUsize>,
    last_config: Arc<Mutex<Option<Configuration>>>,
}

impl<D: StubTemplate> StubConnector<D> {
    pub fn new(template: D) -> Self {
        Self {
            template: Some(template),
            failure: None,
            connects: Arc::new(AtomicUsize::new(0)),
            last_config: Arc::new(Mutex::new(None)),
        }
    }

    pub fn failing(message: &'static str) -> Self {
        Self {
            template: None,
            failure: Some(message),
            connects: Arc::new(AtomicUsize::new(0)),
            last_config: Arc::new(Mutex::new(None)),
        }
    }

    pub fn connects(&self) -> usize {
        self.connects.load(Ordering::SeqCst)
    }

    pub fn last_config(&self) -> Option<Configuration> {
        self.last_config.lock().unwrap().clone()
    }

    fn build(&self, config: &Configuration) -> anyhow::Result<D> {
        self.connects.fetch_add(1, Ordering::SeqCst);
        *self.last_config.lock().unwrap() = Some(config.clone());
        match (&self.template, self.failure) {
            (_, Some(message)) => Err(anyhow!("{}", message)),
            (Some(template), None) => Ok(template.instantiate(config)),
            (None, None) => Err(anyhow!("no driver template")),
        }
    }
}

impl<D: StubTemplate> Connector for StubConnector<D> {
    type Driver = D;

    fn connect(&self, config: &Configuration) -> anyhow::Result<D> {
        self.build(config)
    }
}

#[async_trait]
impl<D: StubTemplate> AsyncConnector for StubConnector<D> {
    type Driver = D;

    async fn connect(&self, config: &Configuration) -> anyhow::Result<D> {
        self.build(config)
    }
}

// ---------------------------------------------------------------------------
// Graph
// ---------------------------------------------------------------------------

/// Everything a stub graph store observed.
#[derive(Debug, Clone, Default)]
pub struct GraphStoreLog {
    pub ran: Vec<(String, Params)>,
    pub committed: Vec<String>,
    pub rolled_back: usize,
    pub sessions_opened: usize,
    pub sessions_closed: usize,
    pub connectivity_checks: usize,
    pub closed: bool,
}

/// Where a stub graph query fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StubGraphFault {
    Session(&'static str),
    Begin(&'static str),
    Run(&'static str),
    /// The cursor yields the rows, then an error.
    Collect(&'static str),
    Commit(&'static str),
    CommitAndRollback(&'static str),
}

#[derive(Debug, Clone)]
pub struct StubGraphDriver {
    rows: Vec<Record>,
    fault: Option<StubGraphFault>,
    reachable: Arc<AtomicBool>,
    log: Arc<Mutex<GraphStoreLog>>,
}

impl StubGraphDriver {
    /// A reachable store whose every query returns `rows`.
    pub fn with_rows(rows: Vec<Record>) -> Self {
        Self {
            rows,
            fault: None,
            reachable: Arc::new(AtomicBool::new(true)),
            log: Arc::new(Mutex::new(GraphStoreLog::default())),
        }
    }

    pub fn with_fault(mut self, fault: StubGraphFault) -> Self {
        self.fault = Some(fault);
        self
    }

    pub fn set_reachable(&self, reachable: bool) {
        self.reachable.store(reachable, Ordering::SeqCst);
    }

    pub fn store(&self) -> GraphStoreLog {
        self.log.lock().unwrap().clone()
    }

    fn check_connectivity(&self) -> anyhow::Result<()> {
        self.log.lock().unwrap().connectivity_checks += 1;
        if self.reachable.load(Ordering::SeqCst) {
            Ok(())
        } else {
            Err(anyhow!("Unable to retrieve routing information"))
        }
    }

    fn open_session(&self) -> anyhow::Result<StubGraphSession> {
        if let Some(StubGraphFault::Session(message)) = self.fault {
            return Err(anyhow!("{}", message));
        }
        self.log.lock().unwrap().sessions_opened += 1;
        Ok(StubGraphSession {
            driver: self.clone(),
        })
    }

    fn mark_closed(&self) {
        self.log.lock().unwrap().closed = true;
    }
}

impl StubTemplate for StubGraphDriver {}

impl GraphDriver for StubGraphDriver {
    type Session = StubGraphSession;

    fn verify_connectivity(&self) -> anyhow::Result<()> {
        self.check_connectivity()
    }

    fn session(&self) -> anyhow::Result<StubGraphSession> {
        self.open_session()
    }

    fn close(self) -> anyhow::Result<()> {
        self.mark_closed();
        Ok(())
    }
}

pub struct StubGraphSession {
    driver: StubGraphDriver,
}

impl StubGraphSession {
    fn begin_transaction(&mut self) -> anyhow::Result<StubGraphTransaction> {
        if let Some(StubGraphFault::Begin(message)) = self.driver.fault {
            return Err(anyhow!("{}", message));
        }
        Ok(StubGraphTransaction {
            driver: self.driver.clone(),
            query: None,
        })
    }

    fn end(&self) {
        self.driver.log.lock().unwrap().sessions_closed += 1;
    }
}

impl GraphSession for StubGraphSession {
    type Transaction = StubGraphTransaction;

    fn begin(&mut self) -> anyhow::Result<StubGraphTransaction> {
        self.begin_transaction()
    }

    fn close(self) -> anyhow::Result<()> {
        self.end();
        Ok(())
    }
}

pub struct StubGraphTransaction {
    driver: StubGraphDriver,
    query: Option<String>,
}

impl StubGraphTransaction {
    fn rows(&mut self, query: &str, params: &Params) -> anyhow::Result<Vec<anyhow::Result<Record>>> {
        self.driver
            .log
            .lock()
            .unwrap()
            .ran
            .push((query.to_string(), params.clone()));
        self.query = Some(query.to_string());

        let mut rows: Vec<anyhow::Result<Record>> =
            self.driver.rows.iter().cloned().map(Ok).collect();
        match self.driver.fault {
            Some(StubGraphFault::Run(message)) => return Err(anyhow!("{}", message)),
            Some(StubGraphFault::Collect(message)) => rows.push(Err(anyhow!("{}", message))),
            _ => {}
        }
        Ok(rows)
    }

    fn finish(&mut self) -> anyhow::Result<()> {
        match self.driver.fault {
            Some(StubGraphFault::Commit(message))
            | Some(StubGraphFault::CommitAndRollback(message)) => Err(anyhow!("{}", message)),
            _ => {
                let query = self.query.clone().unwrap_or_default();
                self.driver.log.lock().unwrap().committed.push(query);
                Ok(())
            }
        }
    }

    fn undo(&mut self) -> anyhow::Result<()> {
        self.driver.log.lock().unwrap().rolled_back += 1;
        match self.driver.fault {
            Some(StubGraphFault::CommitAndRollback(_)) => Err(anyhow!("rollback on a closed connection")),
            _ => Ok(()),
        }
    }
}

impl GraphTransaction for StubGraphTransaction {
    type Cursor = std::vec::IntoIter<anyhow::Result<Record>>;

    fn run(&mut self, query: &str, params: &Params) -> anyhow::Result<Self::Cursor> {
        Ok(self.rows(query, params)?.into_iter())
    }

    fn commit(&mut self) -> anyhow::Result<()> {
        self.finish()
    }

    fn rollback(&mut self) -> anyhow::Result<()> {
        self.undo()
    }
}

/// The async face of [`StubGraphDriver`], sharing its store.
#[derive(Debug, Clone)]
pub struct StubAsyncGraphDriver(StubGraphDriver);

impl StubAsyncGraphDriver {
    pub fn with_rows(rows: Vec<Record>) -> Self {
        Self(StubGraphDriver::with_rows(rows))
    }

    pub fn with_fault(self, fault: StubGraphFault) -> Self {
        Self(self.0.with_fault(fault))
    }

    pub fn set_reachable(&self, reachable: bool) {
        self.0.set_reachable(reachable);
    }

    pub fn store(&self) -> GraphStoreLog {
        self.0.store()
    }
}

impl StubTemplate for StubAsyncGraphDriver {}

#[async_trait]
impl AsyncGraphDriver for StubAsyncGraphDriver {
    type Session = StubAsyncGraphSession;

    async fn verify_connectivity(&self) -> anyhow::Result<()> {
        self.0.check_connectivity()
    }

    async fn session(&self) -> anyhow::Result<StubAsyncGraphSession> {
        self.0.open_session().map(StubAsyncGraphSession)
    }

    async fn close(self) -> anyhow::Result<()> {
        self.0.mark_closed();
        Ok(())
    }
}

pub struct StubAsyncGraphSession(StubGraphSession);

#[async_trait]
impl AsyncGraphSession for StubAsyncGraphSession {
    type Transaction = StubAsyncGraphTransaction;

    async fn begin(&mut self) -> anyhow::Result<StubAsyncGraphTransaction> {
        self.0.begin_transaction().map(StubAsyncGraphTransaction)
    }

    async fn close(self) -> anyhow::Result<()> {
        self.0.end();
        Ok(())
    }
}

pub struct StubAsyncGraphTransaction(StubGraphTransaction);

#[async_trait]
impl AsyncGraphTransaction for StubAsyncGraphTransaction {
    type Cursor = StubAsyncCursor;

    async fn run(&mut self, query: &str, params: &Params) -> anyhow::Result<StubAsyncCursor> {
        Ok(StubAsyncCursor(self.0.rows(query, params)?.into()))
    }

    async fn commit(&mut self) -> anyhow::Result<()> {
        self.0.finish()
    }

    async fn rollback(&mut self) -> anyhow::Result<()> {
        self.0.undo()
    }
}

pub struct StubAsyncCursor(VecDeque<anyhow::Result<Record>>);

#[async_trait]
impl AsyncRecordCursor for StubAsyncCursor {
    async fn next_record(&mut self) -> Option<anyhow::Result<Record>> {
        tokio::task::yield_now().await;
        self.0.pop_front()
    }
}

// ---------------------------------------------------------------------------
// Search, object store, cache
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct StubSearchDriver {
    alive: Arc<AtomicBool>,
    error: Option<&'static str>,
    closed: Arc<AtomicBool>,
}

impl StubSearchDriver {
    pub fn alive() -> Self {
        Self {
            alive: Arc::new(AtomicBool::new(true)),
            error: None,
            closed: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Answers pings with `false`.
    pub fn dead() -> Self {
        let driver = Self::alive();
        driver.set_alive(false);
        driver
    }

    /// Pings fail with `message`.
    pub fn failing(message: &'static str) -> Self {
        Self {
            error: Some(message),
            ..Self::alive()
        }
    }

    pub fn set_alive(&self, alive: bool) {
        self.alive.store(alive, Ordering::SeqCst);
    }

    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::SeqCst)
    }

    fn answer(&self) -> anyhow::Result<bool> {
        match self.error {
            Some(message) => Err(anyhow!("{}", message)),
            None => Ok(self.alive.load(Ordering::SeqCst)),
        }
    }

    fn shut(&self) -> anyhow::Result<()> {
        self.closed.store(true, Ordering::SeqCst);
        Ok(())
    }
}

impl StubTemplate for StubSearchDriver {}

impl SearchDriver for StubSearchDriver {
    fn ping(&self) -> anyhow::Result<bool> {
        self.answer()
    }

    fn close(self) -> anyhow::Result<()> {
        self.shut()
    }
}

#[async_trait]
impl AsyncSearchDriver for StubSearchDriver {
    async fn ping(&self) -> anyhow::Result<bool> {
        self.answer()
    }

    async fn close(self) -> anyhow::Result<()> {
        self.shut()
    }
}

/// An object-store client that records the region it was built for.
#[derive(Debug, Clone, Default)]
pub struct StubBucketClient {
    pub region: Option<String>,
}

impl StubTemplate for StubBucketClient {
    fn instantiate(&self, config: &Configuration) -> Self {
        Self {
            region: config.get_str("region_name").map(str::to_string),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct StubCachePool {
    closed: Arc<AtomicBool>,
    close_error: Option<&'static str>,
}

impl StubCachePool {
    pub fn failing_close(message: &'static str) -> Self {
        Self {
            close_error: Some(message),
            ..Self::default()
        }
    }

    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::SeqCst)
    }

    fn shut(&self) -> anyhow::Result<()> {
        match self.close_error {
            Some(message) => Err(anyhow!("{}", message)),
            None => {
                self.closed.store(true, Ordering::SeqCst);
                Ok(())
            }
        }
    }
}

impl StubTemplate for StubCachePool {}

impl CacheDriver for StubCachePool {
    fn close(self) -> anyhow::Result<()> {
        self.shut()
    }
}

#[async_trait]
impl AsyncCacheDriver for StubCachePool {
    async fn close(self) -> anyhow::Result<()> {
        self.shut()
    }
}

// ---------------------------------------------------------------------------
// Broker
// ---------------------------------------------------------------------------

fn cluster_metadata(brokers: bool) -> BrokerMetadata {
    if !brokers {
        return BrokerMetadata::default();
    }
    BrokerMetadata {
        brokers: vec![BrokerInfo {
            id: 1,
            host: "broker-1.internal".to_string(),
            port: 9092,
        }],
        topics: vec![HEALTH_TOPIC.to_string()],
    }
}

#[derive(Debug, Default)]
struct ProducerState {
    produced: Vec<(String, Vec<u8>, Vec<u8>)>,
    pending: Vec<DeliveryReport>,
    flushes: usize,
}

#[derive(Debug, Clone)]
pub struct StubProducer {
    brokers: bool,
    produce_error: Option<&'static str>,
    flush_error: Option<&'static str>,
    state: Arc<Mutex<ProducerState>>,
}

impl StubProducer {
    pub fn healthy() -> Self {
        Self {
            brokers: true,
            produce_error: None,
            flush_error: None,
            state: Arc::new(Mutex::new(ProducerState::default())),
        }
    }

    pub fn flush_fails(message: &'static str) -> Self {
        Self {
            flush_error: Some(message),
            ..Self::healthy()
        }
    }

    pub fn produce_fails(message: &'static str) -> Self {
        Self {
            produce_error: Some(message),
            ..Self::healthy()
        }
    }

    pub fn without_brokers() -> Self {
        Self {
            brokers: false,
            ..Self::healthy()
        }
    }

    /// `(topic, key, payload)` of every accepted message.
    pub fn produced(&self) -> Vec<(String, Vec<u8>, Vec<u8>)> {
        self.state.lock().unwrap().produced.clone()
    }

    pub fn flushes(&self) -> usize {
        self.state.lock().unwrap().flushes
    }

    fn accept(&self, topic: &str, key: &[u8], payload: &[u8]) -> anyhow::Result<()> {
        if let Some(message) = self.produce_error {
            return Err(anyhow!("{}", message));
        }
        let mut state = self.state.lock().unwrap();
        let offset = state.produced.len() as i64;
        state
            .produced
            .push((topic.to_string(), key.to_vec(), payload.to_vec()));
        state.pending.push(DeliveryReport {
            topic: topic.to_string(),
            partition: Some(0),
            offset: Some(offset),
            error: None,
        });
        Ok(())
    }

    fn reports(&self) -> Vec<DeliveryReport> {
        std::mem::take(&mut self.state.lock().unwrap().pending)
    }

    fn drain(&self) -> anyhow::Result<()> {
        self.state.lock().unwrap().flushes += 1;
        match self.flush_error {
            Some(message) => Err(anyhow!("{}", message)),
            None => Ok(()),
        }
    }
}

impl MetadataSource for StubProducer {
    fn fetch_metadata(&self, _timeout: Duration) -> anyhow::Result<BrokerMetadata> {
        Ok(cluster_metadata(self.brokers))
    }
}

impl ProducerDriver for StubProducer {
    fn produce(&self, topic: &str, key: &[u8], payload: &[u8]) -> anyhow::Result<()> {
        self.accept(topic, key, payload)
    }

    fn poll(&self, _timeout: Duration) -> Vec<DeliveryReport> {
        self.reports()
    }

    fn flush(&self, _timeout: Duration) -> anyhow::Result<()> {
        self.drain()
    }
}

/// The async face of [`StubProducer`]; optionally its flush never returns on its own.
#[derive(Debug, Clone)]
pub struct StubAsyncProducer {
    inner: StubProducer,
    stall_flush: bool,
}

impl StubAsyncProducer {
    pub fn healthy() -> Self {
        Self::from(StubProducer::healthy())
    }

    pub fn stalled_flush() -> Self {
        Self {
            stall_flush: true,
            ..Self::healthy()
        }
    }

    pub fn produced(&self) -> Vec<(String, Vec<u8>, Vec<u8>)> {
        self.inner.produced()
    }
}

impl From<StubProducer> for StubAsyncProducer {
    fn from(inner: StubProducer) -> Self {
        Self {
            inner,
            stall_flush: false,
        }
    }
}

#[async_trait]
impl AsyncMetadataSource for StubAsyncProducer {
    async fn fetch_metadata(&self, _timeout: Duration) -> anyhow::Result<BrokerMetadata> {
        Ok(cluster_metadata(self.inner.brokers))
    }
}

#[async_trait]
impl AsyncProducerDriver for StubAsyncProducer {
    async fn produce(&self, topic: &str, key: &[u8], payload: &[u8]) -> anyhow::Result<()> {
        self.inner.accept(topic, key, payload)
    }

    async fn poll(&self, _timeout: Duration) -> Vec<DeliveryReport> {
        self.inner.reports()
    }

    async fn flush(&self, _timeout: Duration) -> anyhow::Result<()> {
        if self.stall_flush {
            tokio::time::sleep(Duration::from_secs(3600)).await;
        }
        self.inner.drain()
    }
}

/// One scripted consumer poll result.
#[derive(Debug, Clone)]
pub enum Scripted {
    Message(ConsumedMessage),
    Eof(&'static str),
    Error(&'static str),
}

#[derive(Debug, Default)]
struct ConsumerState {
    script: VecDeque<Scripted>,
    subscribed: Vec<String>,
    polls: usize,
    closed: bool,
}

#[derive(Debug, Clone)]
pub struct StubConsumer {
    brokers: bool,
    state: Arc<Mutex<ConsumerState>>,
}

impl StubConsumer {
    pub fn new(script: Vec<Scripted>) -> Self {
        Self {
            brokers: true,
            state: Arc::new(Mutex::new(ConsumerState {
                script: script.into(),
                ..ConsumerState::default()
            })),
        }
    }

    pub fn without_brokers() -> Self {
        Self {
            brokers: false,
            ..Self::new(Vec::new())
        }
    }

    pub fn subscribed(&self) -> Vec<String> {
        self.state.lock().unwrap().subscribed.clone()
    }

    pub fn polls(&self) -> usize {
        self.state.lock().unwrap().polls
    }

    pub fn is_closed(&self) -> bool {
        self.state.lock().unwrap().closed
    }

    fn record_subscription(&self, topics: &[String]) {
        self.state.lock().unwrap().subscribed = topics.to_vec();
    }

    /// The next scripted event, or `None` once the script is exhausted.
    fn next_event(&self) -> Option<ConsumerEvent> {
        let mut state = self.state.lock().unwrap();
        state.polls += 1;
        state.script.pop_front().map(|scripted| match scripted {
            Scripted::Message(message) => ConsumerEvent::Message(message),
            Scripted::Eof(topic) => ConsumerEvent::PartitionEof {
                topic: topic.to_string(),
                partition: 0,
            },
            Scripted::Error(message) => ConsumerEvent::Error(anyhow!("{}", message)),
        })
    }

    fn mark_closed(&self) {
        self.state.lock().unwrap().closed = true;
    }
}

/// A consumed message on `topic` carrying one header.
pub fn message_with_header(topic: &str, header: &str, value: &str, payload: &str) -> Scripted {
    Scripted::Message(ConsumedMessage {
        topic: topic.to_string(),
        partition: 0,
        offset: 0,
        key: Some(b"key".to_vec()),
        payload: Some(payload.as_bytes().to_vec()),
        headers: vec![(header.to_string(), value.as_bytes().to_vec())],
    })
}

impl MetadataSource for StubConsumer {
    fn fetch_metadata(&self, _timeout: Duration) -> anyhow::Result<BrokerMetadata> {
        Ok(cluster_metadata(self.brokers))
    }
}

impl ConsumerDriver for StubConsumer {
    fn subscribe(&self, topics: &[String]) -> anyhow::Result<()> {
        self.record_subscription(topics);
        Ok(())
    }

    fn poll(&self, timeout: Duration) -> Option<ConsumerEvent> {
        let event = self.next_event();
        if event.is_none() {
            thread::sleep(timeout);
        }
        event
    }

    fn close(&self) -> anyhow::Result<()> {
        self.mark_closed();
        Ok(())
    }
}

/// The async face of [`StubConsumer`], sharing its script.
#[derive(Debug, Clone)]
pub struct StubAsyncConsumer(pub StubConsumer);

#[async_trait]
impl AsyncMetadataSource for StubAsyncConsumer {
    async fn fetch_metadata(&self, _timeout: Duration) -> anyhow::Result<BrokerMetadata> {
        Ok(cluster_metadata(self.0.brokers))
    }
}

#[async_trait]
impl AsyncConsumerDriver for StubAsyncConsumer {
    async fn subscribe(&self, topics: &[String]) -> anyhow::Result<()> {
        self.0.record_subscription(topics);
        Ok(())
    }

    async fn poll(&self, timeout: Duration) -> Option<ConsumerEvent> {
        let event = self.0.next_event();
        if event.is_none() {
            tokio::time::sleep(timeout).await;
        }
        event
    }

    async fn close(&self) -> anyhow::Result<()> {
        self.0.mark_closed();
        Ok(())
    }
}

/// Hands out clones of one producer and one consumer, recording the options it saw.
#[derive(Clone)]
pub struct StubBrokerConnector<P, C> {
    producer: P,
    consumer: C,
    builds: Arc<AtomicUsize>,
    last_config: Arc<Mutex<Option<Configuration>>>,
}

impl<P, C> StubBrokerConnector<P, C> {
    pub fn new(producer: P, consumer: C) -> Self {
        Self {
            producer,
            consumer,
            builds: Arc::new(AtomicUsize::new(0)),
            last_config: Arc::new(Mutex::new(None)),
        }
    }

    pub fn builds(&self) -> usize {
        self.builds.load(Ordering::SeqCst)
    }

    pub fn last_config(&self) -> Option<Configuration> {
        self.last_config.lock().unwrap().clone()
    }

    fn record(&self, config: &Configuration) {
        self.builds.fetch_add(1, Ordering::SeqCst);
        *self.last_config.lock().unwrap() = Some(config.clone());
    }
}

impl BrokerConnector for StubBrokerConnector<StubProducer, StubConsumer> {
    type Producer = StubProducer;
    type Consumer = StubConsumer;

    fn producer(&self, config: &Configuration) -> anyhow::Result<StubProducer> {
        self.record(config);
        Ok(self.producer.clone())
    }

    fn consumer(&self, config: &Configuration) -> anyhow::Result<StubConsumer> {
        self.record(config);
        Ok(self.consumer.clone())
    }
}

#[async_trait]
impl AsyncBrokerConnector for StubBrokerConnector<StubAsyncProducer, StubAsyncConsumer> {
    type Producer = StubAsyncProducer;
    type Consumer = StubAsyncConsumer;

    async fn producer(&self, config: &Configuration) -> anyhow::Result<StubAsyncProducer> {
        self.record(config);
        Ok(self.producer.clone())
    }

    async fn consumer(&self, config: &Configuration) -> anyhow::Result<StubAsyncConsumer> {
        self.record(config);
        Ok(self.consumer.clone())
    }
}

// ---------------------------------------------------------------------------
// HTTP
// ---------------------------------------------------------------------------

/// A server on `127.0.0.1` that answers exactly one request with a canned response.
pub struct OneShotServer {
    addr: SocketAddr,
    handle: JoinHandle<String>,
}

impl OneShotServer {
    pub fn respond(raw_response: &'static str) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        let handle = thread::spawn(move || {
            let (mut stream, _) = listener.accept().unwrap();
            let request = read_request(&mut stream);
            stream.write_all(raw_response.as_bytes()).unwrap();
            stream.flush().unwrap();
            request
        });
        Self { addr, handle }
    }

    pub fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }

    /// The raw request the server received.
    pub fn request(self) -> String {
        self.handle.join().unwrap()
    }

    /// A local port with nothing listening on it.
    pub fn closed_port() -> u16 {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        listener.local_addr().unwrap().port()
    }
}

fn read_request(stream: &mut impl Read) -> String {
    let mut buffer = Vec::new();
    let mut chunk = [0u8; 1024];
    loop {
        let read = stream.read(&mut chunk).unwrap();
        if read == 0 {
            break;
        }
        buffer.extend_from_slice(&chunk[..read]);

        if let Some(end) = buffer.windows(4).position(|window| window == b"\r\n\r\n") {
            let head = String::from_utf8_lossy(&buffer[..end]).to_ascii_lowercase();
            let length = head
                .lines()
                .find_map(|line| line.strip_prefix("content-length:"))
                .and_then(|value| value.trim().parse::<usize>().ok())
                .unwrap_or(0);
            if buffer.len() >= end + 4 + length {
                break;
            }
        }
    }
    String::from_utf8_lossy(&buffer).into_owned()
}
