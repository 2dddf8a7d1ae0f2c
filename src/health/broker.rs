// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Message-broker liveness probes.
//!
//! * producer probe: publish a synthetic message to the reserved health topic,
//!   serve delivery reports, then flush within the timeout
//! * metadata probe: fetch cluster metadata within the timeout and require at
//!   least one broker
//!
//! The metadata probe performs no writes, so it is the probe used by
//! consumers and by `status()` in either mode.

use std::future::Future;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use crate::backends::broker::driver::{
    AsyncMetadataSource, AsyncProducerDriver, BrokerMetadata, DeliveryReport, MetadataSource,
    ProducerDriver,
};
use crate::config::consts::{HEALTH_MESSAGE_KEY, HEALTH_TOPIC};
use crate::health::ProbeOutcome;
use crate::observability::messages::broker::{DeliveryFailed, MessageDelivered};
use crate::observability::messages::StructuredLog;

/// `health-check-<hostname>-<unix seconds>`
pub fn health_message_value() -> String {
    let seconds = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.as_secs())
        .unwrap_or_default();
    format!("health-check-{}-{}", hostname(), seconds)
}

fn hostname() -> String {
    let name = gethostname::gethostname();
    let name = name.to_string_lossy();
    let name = name.trim();
    if name.is_empty() {
        "unknown".to_string()
    } else {
        name.to_string()
    }
}

/// Log each delivery report at its level.
pub fn log_delivery_reports(reports: &[DeliveryReport]) {
    for report in reports {
        match &report.error {
            None => MessageDelivered {
                topic: &report.topic,
                partition: report.partition,
            }
            .log(),
            Some(error) => DeliveryFailed {
                topic: &report.topic,
                error,
            }
            .log(),
        }
    }
}

/// Judge a metadata fetch: healthy when at least one broker is listed.
pub fn judge_metadata(result: anyhow::Result<BrokerMetadata>) -> ProbeOutcome {
    match result {
        Ok(metadata) if metadata.brokers.is_empty() => {
            ProbeOutcome::Unhealthy("No brokers available in metadata".to_string())
        }
        Ok(_) => ProbeOutcome::Healthy,
        Err(error) => ProbeOutcome::Unhealthy(format!("{:#}", error)),
    }
}

pub fn producer_probe<P>(producer: &P, timeout: Duration) -> ProbeOutcome
where
    P: ProducerDriver + ?Sized,
{
    let value = health_message_value();
    if let Err(error) = producer.produce(HEALTH_TOPIC, HEALTH_MESSAGE_KEY.as_bytes(), value.as_bytes()) {
        return ProbeOutcome::Unhealthy(format!("{:#}", error));
    }

    log_delivery_reports(&producer.poll(Duration::ZERO));

    let flushed = producer.flush(timeout);
    log_delivery_reports(&producer.poll(Duration::ZERO));
    ProbeOutcome::from_result(flushed.map_err(|error| format!("{:#}", error)))
}

pub fn metadata_probe<M>(source: &M, timeout: Duration) -> ProbeOutcome
where
    M: MetadataSource + ?Sized,
{
    judge_metadata(source.fetch_metadata(timeout))
}

/// Run `call` under a hard deadline, in case the driver ignores its own timeout.
async fn bounded<T, Fut>(timeout: Duration, call: Fut) -> anyhow::Result<T>
where
    Fut: Future<Output = anyhow::Result<T>>,
{
    match tokio::time::timeout(timeout, call).await {
        Ok(result) => result,
        Err(_) => Err(anyhow::anyhow!("timed out after {:?}", timeout)),
    }
}

pub async fn producer_probe_async<P>(producer: &P, timeout: Duration) -> ProbeOutcome
where
    P: AsyncProducerDriver + ?Sized,
{
    let value = health_message_value();
    let produced = bounded(
        timeout,
        producer.produce(HEALTH_TOPIC, HEALTH_MESSAGE_KEY.as_bytes(), value.as_bytes()),
    )
    .await;
    if let Err(error) = produced {
        return ProbeOutcome::Unhealthy(format!("{:#}", error));
    }

    log_delivery_reports(&producer.poll(Duration::ZERO).await);

    let flushed = bounded(timeout, producer.flush(timeout)).await;
    log_delivery_reports(&producer.poll(Duration::ZERO).await);
    ProbeOutcome::from_result(flushed.map_err(|error| format!("{:#}", error)))
}

pub async fn metadata_probe_async<M>(source: &M, timeout: Duration) -> ProbeOutcome
where
    M: AsyncMetadataSource + ?Sized,
{
    judge_metadata(bounded(timeout, source.fetch_metadata(timeout)).await)
}
