// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! The handle every backend wrapper owns.
//!
//! A [`ClientHandle`] pairs one merged [`Configuration`] with one driver slot.
//! The slot only changes through the connect and disconnect helpers below,
//! which is what keeps the lifecycle rules identical across backends:
//!
//! * connecting while connected is a no-op, the builder is not called
//! * a failing builder leaves the slot as it was, nothing partial is kept
//! * disconnecting runs the driver's shutdown before the handle is dropped
//! * status checks never fail, probe failures degrade to `false`

use std::future::Future;

use crate::config::Configuration;
use crate::errors::ClientError;
use crate::health::ProbeOutcome;
use crate::lifecycle::state::{ConnectionState, DriverSlot};
use crate::observability::messages::health::ProbeFailed;
use crate::observability::messages::lifecycle::{
    ConnectAttempt, ConnectFailed, ConnectionEstablished, Disconnected, NoActiveConnection,
    ShutdownFailed,
};
use crate::observability::messages::StructuredLog;

#[derive(Debug)]
pub struct ClientHandle<D> {
    backend: &'static str,
    config: Configuration,
    slot: DriverSlot<D>,
}

impl<D> ClientHandle<D> {
    pub fn new(backend: &'static str, config: Configuration) -> Self {
        Self {
            backend,
            config,
            slot: DriverSlot::Absent,
        }
    }

    pub fn backend(&self) -> &'static str {
        self.backend
    }

    pub fn configuration(&self) -> &Configuration {
        &self.config
    }

    pub fn slot(&self) -> &DriverSlot<D> {
        &self.slot
    }

    pub fn state(&self) -> ConnectionState {
        self.slot.state()
    }

    pub fn is_connected(&self) -> bool {
        self.slot.is_present()
    }

    pub fn driver(&self) -> Result<&D, ClientError> {
        self.slot
            .as_ref()
            .ok_or_else(|| ClientError::not_connected(self.backend))
    }

    pub fn driver_mut(&mut self) -> Result<&mut D, ClientError> {
        let backend = self.backend;
        self.slot
            .as_mut()
            .ok_or_else(|| ClientError::not_connected(backend))
    }

    /// Build and verify a driver unless one is already present.
    pub fn connect_with<F>(&mut self, host: Option<&str>, build: F) -> Result<(), ClientError>
    where
        F: FnOnce(&Configuration) -> Result<D, ClientError>,
    {
        if self.slot.is_present() {
            return Ok(());
        }

        ConnectAttempt {
            backend: self.backend,
            host,
        }
        .log();

        let driver = build(&self.config).map_err(|error| self.connect_failed(error))?;
        self.install(driver, host);
        Ok(())
    }

    /// Async form of [`ClientHandle::connect_with`].
    ///
    /// The builder receives its own clone of the configuration so the future
    /// does not borrow the handle.
    pub async fn connect_with_async<F, Fut>(
        &mut self,
        host: Option<&str>,
        build: F,
    ) -> Result<(), ClientError>
    where
        F: FnOnce(Configuration) -> Fut,
        Fut: Future<Output = Result<D, ClientError>>,
    {
        if self.slot.is_present() {
            return Ok(());
        }

        ConnectAttempt {
            backend: self.backend,
            host,
        }
        .log();

        let driver = build(self.config.clone())
            .await
            .map_err(|error| self.connect_failed(error))?;
        self.install(driver, host);
        Ok(())
    }

    /// Take the driver out, leaving the handle disconnected.
    ///
    /// The caller owns shutdown of the returned driver.
    pub fn release(&mut self) -> Option<D> {
        self.slot.take()
    }

    /// Release the driver and run its shutdown primitive. No-op when disconnected.
    ///
    /// A failing shutdown is logged; the handle is released regardless.
    pub fn disconnect_with<F>(&mut self, shutdown: F)
    where
        F: FnOnce(D) -> anyhow::Result<()>,
    {
        match self.slot.take() {
            Some(driver) => {
                if let Err(error) = shutdown(driver) {
                    self.shutdown_failed(&error);
                }
                Disconnected {
                    backend: self.backend,
                }
                .log();
            }
            None => self.no_active_connection("disconnect"),
        }
    }

    /// Async form of [`ClientHandle::disconnect_with`]; the shutdown is awaited.
    pub async fn disconnect_with_async<F, Fut>(&mut self, shutdown: F)
    where
        F: FnOnce(D) -> Fut,
        Fut: Future<Output = anyhow::Result<()>>,
    {
        match self.slot.take() {
            Some(driver) => {
                if let Err(error) = shutdown(driver).await {
                    self.shutdown_failed(&error);
                }
                Disconnected {
                    backend: self.backend,
                }
                .log();
            }
            None => self.no_active_connection("disconnect"),
        }
    }

    /// `false` without a driver; otherwise the probe's verdict, logging failures.
    pub fn status_with<F>(&self, probe_name: &str, probe: F) -> bool
    where
        F: FnOnce(&D) -> ProbeOutcome,
    {
        match self.slot.as_ref() {
            Some(driver) => self.record_probe(probe_name, probe(driver)),
            None => {
                self.no_active_connection("status");
                false
            }
        }
    }

    /// Async form of [`ClientHandle::status_with`].
    pub async fn status_with_async<'a, F, Fut>(&'a self, probe_name: &str, probe: F) -> bool
    where
        F: FnOnce(&'a D) -> Fut,
        Fut: Future<Output = ProbeOutcome>,
    {
        match self.slot.as_ref() {
            Some(driver) => {
                let outcome = probe(driver).await;
                self.record_probe(probe_name, outcome)
            }
            None => {
                self.no_active_connection("status");
                false
            }
        }
    }

    fn install(&mut self, driver: D, host: Option<&str>) {
        self.slot = DriverSlot::Present(driver);
        ConnectionEstablished {
            backend: self.backend,
            host,
        }
        .log();
    }

    fn connect_failed(&self, error: ClientError) -> ClientError {
        ConnectFailed {
            backend: self.backend,
            error: &error,
        }
        .log();
        error
    }

    fn shutdown_failed(&self, error: &anyhow::Error) {
        ShutdownFailed {
            backend: self.backend,
            error,
        }
        .log();
    }

    fn no_active_connection(&self, operation: &str) {
        NoActiveConnection {
            backend: self.backend,
            operation,
        }
        .log();
    }

    fn record_probe(&self, probe_name: &str, outcome: ProbeOutcome) -> bool {
        match outcome {
            ProbeOutcome::Healthy => true,
            ProbeOutcome::Unhealthy(reason) => {
                ProbeFailed {
                    backend: self.backend,
                    probe: probe_name,
                    reason: &reason,
                }
                .log();
                false
            }
        }
    }
}

/// Map a driver construction error to `ConnectionFailed` for `backend`.
pub fn connection_failed(backend: &str) -> impl FnOnce(anyhow::Error) -> ClientError + '_ {
    move |error| ClientError::connection_failed(backend, format!("{:#}", error))
}
