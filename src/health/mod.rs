// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Liveness probes layered on top of the connection lifecycle.
//!
//! A probe yields a [`ProbeOutcome`]. `status()` degrades an unhealthy outcome
//! to `false` plus a warning; `connect()` and explicit health checks turn it
//! into a hard error.

pub mod broker;

use std::fmt;

use crate::errors::ClientError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProbeOutcome {
    Healthy,
    Unhealthy(String),
}

impl ProbeOutcome {
    /// `Healthy` for `Ok`, otherwise `Unhealthy` carrying the error text.
    pub fn from_result<T, E: fmt::Display>(result: Result<T, E>) -> Self {
        match result {
            Ok(_) => ProbeOutcome::Healthy,
            Err(error) => ProbeOutcome::Unhealthy(error.to_string()),
        }
    }

    /// `Healthy` when `alive`, otherwise `Unhealthy(reason)`.
    pub fn from_bool(alive: bool, reason: &str) -> Self {
        if alive {
            ProbeOutcome::Healthy
        } else {
            ProbeOutcome::Unhealthy(reason.to_string())
        }
    }

    pub fn is_healthy(&self) -> bool {
        matches!(self, ProbeOutcome::Healthy)
    }

    /// Convert to a result, mapping an unhealthy outcome to `ConnectionUnhealthy`.
    pub fn into_result(self, backend: &str) -> Result<(), ClientError> {
        match self {
            ProbeOutcome::Healthy => Ok(()),
            ProbeOutcome::Unhealthy(reason) => Err(ClientError::ConnectionUnhealthy(format!(
                "Connection to {} is unhealthy: {}",
                backend, reason
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_outcome_conversions() {
        assert!(ProbeOutcome::from_result::<_, String>(Ok(())).is_healthy());
        assert_eq!(
            ProbeOutcome::from_result::<(), _>(Err("refused")),
            ProbeOutcome::Unhealthy("refused".to_string())
        );
        assert_eq!(
            ProbeOutcome::from_bool(false, "ping returned false"),
            ProbeOutcome::Unhealthy("ping returned false".to_string())
        );

        let err = ProbeOutcome::Unhealthy("no brokers".into())
            .into_result("Kafka")
            .unwrap_err();
        assert_eq!(err.error_type(), "Unhealthy");
        assert_eq!(err.status_code(), 503);
        assert!(err.info().contains("no brokers"));
        assert!(ProbeOutcome::Healthy.into_result("Kafka").is_ok());
    }
}
