// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use std::panic::Location;

use crate::errors::ClientError;
use crate::observability::messages::lifecycle::OperationFailed;
use crate::observability::messages::StructuredLog;

/// Log a failed lifecycle result at its call site, then pass it through unchanged.
///
/// ```
/// use plyght::errors::ClientError;
/// use plyght::observability::LogFailure;
///
/// fn connect() -> Result<(), ClientError> {
///     Err(ClientError::not_connected("Kafka")).log_failure()
/// }
///
/// assert!(connect().is_err());
/// ```
pub trait LogFailure<T> {
    fn log_failure(self) -> Result<T, ClientError>;
}

impl<T> LogFailure<T> for Result<T, ClientError> {
    #[track_caller]
    fn log_failure(self) -> Result<T, ClientError> {
        if let Err(error) = &self {
            let location = Location::caller();
            let caller = format!("{}:{}", location.file(), location.line());
            OperationFailed {
                caller: &caller,
                error_type: error.error_type(),
                status_code: error.status_code(),
                error,
            }
            .log();
        }
        self
    }
}
