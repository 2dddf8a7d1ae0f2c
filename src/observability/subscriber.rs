// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use tracing_subscriber::EnvFilter;

/// Install a `fmt` subscriber filtered by `RUST_LOG`, defaulting to `info`.
///
/// Calling it again once a global subscriber exists is a no-op.
pub fn init_tracing() {
    if let Err(error) = try_init_tracing("info") {
        tracing::debug!(error = %error, "Tracing subscriber already installed");
    }
}

/// Install a `fmt` subscriber, falling back to `default_directive` when `RUST_LOG` is unset.
pub fn try_init_tracing(
    default_directive: &str,
) -> Result<(), Box<dyn std::error::Error + Send + Sync + 'static>> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(default_directive))?;

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .try_init()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_second_install_is_reported_not_fatal() {
        init_tracing();
        assert!(try_init_tracing("debug").is_err());
        init_tracing();
    }
}
