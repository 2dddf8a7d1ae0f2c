// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use std::time::Duration;

/// Reserved topic the producer health probe publishes to.
pub const HEALTH_TOPIC: &str = "__health__";
/// Key of the synthetic health message.
pub const HEALTH_MESSAGE_KEY: &str = "status";

/// Bound on a single probe call: flush, metadata fetch, ping.
pub const DEFAULT_PROBE_TIMEOUT: Duration = Duration::from_secs(5);
/// Default deadline of a broker lookup scan.
pub const DEFAULT_SCAN_TIMEOUT: Duration = Duration::from_secs(15);
/// Poll interval inside a lookup scan.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(1);

pub const HOSTS_KEY: &str = "hosts";
pub const USE_SSL_KEY: &str = "use_ssl";
pub const URI_KEY: &str = "uri";
pub const TOPICS_KEY: &str = "topics";

/// Framework keys removed before broker options reach the driver.
pub const FRAMEWORK_KEYS: &[&str] = &[TOPICS_KEY, URI_KEY];
