// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Endpoint descriptors derived purely from configuration.
//!
//! Two shapes are supported. The list-of-hosts form reads `hosts` (a sequence
//! of `{host, port, url_prefix}` entries) and picks a scheme from `use_ssl`.
//! The single-endpoint form reads a URI string from `uri` or a backend's own
//! fallback key. Neither needs a live connection.

use serde_json::Value;

use crate::config::consts::{HOSTS_KEY, URI_KEY, USE_SSL_KEY};
use crate::config::Configuration;
use crate::observability::messages::lifecycle::NoHostsConfigured;
use crate::observability::messages::StructuredLog;

/// The secure and plain scheme pair of a list-of-hosts backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HostScheme {
    pub secure: &'static str,
    pub plain: &'static str,
}

impl HostScheme {
    pub const HTTP: HostScheme = HostScheme {
        secure: "https",
        plain: "http",
    };

    pub const BOLT: HostScheme = HostScheme {
        secure: "bolt+ssc",
        plain: "bolt",
    };

    pub fn select(&self, use_ssl: bool) -> &'static str {
        if use_ssl {
            self.secure
        } else {
            self.plain
        }
    }
}

/// One entry of a `hosts` sequence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HostEntry {
    pub host: String,
    pub port: Option<u16>,
    pub url_prefix: Option<String>,
}

impl HostEntry {
    /// Read an entry from either a `{host, port, url_prefix}` mapping or a bare host string.
    ///
    /// Ports may be numbers or numeric strings. Entries without a host yield `None`.
    pub fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::String(host) if !host.is_empty() => Some(HostEntry {
                host: host.clone(),
                port: None,
                url_prefix: None,
            }),
            Value::Object(entry) => {
                let host = entry.get("host")?.as_str().filter(|h| !h.is_empty())?;
                let port = entry.get("port").and_then(|port| match port {
                    Value::Number(n) => n.as_u64().and_then(|n| u16::try_from(n).ok()),
                    Value::String(s) => s.parse().ok(),
                    _ => None,
                });
                let url_prefix = entry
                    .get("url_prefix")
                    .and_then(Value::as_str)
                    .map(|prefix| prefix.trim_matches('/'))
                    .filter(|prefix| !prefix.is_empty())
                    .map(str::to_string);

                Some(HostEntry {
                    host: host.to_string(),
                    port,
                    url_prefix,
                })
            }
            _ => None,
        }
    }

    pub fn url(&self, scheme: &str) -> String {
        let mut url = format!("{}://{}", scheme, self.host);
        if let Some(port) = self.port {
            url.push_str(&format!(":{}", port));
        }
        if let Some(prefix) = &self.url_prefix {
            url.push('/');
            url.push_str(prefix);
        }
        url
    }
}

/// All `hosts` entries of a configuration, in order.
pub fn host_entries(config: &Configuration) -> Vec<HostEntry> {
    match config.get(HOSTS_KEY) {
        Some(Value::Array(items)) => items.iter().filter_map(HostEntry::from_value).collect(),
        Some(single) => HostEntry::from_value(single).into_iter().collect(),
        None => Vec::new(),
    }
}

/// `"scheme://host:port[/prefix]"` for each entry, joined with `", "`, without logging.
pub fn hosts_list(config: &Configuration, scheme: HostScheme) -> Option<String> {
    let scheme = scheme.select(config.get_bool(USE_SSL_KEY).unwrap_or(false));
    let urls: Vec<String> = host_entries(config)
        .iter()
        .map(|entry| entry.url(scheme))
        .collect();

    if urls.is_empty() {
        None
    } else {
        Some(urls.join(", "))
    }
}

/// The first non-empty string among `keys`, without logging.
pub fn first_string(config: &Configuration, keys: &[&str]) -> Option<String> {
    keys.iter()
        .filter_map(|key| config.get_str(key))
        .map(str::trim)
        .find(|value| !value.is_empty())
        .map(str::to_string)
}

/// Pass a descriptor through, warning when it is absent.
pub fn describe(backend: &str, descriptor: Option<String>) -> Option<String> {
    if descriptor.is_none() {
        NoHostsConfigured { backend }.log();
    }
    descriptor
}

/// The list-of-hosts descriptor for `backend`.
///
/// ```
/// use plyght::config::hosts::{hosts_descriptor, HostScheme};
/// use plyght::config::{ConfigOverrides, Configuration};
/// use serde_json::json;
///
/// let config = Configuration::from_overrides(
///     ConfigOverrides::new()
///         .set("hosts", json!([{"host": "a", "port": 9200, "url_prefix": "v1"}]))
///         .set("use_ssl", true),
/// );
///
/// assert_eq!(
///     hosts_descriptor(&config, "OpenSearch", HostScheme::HTTP).as_deref(),
///     Some("https://a:9200/v1")
/// );
/// ```
pub fn hosts_descriptor(config: &Configuration, backend: &str, scheme: HostScheme) -> Option<String> {
    describe(backend, hosts_list(config, scheme))
}

/// The single-endpoint descriptor: `uri`, else the first of `fallback_keys` that is set.
pub fn uri_descriptor(config: &Configuration, backend: &str, fallback_keys: &[&str]) -> Option<String> {
    let mut keys = vec![URI_KEY];
    keys.extend_from_slice(fallback_keys);
    describe(backend, first_string(config, &keys))
}
