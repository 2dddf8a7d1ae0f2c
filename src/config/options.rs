// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Immutable merged configuration and the explicit override map.
//!
//! A wrapper's configuration is built in two stages: an optional declared
//! configuration (resolved through [`crate::config::ConfigResolver`]) and an
//! explicit [`ConfigOverrides`] map supplied at construction. The result is a
//! single [`Configuration`] value that is never mutated afterwards.
//!
//! # Example
//! ```
//! use plyght::config::{ConfigOverrides, Configuration};
//! use serde_json::json;
//!
//! let declared = json!({"hosts": [{"host": "a", "port": 9200}], "use_ssl": false});
//! let declared = declared.as_object().cloned();
//!
//! let config = Configuration::merged(declared, ConfigOverrides::new().set("use_ssl", true));
//!
//! assert_eq!(config.get_bool("use_ssl"), Some(true));
//! assert!(config.contains_key("hosts"));
//! ```

use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use std::sync::Arc;

/// An ordered mapping of option name to value.
pub type OptionMap = Map<String, Value>;

/// Read-only, insertion-ordered configuration owned by one client handle.
///
/// Cloning is cheap: clones share the same underlying map, which is never
/// mutated, so a `Configuration` can be read from several callers at once.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Configuration(Arc<OptionMap>);

impl Configuration {
    /// Merge a declared configuration with explicit overrides.
    ///
    /// Declared keys keep their order; override values replace same-named
    /// declared values in place and new override keys are appended. Keys
    /// absent from both sources never appear.
    pub fn merged(declared: Option<OptionMap>, overrides: ConfigOverrides) -> Self {
        let mut merged = declared.unwrap_or_default();
        for (key, value) in overrides.0 {
            merged.insert(key, value);
        }
        Self(Arc::new(merged))
    }

    /// Configuration built only from explicit overrides.
    pub fn from_overrides(overrides: ConfigOverrides) -> Self {
        Self::merged(None, overrides)
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.0.get(key).and_then(Value::as_str)
    }

    pub fn get_bool(&self, key: &str) -> Option<bool> {
        self.0.get(key).and_then(Value::as_bool)
    }

    pub fn get_u64(&self, key: &str) -> Option<u64> {
        self.0.get(key).and_then(Value::as_u64)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &String> {
        self.0.keys()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn as_map(&self) -> &OptionMap {
        &self.0
    }

    /// A new configuration without the given keys, order preserved.
    ///
    /// Used to hand driver-native keys to a connector verbatim once the
    /// framework's own keys have been consumed.
    pub fn without(&self, keys: &[&str]) -> Self {
        let filtered = self
            .0
            .iter()
            .filter(|(key, _)| !keys.contains(&key.as_str()))
            .map(|(key, value)| (key.clone(), value.clone()))
            .collect();
        Self(Arc::new(filtered))
    }

    /// Deserialize the whole configuration into a typed structure.
    pub fn deserialize<T: DeserializeOwned>(&self) -> Result<T, serde_json::Error> {
        serde_json::from_value(Value::Object(self.0.as_ref().clone()))
    }
}

/// Explicit override map applied on top of a declared configuration.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConfigOverrides(OptionMap);

impl ConfigOverrides {
    pub fn new() -> Self {
        Self(Map::new())
    }

    pub fn from_map(map: OptionMap) -> Self {
        Self(map)
    }

    /// Set one override, replacing an earlier value for the same key.
    pub fn set(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.0.insert(key.into(), value.into());
        self
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<OptionMap> for ConfigOverrides {
    fn from(map: OptionMap) -> Self {
        Self(map)
    }
}
