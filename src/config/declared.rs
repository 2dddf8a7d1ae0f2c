// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use serde::Serialize;
use serde_json::Value;
use std::fmt;

use crate::config::options::OptionMap;
use crate::errors::ConfigLoadError;

/// A declared configuration type: a named source of default options for a client.
///
/// Implementations are registered in a [`crate::config::ConfigRegistry`] under
/// a PascalCase type name and instantiated when a client kind is resolved.
pub trait DeclaredConfig: Send + Sync + fmt::Debug {
    /// The options this configuration declares, in declaration order.
    fn dump(&self) -> OptionMap;
}

/// A declared configuration backed by an in-memory option map.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StaticConfig(OptionMap);

impl StaticConfig {
    pub fn new(options: OptionMap) -> Self {
        Self(options)
    }

    /// Build from any serializable settings struct; it must serialize to a mapping.
    pub fn from_serialize<T: Serialize>(settings: &T) -> Result<Self, ConfigLoadError> {
        match serde_json::to_value(settings)? {
            Value::Object(options) => Ok(Self(options)),
            other => Err(ConfigLoadError::NotAMapping(value_kind(&other))),
        }
    }
}

impl DeclaredConfig for StaticConfig {
    fn dump(&self) -> OptionMap {
        self.0.clone()
    }
}

pub(crate) fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "a sequence",
        Value::Object(_) => "a mapping",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Serialize)]
    struct SearchSettings {
        hosts: Vec<String>,
        use_ssl: bool,
    }

    #[test]
    fn test_from_serialize_keeps_field_order() {
        let config = StaticConfig::from_serialize(&SearchSettings {
            hosts: vec!["a".to_string()],
            use_ssl: true,
        })
        .unwrap();

        let keys: Vec<String> = config.dump().keys().cloned().collect();
        assert_eq!(keys, vec!["hosts", "use_ssl"]);
    }

    #[test]
    fn test_from_serialize_rejects_non_mapping() {
        let err = StaticConfig::from_serialize(&vec![1, 2, 3]).unwrap_err();
        assert!(matches!(err, ConfigLoadError::NotAMapping("a sequence")));
    }
}
