// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use serde_json::Value;
use std::fs;
use std::path::Path;

use crate::config::declared::{value_kind, StaticConfig};
use crate::errors::ConfigLoadError;

/// On-disk formats a declared configuration may be written in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileFormat {
    Yaml,
    Toml,
    Json,
}

impl FileFormat {
    /// Pick the format from the file extension (case-insensitive).
    pub fn from_path(path: &Path) -> Option<Self> {
        let extension = path.extension()?.to_str()?.to_ascii_lowercase();
        match extension.as_str() {
            "yaml" | "yml" => Some(FileFormat::Yaml),
            "toml" => Some(FileFormat::Toml),
            "json" => Some(FileFormat::Json),
            _ => None,
        }
    }

    /// Parse a document into a top-level option map.
    pub fn parse(&self, content: &str) -> Result<StaticConfig, ConfigLoadError> {
        let document: Value = match self {
            FileFormat::Yaml => serde_yaml::from_str(content)?,
            FileFormat::Toml => toml::from_str(content)?,
            FileFormat::Json => serde_json::from_str(content)?,
        };

        match document {
            Value::Object(options) => Ok(StaticConfig::new(options)),
            // An empty YAML document is a declared configuration with no options.
            Value::Null => Ok(StaticConfig::default()),
            other => Err(ConfigLoadError::NotAMapping(value_kind(&other))),
        }
    }
}

/// Load a declared configuration from a YAML, TOML or JSON file.
///
/// # Example
/// ```yaml
/// # search.yaml
/// hosts:
///   - host: search-1.internal
///     port: 9200
/// use_ssl: true
/// ```
pub fn load_declared_config<P: AsRef<Path>>(path: P) -> Result<StaticConfig, ConfigLoadError> {
    let path = path.as_ref();
    let format = FileFormat::from_path(path)
        .ok_or_else(|| ConfigLoadError::UnsupportedFormat(path.to_path_buf()))?;

    let content = fs::read_to_string(path).map_err(|source| ConfigLoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    format.parse(&content)
}
