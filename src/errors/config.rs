// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while loading a declared configuration source.
#[derive(Error, Debug)]
pub enum ConfigLoadError {
    /// The configuration file could not be read.
    #[error("Failed to read configuration file '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid YAML configuration: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Invalid TOML configuration: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("Invalid JSON configuration: {0}")]
    Json(#[from] serde_json::Error),

    /// The file extension does not name a supported format.
    #[error("Unsupported configuration format for '{0}' (expected .yaml, .yml, .toml or .json)")]
    UnsupportedFormat(PathBuf),

    /// The document parsed, but its top level is not a mapping of option names.
    #[error("Configuration must be a mapping of option names, found {0}")]
    NotAMapping(&'static str),
}
