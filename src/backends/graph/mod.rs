// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Graph-database backend.
//!
//! Queries run through the transactional executor: one session and one
//! transaction per call. `connect()` verifies connectivity before the driver
//! is kept.

mod async_client;
mod client;
pub mod driver;

use std::fmt;

use serde_json::{json, Value};

use crate::backends::graph::driver::{Params, Record};
use crate::config::consts::URI_KEY;
use crate::config::hosts::{describe, first_string, hosts_list, HostScheme};
use crate::config::Configuration;
use crate::errors::ClientError;

pub use async_client::AsyncGraphClient;
pub use client::GraphClient;

pub(crate) const BACKEND: &str = "Neo4j";

pub(crate) const EXPORT_QUERY: &str = "CALL n10s.rdf.export.cypher($cypherQuery, $config)";
pub(crate) const LABELS_QUERY: &str = "CALL db.labels() YIELD label RETURN label AS labels";

/// RDF serialization requested from a subgraph export.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ExportFormat {
    #[default]
    Turtle,
    NTriples,
    JsonLd,
    RdfXml,
}

impl ExportFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            ExportFormat::Turtle => "Turtle",
            ExportFormat::NTriples => "N-Triples",
            ExportFormat::JsonLd => "JSON-LD",
            ExportFormat::RdfXml => "RDF/XML",
        }
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Parameters of the export procedure call wrapping `query`.
pub(crate) fn export_params(query: &str, params: Option<&Params>, format: ExportFormat) -> Params {
    let cypher_params = params.cloned().unwrap_or_default();
    let mut export = Params::new();
    export.insert("cypherQuery".to_string(), Value::String(query.to_string()));
    export.insert(
        "config".to_string(),
        json!({ "format": format.as_str(), "cypherParams": cypher_params }),
    );
    export
}

pub(crate) fn label_names(records: Vec<Record>) -> Vec<String> {
    records
        .into_iter()
        .filter_map(|mut record| match record.remove("labels") {
            Some(Value::String(label)) => Some(label),
            _ => None,
        })
        .collect()
}

/// `uri` when set, otherwise the `hosts` list with a bolt scheme.
pub(crate) fn graph_host(config: &Configuration) -> Option<String> {
    describe(
        BACKEND,
        first_string(config, &[URI_KEY]).or_else(|| hosts_list(config, HostScheme::BOLT)),
    )
}

pub(crate) fn connectivity_failed(error: anyhow::Error) -> ClientError {
    ClientError::ConnectionUnhealthy(format!(
        "Connection to {} failed connectivity verification: {:#}",
        BACKEND, error
    ))
}
