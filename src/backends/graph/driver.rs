// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! The seam between the graph wrappers and a third-party graph driver.
//!
//! Driver > session > transaction > cursor, each level owned by the one
//! above for the duration of a single query.

use async_trait::async_trait;
use serde_json::{Map, Value};

/// Query parameters.
pub type Params = Map<String, Value>;
/// One result row, keyed by column name.
pub type Record = Map<String, Value>;

pub trait GraphTransaction {
    type Cursor: Iterator<Item = anyhow::Result<Record>>;

    fn run(&mut self, query: &str, params: &Params) -> anyhow::Result<Self::Cursor>;

    fn commit(&mut self) -> anyhow::Result<()>;

    fn rollback(&mut self) -> anyhow::Result<()>;
}

pub trait GraphSession {
    type Transaction: GraphTransaction;

    fn begin(&mut self) -> anyhow::Result<Self::Transaction>;

    fn close(self) -> anyhow::Result<()>;
}

pub trait GraphDriver: Send + Sync {
    type Session: GraphSession;

    fn verify_connectivity(&self) -> anyhow::Result<()>;

    fn session(&self) -> anyhow::Result<Self::Session>;

    fn close(self) -> anyhow::Result<()>;
}

#[async_trait]
pub trait AsyncRecordCursor: Send {
    /// The next row, or `None` once the result is exhausted.
    async fn next_record(&mut self) -> Option<anyhow::Result<Record>>;
}

#[async_trait]
pub trait AsyncGraphTransaction: Send {
    type Cursor: AsyncRecordCursor;

    async fn run(&mut self, query: &str, params: &Params) -> anyhow::Result<Self::Cursor>;

    async fn commit(&mut self) -> anyhow::Result<()>;

    async fn rollback(&mut self) -> anyhow::Result<()>;
}

#[async_trait]
pub trait AsyncGraphSession: Send {
    type Transaction: AsyncGraphTransaction;

    async fn begin(&mut self) -> anyhow::Result<Self::Transaction>;

    async fn close(self) -> anyhow::Result<()>;
}

#[async_trait]
pub trait AsyncGraphDriver: Send + Sync {
    type Session: AsyncGraphSession;

    async fn verify_connectivity(&self) -> anyhow::Result<()>;

    async fn session(&self) -> anyhow::Result<Self::Session>;

    async fn close(self) -> anyhow::Result<()>;
}
