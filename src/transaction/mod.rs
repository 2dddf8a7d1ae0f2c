// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Transactional query execution for the graph backend.
//!
//! One call, one session, one transaction:
//!
//! ```text
//! open session -> begin -> run -> collect all rows -> commit -> close session
//!                            \________ any failure ________/
//!                                        |
//!                                   rollback -> QueryRefused
//! ```
//!
//! Rows are collected in full before commit, so a failure while reading the
//! result still rolls back and no partial result is ever returned. A session
//! that cannot be opened, or a transaction that cannot begin, is reported as
//! `ConnectionFailed`: nothing was started, so there is nothing to roll back.

use crate::backends::graph::driver::{
    AsyncGraphDriver, AsyncGraphSession, AsyncGraphTransaction, AsyncRecordCursor, GraphDriver,
    GraphSession, GraphTransaction, Params, Record,
};
use crate::errors::ClientError;
use crate::observability::messages::query::{
    QueryCommitted, QueryRolledBack, RollbackFailed, SessionCloseFailed,
};
use crate::observability::messages::StructuredLog;

pub struct TransactionalQueryExecutor<'a, D: GraphDriver> {
    driver: &'a D,
}

impl<'a, D: GraphDriver> TransactionalQueryExecutor<'a, D> {
    pub fn new(driver: &'a D) -> Self {
        Self { driver }
    }

    pub fn execute(&self, query: &str, params: Option<&Params>) -> Result<Vec<Record>, ClientError> {
        let empty = Params::new();
        let params = params.unwrap_or(&empty);

        let mut session = self.driver.session().map_err(session_unavailable)?;
        let result = run_in_session(&mut session, query, params);
        if let Err(error) = session.close() {
            SessionCloseFailed { error: &error }.log();
        }
        result
    }
}

fn run_in_session<S: GraphSession>(
    session: &mut S,
    query: &str,
    params: &Params,
) -> Result<Vec<Record>, ClientError> {
    let mut transaction = session.begin().map_err(begin_failed)?;

    match run_and_commit(&mut transaction, query, params) {
        Ok(records) => {
            QueryCommitted {
                record_count: records.len(),
            }
            .log();
            Ok(records)
        }
        Err(error) => {
            QueryRolledBack { error: &error }.log();
            if let Err(rollback_error) = transaction.rollback() {
                RollbackFailed {
                    error: &rollback_error,
                }
                .log();
            }
            Err(query_refused(&error))
        }
    }
}

fn run_and_commit<T: GraphTransaction>(
    transaction: &mut T,
    query: &str,
    params: &Params,
) -> anyhow::Result<Vec<Record>> {
    let records = transaction
        .run(query, params)?
        .collect::<anyhow::Result<Vec<Record>>>()?;
    transaction.commit()?;
    Ok(records)
}

pub struct AsyncTransactionalQueryExecutor<'a, D: AsyncGraphDriver> {
    driver: &'a D,
}

impl<'a, D: AsyncGraphDriver> AsyncTransactionalQueryExecutor<'a, D> {
    pub fn new(driver: &'a D) -> Self {
        Self { driver }
    }

    pub async fn execute(
        &self,
        query: &str,
        params: Option<&Params>,
    ) -> Result<Vec<Record>, ClientError> {
        let empty = Params::new();
        let params = params.unwrap_or(&empty);

        let mut session = self.driver.session().await.map_err(session_unavailable)?;
        let result = run_in_session_async(&mut session, query, params).await;
        if let Err(error) = session.close().await {
            SessionCloseFailed { error: &error }.log();
        }
        result
    }
}

async fn run_in_session_async<S: AsyncGraphSession>(
    session: &mut S,
    query: &str,
    params: &Params,
) -> Result<Vec<Record>, ClientError> {
    let mut transaction = session.begin().await.map_err(begin_failed)?;

    match run_and_commit_async(&mut transaction, query, params).await {
        Ok(records) => {
            QueryCommitted {
                record_count: records.len(),
            }
            .log();
            Ok(records)
        }
        Err(error) => {
            QueryRolledBack { error: &error }.log();
            if let Err(rollback_error) = transaction.rollback().await {
                RollbackFailed {
                    error: &rollback_error,
                }
                .log();
            }
            Err(query_refused(&error))
        }
    }
}

async fn run_and_commit_async<T: AsyncGraphTransaction>(
    transaction: &mut T,
    query: &str,
    params: &Params,
) -> anyhow::Result<Vec<Record>> {
    let mut cursor = transaction.run(query, params).await?;
    let mut records = Vec::new();
    while let Some(record) = cursor.next_record().await {
        records.push(record?);
    }
    transaction.commit().await?;
    Ok(records)
}

fn session_unavailable(error: anyhow::Error) -> ClientError {
    ClientError::ConnectionFailed(format!("Could not open a query session: {:#}", error))
}

fn begin_failed(error: anyhow::Error) -> ClientError {
    ClientError::ConnectionFailed(format!("Could not begin a transaction: {:#}", error))
}

fn query_refused(error: &anyhow::Error) -> ClientError {
    ClientError::QueryRefused(format!("Query failed: {:#}", error))
}
