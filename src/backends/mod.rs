// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Backend wrappers.
//!
//! Every backend comes as a blocking and an async wrapper over the same
//! lifecycle: the wrapper owns one merged configuration and at most one live
//! driver, built lazily by `connect()` through a connector the caller supplies.
//!
//! * [`broker`]: message broker, verified by a publish (producer) or metadata fetch (consumer)
//! * [`graph`]: graph store with transactional queries, verified by a connectivity check
//! * [`search`]: search engine, verified by a ping
//! * [`object_store`] and [`cache`]: present means healthy
//! * [`http`]: a proxied HTTP transport with TLS options, present means healthy

pub mod broker;
pub mod cache;
pub mod graph;
pub mod http;
pub mod object_store;
pub mod search;

#[cfg(test)]
pub(crate) mod stub;
