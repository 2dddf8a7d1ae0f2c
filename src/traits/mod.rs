// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

pub mod client;
pub mod connector;

pub use client::{AsyncClient, Client, ConfigScope};
pub use connector::{AsyncConnector, Connector};
