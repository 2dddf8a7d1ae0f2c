// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

mod client;
mod config;

pub use client::ClientError;
pub use config::ConfigLoadError;
