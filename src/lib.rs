// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

pub mod backends;      // client wrappers per backend
pub mod config;        // declared configuration, registry, resolver
pub mod errors;        // error taxonomy
pub mod health;        // liveness probes
pub mod lifecycle;     // connection slot and handle
pub mod observability;
pub mod traits;        // client and connector seams
pub mod transaction;   // transactional graph queries
