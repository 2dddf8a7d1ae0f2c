// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

mod handle;
mod state;

pub use handle::{connection_failed, ClientHandle};
pub use state::{ConnectionState, DriverSlot};
