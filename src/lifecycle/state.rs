// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use std::fmt;

/// Connection state, derived from the driver slot rather than stored.
///
/// There is no `Connecting` state: `connect()` is atomic from the caller's view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionState {
    Disconnected,
    Connected,
}

impl ConnectionState {
    pub fn is_connected(&self) -> bool {
        matches!(self, ConnectionState::Connected)
    }
}

impl fmt::Display for ConnectionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConnectionState::Disconnected => write!(f, "disconnected"),
            ConnectionState::Connected => write!(f, "connected"),
        }
    }
}

/// Where a handle's driver is in its life.
#[derive(Debug)]
pub enum DriverSlot<D> {
    /// Never connected.
    Absent,
    Present(D),
    /// Connected at least once, then released.
    Cleared,
}

impl<D> Default for DriverSlot<D> {
    fn default() -> Self {
        DriverSlot::Absent
    }
}

impl<D> DriverSlot<D> {
    pub fn as_ref(&self) -> Option<&D> {
        match self {
            DriverSlot::Present(driver) => Some(driver),
            _ => None,
        }
    }

    pub fn as_mut(&mut self) -> Option<&mut D> {
        match self {
            DriverSlot::Present(driver) => Some(driver),
            _ => None,
        }
    }

    pub fn is_present(&self) -> bool {
        matches!(self, DriverSlot::Present(_))
    }

    /// Take the driver out, leaving `Cleared`. Absent or cleared slots are unchanged.
    pub fn take(&mut self) -> Option<D> {
        match std::mem::replace(self, DriverSlot::Cleared) {
            DriverSlot::Present(driver) => Some(driver),
            previous => {
                *self = previous;
                None
            }
        }
    }

    pub fn state(&self) -> ConnectionState {
        if self.is_present() {
            ConnectionState::Connected
        } else {
            ConnectionState::Disconnected
        }
    }
}
