// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

pub mod case;
pub mod consts;
mod declared;
pub mod hosts;
mod loader;
mod options;
mod registry;
mod resolver;


pub use declared::{DeclaredConfig, StaticConfig};
pub use loader::{load_declared_config, FileFormat};
pub use options::{ConfigOverrides, Configuration, OptionMap};
pub use registry::{ConfigFactory, ConfigRegistry};
pub use resolver::{merge_options, BoundConfig, ConfigResolver};
