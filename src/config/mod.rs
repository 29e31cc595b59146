// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

mod loader;
mod options;
mod runtime;

pub mod consts;

pub use loader::{load_config, FrameworkConfig, StatsConfig};
pub use options::{AccelOptions, OptionsStore, OptionsUpdate};
pub use runtime::{apply_config, RuntimeBuilder};
