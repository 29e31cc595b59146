// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

mod accel;
mod config;

pub use accel::{AccelError, AccelResult};
pub use config::ConfigError;
