// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

pub mod driver;
pub mod module;

pub use driver::AccelDriver;
pub use module::AccelModule;
