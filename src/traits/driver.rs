// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

/// A monolithic backend that, once selected, executes every opcode.
pub trait AccelDriver: Send + Sync {
    /// Unique driver name.
    fn name(&self) -> &str;
}
