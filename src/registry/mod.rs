// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Opcode routing: the opcode set, the lifecycle gate, the per-opcode
//! assignment table, and the driver override.

mod assignments;
mod driver;
mod opcode;
mod phase;

pub use assignments::{ModuleInfo, OpcodeAssignment, OpcodeRegistry};
pub use driver::DriverSelector;
pub use opcode::Opcode;
pub use phase::{LifecycleGate, Phase, StartupGuard};
