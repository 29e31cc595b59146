// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Backend modules that execute accelerated operations.
//!
//! # Available Backends
//!
//! ## Software Backend
//! CPU fallback that can execute every opcode. It registers with the lowest
//! possible priority, so any hardware module claiming an opcode wins the
//! default assignment for it.
//!
//! ## Stub Backend (Test-Only)
//! Configurable modules and drivers for exercising routing and key
//! validation (only available in test builds):
//! - **StubModule**: chosen opcodes, priority and crypto capabilities; counts key hooks
//! - **StubDriver**: a named monolithic driver
//!
//! # Examples
//!
//! ```rust
//! use accel_plane::backends::SoftwareModule;
//! use accel_plane::registry::Opcode;
//! use accel_plane::traits::AccelModule;
//!
//! let software = SoftwareModule::new();
//! assert!(Opcode::ALL.iter().all(|op| software.supports_opcode(*op)));
//! ```

pub mod software;
#[cfg(test)]
pub mod stub;

pub use software::SoftwareModule;
