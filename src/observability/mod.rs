// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Structured logging for the control plane.
//!
//! All diagnostic and operational log lines are message structs under
//! [`messages`], grouped by subsystem. Call sites build a message and call
//! [`messages::StructuredLog::log`]; the level and field names live with the
//! message, not at the call site.
//!
//! The library only emits `tracing` events. Installing a subscriber is up to
//! the binary (see `main.rs`, which reads `RUST_LOG` and defaults to `info`).

pub mod messages;
