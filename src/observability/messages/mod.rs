// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Centralized message types for structured logging.
//!
//! Each message is a small struct borrowing the values it reports. `Display`
//! renders the human-readable line and [`StructuredLog`] emits it as a
//! `tracing` event with typed fields at the level the subsystem uses for it.
//!
//! * `registry` - module registration, assignment, driver, options and phase events
//! * `crypto` - key creation, rejection and destruction
//! * `stats` - context registration and snapshot aggregation
//!
//! Key material never appears in any message.
//!
//! # Usage Pattern
//!
//! ```rust
//! use accel_plane::observability::messages::registry::DriverSelected;
//! use accel_plane::observability::messages::StructuredLog;
//!
//! let msg = DriverSelected { driver: "dsa" };
//! assert_eq!(msg.to_string(), "Selected acceleration driver 'dsa'");
//! msg.log();
//! ```

use tracing::Span;

pub mod crypto;
pub mod registry;
pub mod stats;

/// Emits a message as a structured `tracing` event or span.
pub trait StructuredLog: std::fmt::Display {
    /// Logs the message at its fixed level with typed fields.
    fn log(&self);

    /// Builds a span carrying the same fields.
    fn span(&self, name: &str) -> Span;
}
