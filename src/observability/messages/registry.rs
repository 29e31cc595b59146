// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Message types for the routing table and lifecycle events.
//!
//! This module contains message types for logging events related to:
//! * Module registration and opcode assignment
//! * Driver selection
//! * Options updates
//! * Phase transitions and rejected structural mutations

use crate::config::AccelOptions;
use crate::observability::messages::StructuredLog;
use crate::registry::Phase;
use std::fmt::{Display, Formatter};
use tracing::Span;

/// A backend module was registered at construction.
///
/// # Log Level
/// `debug!` - Construction detail
pub struct ModuleRegistered<'a> {
    pub module: &'a str,
    pub supported_ops: usize,
}

impl Display for ModuleRegistered<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Registered acceleration module '{}' supporting {} opcodes",
            self.module, self.supported_ops
        )
    }
}

impl StructuredLog for ModuleRegistered<'_> {
    fn log(&self) {
        tracing::debug!(
            module = self.module,
            supported_ops = self.supported_ops,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::debug_span!(
            "module_registered",
            span_name = name,
            module = self.module,
            supported_ops = self.supported_ops,
        )
    }
}

/// An opcode was reassigned to a different module.
///
/// # Log Level
/// `info!` - Administrative change
///
/// # Example
/// ```
/// use accel_plane::observability::messages::registry::OpcodeAssigned;
///
/// let msg = OpcodeAssigned {
///     opcode: "crc32c",
///     module: "software",
///     previous: Some("hw0"),
/// };
///
/// assert_eq!(msg.to_string(), "Assigned opcode 'crc32c' to module 'software' (was 'hw0')");
/// ```
pub struct OpcodeAssigned<'a> {
    pub opcode: &'a str,
    pub module: &'a str,
    pub previous: Option<&'a str>,
}

impl Display for OpcodeAssigned<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Assigned opcode '{}' to module '{}'",
            self.opcode, self.module
        )?;
        match self.previous {
            Some(previous) => write!(f, " (was '{}')", previous),
            None => Ok(()),
        }
    }
}

impl StructuredLog for OpcodeAssigned<'_> {
    fn log(&self) {
        tracing::info!(
            opcode = self.opcode,
            module = self.module,
            previous = self.previous,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::info_span!(
            "opcode_assigned",
            span_name = name,
            opcode = self.opcode,
            module = self.module,
        )
    }
}

/// A driver was selected and now supersedes per-opcode routing.
///
/// # Log Level
/// `info!` - Administrative change
pub struct DriverSelected<'a> {
    pub driver: &'a str,
}

impl Display for DriverSelected<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(f, "Selected acceleration driver '{}'", self.driver)
    }
}

impl StructuredLog for DriverSelected<'_> {
    fn log(&self) {
        tracing::info!(driver = self.driver, "{}", self);
    }

    fn span(&self, name: &str) -> Span {
        tracing::info_span!("driver_selected", span_name = name, driver = self.driver)
    }
}

/// Options were replaced with a merged snapshot.
///
/// # Log Level
/// `info!` - Administrative change
pub struct OptionsUpdated<'a> {
    pub options: &'a AccelOptions,
}

impl Display for OptionsUpdated<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        let o = self.options;
        write!(
            f,
            "Updated acceleration options: small_cache_size={}, large_cache_size={}, task_count={}, sequence_count={}, buf_count={}",
            o.small_cache_size, o.large_cache_size, o.task_count, o.sequence_count, o.buf_count
        )
    }
}

impl StructuredLog for OptionsUpdated<'_> {
    fn log(&self) {
        let o = self.options;
        tracing::info!(
            small_cache_size = o.small_cache_size,
            large_cache_size = o.large_cache_size,
            task_count = o.task_count,
            sequence_count = o.sequence_count,
            buf_count = o.buf_count,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::info_span!(
            "options_updated",
            span_name = name,
            task_count = self.options.task_count,
            buf_count = self.options.buf_count,
        )
    }
}

/// The lifecycle gate moved to a new phase.
///
/// # Log Level
/// `info!` - Important operational event
pub struct PhaseTransitioned {
    pub from: Phase,
    pub to: Phase,
}

impl Display for PhaseTransitioned {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(f, "Acceleration framework moved from {} to {}", self.from, self.to)
    }
}

impl StructuredLog for PhaseTransitioned {
    fn log(&self) {
        tracing::info!(from = %self.from, to = %self.to, "{}", self);
    }

    fn span(&self, name: &str) -> Span {
        tracing::info_span!(
            "phase_transitioned",
            span_name = name,
            from = %self.from,
            to = %self.to,
        )
    }
}

/// A STARTUP-only mutation was attempted in another phase.
///
/// # Log Level
/// `warn!` - Rejected administrative request
pub struct StructuralMutationRejected<'a> {
    pub operation: &'a str,
    pub phase: Phase,
}

impl Display for StructuralMutationRejected<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Rejected '{}': only permitted in STARTUP, framework is in {}",
            self.operation, self.phase
        )
    }
}

impl StructuredLog for StructuralMutationRejected<'_> {
    fn log(&self) {
        tracing::warn!(operation = self.operation, phase = %self.phase, "{}", self);
    }

    fn span(&self, name: &str) -> Span {
        tracing::warn_span!(
            "structural_mutation_rejected",
            span_name = name,
            operation = self.operation,
            phase = %self.phase,
        )
    }
}
