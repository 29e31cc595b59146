// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Message types for execution contexts and stats aggregation.

use crate::observability::messages::StructuredLog;
use std::fmt::{Display, Formatter};
use tracing::Span;

pub struct ContextRegistered {
    pub context_id: u64,
}

impl Display for ContextRegistered {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(f, "Registered execution context ctx-{}", self.context_id)
    }
}

impl StructuredLog for ContextRegistered {
    fn log(&self) {
        tracing::debug!(context_id = self.context_id, "{}", self);
    }

    fn span(&self, name: &str) -> Span {
        tracing::debug_span!("execution_context", span_name = name, context_id = self.context_id)
    }
}

/// A context was dropped and its counters moved to the retired totals.
pub struct ContextRetired {
    pub context_id: u64,
}

impl Display for ContextRetired {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Retired execution context ctx-{}; counters folded into totals",
            self.context_id
        )
    }
}

impl StructuredLog for ContextRetired {
    fn log(&self) {
        tracing::debug!(context_id = self.context_id, "{}", self);
    }

    fn span(&self, name: &str) -> Span {
        tracing::debug_span!("context_retired", span_name = name, context_id = self.context_id)
    }
}

/// Probes were scattered to every live context.
///
/// # Log Level
/// `debug!` - Per-request detail
pub struct SnapshotStarted {
    pub contexts: usize,
}

impl Display for SnapshotStarted {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(f, "Sent stats probes to {} execution contexts", self.contexts)
    }
}

impl StructuredLog for SnapshotStarted {
    fn log(&self) {
        tracing::debug!(contexts = self.contexts, "{}", self);
    }

    fn span(&self, name: &str) -> Span {
        tracing::debug_span!("stats_snapshot", span_name = name, contexts = self.contexts)
    }
}

pub struct SnapshotCompleted {
    pub contexts_reported: usize,
}

impl Display for SnapshotCompleted {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Stats snapshot complete: {} contexts reported",
            self.contexts_reported
        )
    }
}

impl StructuredLog for SnapshotCompleted {
    fn log(&self) {
        tracing::debug!(contexts_reported = self.contexts_reported, "{}", self);
    }

    fn span(&self, name: &str) -> Span {
        tracing::debug_span!(
            "stats_snapshot_completed",
            span_name = name,
            contexts_reported = self.contexts_reported,
        )
    }
}

/// Some contexts missed the probe deadline; the snapshot omits them.
///
/// # Log Level
/// `warn!` - Partial result
pub struct SnapshotDegraded {
    pub contexts_reported: usize,
    pub unresponsive: usize,
}

impl Display for SnapshotDegraded {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Stats snapshot degraded: {} contexts reported, {} did not answer in time",
            self.contexts_reported, self.unresponsive
        )
    }
}

impl StructuredLog for SnapshotDegraded {
    fn log(&self) {
        tracing::warn!(
            contexts_reported = self.contexts_reported,
            unresponsive = self.unresponsive,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::warn_span!(
            "stats_snapshot_degraded",
            span_name = name,
            contexts_reported = self.contexts_reported,
            unresponsive = self.unresponsive,
        )
    }
}
