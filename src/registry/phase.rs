// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Two-phase lifecycle gate for structural mutation.
//!
//! Assignment, driver selection, and options updates hold a shared guard for
//! the whole mutation. The transition to RUNTIME takes the exclusive guard, so
//! no structural change can straddle it.

use serde::Serialize;
use std::fmt::{Display, Formatter};
use std::sync::{RwLock, RwLockReadGuard};

use crate::errors::{AccelError, AccelResult};
use crate::observability::messages::registry::{PhaseTransitioned, StructuralMutationRejected};
use crate::observability::messages::StructuredLog;

/// Lifecycle phase of the framework.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Phase {
    /// Before serving; structural mutation allowed.
    Startup,
    /// Serving; structural mutation rejected.
    Runtime,
}

impl Display for Phase {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        match self {
            Phase::Startup => f.write_str("STARTUP"),
            Phase::Runtime => f.write_str("RUNTIME"),
        }
    }
}

/// Shared phase cell guarding structural mutations.
#[derive(Debug)]
pub struct LifecycleGate {
    phase: RwLock<Phase>,
}

impl Default for LifecycleGate {
    fn default() -> Self {
        Self::new()
    }
}

impl LifecycleGate {
    pub fn new() -> Self {
        Self {
            phase: RwLock::new(Phase::Startup),
        }
    }

    pub fn current(&self) -> Phase {
        *self.read()
    }

    /// Holds the gate in STARTUP for the lifetime of the returned guard.
    ///
    /// Fails with `PhaseViolation` once the framework is serving.
    pub fn enter_startup(&self, operation: &'static str) -> AccelResult<StartupGuard<'_>> {
        let guard = self.read();
        if *guard != Phase::Startup {
            StructuralMutationRejected {
                operation,
                phase: *guard,
            }
            .log();
            return Err(AccelError::PhaseViolation {
                operation,
                required: Phase::Startup,
                current: *guard,
            });
        }
        Ok(StartupGuard { _guard: guard })
    }

    /// Moves to RUNTIME once every in-progress structural mutation has finished.
    pub fn start_serving(&self) -> AccelResult<()> {
        let mut guard = self.phase.write().unwrap_or_else(|e| e.into_inner());
        if *guard != Phase::Startup {
            return Err(AccelError::PhaseViolation {
                operation: "start_serving",
                required: Phase::Startup,
                current: *guard,
            });
        }
        *guard = Phase::Runtime;
        PhaseTransitioned {
            from: Phase::Startup,
            to: Phase::Runtime,
        }
        .log();
        Ok(())
    }

    fn read(&self) -> RwLockReadGuard<'_, Phase> {
        self.phase.read().unwrap_or_else(|e| e.into_inner())
    }
}

/// Proof that the gate is in STARTUP; the phase cannot change while held.
pub struct StartupGuard<'a> {
    _guard: RwLockReadGuard<'a, Phase>,
}
