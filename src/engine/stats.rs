// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Counter records kept per execution context and summed by the aggregator.

use serde::Serialize;
use std::ops::AddAssign;

use crate::registry::Opcode;

/// Counters for one opcode. Every field only grows.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct OperationStats {
    pub executed: u64,
    pub failed: u64,
    pub num_bytes: u64,
}

impl OperationStats {
    pub fn is_idle(&self) -> bool {
        self.executed == 0 && self.failed == 0
    }
}

impl AddAssign<&OperationStats> for OperationStats {
    fn add_assign(&mut self, other: &OperationStats) {
        self.executed += other.executed;
        self.failed += other.failed;
        self.num_bytes += other.num_bytes;
    }
}

/// Resource whose exhaustion forced an operation to be retried.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RetryKind {
    Task,
    Sequence,
    Iobuf,
    Bufdesc,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct RetryStats {
    pub task: u64,
    pub sequence: u64,
    pub iobuf: u64,
    pub bufdesc: u64,
}

impl RetryStats {
    fn counter(&mut self, kind: RetryKind) -> &mut u64 {
        match kind {
            RetryKind::Task => &mut self.task,
            RetryKind::Sequence => &mut self.sequence,
            RetryKind::Iobuf => &mut self.iobuf,
            RetryKind::Bufdesc => &mut self.bufdesc,
        }
    }
}

impl AddAssign<&RetryStats> for RetryStats {
    fn add_assign(&mut self, other: &RetryStats) {
        self.task += other.task;
        self.sequence += other.sequence;
        self.iobuf += other.iobuf;
        self.bufdesc += other.bufdesc;
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct GlobalStats {
    pub sequence_executed: u64,
    pub sequence_failed: u64,
    pub sequence_outstanding: u64,
    pub task_outstanding: u64,
    pub retry: RetryStats,
}

impl AddAssign<&GlobalStats> for GlobalStats {
    fn add_assign(&mut self, other: &GlobalStats) {
        self.sequence_executed += other.sequence_executed;
        self.sequence_failed += other.sequence_failed;
        self.sequence_outstanding += other.sequence_outstanding;
        self.task_outstanding += other.task_outstanding;
        self.retry += &other.retry;
    }
}

/// Per-opcode counters, indexed by ordinal, plus the global counters.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct AccelStats {
    pub operations: [OperationStats; Opcode::COUNT],
    #[serde(flatten)]
    pub global: GlobalStats,
}

impl AccelStats {
    pub fn operation(&self, opcode: Opcode) -> &OperationStats {
        &self.operations[opcode.ordinal()]
    }

    pub fn merge(&mut self, other: &AccelStats) {
        for (mine, theirs) in self.operations.iter_mut().zip(other.operations.iter()) {
            *mine += theirs;
        }
        self.global += &other.global;
    }

    pub(crate) fn record_operation(&mut self, opcode: Opcode, num_bytes: u64, success: bool) {
        let stats = &mut self.operations[opcode.ordinal()];
        if success {
            stats.executed += 1;
            stats.num_bytes += num_bytes;
        } else {
            stats.failed += 1;
        }
    }

    pub(crate) fn record_retry(&mut self, kind: RetryKind) {
        *self.global.retry.counter(kind) += 1;
    }
}

impl AddAssign<&AccelStats> for AccelStats {
    fn add_assign(&mut self, other: &AccelStats) {
        self.merge(other);
    }
}
