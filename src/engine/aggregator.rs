// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Scatter/gather reduction of per-context counters into one snapshot.

use serde::Serialize;
use std::time::Duration;
use tokio::runtime::Handle;
use tokio::sync::mpsc::error::TrySendError;
use tokio::sync::oneshot;
use tokio::time::{timeout_at, Instant};
use tracing::{Instrument, Span};

use crate::engine::context::{lock_hub, register, ContextId, ExecutionContext, HubState, StatsHub, StatsProbe};
use crate::engine::stats::AccelStats;
use crate::errors::{AccelError, AccelResult};
use crate::observability::messages::stats::{SnapshotCompleted, SnapshotDegraded, SnapshotStarted};
use crate::observability::messages::StructuredLog;

/// Consolidated counters from one aggregation pass.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatsReport {
    pub stats: AccelStats,
    /// Live contexts that answered their probe.
    pub contexts_reported: usize,
    /// Contexts that did not answer before the probe timeout. Their counters
    /// are missing from `stats`.
    pub unresponsive: Vec<ContextId>,
}

impl StatsReport {
    pub fn is_degraded(&self) -> bool {
        !self.unresponsive.is_empty()
    }
}

/// Probes scattered under the hub lock, waiting to be gathered.
struct PendingGather {
    baseline: AccelStats,
    pending: Vec<(ContextId, oneshot::Receiver<AccelStats>)>,
    unresponsive: Vec<ContextId>,
    deadline: Instant,
    span: Span,
}

impl PendingGather {
    async fn gather(self) -> StatsReport {
        let span = self.span.clone();
        self.reduce().instrument(span).await
    }

    async fn reduce(self) -> StatsReport {
        let PendingGather {
            mut baseline,
            pending,
            mut unresponsive,
            deadline,
            span: _,
        } = self;

        let mut contexts_reported = 0;
        for (id, reply) in pending {
            match timeout_at(deadline, reply).await {
                Ok(Ok(stats)) => {
                    baseline.merge(&stats);
                    contexts_reported += 1;
                }
                _ => unresponsive.push(id),
            }
        }
        unresponsive.sort();

        let report = StatsReport {
            stats: baseline,
            contexts_reported,
            unresponsive,
        };
        if report.is_degraded() {
            SnapshotDegraded {
                contexts_reported: report.contexts_reported,
                unresponsive: report.unresponsive.len(),
            }
            .log();
        } else {
            SnapshotCompleted {
                contexts_reported: report.contexts_reported,
            }
            .log();
        }
        report
    }
}

/// Registers execution contexts and produces consolidated snapshots.
#[derive(Clone, Default)]
pub struct StatsAggregator {
    hub: StatsHub,
}

impl StatsAggregator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_probe_timeout(probe_timeout: Duration) -> AccelResult<Self> {
        let aggregator = Self::new();
        aggregator.set_probe_timeout(probe_timeout)?;
        Ok(aggregator)
    }

    /// Creates a context owned by the caller. Its counters start at zero.
    pub fn register_context(&self) -> ExecutionContext {
        register(&self.hub)
    }

    pub fn context_count(&self) -> usize {
        lock_hub(&self.hub).contexts.len()
    }

    pub fn probe_timeout(&self) -> Duration {
        lock_hub(&self.hub).probe_timeout
    }

    pub fn set_probe_timeout(&self, probe_timeout: Duration) -> AccelResult<()> {
        if probe_timeout.is_zero() {
            return Err(AccelError::InvalidArgument(
                "stats probe timeout must be greater than zero".to_string(),
            ));
        }
        lock_hub(&self.hub).probe_timeout = probe_timeout;
        Ok(())
    }

    /// Starts an aggregation and returns immediately.
    ///
    /// `callback` runs exactly once on the tokio runtime with the report. If
    /// the aggregation cannot be started the error is returned here and
    /// `callback` is never invoked.
    pub fn snapshot<F>(&self, callback: F) -> AccelResult<()>
    where
        F: FnOnce(AccelResult<StatsReport>) + Send + 'static,
    {
        let runtime = current_runtime()?;
        let gather = self.scatter()?;
        runtime.spawn(async move {
            callback(Ok(gather.gather().await));
        });
        Ok(())
    }

    /// Starts an aggregation whose result arrives on the returned receiver.
    pub fn request_snapshot(&self) -> oneshot::Receiver<AccelResult<StatsReport>> {
        let (sender, receiver) = oneshot::channel();
        let started = current_runtime().and_then(|runtime| Ok((runtime, self.scatter()?)));
        match started {
            Ok((runtime, gather)) => {
                runtime.spawn(async move {
                    let _ = sender.send(Ok(gather.gather().await));
                });
            }
            Err(error) => {
                let _ = sender.send(Err(error));
            }
        }
        receiver
    }

    /// Aggregates on the calling task.
    ///
    /// The contexts' owners must be serving probes on other tasks or the
    /// call only returns once the probe timeout elapses.
    pub async fn collect(&self) -> AccelResult<StatsReport> {
        Ok(self.scatter()?.gather().await)
    }

    fn scatter(&self) -> AccelResult<PendingGather> {
        let state = lock_hub(&self.hub);
        let (pending, unresponsive) = scatter_probes(&state)?;
        let baseline = state.retired.clone();
        let deadline = Instant::now() + state.probe_timeout;
        drop(state);

        let started = SnapshotStarted {
            contexts: pending.len(),
        };
        let span = started.span("stats_snapshot");
        span.in_scope(|| started.log());

        Ok(PendingGather {
            baseline,
            pending,
            unresponsive,
            deadline,
            span,
        })
    }
}

type ScatteredProbes = (Vec<(ContextId, oneshot::Receiver<AccelStats>)>, Vec<ContextId>);

fn scatter_probes(state: &HubState) -> AccelResult<ScatteredProbes> {
    let mut pending = Vec::new();
    pending.try_reserve(state.contexts.len()).map_err(|e| {
        AccelError::ResourceExhausted(format!("stats scratch space: {}", e))
    })?;

    let mut unresponsive = Vec::new();
    for (id, inbox) in &state.contexts {
        let (reply, answer) = oneshot::channel();
        match inbox.try_send(StatsProbe { reply }) {
            Ok(()) => pending.push((*id, answer)),
            Err(TrySendError::Full(_)) => {
                tracing::debug!(
                    context = %id,
                    "Previous stats request still unanswered; skipping context"
                );
                unresponsive.push(*id);
            }
            Err(TrySendError::Closed(_)) => unresponsive.push(*id),
        }
    }
    Ok((pending, unresponsive))
}

fn current_runtime() -> AccelResult<Handle> {
    Handle::try_current().map_err(|_| {
        AccelError::ResourceExhausted("no async runtime available to gather stats".to_string())
    })
}

impl std::fmt::Debug for StatsAggregator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = lock_hub(&self.hub);
        f.debug_struct("StatsAggregator")
            .field("contexts", &state.contexts.len())
            .field("probe_timeout", &state.probe_timeout)
            .finish()
    }
}
