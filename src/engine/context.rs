// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Execution contexts and the hub that tracks them.
//!
//! A context is owned by exactly one worker. Counters are plain fields
//! mutated through `&mut self`; the aggregator never touches them directly.
//! Instead it drops a probe into the context's inbox and the owner answers
//! it from its event loop with [`ExecutionContext::serve_probes`],
//! [`ExecutionContext::next_probe`] or [`ExecutionContext::serve_until`].
//!
//! Registration, deregistration and probe scattering all happen under the
//! hub lock, so a context is either probed or already folded into the
//! retired totals, never both. Each inbox holds at most one probe; a context
//! that has not answered its last one is skipped rather than queued again.

use serde::Serialize;
use std::collections::HashMap;
use std::fmt::{Display, Formatter};
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;
use tokio::sync::{mpsc, oneshot};
use tokio_util::sync::CancellationToken;

use crate::config::consts::DEFAULT_PROBE_TIMEOUT_MS;
use crate::engine::stats::{AccelStats, RetryKind};
use crate::observability::messages::stats::{ContextRegistered, ContextRetired};
use crate::observability::messages::StructuredLog;
use crate::registry::Opcode;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct ContextId(u64);

impl ContextId {
    pub fn as_u64(self) -> u64 {
        self.0
    }
}

impl Display for ContextId {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(f, "ctx-{}", self.0)
    }
}

/// Requests a context can have queued at once.
pub(crate) const INBOX_CAPACITY: usize = 1;

/// A request for a context's current counters.
pub(crate) struct StatsProbe {
    pub(crate) reply: oneshot::Sender<AccelStats>,
}

pub(crate) struct HubState {
    pub(crate) contexts: HashMap<ContextId, mpsc::Sender<StatsProbe>>,
    pub(crate) retired: AccelStats,
    pub(crate) probe_timeout: Duration,
    next_id: u64,
}

impl Default for HubState {
    fn default() -> Self {
        Self {
            contexts: HashMap::new(),
            retired: AccelStats::default(),
            probe_timeout: Duration::from_millis(DEFAULT_PROBE_TIMEOUT_MS),
            next_id: 0,
        }
    }
}

pub(crate) type StatsHub = Arc<Mutex<HubState>>;

pub(crate) fn lock_hub(hub: &StatsHub) -> MutexGuard<'_, HubState> {
    hub.lock().unwrap_or_else(|e| e.into_inner())
}

pub(crate) fn register(hub: &StatsHub) -> ExecutionContext {
    let (sender, probes) = mpsc::channel(INBOX_CAPACITY);
    let id = {
        let mut state = lock_hub(hub);
        let id = ContextId(state.next_id);
        state.next_id += 1;
        state.contexts.insert(id, sender);
        id
    };
    ContextRegistered {
        context_id: id.as_u64(),
    }
    .log();

    ExecutionContext {
        id,
        stats: AccelStats::default(),
        probes,
        hub: hub.clone(),
    }
}

/// Counters owned by one worker.
///
/// Dropping the context folds its counters into the retired totals and
/// answers any probe still waiting in its inbox.
pub struct ExecutionContext {
    id: ContextId,
    stats: AccelStats,
    probes: mpsc::Receiver<StatsProbe>,
    hub: StatsHub,
}

impl ExecutionContext {
    pub fn id(&self) -> ContextId {
        self.id
    }

    pub fn stats(&self) -> &AccelStats {
        &self.stats
    }

    pub fn record_operation(&mut self, opcode: Opcode, num_bytes: u64, success: bool) {
        self.stats.record_operation(opcode, num_bytes, success);
    }

    pub fn sequence_started(&mut self) {
        self.stats.global.sequence_outstanding += 1;
    }

    pub fn sequence_finished(&mut self, success: bool) {
        let global = &mut self.stats.global;
        global.sequence_outstanding = global.sequence_outstanding.saturating_sub(1);
        if success {
            global.sequence_executed += 1;
        } else {
            global.sequence_failed += 1;
        }
    }

    pub fn task_started(&mut self) {
        self.stats.global.task_outstanding += 1;
    }

    pub fn task_finished(&mut self) {
        let global = &mut self.stats.global;
        global.task_outstanding = global.task_outstanding.saturating_sub(1);
    }

    pub fn record_retry(&mut self, kind: RetryKind) {
        self.stats.record_retry(kind);
    }

    /// Answers every probe already queued without waiting. Returns how many
    /// were answered.
    pub fn serve_probes(&mut self) -> usize {
        let mut served = 0;
        while let Ok(probe) = self.probes.try_recv() {
            let _ = probe.reply.send(self.stats.clone());
            served += 1;
        }
        served
    }

    /// Waits for the next probe and answers it.
    ///
    /// Returns `false` if the inbox is closed.
    pub async fn next_probe(&mut self) -> bool {
        match self.probes.recv().await {
            Some(probe) => {
                let _ = probe.reply.send(self.stats.clone());
                true
            }
            None => false,
        }
    }

    /// Answers probes until `token` is cancelled.
    pub async fn serve_until(&mut self, token: CancellationToken) {
        loop {
            tokio::select! {
                _ = token.cancelled() => break,
                served = self.next_probe() => {
                    if !served {
                        break;
                    }
                }
            }
        }
    }
}

impl Drop for ExecutionContext {
    fn drop(&mut self) {
        {
            let mut state = lock_hub(&self.hub);
            state.contexts.remove(&self.id);
            state.retired.merge(&self.stats);
        }

        // Probes scattered before deregistration still get the final counters
        self.probes.close();
        while let Ok(probe) = self.probes.try_recv() {
            let _ = probe.reply.send(self.stats.clone());
        }

        ContextRetired {
            context_id: self.id.as_u64(),
        }
        .log();
    }
}

impl std::fmt::Debug for ExecutionContext {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ExecutionContext")
            .field("id", &self.id)
            .field("stats", &self.stats)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hub() -> StatsHub {
        Arc::new(Mutex::new(HubState::default()))
    }

    #[test]
    fn test_register_assigns_distinct_ids() {
        let hub = hub();
        let a = register(&hub);
        let b = register(&hub);

        assert_ne!(a.id(), b.id());
        assert_eq!(lock_hub(&hub).contexts.len(), 2);
    }

    #[test]
    fn test_counters_track_sequences_and_tasks() {
        let hub = hub();
        let mut ctx = register(&hub);

        ctx.sequence_started();
        ctx.sequence_started();
        ctx.task_started();
        ctx.sequence_finished(true);
        ctx.task_finished();
        ctx.task_finished();
        ctx.record_retry(RetryKind::Bufdesc);

        let global = &ctx.stats().global;
        assert_eq!(global.sequence_outstanding, 1);
        assert_eq!(global.sequence_executed, 1);
        assert_eq!(global.sequence_failed, 0);
        assert_eq!(global.task_outstanding, 0);
        assert_eq!(global.retry.bufdesc, 1);
    }

    #[test]
    fn test_serve_probes_answers_queued_probes() {
        let hub = hub();
        let mut ctx = register(&hub);
        ctx.record_operation(Opcode::Fill, 64, true);

        let (reply, mut answer) = oneshot::channel();
        let sender = lock_hub(&hub).contexts[&ctx.id()].clone();
        assert!(sender.try_send(StatsProbe { reply }).is_ok());

        assert_eq!(ctx.serve_probes(), 1);
        assert_eq!(ctx.serve_probes(), 0);
        let stats = answer.try_recv().unwrap();
        assert_eq!(stats.operation(Opcode::Fill).executed, 1);
    }

    #[test]
    fn test_inbox_holds_one_unanswered_request() {
        let hub = hub();
        let mut ctx = register(&hub);
        let sender = lock_hub(&hub).contexts[&ctx.id()].clone();

        let (first, _first_answer) = oneshot::channel();
        assert!(sender.try_send(StatsProbe { reply: first }).is_ok());
        let (second, _second_answer) = oneshot::channel();
        assert!(matches!(
            sender.try_send(StatsProbe { reply: second }),
            Err(mpsc::error::TrySendError::Full(_))
        ));

        assert_eq!(ctx.serve_probes(), 1);
        let (third, _third_answer) = oneshot::channel();
        assert!(sender.try_send(StatsProbe { reply: third }).is_ok());
    }

    #[test]
    fn test_drop_folds_into_retired_and_answers_pending_probe() {
        let hub = hub();
        let mut ctx = register(&hub);
        ctx.record_operation(Opcode::Compare, 8, true);

        let (reply, mut answer) = oneshot::channel();
        let sender = lock_hub(&hub).contexts[&ctx.id()].clone();
        assert!(sender.try_send(StatsProbe { reply }).is_ok());
        drop(ctx);

        let state = lock_hub(&hub);
        assert!(state.contexts.is_empty());
        assert_eq!(state.retired.operation(Opcode::Compare).executed, 1);
        assert_eq!(
            answer.try_recv().unwrap().operation(Opcode::Compare).executed,
            1
        );
    }

    #[tokio::test]
    async fn test_serve_until_stops_on_cancel() {
        let hub = hub();
        let mut ctx = register(&hub);
        let token = CancellationToken::new();

        let worker = {
            let token = token.clone();
            tokio::spawn(async move {
                ctx.serve_until(token).await;
                ctx.id()
            })
        };
        token.cancel();

        assert_eq!(worker.await.unwrap(), ContextId(0));
    }
}
