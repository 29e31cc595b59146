// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

pub mod aggregator;
pub mod context;
pub mod stats;

pub use aggregator::{StatsAggregator, StatsReport};
pub use context::{ContextId, ExecutionContext};
pub use stats::{AccelStats, GlobalStats, OperationStats, RetryKind, RetryStats};
