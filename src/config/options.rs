// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Resource-sizing options consumed by the execution layer.

use serde::{Deserialize, Serialize};
use std::sync::{Arc, RwLock};

use crate::config::consts::{
    DEFAULT_BUF_COUNT, DEFAULT_LARGE_CACHE_SIZE, DEFAULT_SEQUENCE_COUNT,
    DEFAULT_SMALL_CACHE_SIZE, DEFAULT_TASK_COUNT,
};
use crate::errors::{AccelError, AccelResult};
use crate::observability::messages::registry::OptionsUpdated;
use crate::observability::messages::StructuredLog;
use crate::registry::LifecycleGate;

/// Full options snapshot.
///
/// # Fields
/// * `small_cache_size` - Small buffers cached per execution context
/// * `large_cache_size` - Large buffers cached per execution context
/// * `task_count` - Tasks in the shared task pool (at least 1)
/// * `sequence_count` - Sequences in the shared sequence pool (at least 1)
/// * `buf_count` - Buffer descriptors in the shared pool (at least 1)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccelOptions {
    pub small_cache_size: u32,
    pub large_cache_size: u32,
    pub task_count: u32,
    pub sequence_count: u32,
    pub buf_count: u32,
}

impl Default for AccelOptions {
    fn default() -> Self {
        Self {
            small_cache_size: DEFAULT_SMALL_CACHE_SIZE,
            large_cache_size: DEFAULT_LARGE_CACHE_SIZE,
            task_count: DEFAULT_TASK_COUNT,
            sequence_count: DEFAULT_SEQUENCE_COUNT,
            buf_count: DEFAULT_BUF_COUNT,
        }
    }
}

impl AccelOptions {
    /// Overlays the supplied fields of `update`; absent fields keep their value.
    pub fn merged(&self, update: &OptionsUpdate) -> AccelOptions {
        AccelOptions {
            small_cache_size: update.small_cache_size.unwrap_or(self.small_cache_size),
            large_cache_size: update.large_cache_size.unwrap_or(self.large_cache_size),
            task_count: update.task_count.unwrap_or(self.task_count),
            sequence_count: update.sequence_count.unwrap_or(self.sequence_count),
            buf_count: update.buf_count.unwrap_or(self.buf_count),
        }
    }

    pub fn validate(&self) -> AccelResult<()> {
        for (field, value) in [
            ("task_count", self.task_count),
            ("sequence_count", self.sequence_count),
            ("buf_count", self.buf_count),
        ] {
            if value == 0 {
                return Err(AccelError::InvalidArgument(format!(
                    "{} must be at least 1",
                    field
                )));
            }
        }
        Ok(())
    }
}

/// Partial options; only the fields that are present are applied.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct OptionsUpdate {
    #[serde(default)]
    pub small_cache_size: Option<u32>,
    #[serde(default)]
    pub large_cache_size: Option<u32>,
    #[serde(default)]
    pub task_count: Option<u32>,
    #[serde(default)]
    pub sequence_count: Option<u32>,
    #[serde(default)]
    pub buf_count: Option<u32>,
}

impl OptionsUpdate {
    pub fn is_empty(&self) -> bool {
        *self == OptionsUpdate::default()
    }
}

/// Holds the current options; updates are merged and swapped in whole.
pub struct OptionsStore {
    current: RwLock<AccelOptions>,
    gate: Arc<LifecycleGate>,
}

impl OptionsStore {
    pub fn new(gate: Arc<LifecycleGate>) -> Self {
        Self {
            current: RwLock::new(AccelOptions::default()),
            gate,
        }
    }

    pub fn current(&self) -> AccelOptions {
        *self.current.read().unwrap_or_else(|e| e.into_inner())
    }

    /// Merges `update` over the current snapshot. STARTUP only.
    pub fn update(&self, update: &OptionsUpdate) -> AccelResult<AccelOptions> {
        let _startup = self.gate.enter_startup("update_options")?;

        let mut current = self.current.write().unwrap_or_else(|e| e.into_inner());
        let merged = current.merged(update);
        merged.validate()?;
        *current = merged;

        OptionsUpdated { options: &merged }.log();
        Ok(merged)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store() -> (OptionsStore, Arc<LifecycleGate>) {
        let gate = Arc::new(LifecycleGate::new());
        (OptionsStore::new(gate.clone()), gate)
    }

    #[test]
    fn test_defaults() {
        let (store, _) = store();
        assert_eq!(store.current(), AccelOptions::default());
        assert_eq!(store.current().task_count, 2048);
    }

    #[test]
    fn test_partial_update_keeps_other_fields() {
        let (store, _) = store();
        store
            .update(&OptionsUpdate {
                small_cache_size: Some(64),
                buf_count: Some(4096),
                ..Default::default()
            })
            .unwrap();

        // A later update must not revert earlier fields to the built-in defaults
        let updated = store
            .update(&OptionsUpdate {
                task_count: Some(512),
                ..Default::default()
            })
            .unwrap();

        assert_eq!(
            updated,
            AccelOptions {
                small_cache_size: 64,
                large_cache_size: 16,
                task_count: 512,
                sequence_count: 2048,
                buf_count: 4096,
            }
        );
        assert_eq!(store.current(), updated);
    }

    #[test]
    fn test_buf_count_alone_is_independent_of_cache_sizes() {
        let (store, _) = store();
        let updated = store
            .update(&OptionsUpdate {
                buf_count: Some(64),
                ..Default::default()
            })
            .unwrap();

        assert_eq!(updated.buf_count, 64);
        assert_eq!(updated.small_cache_size, 128);
        assert_eq!(updated.large_cache_size, 16);
        assert_eq!(store.current(), updated);
    }

    #[test]
    fn test_invalid_updates_table_driven() {
        let test_cases = vec![
            (
                "zero task_count",
                OptionsUpdate {
                    task_count: Some(0),
                    ..Default::default()
                },
            ),
            (
                "zero sequence_count",
                OptionsUpdate {
                    sequence_count: Some(0),
                    ..Default::default()
                },
            ),
            (
                "zero buf_count",
                OptionsUpdate {
                    buf_count: Some(0),
                    ..Default::default()
                },
            ),
        ];

        for (name, update) in test_cases {
            let (store, _) = store();
            let result = store.update(&update);
            assert!(
                matches!(result, Err(AccelError::InvalidArgument(_))),
                "Test case '{}': expected InvalidArgument, got {:?}",
                name,
                result
            );
            assert_eq!(store.current(), AccelOptions::default(), "Test case '{}'", name);
        }
    }

    #[test]
    fn test_zero_cache_sizes_allowed() {
        let (store, _) = store();
        let updated = store
            .update(&OptionsUpdate {
                small_cache_size: Some(0),
                large_cache_size: Some(0),
                ..Default::default()
            })
            .unwrap();
        assert_eq!(updated.small_cache_size, 0);
        assert_eq!(updated.large_cache_size, 0);
    }

    #[test]
    fn test_update_rejected_at_runtime() {
        let (store, gate) = store();
        gate.start_serving().unwrap();

        let result = store.update(&OptionsUpdate {
            task_count: Some(16),
            ..Default::default()
        });
        assert!(matches!(result, Err(AccelError::PhaseViolation { .. })));
        assert_eq!(store.current(), AccelOptions::default());
    }

    #[test]
    fn test_update_deserializes_partial_yaml() {
        let update: OptionsUpdate = serde_yaml::from_str("task_count: 4096\n").unwrap();
        assert_eq!(update.task_count, Some(4096));
        assert_eq!(update.buf_count, None);
        assert!(!update.is_empty());

        let unknown: Result<OptionsUpdate, _> = serde_yaml::from_str("iobuf_count: 1\n");
        assert!(unknown.is_err());
    }
}
