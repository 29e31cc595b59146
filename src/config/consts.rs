// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

/// Default per-context cache of small I/O buffers
pub const DEFAULT_SMALL_CACHE_SIZE: u32 = 128;
/// Default per-context cache of large I/O buffers
pub const DEFAULT_LARGE_CACHE_SIZE: u32 = 16;
/// Default size of the task pool
pub const DEFAULT_TASK_COUNT: u32 = 2048;
/// Default size of the sequence pool
pub const DEFAULT_SEQUENCE_COUNT: u32 = 2048;
/// Default size of the buffer-descriptor pool
pub const DEFAULT_BUF_COUNT: u32 = 2048;
/// Default time a stats probe waits for a context to answer (milliseconds)
pub const DEFAULT_PROBE_TIMEOUT_MS: u64 = 500;
