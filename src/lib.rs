// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

pub mod backends;      // software module + test stubs
pub mod config;        // options, startup config files
pub mod crypto;        // key store
pub mod engine;        // execution contexts + stats aggregation
pub mod errors;        // error handling
pub mod framework;     // the owned control-plane handle
pub mod observability;
pub mod registry;      // opcodes, assignments, driver, lifecycle
pub mod traits;        // module + driver abstractions
