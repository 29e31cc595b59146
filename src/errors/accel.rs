// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Error type shared by every control-plane operation.
//!
//! All administrative operations are synchronous and return a definitive
//! success or one of these kinds. Nothing here retries internally.

use thiserror::Error;

use crate::registry::Phase;

/// Failure kinds for registry, driver, options, crypto key, and stats operations.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AccelError {
    /// Malformed or out-of-range input.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// Unknown opcode, module, driver, or key.
    #[error("{kind} '{name}' not found")]
    NotFound { kind: &'static str, name: String },

    /// A name that must be unique is already taken.
    #[error("{kind} '{name}' already exists")]
    DuplicateName { kind: &'static str, name: String },

    /// The assignment target cannot perform the requested work.
    #[error("Module '{module}' cannot execute {what}")]
    ModuleIncapable { module: String, what: String },

    /// Tweak mode is unknown or not applicable to the cipher.
    #[error("Tweak mode '{tweak_mode}' is not supported for cipher {cipher}")]
    UnsupportedTweakMode { cipher: String, tweak_mode: String },

    /// Structural mutation attempted outside the phase that permits it.
    #[error("'{operation}' is only permitted during {required}, current phase is {current}")]
    PhaseViolation {
        operation: &'static str,
        required: Phase,
        current: Phase,
    },

    /// Scratch state for an aggregation could not be obtained.
    #[error("Resource exhausted: {0}")]
    ResourceExhausted(String),

    /// Key destruction refused while in-flight operations still hold it.
    #[error("Crypto key '{name}' is in use by {leases} in-flight operation(s)")]
    KeyInUse { name: String, leases: usize },
}

impl AccelError {
    pub(crate) fn not_found(kind: &'static str, name: impl Into<String>) -> Self {
        AccelError::NotFound {
            kind,
            name: name.into(),
        }
    }

    pub(crate) fn duplicate(kind: &'static str, name: impl Into<String>) -> Self {
        AccelError::DuplicateName {
            kind,
            name: name.into(),
        }
    }
}

/// Result alias for control-plane operations.
pub type AccelResult<T> = Result<T, AccelError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let test_cases = vec![
            (
                AccelError::not_found("module", "hw0"),
                "module 'hw0' not found",
            ),
            (
                AccelError::duplicate("crypto key", "k1"),
                "crypto key 'k1' already exists",
            ),
            (
                AccelError::PhaseViolation {
                    operation: "assign",
                    required: Phase::Startup,
                    current: Phase::Runtime,
                },
                "'assign' is only permitted during STARTUP, current phase is RUNTIME",
            ),
            (
                AccelError::KeyInUse {
                    name: "k1".to_string(),
                    leases: 2,
                },
                "Crypto key 'k1' is in use by 2 in-flight operation(s)",
            ),
        ];

        for (error, expected) in test_cases {
            assert_eq!(error.to_string(), expected);
        }
    }
}
