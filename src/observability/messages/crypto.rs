// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Message types for crypto key lifecycle events. Only key names, ciphers
//! and module names are ever logged.

use crate::crypto::{Cipher, TweakMode};
use crate::errors::AccelError;
use crate::observability::messages::StructuredLog;
use std::fmt::{Display, Formatter};
use tracing::Span;

/// A create request arrived. Its span wraps validation and module init.
pub struct CryptoKeyCreateRequested<'a> {
    pub key_name: &'a str,
    pub cipher: &'a str,
}

impl Display for CryptoKeyCreateRequested<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Creating crypto key '{}' with cipher {}",
            self.key_name, self.cipher
        )
    }
}

impl StructuredLog for CryptoKeyCreateRequested<'_> {
    fn log(&self) {
        tracing::debug!(key_name = self.key_name, cipher = self.cipher, "{}", self);
    }

    fn span(&self, name: &str) -> Span {
        tracing::info_span!(
            "crypto_key_create",
            span_name = name,
            key_name = self.key_name,
            cipher = self.cipher,
        )
    }
}

pub struct CryptoKeyCreated<'a> {
    pub key_name: &'a str,
    pub cipher: Cipher,
    pub tweak_mode: Option<TweakMode>,
    pub module: &'a str,
}

impl Display for CryptoKeyCreated<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Created crypto key '{}' ({}) on module '{}'",
            self.key_name, self.cipher, self.module
        )
    }
}

impl StructuredLog for CryptoKeyCreated<'_> {
    fn log(&self) {
        tracing::info!(
            key_name = self.key_name,
            cipher = self.cipher.name(),
            tweak_mode = self.tweak_mode.map(TweakMode::name),
            module = self.module,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::info_span!(
            "crypto_key",
            span_name = name,
            key_name = self.key_name,
            cipher = self.cipher.name(),
            module = self.module,
        )
    }
}

/// Creation failed validation or the module refused the key.
pub struct CryptoKeyRejected<'a> {
    pub key_name: &'a str,
    pub error: &'a AccelError,
}

impl Display for CryptoKeyRejected<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(f, "Rejected crypto key '{}': {}", self.key_name, self.error)
    }
}

impl StructuredLog for CryptoKeyRejected<'_> {
    fn log(&self) {
        tracing::warn!(key_name = self.key_name, error = %self.error, "{}", self);
    }

    fn span(&self, name: &str) -> Span {
        tracing::warn_span!(
            "crypto_key_rejected",
            span_name = name,
            key_name = self.key_name,
            error = %self.error,
        )
    }
}

pub struct CryptoKeyDestroyed<'a> {
    pub key_name: &'a str,
    pub module: &'a str,
}

impl Display for CryptoKeyDestroyed<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Destroyed crypto key '{}' on module '{}'",
            self.key_name, self.module
        )
    }
}

impl StructuredLog for CryptoKeyDestroyed<'_> {
    fn log(&self) {
        tracing::info!(key_name = self.key_name, module = self.module, "{}", self);
    }

    fn span(&self, name: &str) -> Span {
        tracing::info_span!(
            "crypto_key_destroyed",
            span_name = name,
            key_name = self.key_name,
            module = self.module,
        )
    }
}

/// Destroy was refused because operations still hold the key.
pub struct CryptoKeyDestroyRefused<'a> {
    pub key_name: &'a str,
    pub leases: usize,
}

impl Display for CryptoKeyDestroyRefused<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Refused to destroy crypto key '{}': {} lease(s) outstanding",
            self.key_name, self.leases
        )
    }
}

impl StructuredLog for CryptoKeyDestroyRefused<'_> {
    fn log(&self) {
        tracing::warn!(key_name = self.key_name, leases = self.leases, "{}", self);
    }

    fn span(&self, name: &str) -> Span {
        tracing::warn_span!(
            "crypto_key_destroy_refused",
            span_name = name,
            key_name = self.key_name,
            leases = self.leases,
        )
    }
}
