// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use std::sync::atomic::{AtomicUsize, Ordering};

use crate::crypto::{Cipher, CryptoKey, TweakMode};
use crate::errors::AccelResult;
use crate::registry::Opcode;
use crate::traits::{AccelDriver, AccelModule};

/// A module with a fixed opcode set for routing tests.
pub struct StubModule {
    name: String,
    opcodes: Vec<Opcode>,
    priority: i32,
    ciphers: Vec<Cipher>,
    tweak_modes: Vec<TweakMode>,
    keys_initialized: AtomicUsize,
    keys_deinitialized: AtomicUsize,
}

impl StubModule {
    pub fn new(name: &str, opcodes: &[Opcode]) -> Self {
        Self {
            name: name.to_string(),
            opcodes: opcodes.to_vec(),
            priority: 0,
            ciphers: Vec::new(),
            tweak_modes: Vec::new(),
            keys_initialized: AtomicUsize::new(0),
            keys_deinitialized: AtomicUsize::new(0),
        }
    }

    pub fn with_priority(mut self, priority: i32) -> Self {
        self.priority = priority;
        self
    }

    /// Accepts the given ciphers (any standard AES key length) and tweak modes.
    pub fn with_crypto(mut self, ciphers: &[Cipher], tweak_modes: &[TweakMode]) -> Self {
        self.ciphers = ciphers.to_vec();
        self.tweak_modes = tweak_modes.to_vec();
        self
    }

    pub fn keys_initialized(&self) -> usize {
        self.keys_initialized.load(Ordering::SeqCst)
    }

    pub fn keys_deinitialized(&self) -> usize {
        self.keys_deinitialized.load(Ordering::SeqCst)
    }
}

impl AccelModule for StubModule {
    fn name(&self) -> &str {
        &self.name
    }

    fn supports_opcode(&self, opcode: Opcode) -> bool {
        self.opcodes.contains(&opcode)
    }

    fn priority(&self) -> i32 {
        self.priority
    }

    fn crypto_supports_cipher(&self, cipher: Cipher, key_len: usize) -> bool {
        self.ciphers.contains(&cipher) && cipher.supports_key_len(key_len)
    }

    fn crypto_supports_tweak_mode(&self, tweak_mode: TweakMode) -> bool {
        self.tweak_modes.contains(&tweak_mode)
    }

    fn crypto_key_init(&self, _key: &CryptoKey) -> AccelResult<()> {
        self.keys_initialized.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    fn crypto_key_deinit(&self, _key: &CryptoKey) {
        self.keys_deinitialized.fetch_add(1, Ordering::SeqCst);
    }
}

/// A named driver that supersedes per-opcode routing when selected.
pub struct StubDriver {
    name: String,
}

impl StubDriver {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
        }
    }
}

impl AccelDriver for StubDriver {
    fn name(&self) -> &str {
        &self.name
    }
}
