// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use crate::crypto::{Cipher, CryptoKey, TweakMode};
use crate::errors::AccelResult;
use crate::registry::Opcode;

/// A backend implementation that executes some subset of opcodes.
///
/// Modules are registered once when the framework is built and are never
/// removed. The crypto hooks only matter for modules that can be assigned
/// `encrypt`/`decrypt`; the defaults describe a module with no crypto support.
pub trait AccelModule: Send + Sync {
    /// Unique module name.
    fn name(&self) -> &str;

    fn supports_opcode(&self, opcode: Opcode) -> bool;

    /// Default-assignment preference; the highest capable module wins.
    fn priority(&self) -> i32 {
        0
    }

    fn crypto_supports_cipher(&self, _cipher: Cipher, _key_len: usize) -> bool {
        false
    }

    fn crypto_supports_tweak_mode(&self, _tweak_mode: TweakMode) -> bool {
        false
    }

    /// Called once a key has passed validation, before it becomes visible.
    fn crypto_key_init(&self, _key: &CryptoKey) -> AccelResult<()> {
        Ok(())
    }

    /// Called when a key is destroyed, before its material is zeroed.
    fn crypto_key_deinit(&self, _key: &CryptoKey) {}
}
