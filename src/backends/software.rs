// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use crate::crypto::{Cipher, TweakMode};
use crate::registry::Opcode;
use crate::traits::AccelModule;

pub const SOFTWARE_MODULE_NAME: &str = "software";

/// The always-available CPU module.
#[derive(Debug, Default, Clone, Copy)]
pub struct SoftwareModule;

impl SoftwareModule {
    pub fn new() -> Self {
        Self
    }
}

impl AccelModule for SoftwareModule {
    fn name(&self) -> &str {
        SOFTWARE_MODULE_NAME
    }

    fn supports_opcode(&self, _opcode: Opcode) -> bool {
        true
    }

    fn priority(&self) -> i32 {
        i32::MIN
    }

    fn crypto_supports_cipher(&self, cipher: Cipher, key_len: usize) -> bool {
        cipher == Cipher::AesXts && cipher.supports_key_len(key_len)
    }

    fn crypto_supports_tweak_mode(&self, _tweak_mode: TweakMode) -> bool {
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_crypto_capabilities() {
        let software = SoftwareModule::new();

        assert!(software.crypto_supports_cipher(Cipher::AesXts, 16));
        assert!(software.crypto_supports_cipher(Cipher::AesXts, 32));
        assert!(!software.crypto_supports_cipher(Cipher::AesXts, 24));
        assert!(!software.crypto_supports_cipher(Cipher::AesCbc, 16));
        assert!(TweakMode::ALL
            .iter()
            .all(|mode| software.crypto_supports_tweak_mode(*mode)));
    }

    #[test]
    fn test_loses_every_priority_tie_break() {
        assert!(SoftwareModule::new().priority() < 0);
    }
}
