// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Crypto key objects and the buffers that carry key material.
//!
//! Every buffer that ever holds raw or hex-encoded key material is a
//! zeroize-on-drop type, so it is wiped on every exit path, including early
//! returns from validation.

use serde::Serialize;
use std::fmt;
use std::ops::Deref;
use std::sync::Arc;
use zeroize::{Zeroize, ZeroizeOnDrop, Zeroizing};

use crate::crypto::cipher::{Cipher, TweakMode, MAX_HEX_KEY_LEN};
use crate::errors::{AccelError, AccelResult};

/// Decoded key bytes, wiped when dropped.
#[derive(Zeroize, ZeroizeOnDrop)]
pub struct KeyMaterial(Box<[u8]>);

impl KeyMaterial {
    /// Decodes a hex string straight into a zeroizing buffer.
    ///
    /// Error messages never echo the input.
    pub fn from_hex(field: &'static str, hex: &str) -> AccelResult<Self> {
        if hex.is_empty() || hex.len() % 2 != 0 || hex.len() > MAX_HEX_KEY_LEN {
            return Err(AccelError::InvalidArgument(format!(
                "{} must be an even-length hex string of at most {} characters",
                field, MAX_HEX_KEY_LEN
            )));
        }

        let mut material = KeyMaterial(vec![0u8; hex.len() / 2].into_boxed_slice());
        hex::decode_to_slice(hex, &mut material.0).map_err(|_| {
            AccelError::InvalidArgument(format!("{} is not a valid hex string", field))
        })?;
        Ok(material)
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Debug for KeyMaterial {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "KeyMaterial([redacted; {} bytes])", self.0.len())
    }
}

/// Caller-supplied parameters for creating a key.
///
/// The store wipes the hex strings once validation finishes, whether
/// creation succeeds or fails; they are wiped again when dropped.
pub struct CryptoKeyParams {
    pub name: String,
    pub cipher: String,
    pub hex_key: Zeroizing<String>,
    pub hex_key2: Option<Zeroizing<String>>,
    pub tweak_mode: Option<String>,
}

impl CryptoKeyParams {
    pub fn new(name: impl Into<String>, cipher: impl Into<String>, hex_key: String) -> Self {
        Self {
            name: name.into(),
            cipher: cipher.into(),
            hex_key: Zeroizing::new(hex_key),
            hex_key2: None,
            tweak_mode: None,
        }
    }

    pub fn with_key2(mut self, hex_key2: String) -> Self {
        self.hex_key2 = Some(Zeroizing::new(hex_key2));
        self
    }

    pub fn with_tweak_mode(mut self, tweak_mode: impl Into<String>) -> Self {
        self.tweak_mode = Some(tweak_mode.into());
        self
    }

    pub(crate) fn wipe(&mut self) {
        self.hex_key.zeroize();
        if let Some(hex_key2) = self.hex_key2.as_mut() {
            hex_key2.zeroize();
        }
    }
}

impl fmt::Debug for CryptoKeyParams {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CryptoKeyParams")
            .field("name", &self.name)
            .field("cipher", &self.cipher)
            .field("tweak_mode", &self.tweak_mode)
            .finish_non_exhaustive()
    }
}

/// Introspection view of a key. Never carries key material.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CryptoKeyDescriptor {
    pub name: String,
    pub cipher: Cipher,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tweak_mode: Option<TweakMode>,
}

/// A validated, stored key.
pub struct CryptoKey {
    name: String,
    cipher: Cipher,
    key: KeyMaterial,
    key2: Option<KeyMaterial>,
    tweak_mode: Option<TweakMode>,
    module_name: String,
}

impl CryptoKey {
    pub(crate) fn new(
        name: String,
        cipher: Cipher,
        key: KeyMaterial,
        key2: Option<KeyMaterial>,
        tweak_mode: Option<TweakMode>,
        module_name: String,
    ) -> Self {
        Self {
            name,
            cipher,
            key,
            key2,
            tweak_mode,
            module_name,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn cipher(&self) -> Cipher {
        self.cipher
    }

    pub fn tweak_mode(&self) -> Option<TweakMode> {
        self.tweak_mode
    }

    /// Module that validated the key and executes operations with it.
    pub fn module_name(&self) -> &str {
        &self.module_name
    }

    /// Primary key bytes, for the backend executing an operation.
    pub fn key(&self) -> &[u8] {
        self.key.as_bytes()
    }

    pub fn key2(&self) -> Option<&[u8]> {
        self.key2.as_ref().map(KeyMaterial::as_bytes)
    }

    /// Zeroes both material buffers in place. Lengths are kept.
    pub(crate) fn wipe(&mut self) {
        self.key.zeroize();
        if let Some(key2) = self.key2.as_mut() {
            key2.zeroize();
        }
    }

    pub fn descriptor(&self) -> CryptoKeyDescriptor {
        CryptoKeyDescriptor {
            name: self.name.clone(),
            cipher: self.cipher,
            tweak_mode: self.tweak_mode,
        }
    }
}

impl fmt::Debug for CryptoKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CryptoKey")
            .field("name", &self.name)
            .field("cipher", &self.cipher)
            .field("tweak_mode", &self.tweak_mode)
            .field("module_name", &self.module_name)
            .finish_non_exhaustive()
    }
}

/// A live reference to a stored key held by an in-flight operation.
///
/// While any lease exists the key cannot be destroyed.
pub struct KeyLease {
    key: Arc<CryptoKey>,
}

impl KeyLease {
    pub(crate) fn new(key: Arc<CryptoKey>) -> Self {
        Self { key }
    }
}

impl Deref for KeyLease {
    type Target = CryptoKey;

    fn deref(&self) -> &CryptoKey {
        &self.key
    }
}

impl fmt::Debug for KeyLease {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("KeyLease").field(&self.key.name).finish()
    }
}
