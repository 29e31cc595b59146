// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Named data-encryption keys consumed by encrypt/decrypt backends.
//!
//! Keys are validated against the module currently assigned to `encrypt`
//! (which must also own `decrypt`). Destruction is refused while any
//! [`KeyLease`] is outstanding; the entry is removed and its material wiped
//! only when the store holds the last reference.

use std::collections::BTreeMap;
use std::sync::{Arc, RwLock, RwLockReadGuard};

use crate::crypto::cipher::{Cipher, TweakMode};
use crate::crypto::key::{CryptoKey, CryptoKeyDescriptor, CryptoKeyParams, KeyLease, KeyMaterial};
use crate::errors::{AccelError, AccelResult};
use crate::observability::messages::crypto::{
    CryptoKeyCreateRequested, CryptoKeyCreated, CryptoKeyDestroyRefused, CryptoKeyDestroyed,
    CryptoKeyRejected,
};
use crate::observability::messages::StructuredLog;
use crate::registry::{Opcode, OpcodeRegistry};

const KEY_KIND: &str = "crypto key";

#[derive(Default)]
pub struct CryptoKeyStore {
    keys: RwLock<BTreeMap<String, Arc<CryptoKey>>>,
}

impl CryptoKeyStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Validates `params` and stores the resulting key.
    pub fn create(&self, mut params: CryptoKeyParams, registry: &OpcodeRegistry) -> AccelResult<()> {
        self.create_from(&mut params, registry)
    }

    /// Like [`create`](Self::create), but leaves `params` with its hex
    /// buffers wiped on every return path.
    pub(crate) fn create_from(
        &self,
        params: &mut CryptoKeyParams,
        registry: &OpcodeRegistry,
    ) -> AccelResult<()> {
        let request = CryptoKeyCreateRequested {
            key_name: &params.name,
            cipher: &params.cipher,
        };
        let span = request.span("crypto_key_create");
        let _guard = span.enter();
        request.log();

        let result = self.create_inner(params, registry);
        params.wipe();
        if let Err(error) = &result {
            CryptoKeyRejected {
                key_name: &params.name,
                error,
            }
            .log();
        }
        result
    }

    fn create_inner(&self, params: &CryptoKeyParams, registry: &OpcodeRegistry) -> AccelResult<()> {
        if params.name.is_empty() {
            return Err(AccelError::InvalidArgument(
                "crypto key name must not be empty".to_string(),
            ));
        }
        if self.read().contains_key(&params.name) {
            return Err(AccelError::duplicate(KEY_KIND, params.name.as_str()));
        }

        let cipher = params.cipher.parse::<Cipher>()?;
        let key = KeyMaterial::from_hex("key", &params.hex_key)?;
        if !cipher.supports_key_len(key.len()) {
            return Err(AccelError::InvalidArgument(format!(
                "{} does not accept a {}-byte key",
                cipher,
                key.len()
            )));
        }

        let key2 = match (&params.hex_key2, cipher.requires_key2()) {
            (Some(hex_key2), true) => {
                let key2 = KeyMaterial::from_hex("key2", hex_key2)?;
                if key2.len() != key.len() {
                    return Err(AccelError::InvalidArgument(format!(
                        "key2 length {} does not match key length {}",
                        key2.len(),
                        key.len()
                    )));
                }
                if key2.as_bytes() == key.as_bytes() {
                    return Err(AccelError::InvalidArgument(format!(
                        "{} requires key and key2 to differ",
                        cipher
                    )));
                }
                Some(key2)
            }
            (None, true) => {
                return Err(AccelError::InvalidArgument(format!(
                    "{} requires key2",
                    cipher
                )))
            }
            (Some(_), false) => {
                return Err(AccelError::InvalidArgument(format!(
                    "{} does not take key2",
                    cipher
                )))
            }
            (None, false) => None,
        };

        let tweak_mode = resolve_tweak_mode(cipher, params.tweak_mode.as_deref())?;

        let module = registry.assigned_module(Opcode::Encrypt)?;
        let decrypt_module = registry.assigned_module(Opcode::Decrypt)?;
        if module.name() != decrypt_module.name() {
            return Err(AccelError::InvalidArgument(format!(
                "encrypt is assigned to '{}' but decrypt is assigned to '{}'",
                module.name(),
                decrypt_module.name()
            )));
        }
        if !module.crypto_supports_cipher(cipher, key.len()) {
            return Err(AccelError::InvalidArgument(format!(
                "module '{}' does not support {} with a {}-byte key",
                module.name(),
                cipher,
                key.len()
            )));
        }
        if let Some(mode) = tweak_mode {
            if !module.crypto_supports_tweak_mode(mode) {
                return Err(AccelError::UnsupportedTweakMode {
                    cipher: cipher.name().to_string(),
                    tweak_mode: mode.name().to_string(),
                });
            }
        }

        let crypto_key = CryptoKey::new(
            params.name.clone(),
            cipher,
            key,
            key2,
            tweak_mode,
            module.name().to_string(),
        );
        module.crypto_key_init(&crypto_key)?;

        let mut keys = self.keys.write().unwrap_or_else(|e| e.into_inner());
        if keys.contains_key(&params.name) {
            drop(keys);
            module.crypto_key_deinit(&crypto_key);
            return Err(AccelError::duplicate(KEY_KIND, params.name.as_str()));
        }
        keys.insert(params.name.clone(), Arc::new(crypto_key));
        drop(keys);

        CryptoKeyCreated {
            key_name: &params.name,
            cipher,
            tweak_mode,
            module: module.name(),
        }
        .log();
        Ok(())
    }

    /// Redacted view of one key.
    pub fn get(&self, name: &str) -> AccelResult<CryptoKeyDescriptor> {
        self.read()
            .get(name)
            .map(|key| key.descriptor())
            .ok_or_else(|| AccelError::not_found(KEY_KIND, name))
    }

    /// Redacted views of every key, sorted by name.
    pub fn list_all(&self) -> Vec<CryptoKeyDescriptor> {
        self.read().values().map(|key| key.descriptor()).collect()
    }

    /// Takes a reference for an in-flight operation.
    pub fn acquire(&self, name: &str) -> AccelResult<KeyLease> {
        self.read()
            .get(name)
            .cloned()
            .map(KeyLease::new)
            .ok_or_else(|| AccelError::not_found(KEY_KIND, name))
    }

    /// Removes the key and wipes its material.
    ///
    /// Refused with `KeyInUse` while any lease is outstanding.
    pub fn destroy(&self, name: &str, registry: &OpcodeRegistry) -> AccelResult<()> {
        self.remove_and_wipe(name, registry).map(drop)
    }

    /// Detaches the last reference, runs the module's deinit hook and wipes
    /// the material before handing the emptied key back.
    fn remove_and_wipe(&self, name: &str, registry: &OpcodeRegistry) -> AccelResult<CryptoKey> {
        let mut keys = self.keys.write().unwrap_or_else(|e| e.into_inner());
        let entry = keys
            .get(name)
            .ok_or_else(|| AccelError::not_found(KEY_KIND, name))?;

        // Leases are only created under the read lock, so the count cannot grow here
        let leases = Arc::strong_count(entry) - 1;
        if leases > 0 {
            CryptoKeyDestroyRefused {
                key_name: name,
                leases,
            }
            .log();
            return Err(AccelError::KeyInUse {
                name: name.to_string(),
                leases,
            });
        }

        let entry = keys
            .remove(name)
            .ok_or_else(|| AccelError::not_found(KEY_KIND, name))?;
        let mut key = match Arc::try_unwrap(entry) {
            Ok(key) => key,
            Err(entry) => {
                let leases = Arc::strong_count(&entry) - 1;
                keys.insert(name.to_string(), entry);
                return Err(AccelError::KeyInUse {
                    name: name.to_string(),
                    leases,
                });
            }
        };
        drop(keys);

        if let Ok(module) = registry.module(key.module_name()) {
            module.crypto_key_deinit(&key);
        }
        key.wipe();
        CryptoKeyDestroyed {
            key_name: name,
            module: key.module_name(),
        }
        .log();
        Ok(key)
    }

    pub fn len(&self) -> usize {
        self.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.read().is_empty()
    }

    fn read(&self) -> RwLockReadGuard<'_, BTreeMap<String, Arc<CryptoKey>>> {
        self.keys.read().unwrap_or_else(|e| e.into_inner())
    }
}

fn resolve_tweak_mode(cipher: Cipher, requested: Option<&str>) -> AccelResult<Option<TweakMode>> {
    let Some(requested) = requested else {
        return Ok(cipher.default_tweak_mode());
    };

    let unsupported = || AccelError::UnsupportedTweakMode {
        cipher: cipher.name().to_string(),
        tweak_mode: requested.to_string(),
    };
    let mode = TweakMode::parse(requested).ok_or_else(unsupported)?;
    if !cipher.accepts_tweak_mode() {
        return Err(unsupported());
    }
    Ok(Some(mode))
}
