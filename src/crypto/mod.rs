// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

pub mod cipher;
pub mod key;
pub mod store;

pub use cipher::{Cipher, TweakMode};
pub use key::{CryptoKey, CryptoKeyDescriptor, CryptoKeyParams, KeyLease, KeyMaterial};
pub use store::CryptoKeyStore;
