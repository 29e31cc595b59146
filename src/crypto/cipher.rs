// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Supported ciphers and tweak modes, with their key-length rules.

use serde::Serialize;
use std::fmt::{Display, Formatter};
use std::str::FromStr;

use crate::errors::AccelError;

/// AES key sizes accepted by every cipher, in bytes.
pub const AES_KEY_SIZES: [usize; 2] = [16, 32];

/// Longest hex string accepted for a single key (a 256-bit key).
pub const MAX_HEX_KEY_LEN: usize = 64;

/// Block cipher modes a crypto key can be created for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Cipher {
    #[serde(rename = "AES_CBC")]
    AesCbc,
    #[serde(rename = "AES_XTS")]
    AesXts,
}

impl Cipher {
    pub fn name(self) -> &'static str {
        match self {
            Cipher::AesCbc => "AES_CBC",
            Cipher::AesXts => "AES_XTS",
        }
    }

    /// Whether the cipher takes a second key (the XTS tweak key).
    pub fn requires_key2(self) -> bool {
        matches!(self, Cipher::AesXts)
    }

    pub fn supports_key_len(self, len: usize) -> bool {
        AES_KEY_SIZES.contains(&len)
    }

    /// Tweak mode used when the caller does not name one.
    pub fn default_tweak_mode(self) -> Option<TweakMode> {
        match self {
            Cipher::AesCbc => None,
            Cipher::AesXts => Some(TweakMode::SimpleLba),
        }
    }

    pub fn accepts_tweak_mode(self) -> bool {
        matches!(self, Cipher::AesXts)
    }
}

impl Display for Cipher {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Cipher {
    type Err = AccelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "AES_CBC" => Ok(Cipher::AesCbc),
            "AES_XTS" => Ok(Cipher::AesXts),
            other => Err(AccelError::InvalidArgument(format!(
                "unsupported cipher '{}'",
                other
            ))),
        }
    }
}

/// How the XTS tweak is derived from the logical block address.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TweakMode {
    /// LBA in the lower 64 bits, upper 64 bits zero.
    SimpleLba,
    /// Negated LBA in the upper 64 bits, LBA in the lower 64 bits.
    JoinNegLbaWithLba,
    /// Full 128-bit tweak incremented once per 512-byte block.
    Incr512FullLba,
    /// Upper 64 bits incremented once per 512-byte block.
    Incr512UpperLba,
}

impl TweakMode {
    pub const ALL: [TweakMode; 4] = [
        TweakMode::SimpleLba,
        TweakMode::JoinNegLbaWithLba,
        TweakMode::Incr512FullLba,
        TweakMode::Incr512UpperLba,
    ];

    pub fn name(self) -> &'static str {
        match self {
            TweakMode::SimpleLba => "SIMPLE_LBA",
            TweakMode::JoinNegLbaWithLba => "JOIN_NEG_LBA_WITH_LBA",
            TweakMode::Incr512FullLba => "INCR_512_FULL_LBA",
            TweakMode::Incr512UpperLba => "INCR_512_UPPER_LBA",
        }
    }

    /// Parses a tweak mode name; `None` for names outside the enumeration.
    pub fn parse(s: &str) -> Option<TweakMode> {
        TweakMode::ALL.iter().copied().find(|mode| mode.name() == s)
    }
}

impl Display for TweakMode {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cipher_parse() {
        assert_eq!("AES_XTS".parse::<Cipher>(), Ok(Cipher::AesXts));
        assert_eq!("AES_CBC".parse::<Cipher>(), Ok(Cipher::AesCbc));
        assert!(matches!(
            "aes_xts".parse::<Cipher>(),
            Err(AccelError::InvalidArgument(_))
        ));
    }

    #[test]
    fn test_cipher_rules() {
        assert!(Cipher::AesXts.requires_key2());
        assert!(!Cipher::AesCbc.requires_key2());
        assert!(Cipher::AesCbc.supports_key_len(16));
        assert!(Cipher::AesCbc.supports_key_len(32));
        assert!(!Cipher::AesCbc.supports_key_len(24));
        assert_eq!(Cipher::AesXts.default_tweak_mode(), Some(TweakMode::SimpleLba));
        assert_eq!(Cipher::AesCbc.default_tweak_mode(), None);
    }

    #[test]
    fn test_tweak_mode_names_round_trip() {
        for mode in TweakMode::ALL {
            assert_eq!(TweakMode::parse(mode.name()), Some(mode));
        }
        assert_eq!(TweakMode::parse("FANCY_LBA"), None);
    }
}
