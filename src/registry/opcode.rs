// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! The closed set of acceleration operation kinds.

use serde::{Serialize, Serializer};
use std::fmt::{Display, Formatter};
use std::str::FromStr;

use crate::errors::{AccelError, AccelResult};

/// Operation kinds that a module can execute.
///
/// The discriminant is the opcode's ordinal and is used to index per-opcode
/// tables. [`Opcode::COUNT`] marks the end of the enumeration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(u32)]
pub enum Opcode {
    Copy = 0,
    Fill,
    Dualcast,
    Compare,
    Crc32c,
    CopyCrc32c,
    Compress,
    Decompress,
    Encrypt,
    Decrypt,
    Xor,
    DifVerify,
    DifVerifyCopy,
    DifGenerate,
    DifGenerateCopy,
    DixGenerate,
    DixVerify,
}

impl Opcode {
    /// Number of opcodes; one past the highest ordinal.
    pub const COUNT: usize = 17;

    /// Every opcode in ordinal order.
    pub const ALL: [Opcode; Opcode::COUNT] = [
        Opcode::Copy,
        Opcode::Fill,
        Opcode::Dualcast,
        Opcode::Compare,
        Opcode::Crc32c,
        Opcode::CopyCrc32c,
        Opcode::Compress,
        Opcode::Decompress,
        Opcode::Encrypt,
        Opcode::Decrypt,
        Opcode::Xor,
        Opcode::DifVerify,
        Opcode::DifVerifyCopy,
        Opcode::DifGenerate,
        Opcode::DifGenerateCopy,
        Opcode::DixGenerate,
        Opcode::DixVerify,
    ];

    /// Stable display name.
    pub fn name(self) -> &'static str {
        match self {
            Opcode::Copy => "copy",
            Opcode::Fill => "fill",
            Opcode::Dualcast => "dualcast",
            Opcode::Compare => "compare",
            Opcode::Crc32c => "crc32c",
            Opcode::CopyCrc32c => "copy_crc32c",
            Opcode::Compress => "compress",
            Opcode::Decompress => "decompress",
            Opcode::Encrypt => "encrypt",
            Opcode::Decrypt => "decrypt",
            Opcode::Xor => "xor",
            Opcode::DifVerify => "dif_verify",
            Opcode::DifVerifyCopy => "dif_verify_copy",
            Opcode::DifGenerate => "dif_generate",
            Opcode::DifGenerateCopy => "dif_generate_copy",
            Opcode::DixGenerate => "dix_generate",
            Opcode::DixVerify => "dix_verify",
        }
    }

    /// Table index for this opcode.
    pub fn ordinal(self) -> usize {
        self as usize
    }

    /// Looks up an opcode by raw ordinal. Out-of-range values are a caller error.
    pub fn from_ordinal(ordinal: u32) -> AccelResult<Opcode> {
        Opcode::ALL
            .get(ordinal as usize)
            .copied()
            .ok_or_else(|| {
                AccelError::InvalidArgument(format!(
                    "opcode ordinal {} is out of range (0..{})",
                    ordinal,
                    Opcode::COUNT
                ))
            })
    }
}

impl Display for Opcode {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Opcode {
    type Err = AccelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Opcode::ALL
            .iter()
            .copied()
            .find(|op| op.name() == s)
            .ok_or_else(|| AccelError::InvalidArgument(format!("unknown opcode name '{}'", s)))
    }
}

impl Serialize for Opcode {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ordinals_match_table_positions() {
        for (index, op) in Opcode::ALL.iter().enumerate() {
            assert_eq!(op.ordinal(), index, "opcode {} out of place", op);
        }
    }

    #[test]
    fn test_names_are_unique_and_parse_back() {
        let mut seen = std::collections::HashSet::new();
        for op in Opcode::ALL {
            assert!(seen.insert(op.name()), "duplicate name {}", op.name());
            assert_eq!(op.name().parse::<Opcode>(), Ok(op));
        }
    }

    #[test]
    fn test_from_ordinal_bounds() {
        assert_eq!(Opcode::from_ordinal(0), Ok(Opcode::Copy));
        assert_eq!(
            Opcode::from_ordinal(Opcode::COUNT as u32 - 1),
            Ok(Opcode::DixVerify)
        );
        assert!(matches!(
            Opcode::from_ordinal(Opcode::COUNT as u32),
            Err(AccelError::InvalidArgument(_))
        ));
        assert!(matches!(
            Opcode::from_ordinal(u32::MAX),
            Err(AccelError::InvalidArgument(_))
        ));
    }

    #[test]
    fn test_unknown_name_is_invalid_argument() {
        assert!(matches!(
            "crc64".parse::<Opcode>(),
            Err(AccelError::InvalidArgument(_))
        ));
    }

    #[test]
    fn test_serializes_as_name() {
        let json = serde_json::to_string(&Opcode::CopyCrc32c).unwrap();
        assert_eq!(json, "\"copy_crc32c\"");
    }
}
