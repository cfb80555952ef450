//! QR Code data segment modes (spec §4.7).

use crate::error::{Exceptions, Result};
use crate::qrcode::decoder::version::Version;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Mode {
    Terminator,
    Numeric,
    Alphanumeric,
    StructuredAppend,
    Byte,
    Eci,
    Kanji,
    FNC1FirstPosition,
    FNC1SecondPosition,
    HanziChinese,
}

impl Mode {
    pub const fn bits(self) -> u32 {
        match self {
            Self::Terminator => 0x0,
            Self::Numeric => 0x1,
            Self::Alphanumeric => 0x2,
            Self::StructuredAppend => 0x3,
            Self::Byte => 0x4,
            Self::Eci => 0x7,
            Self::Kanji => 0x8,
            Self::FNC1FirstPosition => 0x5,
            Self::FNC1SecondPosition => 0x9,
            Self::HanziChinese => 0xD,
        }
    }

    pub fn from_bits(bits: u32) -> Result<Self> {
        Ok(match bits {
            0x0 => Self::Terminator,
            0x1 => Self::Numeric,
            0x2 => Self::Alphanumeric,
            0x3 => Self::StructuredAppend,
            0x4 => Self::Byte,
            0x7 => Self::Eci,
            0x8 => Self::Kanji,
            0x5 => Self::FNC1FirstPosition,
            0x9 => Self::FNC1SecondPosition,
            0xD => Self::HanziChinese,
            other => return Err(Exceptions::format_error(format!("unknown mode indicator {other:#x}"))),
        })
    }

    /// Bit width of the character-count field that follows this mode's
    /// indicator, which varies by version tier (1-9, 10-26, 27-40).
    pub fn character_count_bits(self, version: &Version) -> u32 {
        let tier = match version.version_number() {
            1..=9 => 0,
            10..=26 => 1,
            _ => 2,
        };
        match self {
            Self::Numeric => [10, 12, 14][tier],
            Self::Alphanumeric => [9, 11, 13][tier],
            Self::Byte => [8, 16, 16][tier],
            Self::Kanji | Self::HanziChinese => [8, 10, 12][tier],
            _ => 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bits_round_trip_for_every_mode() {
        for mode in [
            Mode::Terminator,
            Mode::Numeric,
            Mode::Alphanumeric,
            Mode::StructuredAppend,
            Mode::Byte,
            Mode::Eci,
            Mode::Kanji,
            Mode::FNC1FirstPosition,
            Mode::FNC1SecondPosition,
            Mode::HanziChinese,
        ] {
            assert_eq!(Mode::from_bits(mode.bits()).unwrap(), mode);
        }
    }

    #[test]
    fn unknown_indicator_is_format_error() {
        assert!(Mode::from_bits(0xA).is_err());
    }
}
