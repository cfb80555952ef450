//! The eight XOR data masks a QR Code encoder may apply to its data region
//! to avoid misleading finder-pattern-like runs (spec §4.7, ISO/IEC 18004
//! table 10).

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DataMask {
    Mask000,
    Mask001,
    Mask010,
    Mask011,
    Mask100,
    Mask101,
    Mask110,
    Mask111,
}

impl DataMask {
    pub fn for_reference(reference: u8) -> Option<Self> {
        Some(match reference {
            0 => Self::Mask000,
            1 => Self::Mask001,
            2 => Self::Mask010,
            3 => Self::Mask011,
            4 => Self::Mask100,
            5 => Self::Mask101,
            6 => Self::Mask110,
            7 => Self::Mask111,
            _ => return None,
        })
    }

    /// Whether module (i = row, j = column) should be flipped.
    pub const fn is_masked(self, i: u32, j: u32) -> bool {
        match self {
            Self::Mask000 => (i + j) % 2 == 0,
            Self::Mask001 => i % 2 == 0,
            Self::Mask010 => j % 3 == 0,
            Self::Mask011 => (i + j) % 3 == 0,
            Self::Mask100 => (i / 2 + j / 3) % 2 == 0,
            Self::Mask101 => (i * j) % 2 + (i * j) % 3 == 0,
            Self::Mask110 => ((i * j) % 2 + (i * j) % 3) % 2 == 0,
            Self::Mask111 => ((i + j) % 2 + (i * j) % 3) % 2 == 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mask000_checkerboards_on_sum_parity() {
        assert!(DataMask::Mask000.is_masked(0, 0));
        assert!(!DataMask::Mask000.is_masked(0, 1));
    }

    #[test]
    fn unknown_reference_is_none() {
        assert!(DataMask::for_reference(8).is_none());
    }
}
