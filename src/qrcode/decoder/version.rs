//! Per-version QR Code geometry and error-correction block layout, straight
//! from ISO/IEC 18004 Annex D (spec §4.4, §4.7).

use once_cell::sync::Lazy;

use crate::common::BitMatrix;
use crate::error::{Exceptions, Result};
use crate::qrcode::decoder::error_correction_level::ErrorCorrectionLevel;

/// One group of error-correction blocks sharing a block size: `count`
/// blocks, each with `data_codewords` data codewords (plus the group's
/// `ec_codewords_per_block`, stored on the parent [`EcBlocks`]).
#[derive(Debug, Clone, Copy)]
pub struct Ecb {
    pub count: u32,
    pub data_codewords: u32,
}

#[derive(Debug, Clone)]
pub struct EcBlocks {
    pub ec_codewords_per_block: u32,
    pub ecb: Vec<Ecb>,
}

impl EcBlocks {
    pub fn num_blocks(&self) -> u32 {
        self.ecb.iter().map(|e| e.count).sum()
    }

    pub fn total_data_codewords(&self) -> u32 {
        self.ecb.iter().map(|e| e.count * e.data_codewords).sum()
    }
}

#[derive(Debug, Clone)]
pub struct Version {
    version_number: u32,
    alignment_pattern_centers: Vec<u32>,
    ec_blocks: [EcBlocks; 4],
    total_codewords: u32,
}

impl Version {
    pub const fn version_number(&self) -> u32 {
        self.version_number
    }

    pub fn alignment_pattern_centers(&self) -> &[u32] {
        &self.alignment_pattern_centers
    }

    pub const fn total_codewords(&self) -> u32 {
        self.total_codewords
    }

    pub const fn dimension_for_version(version_number: u32) -> u32 {
        17 + 4 * version_number
    }

    pub fn dimension(&self) -> u32 {
        Self::dimension_for_version(self.version_number)
    }

    pub fn ec_blocks_for_level(&self, level: ErrorCorrectionLevel) -> &EcBlocks {
        &self.ec_blocks[match level {
            ErrorCorrectionLevel::L => 0,
            ErrorCorrectionLevel::M => 1,
            ErrorCorrectionLevel::Q => 2,
            ErrorCorrectionLevel::H => 3,
        }]
    }

    pub fn get_provisional_version_for_dimension(dimension: u32) -> Result<u32> {
        if dimension % 4 != 1 || dimension < 21 {
            return Err(Exceptions::not_found("not a valid QR dimension"));
        }
        Ok((dimension - 17) / 4)
    }

    /// The blank function-pattern mask for this version: finder patterns,
    /// separators, timing patterns, the dark module, alignment patterns,
    /// and (for version >= 7) the two version-info blocks are all marked.
    pub fn build_function_pattern(&self) -> Result<BitMatrix> {
        let dimension = self.dimension();
        let mut bit_matrix = BitMatrix::new(dimension, dimension)?;

        bit_matrix.set_region(0, 0, 9, 9)?;
        bit_matrix.set_region(dimension - 8, 0, 8, 9)?;
        bit_matrix.set_region(0, dimension - 8, 9, 8)?;

        let max = self.alignment_pattern_centers.len();
        for (i, &y) in self.alignment_pattern_centers.iter().enumerate() {
            for (j, &x) in self.alignment_pattern_centers.iter().enumerate() {
                if (i == 0 && (j == 0 || j == max - 1)) || (i == max - 1 && j == 0) {
                    continue;
                }
                bit_matrix.set_region(x.saturating_sub(2), y.saturating_sub(2), 5, 5)?;
            }
        }

        bit_matrix.set_region(6, 9, 1, dimension - 17)?;
        bit_matrix.set_region(9, 6, dimension - 17, 1)?;

        if self.version_number > 6 {
            bit_matrix.set_region(dimension - 11, 0, 3, 6)?;
            bit_matrix.set_region(0, dimension - 11, 6, 3)?;
        }

        Ok(bit_matrix)
    }
}

fn ecb(count: u32, data_codewords: u32) -> Ecb {
    Ecb { count, data_codewords }
}

fn blocks(ec_per_block: u32, ecb_list: Vec<Ecb>) -> EcBlocks {
    EcBlocks { ec_codewords_per_block: ec_per_block, ecb: ecb_list }
}

fn make_version(
    version_number: u32,
    alignment_pattern_centers: &[u32],
    l: EcBlocks,
    m: EcBlocks,
    q: EcBlocks,
    h: EcBlocks,
) -> Version {
    let total_codewords = l.total_data_codewords() + l.ec_codewords_per_block * l.num_blocks();
    Version {
        version_number,
        alignment_pattern_centers: alignment_pattern_centers.to_vec(),
        ec_blocks: [l, m, q, h],
        total_codewords,
    }
}

pub static VERSIONS: Lazy<Vec<Version>> = Lazy::new(|| {
    vec![
        make_version(1, &[], blocks(7, vec![ecb(1, 19)]), blocks(10, vec![ecb(1, 16)]), blocks(13, vec![ecb(1, 13)]), blocks(17, vec![ecb(1, 9)])),
        make_version(2, &[6, 18], blocks(10, vec![ecb(1, 34)]), blocks(16, vec![ecb(1, 28)]), blocks(22, vec![ecb(1, 22)]), blocks(28, vec![ecb(1, 16)])),
        make_version(3, &[6, 22], blocks(15, vec![ecb(1, 55)]), blocks(26, vec![ecb(1, 44)]), blocks(18, vec![ecb(2, 17)]), blocks(22, vec![ecb(2, 13)])),
        make_version(4, &[6, 26], blocks(20, vec![ecb(1, 80)]), blocks(18, vec![ecb(2, 32)]), blocks(26, vec![ecb(2, 24)]), blocks(16, vec![ecb(4, 9)])),
        make_version(5, &[6, 30], blocks(26, vec![ecb(1, 108)]), blocks(24, vec![ecb(2, 43)]), blocks(18, vec![ecb(2, 15), ecb(2, 16)]), blocks(22, vec![ecb(2, 11), ecb(2, 12)])),
        make_version(6, &[6, 34], blocks(18, vec![ecb(2, 68)]), blocks(16, vec![ecb(4, 27)]), blocks(24, vec![ecb(4, 19)]), blocks(28, vec![ecb(4, 15)])),
        make_version(7, &[6, 22, 38], blocks(20, vec![ecb(2, 78)]), blocks(18, vec![ecb(4, 31)]), blocks(18, vec![ecb(2, 14), ecb(4, 15)]), blocks(26, vec![ecb(4, 13), ecb(1, 14)])),
        make_version(8, &[6, 24, 42], blocks(24, vec![ecb(2, 97)]), blocks(22, vec![ecb(2, 38), ecb(2, 39)]), blocks(22, vec![ecb(4, 18), ecb(2, 19)]), blocks(26, vec![ecb(4, 14), ecb(2, 15)])),
        make_version(9, &[6, 26, 46], blocks(30, vec![ecb(2, 116)]), blocks(22, vec![ecb(3, 36), ecb(2, 37)]), blocks(20, vec![ecb(4, 16), ecb(4, 17)]), blocks(24, vec![ecb(4, 12), ecb(4, 13)])),
        make_version(10, &[6, 28, 50], blocks(18, vec![ecb(2, 68), ecb(2, 69)]), blocks(26, vec![ecb(4, 43), ecb(1, 44)]), blocks(24, vec![ecb(6, 19), ecb(2, 20)]), blocks(28, vec![ecb(6, 15), ecb(2, 16)])),
        make_version(11, &[6, 30, 54], blocks(20, vec![ecb(4, 81)]), blocks(30, vec![ecb(1, 50), ecb(4, 51)]), blocks(28, vec![ecb(4, 22), ecb(4, 23)]), blocks(24, vec![ecb(3, 12), ecb(8, 13)])),
        make_version(12, &[6, 32, 58], blocks(24, vec![ecb(2, 92), ecb(2, 93)]), blocks(22, vec![ecb(6, 36), ecb(2, 37)]), blocks(26, vec![ecb(4, 20), ecb(6, 21)]), blocks(28, vec![ecb(7, 14), ecb(4, 15)])),
        make_version(13, &[6, 34, 62], blocks(26, vec![ecb(4, 107)]), blocks(22, vec![ecb(8, 37), ecb(1, 38)]), blocks(24, vec![ecb(8, 20), ecb(4, 21)]), blocks(22, vec![ecb(12, 11), ecb(4, 12)])),
        make_version(14, &[6, 26, 46, 66], blocks(30, vec![ecb(3, 115), ecb(1, 116)]), blocks(24, vec![ecb(4, 40), ecb(5, 41)]), blocks(20, vec![ecb(11, 16), ecb(5, 17)]), blocks(24, vec![ecb(11, 12), ecb(5, 13)])),
        make_version(15, &[6, 26, 48, 70], blocks(22, vec![ecb(5, 87), ecb(1, 88)]), blocks(24, vec![ecb(5, 41), ecb(5, 42)]), blocks(30, vec![ecb(5, 24), ecb(7, 25)]), blocks(24, vec![ecb(11, 12), ecb(7, 13)])),
        make_version(16, &[6, 26, 50, 74], blocks(24, vec![ecb(5, 98), ecb(1, 99)]), blocks(28, vec![ecb(7, 45), ecb(3, 46)]), blocks(24, vec![ecb(15, 19), ecb(2, 20)]), blocks(30, vec![ecb(3, 15), ecb(13, 16)])),
        make_version(17, &[6, 30, 54, 78], blocks(28, vec![ecb(1, 107), ecb(5, 108)]), blocks(28, vec![ecb(10, 46), ecb(1, 47)]), blocks(28, vec![ecb(1, 22), ecb(15, 23)]), blocks(28, vec![ecb(2, 14), ecb(17, 15)])),
        make_version(18, &[6, 30, 56, 82], blocks(30, vec![ecb(5, 120), ecb(1, 121)]), blocks(26, vec![ecb(9, 43), ecb(4, 44)]), blocks(28, vec![ecb(17, 22), ecb(1, 23)]), blocks(28, vec![ecb(2, 14), ecb(19, 15)])),
        make_version(19, &[6, 30, 58, 86], blocks(28, vec![ecb(3, 113), ecb(4, 114)]), blocks(26, vec![ecb(3, 44), ecb(11, 45)]), blocks(26, vec![ecb(17, 21), ecb(4, 22)]), blocks(26, vec![ecb(9, 13), ecb(16, 14)])),
        make_version(20, &[6, 34, 62, 90], blocks(28, vec![ecb(3, 107), ecb(5, 108)]), blocks(26, vec![ecb(3, 41), ecb(13, 42)]), blocks(30, vec![ecb(15, 24), ecb(5, 25)]), blocks(28, vec![ecb(15, 15), ecb(10, 16)])),
        make_version(21, &[6, 28, 50, 72, 94], blocks(28, vec![ecb(4, 116), ecb(4, 117)]), blocks(26, vec![ecb(17, 42)]), blocks(28, vec![ecb(17, 22), ecb(6, 23)]), blocks(30, vec![ecb(19, 16), ecb(6, 17)])),
        make_version(22, &[6, 26, 50, 74, 98], blocks(28, vec![ecb(2, 111), ecb(7, 112)]), blocks(28, vec![ecb(17, 46)]), blocks(30, vec![ecb(7, 24), ecb(16, 25)]), blocks(24, vec![ecb(34, 13)])),
        make_version(23, &[6, 30, 54, 78, 102], blocks(30, vec![ecb(4, 121), ecb(5, 122)]), blocks(28, vec![ecb(4, 47), ecb(14, 48)]), blocks(30, vec![ecb(11, 24), ecb(14, 25)]), blocks(30, vec![ecb(16, 15), ecb(14, 16)])),
        make_version(24, &[6, 28, 54, 80, 106], blocks(30, vec![ecb(6, 117), ecb(4, 118)]), blocks(28, vec![ecb(6, 45), ecb(14, 46)]), blocks(30, vec![ecb(11, 24), ecb(16, 25)]), blocks(30, vec![ecb(30, 16), ecb(2, 17)])),
        make_version(25, &[6, 32, 58, 84, 110], blocks(26, vec![ecb(8, 106), ecb(4, 107)]), blocks(28, vec![ecb(8, 47), ecb(13, 48)]), blocks(30, vec![ecb(7, 24), ecb(22, 25)]), blocks(30, vec![ecb(22, 15), ecb(13, 16)])),
        make_version(26, &[6, 30, 58, 86, 114], blocks(28, vec![ecb(10, 114), ecb(2, 115)]), blocks(28, vec![ecb(19, 46), ecb(4, 47)]), blocks(28, vec![ecb(28, 22), ecb(6, 23)]), blocks(30, vec![ecb(33, 16), ecb(4, 17)])),
        make_version(27, &[6, 34, 62, 90, 118], blocks(30, vec![ecb(8, 122), ecb(4, 123)]), blocks(28, vec![ecb(22, 45), ecb(3, 46)]), blocks(30, vec![ecb(8, 23), ecb(26, 24)]), blocks(30, vec![ecb(12, 15), ecb(28, 16)])),
        make_version(28, &[6, 26, 50, 74, 98, 122], blocks(30, vec![ecb(3, 117), ecb(10, 118)]), blocks(28, vec![ecb(3, 45), ecb(23, 46)]), blocks(30, vec![ecb(4, 24), ecb(31, 25)]), blocks(30, vec![ecb(11, 15), ecb(31, 16)])),
        make_version(29, &[6, 30, 54, 78, 102, 126], blocks(30, vec![ecb(7, 116), ecb(7, 117)]), blocks(28, vec![ecb(21, 45), ecb(7, 46)]), blocks(30, vec![ecb(1, 23), ecb(37, 24)]), blocks(30, vec![ecb(19, 15), ecb(26, 16)])),
        make_version(30, &[6, 26, 52, 78, 104, 130], blocks(30, vec![ecb(5, 115), ecb(10, 116)]), blocks(28, vec![ecb(19, 47), ecb(10, 48)]), blocks(30, vec![ecb(15, 24), ecb(25, 25)]), blocks(30, vec![ecb(23, 15), ecb(25, 16)])),
        make_version(31, &[6, 30, 56, 82, 108, 134], blocks(30, vec![ecb(13, 115), ecb(3, 116)]), blocks(28, vec![ecb(2, 46), ecb(29, 47)]), blocks(30, vec![ecb(42, 24), ecb(1, 25)]), blocks(30, vec![ecb(23, 15), ecb(28, 16)])),
        make_version(32, &[6, 34, 60, 86, 112, 138], blocks(30, vec![ecb(17, 115)]), blocks(28, vec![ecb(10, 46), ecb(23, 47)]), blocks(30, vec![ecb(10, 24), ecb(35, 25)]), blocks(30, vec![ecb(19, 15), ecb(35, 16)])),
        make_version(33, &[6, 30, 58, 86, 114, 142], blocks(30, vec![ecb(17, 115), ecb(1, 116)]), blocks(28, vec![ecb(14, 46), ecb(21, 47)]), blocks(30, vec![ecb(29, 24), ecb(19, 25)]), blocks(30, vec![ecb(11, 15), ecb(46, 16)])),
        make_version(34, &[6, 34, 62, 90, 118, 146], blocks(30, vec![ecb(13, 115), ecb(6, 116)]), blocks(28, vec![ecb(14, 46), ecb(23, 47)]), blocks(30, vec![ecb(44, 24), ecb(7, 25)]), blocks(30, vec![ecb(59, 16), ecb(1, 17)])),
        make_version(35, &[6, 30, 54, 78, 102, 126, 150], blocks(30, vec![ecb(12, 121), ecb(7, 122)]), blocks(28, vec![ecb(12, 47), ecb(26, 48)]), blocks(30, vec![ecb(39, 24), ecb(14, 25)]), blocks(30, vec![ecb(22, 15), ecb(41, 16)])),
        make_version(36, &[6, 24, 50, 76, 102, 128, 154], blocks(30, vec![ecb(6, 121), ecb(14, 122)]), blocks(28, vec![ecb(6, 47), ecb(34, 48)]), blocks(30, vec![ecb(46, 24), ecb(10, 25)]), blocks(30, vec![ecb(2, 15), ecb(64, 16)])),
        make_version(37, &[6, 28, 54, 80, 106, 132, 158], blocks(30, vec![ecb(17, 122), ecb(4, 123)]), blocks(28, vec![ecb(29, 46), ecb(14, 47)]), blocks(30, vec![ecb(49, 24), ecb(10, 25)]), blocks(30, vec![ecb(24, 15), ecb(46, 16)])),
        make_version(38, &[6, 32, 58, 84, 110, 136, 162], blocks(30, vec![ecb(4, 122), ecb(18, 123)]), blocks(28, vec![ecb(13, 46), ecb(32, 47)]), blocks(30, vec![ecb(48, 24), ecb(14, 25)]), blocks(30, vec![ecb(42, 15), ecb(32, 16)])),
        make_version(39, &[6, 26, 54, 82, 110, 138, 166], blocks(30, vec![ecb(20, 117), ecb(4, 118)]), blocks(28, vec![ecb(40, 47), ecb(7, 48)]), blocks(30, vec![ecb(43, 24), ecb(22, 25)]), blocks(30, vec![ecb(10, 15), ecb(67, 16)])),
        make_version(40, &[6, 30, 58, 86, 114, 142, 170], blocks(30, vec![ecb(19, 118), ecb(6, 119)]), blocks(28, vec![ecb(18, 47), ecb(31, 48)]), blocks(30, vec![ecb(34, 24), ecb(34, 25)]), blocks(30, vec![ecb(20, 15), ecb(61, 16)])),
    ]
});

pub fn get_version_for_number(version_number: u32) -> Result<&'static Version> {
    VERSIONS
        .get((version_number as usize).checked_sub(1).ok_or_else(|| Exceptions::invalid_argument_with("version must be >= 1"))?)
        .ok_or_else(|| Exceptions::invalid_argument_with(format!("no such version: {version_number}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn version_1_has_no_alignment_patterns() {
        let v = get_version_for_number(1).unwrap();
        assert!(v.alignment_pattern_centers().is_empty());
        assert_eq!(v.dimension(), 21);
    }

    #[test]
    fn version_40_dimension_is_177() {
        let v = get_version_for_number(40).unwrap();
        assert_eq!(v.dimension(), 177);
    }

    #[test]
    fn total_codewords_matches_known_value_for_version_7() {
        let v = get_version_for_number(7).unwrap();
        assert_eq!(v.total_codewords(), 196);
    }

    #[test]
    fn out_of_range_version_is_invalid_argument() {
        assert!(get_version_for_number(41).is_err());
        assert!(get_version_for_number(0).is_err());
    }
}
