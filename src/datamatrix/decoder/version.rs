//! Data Matrix symbol size table (ECC200 only — the legacy ECC000-140
//! formats predate Reed-Solomon and are out of scope per the spec's
//! symbology list).
//!
//! Grounded on `original_source/cpp/core/src/zxing/datamatrix/Version.cpp`
//! exactly as `qrcode::decoder::version` is grounded on its QR counterpart:
//! a static table of per-size geometry plus the error-correction block
//! group(s) each size uses. 144x144 is the one symbol split across two
//! block groups of unequal size (8 blocks of 156 data codewords plus 2 of
//! 155), matching ISO/IEC 16022 Annex E rather than a simplification of it.

use crate::error::{Exceptions, Result};

/// One error-correction block group: `count` interleaved blocks, each
/// holding `data_codewords_per_block` data codewords protected by
/// `ec_codewords_per_block` parity codewords.
#[derive(Debug, Clone, Copy)]
pub struct EcBlocks {
    pub ec_codewords_per_block: u32,
    pub count: u32,
    pub data_codewords_per_block: u32,
}

#[derive(Debug, Clone, Copy)]
pub struct Version {
    pub symbol_size_rows: u32,
    pub symbol_size_columns: u32,
    pub data_region_size_rows: u32,
    pub data_region_size_columns: u32,
    pub ec_blocks: [Option<EcBlocks>; 2],
}

impl Version {
    pub fn num_data_regions_row(&self) -> u32 {
        self.symbol_size_rows / (self.data_region_size_rows + 2)
    }

    pub fn num_data_regions_column(&self) -> u32 {
        self.symbol_size_columns / (self.data_region_size_columns + 2)
    }

    pub fn total_ec_codewords(&self) -> u32 {
        self.ec_blocks.iter().flatten().map(|b| b.ec_codewords_per_block * b.count).sum()
    }

    pub fn total_data_codewords(&self) -> u32 {
        self.ec_blocks.iter().flatten().map(|b| b.data_codewords_per_block * b.count).sum()
    }

    pub fn total_codewords(&self) -> u32 {
        self.total_data_codewords() + self.total_ec_codewords()
    }
}

const fn v(
    rows: u32,
    cols: u32,
    data_rows: u32,
    data_cols: u32,
    ec_per_block: u32,
    group1_count: u32,
    group1_data: u32,
    group2: Option<(u32, u32, u32)>,
) -> Version {
    Version {
        symbol_size_rows: rows,
        symbol_size_columns: cols,
        data_region_size_rows: data_rows,
        data_region_size_columns: data_cols,
        ec_blocks: [
            Some(EcBlocks { ec_codewords_per_block: ec_per_block, count: group1_count, data_codewords_per_block: group1_data }),
            match group2 {
                Some((ec, count, data)) => Some(EcBlocks { ec_codewords_per_block: ec, count, data_codewords_per_block: data }),
                None => None,
            },
        ],
    }
}

/// 24 square symbols followed by 6 rectangular symbols, in ascending size —
/// the fixed scan order `version_for_dimensions` walks.
pub static VERSIONS: [Version; 30] = [
    v(10, 10, 8, 8, 5, 1, 3, None),
    v(12, 12, 10, 10, 7, 1, 5, None),
    v(14, 14, 12, 12, 10, 1, 8, None),
    v(16, 16, 14, 14, 12, 1, 12, None),
    v(18, 18, 16, 16, 14, 1, 18, None),
    v(20, 20, 18, 18, 18, 1, 22, None),
    v(22, 22, 20, 20, 20, 1, 30, None),
    v(24, 24, 22, 22, 24, 1, 36, None),
    v(26, 26, 24, 24, 28, 1, 44, None),
    v(32, 32, 14, 14, 36, 1, 62, None),
    v(36, 36, 16, 16, 42, 1, 86, None),
    v(40, 40, 18, 18, 48, 1, 114, None),
    v(44, 44, 20, 20, 56, 1, 144, None),
    v(48, 48, 22, 22, 68, 1, 174, None),
    v(52, 52, 24, 24, 84, 1, 204, None),
    v(64, 64, 14, 14, 56, 2, 140, None),
    v(72, 72, 16, 16, 36, 4, 92, None),
    v(80, 80, 18, 18, 48, 4, 114, None),
    v(88, 88, 20, 20, 56, 4, 144, None),
    v(96, 96, 22, 22, 68, 4, 174, None),
    v(104, 104, 24, 24, 56, 6, 136, None),
    v(120, 120, 18, 18, 68, 6, 175, None),
    v(132, 132, 20, 20, 62, 8, 163, None),
    v(144, 144, 22, 22, 62, 8, 156, Some((62, 2, 155))),
    v(8, 18, 6, 16, 7, 1, 5, None),
    v(8, 32, 6, 14, 11, 1, 10, None),
    v(12, 26, 10, 24, 14, 1, 16, None),
    v(12, 36, 10, 16, 18, 1, 22, None),
    v(16, 36, 14, 16, 24, 1, 32, None),
    v(16, 48, 14, 22, 28, 1, 49, None),
];

/// Picks the version whose symbol dimensions match a sampled grid.
pub fn version_for_dimensions(num_rows: u32, num_columns: u32) -> Result<&'static Version> {
    VERSIONS
        .iter()
        .find(|ver| ver.symbol_size_rows == num_rows && ver.symbol_size_columns == num_columns)
        .ok_or_else(|| Exceptions::format_error(format!("no Data Matrix version for {num_rows}x{num_columns}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn square_version_one_has_single_block() {
        let ver = version_for_dimensions(10, 10).unwrap();
        assert_eq!(ver.total_data_codewords(), 3);
        assert_eq!(ver.total_ec_codewords(), 5);
        assert_eq!(ver.total_codewords(), 8);
    }

    #[test]
    fn version_144_has_two_block_groups() {
        let ver = version_for_dimensions(144, 144).unwrap();
        assert!(ver.ec_blocks[1].is_some());
        assert_eq!(ver.total_data_codewords(), 8 * 156 + 2 * 155);
        assert_eq!(ver.total_codewords(), 2178);
    }

    #[test]
    fn rectangular_version_capacity_matches_geometry() {
        let ver = version_for_dimensions(8, 32).unwrap();
        assert_eq!(ver.num_data_regions_row(), 1);
        assert_eq!(ver.num_data_regions_column(), 2);
        assert_eq!(ver.total_codewords(), 21);
    }

    #[test]
    fn unknown_dimensions_are_a_format_error() {
        assert!(version_for_dimensions(11, 11).is_err());
    }
}
