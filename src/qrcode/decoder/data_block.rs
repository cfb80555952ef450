//! De-interleaving of a QR Code's raw codewords into its constituent data
//! blocks (spec §4.7, ISO/IEC 18004 §6.6).

use crate::error::{Exceptions, Result};
use crate::qrcode::decoder::error_correction_level::ErrorCorrectionLevel;
use crate::qrcode::decoder::version::Version;

/// One block of interleaved data, holding both its data codewords and its
/// error-correction codewords contiguously (data first).
pub struct DataBlock {
    num_data_codewords: u32,
    codewords: Vec<u8>,
}

impl DataBlock {
    fn new(num_data_codewords: u32, codewords: Vec<u8>) -> Self {
        Self { num_data_codewords, codewords }
    }

    pub fn num_data_codewords(&self) -> u32 {
        self.num_data_codewords
    }

    pub fn codewords(&self) -> &[u8] {
        &self.codewords
    }

    /// Splits `raw_codewords`, as read directly off the symbol, back into
    /// its original per-block layout. QR Codes interleave multiple data
    /// blocks byte-by-byte, so this undoes that: the first byte of every
    /// block, then the second, and so on, with the error-correction bytes
    /// following the same interleaving once all data bytes are placed.
    pub fn get_data_blocks(raw_codewords: &[u8], version: &Version, ec_level: ErrorCorrectionLevel) -> Result<Vec<Self>> {
        if raw_codewords.len() as u32 != version.total_codewords() {
            return Err(Exceptions::invalid_argument_with("raw codeword count does not match version"));
        }

        let ec_blocks = version.ec_blocks_for_level(ec_level);

        let mut result = Vec::new();
        for group in &ec_blocks.ecb {
            for _ in 0..group.count {
                let num_block_codewords = ec_blocks.ec_codewords_per_block + group.data_codewords;
                result.push(DataBlock::new(group.data_codewords, vec![0u8; num_block_codewords as usize]));
            }
        }

        let shorter_blocks_total_codewords = result[0].codewords.len();
        let mut longer_blocks_start_at = result.len() - 1;
        while result[longer_blocks_start_at].codewords.len() == shorter_blocks_total_codewords {
            if longer_blocks_start_at == 0 {
                break;
            }
            longer_blocks_start_at -= 1;
        }
        longer_blocks_start_at += 1;

        let shorter_blocks_num_data_codewords = shorter_blocks_total_codewords - ec_blocks.ec_codewords_per_block as usize;
        let mut raw_codewords_offset = 0;
        for i in 0..shorter_blocks_num_data_codewords {
            for block in result.iter_mut() {
                block.codewords[i] = raw_codewords[raw_codewords_offset];
                raw_codewords_offset += 1;
            }
        }
        for block in result.iter_mut().skip(longer_blocks_start_at) {
            block.codewords[shorter_blocks_num_data_codewords] = raw_codewords[raw_codewords_offset];
            raw_codewords_offset += 1;
        }

        let max = result[0].codewords.len();
        for i in shorter_blocks_num_data_codewords..max {
            for (j, block) in result.iter_mut().enumerate() {
                let offset = if j < longer_blocks_start_at { i } else { i + 1 };
                block.codewords[offset] = raw_codewords[raw_codewords_offset];
                raw_codewords_offset += 1;
            }
        }

        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::qrcode::decoder::version::get_version_for_number;

    #[test]
    fn splits_version_1_l_into_a_single_block() {
        let version = get_version_for_number(1).unwrap();
        let raw = vec![0u8; 26];
        let blocks = DataBlock::get_data_blocks(&raw, version, ErrorCorrectionLevel::L).unwrap();
        assert_eq!(blocks.len(), 1);
        assert_eq!(blocks[0].num_data_codewords(), 19);
        assert_eq!(blocks[0].codewords().len(), 26);
    }

    #[test]
    fn wrong_raw_length_is_invalid_argument() {
        let version = get_version_for_number(1).unwrap();
        let raw = vec![0u8; 10];
        assert!(DataBlock::get_data_blocks(&raw, version, ErrorCorrectionLevel::L).is_err());
    }

    #[test]
    fn splits_version_5_h_into_groups_of_two_sizes() {
        let version = get_version_for_number(5).unwrap();
        let ec_blocks = version.ec_blocks_for_level(ErrorCorrectionLevel::H);
        let total = ec_blocks.total_data_codewords() + ec_blocks.ec_codewords_per_block * ec_blocks.num_blocks();
        let raw = vec![0u8; total as usize];
        let blocks = DataBlock::get_data_blocks(&raw, version, ErrorCorrectionLevel::H).unwrap();
        assert_eq!(blocks.len(), 4);
        assert_eq!(blocks.iter().map(|b| b.num_data_codewords()).sum::<u32>(), ec_blocks.total_data_codewords());
    }
}
