//! De-interleaving of a Data Matrix symbol's raw codewords into its
//! constituent error-correction blocks (spec §4.7, ISO/IEC 16022 Annex E).
//!
//! Mirrors `qrcode::decoder::data_block` byte-for-byte for the common
//! single-group case. 144x144 is the only size with two group sizes (8
//! blocks of 156 data codewords, 2 of 155); rather than port ZXing's
//! index-offset arithmetic for that one symbol, this walks blocks in a
//! fixed order and fills every block up to the shortest block's data length
//! before filling the "extra" byte into the longer blocks, which generalizes
//! to any number of distinct block sizes instead of exactly two.

use crate::datamatrix::decoder::version::Version;
use crate::error::{Exceptions, Result};

pub struct DataBlock {
    num_data_codewords: u32,
    codewords: Vec<u8>,
}

impl DataBlock {
    pub fn num_data_codewords(&self) -> u32 {
        self.num_data_codewords
    }

    pub fn codewords(&self) -> &[u8] {
        &self.codewords
    }

    pub fn codewords_mut(&mut self) -> &mut [u8] {
        &mut self.codewords
    }

    pub fn get_data_blocks(raw_codewords: &[u8], version: &Version) -> Result<Vec<Self>> {
        if raw_codewords.len() as u32 != version.total_codewords() {
            return Err(Exceptions::invalid_argument_with("raw codeword count does not match version"));
        }

        let mut blocks: Vec<(u32, DataBlock)> = Vec::new();
        for group in version.ec_blocks.iter().flatten() {
            for _ in 0..group.count {
                blocks.push((
                    group.ec_codewords_per_block,
                    DataBlock {
                        num_data_codewords: group.data_codewords_per_block,
                        codewords: vec![0u8; (group.data_codewords_per_block + group.ec_codewords_per_block) as usize],
                    },
                ));
            }
        }

        let min_data_codewords = blocks.iter().map(|(_, b)| b.num_data_codewords).min().unwrap_or(0);
        let max_data_codewords = blocks.iter().map(|(_, b)| b.num_data_codewords).max().unwrap_or(0);
        let max_ec_codewords = blocks.iter().map(|(ec, _)| *ec).max().unwrap_or(0);

        let mut offset = 0usize;
        for i in 0..min_data_codewords {
            for (_, block) in blocks.iter_mut() {
                block.codewords[i as usize] = raw_codewords[offset];
                offset += 1;
            }
        }
        for i in min_data_codewords..max_data_codewords {
            for (_, block) in blocks.iter_mut() {
                if block.num_data_codewords > i {
                    block.codewords[i as usize] = raw_codewords[offset];
                    offset += 1;
                }
            }
        }
        for i in 0..max_ec_codewords {
            for (ec, block) in blocks.iter_mut() {
                if *ec > i {
                    let idx = block.num_data_codewords + i;
                    block.codewords[idx as usize] = raw_codewords[offset];
                    offset += 1;
                }
            }
        }

        Ok(blocks.into_iter().map(|(_, b)| b).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::datamatrix::decoder::version::version_for_dimensions;

    #[test]
    fn splits_version_one_into_a_single_block() {
        let version = version_for_dimensions(10, 10).unwrap();
        let raw = vec![0u8; 8];
        let blocks = DataBlock::get_data_blocks(&raw, version).unwrap();
        assert_eq!(blocks.len(), 1);
        assert_eq!(blocks[0].num_data_codewords(), 3);
        assert_eq!(blocks[0].codewords().len(), 8);
    }

    #[test]
    fn splits_version_144_into_two_sized_groups() {
        let version = version_for_dimensions(144, 144).unwrap();
        let raw = vec![0u8; version.total_codewords() as usize];
        let blocks = DataBlock::get_data_blocks(&raw, version).unwrap();
        assert_eq!(blocks.len(), 10);
        assert_eq!(blocks.iter().filter(|b| b.num_data_codewords() == 156).count(), 8);
        assert_eq!(blocks.iter().filter(|b| b.num_data_codewords() == 155).count(), 2);
        assert_eq!(
            blocks.iter().map(|b| b.num_data_codewords()).sum::<u32>(),
            version.total_data_codewords()
        );
    }

    #[test]
    fn wrong_raw_length_is_invalid_argument() {
        let version = version_for_dimensions(10, 10).unwrap();
        let raw = vec![0u8; 3];
        assert!(DataBlock::get_data_blocks(&raw, version).is_err());
    }
}
