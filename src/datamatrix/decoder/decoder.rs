//! Top-level Data Matrix symbol decoder: sampled grid in, decoded text out
//! (spec §4.7).

use crate::common::bit_matrix::BitMatrix;
use crate::common::decoder_result::DecoderResult;
use crate::common::reedsolomon::generic_gf::DATA_MATRIX_FIELD_256;
use crate::common::reedsolomon::ReedSolomonDecoder;
use crate::error::Result;
use crate::datamatrix::decoder::bit_matrix_parser::BitMatrixParser;
use crate::datamatrix::decoder::data_block::DataBlock;
use crate::datamatrix::decoder::decoded_bit_stream_parser;

pub fn decode(bits: &BitMatrix) -> Result<DecoderResult> {
    let mut parser = BitMatrixParser::new(bits)?;
    let version = parser.version();
    let codewords = parser.read_codewords()?;

    log::debug!("datamatrix: parsed {} codewords", codewords.len());
    let data_blocks = DataBlock::get_data_blocks(&codewords, version)?;

    let total_data_bytes: usize = data_blocks.iter().map(|b| b.num_data_codewords() as usize).sum();
    let mut result_bytes = vec![0u8; total_data_bytes];
    let mut result_offset = 0usize;

    for data_block in &data_blocks {
        let num_data_codewords = data_block.num_data_codewords() as usize;
        let num_ec_codewords = data_block.codewords().len() - num_data_codewords;

        let mut codewords_int: Vec<i32> = data_block.codewords().iter().map(|&b| b as i32).collect();
        correct_errors(&mut codewords_int, num_ec_codewords)?;

        for (dst, &src) in result_bytes[result_offset..result_offset + num_data_codewords].iter_mut().zip(&codewords_int) {
            *dst = src as u8;
        }
        result_offset += num_data_codewords;
    }

    log::debug!("datamatrix: corrected {} data blocks, {total_data_bytes} data bytes", data_blocks.len());
    let decoded = decoded_bit_stream_parser::decode(&result_bytes)?;
    log::debug!("datamatrix: decoded {} chars", decoded.text().len());
    Ok(decoded)
}

fn correct_errors(codeword_bytes: &mut [i32], num_ec_codewords: usize) -> Result<()> {
    if num_ec_codewords == 0 {
        return Ok(());
    }
    let decoder = ReedSolomonDecoder::new(&DATA_MATRIX_FIELD_256);
    decoder.decode(codeword_bytes, num_ec_codewords)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decoding_an_all_blank_grid_fails_cleanly() {
        let bits = BitMatrix::new(10, 10).unwrap();
        assert!(decode(&bits).is_err());
    }
}
