//! Top-level Aztec symbol decoder: a detected grid in, decoded text out
//! (spec §4.9, §4.10).

use crate::aztec::decoder::{bit_matrix_parser, decoded_bit_stream_parser};
use crate::aztec::detector::AztecDetectorResult;
use crate::common::decoder_result::DecoderResult;
use crate::error::Result;

pub fn decode(detector_result: &AztecDetectorResult) -> Result<DecoderResult> {
    let corrected_bits = bit_matrix_parser::read_data_bits(
        detector_result.bits(),
        detector_result.compact(),
        detector_result.nb_layers(),
        detector_result.nb_datablocks(),
    )?;
    log::debug!("aztec: corrected {} data bits", corrected_bits.len());
    let decoded = decoded_bit_stream_parser::decode(&corrected_bits)?;
    log::debug!("aztec: decoded {} chars", decoded.text().len());
    Ok(decoded)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::bit_matrix::BitMatrix;

    #[test]
    fn decoding_a_blank_grid_fails_cleanly() {
        let bits = BitMatrix::new(15, 15).unwrap();
        let result = AztecDetectorResult::for_test(bits, Vec::new(), true, 1, 1);
        assert!(decode(&result).is_err());
    }
}
