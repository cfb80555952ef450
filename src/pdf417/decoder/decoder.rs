//! Top-level PDF417 symbol decoder: a detector result in, decoded text out
//! (spec §4.7, §4.9, §4.10).

use crate::common::decoder_result::DecoderResult;
use crate::error::{Exceptions, Result};

use super::super::detector::Pdf417DetectorResult;
use super::ec::{PdfErrorCorrection, PDF417_GF};
use super::{bit_matrix_parser, decoded_bit_stream_parser};

pub fn decode(detector_result: &Pdf417DetectorResult) -> Result<DecoderResult> {
    let mut codewords = bit_matrix_parser::read_codewords(detector_result)?;
    log::debug!("pdf417: parsed {} codewords", codewords.len());

    if codewords.is_empty() || codewords[0] < 1 || codewords[0] as usize > codewords.len() {
        return Err(Exceptions::format_error(
            "invalid PDF417 codeword length descriptor",
        ));
    }

    let ec_count = codewords.len() - codewords[0] as usize;
    if ec_count > 0 {
        PdfErrorCorrection::new(&PDF417_GF).decode(&mut codewords, ec_count)?;
    }
    log::debug!("pdf417: corrected codewords, {ec_count} ec codewords");

    let decoded = decoded_bit_stream_parser::decode(&codewords)?;
    log::debug!("pdf417: decoded {} chars", decoded.text().len());
    Ok(decoded)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::bit_matrix::BitMatrix;
    use crate::point::Point;

    #[test]
    fn decoding_a_blank_result_fails_cleanly() {
        let bits = BitMatrix::new(20, 20).unwrap();
        let result = Pdf417DetectorResult::for_test(bits, Vec::new(), vec![Point::new(0.0, 0.0)]);
        assert!(decode(&result).is_err());
    }
}
