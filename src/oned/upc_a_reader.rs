//! UPC-A is encoded identically to EAN-13 with an implicit leading `0`;
//! this reader delegates to [`Ean13Reader`] and re-tags the result,
//! stripping that leading digit.

use crate::barcode_format::BarcodeFormat;
use crate::common::BitArray;
use crate::decode_hints::DecodeHints;
use crate::error::{Exceptions, Result};
use crate::oned::ean13_reader::Ean13Reader;
use crate::oned::one_d_reader::OneDReader;
use crate::result::RXingResult;

#[derive(Debug, Default)]
pub struct UpcAReader {
    ean13: Ean13Reader,
}

impl UpcAReader {
    pub fn new() -> Self {
        Self { ean13: Ean13Reader::new() }
    }
}

impl OneDReader for UpcAReader {
    fn decode_row(&mut self, row_number: u32, row: &BitArray, hints: &DecodeHints) -> Result<RXingResult> {
        let result = self.ean13.decode_row(row_number, row, hints)?;
        maybe_return_result(result)
    }
}

fn maybe_return_result(result: RXingResult) -> Result<RXingResult> {
    let text = result.text();
    if !text.starts_with('0') {
        return Err(Exceptions::not_found("EAN-13 payload is not a UPC-A"));
    }
    let stripped = text[1..].to_string();
    let raw_bytes = stripped.clone().into_bytes();
    let points = result.points().to_vec();
    Ok(RXingResult::new(stripped, raw_bytes, points, BarcodeFormat::UpcA))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decoding_a_blank_row_is_not_found() {
        let row = BitArray::with_size(200);
        let mut reader = UpcAReader::new();
        assert!(reader.decode_row(0, &row, &DecodeHints::default()).is_err());
    }
}
