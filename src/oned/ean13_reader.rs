//! EAN-13: 12 encoded digits plus a check digit, the first digit carried
//! implicitly in which of the left six digits use odd (L) vs even (G)
//! parity.

use crate::barcode_format::BarcodeFormat;
use crate::common::BitArray;
use crate::decode_hints::DecodeHints;
use crate::error::{Exceptions, Result};
use crate::oned::one_d_reader::OneDReader;
use crate::oned::upc_ean_reader::{self, L_PATTERNS, MIDDLE_PATTERN};
use crate::point::Point;
use crate::result::RXingResult;

const FIRST_DIGIT_ENCODINGS: [u32; 10] = [0x00, 0x0B, 0x0D, 0x0E, 0x13, 0x19, 0x1C, 0x15, 0x16, 0x1A];

#[derive(Debug, Default)]
pub struct Ean13Reader;

impl Ean13Reader {
    pub const fn new() -> Self {
        Self
    }

    fn decode_middle(&self, row: &BitArray, start_range: (usize, usize), result: &mut String) -> Result<usize> {
        let mut counters = [0u32; 4];
        let end = row.size();
        let mut row_offset = start_range.1;
        let l_and_g = upc_ean_reader::l_and_g_patterns();
        let mut lg_pattern_found = 0u32;

        for x in 0..6 {
            let best_match = upc_ean_reader::decode_digit(row, &mut counters, row_offset, &l_and_g)?;
            result.push(char::from_digit((best_match % 10) as u32, 10).expect("digit in 0..10"));
            row_offset += counters.iter().sum::<u32>() as usize;
            if best_match >= 10 {
                lg_pattern_found |= 1 << (5 - x);
            }
        }

        let first_digit = FIRST_DIGIT_ENCODINGS
            .iter()
            .position(|&enc| enc == lg_pattern_found)
            .ok_or_else(|| Exceptions::not_found("no first-digit encoding matched"))?;
        result.insert(0, char::from_digit(first_digit as u32, 10).expect("digit in 0..10"));

        let middle_range = upc_ean_reader::find_guard_pattern(row, row_offset, true, &MIDDLE_PATTERN)?;
        row_offset = middle_range.1;

        for _ in 0..6 {
            let best_match = upc_ean_reader::decode_digit(row, &mut counters, row_offset, &L_PATTERNS)?;
            result.push(char::from_digit(best_match as u32, 10).expect("digit in 0..10"));
            row_offset += counters.iter().sum::<u32>() as usize;
        }
        Ok(row_offset)
    }
}

impl OneDReader for Ean13Reader {
    fn decode_row(&mut self, row_number: u32, row: &BitArray, _hints: &DecodeHints) -> Result<RXingResult> {
        let start_range = upc_ean_reader::find_start_guard_pattern(row)?;
        let mut text = String::with_capacity(13);
        let end_offset = self.decode_middle(row, start_range, &mut text)?;

        let end_range = upc_ean_reader::find_guard_pattern(row, end_offset, false, &upc_ean_reader::START_END_PATTERN)?;

        if text.len() != 13 || !upc_ean_reader::check_standard_upc_ean_checksum(&text) {
            return Err(Exceptions::checksum_error("EAN-13 check digit mismatch"));
        }

        let left = (start_range.0 + start_range.1) as f32 / 2.0;
        let right = (end_range.0 + end_range.1) as f32 / 2.0;
        let points = vec![Point::new(left, row_number as f32), Point::new(right, row_number as f32)];

        let raw_bytes = text.clone().into_bytes();
        Ok(RXingResult::new(text, raw_bytes, points, BarcodeFormat::Ean13))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decoding_a_blank_row_is_not_found() {
        let row = BitArray::with_size(200);
        let mut reader = Ean13Reader::new();
        assert!(reader.decode_row(0, &row, &DecodeHints::default()).is_err());
    }
}
