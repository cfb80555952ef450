//! UPC-E: a zero-suppressed 6-digit encoding of a UPC-A payload. The number
//! system and check digit ride along in the same L/G parity trick EAN-13
//! uses for its first digit, just with two parity tables instead of one.

use crate::barcode_format::BarcodeFormat;
use crate::common::BitArray;
use crate::decode_hints::DecodeHints;
use crate::error::{Exceptions, Result};
use crate::oned::one_d_reader::OneDReader;
use crate::oned::upc_ean_reader;
use crate::point::Point;
use crate::result::RXingResult;

const NUMSYS_AND_CHECK_DIGIT_PATTERNS: [[u32; 10]; 2] = [
    [0x38, 0x34, 0x32, 0x31, 0x2C, 0x26, 0x23, 0x2A, 0x29, 0x25],
    [0x07, 0x0B, 0x0D, 0x0E, 0x13, 0x19, 0x1C, 0x15, 0x16, 0x1A],
];

const MIDDLE_END_PATTERN: [u32; 6] = [1, 1, 1, 1, 1, 1];

#[derive(Debug, Default)]
pub struct UpcEReader;

impl UpcEReader {
    pub const fn new() -> Self {
        Self
    }

    fn decode_middle(&self, row: &BitArray, start_range: (usize, usize), result: &mut String) -> Result<usize> {
        let mut counters = [0u32; 4];
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

        for num_sys in 0..2 {
            if let Some(d) = NUMSYS_AND_CHECK_DIGIT_PATTERNS[num_sys].iter().position(|&enc| enc == lg_pattern_found) {
                result.insert(0, char::from_digit(num_sys as u32, 10).expect("digit in 0..2"));
                result.push(char::from_digit(d as u32, 10).expect("digit in 0..10"));
                return Ok(row_offset);
            }
        }
        Err(Exceptions::not_found("no UPC-E number-system/check-digit encoding matched"))
    }
}

impl OneDReader for UpcEReader {
    fn decode_row(&mut self, row_number: u32, row: &BitArray, _hints: &DecodeHints) -> Result<RXingResult> {
        let start_range = upc_ean_reader::find_start_guard_pattern(row)?;
        let mut text = String::with_capacity(8);
        let end_offset = self.decode_middle(row, start_range, &mut text)?;
        let end_range = upc_ean_reader::find_guard_pattern(row, end_offset, true, &MIDDLE_END_PATTERN)?;

        if text.len() != 8 {
            return Err(Exceptions::format_error("UPC-E payload was not 8 digits"));
        }
        let upc_a = convert_upc_e_to_upc_a(&text);
        if !upc_ean_reader::check_standard_upc_ean_checksum(&upc_a) {
            return Err(Exceptions::checksum_error("UPC-E check digit mismatch"));
        }

        let left = (start_range.0 + start_range.1) as f32 / 2.0;
        let right = (end_range.0 + end_range.1) as f32 / 2.0;
        let points = vec![Point::new(left, row_number as f32), Point::new(right, row_number as f32)];
        let raw_bytes = text.clone().into_bytes();
        Ok(RXingResult::new(text, raw_bytes, points, BarcodeFormat::UpcE))
    }
}

/// Expands an 8-character UPC-E string (number system + 6 compressed
/// digits + check digit) back to the 12-digit UPC-A it was derived from,
/// used only to reuse the standard checksum routine.
fn convert_upc_e_to_upc_a(upce: &str) -> String {
    let chars: Vec<char> = upce.chars().collect();
    let middle = &chars[1..7];
    let mut result = String::with_capacity(12);
    result.push(chars[0]);
    let last = middle[5];
    match last {
        '0' | '1' | '2' => {
            result.push(middle[0]);
            result.push(middle[1]);
            result.push(last);
            result.push_str("0000");
            result.push(middle[2]);
            result.push(middle[3]);
            result.push(middle[4]);
        }
        '3' => {
            result.push(middle[0]);
            result.push(middle[1]);
            result.push(middle[2]);
            result.push_str("00000");
            result.push(middle[3]);
            result.push(middle[4]);
        }
        '4' => {
            result.push(middle[0]);
            result.push(middle[1]);
            result.push(middle[2]);
            result.push(middle[3]);
            result.push_str("00000");
            result.push(middle[4]);
        }
        _ => {
            result.push(middle[0]);
            result.push(middle[1]);
            result.push(middle[2]);
            result.push(middle[3]);
            result.push(middle[4]);
            result.push_str("0000");
            result.push(last);
        }
    }
    result.push(chars[7]);
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decoding_a_blank_row_is_not_found() {
        let row = BitArray::with_size(200);
        let mut reader = UpcEReader::new();
        assert!(reader.decode_row(0, &row, &DecodeHints::default()).is_err());
    }

    #[test]
    fn expansion_pads_the_right_run_of_zeros() {
        assert_eq!(convert_upc_e_to_upc_a("04252614"), "042100005264");
    }
}
