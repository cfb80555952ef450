//! Code 39: each character is 9 modules (5 bars + 4 spaces, 3 wide) chosen
//! from a fixed alphabet, framed by an asterisk start/stop character.
//! Extended ("full ASCII") Code 39 is not decoded here — a caller that
//! needs it reinterprets the plain-mode text itself.

use crate::barcode_format::BarcodeFormat;
use crate::common::BitArray;
use crate::decode_hints::DecodeHints;
use crate::error::{Exceptions, Result};
use crate::oned::one_d_reader::OneDReader;
use crate::oned::patterns::record_pattern;
use crate::point::Point;
use crate::result::RXingResult;

const ALPHABET: &str = "0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZ-. *$/+%";

const CHARACTER_ENCODINGS: [u32; 44] = [
    0x034, 0x121, 0x061, 0x160, 0x031, 0x130, 0x070, 0x025, 0x124, 0x064, // 0-9
    0x109, 0x049, 0x148, 0x019, 0x118, 0x058, 0x00D, 0x10C, 0x04C, 0x01C, // A-J
    0x103, 0x043, 0x142, 0x013, 0x112, 0x052, 0x007, 0x106, 0x046, 0x016, // K-T
    0x181, 0x0C1, 0x1C0, 0x091, 0x190, 0x0D0, 0x085, 0x184, 0x0C4, 0x094, // U-Z, -, ., space, *
    0x0A8, 0x0A2, 0x08A, 0x02A, // $, /, +, %
];

const ASTERISK_ENCODING: u32 = 0x094;

const MAX_AVG_VARIANCE: f32 = 0.38;
const MAX_INDIVIDUAL_VARIANCE: f32 = 0.78;

#[derive(Debug)]
pub struct Code39Reader {
    using_check_digit: bool,
}

impl Code39Reader {
    pub const fn new(using_check_digit: bool) -> Self {
        Self { using_check_digit }
    }

    fn find_asterisk_pattern(row: &BitArray) -> Result<(usize, usize)> {
        let width = row.size();
        let mut row_offset = 0usize;
        while row_offset < width && !row.get(row_offset) {
            row_offset += 1;
        }

        let mut counter_position = 0usize;
        let mut counters = [0u32; 9];
        let mut pattern_start = row_offset;
        let mut is_white = false;

        for i in row_offset..width {
            let pixel = row.get(i);
            if pixel != is_white {
                counters[counter_position] += 1;
            } else {
                if counter_position == 8 {
                    let start_range = pattern_start.saturating_sub((i - pattern_start) >> 1);
                    if to_narrow_wide_pattern(&counters) == Some(ASTERISK_ENCODING) && row.is_range(start_range, pattern_start, false) {
                        return Ok((pattern_start, i));
                    }
                    pattern_start += (counters[0] + counters[1]) as usize;
                    for y in 2..9 {
                        counters[y - 2] = counters[y];
                    }
                    counters[7] = 0;
                    counters[8] = 0;
                    counter_position -= 1;
                } else {
                    counter_position += 1;
                }
                counters[counter_position] = 1;
                is_white = !is_white;
            }
        }
        Err(Exceptions::not_found("could not find Code 39 asterisk pattern"))
    }
}

fn to_narrow_wide_pattern(counters: &[u32; 9]) -> Option<u32> {
    let mut max_narrow_counter = 0u32;
    loop {
        let min_counter = counters.iter().copied().filter(|&c| c > max_narrow_counter).min();
        let Some(min_counter) = min_counter else { return None };
        max_narrow_counter = min_counter;

        let mut wide_counters = 0u32;
        let mut total_wide_width = 0u32;
        let mut pattern = 0u32;
        for (i, &counter) in counters.iter().enumerate() {
            if counter > max_narrow_counter {
                pattern |= 1 << (8 - i);
                wide_counters += 1;
                total_wide_width += counter;
            }
        }

        if wide_counters == 3 {
            for &counter in counters.iter() {
                if counter > max_narrow_counter && (counter << 1) >= total_wide_width {
                    return None;
                }
            }
            return Some(pattern);
        }
        if wide_counters < 3 {
            return None;
        }
    }
}

fn pattern_to_char(pattern: u32) -> Option<char> {
    CHARACTER_ENCODINGS.iter().position(|&enc| enc == pattern).map(|idx| ALPHABET.as_bytes()[idx] as char)
}

impl OneDReader for Code39Reader {
    fn decode_row(&mut self, row_number: u32, row: &BitArray, _hints: &DecodeHints) -> Result<RXingResult> {
        let start = Self::find_asterisk_pattern(row)?;
        let mut next_start = start.1;
        let end = row.size();
        while next_start < end && !row.get(next_start) {
            next_start += 1;
        }

        let mut result = String::new();
        let mut counters = [0u32; 9];
        let mut last_start;
        loop {
            record_pattern(row, next_start, &mut counters)?;
            let pattern = to_narrow_wide_pattern(&counters).ok_or_else(|| Exceptions::not_found("not a narrow/wide pattern"))?;
            let decoded_char = pattern_to_char(pattern).ok_or_else(|| Exceptions::format_error("unknown Code 39 character"))?;
            result.push(decoded_char);
            last_start = next_start;
            next_start += counters.iter().sum::<u32>() as usize;
            while next_start < end && !row.get(next_start) {
                next_start += 1;
            }
            if decoded_char == '*' {
                break;
            }
        }
        result.pop(); // the trailing asterisk

        let last_pattern_size: u32 = counters.iter().sum();
        let whitespace_after_end = next_start as i64 - last_start as i64 - last_pattern_size as i64;
        if next_start != end && whitespace_after_end < (last_pattern_size / 2) as i64 {
            return Err(Exceptions::not_found("too little whitespace after Code 39 end pattern"));
        }

        if self.using_check_digit {
            let max = result.len() - 1;
            let mut total = 0usize;
            for c in result[..max].chars() {
                total += ALPHABET.find(c).ok_or_else(|| Exceptions::format_error("invalid check digit character"))?;
            }
            let expected = ALPHABET.find(result.as_bytes()[max] as char).ok_or_else(|| Exceptions::format_error("invalid check digit character"))?;
            if total % 43 != expected {
                return Err(Exceptions::checksum_error("Code 39 check digit mismatch"));
            }
            result.truncate(max);
        }

        if result.is_empty() {
            return Err(Exceptions::not_found("empty Code 39 payload, likely a false positive"));
        }

        let left = (start.0 + start.1) as f32 / 2.0;
        let right = (last_start as f32) + (last_pattern_size as f32 / 2.0);
        let points = vec![Point::new(left, row_number as f32), Point::new(right, row_number as f32)];
        let raw_bytes = result.clone().into_bytes();
        Ok(RXingResult::new(result, raw_bytes, points, BarcodeFormat::Code39))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn to_narrow_wide_pattern_matches_asterisk() {
        // wide runs at indices 1, 4, 6 -> bits 7, 4, 2 set -> 0x094
        let counters = [1, 2, 1, 1, 2, 1, 2, 1, 1];
        assert_eq!(to_narrow_wide_pattern(&counters), Some(ASTERISK_ENCODING));
    }

    #[test]
    fn pattern_to_char_resolves_digits() {
        assert_eq!(pattern_to_char(0x034), Some('0'));
    }

    #[test]
    fn decoding_a_blank_row_is_not_found() {
        let row = BitArray::with_size(200);
        let mut reader = Code39Reader::new(false);
        assert!(reader.decode_row(0, &row, &DecodeHints::default()).is_err());
    }
}
