//! Code 93: a denser cousin of Code 39, each character 9 modules wide
//! across 3 bars and 3 spaces (no "wide/narrow" collapsing — the raw
//! 9-bit shape is matched directly), framed by an asterisk and closed
//! with two modulo-47 check characters.

use crate::barcode_format::BarcodeFormat;
use crate::common::BitArray;
use crate::decode_hints::DecodeHints;
use crate::error::{Exceptions, Result};
use crate::oned::one_d_reader::OneDReader;
use crate::oned::patterns::record_pattern;
use crate::point::Point;
use crate::result::RXingResult;

const ALPHABET: &str = "0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZ-. $/+%abcd*";

const CHARACTER_ENCODINGS: [u32; 48] = [
    0x114, 0x148, 0x144, 0x142, 0x128, 0x124, 0x122, 0x150, 0x112, 0x10A, // 0-9
    0x1A8, 0x1A4, 0x1A2, 0x194, 0x192, 0x18A, 0x168, 0x164, 0x162, 0x134, // A-J
    0x11A, 0x158, 0x14C, 0x146, 0x12C, 0x116, 0x1B4, 0x1B2, 0x1AC, 0x1A6, // K-T
    0x196, 0x19A, 0x16C, 0x166, 0x136, 0x13A, // U-Z
    0x12E, 0x1D4, 0x1D2, 0x1CA, 0x16E, 0x176, 0x1AE, 0x126, 0x1DA, 0x1D6, // - . SP $ / + % (a) (b)
    0x132, 0x15E, // (c) (d)
];

const ASTERISK_ENCODING: u32 = 0x15E;

#[derive(Debug, Default)]
pub struct Code93Reader;

impl Code93Reader {
    pub const fn new() -> Self {
        Self
    }

    fn find_asterisk_pattern(row: &BitArray) -> Result<(usize, usize)> {
        let width = row.size();
        let mut row_offset = 0usize;
        while row_offset < width && !row.get(row_offset) {
            row_offset += 1;
        }
        let mut counters = [0u32; 6];
        loop {
            record_pattern(row, row_offset, &mut counters)?;
            if pattern_to_char(to_pattern(&counters)) == Some('*') {
                return Ok((row_offset, row_offset + counters.iter().sum::<u32>() as usize));
            }
            row_offset += counters[0] as usize + counters[1] as usize;
            if row_offset >= width {
                break;
            }
        }
        Err(Exceptions::not_found("could not find Code 93 asterisk pattern"))
    }
}

/// Scales a recorded 6-run pattern to the nearest integer unit-width
/// shape, the way Code 93's fixed (rather than narrow/wide) module count
/// lets each run be read off directly instead of binarized wide/narrow.
fn to_pattern(counters: &[u32; 6]) -> u32 {
    let total: u32 = counters.iter().sum();
    let unit = total as f32 / 9.0;
    let mut pattern = 0u32;
    for (i, &c) in counters.iter().enumerate() {
        let scaled = (c as f32 / unit).round().max(1.0) as u32;
        pattern |= scaled << (5 - i) * 3;
    }
    pattern
}

fn pattern_to_char(pattern: u32) -> Option<char> {
    CHARACTER_ENCODINGS.iter().position(|&enc| enc == pattern).map(|idx| ALPHABET.as_bytes()[idx] as char)
}

impl OneDReader for Code93Reader {
    fn decode_row(&mut self, row_number: u32, row: &BitArray, _hints: &DecodeHints) -> Result<RXingResult> {
        let start = Self::find_asterisk_pattern(row)?;
        let mut next_start = start.1;
        let end = row.size();

        let mut result = String::new();
        let mut counters = [0u32; 6];
        let mut last_start = start.0;
        loop {
            record_pattern(row, next_start, &mut counters)?;
            let pattern = to_pattern(&counters);
            let decoded_char = pattern_to_char(pattern).ok_or_else(|| Exceptions::format_error("unknown Code 93 character"))?;
            last_start = next_start;
            next_start += counters.iter().sum::<u32>() as usize;
            if decoded_char == '*' {
                break;
            }
            result.push(decoded_char);
            if next_start >= end {
                return Err(Exceptions::not_found("row ended before Code 93 stop pattern"));
            }
        }

        if result.len() < 2 {
            return Err(Exceptions::not_found("Code 93 payload too short to hold check characters"));
        }
        let payload_len = result.len() - 2;
        let check_chars: Vec<char> = result[payload_len..].chars().collect();
        let payload = result[..payload_len].to_string();

        if !check_characters_valid(&payload, check_chars[0], check_chars[1]) {
            return Err(Exceptions::checksum_error("Code 93 check character mismatch"));
        }

        let left = (start.0 + start.1) as f32 / 2.0;
        let right = last_start as f32;
        let points = vec![Point::new(left, row_number as f32), Point::new(right, row_number as f32)];
        let raw_bytes = payload.clone().into_bytes();
        Ok(RXingResult::new(payload, raw_bytes, points, BarcodeFormat::Code93))
    }
}

fn char_value(c: char) -> Option<u32> {
    ALPHABET.find(c).map(|idx| idx as u32)
}

fn check_characters_valid(payload: &str, c_check: char, k_check: char) -> bool {
    let chars: Vec<char> = payload.chars().collect();
    let Some(expected_c) = weighted_check(&chars, 20) else { return false };
    if expected_c != c_check {
        return false;
    }
    let mut with_c = chars;
    with_c.push(c_check);
    let Some(expected_k) = weighted_check(&with_c, 15) else { return false };
    expected_k == k_check
}

fn weighted_check(chars: &[char], max_weight: u32) -> Option<char> {
    let mut weight = 1u32;
    let mut total = 0u32;
    for &c in chars.iter().rev() {
        total += char_value(c)? * weight;
        weight += 1;
        if weight > max_weight {
            weight = 1;
        }
    }
    let idx = (total % 47) as usize;
    ALPHABET.chars().nth(idx)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pattern_to_char_resolves_asterisk() {
        assert_eq!(pattern_to_char(ASTERISK_ENCODING), Some('*'));
    }

    #[test]
    fn decoding_a_blank_row_is_not_found() {
        let row = BitArray::with_size(200);
        let mut reader = Code93Reader::new();
        assert!(reader.decode_row(0, &row, &DecodeHints::default()).is_err());
    }
}
