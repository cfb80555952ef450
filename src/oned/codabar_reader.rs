//! Codabar: each of the 20 characters is 7 runs (4 bars, 3 spaces), with
//! no shared start/stop character — any of `A-D` (or their lowercase
//! aliases) can open or close a symbol.

use crate::barcode_format::BarcodeFormat;
use crate::common::BitArray;
use crate::decode_hints::DecodeHints;
use crate::error::{Exceptions, Result};
use crate::oned::one_d_reader::OneDReader;
use crate::oned::patterns::{best_match, record_pattern};
use crate::point::Point;
use crate::result::RXingResult;

const ALPHABET: &str = "0123456789-$:/.+ABCD";

const CHARACTER_ENCODINGS: [u32; 20] = [
    0x003, 0x006, 0x009, 0x060, 0x012, 0x042, 0x021, 0x024, 0x030, 0x048, // 0-9
    0x00C, 0x018, 0x045, 0x051, 0x054, 0x015, 0x01A, 0x029, 0x00B, 0x00E, // -$:/.+ABCD
];

const MAX_AVG_VARIANCE: f32 = 0.48;

#[derive(Debug, Default)]
pub struct CodabarReader;

impl CodabarReader {
    pub const fn new() -> Self {
        Self
    }
}

fn to_narrow_wide_pattern(counters: &[u32; 7]) -> Option<u32> {
    let patterns: Vec<[u32; 7]> = CHARACTER_ENCODINGS.iter().map(|&enc| bits_to_runs(enc)).collect();
    let refs: Vec<&[u32]> = patterns.iter().map(|p| p.as_slice()).collect();
    best_match(counters, &refs, MAX_AVG_VARIANCE).map(|idx| idx as u32)
}

/// Codabar's 7-bit encodings pack four bar widths and three space widths
/// into one int, narrow=1/wide=1 swapped to 1/3 the way the original
/// table does (bit set = wide).
fn bits_to_runs(encoding: u32) -> [u32; 7] {
    let mut runs = [0u32; 7];
    for (i, run) in runs.iter_mut().enumerate() {
        let bit = (encoding >> (6 - i)) & 1;
        *run = if bit == 1 { 2 } else { 1 };
    }
    runs
}

impl OneDReader for CodabarReader {
    fn decode_row(&mut self, row_number: u32, row: &BitArray, _hints: &DecodeHints) -> Result<RXingResult> {
        let width = row.size();
        let mut row_offset = 0usize;
        while row_offset < width && !row.get(row_offset) {
            row_offset += 1;
        }
        let start = row_offset;

        let mut result = String::new();
        let mut counters = [0u32; 7];
        loop {
            record_pattern(row, row_offset, &mut counters)?;
            let idx = to_narrow_wide_pattern(&counters).ok_or_else(|| Exceptions::not_found("unrecognized Codabar character"))?;
            result.push(ALPHABET.as_bytes()[idx as usize] as char);
            row_offset += counters.iter().sum::<u32>() as usize;

            let mut white_space = 0usize;
            while row_offset < width && !row.get(row_offset) {
                row_offset += 1;
                white_space += 1;
            }
            if row_offset >= width || white_space < (counters.iter().sum::<u32>() as usize) / 2 {
                break;
            }
        }

        if result.len() < 2 {
            return Err(Exceptions::not_found("Codabar payload too short"));
        }
        let first = result.chars().next().unwrap();
        let last = result.chars().last().unwrap();
        if !"ABCD".contains(first) || !"ABCD".contains(last) {
            return Err(Exceptions::format_error("Codabar start/stop character must be A-D"));
        }

        let left = start as f32;
        let right = row_offset as f32;
        let points = vec![Point::new(left, row_number as f32), Point::new(right, row_number as f32)];
        let raw_bytes = result.clone().into_bytes();
        Ok(RXingResult::new(result, raw_bytes, points, BarcodeFormat::Codabar))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decoding_a_blank_row_is_not_found() {
        let row = BitArray::with_size(200);
        let mut reader = CodabarReader::new();
        assert!(reader.decode_row(0, &row, &DecodeHints::default()).is_err());
    }
}
