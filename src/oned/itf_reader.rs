//! Interleaved 2 of 5 (ITF): digits are packed two to a run of 10
//! bar/space widths, one digit carried in the bars and the next in the
//! interleaved spaces, framed by narrow start/stop guards.

use crate::barcode_format::BarcodeFormat;
use crate::common::BitArray;
use crate::decode_hints::DecodeHints;
use crate::error::{Exceptions, Result};
use crate::oned::one_d_reader::OneDReader;
use crate::oned::patterns::{best_match, pattern_match_variance, record_pattern};
use crate::point::Point;
use crate::result::RXingResult;

const W: u32 = 3;
const N: u32 = 1;

const START_PATTERN: [u32; 4] = [N, N, N, N];
const END_PATTERN_REVERSED: [u32; 3] = [N, N, W];

const DIGIT_PATTERNS: [[u32; 5]; 10] = [
    [N, N, W, W, N],
    [W, N, N, N, W],
    [N, W, N, N, W],
    [W, W, N, N, N],
    [N, N, W, N, W],
    [W, N, W, N, N],
    [N, W, W, N, N],
    [N, N, N, W, W],
    [W, N, N, W, N],
    [N, W, N, W, N],
];

const MAX_AVG_VARIANCE: f32 = 0.42;
const MAX_INDIVIDUAL_VARIANCE: f32 = 0.78;

#[derive(Debug, Default)]
pub struct ItfReader;

impl ItfReader {
    pub const fn new() -> Self {
        Self
    }

    fn skip_white_space(row: &BitArray) -> Result<usize> {
        let width = row.size();
        let mut i = 0usize;
        while i < width && !row.get(i) {
            i += 1;
        }
        if i == width {
            return Err(Exceptions::not_found("row is entirely white"));
        }
        Ok(i)
    }

    fn find_guard_pattern(row: &BitArray, row_offset: usize, pattern: &[u32]) -> Result<(usize, usize)> {
        let pattern_len = pattern.len();
        let width = row.size();
        let mut counters = vec![0u32; pattern_len];
        let mut is_white = false;
        let mut counter_position = 0usize;
        let mut pattern_start = row_offset;

        for x in row_offset..width {
            let pixel = row.get(x);
            if pixel != is_white {
                counters[counter_position] += 1;
            } else {
                if counter_position == pattern_len - 1 {
                    if pattern_match_variance(&counters, pattern, MAX_INDIVIDUAL_VARIANCE) < MAX_AVG_VARIANCE {
                        return Ok((pattern_start, x));
                    }
                    pattern_start += (counters[0] + counters[1]) as usize;
                    for y in 2..pattern_len {
                        counters[y - 2] = counters[y];
                    }
                    counters[pattern_len - 2] = 0;
                    counters[pattern_len - 1] = 0;
                    counter_position -= 1;
                } else {
                    counter_position += 1;
                }
                counters[counter_position] = 1;
                is_white = !is_white;
            }
        }
        Err(Exceptions::not_found("could not find ITF guard pattern"))
    }

    fn decode_start(row: &BitArray) -> Result<(usize, usize)> {
        let offset = Self::skip_white_space(row)?;
        Self::find_guard_pattern(row, offset, &START_PATTERN)
    }

    fn decode_end(row: &mut BitArray) -> Result<(usize, usize)> {
        row.reverse();
        let result = (|| {
            let offset = Self::skip_white_space(row)?;
            Self::find_guard_pattern(row, offset, &END_PATTERN_REVERSED)
        })();
        let size = row.size();
        row.reverse();
        let (start, end) = result?;
        Ok((size - end, size - start))
    }

    fn decode_digit(counters: &[u32; 5]) -> Result<usize> {
        let patterns: Vec<&[u32]> = DIGIT_PATTERNS.iter().map(|p| p.as_slice()).collect();
        best_match(counters, &patterns, MAX_AVG_VARIANCE).ok_or_else(|| Exceptions::not_found("unrecognized ITF digit"))
    }

    fn decode_middle(row: &BitArray, payload_start: usize, payload_end: usize, result: &mut String) -> Result<()> {
        let mut payload_start = payload_start;
        let mut pair_counters = [0u32; 10];
        while payload_start < payload_end {
            record_pattern(row, payload_start, &mut pair_counters)?;
            let mut black = [0u32; 5];
            let mut white = [0u32; 5];
            for k in 0..5 {
                black[k] = pair_counters[2 * k];
                white[k] = pair_counters[2 * k + 1];
            }
            let black_digit = Self::decode_digit(&black)?;
            result.push(char::from_digit(black_digit as u32, 10).expect("digit in 0..10"));
            let white_digit = Self::decode_digit(&white)?;
            result.push(char::from_digit(white_digit as u32, 10).expect("digit in 0..10"));
            payload_start += pair_counters.iter().sum::<u32>() as usize;
        }
        Ok(())
    }
}

impl OneDReader for ItfReader {
    fn decode_row(&mut self, row_number: u32, row: &BitArray, _hints: &DecodeHints) -> Result<RXingResult> {
        let start_range = Self::decode_start(row)?;
        let mut row = row.clone();
        let end_range = Self::decode_end(&mut row)?;

        let mut text = String::new();
        Self::decode_middle(&row, start_range.1, end_range.0, &mut text)?;

        if text.len() % 2 != 0 || text.len() < 6 || text.len() > 50 {
            return Err(Exceptions::format_error("ITF payload must have an even length between 6 and 50"));
        }

        let points = vec![
            Point::new(start_range.1 as f32, row_number as f32),
            Point::new(end_range.0 as f32, row_number as f32),
        ];
        let raw_bytes = text.clone().into_bytes();
        Ok(RXingResult::new(text, raw_bytes, points, BarcodeFormat::Itf))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decoding_a_blank_row_is_not_found() {
        let row = BitArray::with_size(200);
        let mut reader = ItfReader::new();
        assert!(reader.decode_row(0, &row, &DecodeHints::default()).is_err());
    }
}
