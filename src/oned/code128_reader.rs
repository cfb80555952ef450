//! Code 128: a 107-entry symbol table shared by three code sets (A, B and
//! C), switched between mid-symbol by reserved control codes, with a
//! checksum that's a weighted sum of symbol values mod 103.

use crate::barcode_format::BarcodeFormat;
use crate::common::BitArray;
use crate::decode_hints::DecodeHints;
use crate::error::{Exceptions, Result};
use crate::oned::one_d_reader::OneDReader;
use crate::oned::patterns::{pattern_match_variance, record_pattern};
use crate::point::Point;
use crate::result::RXingResult;

const CODE_PATTERNS: [[u32; 6]; 107] = [
    [2, 1, 2, 2, 2, 2], [2, 2, 2, 1, 2, 2], [2, 2, 2, 2, 2, 1], [1, 2, 1, 2, 2, 3],
    [1, 2, 1, 3, 2, 2], [1, 3, 1, 2, 2, 2], [1, 2, 2, 2, 1, 3], [1, 2, 2, 3, 1, 2],
    [1, 3, 2, 2, 1, 2], [2, 2, 1, 2, 1, 3], [2, 2, 1, 3, 1, 2], [2, 3, 1, 2, 1, 2],
    [1, 1, 2, 2, 3, 2], [1, 2, 2, 1, 3, 2], [1, 2, 2, 2, 3, 1], [1, 1, 3, 2, 2, 2],
    [1, 2, 3, 1, 2, 2], [1, 2, 3, 2, 2, 1], [2, 2, 3, 2, 1, 1], [2, 2, 1, 1, 3, 2],
    [2, 2, 1, 2, 3, 1], [2, 1, 3, 2, 1, 2], [2, 2, 3, 1, 1, 2], [3, 1, 2, 1, 3, 1],
    [3, 1, 1, 2, 2, 2], [3, 2, 1, 1, 2, 2], [3, 2, 1, 2, 2, 1], [3, 1, 2, 2, 1, 2],
    [3, 2, 2, 1, 1, 2], [3, 2, 2, 2, 1, 1], [2, 1, 2, 1, 2, 3], [2, 1, 2, 3, 2, 1],
    [2, 3, 2, 1, 2, 1], [1, 1, 1, 3, 2, 3], [1, 3, 1, 1, 2, 3], [1, 3, 1, 3, 2, 1],
    [1, 1, 2, 3, 1, 3], [1, 3, 2, 1, 1, 3], [1, 3, 2, 3, 1, 1], [2, 1, 1, 3, 1, 3],
    [2, 3, 1, 1, 1, 3], [2, 3, 1, 3, 1, 1], [1, 1, 2, 1, 3, 3], [1, 1, 2, 3, 3, 1],
    [1, 3, 2, 1, 3, 1], [1, 1, 3, 1, 2, 3], [1, 1, 3, 3, 2, 1], [1, 3, 3, 1, 2, 1],
    [3, 1, 3, 1, 2, 1], [2, 1, 1, 3, 3, 1], [2, 3, 1, 1, 3, 1], [2, 1, 3, 1, 1, 3],
    [2, 1, 3, 3, 1, 1], [2, 1, 3, 1, 3, 1], [3, 1, 1, 1, 2, 3], [3, 1, 1, 3, 2, 1],
    [3, 3, 1, 1, 2, 1], [3, 1, 2, 1, 1, 3], [3, 1, 2, 3, 1, 1], [3, 3, 2, 1, 1, 1],
    [3, 1, 4, 1, 1, 1], [2, 2, 1, 4, 1, 1], [4, 3, 1, 1, 1, 1], [1, 1, 1, 2, 2, 4],
    [1, 1, 1, 4, 2, 2], [1, 2, 1, 1, 2, 4], [1, 2, 1, 4, 2, 1], [1, 4, 1, 1, 2, 2],
    [1, 4, 1, 2, 2, 1], [1, 1, 2, 2, 1, 4], [1, 1, 2, 4, 1, 2], [1, 2, 2, 1, 1, 4],
    [1, 2, 2, 4, 1, 1], [1, 4, 2, 1, 1, 2], [1, 4, 2, 2, 1, 1], [2, 4, 1, 2, 1, 1],
    [2, 2, 1, 1, 1, 4], [4, 1, 3, 1, 1, 1], [2, 4, 1, 1, 1, 2], [1, 3, 4, 1, 1, 1],
    [1, 1, 1, 2, 4, 2], [1, 2, 1, 1, 4, 2], [1, 2, 1, 2, 4, 1], [1, 1, 4, 2, 1, 2],
    [1, 2, 4, 1, 1, 2], [1, 2, 4, 2, 1, 1], [4, 1, 1, 2, 1, 2], [4, 2, 1, 1, 1, 2],
    [4, 2, 1, 2, 1, 1], [2, 1, 2, 1, 4, 1], [2, 1, 4, 1, 2, 1], [4, 1, 2, 1, 2, 1],
    [1, 1, 1, 1, 4, 3], [1, 1, 1, 3, 4, 1], [1, 3, 1, 1, 4, 1], [1, 1, 4, 1, 1, 3],
    [1, 1, 4, 3, 1, 1], [4, 1, 1, 1, 1, 3], [4, 1, 1, 3, 1, 1], [1, 1, 3, 1, 4, 1],
    [1, 1, 4, 1, 3, 1], [3, 1, 1, 1, 4, 1], [4, 1, 1, 1, 3, 1], [2, 1, 1, 4, 1, 2],
    [2, 1, 1, 2, 1, 4], [2, 1, 1, 2, 3, 2], [2, 3, 3, 1, 1, 1],
];

const CODE_START_A: usize = 103;
const CODE_START_B: usize = 104;
const CODE_START_C: usize = 105;
const CODE_CODE_A: usize = 101;
const CODE_CODE_B: usize = 100;
const CODE_CODE_C: usize = 99;
const CODE_SHIFT: usize = 98;
const CODE_FNC_1: usize = 102;
const CODE_FNC_2: usize = 97;
const CODE_FNC_3: usize = 96;
const CODE_STOP: usize = 106;

const MAX_AVG_VARIANCE: f32 = 0.25;
const MAX_INDIVIDUAL_VARIANCE: f32 = 0.7;

#[derive(Clone, Copy, PartialEq)]
enum CodeSet {
    A,
    B,
    C,
}

#[derive(Debug, Default)]
pub struct Code128Reader;

impl Code128Reader {
    pub const fn new() -> Self {
        Self
    }

    fn find_start_pattern(row: &BitArray) -> Result<(usize, usize, usize)> {
        let width = row.size();
        let mut row_offset = 0usize;
        while row_offset < width && !row.get(row_offset) {
            row_offset += 1;
        }

        let mut counter_position = 0usize;
        let mut counters = [0u32; 6];
        let mut pattern_start = row_offset;
        let mut is_white = false;

        for i in row_offset..width {
            let pixel = row.get(i);
            if pixel != is_white {
                counters[counter_position] += 1;
            } else {
                if counter_position == 5 {
                    let mut best_variance = MAX_AVG_VARIANCE;
                    let mut best_match = None;
                    for start_code in [CODE_START_A, CODE_START_B, CODE_START_C] {
                        let variance = pattern_match_variance(&counters, &CODE_PATTERNS[start_code], MAX_INDIVIDUAL_VARIANCE);
                        if variance < best_variance {
                            best_variance = variance;
                            best_match = Some(start_code);
                        }
                    }
                    if let Some(start_code) = best_match {
                        let quiet_start = pattern_start.saturating_sub((i - pattern_start) / 4);
                        if row.is_range(quiet_start, pattern_start, false) {
                            return Ok((pattern_start, i, start_code));
                        }
                    }
                    pattern_start += (counters[0] + counters[1]) as usize;
                    for y in 2..6 {
                        counters[y - 2] = counters[y];
                    }
                    counters[4] = 0;
                    counters[5] = 0;
                    counter_position -= 1;
                } else {
                    counter_position += 1;
                }
                counters[counter_position] = 1;
                is_white = !is_white;
            }
        }
        Err(Exceptions::not_found("could not find a Code 128 start pattern"))
    }

    fn decode_code(row: &BitArray, counters: &mut [u32; 6], row_offset: usize) -> Result<usize> {
        record_pattern(row, row_offset, counters)?;
        let mut best_variance = MAX_AVG_VARIANCE;
        let mut best_match = None;
        for (code, pattern) in CODE_PATTERNS.iter().enumerate() {
            let variance = pattern_match_variance(counters, pattern, MAX_INDIVIDUAL_VARIANCE);
            if variance < best_variance {
                best_variance = variance;
                best_match = Some(code);
            }
        }
        best_match.ok_or_else(|| Exceptions::not_found("unrecognized Code 128 symbol"))
    }
}

impl OneDReader for Code128Reader {
    fn decode_row(&mut self, row_number: u32, row: &BitArray, _hints: &DecodeHints) -> Result<RXingResult> {
        let (start_start, start_end, start_code) = Self::find_start_pattern(row)?;

        let mut code_set = match start_code {
            CODE_START_A => CodeSet::A,
            CODE_START_B => CodeSet::B,
            _ => CodeSet::C,
        };

        let mut raw_codes = vec![start_code as u32];
        let mut result = String::new();
        let mut row_offset = start_end;
        let mut counters = [0u32; 6];
        let mut checksum_total = start_code as u32;
        let mut multiplier = 0u32;
        let mut done = false;
        let mut last_start = start_start;
        let mut shift_next_once = false;

        while !done {
            let last_code_set = code_set;
            let code = Self::decode_code(row, &mut counters, row_offset)?;
            raw_codes.push(code as u32);
            last_start = row_offset;
            row_offset += counters.iter().sum::<u32>() as usize;

            if code != CODE_STOP {
                multiplier += 1;
                checksum_total += multiplier * code as u32;
            }

            if last_code_set == CodeSet::C && code <= 99 {
                result.push_str(&format!("{code:02}"));
                if shift_next_once {
                    code_set = last_code_set;
                    shift_next_once = false;
                }
            } else {
                match code {
                    CODE_STOP => done = true,
                    0..=95 => {
                        let value = match last_code_set {
                            CodeSet::A => {
                                if code < 64 {
                                    (code + 32) as u8 as char
                                } else {
                                    (code - 64) as u8 as char
                                }
                            }
                            _ => (code + 32) as u8 as char,
                        };
                        result.push(value);
                        if shift_next_once {
                            code_set = last_code_set;
                            shift_next_once = false;
                        }
                    }
                    CODE_CODE_A => code_set = CodeSet::A,
                    CODE_CODE_B => code_set = CodeSet::B,
                    CODE_CODE_C => code_set = CodeSet::C,
                    CODE_SHIFT => {
                        shift_next_once = true;
                        code_set = if last_code_set == CodeSet::A { CodeSet::B } else { CodeSet::A };
                    }
                    CODE_FNC_1 | CODE_FNC_2 | CODE_FNC_3 => {}
                    _ => {}
                }
            }

            if row_offset >= row.size() && code != CODE_STOP {
                return Err(Exceptions::not_found("row ended before a Code 128 stop pattern"));
            }
        }

        // raw_codes is [start, ..symbols.., checksum, STOP]; checksum_total accumulated
        // every symbol up to but not including STOP, so it still includes the checksum
        // character's own contribution and must be compared against it directly.
        let checksum_symbol = raw_codes[raw_codes.len() - 2];
        checksum_total -= multiplier * checksum_symbol;
        if checksum_total % 103 != checksum_symbol {
            return Err(Exceptions::checksum_error("Code 128 checksum mismatch"));
        }

        if result.is_empty() {
            return Err(Exceptions::not_found("empty Code 128 payload"));
        }

        let left = (start_start + start_end) as f32 / 2.0;
        let right = last_start as f32;
        let points = vec![Point::new(left, row_number as f32), Point::new(right, row_number as f32)];
        let raw_bytes = result.clone().into_bytes();
        Ok(RXingResult::new(result, raw_bytes, points, BarcodeFormat::Code128))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pattern_table_rows_sum_to_eleven_modules() {
        for pattern in CODE_PATTERNS.iter().take(103) {
            assert_eq!(pattern.iter().sum::<u32>(), 11);
        }
    }

    #[test]
    fn decoding_a_blank_row_is_not_found() {
        let row = BitArray::with_size(200);
        let mut reader = Code128Reader::new();
        assert!(reader.decode_row(0, &row, &DecodeHints::default()).is_err());
    }
}
