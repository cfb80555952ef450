//! RSS-14 (GS1 DataBar): two "finder pattern + pair of data characters"
//! halves, one read left-to-right and one (having reversed the row) right
//! to left, cross-checked against each other's checksum and accumulated
//! across rows until the same pair shows up twice (ISO/IEC 24724:2006).

use crate::barcode_format::BarcodeFormat;
use crate::common::BitArray;
use crate::decode_hints::DecodeHints;
use crate::error::{Exceptions, Result};
use crate::oned::one_d_reader::OneDReader;
use crate::oned::patterns::{pattern_match_variance, record_pattern, record_pattern_in_reverse};
use crate::point::Point;
use crate::result::RXingResult;

const MIN_FINDER_PATTERN_RATIO: f32 = 9.5 / 12.0;
const MAX_FINDER_PATTERN_RATIO: f32 = 12.5 / 14.0;
const MAX_AVG_VARIANCE: f32 = 0.2;
const MAX_INDIVIDUAL_VARIANCE: f32 = 0.45;

const OUTSIDE_EVEN_TOTAL_SUBSET: [u32; 5] = [1, 10, 34, 70, 126];
const INSIDE_ODD_TOTAL_SUBSET: [u32; 4] = [4, 20, 48, 81];
const OUTSIDE_GSUM: [u32; 5] = [0, 161, 961, 2015, 2715];
const INSIDE_GSUM: [u32; 4] = [0, 336, 1036, 1516];
const OUTSIDE_ODD_WIDEST: [u32; 5] = [8, 6, 4, 3, 1];
const INSIDE_ODD_WIDEST: [u32; 4] = [2, 4, 6, 8];

const FINDER_PATTERNS: [[u32; 4]; 9] = [
    [3, 8, 2, 1],
    [3, 5, 5, 1],
    [3, 3, 7, 1],
    [3, 1, 9, 1],
    [2, 7, 4, 1],
    [2, 5, 6, 1],
    [2, 3, 8, 1],
    [1, 5, 7, 1],
    [1, 3, 9, 1],
];

#[derive(Debug, Clone, Copy)]
struct FinderPattern {
    value: u32,
    start_end: [usize; 2],
    points: [Point; 2],
}

#[derive(Debug, Clone, Copy)]
struct DataCharacter {
    value: u32,
    checksum_portion: u32,
}

#[derive(Debug, Clone)]
struct Pair {
    value: u32,
    checksum_portion: u32,
    finder: FinderPattern,
    count: u32,
}

#[derive(Debug, Default)]
pub struct Rss14Reader {
    possible_left_pairs: Vec<Pair>,
    possible_right_pairs: Vec<Pair>,
    odd_rounding_errors: [f32; 4],
    even_rounding_errors: [f32; 4],
    odd_counts: [u32; 4],
    even_counts: [u32; 4],
}

impl Rss14Reader {
    pub const fn new() -> Self {
        Self {
            possible_left_pairs: Vec::new(),
            possible_right_pairs: Vec::new(),
            odd_rounding_errors: [0.0; 4],
            even_rounding_errors: [0.0; 4],
            odd_counts: [0; 4],
            even_counts: [0; 4],
        }
    }

    fn add_or_tally(possible_pairs: &mut Vec<Pair>, pair: Option<Pair>) {
        let Some(pair) = pair else { return };
        for other in possible_pairs.iter_mut() {
            if other.value == pair.value {
                other.count += 1;
                return;
            }
        }
        possible_pairs.push(pair);
    }

    fn check_checksum(left: &Pair, right: &Pair) -> bool {
        let check_value = (left.checksum_portion + 16 * right.checksum_portion) % 79;
        let mut target = 9 * left.finder.value + right.finder.value;
        if target > 72 {
            target -= 1;
        }
        if target > 8 {
            target -= 1;
        }
        check_value == target
    }

    fn construct_result(left: &Pair, right: &Pair) -> RXingResult {
        let symbol_value = 4_537_077u64 * left.value as u64 + right.value as u64;
        let digits = symbol_value.to_string();

        let mut buffer = String::with_capacity(14);
        for _ in 0..13usize.saturating_sub(digits.len()) {
            buffer.push('0');
        }
        buffer.push_str(&digits);

        let mut check_digit = 0u32;
        for (i, c) in buffer.chars().enumerate() {
            let digit = c.to_digit(10).expect("buffer holds only decimal digits");
            check_digit += if i % 2 == 0 { 3 * digit } else { digit };
        }
        check_digit = (10 - check_digit % 10) % 10;
        buffer.push(char::from_digit(check_digit, 10).expect("check digit in 0..10"));

        let points = vec![left.finder.points[0], left.finder.points[1], right.finder.points[0], right.finder.points[1]];
        let raw_bytes = buffer.clone().into_bytes();
        RXingResult::new(buffer, raw_bytes, points, BarcodeFormat::Rss14)
    }

    fn find_finder_pattern(row: &BitArray, right_finder_pattern: bool) -> Result<[usize; 2]> {
        let width = row.size();
        let mut row_offset = 0usize;
        let mut is_white = false;
        while row_offset < width {
            is_white = !row.get(row_offset);
            if right_finder_pattern == is_white {
                break;
            }
            row_offset += 1;
        }

        let mut counters = [0u32; 4];
        let mut counter_position = 0usize;
        let mut pattern_start = row_offset;
        for x in row_offset..width {
            if row.get(x) != is_white {
                counters[counter_position] += 1;
            } else {
                if counter_position == 3 {
                    if is_finder_pattern(&counters) {
                        return Ok([pattern_start, x]);
                    }
                    pattern_start += (counters[0] + counters[1]) as usize;
                    counters[0] = counters[2];
                    counters[1] = counters[3];
                    counters[2] = 0;
                    counters[3] = 0;
                    counter_position -= 1;
                } else {
                    counter_position += 1;
                }
                counters[counter_position] = 1;
                is_white = !is_white;
            }
        }
        Err(Exceptions::not_found("could not find an RSS-14 finder pattern"))
    }

    fn parse_found_finder_pattern(row: &BitArray, row_number: u32, right: bool, start_end: [usize; 2]) -> Result<FinderPattern> {
        let first_is_black = row.get(start_end[0]);
        let mut first_element_start = start_end[0] as i64 - 1;
        while first_element_start >= 0 && first_is_black != row.get(first_element_start as usize) {
            first_element_start -= 1;
        }
        first_element_start += 1;

        let mut counters = [0u32; 4];
        record_pattern(row, first_element_start as usize, &mut counters)?;

        let value = parse_finder_value(&counters)?;

        let mut start = first_element_start as usize;
        let mut end = start_end[1];
        if right {
            start = row.size() - 1 - start;
            end = row.size() - 1 - end;
        }

        Ok(FinderPattern {
            value,
            start_end: [first_element_start as usize, start_end[1]],
            points: [Point::new(start as f32, row_number as f32), Point::new(end as f32, row_number as f32)],
        })
    }

    fn decode_pair(&mut self, row: &BitArray, right: bool, row_number: u32, hints: &DecodeHints) -> Option<Pair> {
        let start_end = Self::find_finder_pattern(row, right).ok()?;
        let pattern = Self::parse_found_finder_pattern(row, row_number, right, start_end).ok()?;

        let mut center = (start_end[0] + start_end[1]) as f32 / 2.0 - 0.5;
        if right {
            center = row.size() as f32 - 1.0 - center;
        }
        hints.notify_point(center, row_number as f32);

        let outside = self.decode_data_character(row, &pattern, true).ok()?;
        let inside = self.decode_data_character(row, &pattern, false).ok()?;

        Some(Pair {
            value: 1597 * outside.value + inside.value,
            checksum_portion: outside.checksum_portion + 4 * inside.checksum_portion,
            finder: pattern,
            count: 1,
        })
    }

    fn decode_data_character(&mut self, row: &BitArray, pattern: &FinderPattern, outside_char: bool) -> Result<DataCharacter> {
        let mut counters = [0u32; 8];
        if outside_char {
            record_pattern_in_reverse(row, pattern.start_end[0], &mut counters)?;
        } else {
            record_pattern(row, pattern.start_end[1], &mut counters)?;
            counters.reverse();
        }

        let num_modules = if outside_char { 16.0 } else { 15.0 };
        let element_width = counters.iter().sum::<u32>() as f32 / num_modules;

        for (i, &counter) in counters.iter().enumerate() {
            let value = counter as f32 / element_width;
            let count = ((value + 0.5) as u32).clamp(1, 8);
            let offset = i / 2;
            if i % 2 == 0 {
                self.odd_counts[offset] = count;
                self.odd_rounding_errors[offset] = value - count as f32;
            } else {
                self.even_counts[offset] = count;
                self.even_rounding_errors[offset] = value - count as f32;
            }
        }

        self.adjust_odd_even_counts(outside_char, num_modules as u32)?;

        let mut odd_sum = 0u32;
        let mut odd_checksum_portion = 0u32;
        for &c in self.odd_counts.iter().rev() {
            odd_checksum_portion = odd_checksum_portion * 9 + c;
            odd_sum += c;
        }
        let mut even_sum = 0u32;
        let mut even_checksum_portion = 0u32;
        for &c in self.even_counts.iter().rev() {
            even_checksum_portion = even_checksum_portion * 9 + c;
            even_sum += c;
        }
        let checksum_portion = odd_checksum_portion + 3 * even_checksum_portion;

        if outside_char {
            if odd_sum % 2 != 0 || !(4..=12).contains(&odd_sum) {
                return Err(Exceptions::not_found("outside data character odd-sum out of range"));
            }
            let group = ((12 - odd_sum) / 2) as usize;
            let odd_widest = OUTSIDE_ODD_WIDEST[group];
            let even_widest = 9 - odd_widest;
            let v_odd = rss_value(&self.odd_counts, odd_widest, false);
            let v_even = rss_value(&self.even_counts, even_widest, true);
            Ok(DataCharacter { value: v_odd * OUTSIDE_EVEN_TOTAL_SUBSET[group] + v_even + OUTSIDE_GSUM[group], checksum_portion })
        } else {
            if even_sum % 2 != 0 || !(4..=10).contains(&even_sum) {
                return Err(Exceptions::not_found("inside data character even-sum out of range"));
            }
            let group = ((10 - even_sum) / 2) as usize;
            let odd_widest = INSIDE_ODD_WIDEST[group];
            let even_widest = 9 - odd_widest;
            let v_odd = rss_value(&self.odd_counts, odd_widest, true);
            let v_even = rss_value(&self.even_counts, even_widest, false);
            Ok(DataCharacter { value: v_even * INSIDE_ODD_TOTAL_SUBSET[group] + v_odd + INSIDE_GSUM[group], checksum_portion })
        }
    }

    fn adjust_odd_even_counts(&mut self, outside_char: bool, num_modules: u32) -> Result<()> {
        let odd_sum: u32 = self.odd_counts.iter().sum();
        let even_sum: u32 = self.even_counts.iter().sum();

        let (odd_max, odd_min, even_max, even_min) = if outside_char { (12, 4, 12, 4) } else { (11, 5, 10, 4) };

        let mut increment_odd = false;
        let mut decrement_odd = false;
        let mut increment_even = false;
        let mut decrement_even = false;

        if odd_sum > odd_max {
            decrement_odd = true;
        } else if odd_sum < odd_min {
            increment_odd = true;
        }
        if even_sum > even_max {
            decrement_even = true;
        } else if even_sum < even_min {
            increment_even = true;
        }

        let mismatch = odd_sum as i32 + even_sum as i32 - num_modules as i32;
        let odd_parity_bad = (odd_sum % 2 == 1) == outside_char;
        let even_parity_bad = even_sum % 2 == 1;

        let not_found = || Exceptions::not_found("RSS-14 odd/even count adjustment failed");
        match mismatch {
            1 => {
                if odd_parity_bad {
                    if even_parity_bad {
                        return Err(not_found());
                    }
                    decrement_odd = true;
                } else {
                    if !even_parity_bad {
                        return Err(not_found());
                    }
                    decrement_even = true;
                }
            }
            -1 => {
                if odd_parity_bad {
                    if even_parity_bad {
                        return Err(not_found());
                    }
                    increment_odd = true;
                } else {
                    if !even_parity_bad {
                        return Err(not_found());
                    }
                    increment_even = true;
                }
            }
            0 => {
                if odd_parity_bad {
                    if !even_parity_bad {
                        return Err(not_found());
                    }
                    if odd_sum < even_sum {
                        increment_odd = true;
                        decrement_even = true;
                    } else {
                        decrement_odd = true;
                        increment_even = true;
                    }
                } else if even_parity_bad {
                    return Err(not_found());
                }
            }
            _ => return Err(not_found()),
        }

        if increment_odd {
            if decrement_odd {
                return Err(not_found());
            }
            bump(&mut self.odd_counts, &self.odd_rounding_errors, true);
        }
        if decrement_odd {
            bump(&mut self.odd_counts, &self.odd_rounding_errors, false);
        }
        if increment_even {
            if decrement_even {
                return Err(not_found());
            }
            bump(&mut self.even_counts, &self.even_rounding_errors, true);
        }
        if decrement_even {
            bump(&mut self.even_counts, &self.even_rounding_errors, false);
        }
        Ok(())
    }
}

fn bump(counts: &mut [u32; 4], errors: &[f32; 4], up: bool) {
    let mut index = 0;
    let mut biggest = errors[0];
    for (i, &e) in errors.iter().enumerate().skip(1) {
        if up && e > biggest || !up && e < biggest {
            biggest = e;
            index = i;
        }
    }
    if up {
        counts[index] += 1;
    } else {
        counts[index] -= 1;
    }
}

fn is_finder_pattern(counters: &[u32; 4]) -> bool {
    let first_two_sum = counters[0] + counters[1];
    let sum = first_two_sum + counters[2] + counters[3];
    let ratio = first_two_sum as f32 / sum as f32;
    if (MIN_FINDER_PATTERN_RATIO..=MAX_FINDER_PATTERN_RATIO).contains(&ratio) {
        let min = *counters.iter().min().unwrap();
        let max = *counters.iter().max().unwrap();
        return max < 10 * min;
    }
    false
}

fn parse_finder_value(counters: &[u32; 4]) -> Result<u32> {
    for (value, pattern) in FINDER_PATTERNS.iter().enumerate() {
        if pattern_match_variance(counters, pattern, MAX_INDIVIDUAL_VARIANCE) < MAX_AVG_VARIANCE {
            return Ok(value as u32);
        }
    }
    Err(Exceptions::not_found("no RSS-14 finder pattern value matched"))
}

/// Converts a recorded module-width vector into the combinatorial index
/// ISO/IEC 24724 assigns it ("RSS value"), the width-constrained analogue
/// of reading a digit directly off a table.
fn rss_value(widths: &[u32; 4], max_width: u32, no_narrow: bool) -> u32 {
    let elements = widths.len();
    let n: u32 = widths.iter().sum();
    let mut val = 0i64;
    let mut narrow_mask = 0u32;
    for bar in 0..elements - 1 {
        let mut elm_width = 1u32;
        narrow_mask |= 1 << bar;
        while elm_width < widths[bar] {
            let mut sub_val = combins((n - elm_width - 1) as i64, (elements - bar - 2) as i64);
            if no_narrow && narrow_mask == 0 && (n as i64 - elm_width as i64 - (elements - bar - 1) as i64 >= (elements - bar - 1) as i64) {
                sub_val -= combins((n - elm_width - (elements - bar) as u32) as i64, (elements - bar - 2) as i64);
            }
            if elements - bar - 1 > 1 {
                let mut less_val = 0i64;
                let mut mxw_element = n as i64 - elm_width as i64 - (elements - bar - 2) as i64;
                while mxw_element > max_width as i64 {
                    less_val += combins(n as i64 - elm_width as i64 - mxw_element - 1, (elements - bar - 3) as i64);
                    mxw_element -= 1;
                }
                sub_val -= less_val * (elements - bar - 1) as i64;
            } else if n as i64 - elm_width as i64 > max_width as i64 {
                sub_val -= 1;
            }
            val += sub_val;

            elm_width += 1;
            narrow_mask &= !(1 << bar);
        }
    }
    val as u32
}

fn combins(n: i64, r: i64) -> i64 {
    let (min_denom, max_denom) = if n - r > r { (r, n - r) } else { (n - r, r) };
    let mut val = 1i64;
    let mut j = 1i64;
    let mut i = n;
    while i > max_denom {
        val *= i;
        if j <= min_denom {
            val /= j;
            j += 1;
        }
        i -= 1;
    }
    while j <= min_denom {
        val /= j;
        j += 1;
    }
    val
}

impl OneDReader for Rss14Reader {
    fn decode_row(&mut self, row_number: u32, row: &BitArray, hints: &DecodeHints) -> Result<RXingResult> {
        let left_pair = self.decode_pair(row, false, row_number, hints);
        Self::add_or_tally(&mut self.possible_left_pairs, left_pair);

        let mut reversed = row.clone();
        reversed.reverse();
        let right_pair = self.decode_pair(&reversed, true, row_number, hints);
        Self::add_or_tally(&mut self.possible_right_pairs, right_pair);

        for left in &self.possible_left_pairs {
            if left.count <= 1 {
                continue;
            }
            for right in &self.possible_right_pairs {
                if right.count > 1 && Self::check_checksum(left, right) {
                    return Ok(Self::construct_result(left, right));
                }
            }
        }
        Err(Exceptions::not_found_bare())
    }

    fn reset(&mut self) {
        self.possible_left_pairs.clear();
        self.possible_right_pairs.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn finder_pattern_ratio_rejects_flat_runs() {
        assert!(!is_finder_pattern(&[1, 1, 1, 1]));
    }

    #[test]
    fn finder_pattern_ratio_accepts_known_pattern() {
        assert!(is_finder_pattern(&[8, 8, 3, 1]));
    }

    #[test]
    fn decoding_a_blank_row_is_not_found() {
        let row = BitArray::with_size(200);
        let mut reader = Rss14Reader::new();
        assert!(reader.decode_row(0, &row, &DecodeHints::default()).is_err());
    }
}
