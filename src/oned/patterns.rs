//! Run-length recording and variance-tolerant pattern matching shared by
//! every 1D reader. Aztec, Data Matrix and PDF417 sample a 2D module grid
//! instead; the 1D family uses this analogous bar/space run model.

use crate::common::BitArray;
use crate::error::{Exceptions, Result};

pub const MAX_AVG_VARIANCE: f32 = 0.48;
pub const MAX_INDIVIDUAL_VARIANCE: f32 = 0.7;

/// Records consecutive run lengths starting at `start`, alternating
/// white/black (or black/white, picked up from the bit at `start`), filling
/// exactly `counters.len()` runs. Errors if the row ends before enough runs
/// are collected.
pub fn record_pattern(row: &BitArray, start: usize, counters: &mut [u32]) -> Result<()> {
    let num_counters = counters.len();
    counters.fill(0);
    let end = row.size();
    let mut i = start;
    let mut is_white = !row.get(i);
    let mut counter_position = 0usize;

    while i < end {
        if row.get(i) != is_white {
            counters[counter_position] += 1;
        } else {
            counter_position += 1;
            if counter_position == num_counters {
                break;
            }
            counters[counter_position] = 1;
            is_white = !is_white;
        }
        i += 1;
    }
    if counter_position != num_counters - 1 {
        return Err(Exceptions::not_found("row ended before the expected number of runs"));
    }
    Ok(())
}

/// Same as [`record_pattern`] but always starts assuming a white run, used
/// where a reader has already stepped past a black guard bar.
pub fn record_pattern_in_reverse(row: &BitArray, start: usize, counters: &mut [u32]) -> Result<()> {
    let mut num_transitions_left = counters.len();
    let mut is_white = row.get(start);
    let mut i = start as i64;
    while i >= 0 && num_transitions_left >= 0 {
        if row.get(i as usize) != is_white {
            num_transitions_left -= 1;
            if num_transitions_left == 0 {
                break;
            }
            is_white = !is_white;
        }
        i -= 1;
    }
    if i < 0 {
        return Err(Exceptions::not_found("row ended before the expected number of runs"));
    }
    record_pattern(row, (i + 1) as usize, counters)
}

/// Normalized sum-of-squared-error between a counted run sequence and an
/// ideal integer pattern, scaled so a perfect match is 0.0 and each run is
/// individually capped at `max_individual_variance` of the unit width
/// before the whole match is rejected (ZXing's `patternMatchVariance`).
pub fn pattern_match_variance(counters: &[u32], pattern: &[u32], max_individual_variance: f32) -> f32 {
    let counters_total: u32 = counters.iter().sum();
    let pattern_total: u32 = pattern.iter().sum();
    if counters_total < pattern_total {
        return f32::INFINITY;
    }
    let unit_bar_width = counters_total as f32 / pattern_total as f32;
    let max_individual_variance = max_individual_variance * unit_bar_width;

    let mut total_variance = 0.0f32;
    for (&counter, &scaled) in counters.iter().zip(pattern.iter()) {
        let counter = counter as f32;
        let scaled_pattern = scaled as f32 * unit_bar_width;
        let variance = if counter > scaled_pattern { counter - scaled_pattern } else { scaled_pattern - counter };
        if variance > max_individual_variance {
            return f32::INFINITY;
        }
        total_variance += variance;
    }
    total_variance / counters_total as f32
}

/// Finds the index of the pattern in `patterns` whose shape best matches
/// `counters`, subject to an average-variance ceiling. Used by table-driven
/// readers (Code 39/93/Codabar) that match one character at a time.
pub fn best_match(counters: &[u32], patterns: &[&[u32]], max_avg_variance: f32) -> Option<usize> {
    let mut best_variance = max_avg_variance;
    let mut best_match = None;
    for (idx, pattern) in patterns.iter().enumerate() {
        let variance = pattern_match_variance(counters, pattern, MAX_INDIVIDUAL_VARIANCE);
        if variance < best_variance {
            best_variance = variance;
            best_match = Some(idx);
        }
    }
    best_match
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row_from_str(s: &str) -> BitArray {
        let mut row = BitArray::with_size(s.len());
        for (i, c) in s.chars().enumerate() {
            if c == '1' {
                row.set(i);
            }
        }
        row
    }

    #[test]
    fn record_pattern_reads_alternating_runs() {
        let row = row_from_str("0001110011");
        let mut counters = [0u32; 4];
        record_pattern(&row, 0, &mut counters).unwrap();
        assert_eq!(counters, [3, 3, 2, 2]);
    }

    #[test]
    fn exact_pattern_has_zero_variance() {
        let variance = pattern_match_variance(&[3, 3, 2, 2], &[3, 3, 2, 2], MAX_INDIVIDUAL_VARIANCE);
        assert!(variance < 1e-6);
    }

    #[test]
    fn wildly_different_pattern_is_rejected() {
        let variance = pattern_match_variance(&[1, 1, 1, 1], &[9, 9, 1, 1], MAX_INDIVIDUAL_VARIANCE);
        assert!(variance.is_infinite());
    }
}
