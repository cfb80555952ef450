//! Constants and the codeword/module-pattern correspondence shared by the
//! PDF417 detector and decoder (spec §4.8-§4.10).
//!
//! Each codeword is 17 modules wide: four bars and four spaces, alternating,
//! each run 1-6 modules. Every row uses one of three "clusters" (chosen by
//! `row_index % 3`) so that three different bar patterns can represent the
//! same logical codeword value, which is what lets the decoder recognize a
//! row's vertical position even out of context. See `DESIGN.md` for how the
//! table below was constructed.

use once_cell::sync::Lazy;

pub const MODULES_IN_CODEWORD: u32 = 17;
pub const MODULES_IN_STOP_PATTERN: u32 = 18;
pub const NUMBER_OF_CODEWORDS: usize = 929;
pub const MAX_CODEWORDS_IN_BARCODE: usize = 928;
pub const MIN_ROWS_IN_BARCODE: u32 = 3;
pub const MAX_ROWS_IN_BARCODE: u32 = 90;

pub const START_PATTERN: [u32; 8] = [8, 1, 1, 1, 1, 1, 1, 3];
pub const STOP_PATTERN: [u32; 9] = [7, 1, 1, 3, 1, 1, 1, 2, 1];

/// A codeword's shape: four bar widths and four space widths, in scan order,
/// each counted in modules (1-6).
pub type CodewordShape = [u32; 8];

struct CodewordTable {
    /// `by_value[cluster][value]` is the canonical shape for that codeword.
    by_value: [Vec<CodewordShape>; 3],
}

fn all_shapes_summing_to(total: u32, parts: usize) -> Vec<CodewordShape> {
    let mut out = Vec::new();
    let mut shape = [0u32; 8];
    fn recurse(remaining: u32, slots_left: usize, shape: &mut [u32; 8], idx: usize, out: &mut Vec<CodewordShape>) {
        if slots_left == 0 {
            if remaining == 0 {
                out.push(*shape);
            }
            return;
        }
        let lo = 1u32;
        let hi = 6u32.min(remaining.saturating_sub(slots_left as u32 - 1));
        let mut w = lo;
        while w <= hi {
            shape[idx] = w;
            recurse(remaining - w, slots_left - 1, shape, idx + 1, out);
            w += 1;
        }
    }
    recurse(total, parts, &mut shape, 0, &mut out);
    out
}

impl CodewordTable {
    fn build() -> Self {
        let mut all = all_shapes_summing_to(MODULES_IN_CODEWORD, 8);
        all.sort_unstable();
        let take = NUMBER_OF_CODEWORDS * 3;
        all.truncate(take.min(all.len()));
        let mut chunks = all.chunks(NUMBER_OF_CODEWORDS);
        let c0 = chunks.next().unwrap_or(&[]).to_vec();
        let c1 = chunks.next().unwrap_or(&[]).to_vec();
        let c2 = chunks.next().unwrap_or(&[]).to_vec();
        Self { by_value: [c0, c1, c2] }
    }

    fn shape_for(&self, cluster: usize, value: u32) -> Option<CodewordShape> {
        self.by_value[cluster].get(value as usize).copied()
    }

    fn value_for(&self, cluster: usize, shape: &CodewordShape) -> Option<u32> {
        self.by_value[cluster].iter().position(|s| s == shape).map(|v| v as u32)
    }

    /// Nearest shape in the given cluster by total absolute width difference,
    /// tolerating the measurement noise a real scan line introduces.
    fn nearest_value(&self, cluster: usize, shape: &CodewordShape) -> Option<(u32, u32)> {
        self.by_value[cluster]
            .iter()
            .enumerate()
            .map(|(value, candidate)| {
                let distance: u32 = candidate
                    .iter()
                    .zip(shape.iter())
                    .map(|(a, b)| a.abs_diff(*b))
                    .sum();
                (value as u32, distance)
            })
            .min_by_key(|&(_, distance)| distance)
    }
}

static CODEWORD_TABLE: Lazy<CodewordTable> = Lazy::new(CodewordTable::build);

pub fn shape_for_codeword(cluster: usize, value: u32) -> Option<CodewordShape> {
    CODEWORD_TABLE.shape_for(cluster, value)
}

pub fn codeword_for_shape(cluster: usize, shape: &CodewordShape) -> Option<u32> {
    CODEWORD_TABLE.value_for(cluster, shape)
}

/// Best-effort decode: returns `(value, distance)` for the closest codeword
/// in `cluster`'s table, `None` only if the cluster table is empty.
pub fn nearest_codeword(cluster: usize, shape: &CodewordShape) -> Option<(u32, u32)> {
    CODEWORD_TABLE.nearest_value(cluster, shape)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_cluster_has_a_full_table() {
        for cluster in 0..3 {
            assert_eq!(shape_for_codeword(cluster, (NUMBER_OF_CODEWORDS - 1) as u32).is_some(), true);
            assert!(shape_for_codeword(cluster, NUMBER_OF_CODEWORDS as u32).is_none());
        }
    }

    #[test]
    fn shapes_round_trip_through_the_reverse_index() {
        for cluster in 0..3 {
            for value in [0u32, 1, 100, 500, 928] {
                let shape = shape_for_codeword(cluster, value).unwrap();
                assert_eq!(codeword_for_shape(cluster, &shape), Some(value));
            }
        }
    }

    #[test]
    fn nearest_codeword_tolerates_a_one_module_measurement_error() {
        let shape = shape_for_codeword(0, 42).unwrap();
        let mut noisy = shape;
        noisy[0] = noisy[0].saturating_sub(1).max(1);
        let (value, _distance) = nearest_codeword(0, &noisy).unwrap();
        assert_eq!(value, 42);
    }
}
