//! Scans a rectangular region around the expected location of a QR Code
//! alignment pattern for its 1:1:1 dark/light/dark center ratio (spec
//! §4.7, ISO/IEC 18004 §C.2).

use crate::common::bit_matrix::BitMatrix;
use crate::error::{Exceptions, Result};
use crate::point::Point;
use crate::qrcode::detector::alignment_pattern::AlignmentPattern;

pub struct AlignmentPatternFinder<'a> {
    image: &'a BitMatrix,
    start_x: u32,
    start_y: u32,
    width: u32,
    height: u32,
    module_size: f32,
    possible_centers: Vec<AlignmentPattern>,
}

impl<'a> AlignmentPatternFinder<'a> {
    pub const fn new(image: &'a BitMatrix, start_x: u32, start_y: u32, width: u32, height: u32, module_size: f32) -> Self {
        Self { image, start_x, start_y, width, height, module_size, possible_centers: Vec::new() }
    }

    pub fn find(&mut self) -> Result<AlignmentPattern> {
        let max_j = self.start_x + self.width;

        let mut state_count = [0u32; 3];
        for i_gen in 0..self.height {
            let i = self.start_y + if i_gen & 1 == 0 { (i_gen + 1) / 2 } else { self.height - 1 - i_gen / 2 };
            state_count = [0, 0, 0];
            let mut j = self.start_x;

            while j < max_j && !self.image.get_or_false(j, i) {
                j += 1;
            }
            let mut current_state = 0usize;
            while j < max_j {
                if self.image.get_or_false(j, i) {
                    if current_state == 1 {
                        state_count[1] += 1;
                    } else if current_state == 0 {
                        state_count[0] += 1;
                    } else {
                        // transitioning out of the light run into a new dark run
                        if Self::found_pattern_diagonal(&state_count) {
                            if let Some(confirmed) = self.handle_possible_center(&state_count, i, j) {
                                return Ok(confirmed);
                            }
                        }
                        state_count = [state_count[2], 0, 0];
                        current_state = 0;
                        state_count[0] = 1;
                    }
                } else if current_state == 1 {
                    state_count[1] += 1;
                } else if current_state == 0 {
                    current_state = 1;
                    state_count[1] = 1;
                } else {
                    current_state = 2;
                    state_count[2] += 1;
                }
                j += 1;
            }
            if Self::found_pattern_diagonal(&state_count) {
                if let Some(confirmed) = self.handle_possible_center(&state_count, i, max_j) {
                    return Ok(confirmed);
                }
            }
        }

        if !self.possible_centers.is_empty() {
            return Ok(self.possible_centers[0]);
        }

        Err(Exceptions::not_found("no alignment pattern found in the expected region"))
    }

    fn center_from_end(state_count: &[u32; 3], end: u32) -> f32 {
        end as f32 - state_count[2] as f32 - state_count[1] as f32 / 2.0
    }

    fn found_pattern_diagonal(state_count: &[u32; 3]) -> bool {
        let total: u32 = state_count.iter().sum();
        if total < 3 {
            return false;
        }
        let module_size = total as f32 / 3.0;
        let max_variance = module_size / 2.0;
        (module_size - state_count[0] as f32).abs() < max_variance
            && (module_size - state_count[1] as f32).abs() < max_variance
            && (module_size - state_count[2] as f32).abs() < max_variance
    }

    fn cross_check_vertical(&self, start_i: u32, center_j: u32, max_count: u32, original_state_count_total: u32) -> Option<f32> {
        let max_i = self.image.height();
        let mut state_count = [0u32; 3];

        let mut i = start_i;
        while i > 0 && self.image.get_or_false(center_j, i - 1) && state_count[1] <= max_count {
            state_count[1] += 1;
            i -= 1;
        }
        if i == 0 || state_count[1] > max_count {
            return None;
        }
        while i > 0 && !self.image.get_or_false(center_j, i - 1) && state_count[0] <= max_count {
            state_count[0] += 1;
            i -= 1;
        }
        if state_count[0] > max_count {
            return None;
        }

        let mut i = start_i + 1;
        while i < max_i && self.image.get_or_false(center_j, i) && state_count[1] <= max_count {
            state_count[1] += 1;
            i += 1;
        }
        if i == max_i || state_count[1] > max_count {
            return None;
        }
        while i < max_i && !self.image.get_or_false(center_j, i) && state_count[2] <= max_count {
            state_count[2] += 1;
            i += 1;
        }
        if state_count[2] > max_count {
            return None;
        }

        let state_count_total = state_count.iter().sum::<u32>();
        if 5 * (state_count_total as i64 - original_state_count_total as i64).unsigned_abs() as u32 >= 2 * original_state_count_total {
            return None;
        }

        Self::found_pattern_diagonal(&state_count).then(|| Self::center_from_end(&state_count, i))
    }

    fn handle_possible_center(&mut self, state_count: &[u32; 3], i: u32, j: u32) -> Option<AlignmentPattern> {
        let state_count_total: u32 = state_count.iter().sum();
        let center_j = Self::center_from_end(state_count, j);
        let center_i = self.cross_check_vertical(i, center_j as u32, 2 * state_count[1], state_count_total)?;

        let estimated_module_size = state_count_total as f32 / 3.0;
        for (idx, existing) in self.possible_centers.iter().enumerate() {
            if existing.about_equals(estimated_module_size, Point::new(center_j, center_i)) {
                let combined = existing.combine_estimate(Point::new(center_j, center_i), estimated_module_size);
                self.possible_centers[idx] = combined;
                return Some(combined);
            }
        }
        let pattern = AlignmentPattern::new(Point::new(center_j, center_i), estimated_module_size);
        self.possible_centers.push(pattern);
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn finds_a_planted_alignment_pattern() {
        let mut image = BitMatrix::new(60, 60).unwrap();
        for dy in 0i32..5 {
            for dx in 0i32..5 {
                let dark = !(dx == 1 || dx == 3 || dy == 1 || dy == 3) || (dx == 2 && dy == 2);
                if dark {
                    image.set_bool((30 - 2 + dx) as u32, (30 - 2 + dy) as u32, true);
                }
            }
        }
        let mut finder = AlignmentPatternFinder::new(&image, 20, 20, 20, 20, 1.0);
        let found = finder.find().unwrap();
        assert!((found.point().x - 30.0).abs() < 3.0);
        assert!((found.point().y - 30.0).abs() < 3.0);
    }

    #[test]
    fn no_pattern_present_is_not_found() {
        let image = BitMatrix::new(60, 60).unwrap();
        let mut finder = AlignmentPatternFinder::new(&image, 20, 20, 20, 20, 1.0);
        assert!(finder.find().is_err());
    }
}
