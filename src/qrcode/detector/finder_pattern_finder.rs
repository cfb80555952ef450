//! Locates the three finder patterns of a QR Code in a binarized image by
//! scanning rows for the 1:1:3:1:1 dark/light ratio and cross-checking
//! vertically, horizontally and diagonally (spec §4.7, ISO/IEC 18004 §C).

use crate::common::bit_matrix::BitMatrix;
use crate::decode_hints::DecodeHints;
use crate::error::{Exceptions, Result};
use crate::point::Point;
use crate::qrcode::detector::finder_pattern::FinderPattern;
use crate::qrcode::detector::finder_pattern_info::FinderPatternInfo;

const CENTER_QUORUM: u32 = 2;
const MIN_SKIP: u32 = 3;
const MAX_MODULES: u32 = 97;

pub struct FinderPatternFinder<'a> {
    image: &'a BitMatrix,
    possible_centers: Vec<FinderPattern>,
    has_skipped: bool,
}

impl<'a> FinderPatternFinder<'a> {
    pub const fn new(image: &'a BitMatrix) -> Self {
        Self { image, possible_centers: Vec::new(), has_skipped: false }
    }

    pub fn find(&mut self, hints: &DecodeHints) -> Result<FinderPatternInfo> {
        let try_harder = hints.try_harder;
        let max_i = self.image.height();
        let max_j = self.image.width();

        let mut i_skip = (3 * max_i) / (4 * MAX_MODULES);
        if i_skip < MIN_SKIP || try_harder {
            i_skip = MIN_SKIP;
        }

        let mut done = false;
        let mut state_count = [0u32; 5];
        let mut i = i_skip - 1;
        while i < max_i && !done {
            state_count = [0, 0, 0, 0, 0];
            let mut current_state = 0usize;

            for j in 0..max_j {
                if self.image.get_or_false(j, i) {
                    if current_state & 1 == 1 {
                        current_state += 1;
                    }
                    state_count[current_state] += 1;
                } else {
                    if current_state & 1 == 0 {
                        if current_state == 4 {
                            if Self::found_pattern_cross(&state_count) {
                                let confirmed = self.handle_possible_center(&state_count, i, j, hints)?;
                                if confirmed {
                                    i_skip = 2;
                                    if self.has_skipped {
                                        done = self.have_multiply_confirmed_centers();
                                    } else {
                                        let row_skip = self.find_row_skip();
                                        if row_skip > state_count[2] {
                                            i += row_skip - state_count[2] - i_skip;
                                            i = i.min(max_i - 1);
                                        }
                                    }
                                    current_state = 0;
                                    state_count = [0, 0, 0, 0, 0];
                                } else {
                                    state_count.copy_within(2..5, 0);
                                    state_count[3] = 1;
                                    state_count[4] = 0;
                                    current_state = 3;
                                    continue;
                                }
                            } else {
                                state_count.copy_within(2..5, 0);
                                state_count[3] = 1;
                                state_count[4] = 0;
                                current_state = 3;
                                continue;
                            }
                        } else {
                            current_state += 1;
                            state_count[current_state] += 1;
                        }
                    } else {
                        state_count[current_state] += 1;
                    }
                }
            }

            if Self::found_pattern_cross(&state_count) {
                self.handle_possible_center(&state_count, i, max_j, hints)?;
            }

            i += i_skip;
        }

        let patterns = self.select_best_patterns()?;
        let ordered = Self::order_best_patterns(patterns);
        Ok(FinderPatternInfo::new(ordered))
    }

    fn center_from_end(state_count: &[u32; 5], end: u32) -> f32 {
        end as f32 - state_count[4] as f32 - state_count[3] as f32 - state_count[2] as f32 / 2.0
    }

    /// Ratios within 2 are considered a match, the way ZXing's `FOUND_`
    /// patterns tolerate printing/scanning noise.
    fn found_pattern_cross(state_count: &[u32; 5]) -> bool {
        let total: u32 = state_count.iter().sum();
        if total < 7 {
            return false;
        }
        let module_size = total as f32 / 7.0;
        let max_variance = module_size / 2.0;
        (module_size - state_count[0] as f32).abs() < max_variance
            && (module_size - state_count[1] as f32).abs() < max_variance
            && (3.0 * module_size - state_count[2] as f32).abs() < 3.0 * max_variance
            && (module_size - state_count[3] as f32).abs() < max_variance
            && (module_size - state_count[4] as f32).abs() < max_variance
    }

    fn cross_check_vertical(&self, start_i: u32, center_j: u32, max_count: u32, original_state_count_total: u32) -> Option<f32> {
        let max_i = self.image.height();
        let mut state_count = [0u32; 5];

        let mut i = start_i;
        while i > 0 && self.image.get_or_false(center_j, i - 1) {
            state_count[2] += 1;
            i -= 1;
        }
        if i == 0 {
            return None;
        }
        while i > 0 && !self.image.get_or_false(center_j, i - 1) && state_count[1] <= max_count {
            state_count[1] += 1;
            i -= 1;
        }
        if i == 0 || state_count[1] > max_count {
            return None;
        }
        while i > 0 && self.image.get_or_false(center_j, i - 1) && state_count[0] <= max_count {
            state_count[0] += 1;
            i -= 1;
        }
        if state_count[0] > max_count {
            return None;
        }

        let mut i = start_i + 1;
        while i < max_i && self.image.get_or_false(center_j, i) {
            state_count[2] += 1;
            i += 1;
        }
        if i == max_i {
            return None;
        }
        while i < max_i && !self.image.get_or_false(center_j, i) && state_count[3] < max_count {
            state_count[3] += 1;
            i += 1;
        }
        if i == max_i || state_count[3] >= max_count {
            return None;
        }
        while i < max_i && self.image.get_or_false(center_j, i) && state_count[4] < max_count {
            state_count[4] += 1;
            i += 1;
        }
        if state_count[4] >= max_count {
            return None;
        }

        let state_count_total = state_count.iter().sum::<u32>();
        if 5 * (state_count_total as i64 - original_state_count_total as i64).unsigned_abs() as u32 >= 2 * original_state_count_total {
            return None;
        }

        Self::found_pattern_cross(&state_count).then(|| Self::center_from_end(&state_count, i))
    }

    fn cross_check_horizontal(&self, start_j: u32, center_i: u32, max_count: u32, original_state_count_total: u32) -> Option<f32> {
        let max_j = self.image.width();
        let mut state_count = [0u32; 5];

        let mut j = start_j;
        while j > 0 && self.image.get_or_false(j - 1, center_i) {
            state_count[2] += 1;
            j -= 1;
        }
        if j == 0 {
            return None;
        }
        while j > 0 && !self.image.get_or_false(j - 1, center_i) && state_count[1] <= max_count {
            state_count[1] += 1;
            j -= 1;
        }
        if j == 0 || state_count[1] > max_count {
            return None;
        }
        while j > 0 && self.image.get_or_false(j - 1, center_i) && state_count[0] <= max_count {
            state_count[0] += 1;
            j -= 1;
        }
        if state_count[0] > max_count {
            return None;
        }

        let mut j = start_j + 1;
        while j < max_j && self.image.get_or_false(j, center_i) {
            state_count[2] += 1;
            j += 1;
        }
        if j == max_j {
            return None;
        }
        while j < max_j && !self.image.get_or_false(j, center_i) && state_count[3] < max_count {
            state_count[3] += 1;
            j += 1;
        }
        if j == max_j || state_count[3] >= max_count {
            return None;
        }
        while j < max_j && self.image.get_or_false(j, center_i) && state_count[4] < max_count {
            state_count[4] += 1;
            j += 1;
        }
        if state_count[4] >= max_count {
            return None;
        }

        let state_count_total = state_count.iter().sum::<u32>();
        if 5 * (state_count_total as i64 - original_state_count_total as i64).unsigned_abs() as u32 >= 2 * original_state_count_total {
            return None;
        }

        Self::found_pattern_cross(&state_count).then(|| Self::center_from_end(&state_count, j))
    }

    fn handle_possible_center(&mut self, state_count: &[u32; 5], i: u32, j: u32, hints: &DecodeHints) -> Result<bool> {
        let state_count_total: u32 = state_count.iter().sum();
        let center_j = Self::center_from_end(state_count, j);
        let center_j_int = center_j as u32;
        log::trace!("qrcode: probing finder candidate at row {i}, col {center_j_int}");

        let Some(center_i) = self.cross_check_vertical(i, center_j_int, state_count[2], state_count_total) else {
            return Ok(false);
        };

        let center_i_int = center_i as u32;
        let Some(center_j2) = self.cross_check_horizontal(center_j_int, center_i_int, state_count[2], state_count_total) else {
            return Ok(false);
        };
        let estimated_module_size = state_count_total as f32 / 7.0;

        let mut found = false;
        for (idx, existing) in self.possible_centers.iter().enumerate() {
            if existing.about_equals(estimated_module_size, Point::new(center_j2, center_i)) {
                self.possible_centers[idx] = existing.combine_estimate(Point::new(center_j2, center_i), estimated_module_size);
                found = true;
                break;
            }
        }
        if !found {
            self.possible_centers.push(FinderPattern::new(Point::new(center_j2, center_i), estimated_module_size, 1));
        }

        hints.notify_point(center_j2, center_i);
        Ok(true)
    }

    fn find_row_skip(&mut self) -> u32 {
        if self.possible_centers.len() <= 1 {
            return 0;
        }
        let mut first_confirmed: Option<Point> = None;
        for center in &self.possible_centers {
            if center.count() >= CENTER_QUORUM {
                if let Some(first) = first_confirmed {
                    self.has_skipped = true;
                    return (((first.x - center.point().x).abs() - (first.y - center.point().y).abs()).abs() / 2.0) as u32;
                }
                first_confirmed = Some(center.point());
            }
        }
        0
    }

    fn have_multiply_confirmed_centers(&self) -> bool {
        let mut confirmed_count = 0;
        let mut total_module_size = 0.0f32;
        for center in &self.possible_centers {
            if center.count() >= CENTER_QUORUM {
                confirmed_count += 1;
                total_module_size += center.estimated_module_size();
            }
        }
        if confirmed_count < 3 {
            return false;
        }
        let average = total_module_size / self.possible_centers.len() as f32;
        let mut total_deviation = 0.0f32;
        for center in &self.possible_centers {
            total_deviation += (center.estimated_module_size() - average).abs();
        }
        total_deviation <= 0.05 * total_module_size
    }

    fn select_best_patterns(&self) -> Result<[FinderPattern; 3]> {
        let start_size = self.possible_centers.len();
        if start_size < 3 {
            return Err(Exceptions::not_found("fewer than three finder patterns found"));
        }

        let mut centers = self.possible_centers.clone();

        if start_size > 3 {
            let mut total_module_size = 0.0f32;
            let mut square_module_size = 0.0f32;
            for center in &centers {
                let size = center.estimated_module_size();
                total_module_size += size;
                square_module_size += size * size;
            }
            let average = total_module_size / start_size as f32;
            let stddev = (square_module_size / start_size as f32 - average * average).sqrt();

            centers.sort_by(|a, b| {
                let da = (a.estimated_module_size() - average).abs();
                let db = (b.estimated_module_size() - average).abs();
                da.partial_cmp(&db).unwrap()
            });

            let limit = (0.2 * average).max(stddev);
            let mut i = 0;
            while i < centers.len() && centers.len() > 3 {
                if (centers[i].estimated_module_size() - average).abs() > limit {
                    centers.remove(i);
                } else {
                    i += 1;
                }
            }
        }

        if centers.len() > 3 {
            let mut total_module_size = 0.0f32;
            for center in &centers {
                total_module_size += center.estimated_module_size();
            }
            let average = total_module_size / centers.len() as f32;
            centers.sort_by(|a, b| {
                let da = (a.estimated_module_size() - average).abs();
                let db = (b.estimated_module_size() - average).abs();
                da.partial_cmp(&db).unwrap()
            });
            centers.truncate(3);
        }

        if centers.len() != 3 {
            return Err(Exceptions::not_found("could not narrow finder patterns down to three"));
        }

        Ok([centers[0], centers[1], centers[2]])
    }

    /// Orders three finder patterns `[bottom_left, top_left, top_right]` by
    /// finding the one opposite the longest side of the triangle they form
    /// (the top-left corner) and using the cross product's sign to tell
    /// left from right.
    fn order_best_patterns(mut patterns: [FinderPattern; 3]) -> [FinderPattern; 3] {
        let dist_ab = patterns[0].point().distance(&patterns[1].point());
        let dist_bc = patterns[1].point().distance(&patterns[2].point());
        let dist_ac = patterns[0].point().distance(&patterns[2].point());

        let (top_left, other1, other2) = if dist_bc >= dist_ab && dist_bc >= dist_ac {
            (patterns[0], patterns[1], patterns[2])
        } else if dist_ac >= dist_bc && dist_ac >= dist_ab {
            (patterns[1], patterns[0], patterns[2])
        } else {
            (patterns[2], patterns[0], patterns[1])
        };

        let cross_product = (other2.point().x - other1.point().x) * (top_left.point().y - other1.point().y)
            - (other2.point().y - other1.point().y) * (top_left.point().x - other1.point().x);

        if cross_product < 0.0 {
            patterns = [other2, top_left, other1];
        } else {
            patterns = [other1, top_left, other2];
        }
        patterns
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn draw_finder_pattern(image: &mut BitMatrix, cx: u32, cy: u32, module: u32) {
        for dy in 0..7 * module {
            for dx in 0..7 * module {
                let ring = ((dx / module).min(6), (dy / module).min(6));
                let is_dark = !(ring.0 == 1 || ring.0 == 5 || ring.1 == 1 || ring.1 == 5);
                if is_dark {
                    let x = cx - 3 * module + dx;
                    let y = cy - 3 * module + dy;
                    image.set_bool(x, y, true);
                }
            }
        }
    }

    #[test]
    fn finds_three_planted_finder_patterns() {
        let module = 4;
        let mut image = BitMatrix::new(200, 200).unwrap();
        draw_finder_pattern(&mut image, 30, 30, module);
        draw_finder_pattern(&mut image, 170, 30, module);
        draw_finder_pattern(&mut image, 30, 170, module);

        let mut finder = FinderPatternFinder::new(&image);
        let info = finder.find(&DecodeHints::default()).unwrap();
        assert!((info.top_left().point().x - 30.0).abs() < 6.0);
        assert!((info.top_right().point().x - 170.0).abs() < 6.0);
        assert!((info.bottom_left().point().y - 170.0).abs() < 6.0);
    }

    #[test]
    fn too_few_patterns_is_not_found() {
        let image = BitMatrix::new(50, 50).unwrap();
        let mut finder = FinderPatternFinder::new(&image);
        assert!(finder.find(&DecodeHints::default()).is_err());
    }
}
