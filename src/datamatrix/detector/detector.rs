//! Locates a Data Matrix symbol in a binarized image and samples its modules
//! into a [`BitMatrix`] ready for [`crate::datamatrix::decoder::decode`]
//! (spec §4.8).
//!
//! A Data Matrix symbol's finder pattern is an L made of two solid borders
//! plus two borders that alternate black and white (the "clock track"),
//! rather than a QR Code's three corner squares, so this walks a different
//! path to the same [`DetectorResult`]: find four rough corners with
//! [`WhiteRectangleDetector`], tell the two solid sides from the two
//! alternating ones by counting color transitions along each candidate edge,
//! derive the symbol's module dimensions from the alternating sides'
//! transition counts, and sample the grid.

use crate::common::bit_matrix::BitMatrix;
use crate::common::detector_result::DetectorResult;
use crate::common::grid_sampler;
use crate::common::white_rectangle_detector::WhiteRectangleDetector;
use crate::error::{Exceptions, Result};
use crate::point::Point;

pub struct Detector<'a> {
    image: &'a BitMatrix,
}

impl<'a> Detector<'a> {
    pub const fn new(image: &'a BitMatrix) -> Self {
        Self { image }
    }

    pub fn detect(&self) -> Result<DetectorResult> {
        let corners = WhiteRectangleDetector::new(self.image)?.detect()?;
        let [point_a, point_b, point_c, point_d] = corners;

        // Candidate pairs: A and D sit on one diagonal, B and C on the
        // other, so every edge of the quadrilateral connects one of A/D to
        // one of B/C.
        let pairs = [(0usize, 1usize), (0, 2), (1, 3), (2, 3)];
        let points = [point_a, point_b, point_c, point_d];

        let mut by_transitions: Vec<(usize, usize, u32)> = pairs
            .iter()
            .map(|&(from, to)| (from, to, self.transitions_between(points[from], points[to])))
            .collect();
        by_transitions.sort_by_key(|&(_, _, transitions)| transitions);

        // The two lowest-transition edges are the solid L; tally which
        // corner each endpoint names to find the shared vertex.
        let mut counts = [0u8; 4];
        for &(from, to, _) in &by_transitions[0..2] {
            counts[from] += 1;
            counts[to] += 1;
        }

        let bottom_left_idx = counts
            .iter()
            .position(|&c| c == 2)
            .ok_or_else(|| Exceptions::not_found("could not identify a shared corner between the two solid sides"))?;
        let mut singles = counts.iter().enumerate().filter(|&(_, &c)| c == 1).map(|(i, _)| i);
        let maybe_top_left_idx = singles.next().ok_or_else(|| Exceptions::not_found("could not identify data matrix corners"))?;
        let maybe_bottom_right_idx = singles.next().ok_or_else(|| Exceptions::not_found("could not identify data matrix corners"))?;
        let top_right_idx = counts
            .iter()
            .position(|&c| c == 0)
            .ok_or_else(|| Exceptions::not_found("could not identify the fourth data matrix corner"))?;

        let top_right = points[top_right_idx];

        let ordered = order_best_patterns([points[maybe_top_left_idx], points[bottom_left_idx], points[maybe_bottom_right_idx]]);
        let bottom_right = ordered[0];
        let bottom_left = ordered[1];
        let top_left = ordered[2];

        let mut dimension_top = self.transitions_between(top_left, top_right);
        let mut dimension_right = self.transitions_between(bottom_right, top_right);
        round_to_even(&mut dimension_top);
        dimension_top += 2;
        round_to_even(&mut dimension_right);
        dimension_right += 2;

        let corrected_top_right = self
            .correct_top_right(bottom_left, bottom_right, top_left, top_right, dimension_top, dimension_right)
            .unwrap_or(top_right);

        // Rectangular symbols keep the two side lengths independent;
        // square ones reconcile both edges' transition counts into one.
        let (top_right, dimension_top, dimension_right) = if 4 * dimension_top >= 7 * dimension_right || 4 * dimension_right >= 7 * dimension_top {
            let mut t = self.transitions_between(top_left, corrected_top_right);
            round_to_even(&mut t);
            let mut r = self.transitions_between(bottom_right, corrected_top_right);
            round_to_even(&mut r);
            (corrected_top_right, t, r)
        } else {
            let mut dimension = self.transitions_between(top_left, corrected_top_right).max(self.transitions_between(bottom_right, corrected_top_right)) + 1;
            round_to_even(&mut dimension);
            (corrected_top_right, dimension, dimension)
        };

        let bits = grid_sampler::sample_grid_quad(
            self.image,
            dimension_top,
            dimension_right,
            0.5,
            0.5,
            dimension_top as f32 - 0.5,
            0.5,
            dimension_top as f32 - 0.5,
            dimension_right as f32 - 0.5,
            0.5,
            dimension_right as f32 - 0.5,
            top_left.x,
            top_left.y,
            top_right.x,
            top_right.y,
            bottom_right.x,
            bottom_right.y,
            bottom_left.x,
            bottom_left.y,
        )?;

        Ok(DetectorResult::new(bits, vec![top_left, bottom_left, bottom_right, top_right]))
    }

    /// Nudges the top-right corner toward the point that keeps both
    /// adjacent sides' transition counts consistent with the two already-
    /// measured dimensions, the way a fourth corner is re-estimated from
    /// the other three once their geometry is known.
    fn correct_top_right(
        &self,
        bottom_left: Point,
        bottom_right: Point,
        top_left: Point,
        top_right: Point,
        dimension_top: u32,
        dimension_right: u32,
    ) -> Option<Point> {
        let corr_top = bottom_left.distance(&bottom_right) / dimension_top as f32;
        let norm_top = top_left.distance(&top_right);
        let cos_top = (top_right.x - top_left.x) / norm_top;
        let sin_top = (top_right.y - top_left.y) / norm_top;
        let c1 = Point::new(top_right.x + corr_top * cos_top, top_right.y + corr_top * sin_top);

        let corr_right = bottom_left.distance(&top_left) / dimension_right as f32;
        let norm_right = bottom_right.distance(&top_right);
        let cos_right = (top_right.x - bottom_right.x) / norm_right;
        let sin_right = (top_right.y - bottom_right.y) / norm_right;
        let c2 = Point::new(top_right.x + corr_right * cos_right, top_right.y + corr_right * sin_right);

        let c1_valid = self.is_valid(c1);
        let c2_valid = self.is_valid(c2);
        if !c1_valid {
            return c2_valid.then_some(c2);
        }
        if !c2_valid {
            return Some(c1);
        }

        let l1 = (self.transitions_between(top_left, c1) as i32 - self.transitions_between(bottom_right, c1) as i32).abs();
        let l2 = (self.transitions_between(top_left, c2) as i32 - self.transitions_between(bottom_right, c2) as i32).abs();
        Some(if l1 <= l2 { c1 } else { c2 })
    }

    fn is_valid(&self, p: Point) -> bool {
        p.x >= 0.0 && p.x < self.image.width() as f32 && p.y > 0.0 && p.y < self.image.height() as f32
    }

    /// Counts color transitions along the segment from `from` to `to`, the
    /// way a clock-track edge is measured to recover the symbol's module
    /// count along that side.
    fn transitions_between(&self, from: Point, to: Point) -> u32 {
        let from_x = from.x as i32;
        let from_y = from.y as i32;
        let to_x = to.x as i32;
        let to_y = (to.y as i32).clamp(0, self.image.height() as i32 - 1);

        let steep = (to_y - from_y).abs() > (to_x - from_x).abs();
        let (from_x, from_y, to_x, to_y) = if steep { (from_y, from_x, to_y, to_x) } else { (from_x, from_y, to_x, to_y) };

        let dx = (to_x - from_x).abs();
        let dy = (to_y - from_y).abs();
        let mut error = -dx / 2;
        let y_step = if from_y < to_y { 1 } else { -1 };
        let x_step = if from_x < to_x { 1 } else { -1 };

        let mut transitions = 0u32;
        let mut in_black = self.get_steep(steep, from_x, from_y);
        let mut x = from_x;
        let mut y = from_y;
        while x != to_x {
            let is_black = self.get_steep(steep, x, y);
            if is_black != in_black {
                transitions += 1;
                in_black = is_black;
            }
            error += dy;
            if error > 0 {
                if y == to_y {
                    break;
                }
                y += y_step;
                error -= dx;
            }
            x += x_step;
        }
        transitions
    }

    fn get_steep(&self, steep: bool, x: i32, y: i32) -> bool {
        let (real_x, real_y) = if steep { (y, x) } else { (x, y) };
        if real_x < 0 || real_y < 0 || real_x as u32 >= self.image.width() || real_y as u32 >= self.image.height() {
            return false;
        }
        self.image.get_or_false(real_x as u32, real_y as u32)
    }
}

fn round_to_even(dimension: &mut u32) {
    if *dimension & 1 == 1 {
        *dimension += 1;
    }
}

/// Orders three points so the one adjacent to (closest to) both others ends
/// up in the middle, with the remaining two arranged by the right-hand rule
/// — shared with the QR finder-pattern triangle-ordering logic, generalized
/// to any "one shared corner, two far corners" triple.
fn order_best_patterns(patterns: [Point; 3]) -> [Point; 3] {
    let dist_ab = patterns[0].distance(&patterns[1]);
    let dist_bc = patterns[1].distance(&patterns[2]);
    let dist_ac = patterns[0].distance(&patterns[2]);

    let (pivot, other1, other2) = if dist_bc >= dist_ab && dist_bc >= dist_ac {
        (patterns[0], patterns[1], patterns[2])
    } else if dist_ac >= dist_bc && dist_ac >= dist_ab {
        (patterns[1], patterns[0], patterns[2])
    } else {
        (patterns[2], patterns[0], patterns[1])
    };

    let cross_product = (other2.x - other1.x) * (pivot.y - other1.y) - (other2.y - other1.y) * (pivot.x - other1.x);

    if cross_product < 0.0 {
        [other2, pivot, other1]
    } else {
        [other1, pivot, other2]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detect_on_a_blank_image_is_not_found() {
        let image = BitMatrix::new(60, 60).unwrap();
        let detector = Detector::new(&image);
        assert!(detector.detect().is_err());
    }

    #[test]
    fn detect_rejects_a_seed_region_that_runs_off_the_image() {
        let image = BitMatrix::new(4, 4).unwrap();
        let detector = Detector::new(&image);
        assert!(detector.detect().is_err());
    }
}
