//! Locates a QR Code in a binarized image and samples its modules into a
//! [`BitMatrix`] ready for [`crate::qrcode::decoder::decode`] (spec §4.7).

use crate::common::bit_matrix::BitMatrix;
use crate::common::detector_result::DetectorResult;
use crate::common::grid_sampler;
use crate::decode_hints::DecodeHints;
use crate::error::Result;
use crate::point::Point;
use crate::qrcode::decoder::version::{get_version_for_number, Version};
use crate::qrcode::detector::alignment_pattern_finder::AlignmentPatternFinder;
use crate::qrcode::detector::finder_pattern_finder::FinderPatternFinder;
use crate::qrcode::detector::finder_pattern_info::FinderPatternInfo;

pub struct Detector<'a> {
    image: &'a BitMatrix,
}

impl<'a> Detector<'a> {
    pub const fn new(image: &'a BitMatrix) -> Self {
        Self { image }
    }

    pub fn detect(&self, hints: &DecodeHints) -> Result<DetectorResult> {
        let info = FinderPatternFinder::new(self.image).find(hints)?;
        self.process_finder_pattern_info(info, hints)
    }

    fn process_finder_pattern_info(&self, info: FinderPatternInfo, hints: &DecodeHints) -> Result<DetectorResult> {
        let top_left = info.top_left().point();
        let top_right = info.top_right().point();
        let bottom_left = info.bottom_left().point();

        let module_size = self.calculate_module_size(top_left, top_right, bottom_left);
        let provisional_dimension = self.compute_dimension(top_left, top_right, bottom_left, module_size);
        let version = get_version_for_number(Version::get_provisional_version_for_dimension(provisional_dimension)?)?;

        let dimension = version.dimension();
        let dimension_minus_three = dimension as f32 - 3.5;

        let mut alignment_pattern = None;
        if !version.alignment_pattern_centers().is_empty() {
            let bottom_right_x = top_right.x - top_left.x + bottom_left.x;
            let bottom_right_y = top_right.y - top_left.y + bottom_left.y;

            let correction_to_top_left = 1.0 - 3.0 / (dimension as f32 - 7.0);
            let estimated_x = top_left.x + correction_to_top_left * (bottom_right_x - top_left.x);
            let estimated_y = top_left.y + correction_to_top_left * (bottom_right_y - top_left.y);

            let mut range = 2.0f32;
            for _ in 0..5 {
                if let Ok(found) = self.find_alignment_in_region(module_size, estimated_x, estimated_y, range) {
                    alignment_pattern = Some(found);
                    break;
                }
                range *= 2.0;
            }
        }

        let (bottom_right_x, bottom_right_y, source_bottom_right_x, source_bottom_right_y) = match alignment_pattern {
            Some(ap) => (ap.x, ap.y, dimension_minus_three - 3.0, dimension_minus_three - 3.0),
            None => (
                top_right.x - top_left.x + bottom_left.x,
                top_right.y - top_left.y + bottom_left.y,
                dimension_minus_three,
                dimension_minus_three,
            ),
        };

        let bits = grid_sampler::sample_grid_quad(
            self.image,
            dimension,
            dimension,
            3.5,
            3.5,
            dimension_minus_three,
            3.5,
            source_bottom_right_x,
            source_bottom_right_y,
            3.5,
            dimension_minus_three,
            top_left.x,
            top_left.y,
            top_right.x,
            top_right.y,
            bottom_right_x,
            bottom_right_y,
            bottom_left.x,
            bottom_left.y,
        )?;

        let mut points = vec![bottom_left, top_left, top_right];
        if let Some(ap) = alignment_pattern {
            points.push(ap);
        }

        Ok(DetectorResult::new(bits, points))
    }

    fn calculate_module_size(&self, top_left: Point, top_right: Point, bottom_left: Point) -> f32 {
        let size_one = self.calculate_module_size_one_way(top_left, top_right);
        let size_two = self.calculate_module_size_one_way(top_left, bottom_left);
        if size_one.is_nan() {
            if size_two.is_nan() { 1.0 } else { size_two }
        } else if size_two.is_nan() {
            size_one
        } else {
            (size_one + size_two) / 2.0
        }
    }

    fn calculate_module_size_one_way(&self, a: Point, b: Point) -> f32 {
        let in_a = self.size_of_black_white_black_run_both_ways(a.x as i32, a.y as i32, b.x as i32, b.y as i32);
        let in_b = self.size_of_black_white_black_run_both_ways(b.x as i32, b.y as i32, a.x as i32, a.y as i32);
        if in_a.is_nan() {
            in_b / 7.0
        } else if in_b.is_nan() {
            in_a / 7.0
        } else {
            (in_a + in_b) / 14.0
        }
    }

    fn size_of_black_white_black_run_both_ways(&self, from_x: i32, from_y: i32, to_x: i32, to_y: i32) -> f32 {
        let result = self.size_of_black_white_black_run(from_x, from_y, to_x, to_y);

        let mut scale = 1.0f32;
        let max_x = self.image.width() as i32;
        let max_y = self.image.height() as i32;
        let mut other_to_x = from_x + ((from_x - to_x) as f32 * scale) as i32;
        let mut other_to_y = from_y + ((from_y - to_y) as f32 * scale) as i32;
        while other_to_x < 0 || other_to_y < 0 || other_to_x >= max_x || other_to_y >= max_y {
            scale -= 0.1;
            if scale < 0.0 {
                return result;
            }
            other_to_x = from_x + ((from_x - to_x) as f32 * scale) as i32;
            other_to_y = from_y + ((from_y - to_y) as f32 * scale) as i32;
        }

        (result + self.size_of_black_white_black_run(from_x, from_y, other_to_x, other_to_y) - 1.0).max(0.0)
    }

    /// Traces the given line looking for a black-white-black run, the way
    /// a Bresenham-style line walk would, and returns the distance covered
    /// up to the far edge of the second black run.
    fn size_of_black_white_black_run(&self, from_x: i32, from_y: i32, to_x: i32, to_y: i32) -> f32 {
        let steep = (to_y - from_y).abs() > (to_x - from_x).abs();
        let (from_x, from_y, to_x, to_y) = if steep { (from_y, from_x, to_y, to_x) } else { (from_x, from_y, to_x, to_y) };

        let dx = (to_x - from_x).abs();
        let dy = (to_y - from_y).abs();
        let mut error = -dx / 2;
        let x_step = if from_x < to_x { 1 } else { -1 };
        let y_step = if from_y < to_y { 1 } else { -1 };

        let mut state = 0;
        let mut x = from_x;
        let mut y = from_y;
        while x != to_x {
            let (real_x, real_y) = if steep { (y, x) } else { (x, y) };
            if real_x < 0 || real_y < 0 || real_x as u32 >= self.image.width() || real_y as u32 >= self.image.height() {
                break;
            }
            let is_dark = self.image.get_or_false(real_x as u32, real_y as u32);
            if (state == 0 && is_dark) || (state == 1 && !is_dark) {
                state += 1;
            } else if state == 2 && is_dark {
                let diff_x = x - from_x;
                let diff_y = y - from_y;
                return ((diff_x * diff_x + diff_y * diff_y) as f32).sqrt();
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

        if state == 2 {
            let diff_x = to_x - from_x;
            let diff_y = to_y - from_y;
            return ((diff_x * diff_x + diff_y * diff_y) as f32).sqrt();
        }
        f32::NAN
    }

    fn compute_dimension(&self, top_left: Point, top_right: Point, bottom_left: Point, module_size: f32) -> u32 {
        let tlt_rlength = (top_right.distance(&top_left) / module_size).round() as i32;
        let tlb_llength = (bottom_left.distance(&top_left) / module_size).round() as i32;
        let mut dimension = (tlt_rlength + tlb_llength) / 2 + 7;
        match dimension % 4 {
            0 => dimension += 1,
            2 => dimension -= 1,
            3 => dimension -= 2,
            _ => {}
        }
        dimension.max(21) as u32
    }

    fn find_alignment_in_region(&self, overall_est_module_size: f32, estimated_x: f32, estimated_y: f32, allowance_factor: f32) -> Result<Point> {
        let allowance = (allowance_factor * overall_est_module_size) as i32;
        let alignment_area_left_x = (estimated_x as i32 - allowance).max(0) as u32;
        let alignment_area_right_x = ((estimated_x as i32 + allowance) as u32).min(self.image.width() - 1);
        let alignment_area_top_y = (estimated_y as i32 - allowance).max(0) as u32;
        let alignment_area_bottom_y = ((estimated_y as i32 + allowance) as u32).min(self.image.height() - 1);

        let width = alignment_area_right_x - alignment_area_left_x;
        let height = alignment_area_bottom_y - alignment_area_top_y;

        let mut finder = AlignmentPatternFinder::new(self.image, alignment_area_left_x, alignment_area_top_y, width, height, overall_est_module_size);
        Ok(finder.find()?.point())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detect_on_a_blank_image_is_not_found() {
        let image = BitMatrix::new(60, 60).unwrap();
        let detector = Detector::new(&image);
        assert!(detector.detect(&DecodeHints::default()).is_err());
    }
}
