//! Locates the four corners of a roughly axis-aligned black region against a
//! white background, expanding outward from the image center until each
//! border stops gaining new black pixels (spec §4.8, Data Matrix / Aztec
//! "locate symbol" step).
//!
//! Grounded on `original_source/cpp/core/src/zxing/common/detector/
//! WhiteRectangleDetector.*`, which shares the same expand-then-diagonal-scan
//! shape as the `MonochromeRectangleDetector` used elsewhere in the pack, but
//! expands all four borders together rather than one ray per corner.

use crate::common::bit_matrix::BitMatrix;
use crate::error::{Exceptions, Result};
use crate::point::Point;

const INIT_SIZE: i32 = 10;
const CORR: f32 = 1.0;

pub struct WhiteRectangleDetector<'a> {
    image: &'a BitMatrix,
    width: i32,
    height: i32,
    left_init: i32,
    right_init: i32,
    up_init: i32,
    down_init: i32,
}

impl<'a> WhiteRectangleDetector<'a> {
    pub fn new(image: &'a BitMatrix) -> Result<Self> {
        let x = image.width() as i32 / 2;
        let y = image.height() as i32 / 2;
        Self::new_at(image, INIT_SIZE, x, y)
    }

    pub fn new_at(image: &'a BitMatrix, init_size: i32, x: i32, y: i32) -> Result<Self> {
        let width = image.width() as i32;
        let height = image.height() as i32;
        let half = init_size / 2;
        let left_init = x - half;
        let right_init = x + half;
        let up_init = y - half;
        let down_init = y + half;
        if up_init < 0 || left_init < 0 || down_init >= height || right_init >= width {
            return Err(Exceptions::not_found("white rectangle seed region runs off the image"));
        }
        Ok(Self { image, width, height, left_init, right_init, up_init, down_init })
    }

    /// Returns four image-space corners, in the fixed order
    /// `[top, left, bottom, right]` matching the source's `y, z, x, t` naming
    /// (`centerEdges`'s inputs), nudged a pixel inward or outward by `CORR`
    /// depending on which half of the image they fall in.
    pub fn detect(&self) -> Result<[Point; 4]> {
        let mut left = self.left_init;
        let mut right = self.right_init;
        let mut up = self.up_init;
        let mut down = self.down_init;

        let mut found_on_right = false;
        let mut found_on_bottom = false;
        let mut found_on_left = false;
        let mut found_on_top = false;
        let mut found_on_border = true;

        while found_on_border {
            found_on_border = false;

            let mut right_not_white = true;
            while (right_not_white || !found_on_right) && right < self.width {
                right_not_white = self.contains_black_point(up, down, right, false);
                if right_not_white {
                    right += 1;
                    found_on_border = true;
                    found_on_right = true;
                } else if !found_on_right {
                    right += 1;
                }
            }
            if right >= self.width {
                return Err(Exceptions::not_found("white rectangle expanded past the right edge"));
            }

            let mut bottom_not_white = true;
            while (bottom_not_white || !found_on_bottom) && down < self.height {
                bottom_not_white = self.contains_black_point(left, right, down, true);
                if bottom_not_white {
                    down += 1;
                    found_on_border = true;
                    found_on_bottom = true;
                } else if !found_on_bottom {
                    down += 1;
                }
            }
            if down >= self.height {
                return Err(Exceptions::not_found("white rectangle expanded past the bottom edge"));
            }

            let mut left_not_white = true;
            while (left_not_white || !found_on_left) && left >= 0 {
                left_not_white = self.contains_black_point(up, down, left, false);
                if left_not_white {
                    left -= 1;
                    found_on_border = true;
                    found_on_left = true;
                } else if !found_on_left {
                    left -= 1;
                }
            }
            if left < 0 {
                return Err(Exceptions::not_found("white rectangle expanded past the left edge"));
            }

            let mut top_not_white = true;
            while (top_not_white || !found_on_top) && up >= 0 {
                top_not_white = self.contains_black_point(left, right, up, true);
                if top_not_white {
                    up -= 1;
                    found_on_border = true;
                    found_on_top = true;
                } else if !found_on_top {
                    up -= 1;
                }
            }
            if up < 0 {
                return Err(Exceptions::not_found("white rectangle expanded past the top edge"));
            }
        }

        let max_size = right - left;

        let z = (1..max_size)
            .find_map(|i| self.black_point_on_segment(left as f32, (down - i) as f32, (left + i) as f32, down as f32))
            .ok_or_else(|| Exceptions::not_found("no black point found descending the left edge"))?;
        let t = (1..max_size)
            .find_map(|i| self.black_point_on_segment(left as f32, (up + i) as f32, (left + i) as f32, up as f32))
            .ok_or_else(|| Exceptions::not_found("no black point found along the top edge"))?;
        let x = (1..max_size)
            .find_map(|i| self.black_point_on_segment(right as f32, (up + i) as f32, (right - i) as f32, up as f32))
            .ok_or_else(|| Exceptions::not_found("no black point found along the right edge"))?;
        let y = (1..max_size)
            .find_map(|i| self.black_point_on_segment(right as f32, (down - i) as f32, (right - i) as f32, down as f32))
            .ok_or_else(|| Exceptions::not_found("no black point found along the bottom edge"))?;

        Ok(self.center_edges(y, z, x, t))
    }

    fn contains_black_point(&self, a: i32, b: i32, fixed: i32, horizontal: bool) -> bool {
        if horizontal {
            (a..=b).any(|x| self.image.get_or_false(x as u32, fixed as u32))
        } else {
            (a..=b).any(|y| self.image.get_or_false(fixed as u32, y as u32))
        }
    }

    fn black_point_on_segment(&self, a_x: f32, a_y: f32, b_x: f32, b_y: f32) -> Option<Point> {
        let dist = Point::new(a_x, a_y).distance(&Point::new(b_x, b_y)).round() as i32;
        if dist == 0 {
            return None;
        }
        let x_step = (b_x - a_x) / dist as f32;
        let y_step = (b_y - a_y) / dist as f32;
        for i in 0..dist {
            let x = (a_x + i as f32 * x_step).round() as u32;
            let y = (a_y + i as f32 * y_step).round() as u32;
            if self.image.get_or_false(x, y) {
                return Some(Point::new(x as f32, y as f32));
            }
        }
        None
    }

    fn center_edges(&self, y: Point, z: Point, x: Point, t: Point) -> [Point; 4] {
        if y.x < self.width as f32 / 2.0 {
            [
                Point::new(t.x - CORR, t.y + CORR),
                Point::new(z.x + CORR, z.y + CORR),
                Point::new(x.x - CORR, x.y - CORR),
                Point::new(y.x + CORR, y.y - CORR),
            ]
        } else {
            [
                Point::new(t.x + CORR, t.y + CORR),
                Point::new(z.x + CORR, z.y - CORR),
                Point::new(x.x - CORR, x.y + CORR),
                Point::new(y.x - CORR, y.y - CORR),
            ]
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detects_a_solid_square_block() {
        let mut image = BitMatrix::new(40, 40).unwrap();
        image.set_region(10, 10, 20, 20).unwrap();
        let detector = WhiteRectangleDetector::new(&image).unwrap();
        let corners = detector.detect().unwrap();
        for corner in corners {
            assert!(corner.x >= 8.0 && corner.x <= 32.0);
            assert!(corner.y >= 8.0 && corner.y <= 32.0);
        }
    }

    #[test]
    fn blank_image_is_not_found() {
        let image = BitMatrix::new(40, 40).unwrap();
        let detector = WhiteRectangleDetector::new(&image).unwrap();
        assert!(detector.detect().is_err());
    }

    #[test]
    fn seed_region_off_image_is_rejected() {
        let image = BitMatrix::new(4, 4).unwrap();
        assert!(WhiteRectangleDetector::new(&image).is_err());
    }
}
