//! A fast binarizer that picks one black/white threshold per row from a
//! luminance histogram, with no awareness of neighbouring rows (spec §4.1).

use std::cell::RefCell;

use crate::binarizer::Binarizer;
use crate::common::bit_array::BitArray;
use crate::common::bit_matrix::BitMatrix;
use crate::error::{Exceptions, Result};
use crate::luminance_source::LuminanceSource;

const LUMINANCE_BITS: u32 = 5;
const LUMINANCE_SHIFT: u32 = 8 - LUMINANCE_BITS;
const LUMINANCE_BUCKETS: usize = 1 << LUMINANCE_BITS;
const MIN_DYNAMIC_RANGE: i32 = 24;

#[derive(Debug)]
pub struct GlobalHistogramBinarizer {
    source: Box<dyn LuminanceSource>,
    cached_row: RefCell<Option<(u32, BitArray)>>,
}

impl GlobalHistogramBinarizer {
    pub fn new(source: Box<dyn LuminanceSource>) -> Self {
        Self {
            source,
            cached_row: RefCell::new(None),
        }
    }

    /// Finds the two local maxima in `buckets` separated by the deepest
    /// valley between them, then returns the luminance that splits them.
    /// Returns `None` when the histogram's dynamic range is too small to
    /// contain a meaningful symbol (a blank or near-uniform row).
    fn estimate_black_point(buckets: &[u32; LUMINANCE_BUCKETS]) -> Option<i32> {
        let num_buckets = buckets.len();
        let mut max_bucket_count = 0;
        let mut first_peak = 0;
        let mut first_peak_size = 0;
        for (x, &count) in buckets.iter().enumerate() {
            if count > first_peak_size {
                first_peak = x;
                first_peak_size = count;
            }
            if count > max_bucket_count {
                max_bucket_count = count;
            }
        }

        let mut second_peak = 0;
        let mut second_peak_score = 0i64;
        for (x, &count) in buckets.iter().enumerate() {
            let distance_to_biggest = x as i64 - first_peak as i64;
            let score = count as i64 * distance_to_biggest * distance_to_biggest;
            if score > second_peak_score {
                second_peak = x;
                second_peak_score = score;
            }
        }

        let (first_peak, second_peak) = if first_peak > second_peak {
            (second_peak, first_peak)
        } else {
            (first_peak, second_peak)
        };

        if second_peak - first_peak <= num_buckets / 16 {
            return None;
        }

        let mut best_valley = second_peak - 1;
        let mut best_valley_score = -1i64;
        let mut x = second_peak - 1;
        while x > first_peak {
            let from_first = (x - first_peak) as i64;
            let score = from_first * from_first * (second_peak - x) as i64 * (max_bucket_count - buckets[x]) as i64;
            if score > best_valley_score {
                best_valley = x;
                best_valley_score = score;
            }
            x -= 1;
        }

        Some((best_valley << LUMINANCE_SHIFT) as i32)
    }

    fn black_row_uncached(&self, y: u32) -> Result<BitArray> {
        let width = self.source.width();
        let row = self.source.row(y, None)?;
        if width < 5 {
            // Not enough pixels to estimate a meaningful black point; assume
            // the row is already black/white around the midpoint.
            let mut bits = BitArray::with_size(width as usize);
            for (x, &lum) in row.iter().enumerate() {
                if (lum as i32) < 128 {
                    bits.set(x);
                }
            }
            return Ok(bits);
        }

        let mut buckets = [0u32; LUMINANCE_BUCKETS];
        for &lum in &row {
            buckets[(lum >> LUMINANCE_SHIFT) as usize] += 1;
        }

        let black_point = match Self::estimate_black_point(&buckets) {
            Some(bp) => bp,
            None => {
                return Err(Exceptions::not_found("row has insufficient luminance contrast"));
            }
        };

        let mut bits = BitArray::with_size(width as usize);
        let mut left = row[0] as i32;
        let mut center = row[1] as i32;
        for x in 1..width as usize - 1 {
            let right = row[x + 1] as i32;
            let luminance = (left + center * 2 + right) / 4;
            if luminance < black_point {
                bits.set(x);
            }
            left = center;
            center = right;
        }
        Ok(bits)
    }
}

impl Binarizer for GlobalHistogramBinarizer {
    fn luminance_source(&self) -> &dyn LuminanceSource {
        self.source.as_ref()
    }

    fn black_row(&self, y: u32) -> Result<BitArray> {
        if let Some((cached_y, row)) = self.cached_row.borrow().as_ref() {
            if *cached_y == y {
                return Ok(row.clone());
            }
        }
        let row = self.black_row_uncached(y)?;
        *self.cached_row.borrow_mut() = Some((y, row.clone()));
        Ok(row)
    }

    fn black_matrix(&self) -> Result<BitMatrix> {
        let width = self.source.width();
        let height = self.source.height();
        let matrix = self.source.matrix();

        let mut buckets = [0u32; LUMINANCE_BUCKETS];
        // Sample at most 1 in every 8 rows for the global histogram, the
        // same subsampling the teacher's histogram binarizer uses to keep
        // large images fast.
        let row_step = (height / 8).max(1);
        let mut y = 0;
        while y < height {
            let offset = (y * width) as usize;
            let right = (offset + width as usize).min(matrix.len());
            for &lum in &matrix[offset..right] {
                buckets[(lum >> LUMINANCE_SHIFT) as usize] += 1;
            }
            y += row_step;
        }

        let black_point = Self::estimate_black_point(&buckets)
            .ok_or_else(|| Exceptions::not_found("image has insufficient luminance contrast"))?;

        let mut bits = BitMatrix::new(width, height)?;
        for y in 0..height {
            let offset = (y * width) as usize;
            for x in 0..width as usize {
                if (matrix[offset + x] as i32) < black_point {
                    bits.set(x as u32, y)?;
                }
            }
        }
        Ok(bits)
    }

    fn create_binarizer(&self, source: Box<dyn LuminanceSource>) -> Box<dyn Binarizer> {
        Box::new(Self::new(source))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::luminance_source::Luma8LuminanceSource;

    fn checkerboard(w: u32, h: u32) -> Luma8LuminanceSource {
        let mut buf = vec![0u8; (w * h) as usize];
        for y in 0..h {
            for x in 0..w {
                buf[(y * w + x) as usize] = if (x + y) % 2 == 0 { 20 } else { 230 };
            }
        }
        Luma8LuminanceSource::new(buf, w, h)
    }

    #[test]
    fn black_matrix_tracks_dark_pixels() {
        let binarizer = GlobalHistogramBinarizer::new(Box::new(checkerboard(20, 20)));
        let matrix = binarizer.black_matrix().unwrap();
        assert!(matrix.get(0, 0).unwrap());
        assert!(!matrix.get(1, 0).unwrap());
    }

    #[test]
    fn blank_image_is_not_found() {
        let blank = Luma8LuminanceSource::new(vec![128u8; 400], 20, 20);
        let binarizer = GlobalHistogramBinarizer::new(Box::new(blank));
        assert!(binarizer.black_matrix().is_err());
    }

    #[test]
    fn black_row_is_cached_for_repeated_calls() {
        let binarizer = GlobalHistogramBinarizer::new(Box::new(checkerboard(20, 20)));
        let first = binarizer.black_row(3).unwrap();
        let second = binarizer.black_row(3).unwrap();
        assert_eq!(first.to_vec_bool(), second.to_vec_bool());
    }
}
