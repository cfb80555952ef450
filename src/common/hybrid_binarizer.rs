//! Adaptive-threshold binarizer used for 2D symbologies: averages luminance
//! over small blocks and thresholds each pixel against its block's
//! neighbourhood average, tolerating uneven lighting across the image
//! (spec §4.1).

use std::cell::RefCell;

use crate::binarizer::Binarizer;
use crate::common::bit_array::BitArray;
use crate::common::bit_matrix::BitMatrix;
use crate::common::global_histogram_binarizer::GlobalHistogramBinarizer;
use crate::error::Result;
use crate::luminance_source::LuminanceSource;

const BLOCK_SIZE: u32 = 8;
const MIN_DYNAMIC_RANGE: u8 = 24;

#[derive(Debug)]
pub struct HybridBinarizer {
    fallback: GlobalHistogramBinarizer,
    cached_matrix: RefCell<Option<BitMatrix>>,
}

impl HybridBinarizer {
    pub fn new(source: Box<dyn LuminanceSource>) -> Self {
        Self {
            fallback: GlobalHistogramBinarizer::new(source),
            cached_matrix: RefCell::new(None),
        }
    }

    fn block_averages(luminances: &[u8], width: u32, height: u32, sub_width: u32, sub_height: u32) -> Vec<Vec<u8>> {
        let mut averages = vec![vec![0u8; sub_width as usize]; sub_height as usize];
        for by in 0..sub_height {
            let y_min = (by * BLOCK_SIZE).min(height.saturating_sub(1));
            let y_max = ((by + 1) * BLOCK_SIZE).min(height);
            for bx in 0..sub_width {
                let x_min = (bx * BLOCK_SIZE).min(width.saturating_sub(1));
                let x_max = ((bx + 1) * BLOCK_SIZE).min(width);

                let mut sum = 0u32;
                let mut min = 255u8;
                let mut max = 0u8;
                let mut count = 0u32;
                for y in y_min..y_max {
                    let row_offset = (y * width) as usize;
                    for x in x_min..x_max {
                        let v = luminances[row_offset + x as usize];
                        sum += v as u32;
                        min = min.min(v);
                        max = max.max(v);
                        count += 1;
                    }
                }
                let average = if count > 0 { (sum / count) as u8 } else { 128 };
                averages[by as usize][bx as usize] = if max - min > MIN_DYNAMIC_RANGE {
                    average
                } else {
                    // Low-contrast block: bias toward the min so a faint
                    // dark region doesn't get thresholded away entirely.
                    min.saturating_add((average.saturating_sub(min)) / 2).min(average)
                };
            }
        }
        averages
    }

    fn threshold_block(
        luminances: &[u8],
        width: u32,
        height: u32,
        averages: &[Vec<u8>],
        bits: &mut BitMatrix,
    ) -> Result<()> {
        let sub_height = averages.len() as i32;
        let sub_width = if sub_height > 0 { averages[0].len() as i32 } else { 0 };

        for by in 0..sub_height {
            let y_min = by * BLOCK_SIZE as i32;
            for bx in 0..sub_width {
                let x_min = bx * BLOCK_SIZE as i32;

                let mut sum = 0i32;
                let mut count = 0i32;
                for dy in -2..=2 {
                    let ny = by + dy;
                    if ny < 0 || ny >= sub_height {
                        continue;
                    }
                    for dx in -2..=2 {
                        let nx = bx + dx;
                        if nx < 0 || nx >= sub_width {
                            continue;
                        }
                        sum += averages[ny as usize][nx as usize] as i32;
                        count += 1;
                    }
                }
                let average = sum / count.max(1);

                for yy in 0..BLOCK_SIZE as i32 {
                    let y = y_min + yy;
                    if y < 0 || y as u32 >= height {
                        continue;
                    }
                    let row_offset = (y as u32 * width) as usize;
                    for xx in 0..BLOCK_SIZE as i32 {
                        let x = x_min + xx;
                        if x < 0 || x as u32 >= width {
                            continue;
                        }
                        if (luminances[row_offset + x as usize] as i32) < average {
                            bits.set(x as u32, y as u32)?;
                        }
                    }
                }
            }
        }
        Ok(())
    }
}

impl Binarizer for HybridBinarizer {
    fn luminance_source(&self) -> &dyn LuminanceSource {
        self.fallback.luminance_source()
    }

    fn black_row(&self, y: u32) -> Result<BitArray> {
        let matrix = self.black_matrix()?;
        Ok(matrix.row(y))
    }

    fn black_matrix(&self) -> Result<BitMatrix> {
        if let Some(cached) = self.cached_matrix.borrow().as_ref() {
            return Ok(cached.clone());
        }

        let width = self.width();
        let height = self.height();
        if width < BLOCK_SIZE * 2 || height < BLOCK_SIZE * 2 {
            let matrix = self.fallback.black_matrix()?;
            *self.cached_matrix.borrow_mut() = Some(matrix.clone());
            return Ok(matrix);
        }

        let luminances = self.luminance_source().matrix();
        let sub_width = width.div_ceil(BLOCK_SIZE);
        let sub_height = height.div_ceil(BLOCK_SIZE);
        let averages = Self::block_averages(&luminances, width, height, sub_width, sub_height);

        let mut bits = BitMatrix::new(width, height)?;
        Self::threshold_block(&luminances, width, height, &averages, &mut bits)?;

        *self.cached_matrix.borrow_mut() = Some(bits.clone());
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

    fn split_image(w: u32, h: u32) -> Luma8LuminanceSource {
        let mut buf = vec![0u8; (w * h) as usize];
        for y in 0..h {
            for x in 0..w {
                buf[(y * w + x) as usize] = if x < w / 2 { 10 } else { 240 };
            }
        }
        Luma8LuminanceSource::new(buf, w, h)
    }

    #[test]
    fn thresholds_large_image_into_halves() {
        let binarizer = HybridBinarizer::new(Box::new(split_image(64, 64)));
        let matrix = binarizer.black_matrix().unwrap();
        assert!(matrix.get(4, 32).unwrap());
        assert!(!matrix.get(60, 32).unwrap());
    }

    #[test]
    fn small_image_falls_back_to_global_histogram() {
        let binarizer = HybridBinarizer::new(Box::new(split_image(10, 10)));
        assert!(binarizer.black_matrix().is_ok());
    }

    #[test]
    fn black_matrix_is_cached() {
        let binarizer = HybridBinarizer::new(Box::new(split_image(64, 64)));
        let first = binarizer.black_matrix().unwrap();
        let second = binarizer.black_matrix().unwrap();
        assert_eq!(first, second);
    }
}
