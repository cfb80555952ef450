//! Locating a PDF417 symbol's start/stop guard patterns across every row of
//! the image and recording, per row, where its codewords begin and end
//! (spec §4.8).
//!
//! Unlike the square 2D symbologies, PDF417 rows are scanned the way a 1D
//! reader scans a single row (see `oned::patterns`) rather than through a
//! perspective-sampled grid: each row's own module width is measured from
//! its start pattern. This build does not attempt the full skew/rotation
//! correction the other detectors perform — see `DESIGN.md`.

use crate::common::bit_matrix::BitMatrix;
use crate::error::{Exceptions, Result};
use crate::oned::patterns::{self, MAX_INDIVIDUAL_VARIANCE};
use crate::point::Point;

use super::super::pdf417_common::{START_PATTERN, STOP_PATTERN};

const MAX_AVG_VARIANCE: f32 = 0.42;

/// Where one barcode row's codewords live in a scanned image row.
#[derive(Debug, Clone, Copy)]
pub struct RowScan {
    pub y: u32,
    pub start_x: u32,
    pub stop_x: u32,
    pub module_width: f32,
}

#[derive(Debug, Clone)]
pub struct Pdf417DetectorResult {
    bits: BitMatrix,
    rows: Vec<RowScan>,
    points: Vec<Point>,
}

impl Pdf417DetectorResult {
    #[cfg(test)]
    pub fn for_test(bits: BitMatrix, rows: Vec<RowScan>, points: Vec<Point>) -> Self {
        Self { bits, rows, points }
    }

    pub fn bits(&self) -> &BitMatrix {
        &self.bits
    }

    pub fn rows(&self) -> &[RowScan] {
        &self.rows
    }

    pub fn points(&self) -> &[Point] {
        &self.points
    }
}

fn find_guard_pattern(row: &crate::common::BitArray, pattern: &[u32]) -> Option<(usize, usize, f32)> {
    let mut counters = vec![0u32; pattern.len()];
    let mut best: Option<(usize, usize, f32)> = None;
    let size = row.size();
    for i in 0..size {
        if !row.get(i) || (i > 0 && row.get(i - 1)) {
            continue;
        }
        if patterns::record_pattern(row, i, &mut counters).is_err() {
            continue;
        }
        let variance = patterns::pattern_match_variance(&counters, pattern, MAX_INDIVIDUAL_VARIANCE);
        if variance < MAX_AVG_VARIANCE && best.map(|(_, _, v)| variance < v).unwrap_or(true) {
            let total: u32 = counters.iter().sum();
            best = Some((i, i + total as usize, variance));
        }
    }
    best
}

pub struct Detector<'a> {
    image: &'a BitMatrix,
}

impl<'a> Detector<'a> {
    pub fn new(image: &'a BitMatrix) -> Self {
        Self { image }
    }

    pub fn detect(self) -> Result<Pdf417DetectorResult> {
        let mut rows = Vec::new();
        for y in 0..self.image.height() {
            let row = self.image.row(y);
            let start = find_guard_pattern(&row, &START_PATTERN);
            let stop = find_guard_pattern(&row, &STOP_PATTERN);
            let (Some((start_begin, start_end, _)), Some((stop_begin, _, _))) = (start, stop) else {
                continue;
            };
            if stop_begin <= start_end {
                continue;
            }
            let module_width = (start_end - start_begin) as f32 / crate::pdf417::pdf417_common::MODULES_IN_CODEWORD as f32;
            rows.push(RowScan {
                y,
                start_x: start_end as u32,
                stop_x: stop_begin as u32,
                module_width,
            });
        }

        if rows.len() < 2 {
            return Err(Exceptions::not_found("no PDF417 start/stop patterns found"));
        }

        let top = rows.first().unwrap();
        let bottom = rows.last().unwrap();
        let left = rows.iter().map(|r| r.start_x).min().unwrap();
        let right = rows.iter().map(|r| r.stop_x).max().unwrap();

        let points = vec![
            Point::new(left as f32, top.y as f32),
            Point::new(left as f32, bottom.y as f32),
            Point::new(right as f32, top.y as f32),
            Point::new(right as f32, bottom.y as f32),
        ];

        Ok(Pdf417DetectorResult { bits: self.image.clone(), rows, points })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_image_is_not_found() {
        let image = BitMatrix::new(50, 50).unwrap();
        let detector = Detector::new(&image);
        assert!(detector.detect().is_err());
    }
}
