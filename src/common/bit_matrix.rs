//! A dense packed-bit 2D bitmap (spec §3, §4.2).
//!
//! Coordinates are always `(x, y)` — x the column, y the row — with the
//! origin top-left, the same convention the teacher's `BitMatrix` documents.
//! Rows are word-aligned so a row can be copied out as a [`BitArray`]
//! without a bit-shuffle.

use crate::error::{Exceptions, Result};
use crate::point::Point;

use super::BitArray;

const BITS_PER_WORD: usize = u32::BITS as usize;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct BitMatrix {
    width: u32,
    height: u32,
    row_size: usize,
    bits: Vec<u32>,
}

impl BitMatrix {
    pub fn with_single_dimension(dimension: u32) -> Result<Self> {
        Self::new(dimension, dimension)
    }

    pub fn new(width: u32, height: u32) -> Result<Self> {
        if width < 1 || height < 1 {
            return Err(Exceptions::invalid_argument_with(
                "both dimensions must be greater than 0",
            ));
        }
        let row_size = (width as usize).div_ceil(BITS_PER_WORD);
        Ok(Self {
            width,
            height,
            row_size,
            bits: vec![0; row_size * height as usize],
        })
    }

    fn offset(&self, x: u32, y: u32) -> usize {
        y as usize * self.row_size + (x as usize / BITS_PER_WORD)
    }

    fn in_bounds(&self, x: u32, y: u32) -> bool {
        x < self.width && y < self.height
    }

    pub fn get(&self, x: u32, y: u32) -> Result<bool> {
        if !self.in_bounds(x, y) {
            return Err(Exceptions::invalid_argument_with(format!(
                "({x}, {y}) out of bounds for {}x{} matrix",
                self.width, self.height
            )));
        }
        let offset = self.offset(x, y);
        Ok((self.bits[offset] >> (x as usize & (BITS_PER_WORD - 1))) & 1 != 0)
    }

    /// Like [`BitMatrix::get`], but out-of-range coordinates read as `false`
    /// instead of erroring — used by probes that intentionally walk past a
    /// symbol's boundary (detector cross-checks, grid sampling margins).
    pub fn get_or_false(&self, x: u32, y: u32) -> bool {
        self.get(x, y).unwrap_or(false)
    }

    pub fn get_point(&self, p: Point) -> Result<bool> {
        self.get(p.x as u32, p.y as u32)
    }

    pub fn set(&mut self, x: u32, y: u32) -> Result<()> {
        if !self.in_bounds(x, y) {
            return Err(Exceptions::invalid_argument_with(format!(
                "({x}, {y}) out of bounds for {}x{} matrix",
                self.width, self.height
            )));
        }
        let offset = self.offset(x, y);
        self.bits[offset] |= 1 << (x as usize & (BITS_PER_WORD - 1));
        Ok(())
    }

    pub fn set_bool(&mut self, x: u32, y: u32, value: bool) -> Result<()> {
        if value {
            self.set(x, y)
        } else {
            self.unset(x, y)
        }
    }

    pub fn unset(&mut self, x: u32, y: u32) -> Result<()> {
        if !self.in_bounds(x, y) {
            return Err(Exceptions::invalid_argument_with(format!(
                "({x}, {y}) out of bounds for {}x{} matrix",
                self.width, self.height
            )));
        }
        let offset = self.offset(x, y);
        self.bits[offset] &= !(1 << (x as usize & (BITS_PER_WORD - 1)));
        Ok(())
    }

    pub fn flip(&mut self, x: u32, y: u32) -> Result<()> {
        if !self.in_bounds(x, y) {
            return Err(Exceptions::invalid_argument_with(format!(
                "({x}, {y}) out of bounds for {}x{} matrix",
                self.width, self.height
            )));
        }
        let offset = self.offset(x, y);
        self.bits[offset] ^= 1 << (x as usize & (BITS_PER_WORD - 1));
        Ok(())
    }

    pub fn flip_all(&mut self) {
        for word in self.bits.iter_mut() {
            *word = !*word;
        }
    }

    /// XOR every bit against `mask`. Used exactly once per decode, to
    /// unmask a QR symbol's data region (spec §4.9).
    pub fn xor(&mut self, mask: &BitMatrix) -> Result<()> {
        if self.width != mask.width || self.height != mask.height {
            return Err(Exceptions::invalid_argument_with(
                "input matrix dimensions do not match",
            ));
        }
        for y in 0..self.height {
            let offset = y as usize * self.row_size;
            let mask_row = mask.row(y);
            let mask_words = mask_row.get_bit_array();
            for (x, mask_word) in mask_words.iter().enumerate().take(self.row_size) {
                self.bits[offset + x] ^= *mask_word;
            }
        }
        Ok(())
    }

    pub fn clear(&mut self) {
        self.bits.fill(0);
    }

    pub fn set_region(&mut self, left: u32, top: u32, width: u32, height: u32) -> Result<()> {
        if width < 1 || height < 1 {
            return Err(Exceptions::invalid_argument_with(
                "height and width must be at least 1",
            ));
        }
        let right = left + width;
        let bottom = top + height;
        if bottom > self.height || right > self.width {
            return Err(Exceptions::invalid_argument_with(
                "the region must fit inside the matrix",
            ));
        }
        for y in top..bottom {
            let offset = y as usize * self.row_size;
            for x in left..right {
                self.bits[offset + (x as usize / BITS_PER_WORD)] |=
                    1 << (x as usize & (BITS_PER_WORD - 1));
            }
        }
        Ok(())
    }

    pub fn row(&self, y: u32) -> BitArray {
        let mut out = BitArray::with_size(self.width as usize);
        let offset = y as usize * self.row_size;
        for x in 0..self.row_size {
            out.set_bulk(x * BITS_PER_WORD, self.bits[offset + x]);
        }
        out
    }

    pub fn set_row(&mut self, y: u32, row: &BitArray) {
        let offset = y as usize * self.row_size;
        let words = row.get_bit_array();
        self.bits[offset..offset + self.row_size].copy_from_slice(&words[0..self.row_size]);
    }

    pub fn col(&self, x: u32) -> BitArray {
        let mut out = BitArray::with_size(self.height as usize);
        for y in 0..self.height {
            if self.get_or_false(x, y) {
                out.set(y as usize);
            }
        }
        out
    }

    pub fn rotate180(&mut self) {
        let max_height = self.height.div_ceil(2);
        for i in 0..max_height {
            let mut top = self.row(i);
            let bottom_idx = self.height - 1 - i;
            let mut bottom = self.row(bottom_idx);
            top.reverse();
            bottom.reverse();
            self.set_row(i, &bottom);
            self.set_row(bottom_idx, &top);
        }
    }

    pub fn rotate90(&mut self) {
        let new_width = self.height;
        let new_height = self.width;
        let new_row_size = (new_width as usize).div_ceil(BITS_PER_WORD);
        let mut new_bits = vec![0u32; new_row_size * new_height as usize];

        for y in 0..self.height {
            for x in 0..self.width {
                if self.get_or_false(x, y) {
                    let new_offset =
                        (new_height - 1 - x) as usize * new_row_size + (y as usize / BITS_PER_WORD);
                    new_bits[new_offset] |= 1 << (y as usize & (BITS_PER_WORD - 1));
                }
            }
        }
        self.width = new_width;
        self.height = new_height;
        self.row_size = new_row_size;
        self.bits = new_bits;
    }

    /// In-place transpose (square matrices only) — used by the QR mirror
    /// retry path (spec §4.9).
    pub fn transpose(&mut self) -> Result<()> {
        if self.width != self.height {
            return Err(Exceptions::invalid_argument_with(
                "transpose requires a square matrix",
            ));
        }
        for y in 0..self.height {
            for x in (y + 1)..self.width {
                let a = self.get_or_false(x, y);
                let b = self.get_or_false(y, x);
                self.set_bool(x, y, b)?;
                self.set_bool(y, x, a)?;
            }
        }
        Ok(())
    }

    /// Enclosing rectangle of every set bit, or `None` if the matrix is
    /// entirely unset — used to find a "pure" (borderless) barcode's bounds.
    pub fn enclosing_rectangle(&self) -> Option<[u32; 4]> {
        let mut left = self.width;
        let mut top = self.height;
        let mut right: i64 = -1;
        let mut bottom: i64 = -1;

        for y in 0..self.height {
            for x32 in 0..self.row_size {
                let word = self.bits[y as usize * self.row_size + x32];
                if word != 0 {
                    top = top.min(y);
                    bottom = bottom.max(y as i64);

                    let bit_lo = word.trailing_zeros() as usize;
                    left = left.min((x32 * BITS_PER_WORD + bit_lo) as u32);

                    let bit_hi = (BITS_PER_WORD - 1) - (word.leading_zeros() as usize);
                    right = right.max((x32 * BITS_PER_WORD + bit_hi) as i64);
                }
            }
        }

        if right < left as i64 || bottom < top as i64 {
            return None;
        }
        Some([left, top, (right - left as i64 + 1) as u32, (bottom - top as i64 + 1) as u32])
    }

    pub const fn width(&self) -> u32 {
        self.width
    }

    pub const fn height(&self) -> u32 {
        self.height
    }

    pub const fn row_size(&self) -> usize {
        self.row_size
    }

    pub fn to_string_with(&self, set_string: &str, unset_string: &str) -> String {
        let mut result = String::with_capacity((self.height * (self.width + 1)) as usize);
        for y in 0..self.height {
            for x in 0..self.width {
                result.push_str(if self.get_or_false(x, y) {
                    set_string
                } else {
                    unset_string
                });
            }
            result.push('\n');
        }
        result
    }
}

impl std::fmt::Display for BitMatrix {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_string_with("X ", "  "))
    }
}

#[cfg(feature = "image")]
impl From<&BitMatrix> for image::DynamicImage {
    fn from(value: &BitMatrix) -> Self {
        let mut pixels = image::ImageBuffer::new(value.width, value.height);
        for (x, y, pixel) in pixels.enumerate_pixels_mut() {
            *pixel = if value.get_or_false(x, y) {
                image::Luma([0u8])
            } else {
                image::Luma([u8::MAX])
            };
        }
        image::DynamicImage::ImageLuma8(pixels)
    }
}

#[cfg(feature = "svg_write")]
impl From<&BitMatrix> for svg::Document {
    fn from(value: &BitMatrix) -> Self {
        let mut document = svg::Document::new()
            .set("viewBox", (0, 0, value.width, value.height))
            .set("width", value.width)
            .set("height", value.height);
        for y in 0..value.height {
            for x in 0..value.width {
                if value.get_or_false(x, y) {
                    let rect = svg::node::element::Rectangle::new()
                        .set("x", x)
                        .set("y", y)
                        .set("width", 1)
                        .set("height", 1)
                        .set("fill", "black");
                    document = document.add(rect);
                }
            }
        }
        document
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn get_set_roundtrip_every_coordinate() {
        let mut m = BitMatrix::new(37, 23).unwrap();
        for y in 0..23 {
            for x in 0..37 {
                if (x + y) % 5 == 0 {
                    m.set(x, y).unwrap();
                }
            }
        }
        for y in 0..23 {
            for x in 0..37 {
                assert_eq!(m.get(x, y).unwrap(), (x + y) % 5 == 0);
            }
        }
    }

    #[test]
    fn out_of_range_is_invalid_argument() {
        let m = BitMatrix::new(4, 4).unwrap();
        assert!(matches!(m.get(4, 0), Err(Exceptions::InvalidArgument(_))));
        assert!(matches!(m.get(0, 4), Err(Exceptions::InvalidArgument(_))));
    }

    #[test]
    fn set_region_rejects_region_outside_matrix() {
        let mut m = BitMatrix::new(10, 10).unwrap();
        assert!(m.set_region(8, 8, 4, 4).is_err());
        assert!(m.set_region(8, 8, 2, 2).is_ok());
    }

    #[test]
    fn rotate90_four_times_is_identity() {
        let mut m = BitMatrix::new(5, 3).unwrap();
        m.set(0, 0).unwrap();
        m.set(4, 2).unwrap();
        m.set(2, 1).unwrap();
        let original = m.clone();
        for _ in 0..4 {
            m.rotate90();
        }
        assert_eq!(m, original);
    }

    #[test]
    fn xor_is_involution() {
        let mut a = BitMatrix::new(8, 8).unwrap();
        let mut mask = BitMatrix::new(8, 8).unwrap();
        for x in 0..8 {
            a.set(x, 0).unwrap();
        }
        for y in 0..8 {
            mask.set(0, y).unwrap();
        }
        let original = a.clone();
        a.xor(&mask).unwrap();
        a.xor(&mask).unwrap();
        assert_eq!(a, original);
    }

    #[test]
    fn transpose_requires_square() {
        let mut m = BitMatrix::new(3, 4).unwrap();
        assert!(m.transpose().is_err());
    }

    #[test]
    fn enclosing_rectangle_of_blank_matrix_is_none() {
        let m = BitMatrix::new(10, 10).unwrap();
        assert_eq!(m.enclosing_rectangle(), None);
    }
}
