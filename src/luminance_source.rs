//! Read-only luminance view over an image (spec §4.1).

use crate::error::{Exceptions, Result};

/// An immutable 8-bit-luminance view of an image. 0 is darkest, 255 is
/// lightest. Implementors are borrowed for the duration of a single decode
/// and are never mutated by the decoder (spec §3 ownership policy).
pub trait LuminanceSource: std::fmt::Debug {
    fn width(&self) -> u32;
    fn height(&self) -> u32;

    /// Returns one row of luminance values. `reuse` is an optional
    /// caller-owned scratch buffer the implementation may write into
    /// instead of allocating, mirroring the teacher's `row(y, reuse_buf)`
    /// contract.
    fn row(&self, y: u32, reuse: Option<Vec<u8>>) -> Result<Vec<u8>>;

    /// The full `width * height` luminance buffer, row-major.
    fn matrix(&self) -> Vec<u8>;

    fn supports_rotate(&self) -> bool {
        false
    }

    fn supports_crop(&self) -> bool {
        false
    }

    fn rotate_ccw(&self) -> Result<Box<dyn LuminanceSource>> {
        Err(Exceptions::unsupported("rotate_ccw not supported by this source"))
    }

    fn crop(&self, _x: u32, _y: u32, _w: u32, _h: u32) -> Result<Box<dyn LuminanceSource>> {
        Err(Exceptions::unsupported("crop not supported by this source"))
    }

    /// True if every sampled pixel is the same value (detector short-circuit
    /// before even trying to binarize).
    fn is_blank(&self) -> bool {
        let m = self.matrix();
        match m.first() {
            None => true,
            Some(first) => m.iter().all(|p| p == first),
        }
    }
}

/// A plain owned `Vec<u8>` of packed 8-bit luminance samples, row-major.
/// This is the concrete source produced by `helpers::detect_in_luma` and is
/// the one every test in this crate builds by hand.
#[derive(Debug, Clone)]
pub struct Luma8LuminanceSource {
    luminances: Vec<u8>,
    width: u32,
    height: u32,
    left: u32,
    top: u32,
}

impl Luma8LuminanceSource {
    pub fn new(luminances: Vec<u8>, width: u32, height: u32) -> Self {
        debug_assert_eq!(luminances.len(), (width as usize) * (height as usize));
        Self {
            luminances,
            width,
            height,
            left: 0,
            top: 0,
        }
    }

    fn sub_new(luminances: Vec<u8>, width: u32, height: u32, left: u32, top: u32) -> Self {
        Self {
            luminances,
            width,
            height,
            left,
            top,
        }
    }
}

impl LuminanceSource for Luma8LuminanceSource {
    fn width(&self) -> u32 {
        self.width
    }

    fn height(&self) -> u32 {
        self.height
    }

    fn row(&self, y: u32, reuse: Option<Vec<u8>>) -> Result<Vec<u8>> {
        if y >= self.height {
            return Err(Exceptions::invalid_argument_with(format!(
                "requested row {y} but source height is {}",
                self.height
            )));
        }
        let width = self.width as usize;
        let mut row = reuse.unwrap_or_default();
        row.resize(width, 0);
        let offset = y as usize * width;
        row.copy_from_slice(&self.luminances[offset..offset + width]);
        Ok(row)
    }

    fn matrix(&self) -> Vec<u8> {
        self.luminances.clone()
    }

    fn supports_crop(&self) -> bool {
        true
    }

    fn crop(&self, x: u32, y: u32, w: u32, h: u32) -> Result<Box<dyn LuminanceSource>> {
        if x + w > self.width || y + h > self.height {
            return Err(Exceptions::invalid_argument_with(
                "crop region exceeds source bounds",
            ));
        }
        let mut cropped = Vec::with_capacity((w * h) as usize);
        for row in y..y + h {
            let offset = (row * self.width + x) as usize;
            cropped.extend_from_slice(&self.luminances[offset..offset + w as usize]);
        }
        Ok(Box::new(Luma8LuminanceSource::sub_new(
            cropped,
            w,
            h,
            self.left + x,
            self.top + y,
        )))
    }

    fn supports_rotate(&self) -> bool {
        true
    }

    fn rotate_ccw(&self) -> Result<Box<dyn LuminanceSource>> {
        let (w, h) = (self.width, self.height);
        let mut rotated = vec![0u8; (w * h) as usize];
        for y in 0..h {
            for x in 0..w {
                // (x, y) in source maps to (y, w - 1 - x) in the rotated image.
                let src = (y * w + x) as usize;
                let new_width = h;
                let dst_x = y;
                let dst_y = w - 1 - x;
                let dst = (dst_y * new_width + dst_x) as usize;
                rotated[dst] = self.luminances[src];
            }
        }
        Ok(Box::new(Luma8LuminanceSource::new(rotated, h, w)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gradient(w: u32, h: u32) -> Luma8LuminanceSource {
        let mut buf = vec![0u8; (w * h) as usize];
        for y in 0..h {
            for x in 0..w {
                buf[(y * w + x) as usize] = ((x + y * w) % 256) as u8;
            }
        }
        Luma8LuminanceSource::new(buf, w, h)
    }

    #[test]
    fn row_matches_matrix() {
        let src = gradient(5, 4);
        for y in 0..4 {
            let row = src.row(y, None).unwrap();
            let matrix = src.matrix();
            assert_eq!(row, &matrix[(y as usize) * 5..(y as usize + 1) * 5]);
        }
    }

    #[test]
    fn row_out_of_range_is_invalid_argument() {
        let src = gradient(3, 3);
        assert!(matches!(
            src.row(3, None),
            Err(Exceptions::InvalidArgument(_))
        ));
    }

    #[test]
    fn rotate_ccw_is_involution_after_four_turns() {
        let src = gradient(4, 3);
        let mut rotated: Box<dyn LuminanceSource> = Box::new(src.clone());
        for _ in 0..4 {
            rotated = rotated.rotate_ccw().unwrap();
        }
        assert_eq!(rotated.width(), src.width());
        assert_eq!(rotated.height(), src.height());
        assert_eq!(rotated.matrix(), src.matrix());
    }

    #[test]
    fn crop_rejects_out_of_bounds() {
        let src = gradient(4, 4);
        assert!(src.crop(2, 2, 4, 4).is_err());
    }
}
