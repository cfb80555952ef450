//! Binds a [`Binarizer`] to one decode attempt and caches its black/white
//! views, since several readers ask for both the matrix and individual rows
//! of the same image (spec §4.1).

use crate::binarizer::Binarizer;
use crate::common::{BitArray, BitMatrix};
use crate::error::{Exceptions, Result};

#[derive(Debug)]
pub struct BinaryBitmap {
    binarizer: Box<dyn Binarizer>,
    cached_matrix: Option<BitMatrix>,
}

impl BinaryBitmap {
    pub fn new(binarizer: Box<dyn Binarizer>) -> Self {
        Self {
            binarizer,
            cached_matrix: None,
        }
    }

    pub fn width(&self) -> u32 {
        self.binarizer.width()
    }

    pub fn height(&self) -> u32 {
        self.binarizer.height()
    }

    pub fn black_row(&self, y: u32) -> Result<BitArray> {
        self.binarizer.black_row(y)
    }

    pub fn black_matrix(&mut self) -> Result<&BitMatrix> {
        if self.cached_matrix.is_none() {
            let matrix = self.binarizer.black_matrix()?;
            log::debug!("binarize: produced {}x{} black matrix", matrix.width(), matrix.height());
            self.cached_matrix = Some(matrix);
        }
        Ok(self.cached_matrix.as_ref().expect("just populated"))
    }

    pub fn is_crop_supported(&self) -> bool {
        self.binarizer.luminance_source().supports_crop()
    }

    pub fn crop(&self, left: u32, top: u32, width: u32, height: u32) -> Result<BinaryBitmap> {
        let cropped_source = self.binarizer.luminance_source().crop(left, top, width, height)?;
        Ok(BinaryBitmap::new(self.binarizer.create_binarizer(cropped_source)))
    }

    pub fn is_rotate_supported(&self) -> bool {
        self.binarizer.luminance_source().supports_rotate()
    }

    pub fn rotate_counter_clockwise(&self) -> Result<BinaryBitmap> {
        let rotated_source = self.binarizer.luminance_source().rotate_ccw()?;
        Ok(BinaryBitmap::new(self.binarizer.create_binarizer(rotated_source)))
    }

    /// Builds a second bitmap over the same source with every module's
    /// black/white sense flipped, used by the detector's mirror retry
    /// (spec §4.11, try-harder path).
    pub fn inverted(&mut self) -> Result<BinaryBitmap> {
        let mut matrix = self.black_matrix()?.clone();
        matrix.flip_all();
        let mut bitmap = BinaryBitmap::new(self.binarizer.create_binarizer(Box::new(InvertedSource {
            inner_width: self.width(),
            inner_height: self.height(),
        })));
        bitmap.cached_matrix = Some(matrix);
        Ok(bitmap)
    }
}

/// A placeholder [`crate::luminance_source::LuminanceSource`] used only to
/// carry dimensions for an already-binarized inverted bitmap; nothing reads
/// its pixel data since `BinaryBitmap::inverted` pre-populates the cached
/// matrix directly.
#[derive(Debug, Clone)]
struct InvertedSource {
    inner_width: u32,
    inner_height: u32,
}

impl crate::luminance_source::LuminanceSource for InvertedSource {
    fn width(&self) -> u32 {
        self.inner_width
    }

    fn height(&self) -> u32 {
        self.inner_height
    }

    fn row(&self, _y: u32, _reuse: Option<Vec<u8>>) -> Result<Vec<u8>> {
        Err(Exceptions::unsupported("inverted bitmap source has no pixel data"))
    }

    fn matrix(&self) -> Vec<u8> {
        Vec::new()
    }
}
