//! Converts grayscale luminance into a black/white [`BitMatrix`] (spec §4.1).

use crate::common::BitArray;
use crate::common::BitMatrix;
use crate::error::Result;
use crate::luminance_source::LuminanceSource;

/// A `Binarizer` is bound to one [`LuminanceSource`] for its lifetime, and
/// lazily converts rows or the whole image to black/white on first use, the
/// same caching contract the teacher's global histogram binarizer relies on.
pub trait Binarizer: std::fmt::Debug {
    fn luminance_source(&self) -> &dyn LuminanceSource;

    /// Black/white values for row `y`, computed from a local threshold.
    fn black_row(&self, y: u32) -> Result<BitArray>;

    /// The full black/white matrix, computed from a per-region threshold
    /// where the implementation supports it, or the same per-row estimate
    /// as [`Self::black_row`] otherwise.
    fn black_matrix(&self) -> Result<BitMatrix>;

    /// Whether this binarizer can be rebuilt over a cropped/rotated source
    /// without re-deriving global state (used by the detector's rotation
    /// retry path).
    fn create_binarizer(&self, source: Box<dyn LuminanceSource>) -> Box<dyn Binarizer>;

    fn width(&self) -> u32 {
        self.luminance_source().width()
    }

    fn height(&self) -> u32 {
        self.luminance_source().height()
    }
}
