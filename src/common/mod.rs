//! Shared infrastructure used by every symbology: bit-level buffers, the
//! Reed-Solomon stack, perspective sampling, and decode/detect result types
//! (spec §4.2, §4.5, §4.6, §4.7).

pub mod bit_array;
pub mod bit_matrix;
pub mod bit_source;
pub mod character_set_eci;
pub mod decoder_result;
pub mod detector_result;
pub mod global_histogram_binarizer;
pub mod grid_sampler;
pub mod hybrid_binarizer;
pub mod perspective_transform;
pub mod reedsolomon;
pub mod string_utils;
pub mod white_rectangle_detector;

pub use bit_array::BitArray;
pub use bit_matrix::BitMatrix;
pub use bit_source::BitSource;
pub use decoder_result::DecoderResult;
pub use detector_result::DetectorResult;
pub use perspective_transform::PerspectiveTransform;

use crate::error::Exceptions;
/// The crate-wide `Result` alias, re-exported here since most `common::`
/// modules were ported from code that imported it from this path.
pub type Result<T> = std::result::Result<T, Exceptions>;
