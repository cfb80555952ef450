//! Multi-format barcode decoding: binarization, perspective-corrected
//! detection, and Reed-Solomon-corrected symbol decoding for QR Code, Data
//! Matrix, Aztec, PDF417, and the common 1D symbologies.
//!
//! [`reader::MultiFormatReader`] is the main entry point for most callers;
//! [`helpers`] wraps it with `image`/`svg`-backed convenience functions
//! behind their respective feature flags.

pub mod aztec;
pub mod barcode_format;
pub mod binarizer;
pub mod binary_bitmap;
pub mod common;
pub mod datamatrix;
pub mod decode_hints;
pub mod error;
pub mod helpers;
pub mod luminance_source;
pub mod oned;
pub mod pdf417;
pub mod point;
pub mod qrcode;
pub mod reader;
pub mod result;

pub use barcode_format::BarcodeFormat;
pub use binarizer::Binarizer;
pub use binary_bitmap::BinaryBitmap;
pub use decode_hints::DecodeHints;
pub use error::{Exceptions, Result};
pub use luminance_source::{Luma8LuminanceSource, LuminanceSource};
pub use point::Point;
pub use reader::{MultiFormatReader, Reader};
pub use result::RXingResult;
