//! [`Reader`] implementation tying together PDF417 detection and decoding
//! (spec §4.8, §4.11).
//!
//! `pdf417_common`'s codeword/module-shape table is a self-consistent
//! bijection generated at startup, not a transcription of ISO/IEC 15438's
//! real codeword table (see `DESIGN.md`). That means it can only ever
//! round-trip symbols this crate itself encoded for testing, not a real
//! PDF417 barcode from a conformant encoder — decoding one would silently
//! produce plausible-looking but wrong text. Rather than ship that failure
//! mode by default, [`Pdf417Reader::decode_with_hints`] refuses with
//! [`crate::error::Exceptions::Unsupported`] unless the
//! `pdf417-nonconformant` feature is explicitly opted into.

use crate::binary_bitmap::BinaryBitmap;
use crate::decode_hints::DecodeHints;
use crate::error::Result;
use crate::reader::Reader;
use crate::result::RXingResult;

#[derive(Debug, Default)]
pub struct Pdf417Reader;

impl Pdf417Reader {
    pub const fn new() -> Self {
        Self
    }
}

impl Reader for Pdf417Reader {
    #[cfg(feature = "pdf417-nonconformant")]
    fn decode_with_hints(&mut self, image: &mut BinaryBitmap, _hints: &DecodeHints) -> Result<RXingResult> {
        use crate::barcode_format::BarcodeFormat;

        use super::decoder;
        use super::detector::Detector;

        let black_matrix = image.black_matrix()?;
        let detector_result = Detector::new(black_matrix).detect()?;
        log::debug!("pdf417: detected {} points", detector_result.points().len());

        let decoder_result = decoder::decode(&detector_result)?;
        let points = detector_result.points().to_vec();
        Ok(RXingResult::from_decoder_result(decoder_result, points, BarcodeFormat::Pdf417))
    }

    #[cfg(not(feature = "pdf417-nonconformant"))]
    fn decode_with_hints(&mut self, _image: &mut BinaryBitmap, _hints: &DecodeHints) -> Result<RXingResult> {
        Err(crate::error::Exceptions::unsupported(
            "PDF417 decoding is disabled: this build's codeword table is not verified against \
             ISO/IEC 15438 and would silently misdecode real-world symbols; enable the \
             `pdf417-nonconformant` feature to use it against self-generated test symbols only",
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decoding_a_blank_image_is_not_found_or_unsupported() {
        let source = crate::luminance_source::Luma8LuminanceSource::new(vec![255u8; 400], 20, 20);
        let binarizer = crate::common::global_histogram_binarizer::GlobalHistogramBinarizer::new(Box::new(source));
        let mut bitmap = BinaryBitmap::new(Box::new(binarizer));
        let mut reader = Pdf417Reader::new();
        assert!(reader.decode_with_hints(&mut bitmap, &DecodeHints::default()).is_err());
    }

    #[cfg(not(feature = "pdf417-nonconformant"))]
    #[test]
    fn decoding_is_refused_as_unsupported_by_default() {
        let source = crate::luminance_source::Luma8LuminanceSource::new(vec![255u8; 400], 20, 20);
        let binarizer = crate::common::global_histogram_binarizer::GlobalHistogramBinarizer::new(Box::new(source));
        let mut bitmap = BinaryBitmap::new(Box::new(binarizer));
        let mut reader = Pdf417Reader::new();
        let err = reader.decode_with_hints(&mut bitmap, &DecodeHints::default()).unwrap_err();
        assert!(matches!(err, crate::error::Exceptions::Unsupported(_)));
    }
}
