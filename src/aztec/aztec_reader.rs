//! [`Reader`] implementation tying together Aztec detection and decoding
//! (spec §4.8, §4.11).

use crate::aztec::decoder;
use crate::aztec::detector::Detector;
use crate::barcode_format::BarcodeFormat;
use crate::binary_bitmap::BinaryBitmap;
use crate::decode_hints::DecodeHints;
use crate::error::Result;
use crate::reader::Reader;
use crate::result::RXingResult;

#[derive(Debug, Default)]
pub struct AztecReader;

impl AztecReader {
    pub const fn new() -> Self {
        Self
    }
}

impl Reader for AztecReader {
    fn decode_with_hints(&mut self, image: &mut BinaryBitmap, _hints: &DecodeHints) -> Result<RXingResult> {
        let black_matrix = image.black_matrix()?;
        let detector_result = Detector::new(black_matrix).detect()?;
        log::debug!("aztec: detected bullseye at {} points", detector_result.points().len());

        let decoder_result = decoder::decode(&detector_result)?;
        let points = detector_result.points().to_vec();
        Ok(RXingResult::from_decoder_result(decoder_result, points, BarcodeFormat::Aztec))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decoding_a_blank_image_is_not_found() {
        let source = crate::luminance_source::Luma8LuminanceSource::new(vec![255u8; 400], 20, 20);
        let binarizer = crate::common::global_histogram_binarizer::GlobalHistogramBinarizer::new(Box::new(source));
        let mut bitmap = BinaryBitmap::new(Box::new(binarizer));
        let mut reader = AztecReader::new();
        assert!(reader.decode_with_hints(&mut bitmap, &DecodeHints::default()).is_err());
    }
}
