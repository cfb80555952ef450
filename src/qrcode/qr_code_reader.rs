//! [`Reader`] implementation tying together QR Code detection and decoding
//! (spec §4.7, §4.11).

use crate::barcode_format::BarcodeFormat;
use crate::binary_bitmap::BinaryBitmap;
use crate::decode_hints::DecodeHints;
use crate::error::Result;
use crate::qrcode::decoder;
use crate::qrcode::detector::Detector;
use crate::reader::Reader;
use crate::result::RXingResult;

#[derive(Debug, Default)]
pub struct QrCodeReader;

impl QrCodeReader {
    pub const fn new() -> Self {
        Self
    }
}

impl Reader for QrCodeReader {
    fn decode_with_hints(&mut self, image: &mut BinaryBitmap, hints: &DecodeHints) -> Result<RXingResult> {
        let black_matrix = image.black_matrix()?;
        let detector_result = Detector::new(black_matrix).detect(hints)?;
        let (bits, points) = detector_result.into_parts();
        log::debug!("qrcode: detected {}x{} module grid at {} points", bits.width(), bits.height(), points.len());

        let decoder_result = decoder::decode(&bits, hints)?;
        Ok(RXingResult::from_decoder_result(decoder_result, points, BarcodeFormat::QrCode))
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
        let mut reader = QrCodeReader::new();
        assert!(reader.decode_with_hints(&mut bitmap, &DecodeHints::default()).is_err());
    }
}
