//! [`Reader`] implementation tying together Data Matrix detection and
//! decoding (spec §4.8, §4.11).

use crate::barcode_format::BarcodeFormat;
use crate::binary_bitmap::BinaryBitmap;
use crate::datamatrix::decoder;
use crate::datamatrix::detector::Detector;
use crate::decode_hints::DecodeHints;
use crate::error::Result;
use crate::reader::Reader;
use crate::result::RXingResult;

#[derive(Debug, Default)]
pub struct DataMatrixReader;

impl DataMatrixReader {
    pub const fn new() -> Self {
        Self
    }
}

impl Reader for DataMatrixReader {
    fn decode_with_hints(&mut self, image: &mut BinaryBitmap, _hints: &DecodeHints) -> Result<RXingResult> {
        let black_matrix = image.black_matrix()?;
        let detector_result = Detector::new(black_matrix).detect()?;
        let (bits, points) = detector_result.into_parts();
        log::debug!("datamatrix: detected {}x{} module grid at {} points", bits.width(), bits.height(), points.len());

        let decoder_result = decoder::decode(&bits)?;
        Ok(RXingResult::from_decoder_result(decoder_result, points, BarcodeFormat::DataMatrix))
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
        let mut reader = DataMatrixReader::new();
        assert!(reader.decode_with_hints(&mut bitmap, &DecodeHints::default()).is_err());
    }
}
