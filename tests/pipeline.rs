//! End-to-end checks against the crate's public surface: a blank image
//! must fail cleanly through the whole pipeline, and `MultiFormatReader`
//! must surface a non-`NotFound` error only once every reader has been
//! exhausted (spec §4.11, §7, §8 boundary cases).

use rxscan::common::hybrid_binarizer::HybridBinarizer;
use rxscan::{BarcodeFormat, BinaryBitmap, DecodeHints, Exceptions, Luma8LuminanceSource, MultiFormatReader};

fn blank_bitmap(width: u32, height: u32) -> BinaryBitmap {
    let source = Luma8LuminanceSource::new(vec![255u8; (width * height) as usize], width, height);
    BinaryBitmap::new(Box::new(HybridBinarizer::new(Box::new(source))))
}

#[test]
fn blank_image_is_not_found_for_every_default_format() {
    let _ = env_logger::try_init();
    let mut reader = MultiFormatReader::default();
    let mut bitmap = blank_bitmap(200, 200);
    let err = reader.decode(&mut bitmap).unwrap_err();
    assert!(matches!(err, Exceptions::NotFound(_)));
}

#[test]
fn hinting_a_single_format_only_tries_that_reader() {
    let mut hints = DecodeHints::default();
    hints.formats = Some([BarcodeFormat::QrCode].into_iter().collect());
    let mut reader = MultiFormatReader::default();

    let mut bitmap = blank_bitmap(200, 200);
    let err = reader.decode_with_hints(&mut bitmap, hints).unwrap_err();
    assert!(matches!(err, Exceptions::NotFound(_)));
}

#[test]
fn detect_in_luma_on_a_blank_image_is_not_found() {
    let err = rxscan::helpers::detect_in_luma(vec![255u8; 40_000], 200, 200, None).unwrap_err();
    assert!(matches!(err, Exceptions::NotFound(_)));
}
