//! Pixel-level Code 128 round trip: a real Code-Set-B symbol encoding
//! "Count01" is rasterized from its bar/space module widths (ISO/IEC 15417
//! table, independently derived) and fed through the same binarizer +
//! `MultiFormatReader` pipeline a caller would use on a photographed
//! barcode (spec §8 scenario: "Code 128 row scan").

use rxscan::common::hybrid_binarizer::HybridBinarizer;
use rxscan::{BarcodeFormat, BinaryBitmap, Luma8LuminanceSource, MultiFormatReader};

/// (is_black, module_width) runs for start-B, "Count01", checksum, and stop,
/// derived from Code 128's published symbol table rather than the reader's
/// own `CODE_PATTERNS` constant, so the test isn't circular.
const RUNS: &[(bool, u32)] = &[
    (true, 2), (false, 1), (true, 1), (false, 2), (true, 1), (false, 4),
    (true, 1), (false, 3), (true, 1), (false, 3), (true, 2), (false, 1),
    (true, 1), (false, 3), (true, 4), (false, 1), (true, 1), (false, 1),
    (true, 1), (false, 2), (true, 4), (false, 2), (true, 1), (false, 1),
    (true, 2), (false, 4), (true, 1), (false, 1), (true, 1), (false, 2),
    (true, 1), (false, 2), (true, 4), (false, 1), (true, 1), (false, 2),
    (true, 1), (false, 2), (true, 3), (false, 1), (true, 2), (false, 2),
    (true, 1), (false, 2), (true, 3), (false, 2), (true, 2), (false, 1),
    (true, 3), (false, 1), (true, 2), (false, 1), (true, 1), (false, 3),
    (true, 2), (false, 3), (true, 3), (false, 1), (true, 1), (false, 1),
];

const MODULE_PX: u32 = 3;
const QUIET_MODULES: u32 = 10;
const ROW_HEIGHT: u32 = 30;

fn rasterize() -> (Vec<u8>, u32, u32) {
    let total_modules: u32 = RUNS.iter().map(|&(_, w)| w).sum();
    let width = (total_modules + 2 * QUIET_MODULES) * MODULE_PX;
    let mut row = vec![255u8; width as usize];

    let mut x = QUIET_MODULES * MODULE_PX;
    for &(is_black, w) in RUNS {
        let run_px = w * MODULE_PX;
        if is_black {
            for px in x..x + run_px {
                row[px as usize] = 0;
            }
        }
        x += run_px;
    }

    let mut buf = Vec::with_capacity((width * ROW_HEIGHT) as usize);
    for _ in 0..ROW_HEIGHT {
        buf.extend_from_slice(&row);
    }
    (buf, width, ROW_HEIGHT)
}

#[test]
fn code_128_count01_round_trips_through_the_real_pipeline() {
    let _ = env_logger::try_init();
    let (luma, width, height) = rasterize();
    let source = Luma8LuminanceSource::new(luma, width, height);
    let binarizer = HybridBinarizer::new(Box::new(source));
    let mut bitmap = BinaryBitmap::new(Box::new(binarizer));
    let result = MultiFormatReader::default().decode(&mut bitmap).expect("a clean Code 128 row must decode");
    assert_eq!(result.text(), "Count01");
    assert_eq!(result.format(), BarcodeFormat::Code128);
}
