//! Pixel-level, end-to-end QR round trips: a real version-1-H "ABC" symbol
//! is rasterized module-by-module (no shortcuts through the encoder side,
//! which this crate doesn't implement) and fed through the same
//! `HybridBinarizer` + `MultiFormatReader` pipeline a caller would use on a
//! photographed symbol. Covers spec §8's canonical-matrix, rotated,
//! mirrored, and bit-flip-correction scenarios, and directly exercises the
//! mirror-retry path's transpose fix in `bit_matrix_parser.rs`.

use rxscan::common::hybrid_binarizer::HybridBinarizer;
use rxscan::{BarcodeFormat, BinaryBitmap, Exceptions, Luma8LuminanceSource, MultiFormatReader};

/// The 21x21 module grid (1 = black) for a genuine ISO/IEC 18004 version-1,
/// error-correction-level-H QR symbol encoding "ABC" in alphanumeric mode
/// under mask pattern 0. Derived independently of this crate (alphanumeric
/// bitstream -> padding -> Reed-Solomon encode -> zigzag placement -> mask
/// -> finder/timing/format-info overlay) rather than lifted from the
/// decoder's own code path, so the test is not circular.
#[rustfmt::skip]
const QR_V1_H_ABC: [[u8; 21]; 21] = [
    [1, 1, 1, 1, 1, 1, 1, 0, 1, 0, 1, 0, 1, 0, 1, 1, 1, 1, 1, 1, 1],
    [1, 0, 0, 0, 0, 0, 1, 0, 0, 0, 1, 1, 0, 0, 1, 0, 0, 0, 0, 0, 1],
    [1, 0, 1, 1, 1, 0, 1, 0, 0, 1, 1, 1, 1, 0, 1, 0, 1, 1, 1, 0, 1],
    [1, 0, 1, 1, 1, 0, 1, 0, 1, 0, 0, 0, 0, 0, 1, 0, 1, 1, 1, 0, 1],
    [1, 0, 1, 1, 1, 0, 1, 0, 0, 0, 0, 1, 1, 0, 1, 0, 1, 1, 1, 0, 1],
    [1, 0, 0, 0, 0, 0, 1, 0, 0, 1, 1, 0, 1, 0, 1, 0, 0, 0, 0, 0, 1],
    [1, 1, 1, 1, 1, 1, 1, 0, 0, 0, 1, 0, 1, 0, 1, 1, 1, 1, 1, 1, 1],
    [0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 1, 1, 0, 0, 0, 0, 0, 0, 0, 0, 0],
    [0, 0, 1, 0, 1, 1, 0, 0, 1, 1, 1, 0, 0, 1, 0, 0, 0, 1, 0, 0, 1],
    [1, 1, 1, 0, 1, 1, 0, 1, 0, 0, 0, 1, 0, 1, 1, 0, 0, 1, 0, 0, 0],
    [0, 0, 1, 0, 1, 1, 1, 1, 0, 0, 1, 0, 1, 1, 1, 0, 1, 1, 0, 1, 0],
    [0, 1, 0, 0, 0, 1, 0, 1, 1, 1, 1, 0, 1, 0, 1, 0, 0, 1, 0, 1, 0],
    [0, 0, 1, 0, 1, 0, 1, 1, 1, 1, 0, 1, 0, 0, 0, 0, 1, 0, 1, 1, 0],
    [0, 0, 0, 0, 0, 0, 0, 0, 1, 0, 1, 0, 0, 0, 1, 1, 0, 1, 0, 0, 0],
    [1, 1, 1, 1, 1, 1, 1, 0, 0, 1, 0, 0, 0, 0, 1, 1, 0, 0, 1, 0, 0],
    [1, 0, 0, 0, 0, 0, 1, 0, 1, 0, 0, 0, 1, 0, 0, 1, 1, 1, 0, 0, 0],
    [1, 0, 1, 1, 1, 0, 1, 0, 1, 0, 0, 0, 1, 1, 0, 1, 0, 0, 1, 0, 1],
    [1, 0, 1, 1, 1, 0, 1, 0, 0, 0, 0, 1, 1, 1, 1, 0, 0, 0, 1, 1, 0],
    [1, 0, 1, 1, 1, 0, 1, 0, 1, 1, 0, 0, 1, 1, 0, 0, 1, 0, 0, 0, 1],
    [1, 0, 0, 0, 0, 0, 1, 0, 0, 1, 1, 0, 0, 1, 1, 0, 0, 0, 1, 1, 1],
    [1, 1, 1, 1, 1, 1, 1, 0, 0, 1, 0, 0, 1, 1, 0, 0, 1, 0, 1, 0, 1],
];

const DIM: usize = 21;

/// Coordinates (x, y) of the most-significant bit of each of the 26
/// codewords in [`QR_V1_H_ABC`]'s zigzag placement, in codeword order
/// (9 data codewords, then 17 Reed-Solomon codewords). Flipping the pixel
/// at one of these coordinates flips the MSB of that codeword, guaranteeing
/// a byte-level error in it for the error-correction-capacity tests below.
const CODEWORD_MSB_COORDS: [(usize, usize); 26] = [
    (20, 20), (20, 16), (20, 12), (18, 9), (18, 13), (18, 17), (16, 20), (16, 16), (16, 12),
    (14, 9), (14, 13), (14, 17), (12, 20), (12, 16), (12, 12), (12, 8), (12, 3), (10, 0),
    (10, 4), (10, 9), (10, 13), (10, 17), (8, 12), (5, 9), (3, 12), (1, 9),
];

const SCALE: u32 = 4;
const QUIET_MODULES: u32 = 4;

/// Expands a module grid into a quiet-zoned luminance buffer, each module
/// rendered as an SCALE x SCALE block of pixels (0 = black, 255 = white).
fn rasterize(grid: &[[u8; DIM]; DIM]) -> (Vec<u8>, u32, u32) {
    let side = DIM as u32 + 2 * QUIET_MODULES;
    let px = side * SCALE;
    let mut buf = vec![255u8; (px * px) as usize];
    for (y, row) in grid.iter().enumerate() {
        for (x, &module) in row.iter().enumerate() {
            if module == 0 {
                continue;
            }
            let base_x = (QUIET_MODULES + x as u32) * SCALE;
            let base_y = (QUIET_MODULES + y as u32) * SCALE;
            for dy in 0..SCALE {
                for dx in 0..SCALE {
                    let px_x = base_x + dx;
                    let px_y = base_y + dy;
                    buf[(px_y * px + px_x) as usize] = 0;
                }
            }
        }
    }
    (buf, px, px)
}

fn transpose_grid(grid: &[[u8; DIM]; DIM]) -> [[u8; DIM]; DIM] {
    let mut out = [[0u8; DIM]; DIM];
    for y in 0..DIM {
        for x in 0..DIM {
            out[y][x] = grid[x][y];
        }
    }
    out
}

fn rotate90_grid(grid: &[[u8; DIM]; DIM]) -> [[u8; DIM]; DIM] {
    let mut out = [[0u8; DIM]; DIM];
    for y in 0..DIM {
        for x in 0..DIM {
            out[x][DIM - 1 - y] = grid[y][x];
        }
    }
    out
}

fn rotate180_grid(grid: &[[u8; DIM]; DIM]) -> [[u8; DIM]; DIM] {
    rotate90_grid(&rotate90_grid(grid))
}

fn rotate270_grid(grid: &[[u8; DIM]; DIM]) -> [[u8; DIM]; DIM] {
    rotate90_grid(&rotate180_grid(grid))
}

/// Flips the rendered pixel block for the MSB of each named codeword index
/// from black to white or vice versa, simulating photographed-symbol bit
/// errors at the codeword level rather than touching arbitrary pixels.
fn flip_codewords(buf: &mut [u8], px_width: u32, codeword_indices: &[usize]) {
    for &cw in codeword_indices {
        let (x, y) = CODEWORD_MSB_COORDS[cw];
        let base_x = (QUIET_MODULES + x as u32) * SCALE;
        let base_y = (QUIET_MODULES + y as u32) * SCALE;
        for dy in 0..SCALE {
            for dx in 0..SCALE {
                let idx = ((base_y + dy) * px_width + (base_x + dx)) as usize;
                buf[idx] = 255 - buf[idx];
            }
        }
    }
}

fn decode_grid(grid: &[[u8; DIM]; DIM]) -> rxscan::Result<rxscan::RXingResult> {
    let (luma, width, height) = rasterize(grid);
    let source = Luma8LuminanceSource::new(luma, width, height);
    let binarizer = HybridBinarizer::new(Box::new(source));
    let mut bitmap = BinaryBitmap::new(Box::new(binarizer));
    MultiFormatReader::default().decode(&mut bitmap)
}

#[test]
fn v1_h_abc_round_trips_through_the_real_pipeline() {
    let _ = env_logger::try_init();
    let result = decode_grid(&QR_V1_H_ABC).expect("a cleanly rendered V1-H symbol must decode");
    assert_eq!(result.text(), "ABC");
    assert_eq!(result.format(), BarcodeFormat::QrCode);
    assert_eq!(result.points().len(), 3, "QR detection reports the 3 finder-pattern centers");
}

#[test]
fn rotated_90_degrees_round_trips() {
    let result = decode_grid(&rotate90_grid(&QR_V1_H_ABC)).expect("a 90-degree rotation must still decode");
    assert_eq!(result.text(), "ABC");
}

#[test]
fn rotated_180_degrees_round_trips() {
    let result = decode_grid(&rotate180_grid(&QR_V1_H_ABC)).expect("a 180-degree rotation must still decode");
    assert_eq!(result.text(), "ABC");
}

#[test]
fn rotated_270_degrees_round_trips() {
    let result = decode_grid(&rotate270_grid(&QR_V1_H_ABC)).expect("a 270-degree rotation must still decode");
    assert_eq!(result.text(), "ABC");
}

#[test]
fn mirror_imaged_symbol_recovers_via_the_mirror_retry_path() {
    let _ = env_logger::try_init();
    let result = decode_grid(&transpose_grid(&QR_V1_H_ABC))
        .expect("a mirror-imaged symbol must recover through bit_matrix_parser's mirror retry");
    assert_eq!(result.text(), "ABC");
}

#[test]
fn three_codeword_errors_are_within_v1_h_correction_capacity() {
    let (mut luma, width, _height) = rasterize(&QR_V1_H_ABC);
    flip_codewords(&mut luma, width, &[0, 1, 2]);
    let source = Luma8LuminanceSource::new(luma, width, width);
    let binarizer = HybridBinarizer::new(Box::new(source));
    let mut bitmap = BinaryBitmap::new(Box::new(binarizer));
    let result = MultiFormatReader::default()
        .decode(&mut bitmap)
        .expect("V1-H carries 17 EC codewords, correcting up to 8 codeword errors");
    assert_eq!(result.text(), "ABC");
}

#[test]
fn nine_codeword_errors_exceed_v1_h_correction_capacity() {
    let (mut luma, width, _height) = rasterize(&QR_V1_H_ABC);
    flip_codewords(&mut luma, width, &[0, 1, 2, 3, 4, 5, 6, 7, 8]);
    let source = Luma8LuminanceSource::new(luma, width, width);
    let binarizer = HybridBinarizer::new(Box::new(source));
    let mut bitmap = BinaryBitmap::new(Box::new(binarizer));
    let err = MultiFormatReader::default()
        .decode(&mut bitmap)
        .expect_err("9 codeword errors exceed V1-H's 8-codeword correction capacity");
    assert!(matches!(err, Exceptions::ChecksumError(_) | Exceptions::FormatError(_)));
}
