//! Turning each detected row's guard-to-guard pixel span into a sequence of
//! codeword values (spec §4.9).
//!
//! Each codeword is read the way a 1D reader reads a character: record eight
//! alternating bar/space runs starting at the cursor, normalize them to
//! module counts, and match the resulting shape against the cluster table
//! for that row (`pdf417_common`). The left- and right-most codeword in each
//! row is a row-indicator codeword and is dropped; what remains are that
//! row's contribution to the flat codeword stream the error-correction step
//! and bit-stream parser consume.

use crate::error::{Exceptions, Result};
use crate::oned::patterns;

use super::super::detector::{Pdf417DetectorResult, RowScan};
use super::super::pdf417_common::{self, CodewordShape, MODULES_IN_CODEWORD};

/// A codeword shape more than this many modules off its nearest table entry
/// is treated as unreadable rather than silently accepted.
const MAX_CODEWORD_DISTANCE: u32 = 3;

fn normalize(counters: &[u32; 8], module_width: f32) -> CodewordShape {
    let mut shape = [0u32; 8];
    for (i, &c) in counters.iter().enumerate() {
        let modules = (c as f32 / module_width).round();
        shape[i] = (modules as u32).clamp(1, 6);
    }
    shape
}

fn decode_row(row: &crate::common::BitArray, scan: &RowScan, cluster: usize) -> Result<Vec<i32>> {
    let mut cursor = scan.start_x as usize;
    let mut values = Vec::new();
    let slot_width = (scan.module_width * MODULES_IN_CODEWORD as f32).max(1.0);
    let approx_codewords = ((scan.stop_x - scan.start_x) as f32 / slot_width).round() as usize;

    let mut counters = [0u32; 8];
    for _ in 0..approx_codewords {
        if cursor >= scan.stop_x as usize {
            break;
        }
        patterns::record_pattern(row, cursor, &mut counters)?;
        let shape = normalize(&counters, scan.module_width);
        let (value, distance) = pdf417_common::nearest_codeword(cluster, &shape)
            .ok_or_else(|| Exceptions::format_error("empty PDF417 codeword table"))?;
        if distance > MAX_CODEWORD_DISTANCE {
            return Err(Exceptions::format_error("codeword shape too far from any table entry"));
        }
        values.push(value as i32);
        cursor += counters.iter().sum::<u32>() as usize;
    }

    if values.len() < 3 {
        return Err(Exceptions::format_error("row has too few codewords to hold data"));
    }
    // Drop the left and right row-indicator codewords; only the interior
    // columns carry the payload the bit-stream parser reads (spec §4.9).
    Ok(values[1..values.len() - 1].to_vec())
}

/// Reads every detected row's data codewords and concatenates them in
/// top-to-bottom order into the flat stream the error-correction and
/// bit-stream-parser stages expect.
pub fn read_codewords(detector_result: &Pdf417DetectorResult) -> Result<Vec<i32>> {
    let bits = detector_result.bits();
    let mut codewords = Vec::new();
    for (row_index, scan) in detector_result.rows().iter().enumerate() {
        let row = bits.row(scan.y);
        let cluster = row_index % 3;
        let row_codewords = decode_row(&row, scan, cluster)?;
        codewords.extend(row_codewords);
    }
    Ok(codewords)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_clamps_to_module_range() {
        let shape = normalize(&[20, 1, 1, 1, 1, 1, 1, 1], 2.0);
        assert_eq!(shape[0], 6);
        assert_eq!(shape[1], 1);
    }
}
